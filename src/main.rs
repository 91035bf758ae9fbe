use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use tracing::{error, info, warn};

use kira_ambientmarkers::input::{InputError, load_input_tenx};
use kira_ambientmarkers::input::tables::{load_ambient_profile, load_clusters, load_size_factors};
use kira_ambientmarkers::logging::init_logging;
use kira_ambientmarkers::model::params::DEFAULT_MAX_CANDIDATES;
use kira_ambientmarkers::pipeline::stage5_report::{ReportInput, write_reports};
use kira_ambientmarkers::{
    CellClusters, CellSizeFactors, CountMatrix, MarkerError, MarkerInputs, MarkerParams,
    NonExpressingOracle, PoissonOracle, PoissonOracleParams, rank_marker_candidates,
};

#[derive(Debug, Parser)]
#[command(name = "kira-ambientmarkers", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Score and rank ambient marker candidates for one 10x sample.
    Run(RunArgs),
}

#[derive(Debug, Clone, Args)]
struct RunArgs {
    /// 10x directory with matrix.mtx, features.tsv and barcodes.tsv (optionally gzipped).
    /// Without --size-factors every barcode needs at least one count.
    #[arg(long = "input")]
    input_dir: PathBuf,
    /// Ambient profile TSV: gene, est.
    #[arg(long = "soup")]
    soup_path: PathBuf,
    #[arg(long = "out")]
    out_dir: PathBuf,
    /// Size factor TSV: barcode, size. Defaults to per-cell total counts.
    #[arg(long = "size-factors")]
    size_factors_path: Option<PathBuf>,
    /// Cluster TSV: barcode, cluster. Non-expression is then decided per cluster.
    #[arg(long = "clusters")]
    clusters_path: Option<PathBuf>,
    #[arg(long, default_value_t = DEFAULT_MAX_CANDIDATES)]
    max_candidates: usize,
    #[arg(long, default_value_t = 1.0)]
    max_contamination: f64,
    #[arg(long, default_value_t = 0.05)]
    fdr: f64,
    #[arg(long, short)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();
    let Command::Run(args) = cli.command;
    init_logging(args.verbose);
    if let Err(err) = run(&args) {
        error!("{err}");
        std::process::exit(1);
    }
}

fn run(args: &RunArgs) -> Result<(), MarkerError> {
    let params = MarkerParams {
        max_candidates: args.max_candidates,
    };
    let oracle_params = PoissonOracleParams {
        maximum_contamination: args.max_contamination,
        fdr: args.fdr,
    };
    params.validate()?;
    oracle_params.validate()?;

    let tenx = load_input_tenx(&args.input_dir)?;
    let counts = &tenx.counts;
    let ambient = load_ambient_profile(&args.soup_path)?;
    if ambient.len() > counts.n_genes() {
        warn!(
            profile = ambient.len(),
            matrix = counts.n_genes(),
            "ambient profile lists genes absent from the matrix; they are ignored"
        );
    }

    let (size_factors, size_factor_source) = match &args.size_factors_path {
        Some(path) => (load_size_factors(path)?, path.display().to_string()),
        None => (
            CellSizeFactors::from_cell_totals(counts)?,
            "cell totals".to_string(),
        ),
    };
    let clusters = args.clusters_path.as_deref().map(load_clusters).transpose()?;
    let n_clusters = match &clusters {
        Some(c) => Some(count_labels(c, counts)?),
        None => None,
    };

    let oracle = PoissonOracle::new(oracle_params.clone(), clusters);
    let inputs = MarkerInputs {
        counts,
        ambient: &ambient,
        size_factors: &size_factors,
    };
    let marker_run = rank_marker_candidates(&inputs, &oracle, &params)?;

    let report = ReportInput {
        counts,
        n_features_raw: tenx.n_features_raw,
        run: &marker_run,
        params: &params,
        oracle_name: oracle.name(),
        oracle_params: &oracle_params,
        size_factor_source,
        n_clusters,
        tool_name: env!("CARGO_PKG_NAME").to_string(),
        tool_version: env!("CARGO_PKG_VERSION").to_string(),
    };
    write_reports(&report, &args.out_dir).map_err(|e| InputError::io(&args.out_dir, e))?;
    info!(out = %args.out_dir.display(), rows = marker_run.table.len(), "reports written");
    Ok(())
}

fn count_labels(clusters: &CellClusters, counts: &CountMatrix) -> Result<usize, MarkerError> {
    clusters
        .dense_indices(counts)
        .map(|(_, n)| n)
        .map_err(|cell| MarkerError::invalid_for("cell has no cluster assignment", cell))
}

#[cfg(test)]
#[path = "../tests/src_inline/main_inline.rs"]
mod tests;
