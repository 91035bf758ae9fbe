use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::model::counts::CountMatrix;
use crate::model::params::{MarkerParams, PoissonOracleParams};
use crate::model::scores::MarkerTable;
use crate::pipeline::MarkerRun;
use crate::report::json::render_summary_json;
use crate::report::text::render_report_text;
use crate::report::{GateSummary, InputSummary, SummaryData, format_bool, format_f64_6};

const TOP_USEFUL: usize = 10;

#[derive(Debug, Clone)]
pub struct ReportInput<'a> {
    pub counts: &'a CountMatrix,
    pub n_features_raw: usize,
    pub run: &'a MarkerRun,
    pub params: &'a MarkerParams,
    pub oracle_name: &'a str,
    pub oracle_params: &'a PoissonOracleParams,
    pub size_factor_source: String,
    pub n_clusters: Option<usize>,
    pub tool_name: String,
    pub tool_version: String,
}

pub fn write_reports(input: &ReportInput<'_>, out_dir: &Path) -> std::io::Result<()> {
    fs::create_dir_all(out_dir)?;

    write_markers_tsv(&input.run.table, &out_dir.join("markers.tsv"))?;

    let summary = build_summary(input);
    let json = render_summary_json(&summary)?;
    write_text(&out_dir.join("summary.json"), &json)?;

    let report = render_report_text(&summary, &input.run.table);
    write_text(&out_dir.join("report.txt"), &report)?;

    Ok(())
}

pub fn write_markers_tsv(table: &MarkerTable, path: &Path) -> std::io::Result<()> {
    let mut w = BufWriter::new(File::create(path)?);
    let header = [
        "gene",
        "nCells",
        "lowCount",
        "lowFrac",
        "extremity",
        "centrality",
        "minFrac",
        "isUseful",
    ]
    .join("\t");
    writeln!(w, "{}", header)?;

    for score in &table.rows {
        let row = [
            score.gene.clone(),
            score.n_cells.to_string(),
            score.low_count.to_string(),
            format_f64_6(score.low_frac),
            format_f64_6(score.extremity),
            format_f64_6(score.centrality),
            format_f64_6(score.min_frac),
            format_bool(score.is_useful).to_string(),
        ]
        .join("\t");
        writeln!(w, "{}", row)?;
    }
    w.flush()
}

pub fn build_summary(input: &ReportInput<'_>) -> SummaryData {
    let table = &input.run.table;
    SummaryData {
        tool: input.tool_name.clone(),
        version: input.tool_version.clone(),
        input: InputSummary {
            n_features_raw: input.n_features_raw,
            n_genes: input.counts.n_genes(),
            n_cells: input.counts.n_cells(),
            nnz: input.counts.nnz(),
            size_factors: input.size_factor_source.clone(),
            clusters: input.n_clusters,
        },
        params: input.params.clone(),
        oracle_params: input.oracle_params.clone(),
        gates: GateSummary {
            shortlisted: input.run.shortlist.len(),
            oracle: input.oracle_name.to_string(),
            oracle_dropped: input.run.oracle_dropped.len(),
            reported: table.len(),
            useful: table.useful_count(),
        },
        top_useful: table
            .rows
            .iter()
            .filter(|r| r.is_useful)
            .take(TOP_USEFUL)
            .map(|r| r.gene.clone())
            .collect(),
    }
}

fn write_text(path: &Path, contents: &str) -> std::io::Result<()> {
    let mut w = BufWriter::new(File::create(path)?);
    w.write_all(contents.as_bytes())?;
    w.flush()
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage5_report.rs"]
mod tests;
