use super::*;

fn parse(extra: &[&str]) -> RunArgs {
    let mut argv = vec![
        "kira-ambientmarkers",
        "run",
        "--input",
        "data",
        "--soup",
        "soup.tsv",
        "--out",
        "out",
    ];
    argv.extend_from_slice(extra);
    let Command::Run(args) = Cli::try_parse_from(argv).unwrap().command;
    args
}

#[test]
fn test_parse_args_defaults() {
    let args = parse(&[]);
    assert_eq!(args.input_dir, PathBuf::from("data"));
    assert_eq!(args.soup_path, PathBuf::from("soup.tsv"));
    assert_eq!(args.max_candidates, 500);
    assert_eq!(args.max_contamination, 1.0);
    assert_eq!(args.fdr, 0.05);
    assert!(args.clusters_path.is_none());
    assert!(args.size_factors_path.is_none());
    assert!(!args.verbose);
}

#[test]
fn test_parse_args_overrides() {
    let args = parse(&[
        "--clusters",
        "clusters.tsv",
        "--size-factors",
        "sf.tsv",
        "--max-candidates",
        "100",
        "--fdr",
        "0.01",
        "-v",
    ]);
    assert_eq!(args.clusters_path, Some(PathBuf::from("clusters.tsv")));
    assert_eq!(args.size_factors_path, Some(PathBuf::from("sf.tsv")));
    assert_eq!(args.max_candidates, 100);
    assert_eq!(args.fdr, 0.01);
    assert!(args.verbose);
}

#[test]
fn test_missing_soup_is_rejected() {
    let argv = ["kira-ambientmarkers", "run", "--input", "data", "--out", "out"];
    assert!(Cli::try_parse_from(argv).is_err());
}
