use super::*;

fn matrix(genes: &[&str], n_cells: usize) -> CountMatrix {
    CountMatrix::from_triplets(
        genes.iter().map(|g| g.to_string()).collect(),
        (0..n_cells).map(|i| format!("c{}", i + 1)).collect(),
        &[],
    )
    .unwrap()
}

fn score(gene: &str, is_useful: bool, extremity: f64) -> GeneScore {
    GeneScore {
        gene: gene.to_string(),
        n_cells: 1,
        low_count: 0,
        low_frac: 0.0,
        extremity,
        centrality: 1.0,
        min_frac: 0.0,
        is_useful,
    }
}

fn all_genes(names: &[&str]) -> Shortlist {
    Shortlist {
        gene_ids: (0..names.len()).collect(),
        names: names.iter().map(|g| g.to_string()).collect(),
    }
}

#[test]
fn test_two_low_one_high() {
    let m = matrix(&["G1"], 10);
    let s = score_gene(&m, 0, &[(2, 0.5), (5, 0.5), (8, 2.0)])
        .unwrap()
        .unwrap();

    assert_eq!(s.n_cells, 3);
    assert_eq!(s.low_count, 2);
    assert_eq!(s.low_frac, 2.0 / 3.0);
    assert!((s.low_frac - 0.667).abs() < 1e-3);
    let l = 2f64.log10();
    assert!((s.extremity - l * l).abs() < 1e-12);
    assert!((s.centrality - 1.0 / (1.0 + l * l)).abs() < 1e-12);
    assert!((s.min_frac - 0.5f64.log10()).abs() < 1e-12);
    assert!(s.is_useful);
}

#[test]
fn test_ratios_at_ambient_rate() {
    let m = matrix(&["G1"], 4);
    let s = score_gene(&m, 0, &[(0, 1.0), (1, 1.0), (3, 1.0)])
        .unwrap()
        .unwrap();
    assert_eq!(s.extremity, 0.0);
    assert_eq!(s.centrality, 1.0);
    assert_eq!(s.low_count, 0);
    assert_eq!(s.min_frac, 0.0);
    assert!(!s.is_useful);
}

#[test]
fn test_useful_threshold_is_strict() {
    let m = matrix(&["G1"], 10);
    let mut ratios: Vec<(u32, f64)> = (0..10).map(|c| (c, 2.0)).collect();
    ratios[0].1 = 0.5;
    let s = score_gene(&m, 0, &ratios).unwrap().unwrap();
    assert_eq!(s.low_count, 1);
    assert!(!s.is_useful);

    ratios[1].1 = 0.5;
    let s = score_gene(&m, 0, &ratios).unwrap().unwrap();
    assert!(s.is_useful);
}

#[test]
fn test_gene_without_entries_is_skipped() {
    let m = matrix(&["G1"], 2);
    assert!(score_gene(&m, 0, &[]).unwrap().is_none());
}

#[test]
fn test_non_positive_ratio_aborts() {
    let m = matrix(&["G1"], 2);
    let err = score_gene(&m, 0, &[(0, 1.0), (1, 0.0)]).unwrap_err();
    assert!(matches!(
        err,
        MarkerError::NumericInvariantViolation { ref cell, .. } if cell == "c2"
    ));
}

#[test]
fn test_rank_useful_then_extremity_stable() {
    let mut scores = vec![
        score("a", false, 3.0),
        score("b", true, 1.0),
        score("c", true, 2.0),
        score("d", true, 1.0),
        score("e", false, 3.0),
    ];
    rank_scores(&mut scores);
    let order: Vec<&str> = scores.iter().map(|s| s.gene.as_str()).collect();
    assert_eq!(order, vec!["c", "b", "d", "a", "e"]);
}

#[test]
fn test_aggregate_restricts_to_survivors() {
    let m = matrix(&["A", "B", "C"], 3);
    let ratios = RatioMatrix {
        rows: vec![
            (0, vec![(0, 0.1), (1, 10.0)]),
            (1, vec![(0, 0.5)]),
            (2, vec![]),
        ],
    };
    let survivors = Shortlist {
        gene_ids: vec![1, 2],
        names: vec!["B".to_string(), "C".to_string()],
    };
    let table = aggregate_and_rank(&m, &ratios, &survivors).unwrap();
    assert_eq!(table.genes().collect::<Vec<_>>(), vec!["B"]);

    let full = aggregate_and_rank(&m, &ratios, &all_genes(&["A", "B", "C"])).unwrap();
    assert_eq!(full.genes().collect::<Vec<_>>(), vec!["A", "B"]);
}
