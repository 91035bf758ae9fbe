use super::*;

fn single_gene(entries: &[(usize, usize, i64)], n_cells: usize) -> CountMatrix {
    let cells = (0..n_cells).map(|i| format!("CELL-{}", i + 1)).collect();
    CountMatrix::from_triplets(vec!["G1".to_string()], cells, entries).unwrap()
}

#[test]
fn test_ratios_only_for_nonzero_counts() {
    let m = single_gene(&[(0, 2, 1), (0, 5, 1), (0, 8, 4)], 10);
    let ratios = compute_ratios(&m, &[0.2], &[10.0; 10], &[0]).unwrap();

    assert_eq!(ratios.nnz(), 3);
    assert_eq!(
        ratios.row(0).unwrap(),
        &[(2, 0.5), (5, 0.5), (8, 2.0)]
    );
}

#[test]
fn test_zero_estimate_gene_never_divided() {
    let m = CountMatrix::from_triplets(
        vec!["A".to_string(), "B".to_string()],
        vec!["c1".to_string()],
        &[(0, 0, 3), (1, 0, 2)],
    )
    .unwrap();
    let ratios = compute_ratios(&m, &[0.0, 0.5], &[4.0], &[0, 1]).unwrap();
    assert!(ratios.row(0).is_none());
    assert_eq!(ratios.row(1).unwrap(), &[(0, 1.0)]);
}

#[test]
fn test_genes_emitted_in_row_order() {
    let m = CountMatrix::from_triplets(
        vec!["A".to_string(), "B".to_string(), "C".to_string()],
        vec!["c1".to_string()],
        &[(0, 0, 1), (1, 0, 1), (2, 0, 1)],
    )
    .unwrap();
    let ratios = compute_ratios(&m, &[0.1, 0.2, 0.3], &[1.0], &[2, 0, 2]).unwrap();
    let order: Vec<usize> = ratios.rows.iter().map(|(g, _)| *g).collect();
    assert_eq!(order, vec![0, 2]);
}

#[test]
fn test_degenerate_ratio_is_an_invariant_violation() {
    let m = single_gene(&[(0, 1, 2)], 2);
    let err = compute_ratios(&m, &[0.5], &[1.0, f64::INFINITY], &[0]).unwrap_err();
    match err {
        MarkerError::NumericInvariantViolation { gene, cell, .. } => {
            assert_eq!(gene, "G1");
            assert_eq!(cell, "CELL-2");
        }
        other => panic!("unexpected error: {other}"),
    }
}
