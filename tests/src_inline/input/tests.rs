use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use flate2::Compression;
use flate2::write::GzEncoder;

use super::features::{normalize_symbol, parse_features};
use super::tables::{load_ambient_profile, load_clusters, load_size_factors};
use super::*;

static DIR_COUNTER: AtomicUsize = AtomicUsize::new(0);

fn make_temp_dir() -> PathBuf {
    let mut dir = std::env::temp_dir();
    let id = DIR_COUNTER.fetch_add(1, Ordering::SeqCst);
    dir.push(format!(
        "kira_ambientmarkers_input_{}_{}",
        std::process::id(),
        id
    ));
    fs::create_dir_all(&dir).unwrap();
    dir
}

fn write_file(path: &Path, contents: &str) {
    let mut f = BufWriter::new(File::create(path).unwrap());
    f.write_all(contents.as_bytes()).unwrap();
}

fn write_gz(path: &Path, contents: &str) {
    let mut enc = GzEncoder::new(File::create(path).unwrap(), Compression::default());
    enc.write_all(contents.as_bytes()).unwrap();
    enc.finish().unwrap();
}

fn write_tenx(dir: &Path, features: &str, barcodes: &str, mtx: &str) {
    write_file(&dir.join("features.tsv"), features);
    write_file(&dir.join("barcodes.tsv"), barcodes);
    write_gz(&dir.join("matrix.mtx.gz"), mtx);
}

#[test]
fn test_feature_parsing_v2_v3() {
    let dir = make_temp_dir();
    let v2_path = dir.join("genes.tsv");
    let v3_path = dir.join("features.tsv.gz");

    write_file(&v2_path, "GENE1\tActb\nGENE2\tGapdh\n");
    write_gz(
        &v3_path,
        "ENSG0001\tHBB\tGene Expression\nAB1\tCD3_TotalSeqB\tAntibody Capture\n",
    );

    let v2 = parse_features(&v2_path).unwrap();
    assert_eq!(v2.len(), 2);
    assert_eq!(v2[0].symbol, "Actb");
    assert_eq!(v2[0].feature_type, None);

    let v3 = parse_features(&v3_path).unwrap();
    assert_eq!(v3.len(), 2);
    assert_eq!(v3[0].symbol, "HBB");
    assert_eq!(v3[1].symbol, "");
    assert_eq!(v3[1].feature_type.as_deref(), Some("Antibody Capture"));
}

#[test]
fn test_gene_symbol_normalization() {
    assert_eq!(normalize_symbol("  ENSG000001.12 "), "ENSG000001");
    assert_eq!(normalize_symbol(" Hba-a1 "), "Hba-a1");
    assert_eq!(normalize_symbol("RP11-34P13.3"), "RP11-34P13.3");
    assert_eq!(normalize_symbol(""), "");
}

#[test]
fn test_duplicate_symbols_merge_counts() {
    let dir = make_temp_dir();
    write_tenx(
        &dir,
        "G1\tHBB\tGene Expression\nG2\tHBB\tGene Expression\nG3\tLYZ\tGene Expression\n",
        "AAAC-1\nAAAG-1\n",
        "%%MatrixMarket matrix coordinate integer general\n% generated\n3 2 4\n1 1 2\n2 1 3\n3 2 1\n2 2 0\n",
    );

    let tenx = load_input_tenx(&dir).unwrap();
    let counts = &tenx.counts;
    assert_eq!(tenx.n_features_raw, 3);
    assert_eq!(counts.genes(), &["HBB".to_string(), "LYZ".to_string()]);
    assert_eq!(counts.cells(), &["AAAC-1".to_string(), "AAAG-1".to_string()]);
    assert_eq!(counts.row(0), &[(0, 5)]);
    assert_eq!(counts.row(1), &[(1, 1)]);
}

#[test]
fn test_matrix_dimension_mismatch() {
    let dir = make_temp_dir();
    write_tenx(
        &dir,
        "G1\tHBB\n",
        "AAAC-1\nAAAG-1\n",
        "%%MatrixMarket matrix coordinate integer general\n1 3 1\n1 1 2\n",
    );
    assert!(load_input_tenx(&dir).is_err());
}

#[test]
fn test_negative_matrix_value_rejected() {
    let dir = make_temp_dir();
    write_tenx(
        &dir,
        "G1\tHBB\n",
        "AAAC-1\n",
        "%%MatrixMarket matrix coordinate integer general\n1 1 1\n1 1 -4\n",
    );
    let err = load_input_tenx(&dir).unwrap_err();
    assert!(matches!(err, MarkerError::InvalidInput { .. }));
}

#[test]
fn test_missing_files_reported() {
    let dir = make_temp_dir();
    let err = load_input_tenx(&dir).unwrap_err();
    assert!(matches!(
        err,
        MarkerError::Input(InputError::MissingInput(_))
    ));
}

#[test]
fn test_ambient_profile_with_header() {
    let dir = make_temp_dir();
    let path = dir.join("soup.tsv");
    write_file(&path, "gene\test\tcounts\nHBB\t0.02\t200\nLYZ\t0\t0\n");
    let profile = load_ambient_profile(&path).unwrap();
    assert_eq!(profile.len(), 2);
    assert_eq!(profile.get("HBB"), Some(0.02));
    assert_eq!(profile.get("LYZ"), Some(0.0));
}

#[test]
fn test_ambient_profile_rejects_negative_and_duplicates() {
    let dir = make_temp_dir();
    let negative = dir.join("neg.tsv");
    write_file(&negative, "HBB\t-0.1\n");
    assert!(load_ambient_profile(&negative).is_err());

    let dup = dir.join("dup.tsv");
    write_file(&dup, "HBB\t0.1\nHBB\t0.2\n");
    assert!(load_ambient_profile(&dup).is_err());

    let versions = dir.join("versions.tsv");
    write_file(&versions, "ENSG0001.1\t0.5\nENSG0001.2\t0.1\n");
    let err = load_ambient_profile(&versions).unwrap_err();
    assert!(matches!(err, InputError::Parse { ref detail, .. } if detail.contains("ENSG0001")));

    let bad = dir.join("bad.tsv");
    write_file(&bad, "HBB\t0.1\nLYZ\tabc\n");
    assert!(load_ambient_profile(&bad).is_err());
}

#[test]
fn test_size_factors_and_clusters() {
    let dir = make_temp_dir();
    let sf = dir.join("sf.tsv");
    write_file(&sf, "AAAC-1\t1500\nAAAG-1\t900.5\n");
    let factors = load_size_factors(&sf).unwrap();
    assert_eq!(factors.get("AAAG-1"), Some(900.5));

    let cl = dir.join("clusters.tsv.gz");
    write_gz(&cl, "barcode\tcluster\nAAAC-1\t0\nAAAG-1\t3\n");
    let clusters = load_clusters(&cl).unwrap();
    assert_eq!(clusters.len(), 2);
    assert_eq!(clusters.get("AAAG-1"), Some("3"));
}
