use motif_features::error::MotifError;
use motif_features::fasta;
use polars::prelude::*;
use std::io::Write;

#[test]
fn test_read_fasta() {
    let path = "tests/data/test1.fasta";
    let df = fasta::read_fasta(path).unwrap();
    assert_eq!(df.height(), 3);
    assert_eq!(df.width(), 2);

    // lowercase input is uppercased, wrapped lines are joined
    let sequences = df.column("sequence").unwrap().str().unwrap();
    assert_eq!(
        sequences.get(1),
        Some("TGCTTTTTTTTTGAGTCAGCAAAACTGAAGCCT")
    );
    assert_eq!(
        sequences.get(2),
        Some("CGCTTTTTAATAGAGTCAGCAAAACTGAAGCCT")
    );

    // test file does not exist
    let result = fasta::read_fasta("tests/data/nonexistent.fasta");
    assert!(result.is_err());
}

#[test]
fn test_write_fasta() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("test1_out.fasta");
    let path = path.to_str().unwrap();
    let df: DataFrame = df!(
        "label" => ["chr1-4357766-4357930_CPPP_WT", "chr1-4357733-4357765_CPPP_WT", "chr1-4357712-4357732_CPPP_WT"],
        "sequence" => ["AGCTTTTTAATAGAGTCAGCAAAACTGAAGCCT", "TGCTTTTTTTTTGAGTCAGCAAAACTGAAGCCT", "CGCTTTTTAATAGAGTCAGCAAAACTGAAGCCT"],
    )
    .unwrap();

    fasta::write_fasta(&df, path).unwrap();

    let df_out = fasta::read_fasta(path).unwrap();
    assert_eq!(df_out.height(), 3);
    assert_eq!(df_out.width(), 2);
    assert!(df_out.equals(&df));
}

#[test]
fn test_read_sequences_keeps_order_and_empty_records() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, ">s2\nACGT\n>empty\n>s1\nggcc\n").unwrap();

    let sequences = fasta::read_sequences(file.path().to_str().unwrap()).unwrap();
    let ids: Vec<&str> = sequences.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(ids, vec!["s2", "empty", "s1"]);
    assert!(sequences[1].is_empty());
    assert_eq!(sequences[2].bases, "GGCC");
}

#[test]
fn test_sequences_from_frame_rejects_duplicates() {
    let df = df!(
        "label" => ["s1", "s2", "s1"],
        "sequence" => ["ACGT", "AAAA", "CCCC"],
    )
    .unwrap();

    let result = fasta::sequences_from_frame(&df);
    assert!(matches!(result, Err(MotifError::DuplicateSequence(id)) if id == "s1"));
}

#[test]
fn test_read_fasta_without_records() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file).unwrap();

    let result = fasta::read_fasta(file.path().to_str().unwrap());
    assert!(matches!(result, Err(MotifError::InvalidFileFormat(_))));
}
