use assert_approx_eq::assert_approx_eq;
use motif_features::error::MotifError;
use motif_features::features::{gc_content, kmer_distribution};
use motif_features::types::KmerDistribution;

#[test]
fn test_gc_content() {
    assert_eq!(gc_content(""), 0.0);
    assert_approx_eq!(gc_content("ACGT"), 50.0);
    assert_approx_eq!(gc_content("GGCC"), 100.0);
    assert_approx_eq!(gc_content("AATT"), 0.0);
    assert_approx_eq!(gc_content("GAT"), 100.0 / 3.0);
}

#[test]
fn test_kmer_distribution() {
    let expected: KmerDistribution = [("ACG", 2), ("CGT", 2), ("GTA", 1), ("TAC", 1)]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();
    assert_eq!(kmer_distribution("ACGTACGT", 3).unwrap(), expected);

    // k exceeds the sequence length
    assert!(kmer_distribution("AC", 3).unwrap().is_empty());
    assert!(kmer_distribution("", 1).unwrap().is_empty());
}

#[test]
fn test_kmer_distribution_counts_every_offset() {
    let dist = kmer_distribution("AAAAA", 2).unwrap();
    assert_eq!(dist.len(), 1);
    assert_eq!(dist["AA"], 4);

    let dist = kmer_distribution("ACGT", 4).unwrap();
    assert_eq!(dist.get("ACGT"), Some(&1));

    let total: usize = kmer_distribution("ACGTTGCA", 3).unwrap().values().sum();
    assert_eq!(total, 6);
}

#[test]
fn test_kmer_distribution_rejects_zero_k() {
    let result = kmer_distribution("ACGT", 0);
    assert!(matches!(
        result,
        Err(MotifError::InvalidParameter { ref name, .. }) if name == "k"
    ));
}
