use crate::error::{MotifError, Result};
use crate::types::KmerDistribution;

/// Calculates the GC content of a DNA sequence.
///
/// # Returns
/// * `f64` - Percentage (0-100) of bases that are G or C; `0.0` for an empty sequence
pub fn gc_content(sequence: &str) -> f64 {
    let length = sequence.chars().count();
    if length == 0 {
        return 0.0;
    }
    let gc_count = sequence.chars().filter(|&c| c == 'G' || c == 'C').count() as f64;
    gc_count / length as f64 * 100.0
}

/// Counts every contiguous substring of length `k` in a sequence.
///
/// # Arguments
/// * `sequence` - Input DNA sequence
/// * `k` - K-mer length
///
/// # Returns
/// * `Result<KmerDistribution>` - k-mer to occurrence count, empty when the sequence is shorter than `k`
///
/// # Errors
/// * Returns `MotifError::InvalidParameter` if `k` is zero
pub fn kmer_distribution(sequence: &str, k: usize) -> Result<KmerDistribution> {
    if k == 0 {
        return Err(MotifError::invalid_parameter(
            "k",
            k,
            "k-mer length must be at least 1",
        ));
    }

    // byte offset of every char, plus the end of the string
    let bounds: Vec<usize> = sequence
        .char_indices()
        .map(|(i, _)| i)
        .chain(std::iter::once(sequence.len()))
        .collect();

    let mut counts = KmerDistribution::new();
    for window in bounds.windows(k + 1) {
        let kmer = &sequence[window[0]..window[k]];
        match counts.get_mut(kmer) {
            Some(count) => *count += 1,
            None => {
                counts.insert(kmer.to_string(), 1);
            }
        }
    }

    Ok(counts)
}
