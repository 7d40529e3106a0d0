use crate::error::{MotifError, Result};
use serde::{Deserialize, Serialize};

/// Default k-mer length used for distributions and TF-IDF
pub const DEFAULT_KMER_SIZE: usize = 3;

/// Default number of motifs retained per sequence
pub const DEFAULT_TOP_K: usize = 5;

/// Parameters of a feature extraction run.
///
/// # Example
/// ```
/// use motif_features::config::AnalysisConfig;
///
/// let config = AnalysisConfig {
///     top_k: 10,
///     ..Default::default()
/// };
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Length of the k-mers counted per sequence
    pub kmer_size: usize,

    /// Number of best scoring motifs kept per sequence
    pub top_k: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        AnalysisConfig {
            kmer_size: DEFAULT_KMER_SIZE,
            top_k: DEFAULT_TOP_K,
        }
    }
}

impl AnalysisConfig {
    /// # Errors
    /// * Returns `MotifError::InvalidParameter` if `kmer_size` or `top_k` is zero
    pub fn validate(&self) -> Result<()> {
        if self.kmer_size == 0 {
            return Err(MotifError::invalid_parameter(
                "kmer_size",
                self.kmer_size,
                "k-mer length must be at least 1",
            ));
        }
        if self.top_k == 0 {
            return Err(MotifError::invalid_parameter(
                "top_k",
                self.top_k,
                "at least one motif must be selected per sequence",
            ));
        }
        Ok(())
    }
}
