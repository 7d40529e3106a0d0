//! Motif scanning and sequence feature extraction for DNA in Rust
//!
//! Sequences are scored against a library of Position Weight Matrices, and
//! each sequence gets its GC content, k-mer distribution and corpus-wide
//! TF-IDF k-mer weights. [`aggregate::analyze`] runs everything and joins the
//! results into one [`types::FeatureRecord`] per sequence.

pub mod aggregate;
pub mod config;
pub mod error;
pub mod fasta;
pub mod features;
pub mod library;
pub mod scan;
pub mod tfidf;
pub mod types;

pub use aggregate::{analyze, Analysis};
pub use config::AnalysisConfig;
pub use error::{MotifError, Result};
