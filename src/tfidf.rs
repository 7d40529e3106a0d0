//! Corpus-wide TF-IDF weighting of k-mers.
//!
//! Scores are kept per sequence: the same k-mer in two sequences yields two
//! independent entries.

use crate::error::Result;
use crate::features::kmer_distribution;
use crate::types::{KmerDistribution, Sequence, TfIdfScores};
use log::debug;
use std::collections::BTreeMap;

/// TF-IDF scores of every sequence in a corpus
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CorpusTfIdfIndex {
    n_documents: usize,
    document_frequency: BTreeMap<String, usize>,
    scores: BTreeMap<String, TfIdfScores>,
}

impl CorpusTfIdfIndex {
    /// Builds the index from the k-mer distribution of each sequence.
    ///
    /// `tf = count / total k-mers in the sequence` and
    /// `idf = ln(1 + N / (1 + df))`, where `df` counts the sequences containing
    /// the k-mer at least once.
    pub fn build<'a, I>(documents: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a KmerDistribution)>,
    {
        let documents: Vec<(&str, &KmerDistribution)> = documents.into_iter().collect();

        let mut document_frequency: BTreeMap<String, usize> = BTreeMap::new();
        for (_, distribution) in &documents {
            for kmer in distribution.keys() {
                *document_frequency.entry(kmer.clone()).or_insert(0) += 1;
            }
        }

        let n_documents = documents.len();
        let mut index = CorpusTfIdfIndex {
            n_documents,
            document_frequency,
            scores: BTreeMap::new(),
        };

        for (sequence_id, distribution) in documents {
            let total: usize = distribution.values().sum();
            let doc_scores: TfIdfScores = distribution
                .iter()
                .map(|(kmer, &count)| {
                    let tf = count as f64 / total as f64;
                    (kmer.clone(), tf * index.idf(kmer))
                })
                .collect();
            index.scores.insert(sequence_id.to_string(), doc_scores);
        }

        debug!(
            "TF-IDF index over {} sequences, {} distinct k-mers",
            index.n_documents,
            index.document_frequency.len()
        );

        index
    }

    /// Counts the k-mers of every sequence and builds the index in one step.
    ///
    /// # Errors
    /// * Returns `MotifError::InvalidParameter` if `k` is zero
    pub fn from_sequences(sequences: &[Sequence], k: usize) -> Result<Self> {
        let distributions = sequences
            .iter()
            .map(|seq| kmer_distribution(&seq.bases, k))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self::build(
            sequences
                .iter()
                .map(|seq| seq.id.as_str())
                .zip(distributions.iter()),
        ))
    }

    /// Number of sequences in the corpus
    pub fn n_documents(&self) -> usize {
        self.n_documents
    }

    /// Number of sequences containing `kmer` at least once
    pub fn document_frequency(&self, kmer: &str) -> usize {
        self.document_frequency.get(kmer).copied().unwrap_or(0)
    }

    /// Smoothed inverse document frequency of `kmer` in this corpus
    pub fn idf(&self, kmer: &str) -> f64 {
        let df = self.document_frequency(kmer) as f64;
        (1.0 + self.n_documents as f64 / (1.0 + df)).ln()
    }

    /// TF-IDF scores of one sequence
    pub fn scores_for(&self, sequence_id: &str) -> Option<&TfIdfScores> {
        self.scores.get(sequence_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &TfIdfScores)> {
        self.scores.iter().map(|(id, scores)| (id.as_str(), scores))
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }
}
