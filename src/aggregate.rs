use crate::config::AnalysisConfig;
use crate::error::{MotifError, Result};
use crate::features::{gc_content, kmer_distribution};
use crate::library::PwmLibrary;
use crate::scan::{Diagnostic, MotifScanEngine, ScanReport, ScoreTable};
use crate::tfidf::CorpusTfIdfIndex;
use crate::types::{ensure_unique_ids, FeatureRecord, KmerDistribution, Sequence};
use log::{info, warn};
use polars::prelude::*;

/// Per-sequence features that do not depend on motifs
#[derive(Debug, Clone, PartialEq)]
pub struct SequenceFeatures {
    pub gc_content: f64,
    pub kmer_distribution: KmerDistribution,
}

/// Computes GC content and k-mer distribution of one sequence.
///
/// # Errors
/// * Returns `MotifError::InvalidParameter` if `k` is zero
pub fn extract_features(sequence: &Sequence, k: usize) -> Result<SequenceFeatures> {
    Ok(SequenceFeatures {
        gc_content: gc_content(&sequence.bases),
        kmer_distribution: kmer_distribution(&sequence.bases, k)?,
    })
}

/// Joins per-sequence features, TF-IDF scores and top-k motifs into one record per sequence.
///
/// `features` must be aligned with `sequences`. Sequences missing from the
/// TF-IDF index or the scan get empty mappings.
pub fn aggregate(
    sequences: &[Sequence],
    features: Vec<SequenceFeatures>,
    tf_idf: &CorpusTfIdfIndex,
    scan: &ScanReport,
) -> Vec<FeatureRecord> {
    sequences
        .iter()
        .zip(features)
        .map(|(seq, features)| FeatureRecord {
            sequence_id: seq.id.clone(),
            gc_content: features.gc_content,
            kmer_distribution: features.kmer_distribution,
            tf_idf_scores: tf_idf.scores_for(&seq.id).cloned().unwrap_or_default(),
            top_k_motifs: scan.top_k_for(&seq.id).to_vec(),
        })
        .collect()
}

/// Adds a sequence-level diagnostic for every sequence with a base outside
/// {A,C,G,T} that no (sequence, motif) pair reported, e.g. because it is
/// shorter than every motif.
fn report_invalid_sequences(sequences: &[Sequence], diagnostics: &mut Vec<Diagnostic>) {
    for seq in sequences {
        let Err(error) = seq.encode() else {
            continue;
        };
        let reported = diagnostics
            .iter()
            .any(|d| d.sequence_id.as_deref() == Some(seq.id.as_str()));
        if !reported {
            warn!("Sequence {}: {}", seq.id, error);
            diagnostics.push(Diagnostic {
                motif_id: None,
                sequence_id: Some(seq.id.clone()),
                error,
            });
        }
    }
}

/// Output of a full feature extraction run
#[derive(Debug)]
pub struct Analysis {
    /// One record per input sequence, in input order
    pub records: Vec<FeatureRecord>,
    /// Every scored (sequence, motif) pair
    pub scores: ScoreTable,
    pub diagnostics: Vec<Diagnostic>,
    pub skipped_motifs: Vec<String>,
}

/// Runs feature extraction, TF-IDF indexing and motif scanning over a sequence collection.
///
/// # Arguments
/// * `sequences` - Input sequences; ids must be unique
/// * `library` - Populated motif library, in evaluation order
/// * `config` - k-mer length and number of motifs kept per sequence
///
/// # Errors
/// * `MotifError::InvalidParameter` - If `config` is invalid
/// * `MotifError::DuplicateSequence` - If two sequences share an id
///
/// Unavailable motifs and invalid nucleotides are not errors: they are
/// reported in [`Analysis::diagnostics`]. A sequence with an invalid base
/// always gets at least one diagnostic, even when no motif could be scored
/// against it.
pub fn analyze(
    sequences: &[Sequence],
    library: &PwmLibrary,
    config: &AnalysisConfig,
) -> Result<Analysis> {
    config.validate()?;
    ensure_unique_ids(sequences)?;

    info!(
        "Analyzing {} sequences (k = {}, top {} motifs)",
        sequences.len(),
        config.kmer_size,
        config.top_k
    );

    let features = sequences
        .iter()
        .map(|seq| extract_features(seq, config.kmer_size))
        .collect::<Result<Vec<_>>>()?;

    let tf_idf = CorpusTfIdfIndex::build(
        sequences
            .iter()
            .map(|seq| seq.id.as_str())
            .zip(features.iter().map(|f| &f.kmer_distribution)),
    );

    let mut scan = MotifScanEngine::new(config.top_k)?.scan(sequences, library)?;
    report_invalid_sequences(sequences, &mut scan.diagnostics);
    let records = aggregate(sequences, features, &tf_idf, &scan);

    info!(
        "Built {} feature records, {} diagnostics",
        records.len(),
        scan.diagnostics.len()
    );

    Ok(Analysis {
        records,
        scores: scan.scores,
        diagnostics: scan.diagnostics,
        skipped_motifs: scan.skipped_motifs,
    })
}

impl Analysis {
    /// One row per sequence.
    ///
    /// # Returns
    /// * `Result<DataFrame>` - Columns "sequence_id", "gc_content", "total_kmers",
    ///   "distinct_kmers", "top_motif" and "top_score" (null when no motif was scored)
    pub fn summary_frame(&self) -> Result<DataFrame> {
        let ids: Vec<&str> = self.records.iter().map(|r| r.sequence_id.as_str()).collect();
        let gc: Vec<f64> = self.records.iter().map(|r| r.gc_content).collect();
        let total: Vec<u64> = self
            .records
            .iter()
            .map(|r| r.kmer_distribution.values().sum::<usize>() as u64)
            .collect();
        let distinct: Vec<u64> = self
            .records
            .iter()
            .map(|r| r.kmer_distribution.len() as u64)
            .collect();
        let top_motif: Vec<Option<&str>> = self
            .records
            .iter()
            .map(|r| r.top_k_motifs.first().map(|m| m.motif_id.as_str()))
            .collect();
        let top_score: Vec<Option<f64>> = self
            .records
            .iter()
            .map(|r| r.top_k_motifs.first().map(|m| m.score))
            .collect();

        DataFrame::new(vec![
            Column::new("sequence_id".into(), ids),
            Column::new("gc_content".into(), gc),
            Column::new("total_kmers".into(), total),
            Column::new("distinct_kmers".into(), distinct),
            Column::new("top_motif".into(), top_motif),
            Column::new("top_score".into(), top_score),
        ])
        .map_err(|e| MotifError::DataError(e.to_string()))
    }

    /// One row per (sequence, k-mer) with columns "sequence_id", "kmer", "count" and "tf_idf"
    pub fn kmer_frame(&self) -> Result<DataFrame> {
        let mut ids: Vec<&str> = Vec::new();
        let mut kmers: Vec<&str> = Vec::new();
        let mut counts: Vec<u64> = Vec::new();
        let mut tf_idf: Vec<f64> = Vec::new();

        for record in &self.records {
            for (kmer, &count) in &record.kmer_distribution {
                ids.push(&record.sequence_id);
                kmers.push(kmer);
                counts.push(count as u64);
                tf_idf.push(record.tf_idf_scores.get(kmer).copied().unwrap_or(0.0));
            }
        }

        DataFrame::new(vec![
            Column::new("sequence_id".into(), ids),
            Column::new("kmer".into(), kmers),
            Column::new("count".into(), counts),
            Column::new("tf_idf".into(), tf_idf),
        ])
        .map_err(|e| MotifError::DataError(e.to_string()))
    }

    /// One row per selected motif with columns "sequence_id", "rank" (1-based), "motif_id" and "score"
    pub fn motif_frame(&self) -> Result<DataFrame> {
        let mut ids: Vec<&str> = Vec::new();
        let mut ranks: Vec<u32> = Vec::new();
        let mut motifs: Vec<&str> = Vec::new();
        let mut scores: Vec<f64> = Vec::new();

        for record in &self.records {
            for (rank, hit) in record.top_k_motifs.iter().enumerate() {
                ids.push(&record.sequence_id);
                ranks.push(rank as u32 + 1);
                motifs.push(&hit.motif_id);
                scores.push(hit.score);
            }
        }

        DataFrame::new(vec![
            Column::new("sequence_id".into(), ids),
            Column::new("rank".into(), ranks),
            Column::new("motif_id".into(), motifs),
            Column::new("score".into(), scores),
        ])
        .map_err(|e| MotifError::DataError(e.to_string()))
    }
}
