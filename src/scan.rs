//! Sliding-window PWM scoring with top-k motif selection.
//!
//! Every (sequence, motif) pair is scored independently. The outcome of a pair
//! is either a score, a skip (sequence shorter than the motif), or a failure
//! (invalid nucleotide). Failures are collected as diagnostics and never stop
//! the rest of the scan.

use crate::error::{MotifError, Result};
use crate::library::PwmLibrary;
use crate::types::{encode_bases, ensure_unique_ids, MotifScore, Pwm, Sequence, TopKSelection};
use log::{debug, info, warn};
use std::collections::BTreeMap;

/// Result of scoring one (sequence, motif) pair
#[derive(Debug)]
pub enum PairOutcome {
    /// Maximum window score
    Scored(f64),
    /// Pair could not be scored but nothing is wrong with the data
    Skipped(MotifError),
    /// Pair could not be scored because of invalid data
    Failed(MotifError),
}

/// A per-pair, per-motif or per-sequence problem observed during an analysis
#[derive(Debug)]
pub struct Diagnostic {
    /// `None` when the problem concerns the sequence as a whole
    pub motif_id: Option<String>,
    /// `None` when the problem concerns the motif as a whole
    pub sequence_id: Option<String>,
    pub error: MotifError,
}

/// sequence_id -> scored motifs, in motif evaluation order.
///
/// Only pairs that could be scored are present.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScoreTable {
    scores: BTreeMap<String, Vec<MotifScore>>,
}

impl ScoreTable {
    fn record(&mut self, sequence_id: &str, motif_id: &str, score: f64) {
        let entry = MotifScore {
            motif_id: motif_id.to_string(),
            score,
        };
        match self.scores.get_mut(sequence_id) {
            Some(scores) => scores.push(entry),
            None => {
                self.scores.insert(sequence_id.to_string(), vec![entry]);
            }
        }
    }

    /// Score of one pair, `None` if it was not scored
    pub fn get(&self, sequence_id: &str, motif_id: &str) -> Option<f64> {
        self.for_sequence(sequence_id)
            .iter()
            .find(|s| s.motif_id == motif_id)
            .map(|s| s.score)
    }

    /// All scores of a sequence in motif evaluation order
    pub fn for_sequence(&self, sequence_id: &str) -> &[MotifScore] {
        self.scores
            .get(sequence_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[MotifScore])> {
        self.scores
            .iter()
            .map(|(id, scores)| (id.as_str(), scores.as_slice()))
    }

    /// Number of scored pairs
    pub fn len(&self) -> usize {
        self.scores.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }
}

/// Everything produced by [`MotifScanEngine::scan`]
#[derive(Debug, Default)]
pub struct ScanReport {
    pub scores: ScoreTable,
    pub selections: BTreeMap<String, TopKSelection>,
    pub diagnostics: Vec<Diagnostic>,
    /// Motifs excluded because their PWM was unavailable, in evaluation order
    pub skipped_motifs: Vec<String>,
    /// Number of pairs skipped because the sequence was shorter than the motif
    pub short_pairs: usize,
}

impl ScanReport {
    /// Top-k motifs of a sequence; empty if none could be scored
    pub fn top_k_for(&self, sequence_id: &str) -> &[MotifScore] {
        self.selections
            .get(sequence_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

/// Score of one window of encoded bases (`window.len() == pwm.len()`)
#[inline]
pub fn score_window(window: &[u8], pwm: &Pwm) -> f64 {
    window
        .iter()
        .enumerate()
        .map(|(i, &nucleotide)| pwm.weight(i, nucleotide))
        .sum()
}

/// Maximum window score over encoded bases at least as long as the motif
fn best_window_score(encoded: &[u8], pwm: &Pwm) -> f64 {
    encoded
        .windows(pwm.len())
        .map(|window| score_window(window, pwm))
        .fold(f64::NEG_INFINITY, f64::max)
}

/// Scores one sequence against one PWM by sliding a window over every offset.
///
/// # Returns
/// * `PairOutcome::Scored` with the maximum window score
/// * `PairOutcome::Skipped` with `MotifError::SequenceTooShort` when the sequence is shorter than the motif
/// * `PairOutcome::Failed` with `MotifError::InvalidNucleotide` for a base outside {A,C,G,T}
pub fn score_sequence(sequence: &Sequence, pwm: &Pwm) -> PairOutcome {
    let encoded = encode_bases(&sequence.bases);
    score_encoded(sequence.len(), encoded.as_deref().map_err(|e| *e), pwm)
}

fn score_encoded(
    sequence_length: usize,
    encoded: std::result::Result<&[u8], (usize, char)>,
    pwm: &Pwm,
) -> PairOutcome {
    if sequence_length < pwm.len() {
        return PairOutcome::Skipped(MotifError::SequenceTooShort {
            sequence_length,
            motif_length: pwm.len(),
        });
    }
    match encoded {
        Ok(encoded) => PairOutcome::Scored(best_window_score(encoded, pwm)),
        Err((position, base)) => {
            PairOutcome::Failed(MotifError::invalid_nucleotide(position, base))
        }
    }
}

/// Selects the `k` best scores, descending. Equal scores keep their input order.
pub fn select_top_k(scores: &[MotifScore], k: usize) -> TopKSelection {
    let mut ranked = scores.to_vec();
    // sort_by is stable: ties stay in motif evaluation order
    ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
    ranked.truncate(k);
    ranked
}

/// Scans sequences against every motif of a library
#[derive(Debug, Clone, Copy)]
pub struct MotifScanEngine {
    top_k: usize,
}

impl MotifScanEngine {
    /// # Errors
    /// * Returns `MotifError::InvalidParameter` if `top_k` is zero
    pub fn new(top_k: usize) -> Result<Self> {
        if top_k == 0 {
            return Err(MotifError::invalid_parameter(
                "top_k",
                top_k,
                "at least one motif must be selected per sequence",
            ));
        }
        Ok(MotifScanEngine { top_k })
    }

    pub fn top_k(&self) -> usize {
        self.top_k
    }

    /// Scores every (sequence, motif) pair and selects the top-k motifs per sequence.
    ///
    /// Motifs are evaluated in library order, which is also the tie-break
    /// order of the selection.
    ///
    /// # Errors
    /// * Returns `MotifError::DuplicateSequence` if two sequences share an id
    pub fn scan(&self, sequences: &[Sequence], library: &PwmLibrary) -> Result<ScanReport> {
        ensure_unique_ids(sequences)?;

        info!(
            "Scanning {} sequences against {} motifs",
            sequences.len(),
            library.len()
        );

        // encode once, reused by every motif
        let encoded: Vec<(usize, std::result::Result<Vec<u8>, (usize, char)>)> = sequences
            .iter()
            .map(|seq| (seq.len(), encode_bases(&seq.bases)))
            .collect();

        let mut report = ScanReport::default();

        for (motif_id, pwm) in library.entries() {
            let Some(pwm) = pwm else {
                warn!("Skipping motif {}: PWM unavailable", motif_id);
                report.skipped_motifs.push(motif_id.to_string());
                report.diagnostics.push(Diagnostic {
                    motif_id: Some(motif_id.to_string()),
                    sequence_id: None,
                    error: MotifError::MotifUnavailable(motif_id.to_string()),
                });
                continue;
            };

            debug!("Scoring motif {} (length {})", motif_id, pwm.len());

            for (seq, (length, bases)) in sequences.iter().zip(&encoded) {
                match score_encoded(*length, bases.as_deref().map_err(|e| *e), pwm) {
                    PairOutcome::Scored(score) => report.scores.record(&seq.id, motif_id, score),
                    PairOutcome::Skipped(_) => report.short_pairs += 1,
                    PairOutcome::Failed(error) => {
                        warn!("Failed to score {} against {}: {}", seq.id, motif_id, error);
                        report.diagnostics.push(Diagnostic {
                            motif_id: Some(motif_id.to_string()),
                            sequence_id: Some(seq.id.clone()),
                            error,
                        });
                    }
                }
            }
        }

        report.selections = report
            .scores
            .iter()
            .map(|(id, scores)| (id.to_string(), select_top_k(scores, self.top_k)))
            .collect();

        debug!(
            "{} pairs scored, {} pairs too short, {} motifs skipped",
            report.scores.len(),
            report.short_pairs,
            report.skipped_motifs.len()
        );

        Ok(report)
    }
}
