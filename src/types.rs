use crate::error::{MotifError, Result};
use ndarray::{Array2, ArrayView1};
use phf::phf_map;
use polars::prelude::*;
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};

/// Column order of every PWM: A, C, G, T
pub const NUCLEOTIDES: [char; 4] = ['A', 'C', 'G', 'T'];

static NUCLEOTIDE_INDEX: phf::Map<char, u8> = phf_map! {
    'A' => 0,
    'C' => 1,
    'G' => 2,
    'T' => 3,
};

/// Maps a base onto its PWM column, or `None` for anything outside {A,C,G,T}.
pub fn nucleotide_index(base: char) -> Option<u8> {
    NUCLEOTIDE_INDEX.get(&base).copied()
}

/// A named DNA sequence over the closed alphabet {A,C,G,T}
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Sequence {
    pub id: String,
    pub bases: String,
}

impl Sequence {
    pub fn new(id: impl Into<String>, bases: impl Into<String>) -> Self {
        Sequence {
            id: id.into(),
            bases: bases.into(),
        }
    }

    /// Number of bases (characters) in the sequence
    pub fn len(&self) -> usize {
        self.bases.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.bases.is_empty()
    }

    /// Encodes the bases as PWM column indices.
    ///
    /// # Errors
    /// * `MotifError::InvalidNucleotide` for the first base outside {A,C,G,T}
    pub fn encode(&self) -> Result<Vec<u8>> {
        encode_bases(&self.bases)
            .map_err(|(position, base)| MotifError::invalid_nucleotide(position, base))
    }
}

/// Encodes bases as PWM column indices, or returns the position and value of
/// the first base outside {A,C,G,T}.
pub(crate) fn encode_bases(bases: &str) -> std::result::Result<Vec<u8>, (usize, char)> {
    bases
        .chars()
        .enumerate()
        .map(|(position, base)| nucleotide_index(base).ok_or((position, base)))
        .collect()
}

/// # Errors
/// * Returns `MotifError::DuplicateSequence` for the first id seen twice
pub fn ensure_unique_ids(sequences: &[Sequence]) -> Result<()> {
    let mut seen = HashSet::with_capacity(sequences.len());
    match sequences.iter().find(|seq| !seen.insert(seq.id.as_str())) {
        Some(dup) => Err(MotifError::DuplicateSequence(dup.id.clone())),
        None => Ok(()),
    }
}

/// Represents a Position Weight Matrix (PWM)
///
/// Stored as an `L x 4` matrix whose columns are always A, C, G, T.
#[derive(Debug, Clone, PartialEq)]
pub struct Pwm {
    weights: Array2<f64>,
}

impl Pwm {
    /// Builds a PWM from one `[A, C, G, T]` row per motif position.
    ///
    /// # Errors
    /// * Returns `MotifError::InvalidPwm` if there are no rows or any weight is not finite
    pub fn new(rows: &[[f64; 4]]) -> Result<Self> {
        if rows.is_empty() {
            return Err(MotifError::invalid_pwm("PWM must have at least one position"));
        }
        if let Some(position) = rows
            .iter()
            .position(|row| row.iter().any(|w| !w.is_finite()))
        {
            return Err(MotifError::invalid_pwm(format!(
                "non-finite weight at position {}",
                position
            )));
        }

        let flat: Vec<f64> = rows.iter().flatten().copied().collect();
        let weights = Array2::from_shape_vec((rows.len(), 4), flat)
            .map_err(|e| MotifError::invalid_pwm(e.to_string()))?;

        Ok(Pwm { weights })
    }

    /// Reads a PWM from a DataFrame with one row per position and columns "A", "C", "G", "T".
    ///
    /// Columns are looked up by name, so their order in the frame does not matter.
    ///
    /// # Errors
    /// * Returns `MotifError::DataError` if a column is missing or not numeric
    /// * Returns `MotifError::InvalidPwm` for empty frames, null or non-finite weights
    pub fn from_dataframe(df: &DataFrame) -> Result<Self> {
        let mut columns: Vec<Vec<f64>> = Vec::with_capacity(4);
        for name in NUCLEOTIDES {
            let column = df
                .column(&name.to_string())
                .map_err(|e| MotifError::DataError(e.to_string()))?
                .cast(&DataType::Float64)
                .map_err(|e| MotifError::DataError(e.to_string()))?;
            let values = column
                .f64()
                .map_err(|e| MotifError::DataError(e.to_string()))?
                .into_iter()
                .collect::<Option<Vec<f64>>>()
                .ok_or_else(|| MotifError::invalid_pwm(format!("null weight in column {}", name)))?;
            columns.push(values);
        }

        let rows: Vec<[f64; 4]> = (0..df.height())
            .map(|i| [columns[0][i], columns[1][i], columns[2][i], columns[3][i]])
            .collect();

        Pwm::new(&rows)
    }

    /// Converts the PWM into a DataFrame with columns A, C, G, T
    pub fn to_dataframe(&self) -> Result<DataFrame> {
        let columns = NUCLEOTIDES
            .iter()
            .enumerate()
            .map(|(j, name)| {
                Column::new(
                    name.to_string().into(),
                    self.weights.column(j).to_vec(),
                )
            })
            .collect();

        DataFrame::new(columns).map_err(|e| MotifError::DataError(e.to_string()))
    }

    /// Motif length (number of positions)
    pub fn len(&self) -> usize {
        self.weights.nrows()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.nrows() == 0
    }

    /// Weights of one position, in A, C, G, T order
    pub fn row(&self, position: usize) -> ArrayView1<'_, f64> {
        self.weights.row(position)
    }

    /// Weight of the nucleotide with column index `nucleotide` at `position`
    #[inline]
    pub fn weight(&self, position: usize, nucleotide: u8) -> f64 {
        self.weights[[position, nucleotide as usize]]
    }
}

/// A motif identifier together with its matrix
#[derive(Debug, Clone, PartialEq)]
pub struct MotifEntry {
    pub motif_id: String,
    pub pwm: Pwm,
}

impl MotifEntry {
    pub fn new(motif_id: impl Into<String>, pwm: Pwm) -> Self {
        MotifEntry {
            motif_id: motif_id.into(),
            pwm,
        }
    }
}

/// Occurrence count of each k-mer within one sequence
pub type KmerDistribution = BTreeMap<String, usize>;

/// TF-IDF weight of each k-mer within one sequence
pub type TfIdfScores = BTreeMap<String, f64>;

/// Best sliding-window score of one motif against one sequence
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MotifScore {
    pub motif_id: String,
    pub score: f64,
}

/// Highest scoring motifs of a sequence, score descending
pub type TopKSelection = Vec<MotifScore>;

/// All features computed for one input sequence
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureRecord {
    pub sequence_id: String,
    pub gc_content: f64,
    pub kmer_distribution: KmerDistribution,
    pub tf_idf_scores: TfIdfScores,
    pub top_k_motifs: TopKSelection,
}
