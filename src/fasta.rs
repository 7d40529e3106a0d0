use crate::error::{MotifError, Result};
use crate::types::Sequence;
use polars::prelude::*;
use std::collections::HashSet;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};

/// Reads sequences from a FASTA format file and converts them into a Polars DataFrame.
///
/// # Arguments
/// * `filename` - Path to the FASTA file to read
///
/// # Returns
/// * `Result<DataFrame>` - A DataFrame with two columns:
///   - "label": The sequence identifiers (without '>' prefix)
///   - "sequence": The corresponding DNA sequences in uppercase
///
/// A header without sequence lines yields an empty sequence.
///
/// # Errors
/// * Returns `MotifError::InvalidFileFormat` if no sequences are found
/// * Returns `MotifError::DataError` if DataFrame creation fails
/// * Returns `MotifError::Io` for file reading issues
pub fn read_fasta(filename: &str) -> Result<DataFrame> {
    let mut sequences: Vec<(String, String)> = Vec::new();
    let file = File::open(filename)?;
    let reader = BufReader::new(file);

    let mut current_header: Option<String> = None;
    let mut current_sequence = String::new();

    for line in reader.lines() {
        let line = line?;
        let line = line.trim();

        if let Some(header) = line.strip_prefix('>') {
            if let Some(previous) = current_header.take() {
                sequences.push((previous, current_sequence.to_uppercase()));
                current_sequence.clear();
            }
            current_header = Some(header.trim().to_string());
        } else if !line.is_empty() {
            if current_header.is_none() {
                return Err(MotifError::InvalidFileFormat(
                    "Sequence data before first header".into(),
                ));
            }
            current_sequence.push_str(line);
        }
    }

    if let Some(header) = current_header {
        sequences.push((header, current_sequence.to_uppercase()));
    }

    if sequences.is_empty() {
        return Err(MotifError::InvalidFileFormat("No sequences found".into()));
    }

    let (labels, sequences): (Vec<String>, Vec<String>) = sequences.into_iter().unzip();
    let df = DataFrame::new(vec![
        Column::new("label".into(), labels),
        Column::new("sequence".into(), sequences),
    ])
    .map_err(|_| MotifError::DataError("Failed to create DataFrame".into()))?;

    Ok(df)
}

fn string_column<'a>(df: &'a DataFrame, name: &str) -> Result<&'a StringChunked> {
    df.column(name)
        .map_err(|e| MotifError::DataError(e.to_string()))?
        .str()
        .map_err(|e| MotifError::DataError(e.to_string()))
}

/// Writes sequences from a Polars DataFrame to a FASTA format file.
///
/// # Arguments
/// * `df` - DataFrame containing sequences with "label" and "sequence" columns
/// * `filename` - Path where the FASTA file should be written
///
/// # Errors
/// * Returns `MotifError::DataError` if required columns are missing or contain nulls
/// * Returns `MotifError::Io` for file writing issues
pub fn write_fasta(df: &DataFrame, filename: &str) -> Result<()> {
    let labels = string_column(df, "label")?;
    let sequences = string_column(df, "sequence")?;

    let mut file = BufWriter::new(File::create(filename)?);

    for (label, sequence) in labels.into_iter().zip(sequences.into_iter()) {
        let (Some(label), Some(sequence)) = (label, sequence) else {
            return Err(MotifError::DataError("Null label or sequence".into()));
        };
        writeln!(file, ">{}", label)?;
        writeln!(file, "{}", sequence)?;
    }

    file.flush()?;
    Ok(())
}

/// Converts a "label"/"sequence" DataFrame into sequences, keeping row order.
///
/// # Errors
/// * Returns `MotifError::DataError` if required columns are missing or contain nulls
/// * Returns `MotifError::DuplicateSequence` if a label occurs twice
pub fn sequences_from_frame(df: &DataFrame) -> Result<Vec<Sequence>> {
    let labels = string_column(df, "label")?;
    let bases = string_column(df, "sequence")?;

    let mut seen = HashSet::with_capacity(df.height());
    labels
        .into_iter()
        .zip(bases.into_iter())
        .map(|(label, bases)| {
            let (Some(label), Some(bases)) = (label, bases) else {
                return Err(MotifError::DataError("Null label or sequence".into()));
            };
            if !seen.insert(label) {
                return Err(MotifError::DuplicateSequence(label.to_string()));
            }
            Ok(Sequence::new(label, bases))
        })
        .collect()
}

/// Reads a FASTA file straight into sequences, in file order.
pub fn read_sequences(filename: &str) -> Result<Vec<Sequence>> {
    sequences_from_frame(&read_fasta(filename)?)
}
