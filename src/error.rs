use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MotifError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Invalid nucleotide '{base}' at position {position}")]
    InvalidNucleotide { position: usize, base: char },

    #[error("Sequence of length {sequence_length} is shorter than motif of length {motif_length}")]
    SequenceTooShort {
        sequence_length: usize,
        motif_length: usize,
    },

    #[error("Motif unavailable: {0}")]
    MotifUnavailable(String),

    #[error("Duplicate motif id: {0}")]
    DuplicateMotif(String),

    #[error("Duplicate sequence id: {0}")]
    DuplicateSequence(String),

    #[error("Invalid PWM format: {0}")]
    InvalidPwm(String),

    #[error("Invalid file format: {0}")]
    InvalidFileFormat(String),

    #[error("Data error: {0}")]
    DataError(String),

    #[error("Invalid parameter: {name} = {value}, {message}")]
    InvalidParameter {
        name: String,
        value: String,
        message: String,
    },
}

/// Type alias for Result with MotifError
pub type Result<T> = std::result::Result<T, MotifError>;

impl MotifError {
    /// Create a new InvalidNucleotide error
    pub fn invalid_nucleotide(position: usize, base: char) -> Self {
        MotifError::InvalidNucleotide { position, base }
    }

    /// Create a new InvalidPwm error
    pub fn invalid_pwm(message: impl Into<String>) -> Self {
        MotifError::InvalidPwm(message.into())
    }

    /// Create a new InvalidParameter error
    pub fn invalid_parameter(
        name: impl Into<String>,
        value: impl ToString,
        message: impl Into<String>,
    ) -> Self {
        MotifError::InvalidParameter {
            name: name.into(),
            value: value.to_string(),
            message: message.into(),
        }
    }
}
