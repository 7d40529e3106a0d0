use crate::error::{MotifError, Result};
use crate::types::{MotifEntry, Pwm};
use log::{debug, warn};
use std::collections::HashMap;
use std::fmt::Display;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::iter::Peekable;

/// In-memory motif_id -> PWM associations, in load order.
///
/// Load order is the motif evaluation order of a scan and therefore the
/// tie-break order of top-k selection. Ids whose matrix could not be obtained
/// stay in the order as unavailable entries.
#[derive(Debug, Clone, Default)]
pub struct PwmLibrary {
    entries: Vec<(String, Option<Pwm>)>,
    index: HashMap<String, usize>,
}

impl PwmLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a library from entries, keeping their order.
    ///
    /// # Errors
    /// * Returns `MotifError::DuplicateMotif` if a motif id occurs twice
    pub fn from_entries<I>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = MotifEntry>,
    {
        let mut library = Self::new();
        for entry in entries {
            library.insert(entry.motif_id, entry.pwm)?;
        }
        Ok(library)
    }

    /// Populates a library by calling `fetch` for every id, before any scanning takes place.
    ///
    /// A failed fetch is logged and the id is kept as unavailable.
    ///
    /// # Example
    /// ```
    /// use motif_features::library::PwmLibrary;
    /// use motif_features::types::Pwm;
    ///
    /// let library = PwmLibrary::fetch_all(["M1", "M2"], |id| match id {
    ///     "M1" => Pwm::new(&[[1.0, 0.0, 0.0, 0.0]]),
    ///     _ => Err(motif_features::error::MotifError::MotifUnavailable(id.to_string())),
    /// })
    /// .unwrap();
    /// assert_eq!(library.available_count(), 1);
    /// assert_eq!(library.unavailable_ids().collect::<Vec<_>>(), vec!["M2"]);
    /// ```
    ///
    /// # Errors
    /// * Returns `MotifError::DuplicateMotif` if an id is requested twice
    pub fn fetch_all<I, S, F, E>(motif_ids: I, mut fetch: F) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
        F: FnMut(&str) -> std::result::Result<Pwm, E>,
        E: Display,
    {
        let mut library = Self::new();
        for motif_id in motif_ids {
            let motif_id = motif_id.as_ref();
            match fetch(motif_id) {
                Ok(pwm) => library.insert(motif_id, pwm)?,
                Err(e) => {
                    warn!("Failed to fetch PWM for {}: {}", motif_id, e);
                    library.mark_unavailable(motif_id)?;
                }
            }
        }
        debug!(
            "Fetched {} of {} PWMs",
            library.available_count(),
            library.len()
        );
        Ok(library)
    }

    /// Adds a matrix at the end of the evaluation order.
    ///
    /// # Errors
    /// * Returns `MotifError::DuplicateMotif` if the id is already present
    pub fn insert(&mut self, motif_id: impl Into<String>, pwm: Pwm) -> Result<()> {
        self.push(motif_id.into(), Some(pwm))
    }

    /// Records a motif whose matrix could not be obtained.
    ///
    /// # Errors
    /// * Returns `MotifError::DuplicateMotif` if the id is already present
    pub fn mark_unavailable(&mut self, motif_id: impl Into<String>) -> Result<()> {
        self.push(motif_id.into(), None)
    }

    fn push(&mut self, motif_id: String, pwm: Option<Pwm>) -> Result<()> {
        if self.index.contains_key(&motif_id) {
            return Err(MotifError::DuplicateMotif(motif_id));
        }
        self.index.insert(motif_id.clone(), self.entries.len());
        self.entries.push((motif_id, pwm));
        Ok(())
    }

    /// Looks up the matrix of a motif; `None` when unknown or unavailable
    pub fn lookup(&self, motif_id: &str) -> Option<&Pwm> {
        self.index
            .get(motif_id)
            .and_then(|&i| self.entries[i].1.as_ref())
    }

    /// All entries in evaluation order
    pub fn entries(&self) -> impl Iterator<Item = (&str, Option<&Pwm>)> {
        self.entries
            .iter()
            .map(|(id, pwm)| (id.as_str(), pwm.as_ref()))
    }

    pub fn motif_ids(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(id, _)| id.as_str())
    }

    pub fn unavailable_ids(&self) -> impl Iterator<Item = &str> {
        self.entries
            .iter()
            .filter(|(_, pwm)| pwm.is_none())
            .map(|(id, _)| id.as_str())
    }

    pub fn available_count(&self) -> usize {
        self.entries.iter().filter(|(_, pwm)| pwm.is_some()).count()
    }

    /// Number of motifs, available or not
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Advances the iterator until a MOTIF line is found
fn skip_until_motif<I>(lines: &mut Peekable<I>) -> Result<()>
where
    I: Iterator<Item = std::io::Result<String>>,
{
    while let Some(line) = lines.peek() {
        if let Ok(line) = line {
            if line.starts_with("MOTIF") {
                break;
            }
        }
        lines.next().transpose()?;
    }
    Ok(())
}

/// Parses whitespace separated weights, `None` if the line is not a matrix row
fn parse_row(line: &str) -> Option<Vec<f64>> {
    let values = line
        .split_whitespace()
        .map(|s| s.parse::<f64>())
        .collect::<std::result::Result<Vec<_>, _>>()
        .ok()?;
    (!values.is_empty()).then_some(values)
}

/// Parses a single PWM from the iterator
fn parse_pwm<I>(lines: &mut Peekable<I>) -> Result<Option<(String, Pwm)>>
where
    I: Iterator<Item = std::io::Result<String>>,
{
    // Get motif ID from MOTIF line
    let motif_line = match lines.next().transpose()? {
        Some(line) if line.starts_with("MOTIF") => line,
        _ => return Ok(None),
    };

    let motif_id = motif_line
        .split_whitespace()
        .nth(1)
        .ok_or_else(|| MotifError::InvalidFileFormat("Missing motif ID".into()))?
        .to_string();

    // Skip header lines up to the matrix declaration
    loop {
        match lines.peek() {
            Some(Ok(line)) if line.starts_with("MOTIF") => {
                return Err(MotifError::InvalidFileFormat(format!(
                    "Missing letter-probability matrix for motif {}",
                    motif_id
                )))
            }
            Some(_) => {
                let line = lines.next().transpose()?.unwrap_or_default();
                if line.trim_start().starts_with("letter-probability matrix") {
                    break;
                }
            }
            None => {
                return Err(MotifError::InvalidFileFormat(format!(
                    "Missing letter-probability matrix for motif {}",
                    motif_id
                )))
            }
        }
    }

    // Read PWM rows until we hit a non-PWM line
    let mut rows: Vec<[f64; 4]> = Vec::new();
    while let Some(Ok(line)) = lines.peek() {
        if line.trim().is_empty() && rows.is_empty() {
            lines.next();
            continue;
        }
        let Some(values) = parse_row(line) else {
            break;
        };
        let row: [f64; 4] = values.as_slice().try_into().map_err(|_| {
            MotifError::InvalidFileFormat(format!(
                "Invalid PWM row for motif {}: expected 4 values, found {}",
                motif_id,
                values.len()
            ))
        })?;
        rows.push(row);
        lines.next();
    }

    if rows.is_empty() {
        return Err(MotifError::InvalidFileFormat(format!(
            "Empty PWM for motif {}",
            motif_id
        )));
    }

    Ok(Some((motif_id, Pwm::new(&rows)?)))
}

/// Parses MEME formatted PWMs from a reader into a library, in file order.
///
/// # Errors
/// * `MotifError::Io` - If the input cannot be read
/// * `MotifError::InvalidFileFormat` - If a motif block is malformed or no PWMs are found
/// * `MotifError::DuplicateMotif` - If a motif id appears twice
pub fn parse_meme<R: BufRead>(reader: R) -> Result<PwmLibrary> {
    let mut lines = reader.lines().peekable();
    let mut library = PwmLibrary::new();

    // Skip header until first MOTIF
    skip_until_motif(&mut lines)?;

    while let Some((id, pwm)) = parse_pwm(&mut lines)? {
        library.insert(id, pwm)?;
        skip_until_motif(&mut lines)?;
    }

    if library.is_empty() {
        return Err(MotifError::InvalidFileFormat("No PWMs found".into()));
    }

    Ok(library)
}

/// Reads Position Weight Matrices (PWMs) from a MEME format file
///
/// Each PWM is preceded by a "MOTIF" line containing the motif ID and a
/// "letter-probability matrix" line, followed by one row of A, C, G, T weights
/// per motif position.
///
/// # Arguments
/// * `filename` - Path to the MEME format file to read
///
/// # Returns
/// * `Result<PwmLibrary>` - The motifs in the order they appear in the file
///
/// # Example
/// ```ignore
/// use motif_features::library::read_meme;
///
/// let library = read_meme("path/to/motifs.meme").unwrap();
/// for motif_id in library.motif_ids() {
///     println!("Found motif: {}", motif_id);
/// }
/// ```
pub fn read_meme(filename: &str) -> Result<PwmLibrary> {
    let file = File::open(filename)?;
    parse_meme(BufReader::new(file))
}
