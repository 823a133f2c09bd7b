use std::fmt;
use std::path::Path;

use radarsite_recon::ReconError;

#[derive(Debug)]
pub enum IoError {
    /// File could not be read.
    Read { path: String, message: String },
    /// File could not be written or renamed into place.
    Write { path: String, message: String },
    /// Text is not valid JSON of the expected shape.
    Json { what: &'static str, message: String },
    /// Allow-list CSV is malformed.
    Csv(String),
    /// An upstream station entry does not have the expected fields.
    Snapshot { index: usize, message: String },
    /// Catalog content rejected by the engine (missing keys, inconsistent schema).
    Catalog(ReconError),
    /// Re-reading a written catalog did not reproduce it.
    RoundTrip(String),
    /// A station's lat/lon is not numeric.
    Coordinate { id: String, key: &'static str },
}

impl IoError {
    pub fn read(path: &Path, err: impl fmt::Display) -> Self {
        Self::Read { path: path.display().to_string(), message: err.to_string() }
    }

    pub fn write(path: &Path, err: impl fmt::Display) -> Self {
        Self::Write { path: path.display().to_string(), message: err.to_string() }
    }

    /// True for the fatal "records do not share one key set" condition.
    pub fn is_inconsistent_schema(&self) -> bool {
        matches!(self, Self::Catalog(ReconError::InconsistentSchema { .. }))
    }
}

impl fmt::Display for IoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read { path, message } => write!(f, "cannot read {path}: {message}"),
            Self::Write { path, message } => write!(f, "cannot write {path}: {message}"),
            Self::Json { what, message } => write!(f, "invalid {what}: {message}"),
            Self::Csv(msg) => write!(f, "allow-list CSV error: {msg}"),
            Self::Snapshot { index, message } => {
                write!(f, "upstream station {index}: {message}")
            }
            Self::Catalog(err) => write!(f, "{err}"),
            Self::RoundTrip(msg) => write!(f, "round-trip verification failed: {msg}"),
            Self::Coordinate { id, key } => {
                write!(f, "station '{id}': '{key}' is not a number")
            }
        }
    }
}

impl std::error::Error for IoError {}

impl From<ReconError> for IoError {
    fn from(err: ReconError) -> Self {
        Self::Catalog(err)
    }
}
