use std::fmt;

#[derive(Debug)]
pub enum ReconError {
    /// TOML parse / deserialization error.
    ConfigParse(String),
    /// Policy validation error (empty priority list, duplicate category, etc.).
    ConfigValidation(String),
    /// Upstream latitude/longitude text is not a number.
    CoordinateParse { record: usize, field: &'static str, value: String },
    /// Upstream elevation text is not a number.
    ElevationParse { station_id: String, value: String },
    /// Catalog record is missing a required key or has the wrong value type.
    InvalidRecord { index: usize, reason: String },
    /// Two catalog records do not share the same ordered key set.
    InconsistentSchema { index: usize, expected: Vec<String>, found: Vec<String> },
}

impl fmt::Display for ReconError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConfigParse(msg) => write!(f, "policy parse error: {msg}"),
            Self::ConfigValidation(msg) => write!(f, "policy validation error: {msg}"),
            Self::CoordinateParse { record, field, value } => {
                write!(f, "upstream record {record}: cannot parse {field} '{value}'")
            }
            Self::ElevationParse { station_id, value } => {
                write!(f, "station '{station_id}': cannot parse elevation '{value}'")
            }
            Self::InvalidRecord { index, reason } => {
                write!(f, "catalog record {index}: {reason}")
            }
            Self::InconsistentSchema { index, expected, found } => write!(
                f,
                "inconsistent schema: record {index} has keys [{}], expected [{}]",
                found.join(", "),
                expected.join(", "),
            ),
        }
    }
}

impl std::error::Error for ReconError {}
