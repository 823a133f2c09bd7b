use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::ReconError;

// ---------------------------------------------------------------------------
// Update policy
// ---------------------------------------------------------------------------

/// Category priorities used when building canonical records.
///
/// Both lists are best-first. Categories not listed are never selected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct UpdatePolicy {
    /// Identifier categories, in order of preference for the station id.
    pub identifier_priority: Vec<String>,
    /// Elevation measurement bases trusted for the catalog elevation.
    pub elevation_priority: Vec<String>,
}

impl Default for UpdatePolicy {
    fn default() -> Self {
        Self {
            identifier_priority: vec!["NEXRAD".into(), "ICAO".into()],
            elevation_priority: vec!["GROUND".into()],
        }
    }
}

// ---------------------------------------------------------------------------
// Parse + Validate
// ---------------------------------------------------------------------------

impl UpdatePolicy {
    pub fn from_toml(input: &str) -> Result<Self, ReconError> {
        let policy: UpdatePolicy =
            toml::from_str(input).map_err(|e| ReconError::ConfigParse(e.to_string()))?;
        policy.validate()?;
        Ok(policy)
    }

    pub fn validate(&self) -> Result<(), ReconError> {
        check_priority("identifier_priority", &self.identifier_priority)?;
        check_priority("elevation_priority", &self.elevation_priority)
    }
}

fn check_priority(name: &str, list: &[String]) -> Result<(), ReconError> {
    if list.is_empty() {
        return Err(ReconError::ConfigValidation(format!("{name} must not be empty")));
    }

    let mut seen = HashSet::new();
    for category in list {
        if category.trim().is_empty() {
            return Err(ReconError::ConfigValidation(format!(
                "{name} contains an empty category"
            )));
        }
        if !seen.insert(category.as_str()) {
            return Err(ReconError::ConfigValidation(format!(
                "{name} lists '{category}' more than once"
            )));
        }
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
