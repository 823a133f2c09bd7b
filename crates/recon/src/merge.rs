use std::collections::HashMap;
use std::fmt;

use serde_json::{Map, Value};

use crate::model::{
    float_value, AllowList, CanonicalStations, Catalog, StationRecord, KEY_ELEVATION, KEY_ID,
    KEY_LAT, KEY_LON, KEY_TYPE,
};

/// Catalog type used when a platform has no entry in the type table.
pub const UNKNOWN_TYPE: &str = "?";

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

/// Non-fatal anomaly found while merging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeDiagnostic {
    /// A previously known station has no canonical upstream entry.
    StationNotFound { id: String },
}

impl fmt::Display for MergeDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StationNotFound { id } => write!(f, "station '{id}' not found in upstream data"),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeSummary {
    /// Position and elevation refreshed.
    pub full_updates: usize,
    /// Elevation refreshed, position kept (not on the allow-list).
    pub elevation_only: usize,
    /// Kept as-is, missing upstream.
    pub not_found: usize,
}

#[derive(Debug)]
pub struct MergeOutcome {
    pub catalog: Catalog,
    pub diagnostics: Vec<MergeDiagnostic>,
    pub summary: MergeSummary,
}

// ---------------------------------------------------------------------------
// Merge
// ---------------------------------------------------------------------------

/// Produce the next catalog from the previous one and the canonical mapping.
///
/// Record count and order are preserved. Per record:
/// - not upstream: kept, `elevation` defaults to `null` when absent
/// - no allow-list, or listed: `lat`/`lon`/`elevation` overwritten
/// - upstream but not listed: only `elevation` overwritten
pub fn merge_catalog(
    canonical: &CanonicalStations,
    previous: &Catalog,
    allow_list: Option<&AllowList>,
) -> MergeOutcome {
    let mut records = Vec::with_capacity(previous.len());
    let mut diagnostics = Vec::new();
    let mut summary = MergeSummary::default();

    for station in previous.iter() {
        let mut next = station.clone();

        match canonical.get(station.id()) {
            None => {
                diagnostics.push(MergeDiagnostic::StationNotFound { id: station.id().to_string() });
                summary.not_found += 1;
                if !next.contains_key(KEY_ELEVATION) {
                    next.set_elevation(None);
                }
            }
            Some(upstream) if allow_list.map_or(true, |list| list.contains(station.id())) => {
                next.set_position(upstream.lat, upstream.lon);
                next.set_elevation(upstream.elevation);
                summary.full_updates += 1;
            }
            Some(upstream) => {
                next.set_elevation(upstream.elevation);
                summary.elevation_only += 1;
            }
        }

        records.push(next);
    }

    MergeOutcome {
        catalog: Catalog::new(records),
        diagnostics,
        summary,
    }
}

/// Build a catalog from scratch, one record per canonical station in upstream
/// order. `types` maps an upstream platform to the catalog `type` value.
pub fn fresh_catalog(canonical: &CanonicalStations, types: &HashMap<String, String>) -> Catalog {
    canonical
        .iter()
        .map(|station| {
            let station_type = station
                .platform
                .as_ref()
                .and_then(|p| types.get(p))
                .map(String::as_str)
                .unwrap_or(UNKNOWN_TYPE);

            let mut fields = Map::new();
            fields.insert(KEY_TYPE.into(), Value::String(station_type.to_string()));
            fields.insert(KEY_ID.into(), Value::String(station.station_id.clone()));
            fields.insert(KEY_LAT.into(), float_value(station.lat));
            fields.insert(KEY_LON.into(), float_value(station.lon));
            fields.insert(
                KEY_ELEVATION.into(),
                station.elevation.map(float_value).unwrap_or(Value::Null),
            );
            StationRecord::with_id(station.station_id.clone(), fields)
        })
        .collect()
}
