use std::collections::{HashMap, HashSet};

use serde::{Serialize, Serializer};
use serde_json::{Map, Number, Value};

use crate::error::ReconError;

// ---------------------------------------------------------------------------
// Upstream input
// ---------------------------------------------------------------------------

/// One alternate name/code reported upstream for a station (e.g. `NEXRAD:KTLX`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawIdentifier {
    pub category: String,
    pub value: String,
}

/// One upstream elevation entry, tagged by measurement basis (`GROUND`, `SEA`, ...).
/// The value stays textual until the selector picks a winner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawElevation {
    pub category: String,
    pub value_text: String,
}

/// A decoded upstream station record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawStationRecord {
    pub identifiers: Vec<RawIdentifier>,
    pub elevations: Vec<RawElevation>,
    pub latitude: String,
    pub longitude: String,
    /// Upstream platform names (`NEXRAD`, `TDWR`, ...), first is primary.
    pub platforms: Vec<String>,
}

// ---------------------------------------------------------------------------
// Canonical mapping
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct CanonicalStation {
    pub station_id: String,
    pub lat: f64,
    pub lon: f64,
    /// Ground elevation in feet, `None` when upstream has no ground measurement.
    pub elevation: Option<f64>,
    pub platform: Option<String>,
}

/// Deduplicated station id → canonical fields, in first-seen upstream order.
#[derive(Debug, Default)]
pub struct CanonicalStations {
    stations: Vec<CanonicalStation>,
    index: HashMap<String, usize>,
    /// Upstream records skipped because their id was already taken.
    pub duplicates_dropped: usize,
    /// Upstream records skipped because no identifier had a ranked category.
    pub unidentified: usize,
}

impl CanonicalStations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert unless the id is already present. Returns `false` on collision.
    pub fn insert(&mut self, station: CanonicalStation) -> bool {
        if self.index.contains_key(&station.station_id) {
            return false;
        }
        self.index.insert(station.station_id.clone(), self.stations.len());
        self.stations.push(station);
        true
    }

    pub fn get(&self, station_id: &str) -> Option<&CanonicalStation> {
        self.index.get(station_id).map(|&i| &self.stations[i])
    }

    pub fn contains(&self, station_id: &str) -> bool {
        self.index.contains_key(station_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CanonicalStation> {
        self.stations.iter()
    }

    pub fn len(&self) -> usize {
        self.stations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Persisted catalog
// ---------------------------------------------------------------------------

pub const KEY_ID: &str = "id";
pub const KEY_TYPE: &str = "type";
pub const KEY_LAT: &str = "lat";
pub const KEY_LON: &str = "lon";
pub const KEY_ELEVATION: &str = "elevation";

const REQUIRED_KEYS: [&str; 4] = [KEY_ID, KEY_LAT, KEY_LON, KEY_TYPE];

/// JSON number for a finite float, `null` otherwise.
pub fn float_value(v: f64) -> Value {
    Number::from_f64(v).map(Value::Number).unwrap_or(Value::Null)
}

/// A flat catalog record. Fields other than id/lat/lon/elevation are opaque
/// and carried through merges verbatim, in their original key order.
#[derive(Debug, Clone, PartialEq)]
pub struct StationRecord {
    id: String,
    fields: Map<String, Value>,
}

impl StationRecord {
    /// Validate required keys and wrap. `id` must be a string.
    pub fn from_fields(fields: Map<String, Value>) -> Result<Self, String> {
        for key in REQUIRED_KEYS {
            if !fields.contains_key(key) {
                return Err(format!("missing required key '{key}'"));
            }
        }
        let id = match fields.get(KEY_ID) {
            Some(Value::String(s)) => s.clone(),
            _ => return Err(format!("'{KEY_ID}' must be a string")),
        };
        for (key, value) in &fields {
            if value.is_array() || value.is_object() {
                return Err(format!("'{key}' is not a scalar value"));
            }
        }
        Ok(Self { id, fields })
    }

    /// Caller guarantees `fields` holds the required keys with `id` set to `id`.
    pub(crate) fn with_id(id: String, fields: Map<String, Value>) -> Self {
        Self { id, fields }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn station_type(&self) -> Option<&Value> {
        self.fields.get(KEY_TYPE)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// Equal values *and* equal key order.
    pub fn same_layout(&self, other: &StationRecord) -> bool {
        self == other && self.keys().eq(other.keys())
    }

    /// Existing keys keep their position; absent keys are appended.
    pub(crate) fn set_position(&mut self, lat: f64, lon: f64) {
        self.fields.insert(KEY_LAT.into(), float_value(lat));
        self.fields.insert(KEY_LON.into(), float_value(lon));
    }

    pub(crate) fn set_elevation(&mut self, elevation: Option<f64>) {
        let value = elevation.map(float_value).unwrap_or(Value::Null);
        self.fields.insert(KEY_ELEVATION.into(), value);
    }
}

impl Serialize for StationRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.fields.serialize(serializer)
    }
}

/// Ordered sequence of station records.
///
/// Order matters only for type grouping in the persisted layout.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Catalog {
    records: Vec<StationRecord>,
}

impl Catalog {
    pub fn new(records: Vec<StationRecord>) -> Self {
        Self { records }
    }

    /// Build from raw JSON objects, validating every record.
    pub fn from_fields(objects: Vec<Map<String, Value>>) -> Result<Self, ReconError> {
        let records = objects
            .into_iter()
            .enumerate()
            .map(|(index, fields)| {
                StationRecord::from_fields(fields)
                    .map_err(|reason| ReconError::InvalidRecord { index, reason })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { records })
    }

    pub fn records(&self) -> &[StationRecord] {
        &self.records
    }

    pub fn iter(&self) -> impl Iterator<Item = &StationRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The ordered key sequence shared by every record.
    ///
    /// The first record defines the expected sequence; any record that differs
    /// (different keys or different order) is an `InconsistentSchema` error.
    pub fn schema(&self) -> Result<Vec<&str>, ReconError> {
        let Some(first) = self.records.first() else {
            return Ok(Vec::new());
        };
        let expected: Vec<&str> = first.keys().collect();

        for (index, record) in self.records.iter().enumerate().skip(1) {
            if !record.keys().eq(expected.iter().copied()) {
                return Err(ReconError::InconsistentSchema {
                    index,
                    expected: expected.iter().map(|k| k.to_string()).collect(),
                    found: record.keys().map(str::to_string).collect(),
                });
            }
        }

        Ok(expected)
    }
}

impl FromIterator<StationRecord> for Catalog {
    fn from_iter<I: IntoIterator<Item = StationRecord>>(iter: I) -> Self {
        Self { records: iter.into_iter().collect() }
    }
}

// ---------------------------------------------------------------------------
// Allow-list
// ---------------------------------------------------------------------------

/// Station ids authorized for a full position overwrite.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AllowList {
    ids: HashSet<String>,
}

impl AllowList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, station_id: impl Into<String>) {
        self.ids.insert(station_id.into());
    }

    pub fn contains(&self, station_id: &str) -> bool {
        self.ids.contains(station_id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for AllowList {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self { ids: iter.into_iter().map(Into::into).collect() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fields(v: Value) -> Map<String, Value> {
        v.as_object().unwrap().clone()
    }

    #[test]
    fn record_requires_core_keys() {
        let err = StationRecord::from_fields(fields(json!({"id": "KTLX", "lat": 1.0, "lon": 2.0})))
            .unwrap_err();
        assert!(err.contains("'type'"));

        let err = StationRecord::from_fields(fields(
            json!({"id": 7, "lat": 1.0, "lon": 2.0, "type": "wsr88d"}),
        ))
        .unwrap_err();
        assert!(err.contains("must be a string"));
    }

    #[test]
    fn record_rejects_nested_values() {
        let err = StationRecord::from_fields(fields(
            json!({"id": "KTLX", "lat": 1.0, "lon": 2.0, "type": "wsr88d", "tags": ["a"]}),
        ))
        .unwrap_err();
        assert!(err.contains("'tags'"));
    }

    #[test]
    fn set_elevation_appends_when_missing() {
        let mut r = StationRecord::from_fields(fields(
            json!({"type": "wsr88d", "id": "KTLX", "lat": 1.0, "lon": 2.0}),
        ))
        .unwrap();
        r.set_elevation(Some(1200.0));
        r.set_position(3.0, 4.0);
        let keys: Vec<&str> = r.keys().collect();
        assert_eq!(keys, vec!["type", "id", "lat", "lon", "elevation"]);
        assert_eq!(r.get("lat"), Some(&json!(3.0)));
        assert_eq!(r.get("elevation"), Some(&json!(1200.0)));
    }

    #[test]
    fn schema_detects_key_mismatch() {
        let catalog = Catalog::from_fields(vec![
            fields(json!({"id": "A", "lat": 1, "lon": 2, "type": "t"})),
            fields(json!({"id": "B", "lat": 1, "lon": 2, "type": "t", "name": "x"})),
        ])
        .unwrap();
        match catalog.schema().unwrap_err() {
            ReconError::InconsistentSchema { index, found, .. } => {
                assert_eq!(index, 1);
                assert_eq!(found.last().map(String::as_str), Some("name"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn schema_is_order_sensitive() {
        let catalog = Catalog::from_fields(vec![
            fields(json!({"id": "A", "lat": 1, "lon": 2, "type": "t"})),
            fields(json!({"lat": 1, "id": "B", "lon": 2, "type": "t"})),
        ])
        .unwrap();
        assert!(catalog.schema().is_err());
    }

    #[test]
    fn empty_catalog_has_empty_schema() {
        assert!(Catalog::default().schema().unwrap().is_empty());
    }

    #[test]
    fn canonical_insert_keeps_first() {
        let mut stations = CanonicalStations::new();
        let station = |lat| CanonicalStation {
            station_id: "KTLX".into(),
            lat,
            lon: -97.0,
            elevation: None,
            platform: None,
        };
        assert!(stations.insert(station(35.0)));
        assert!(!stations.insert(station(99.0)));
        assert_eq!(stations.len(), 1);
        assert_eq!(stations.get("KTLX").unwrap().lat, 35.0);
    }

    #[test]
    fn float_value_non_finite_is_null() {
        assert_eq!(float_value(f64::NAN), Value::Null);
        assert_eq!(float_value(1.5), json!(1.5));
    }
}
