//! NOAA HOMR station payloads.
//!
//! The live search endpoint and saved snapshot files carry the same station
//! objects; both are decoded here into [`RawStationRecord`]s. Only the fields
//! the reconciliation needs are read, everything else is ignored.

use std::path::Path;

use serde::Deserialize;
use serde_json::ser::PrettyFormatter;
use serde_json::{Number, Value};

use radarsite_recon::model::{RawElevation, RawIdentifier};
use radarsite_recon::RawStationRecord;

use crate::error::IoError;
use crate::{read_to_string, write_atomic};

// ── Wire types ──────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct HomrStation {
    #[serde(default)]
    identifiers: Vec<HomrIdentifier>,
    header: HomrHeader,
    #[serde(default)]
    location: HomrLocation,
    #[serde(default)]
    platforms: Vec<HomrPlatform>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct HomrIdentifier {
    id_type: String,
    id: Text,
}

#[derive(Debug, Deserialize)]
struct HomrHeader {
    latitude_dec: Text,
    longitude_dec: Text,
}

#[derive(Debug, Default, Deserialize)]
struct HomrLocation {
    #[serde(default)]
    elevations: Vec<HomrElevation>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct HomrElevation {
    elevation_type: String,
    /// Only parsed if this entry wins the ranking.
    #[serde(default)]
    elevation_feet: Option<Text>,
}

#[derive(Debug, Deserialize)]
struct HomrPlatform {
    platform: String,
}

/// HOMR sends numbers as strings, but accept bare numbers too.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Text {
    String(String),
    Number(Number),
}

impl From<Text> for String {
    fn from(t: Text) -> Self {
        match t {
            Text::String(s) => s,
            Text::Number(n) => n.to_string(),
        }
    }
}

// ── Decode ──────────────────────────────────────────────────────────

/// Extract `stationCollection.stations` from a search response body.
pub fn stations_from_response(body: Value) -> Result<Vec<Value>, IoError> {
    match body {
        Value::Object(mut root) => match root.remove("stationCollection") {
            Some(Value::Object(mut collection)) => match collection.remove("stations") {
                Some(Value::Array(stations)) => Ok(stations),
                // A search with no hits omits the array.
                None | Some(Value::Null) => Ok(Vec::new()),
                Some(_) => Err(shape_error("'stations' is not an array")),
            },
            _ => Err(shape_error("missing 'stationCollection'")),
        },
        _ => Err(shape_error("response is not a JSON object")),
    }
}

fn shape_error(message: &str) -> IoError {
    IoError::Json { what: "HOMR response", message: message.to_string() }
}

/// Decode raw station objects, preserving order.
pub fn decode_stations(stations: &[Value]) -> Result<Vec<RawStationRecord>, IoError> {
    stations
        .iter()
        .enumerate()
        .map(|(index, value)| {
            let station = HomrStation::deserialize(value)
                .map_err(|e| IoError::Snapshot { index, message: e.to_string() })?;
            Ok(station.into_raw())
        })
        .collect()
}

impl HomrStation {
    fn into_raw(self) -> RawStationRecord {
        RawStationRecord {
            identifiers: self
                .identifiers
                .into_iter()
                .map(|i| RawIdentifier { category: i.id_type, value: i.id.into() })
                .collect(),
            elevations: self
                .location
                .elevations
                .into_iter()
                .map(|e| RawElevation {
                    category: e.elevation_type,
                    value_text: e.elevation_feet.map(String::from).unwrap_or_default(),
                })
                .collect(),
            latitude: self.header.latitude_dec.into(),
            longitude: self.header.longitude_dec.into(),
            platforms: self.platforms.into_iter().map(|p| p.platform).collect(),
        }
    }
}

// ── Snapshot files ──────────────────────────────────────────────────

/// Read a snapshot written by [`write_snapshot`]: a JSON array of stations.
pub fn read_snapshot(path: &Path) -> Result<Vec<Value>, IoError> {
    serde_json::from_str(&read_to_string(path)?)
        .map_err(|e| IoError::Json { what: "HOMR snapshot", message: e.to_string() })
}

/// Save raw station objects, 4-space indented.
pub fn write_snapshot(path: &Path, stations: &[Value]) -> Result<(), IoError> {
    let mut buf = Vec::new();
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
    serde::Serialize::serialize(stations, &mut ser)
        .map_err(|e| IoError::Json { what: "HOMR snapshot", message: e.to_string() })?;
    let mut text = String::from_utf8(buf)
        .map_err(|e| IoError::Json { what: "HOMR snapshot", message: e.to_string() })?;
    text.push('\n');
    write_atomic(path, &text)
}
