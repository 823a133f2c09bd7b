//! Catalog file format.
//!
//! The aligned layout keeps one station per line so that a run which moves a
//! single station changes a single line:
//!
//! ```text
//! [
//! 	{ "type": "wsr88d", "id": "KABR", "lat": 45.4558, "lon": -98.4131, "elevation": 1302.0 },
//! 	{ "type": "wsr88d", "id": "KTLX", "lat": 35.3331, "lon": -97.2778, "elevation": null },
//!
//! 	{ "type": "tdwr",   "id": "TADW", "lat": 38.695,  "lon": -76.845,  "elevation": 251.0 }
//! ]
//! ```
//!
//! Every value is padded to the widest rendering of its key across the whole
//! catalog, and a blank line separates runs of different `type`. Non-ASCII
//! characters are written as `\uXXXX` escapes in both formats.

use std::path::Path;

use serde_json::{Map, Value};

use radarsite_recon::Catalog;

use crate::error::IoError;
use crate::{read_to_string, write_atomic};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CatalogFormat {
    /// One aligned record per line, grouped by type.
    #[default]
    Aligned,
    /// `serde_json` pretty printing.
    Plain,
}

// ---------------------------------------------------------------------------
// Read
// ---------------------------------------------------------------------------

/// Parse catalog text. Records must carry the core keys and share one key order.
pub fn parse_catalog(text: &str) -> Result<Catalog, IoError> {
    let catalog = parse_records(text)?;
    catalog.schema()?;
    Ok(catalog)
}

pub fn read_catalog(path: &Path) -> Result<Catalog, IoError> {
    parse_catalog(&read_to_string(path)?)
}

fn parse_records(text: &str) -> Result<Catalog, IoError> {
    let objects: Vec<Map<String, Value>> = serde_json::from_str(text)
        .map_err(|e| IoError::Json { what: "catalog", message: e.to_string() })?;
    Ok(Catalog::from_fields(objects)?)
}

// ---------------------------------------------------------------------------
// Render
// ---------------------------------------------------------------------------

pub fn render_catalog(catalog: &Catalog, format: CatalogFormat) -> Result<String, IoError> {
    match format {
        CatalogFormat::Aligned => render_aligned(catalog),
        CatalogFormat::Plain => render_plain(catalog),
    }
}

/// Render the aligned, type-grouped layout.
///
/// Fails with an inconsistent-schema error before producing any output if
/// records differ in key set or key order.
pub fn render_aligned(catalog: &Catalog) -> Result<String, IoError> {
    let keys = catalog.schema()?;
    let rendered_keys = keys.iter().map(|k| to_json(*k)).collect::<Result<Vec<_>, _>>()?;

    let mut widths = vec![0usize; keys.len()];
    let mut rows: Vec<Vec<String>> = Vec::with_capacity(catalog.len());
    for record in catalog.iter() {
        let values = record.fields().values().map(to_json).collect::<Result<Vec<_>, _>>()?;
        for (width, value) in widths.iter_mut().zip(&values) {
            *width = (*width).max(text_width(value));
        }
        rows.push(values);
    }

    let last_key = keys.len().saturating_sub(1);
    let last_record = catalog.len().saturating_sub(1);

    let mut out = String::from("[\n");
    let mut previous_type: Option<&Value> = None;

    for (i, (record, values)) in catalog.iter().zip(&rows).enumerate() {
        let station_type = record.station_type();
        if i > 0 && station_type != previous_type {
            out.push('\n');
        }

        out.push_str("\t{ ");
        for (k, ((key, value), width)) in rendered_keys.iter().zip(values).zip(&widths).enumerate() {
            out.push_str(key);
            out.push_str(": ");
            out.push_str(value);
            if k != last_key {
                out.push_str(", ");
                pad(&mut out, width - text_width(value));
            }
        }
        out.push_str(if i == last_record { " }\n" } else { " },\n" });

        previous_type = station_type;
    }

    out.push_str("]\n");
    Ok(out)
}

/// Plain pretty-printed JSON. Still requires a consistent schema.
pub fn render_plain(catalog: &Catalog) -> Result<String, IoError> {
    catalog.schema()?;
    let text = serde_json::to_string_pretty(catalog)
        .map_err(|e| IoError::Json { what: "catalog", message: e.to_string() })?;
    let mut out = escape_non_ascii(&text);
    out.push('\n');
    Ok(out)
}

fn to_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<String, IoError> {
    serde_json::to_string(value)
        .map(|text| escape_non_ascii(&text))
        .map_err(|e| IoError::Json { what: "catalog value", message: e.to_string() })
}

/// Rewrite every non-ASCII char as `\uXXXX` (surrogate pairs above U+FFFF).
///
/// Only valid on serialized JSON, where non-ASCII can only occur inside strings.
fn escape_non_ascii(json: &str) -> String {
    if json.is_ascii() {
        return json.to_string();
    }
    let mut out = String::with_capacity(json.len() + 16);
    let mut units = [0u16; 2];
    for c in json.chars() {
        if c.is_ascii() {
            out.push(c);
        } else {
            for unit in c.encode_utf16(&mut units) {
                out.push_str(&format!("\\u{unit:04x}"));
            }
        }
    }
    out
}

fn text_width(s: &str) -> usize {
    s.chars().count()
}

fn pad(out: &mut String, n: usize) {
    out.extend(std::iter::repeat(' ').take(n));
}

// ---------------------------------------------------------------------------
// Write + Verify
// ---------------------------------------------------------------------------

/// Render fully in memory, then write atomically.
pub fn write_catalog(path: &Path, catalog: &Catalog, format: CatalogFormat) -> Result<(), IoError> {
    let text = render_catalog(catalog, format)?;
    write_atomic(path, &text)
}

/// Re-read a written catalog and confirm it reproduces `expected` exactly:
/// same record count, same values, same key order.
pub fn verify_round_trip(path: &Path, expected: &Catalog) -> Result<(), IoError> {
    let text = read_to_string(path)?;
    let parsed = parse_records(&text).map_err(|e| IoError::RoundTrip(e.to_string()))?;

    if parsed.len() != expected.len() {
        return Err(IoError::RoundTrip(format!(
            "read back {} of {} records",
            parsed.len(),
            expected.len()
        )));
    }

    for (index, (got, want)) in parsed.iter().zip(expected.iter()).enumerate() {
        if !got.same_layout(want) {
            return Err(IoError::RoundTrip(format!(
                "record {index} ('{}') differs from the in-memory catalog",
                want.id()
            )));
        }
    }

    Ok(())
}
