// Coordinate dump: one "<|lat|><N|S> <|lon|><E|W>" line per station.
// Handy for pasting into a map tool to eyeball positions.

use serde_json::{Number, Value};

use radarsite_recon::model::{float_value, KEY_LAT, KEY_LON};
use radarsite_recon::Catalog;

use crate::error::IoError;

pub fn render_coords(catalog: &Catalog) -> Result<String, IoError> {
    let mut out = String::new();
    for record in catalog.iter() {
        let lat = hemisphere(record.get(KEY_LAT), 'N', 'S')
            .ok_or_else(|| IoError::Coordinate { id: record.id().to_string(), key: KEY_LAT })?;
        let lon = hemisphere(record.get(KEY_LON), 'E', 'W')
            .ok_or_else(|| IoError::Coordinate { id: record.id().to_string(), key: KEY_LON })?;
        out.push_str(&lat);
        out.push(' ');
        out.push_str(&lon);
        out.push('\n');
    }
    Ok(out)
}

/// Absolute value plus hemisphere letter. Zero counts as the negative side.
fn hemisphere(value: Option<&Value>, positive: char, negative: char) -> Option<String> {
    let n = value?.as_number()?;
    let (magnitude, is_positive) = magnitude(n)?;
    Some(format!("{magnitude}{}", if is_positive { positive } else { negative }))
}

fn magnitude(n: &Number) -> Option<(String, bool)> {
    if let Some(i) = n.as_i64() {
        return Some((i.unsigned_abs().to_string(), i > 0));
    }
    if let Some(u) = n.as_u64() {
        return Some((u.to_string(), u > 0));
    }
    let f = n.as_f64()?;
    // Same rendering as the catalog itself (`1.0`, not `1`).
    Some((float_value(f.abs()).to_string(), f > 0.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn catalog(values: Vec<Value>) -> Catalog {
        Catalog::from_fields(values.into_iter().map(|v| v.as_object().unwrap().clone()).collect())
            .unwrap()
    }

    #[test]
    fn hemispheres() {
        let c = catalog(vec![
            json!({"id": "KTLX", "type": "wsr88d", "lat": 35.3331, "lon": -97.2778}),
            json!({"id": "PGUA", "type": "wsr88d", "lat": -13.4559, "lon": 144.8111}),
            json!({"id": "ZERO", "type": "wsr88d", "lat": 0, "lon": 2.0}),
        ]);
        let text = render_coords(&c).unwrap();
        assert_eq!(text, "35.3331N 97.2778W\n13.4559S 144.8111E\n0S 2.0E\n");
    }

    #[test]
    fn null_coordinate_is_error() {
        let c = catalog(vec![json!({"id": "KXXX", "type": "wsr88d", "lat": null, "lon": 1.0})]);
        let err = render_coords(&c).unwrap_err();
        assert_eq!(err.to_string(), "station 'KXXX': 'lat' is not a number");
    }
}
