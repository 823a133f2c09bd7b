use crate::config::UpdatePolicy;
use crate::error::ReconError;
use crate::model::{CanonicalStation, CanonicalStations, RawStationRecord};
use crate::selector::{select_best, select_best_with, Priority};

/// Reduce upstream records to one canonical entry per station id.
///
/// The station id is the best-ranked identifier; the elevation is the
/// best-ranked measurement parsed as feet (`None` if no listed basis exists).
/// When two records resolve to the same id the first one wins and the later
/// one is dropped without a diagnostic.
pub fn build_canonical(
    records: &[RawStationRecord],
    policy: &UpdatePolicy,
) -> Result<CanonicalStations, ReconError> {
    let id_priority = Priority::new(&policy.identifier_priority);
    let elevation_priority = Priority::new(&policy.elevation_priority);

    let mut stations = CanonicalStations::new();

    for (index, record) in records.iter().enumerate() {
        let Some(identifier) =
            select_best(&record.identifiers, |id| id.category.as_str(), &id_priority)
        else {
            stations.unidentified += 1;
            continue;
        };

        // Some stations are repeated under non-radar platforms.
        if stations.contains(&identifier.value) {
            stations.duplicates_dropped += 1;
            continue;
        }

        let lat = parse_coordinate(index, "latitude", &record.latitude)?;
        let lon = parse_coordinate(index, "longitude", &record.longitude)?;
        let elevation = select_best_with(
            &record.elevations,
            |e| e.category.as_str(),
            &elevation_priority,
            |e| {
                parse_float(&e.value_text).ok_or_else(|| ReconError::ElevationParse {
                    station_id: identifier.value.clone(),
                    value: e.value_text.clone(),
                })
            },
        )?;

        stations.insert(CanonicalStation {
            station_id: identifier.value.clone(),
            lat,
            lon,
            elevation,
            platform: record.platforms.first().cloned(),
        });
    }

    Ok(stations)
}

fn parse_coordinate(record: usize, field: &'static str, text: &str) -> Result<f64, ReconError> {
    parse_float(text).ok_or_else(|| ReconError::CoordinateParse {
        record,
        field,
        value: text.to_string(),
    })
}

/// Finite decimal number, surrounding whitespace ignored.
fn parse_float(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}
