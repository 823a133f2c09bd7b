// radar-sites update: fetch HOMR stations and reconcile the catalog

use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::Args;
use log::{debug, info, warn};
use serde_json::Value;

use radarsite_config::Settings;
use radarsite_io::catalog::{self, CatalogFormat};
use radarsite_io::{allowlist, coords, homr, write_atomic};
use radarsite_recon::{build_canonical, fresh_catalog, merge_catalog, AllowList, CanonicalStations, Catalog};

use crate::fetch::HomrClient;
use crate::CliError;

/// Printed by `--warn` after a successful run.
pub const TEST_COORDINATES_WARNING: &str =
    "Station coordinates may have changed; unit tests that pin radar site positions may need updating";

#[derive(Args, Debug, Default)]
pub struct UpdateArgs {
    /// Existing catalog to update
    #[arg(short = 'u', long, value_name = "FILE")]
    pub current_file: Option<PathBuf>,

    /// Where to write the updated catalog (defaults to --current-file)
    #[arg(short = 'o', long, value_name = "FILE")]
    pub updated_file: Option<PathBuf>,

    /// Allow-list CSV of stations whose position may be updated
    #[arg(short = 'U', long = "to-update-csv", value_name = "FILE")]
    pub to_update_csv: Option<PathBuf>,

    /// Re-read the written catalog and check it matches
    #[arg(short = 't', long = "verify")]
    pub verify: bool,

    /// Also write a coordinate listing
    #[arg(short = 'c', long, value_name = "FILE")]
    pub coord_file: Option<PathBuf>,

    /// Save the raw HOMR stations to this file
    #[arg(short = 'r', long, value_name = "FILE")]
    pub resp_file: Option<PathBuf>,

    /// Read HOMR stations from a saved file instead of the network
    #[arg(short = 'i', long, value_name = "FILE")]
    pub input_json: Option<PathBuf>,

    /// Write plain pretty-printed JSON instead of the aligned layout
    #[arg(short = 'j', long)]
    pub json_dump: bool,

    /// Also fetch the extra platforms from settings
    #[arg(short = 'm', long)]
    pub more_radars: bool,

    /// Only request stations HOMR marks as current
    #[arg(short = 'C', long)]
    pub current_only: bool,

    /// Print a reminder about tests that pin station coordinates
    #[arg(short = 'w', long)]
    pub warn: bool,
}

pub fn cmd_update(args: UpdateArgs, settings: &Settings) -> Result<(), CliError> {
    let output = args
        .updated_file
        .clone()
        .or_else(|| args.current_file.clone())
        .ok_or_else(|| {
            CliError::args("no catalog to write")
                .with_hint("pass --current-file, --updated-file, or both")
        })?;

    let previous = match &args.current_file {
        Some(path) => {
            info!("Reading current sites from '{}'", path.display());
            Some(catalog::read_catalog(path)?)
        }
        None => None,
    };

    let allow_list = match &args.to_update_csv {
        Some(path) => {
            info!("Reading stations to update from '{}'", path.display());
            let list = allowlist::read_allow_list(path, &settings.allow_list.sentinel)?;
            debug!("{} stations allowed a full update", list.len());
            Some(list)
        }
        None => None,
    };
    if allow_list.is_some() && previous.is_none() {
        warn!("--to-update-csv has no effect without --current-file");
    }

    let stations = load_stations(&args, settings)?;

    if let Some(path) = &args.resp_file {
        info!("Saving HOMR stations to '{}'", path.display());
        homr::write_snapshot(path, &stations)?;
    }

    info!("Processing {} HOMR stations", stations.len());
    let raw = homr::decode_stations(&stations)?;
    let canonical = build_canonical(&raw, &settings.policy)?;
    log_canonical(&canonical);

    let updated = match &previous {
        Some(previous) => reconcile(&canonical, previous, allow_list.as_ref()),
        None => {
            info!("No current catalog, building one from HOMR stations");
            fresh_catalog(&canonical, &settings.types)
        }
    };

    let format = if args.json_dump { CatalogFormat::Plain } else { CatalogFormat::Aligned };
    info!("Saving updated sites to '{}'", output.display());
    catalog::write_catalog(&output, &updated, format)?;

    if let Some(path) = &args.coord_file {
        write_coords(path, &updated)?;
    }

    if args.verify {
        info!("Verifying '{}'", output.display());
        catalog::verify_round_trip(&output, &updated)?;
    }

    if args.warn {
        warn!("{TEST_COORDINATES_WARNING}");
    }

    Ok(())
}

fn load_stations(args: &UpdateArgs, settings: &Settings) -> Result<Vec<Value>, CliError> {
    if let Some(path) = &args.input_json {
        info!("Reading HOMR stations from '{}'", path.display());
        return Ok(homr::read_snapshot(path)?);
    }

    let client = HomrClient::new(
        &settings.homr.base_url,
        Duration::from_secs(settings.homr.timeout_secs),
    )?;
    client.fetch_all(&settings.platforms(args.more_radars), args.current_only)
}

fn log_canonical(canonical: &CanonicalStations) {
    debug!(
        "{} canonical stations ({} duplicates dropped, {} without a ranked identifier)",
        canonical.len(),
        canonical.duplicates_dropped,
        canonical.unidentified
    );
}

fn reconcile(
    canonical: &CanonicalStations,
    previous: &Catalog,
    allow_list: Option<&AllowList>,
) -> Catalog {
    let outcome = merge_catalog(canonical, previous, allow_list);
    for diagnostic in &outcome.diagnostics {
        warn!("{diagnostic}");
    }
    let s = &outcome.summary;
    info!(
        "{} stations: {} full updates, {} elevation only, {} not found",
        outcome.catalog.len(),
        s.full_updates,
        s.elevation_only,
        s.not_found
    );
    outcome.catalog
}

fn write_coords(path: &Path, catalog: &Catalog) -> Result<(), CliError> {
    info!("Saving coordinates to '{}'", path.display());
    let text = coords::render_coords(catalog)?;
    write_atomic(path, &text)?;
    Ok(())
}
