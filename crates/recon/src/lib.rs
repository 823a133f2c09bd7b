//! `radarsite-recon`: radar site catalog reconciliation engine.
//!
//! Pure engine crate: receives decoded upstream records and a previously
//! persisted catalog, returns the next catalog plus diagnostics.
//! No CLI or IO dependencies.

pub mod canonical;
pub mod config;
pub mod error;
pub mod merge;
pub mod model;
pub mod selector;

pub use canonical::build_canonical;
pub use config::UpdatePolicy;
pub use error::ReconError;
pub use merge::{fresh_catalog, merge_catalog};
pub use model::{AllowList, CanonicalStations, Catalog, RawStationRecord, StationRecord};
