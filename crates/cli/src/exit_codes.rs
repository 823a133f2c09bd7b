//! CLI Exit Code Registry
//!
//! This is the single source of truth for all CLI exit codes.
//! Exit codes are part of the shell contract; scripts rely on them.
//!
//! | Code | Description                                           |
//! |------|-------------------------------------------------------|
//! | 0    | Success                                               |
//! | 1    | General error (unspecified)                           |
//! | 2    | Usage error (bad args, unreadable input file)         |
//! | 3    | Catalog records do not share one key set              |
//! | 4    | Written catalog failed round-trip verification        |
//! | 5    | Upstream registry unavailable                         |
//! | 6    | Invalid settings or malformed upstream payload        |

use radarsite_io::IoError;
use radarsite_recon::ReconError;

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure (e.g. cannot write output).
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, missing or unreadable input.
pub const EXIT_USAGE: u8 = 2;

/// Catalog schema inconsistent. Nothing was written.
pub const EXIT_SCHEMA: u8 = 3;

/// Round-trip verification of the written catalog failed.
pub const EXIT_VERIFY: u8 = 4;

/// Upstream fetch failed (network error or non-success status).
/// Raised before any merge happens.
pub const EXIT_UPSTREAM: u8 = 5;

/// Settings file or upstream payload could not be used.
pub const EXIT_INVALID_INPUT: u8 = 6;

/// Map an IoError to its exit code.
pub fn io_exit_code(err: &IoError) -> u8 {
    if err.is_inconsistent_schema() {
        return EXIT_SCHEMA;
    }
    match err {
        IoError::RoundTrip(_) => EXIT_VERIFY,
        IoError::Read { .. } => EXIT_USAGE,
        IoError::Catalog(ReconError::CoordinateParse { .. } | ReconError::ElevationParse { .. }) => {
            EXIT_INVALID_INPUT
        }
        IoError::Json { .. } | IoError::Csv(_) | IoError::Catalog(_) => EXIT_USAGE,
        IoError::Snapshot { .. } => EXIT_INVALID_INPUT,
        IoError::Write { .. } | IoError::Coordinate { .. } => EXIT_ERROR,
    }
}
