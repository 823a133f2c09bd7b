// File I/O: upstream snapshots, allow-list, catalog, coordinate dump

pub mod allowlist;
pub mod catalog;
pub mod coords;
pub mod error;
pub mod homr;

pub use error::IoError;

use std::fs;
use std::path::{Path, PathBuf};

/// Write `contents` to `<path>.tmp`, then rename over `path`.
///
/// Callers render the full output first, so a failed render never
/// touches the target.
pub fn write_atomic(path: &Path, contents: &str) -> Result<(), IoError> {
    let tmp_path = tmp_path_for(path);
    fs::write(&tmp_path, contents).map_err(|e| IoError::write(&tmp_path, e))?;
    if let Err(e) = fs::rename(&tmp_path, path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(IoError::write(path, e));
    }
    Ok(())
}

pub fn read_to_string(path: &Path) -> Result<String, IoError> {
    fs::read_to_string(path).map_err(|e| IoError::read(path, e))
}

fn tmp_path_for(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".tmp");
    PathBuf::from(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn atomic_write_replaces_and_cleans_up() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("radar_sites.json");
        fs::write(&path, "old").unwrap();

        write_atomic(&path, "new").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "new");
        assert!(!dir.path().join("radar_sites.json.tmp").exists());
    }

    #[test]
    fn atomic_write_into_missing_dir_fails() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing").join("out.json");
        let err = write_atomic(&path, "x").unwrap_err();
        assert!(err.to_string().contains("cannot write"));
    }
}
