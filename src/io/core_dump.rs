use std::fs;
use std::path::Path;

use crate::error::SimError;
use crate::kernel::Snapshot;

/// Writes `snapshot` to `path` as pretty-printed JSON, creating parent
/// directories as needed.
pub fn write_snapshot(path: &Path, snapshot: &Snapshot) -> Result<(), SimError> {
    let json = snapshot.to_json()?;
    let io_error = |source: std::io::Error| SimError::Io {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(io_error)?;
    }
    fs::write(path, json).map_err(io_error)?;

    log::info!("Core dump written to {}", path.display());
    Ok(())
}
