// Atomic file output

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use schooldir_recon::sink;
use schooldir_recon::{DirectoryError, Record};
use tracing::info;

/// Write the directory CSV to `path` atomically.
pub fn write_directory(path: &Path, records: &[Record]) -> Result<(), DirectoryError> {
    write_atomic(path, |file| sink::write_records(BufWriter::new(file), records))?;
    info!(path = %path.display(), records = records.len(), "directory written");
    Ok(())
}

/// Write raw bytes (a downloaded workbook) to `path` atomically.
pub fn write_bytes(path: &Path, bytes: &[u8]) -> Result<(), DirectoryError> {
    write_atomic(path, |file| Ok(file.write_all(bytes)?))
}

/// A sibling `.tmp` file is written in full and synced to disk, then
/// renamed over the destination. Parent directories are created. On failure
/// the destination is left untouched and the tmp file removed.
fn write_atomic(
    path: &Path,
    write: impl FnOnce(&mut File) -> Result<(), DirectoryError>,
) -> Result<(), DirectoryError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| {
            DirectoryError::Io(format!("failed to create {}: {}", parent.display(), e))
        })?;
    }

    let tmp_path = tmp_path(path);
    let mut file = File::create(&tmp_path)
        .map_err(|e| DirectoryError::Io(format!("failed to create {}: {}", tmp_path.display(), e)))?;
    let written = write(&mut file).and_then(|()| {
        file.sync_all()
            .map_err(|e| DirectoryError::Io(format!("failed to sync {}: {}", tmp_path.display(), e)))
    });
    drop(file);
    if let Err(e) = written {
        let _ = std::fs::remove_file(&tmp_path);
        return Err(e);
    }

    std::fs::rename(&tmp_path, path).map_err(|e| {
        let _ = std::fs::remove_file(&tmp_path);
        DirectoryError::Io(format!("failed to rename tmp to {}: {}", path.display(), e))
    })
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
