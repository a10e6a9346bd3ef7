//! Export entry points.

use std::ffi::OsString;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use hpoa_core::WorkingCopy;

use crate::error::ExportError;
use crate::format::{ExportFormat, ExportOptions};
use crate::json::write_json;
use crate::tsv::write_tsv;

/// Serialize `copy` in memory. The master table is never read.
pub fn export(copy: &WorkingCopy, options: &ExportOptions) -> Result<Vec<u8>, ExportError> {
    let mut bytes = Vec::new();
    match options.format {
        ExportFormat::Tsv => write_tsv(copy, &mut bytes, options)?,
        ExportFormat::Json => write_json(copy, &mut bytes)?,
    }
    debug!(
        format = %options.format,
        rows = copy.len(),
        bytes = bytes.len(),
        "serialized working copy"
    );
    Ok(bytes)
}

/// Export `copy` to `path`.
///
/// The output is written to a temp file beside `path` and renamed over it,
/// so `path` holds either its previous contents or the full export.
pub fn write_export(
    copy: &WorkingCopy,
    path: &Path,
    options: &ExportOptions,
) -> Result<(), ExportError> {
    let bytes = export(copy, options)?;

    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .map_err(|source| ExportError::io("create directory", parent, source))?;
    }

    let temp_path = temp_path_for(path);
    if let Err(err) = write_file(&temp_path, &bytes) {
        let _ = fs::remove_file(&temp_path);
        return Err(err);
    }
    fs::rename(&temp_path, path).map_err(|source| {
        let _ = fs::remove_file(&temp_path);
        ExportError::AtomicWriteFailed {
            temp_path: temp_path.clone(),
            target_path: path.to_path_buf(),
            source,
        }
    })?;

    info!(
        path = %path.display(),
        format = %options.format,
        rows = copy.len(),
        "exported working copy"
    );
    Ok(())
}

fn write_file(path: &Path, bytes: &[u8]) -> Result<(), ExportError> {
    let mut file = File::create(path).map_err(|source| ExportError::io("create", path, source))?;
    file.write_all(bytes)
        .map_err(|source| ExportError::io("write", path, source))?;
    file.sync_all()
        .map_err(|source| ExportError::io("sync", path, source))
}

fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".tmp");
    PathBuf::from(name)
}
