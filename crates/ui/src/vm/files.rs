use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::views::ViewError;

pub const BANK_EXPORT_FILE: &str = "banque-qcm.json";
pub const RESULTS_EXPORT_FILE: &str = "resultats-qcm.csv";

/// Read a bank file picked on the home screen.
///
/// # Errors
///
/// Returns `ViewError::FileUnreadable` if the path is empty or unreadable.
pub fn read_import_file(path: &str) -> Result<String, ViewError> {
    let path = path.trim();
    if path.is_empty() {
        return Err(ViewError::FileUnreadable("aucun fichier indiqué".to_string()));
    }
    std::fs::read_to_string(path).map_err(|err| {
        warn!(path, error = %err, "failed to read import file");
        ViewError::FileUnreadable(format!("{path} ({err})"))
    })
}

/// Write `contents` to `dir/name`, creating `dir` if needed.
///
/// # Errors
///
/// Returns `ViewError::ExportFailed` on any I/O failure.
pub fn write_export(dir: &Path, name: &str, contents: &str) -> Result<PathBuf, ViewError> {
    let target = dir.join(name);
    let written = std::fs::create_dir_all(dir).and_then(|()| std::fs::write(&target, contents));
    match written {
        Ok(()) => {
            info!(path = %target.display(), bytes = contents.len(), "export written");
            Ok(target)
        }
        Err(err) => {
            warn!(path = %target.display(), error = %err, "export failed");
            Err(ViewError::ExportFailed(format!("{} ({err})", target.display())))
        }
    }
}
