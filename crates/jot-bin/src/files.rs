//! Filesystem-backed document storage.

use core_state::{DocumentError, DocumentProvider, LoadedDocument, SaveReport};
use std::fs;
use std::path::Path;

#[derive(Debug, Default)]
pub struct FsDocumentProvider;

impl DocumentProvider for FsDocumentProvider {
    fn load(&mut self, path: &Path) -> Result<LoadedDocument, DocumentError> {
        let load_err = |source| DocumentError::Load {
            path: path.to_path_buf(),
            source,
        };
        let raw = fs::read_to_string(path).map_err(load_err)?;
        let writable = !fs::metadata(path).map_err(load_err)?.permissions().readonly();
        let content = if raw.contains("\r\n") {
            raw.replace("\r\n", "\n")
        } else {
            raw
        };
        tracing::debug!(
            target: "io",
            file = %path.display(),
            size_bytes = content.len(),
            writable,
            "file_read_ok"
        );
        Ok(LoadedDocument {
            content,
            writable,
            ..LoadedDocument::default()
        })
    }

    fn save(&mut self, path: &Path, content: &str) -> Result<SaveReport, DocumentError> {
        fs::write(path, content).map_err(|source| DocumentError::Save {
            path: path.to_path_buf(),
            source,
        })?;
        let report = SaveReport {
            bytes: content.len(),
            lines: content.lines().count(),
        };
        tracing::debug!(target: "io", file = %path.display(), bytes = report.bytes, "file_write_ok");
        Ok(report)
    }
}
