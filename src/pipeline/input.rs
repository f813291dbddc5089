//! Input validation: make sure the user-supplied path is a readable PDF.
//!
//! We check the `%PDF` magic bytes before handing the path to pdfium so
//! callers get a meaningful error rather than a pdfium load failure.

use crate::error::TranslitError;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Validate a local file path, checking existence, readability and PDF magic bytes.
pub fn resolve_input(path: impl AsRef<Path>) -> Result<PathBuf, TranslitError> {
    let path = path.as_ref().to_path_buf();

    if !path.exists() {
        return Err(TranslitError::FileNotFound { path });
    }
    if path.is_dir() {
        return Err(TranslitError::NotAPdf {
            path,
            magic: [0; 4],
        });
    }

    let mut file = match std::fs::File::open(&path) {
        Ok(f) => f,
        Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
            return Err(TranslitError::PermissionDenied { path });
        }
        Err(_) => return Err(TranslitError::FileNotFound { path }),
    };

    let mut magic = [0u8; 4];
    let mut read = 0;
    while read < magic.len() {
        match file.read(&mut magic[read..]) {
            Ok(0) => break,
            Ok(n) => read += n,
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(e) => {
                return Err(TranslitError::CorruptPdf {
                    path,
                    detail: e.to_string(),
                })
            }
        }
    }
    if &magic != b"%PDF" {
        return Err(TranslitError::NotAPdf { path, magic });
    }

    debug!("Resolved local PDF: {}", path.display());
    Ok(path)
}
