//! pdfium binding and document loading shared by the extract and render stages.
//!
//! Resolution order for the shared library:
//!
//! 1. `PDFIUM_LIB_PATH`: a library file, or a directory containing one
//! 2. the current directory (`./libpdfium.so` and friends)
//! 3. the system loader path
//!
//! All functions here are blocking and must run inside `spawn_blocking`.

use crate::error::TranslitError;
use pdfium_render::prelude::*;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Environment variable naming an existing pdfium library.
pub const PDFIUM_LIB_PATH_ENV: &str = "PDFIUM_LIB_PATH";

/// Bind to a pdfium library.
pub fn bind() -> Result<Pdfium, TranslitError> {
    if let Some(path) = env_library_path() {
        debug!("Binding pdfium from {}", path.display());
        return Pdfium::bind_to_library(&path)
            .map(Pdfium::new)
            .map_err(|e| {
                TranslitError::PdfiumBindingFailed(format!("{}: {:?}", path.display(), e))
            });
    }

    let local = Pdfium::pdfium_platform_library_name_at_path("./");
    Pdfium::bind_to_library(&local)
        .or_else(|_| Pdfium::bind_to_system_library())
        .map(Pdfium::new)
        .map_err(|e| TranslitError::PdfiumBindingFailed(format!("{:?}", e)))
}

fn env_library_path() -> Option<PathBuf> {
    let raw = std::env::var(PDFIUM_LIB_PATH_ENV).ok()?;
    if raw.trim().is_empty() {
        return None;
    }
    let path = PathBuf::from(raw);
    if path.is_dir() {
        Some(Pdfium::pdfium_platform_library_name_at_path(&path))
    } else {
        Some(path)
    }
}

/// Open `pdf_path`, mapping pdfium's load errors onto [`TranslitError`].
pub fn open<'a>(
    pdfium: &'a Pdfium,
    pdf_path: &Path,
    password: Option<&'a str>,
) -> Result<PdfDocument<'a>, TranslitError> {
    pdfium
        .load_pdf_from_file(pdf_path, password)
        .map_err(|e| load_error(pdf_path, password, &e))
}

fn load_error(pdf_path: &Path, password: Option<&str>, e: &PdfiumError) -> TranslitError {
    let err_str = format!("{:?}", e);
    if err_str.contains("Password") || err_str.contains("password") {
        if password.is_some() {
            TranslitError::WrongPassword {
                path: pdf_path.to_path_buf(),
            }
        } else {
            TranslitError::PasswordRequired {
                path: pdf_path.to_path_buf(),
            }
        }
    } else {
        TranslitError::CorruptPdf {
            path: pdf_path.to_path_buf(),
            detail: err_str,
        }
    }
}
