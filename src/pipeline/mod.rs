//! Pipeline stages around the transliteration core.
//!
//! Each submodule implements exactly one step, so each is testable alone.
//!
//! ## Data Flow
//!
//! ```text
//!                 ┌──▶ extract ───────────────────────────┐
//! input ──▶ pdfium┤                                       ├──▶ postprocess ──▶ translit ──▶ write
//!                 └──▶ render ──▶ encode ──▶ ocr (VLM) ───┘
//! ```
//!
//! 1. [`input`]   validate the local path and `%PDF` magic
//! 2. [`pdfium`]  bind the library and open documents
//! 3. [`extract`] read the text layer (`spawn_blocking`)
//! 4. [`render`]  rasterise pages when OCR is needed (`spawn_blocking`)
//! 5. [`encode`]  PNG + base64 for the vision model
//! 6. [`ocr`]     `OcrEngine` trait and the vision-LLM engine with retry
//! 7. [`postprocess`] deterministic text cleanup
//! 8. [`write`]   lay out and serialise the output PDF

pub mod encode;
pub mod extract;
pub mod input;
pub mod ocr;
pub mod pdfium;
pub mod postprocess;
pub mod render;
pub mod write;
