//! Progress-callback trait for per-page events.
//!
//! Inject an [`Arc<dyn TranslationProgressCallback>`] via
//! [`crate::config::TranslationConfigBuilder::progress_callback`] to receive
//! events as each page is extracted and transliterated. OCR pages run
//! concurrently, so implementations must be `Send + Sync`.
//!
//! # Example
//!
//! ```rust
//! use bengali_pdf_translit::{TranslationConfig, TranslationProgressCallback};
//! use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
//!
//! struct Counter(AtomicUsize);
//!
//! impl TranslationProgressCallback for Counter {
//!     fn on_page_complete(&self, _page_num: usize, _total_pages: usize, _chars: usize) {
//!         self.0.fetch_add(1, Ordering::SeqCst);
//!     }
//! }
//!
//! let config = TranslationConfig::builder()
//!     .progress_callback(Arc::new(Counter(AtomicUsize::new(0))))
//!     .build()
//!     .unwrap();
//! ```

use crate::output::TextSource;
use std::sync::Arc;

/// Called by the pipeline as it processes each page.
///
/// All methods have default no-op implementations so callers only override
/// what they care about.
pub trait TranslationProgressCallback: Send + Sync {
    /// Called once before any page is processed.
    ///
    /// * `total_pages`: number of selected pages
    /// * `source`:      where the text will come from (decided up front)
    fn on_start(&self, total_pages: usize, source: TextSource) {
        let _ = (total_pages, source);
    }

    /// Called just before a page is extracted or sent to OCR.
    fn on_page_start(&self, page_num: usize, total_pages: usize) {
        let _ = (page_num, total_pages);
    }

    /// Called when a page's text has been obtained.
    ///
    /// * `chars`: character count of the cleaned Bengali text
    fn on_page_complete(&self, page_num: usize, total_pages: usize, chars: usize) {
        let _ = (page_num, total_pages, chars);
    }

    /// Called when a page fails. The run aborts after this.
    fn on_page_error(&self, page_num: usize, total_pages: usize, error: &str) {
        let _ = (page_num, total_pages, error);
    }

    /// Called once after all pages succeeded.
    fn on_complete(&self, total_pages: usize) {
        let _ = total_pages;
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl TranslationProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::TranslationConfig`].
pub type ProgressCallback = Arc<dyn TranslationProgressCallback>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    #[derive(Default)]
    struct Tracking {
        started: Mutex<Option<(usize, TextSource)>>,
        pages: AtomicUsize,
        errors: AtomicUsize,
        finished: AtomicUsize,
    }

    impl TranslationProgressCallback for Tracking {
        fn on_start(&self, total_pages: usize, source: TextSource) {
            *self.started.lock().unwrap() = Some((total_pages, source));
        }

        fn on_page_complete(&self, _page_num: usize, _total_pages: usize, _chars: usize) {
            self.pages.fetch_add(1, Ordering::SeqCst);
        }

        fn on_page_error(&self, _page_num: usize, _total_pages: usize, _error: &str) {
            self.errors.fetch_add(1, Ordering::SeqCst);
        }

        fn on_complete(&self, total_pages: usize) {
            self.finished.store(total_pages, Ordering::SeqCst);
        }
    }

    #[test]
    fn noop_callback_does_not_panic() {
        let cb = NoopProgressCallback;
        cb.on_start(2, TextSource::Ocr);
        cb.on_page_start(1, 2);
        cb.on_page_complete(1, 2, 10);
        cb.on_page_error(2, 2, "boom");
        cb.on_complete(2);
    }

    #[test]
    fn tracking_callback_receives_events() {
        let t = Tracking::default();
        t.on_start(2, TextSource::TextLayer);
        t.on_page_complete(1, 2, 40);
        t.on_page_complete(2, 2, 41);
        t.on_complete(2);

        assert_eq!(*t.started.lock().unwrap(), Some((2, TextSource::TextLayer)));
        assert_eq!(t.pages.load(Ordering::SeqCst), 2);
        assert_eq!(t.errors.load(Ordering::SeqCst), 0);
        assert_eq!(t.finished.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn arc_dyn_callback_works() {
        let cb: ProgressCallback = Arc::new(NoopProgressCallback);
        cb.on_page_start(1, 1);
    }
}
