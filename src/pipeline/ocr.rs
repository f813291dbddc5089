//! OCR: turn a rendered page image into Bengali text.
//!
//! [`OcrEngine`] is the seam between the pipeline and whatever recognises
//! text. The shipped implementation, [`VisionOcr`], sends the page to a
//! vision LLM through `edgequake-llm`; tests plug in a canned engine.
//!
//! ## Retry Strategy
//!
//! Transient API failures (429 / 5xx / timeouts) are retried with exponential
//! backoff (`retry_backoff_ms * 2^(attempt-1)`): 500 ms → 1 s → 2 s with the
//! defaults. Every attempt is bounded by `api_timeout_secs`. An empty
//! transcription is not retried; the model saw the page and found nothing.

use crate::config::TranslationConfig;
use crate::error::TranslitError;
use crate::pipeline::encode;
use crate::prompts::{ocr_prompt, OCR_USER_MESSAGE};
use edgequake_llm::{ChatMessage, CompletionOptions, LLMProvider};
use futures::future::BoxFuture;
use image::DynamicImage;
use std::future::Future;
use std::sync::Arc;
use std::time::Instant;
use tokio::time::{sleep, timeout, Duration};
use tracing::{debug, warn};

/// Text recognised on one page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Recognition {
    pub text: String,
    /// Retries spent before the successful attempt.
    pub retries: u32,
    pub input_tokens: usize,
    pub output_tokens: usize,
}

/// Recognises the text on a rendered page.
///
/// Object-safe so it can be stored as `Arc<dyn OcrEngine>` in the config and
/// called concurrently for several pages.
pub trait OcrEngine: Send + Sync {
    /// Short name used in logs and error messages.
    fn name(&self) -> &str;

    /// Recognise the text on page `page_num` (1-indexed). `language` is the
    /// script hint, e.g. "Bengali".
    fn recognize<'a>(
        &'a self,
        page_num: usize,
        image: DynamicImage,
        language: &'a str,
    ) -> BoxFuture<'a, Result<Recognition, TranslitError>>;
}

/// Vision-LLM OCR on top of an `edgequake-llm` provider.
pub struct VisionOcr {
    name: String,
    provider: Arc<dyn LLMProvider>,
    system_prompt: Option<String>,
    options: CompletionOptions,
    max_retries: u32,
    retry_backoff_ms: u64,
    api_timeout: Duration,
}

impl VisionOcr {
    /// Build an engine for `provider` using the OCR settings in `config`.
    pub fn new(provider: Arc<dyn LLMProvider>, config: &TranslationConfig) -> Self {
        let name = match (&config.provider_name, &config.model) {
            (Some(p), Some(m)) => format!("{p}/{m}"),
            (Some(p), None) => p.clone(),
            (None, Some(m)) => m.clone(),
            (None, None) => "vision-llm".to_string(),
        };
        Self {
            name,
            provider,
            system_prompt: config.system_prompt.clone(),
            options: build_options(config),
            max_retries: config.max_retries,
            retry_backoff_ms: config.retry_backoff_ms,
            api_timeout: Duration::from_secs(config.api_timeout_secs),
        }
    }

    async fn recognize_page(
        &self,
        page_num: usize,
        image: DynamicImage,
        language: &str,
    ) -> Result<Recognition, TranslitError> {
        let start = Instant::now();
        let image_data =
            encode::encode_page(&image).map_err(|e| TranslitError::RasterisationFailed {
                page: page_num,
                detail: format!("Image encoding failed: {}", e),
            })?;
        drop(image);

        let system_prompt = match self.system_prompt {
            Some(ref p) => p.clone(),
            None => ocr_prompt(language),
        };
        let messages = vec![
            ChatMessage::system(&system_prompt),
            ChatMessage::user_with_images(OCR_USER_MESSAGE, vec![image_data]),
        ];

        let policy = RetryPolicy {
            max_retries: self.max_retries,
            backoff_ms: self.retry_backoff_ms,
            timeout: self.api_timeout,
        };
        let (provider, options, messages) = (&self.provider, &self.options, &messages);
        let (response, retries) = with_retry(page_num, &policy, move || {
            provider.chat(messages, Some(options))
        })
        .await?;

        debug!(
            "Page {}: {} input tokens, {} output tokens, {:?}",
            page_num,
            response.prompt_tokens,
            response.completion_tokens,
            start.elapsed()
        );
        if response.content.trim().is_empty() {
            return Err(TranslitError::EmptyRecognition { page: page_num });
        }
        Ok(Recognition {
            text: response.content,
            retries,
            input_tokens: response.prompt_tokens,
            output_tokens: response.completion_tokens,
        })
    }
}

/// Retry budget for one page.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub backoff_ms: u64,
    /// Bound on every single attempt.
    pub timeout: Duration,
}

/// Run `call` until it succeeds or `policy.max_retries` retries are spent.
///
/// Returns the value and the number of retries used. When every attempt
/// timed out the error is [`TranslitError::OcrTimeout`], otherwise
/// [`TranslitError::OcrFailed`] carrying the last failure.
pub async fn with_retry<T, E, F, Fut>(
    page_num: usize,
    policy: &RetryPolicy,
    mut call: F,
) -> Result<(T, u32), TranslitError>
where
    E: std::fmt::Display,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let mut last_err: Option<String> = None;

    for attempt in 0..=policy.max_retries {
        if attempt > 0 {
            let backoff = backoff_delay(policy.backoff_ms, attempt);
            warn!(
                "Page {}: OCR retry {}/{} after {}ms",
                page_num, attempt, policy.max_retries, backoff
            );
            sleep(Duration::from_millis(backoff)).await;
        }

        match timeout(policy.timeout, call()).await {
            Ok(Ok(value)) => return Ok((value, attempt)),
            Ok(Err(e)) => {
                let err_msg = e.to_string();
                warn!("Page {}: OCR attempt {} failed: {}", page_num, attempt + 1, err_msg);
                last_err = Some(err_msg);
            }
            Err(_) => {
                warn!(
                    "Page {}: OCR attempt {} timed out after {:?}",
                    page_num,
                    attempt + 1,
                    policy.timeout
                );
            }
        }
    }

    match last_err {
        None => Err(TranslitError::OcrTimeout {
            page: page_num,
            secs: policy.timeout.as_secs(),
        }),
        Some(detail) => Err(TranslitError::OcrFailed {
            page: page_num,
            retries: policy.max_retries,
            detail,
        }),
    }
}

impl OcrEngine for VisionOcr {
    fn name(&self) -> &str {
        &self.name
    }

    fn recognize<'a>(
        &'a self,
        page_num: usize,
        image: DynamicImage,
        language: &'a str,
    ) -> BoxFuture<'a, Result<Recognition, TranslitError>> {
        Box::pin(self.recognize_page(page_num, image, language))
    }
}

/// Delay before retry number `attempt` (1-based).
pub fn backoff_delay(base_ms: u64, attempt: u32) -> u64 {
    base_ms.saturating_mul(2u64.saturating_pow(attempt.saturating_sub(1)))
}

/// Build `CompletionOptions` from the translation config.
fn build_options(config: &TranslationConfig) -> CompletionOptions {
    CompletionOptions {
        temperature: Some(config.temperature),
        max_tokens: Some(config.max_tokens),
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use edgequake_llm::MockProvider;
    use std::sync::atomic::{AtomicU32, Ordering};

    struct Canned(&'static str);

    impl OcrEngine for Canned {
        fn name(&self) -> &str {
            "canned"
        }

        fn recognize<'a>(
            &'a self,
            page_num: usize,
            _image: DynamicImage,
            language: &'a str,
        ) -> BoxFuture<'a, Result<Recognition, TranslitError>> {
            Box::pin(async move {
                assert_eq!(language, "Bengali");
                if self.0.is_empty() {
                    return Err(TranslitError::EmptyRecognition { page: page_num });
                }
                Ok(Recognition {
                    text: self.0.to_string(),
                    ..Default::default()
                })
            })
        }
    }

    #[test]
    fn build_options_defaults() {
        let config = TranslationConfig::default();
        let opts = build_options(&config);
        assert_eq!(opts.temperature, Some(0.1));
        assert_eq!(opts.max_tokens, Some(4096));
    }

    #[test]
    fn backoff_doubles() {
        assert_eq!(backoff_delay(500, 1), 500);
        assert_eq!(backoff_delay(500, 2), 1000);
        assert_eq!(backoff_delay(500, 3), 2000);
        assert_eq!(backoff_delay(500, 200), u64::MAX);
    }

    #[tokio::test]
    async fn engine_is_object_safe() {
        let engine: Arc<dyn OcrEngine> = Arc::new(Canned("পথের পাঁচালী"));
        let img = DynamicImage::new_luma8(4, 4);
        let rec = engine.recognize(1, img, "Bengali").await.unwrap();
        assert_eq!(rec.text, "পথের পাঁচালী");
        assert_eq!(engine.name(), "canned");
    }

    #[tokio::test]
    async fn empty_recognition_is_an_error() {
        let engine = Canned("");
        let err = engine
            .recognize(3, DynamicImage::new_luma8(1, 1), "Bengali")
            .await
            .unwrap_err();
        assert!(matches!(err, TranslitError::EmptyRecognition { page: 3 }));
    }

    #[test]
    fn canned_engine_blocks_to_completion() {
        let engine = Canned("বাংলা ভাষা");
        let rec =
            tokio_test::block_on(engine.recognize(1, DynamicImage::new_luma8(2, 2), "Bengali"))
                .unwrap();
        assert_eq!(rec.text, "বাংলা ভাষা");
        assert_eq!(rec.retries, 0);
    }

    // ── Retry loop ───────────────────────────────────────────────────────

    fn quick_policy(max_retries: u32) -> RetryPolicy {
        RetryPolicy {
            max_retries,
            backoff_ms: 1,
            timeout: Duration::from_millis(50),
        }
    }

    #[tokio::test]
    async fn retries_until_success() {
        let counter = AtomicU32::new(0);
        let calls = &counter;
        let (value, retries) = with_retry(4, &quick_policy(3), move || async move {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            if n < 2 {
                Err(format!("HTTP 503 on call {n}"))
            } else {
                Ok("পথের")
            }
        })
        .await
        .unwrap();
        assert_eq!(value, "পথের");
        assert_eq!(retries, 2);
        assert_eq!(counter.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn exhausted_retries_report_last_error() {
        let counter = AtomicU32::new(0);
        let calls = &counter;
        let err = with_retry(7, &quick_policy(2), move || async move {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            Err::<(), _>(format!("rate limited ({n})"))
        })
        .await
        .unwrap_err();
        assert_eq!(counter.load(Ordering::SeqCst), 3);
        match err {
            TranslitError::OcrFailed { page, retries, detail } => {
                assert_eq!(page, 7);
                assert_eq!(retries, 2);
                assert_eq!(detail, "rate limited (2)");
            }
            other => panic!("expected OcrFailed, got {other}"),
        }
    }

    #[tokio::test]
    async fn every_attempt_timing_out_is_a_timeout() {
        let counter = AtomicU32::new(0);
        let calls = &counter;
        let err = with_retry(5, &quick_policy(1), move || async move {
            calls.fetch_add(1, Ordering::SeqCst);
            sleep(Duration::from_secs(5)).await;
            Ok::<_, String>(())
        })
        .await
        .unwrap_err();
        assert_eq!(counter.load(Ordering::SeqCst), 2);
        assert!(matches!(err, TranslitError::OcrTimeout { page: 5, .. }), "{err}");
    }

    #[tokio::test]
    async fn a_timeout_then_an_error_is_a_failure() {
        let counter = AtomicU32::new(0);
        let calls = &counter;
        let err = with_retry(1, &quick_policy(1), move || async move {
            if calls.fetch_add(1, Ordering::SeqCst) == 0 {
                sleep(Duration::from_secs(5)).await;
            }
            Err::<(), _>("bad gateway".to_string())
        })
        .await
        .unwrap_err();
        assert!(
            matches!(err, TranslitError::OcrFailed { page: 1, retries: 1, .. }),
            "{err}"
        );
    }

    // ── VisionOcr over a mock provider ───────────────────────────────────

    fn vision_ocr(mock: MockProvider) -> VisionOcr {
        let config = TranslationConfig::builder()
            .max_retries(0)
            .retry_backoff_ms(1)
            .build()
            .unwrap();
        VisionOcr::new(Arc::new(mock), &config)
    }

    #[tokio::test]
    async fn vision_ocr_returns_provider_text() {
        let mock = MockProvider::new();
        mock.add_response("পথের পাঁচালী").await;
        let ocr = vision_ocr(mock);

        let rec = ocr
            .recognize(1, DynamicImage::new_luma8(8, 8), "Bengali")
            .await
            .unwrap();
        assert_eq!(rec.text, "পথের পাঁচালী");
        assert_eq!(rec.retries, 0);
        assert_eq!(ocr.name(), "vision-llm");
    }

    #[tokio::test]
    async fn vision_ocr_blank_reply_is_empty_recognition() {
        let mock = MockProvider::new();
        mock.add_response("  \n\t ").await;
        let ocr = vision_ocr(mock);

        let err = ocr
            .recognize(2, DynamicImage::new_luma8(8, 8), "Bengali")
            .await
            .unwrap_err();
        assert!(matches!(err, TranslitError::EmptyRecognition { page: 2 }), "{err}");
    }
}
