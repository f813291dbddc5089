//! CLI binary for bengali-pdf-translit.
//!
//! A thin shim over the library crate that maps CLI flags
//! to `TranslationConfig` and prints results.

use anyhow::{Context, Result};
use bengali_pdf_translit::{
    run_self_test, translate_pdf, CaseStyle, ExtractionMode, PageSelection, ProgressCallback,
    TextSource, TranslationConfig, TranslationProgressCallback,
};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

const DEFAULT_INPUT: &str = "input/bengali.pdf";
const DEFAULT_OUTPUT_DIR: &str = "output";

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

// ── CLI progress callback using indicatif ────────────────────────────────────

const TICKS: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"];

/// Live progress bar plus one log line per page. OCR pages complete
/// out of order, so start times are tracked per page.
struct CliProgressCallback {
    bar: ProgressBar,
    start_times: Mutex<HashMap<usize, Instant>>,
    errors: AtomicUsize,
}

impl CliProgressCallback {
    /// Spinner only; the bar length is set in `on_start`.
    fn new_dynamic() -> Arc<Self> {
        let bar = ProgressBar::new(0);

        let spinner_style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(TICKS);

        bar.set_style(spinner_style);
        bar.set_prefix("Preparing");
        bar.set_message("Opening PDF…");
        bar.enable_steady_tick(Duration::from_millis(80));

        Arc::new(Self {
            bar,
            start_times: Mutex::new(HashMap::new()),
            errors: AtomicUsize::new(0),
        })
    }

    fn activate_bar(&self, total: usize, prefix: &str) {
        let progress_style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  \
             [{bar:42.green/238}] {pos:>3}/{len} pages  \
             ⏱ {elapsed_precise}  ETA {eta_precise}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ")
        .tick_strings(TICKS);

        self.bar.set_length(total as u64);
        self.bar.set_style(progress_style);
        self.bar.set_prefix(prefix.to_string());
        self.bar.reset_eta();
    }

    fn elapsed_secs(&self, page_num: usize) -> f64 {
        self.start_times
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .remove(&page_num)
            .map(|t| t.elapsed().as_secs_f64())
            .unwrap_or(0.0)
    }
}

impl TranslationProgressCallback for CliProgressCallback {
    fn on_start(&self, total_pages: usize, source: TextSource) {
        let (prefix, via) = match source {
            TextSource::TextLayer => ("Extracting", "text layer"),
            TextSource::Ocr => ("OCR", "vision OCR"),
        };
        self.activate_bar(total_pages, prefix);
        self.bar.println(format!(
            "{} {}",
            cyan("◆"),
            bold(&format!("Reading {total_pages} pages via {via}…"))
        ));
    }

    fn on_page_start(&self, page_num: usize, _total: usize) {
        self.start_times
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(page_num, Instant::now());
        self.bar.set_message(format!("page {page_num}"));
    }

    fn on_page_complete(&self, page_num: usize, total: usize, chars: usize) {
        let secs = self.elapsed_secs(page_num);
        self.bar.println(format!(
            "  {} Page {:>3}/{:<3}  {:<8}  {}",
            green("✓"),
            page_num,
            total,
            dim(&format!("{chars:>5} chars")),
            dim(&format!("{secs:.1}s")),
        ));
        self.bar.inc(1);
    }

    fn on_page_error(&self, page_num: usize, total: usize, error: &str) {
        let secs = self.elapsed_secs(page_num);
        self.errors.fetch_add(1, Ordering::SeqCst);

        let first_line = error.lines().next().unwrap_or_default();
        let msg = if first_line.chars().count() > 80 {
            format!("{}\u{2026}", first_line.chars().take(79).collect::<String>())
        } else {
            first_line.to_string()
        };

        self.bar.println(format!(
            "  {} Page {:>3}/{:<3}  {}  {}",
            red("✗"),
            page_num,
            total,
            red(&msg),
            dim(&format!("{secs:.1}s")),
        ));
        self.bar.inc(1);
    }

    fn on_complete(&self, total_pages: usize) {
        self.bar.finish_and_clear();
        eprintln!(
            "{} {} pages read",
            green("✔"),
            bold(&total_pages.to_string())
        );
    }
}

impl Drop for CliProgressCallback {
    fn drop(&mut self) {
        // A fatal error skips on_complete; don't leave the spinner behind.
        if !self.bar.is_finished() {
            self.bar.finish_and_clear();
        }
        let errors = self.errors.load(Ordering::SeqCst);
        if errors > 0 {
            eprintln!("{} {} page(s) failed", red("✘"), errors);
        }
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Transliterate input/bengali.pdf into output/bengali_transliterated.pdf
  bn2en

  # Explicit input and output
  bn2en novel.pdf novel_en.pdf

  # Check the engine on the built-in sample sentences (no PDF needed)
  bn2en --test

  # Scanned book: force OCR on pages 1-20, one output page per source page
  bn2en --mode ocr --pages 1-20 --page-breaks scan.pdf

  # Custom spellings and sentence casing
  bn2en --exceptions names.json --case sentence story.pdf

  # Slow provider: allow three minutes per OCR call
  bn2en --mode ocr --api-timeout 180 scan.pdf

  # Machine-readable run statistics
  bn2en --json story.pdf > stats.json

EXTRACTION MODES:
  auto   Use the text layer when it has real text, otherwise OCR (default)
  text   Text layer only; fails on scanned PDFs
  ocr    Always OCR the rendered pages

EXCEPTIONS FILE:
  A JSON object mapping Bengali words to spellings; entries override the
  built-in dictionary:
    { "নিশ্চিন্দিপুর": "Nishchindipur", "অপু": "Apu" }

ENVIRONMENT VARIABLES:
  OPENAI_API_KEY          OpenAI API key (OCR only)
  ANTHROPIC_API_KEY       Anthropic API key (OCR only)
  GEMINI_API_KEY          Google Gemini API key (OCR only)
  EDGEQUAKE_LLM_PROVIDER  Override OCR provider (openai, anthropic, gemini, ollama)
  EDGEQUAKE_MODEL         Override OCR model ID
  PDFIUM_LIB_PATH         Path to libpdfium (file or directory)
  RUST_LOG                Log filter, overrides -v / -q
  BN2EN_*                 Fallback for every flag, e.g. BN2EN_MODE=ocr
"#;

/// Transliterate Bengali PDFs into phonetic English PDFs.
#[derive(Parser, Debug)]
#[command(
    name = "bn2en",
    version,
    about = "Transliterate Bengali PDFs into phonetic English PDFs",
    long_about = "Read the Bengali text of a PDF (embedded text layer, or OCR through a vision \
model for scanned documents), transliterate it phonetically into Latin script and write the \
result as a new PDF.",
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Input PDF.
    #[arg(env = "BN2EN_INPUT", default_value = DEFAULT_INPUT)]
    input: PathBuf,

    /// Output PDF. Default: output/<input stem>_transliterated.pdf
    #[arg(env = "BN2EN_OUTPUT")]
    output: Option<PathBuf>,

    /// Transliterate the built-in sample sentences and exit.
    #[arg(long)]
    test: bool,

    /// Where the Bengali text comes from.
    #[arg(long, env = "BN2EN_MODE", value_enum, default_value = "auto")]
    mode: ModeArg,

    /// Page selection: all, 5, 3-15, or 1,3,5,7.
    #[arg(long, env = "BN2EN_PAGES", default_value = "all")]
    pages: String,

    /// Output casing.
    #[arg(long = "case", env = "BN2EN_CASE", value_enum, default_value = "lower")]
    case_style: CaseArg,

    /// JSON file of extra word → spelling exceptions.
    #[arg(long, env = "BN2EN_EXCEPTIONS")]
    exceptions: Option<PathBuf>,

    /// Title line of the output PDF (empty string for none).
    #[arg(long, env = "BN2EN_TITLE")]
    title: Option<String>,

    /// Start each source page on a new output page.
    #[arg(long, env = "BN2EN_PAGE_BREAKS")]
    page_breaks: bool,

    /// OCR rendering DPI (72–400).
    #[arg(long, env = "BN2EN_DPI", default_value_t = 300,
          value_parser = clap::value_parser!(u32).range(72..=400))]
    dpi: u32,

    /// Number of concurrent OCR calls.
    #[arg(short, long, env = "BN2EN_CONCURRENCY", default_value_t = 4)]
    concurrency: usize,

    /// Vision model for OCR (e.g. gpt-4.1-mini, gpt-4.1, gemini-2.0-flash).
    #[arg(long, env = "BN2EN_MODEL")]
    model: Option<String>,

    /// OCR provider: openai, anthropic, gemini, ollama, azure.
    #[arg(long, env = "BN2EN_PROVIDER")]
    provider: Option<String>,

    /// Script hint passed to the OCR model.
    #[arg(long, env = "BN2EN_LANGUAGE", default_value = "Bengali")]
    language: String,

    /// PDF user password for encrypted documents.
    #[arg(long, env = "BN2EN_PASSWORD")]
    password: Option<String>,

    /// Seconds allowed for each OCR API call.
    #[arg(long = "api-timeout", env = "BN2EN_API_TIMEOUT", default_value_t = 60,
          value_parser = clap::value_parser!(u64).range(1..))]
    api_timeout: u64,

    /// Print run statistics (or the self-test report) as JSON on stdout.
    #[arg(long, env = "BN2EN_JSON")]
    json: bool,

    /// Disable progress bar.
    #[arg(long, env = "BN2EN_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "BN2EN_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "BN2EN_QUIET")]
    quiet: bool,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum ModeArg {
    Auto,
    Text,
    Ocr,
}

impl From<ModeArg> for ExtractionMode {
    fn from(v: ModeArg) -> Self {
        match v {
            ModeArg::Auto => ExtractionMode::Auto,
            ModeArg::Text => ExtractionMode::TextLayer,
            ModeArg::Ocr => ExtractionMode::Ocr,
        }
    }
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum CaseArg {
    Lower,
    Sentence,
}

impl From<CaseArg> for CaseStyle {
    fn from(v: CaseArg) -> Self {
        match v {
            CaseArg::Lower => CaseStyle::Lower,
            CaseArg::Sentence => CaseStyle::Sentence,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // The progress bar replaces INFO-level library logs.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json && !cli.test;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Self-test mode ───────────────────────────────────────────────────
    if cli.test {
        let config = build_config(&cli, None)?;
        let transliterator = config
            .transliterator()
            .context("Failed to load exceptions")?;
        let report = run_self_test(&transliterator);

        if cli.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&report).context("Failed to serialise report")?
            );
        } else {
            for case in &report.cases {
                if case.passed {
                    println!("{} {}  →  {}", green("✓"), case.bengali, case.actual);
                } else {
                    println!(
                        "{} {}  →  {}  {}",
                        red("✗"),
                        case.bengali,
                        case.actual,
                        dim(&format!("(expected {})", case.expected))
                    );
                }
            }
            println!(
                "{}/{} samples match",
                bold(&report.passed().to_string()),
                report.cases.len()
            );
        }

        if !report.all_passed() {
            std::process::exit(1);
        }
        return Ok(());
    }

    // ── Build config ─────────────────────────────────────────────────────
    let progress_cb: Option<ProgressCallback> = if show_progress {
        let cb = CliProgressCallback::new_dynamic();
        Some(cb as Arc<dyn TranslationProgressCallback>)
    } else {
        None
    };

    let config = build_config(&cli, progress_cb)?;
    let output_path = cli
        .output
        .clone()
        .unwrap_or_else(|| default_output_path(&cli.input));

    // ── Run ──────────────────────────────────────────────────────────────
    let stats = translate_pdf(&cli.input, &output_path, &config)
        .await
        .with_context(|| format!("Failed to transliterate {}", cli.input.display()))?;
    // Drop the config (and the progress bar it holds) before printing the summary.
    drop(config);

    if cli.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&stats).context("Failed to serialise stats")?
        );
    } else if !cli.quiet {
        let via = match stats.source {
            Some(TextSource::Ocr) => "OCR",
            _ => "text layer",
        };
        eprintln!(
            "{}  {}/{} pages ({})  {}ms  →  {}",
            green("✔"),
            stats.processed_pages,
            stats.total_pages,
            via,
            stats.total_duration_ms,
            bold(&output_path.display().to_string()),
        );
        eprintln!(
            "   {} Bengali chars  →  {} English chars  ({} output pages)",
            dim(&stats.bengali_chars.to_string()),
            dim(&stats.english_chars.to_string()),
            stats.output_pages,
        );
        if stats.total_input_tokens > 0 {
            eprintln!(
                "   {} tokens in  /  {} tokens out",
                dim(&stats.total_input_tokens.to_string()),
                dim(&stats.total_output_tokens.to_string()),
            );
        }
    }

    Ok(())
}

/// Map CLI args to `TranslationConfig`.
fn build_config(cli: &Cli, progress: Option<ProgressCallback>) -> Result<TranslationConfig> {
    let pages = parse_pages(&cli.pages)?;

    let mut builder = TranslationConfig::builder()
        .mode(cli.mode.into())
        .pages(pages)
        .case_style(cli.case_style.into())
        .dpi(cli.dpi)
        .concurrency(cli.concurrency)
        .ocr_language(cli.language.clone())
        .api_timeout_secs(cli.api_timeout)
        .preserve_page_breaks(cli.page_breaks);

    if let Some(ref path) = cli.exceptions {
        builder = builder.exceptions_file(path.clone());
    }
    if let Some(ref title) = cli.title {
        builder = builder.title(title.clone());
    }
    if let Some(ref model) = cli.model {
        builder = builder.model(model.clone());
    }
    if let Some(ref provider) = cli.provider {
        builder = builder.provider_name(provider.clone());
    }
    if let Some(ref password) = cli.password {
        builder = builder.password(password.clone());
    }
    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }

    builder.build().context("Invalid configuration")
}

/// `output/<input stem>_transliterated.pdf`
fn default_output_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "document".to_string());
    Path::new(DEFAULT_OUTPUT_DIR).join(format!("{stem}_transliterated.pdf"))
}

/// Parse `--pages` string into `PageSelection`.
fn parse_pages(s: &str) -> Result<PageSelection> {
    let s = s.trim().to_lowercase();

    if s == "all" {
        return Ok(PageSelection::All);
    }

    // Range: "3-15"
    if let Some((start, end)) = s.split_once('-') {
        let start: usize = start
            .trim()
            .parse()
            .context("Invalid start page in range")?;
        let end: usize = end.trim().parse().context("Invalid end page in range")?;

        if start < 1 {
            anyhow::bail!("Pages are 1-indexed, minimum is 1 (got {})", start);
        }
        if start > end {
            anyhow::bail!(
                "Invalid page range '{}-{}': start must be <= end",
                start,
                end
            );
        }

        return Ok(PageSelection::Range(start, end));
    }

    // Set: "1,3,5,7"
    if s.contains(',') {
        let pages: Vec<usize> = s
            .split(',')
            .map(|p| {
                p.trim()
                    .parse::<usize>()
                    .with_context(|| format!("Invalid page number: '{}'", p.trim()))
            })
            .collect::<Result<Vec<_>>>()?;

        if let Some(&p) = pages.iter().find(|&&p| p < 1) {
            anyhow::bail!("Pages are 1-indexed, minimum is 1 (got {})", p);
        }

        return Ok(PageSelection::Set(pages));
    }

    // Single page: "5"
    let page: usize = s.parse().context("Invalid page number")?;
    if page < 1 {
        anyhow::bail!("Pages are 1-indexed, minimum is 1 (got {})", page);
    }

    Ok(PageSelection::Single(page))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_pages_forms() {
        assert_eq!(parse_pages("all").unwrap(), PageSelection::All);
        assert_eq!(parse_pages(" ALL ").unwrap(), PageSelection::All);
        assert_eq!(parse_pages("5").unwrap(), PageSelection::Single(5));
        assert_eq!(parse_pages("3-15").unwrap(), PageSelection::Range(3, 15));
        assert_eq!(parse_pages("1, 3,5").unwrap(), PageSelection::Set(vec![1, 3, 5]));
    }

    #[test]
    fn parse_pages_rejects_bad_input() {
        assert!(parse_pages("0").is_err());
        assert!(parse_pages("5-3").is_err());
        assert!(parse_pages("0-3").is_err());
        assert!(parse_pages("1,0").is_err());
        assert!(parse_pages("x").is_err());
    }

    #[test]
    fn default_output_uses_input_stem() {
        assert_eq!(
            default_output_path(Path::new("input/bengali.pdf")),
            PathBuf::from("output/bengali_transliterated.pdf")
        );
    }

    #[test]
    fn cli_defaults() {
        let cli = Cli::try_parse_from(["bn2en"]).unwrap();
        assert_eq!(cli.input, PathBuf::from(DEFAULT_INPUT));
        assert!(cli.output.is_none());
        assert_eq!(cli.dpi, 300);
        let config = build_config(&cli, None).unwrap();
        assert_eq!(config.mode, ExtractionMode::Auto);
        assert_eq!(config.case_style, CaseStyle::Lower);
        assert_eq!(config.api_timeout_secs, 60);
    }

    #[test]
    fn cli_flags_reach_config() {
        let cli = Cli::try_parse_from([
            "bn2en", "in.pdf", "out.pdf", "--mode", "ocr", "--case", "sentence", "--pages", "2-4",
            "--page-breaks", "--title", "", "--api-timeout", "5",
        ])
        .unwrap();
        let config = build_config(&cli, None).unwrap();
        assert_eq!(config.mode, ExtractionMode::Ocr);
        assert_eq!(config.case_style, CaseStyle::Sentence);
        assert_eq!(config.pages, PageSelection::Range(2, 4));
        assert!(config.preserve_page_breaks);
        assert_eq!(config.title, "");
        assert_eq!(config.api_timeout_secs, 5);
    }

    #[test]
    fn zero_api_timeout_is_rejected() {
        assert!(Cli::try_parse_from(["bn2en", "--api-timeout", "0"]).is_err());
    }
}
