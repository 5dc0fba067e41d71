//! CLI binary for ocr2md.
//!
//! A thin shim over the library crate that maps CLI flags to `OcrConfig`
//! and drives conversions or the web server.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use ocr2md::{convert_to_file, MistralOcr, OcrConfig};
use std::io;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Convert a local PDF (writes ocr_output.md)
  ocr2md convert document.pdf

  # Convert to a chosen file
  ocr2md convert document.pdf -o document.md

  # Convert straight from a URL
  ocr2md convert https://arxiv.org/pdf/2201.04234 -o paper.md

  # Pick a model and a longer timeout for a big scan
  ocr2md convert --model mistral-ocr-latest --timeout 300 big-scan.pdf

  # Run the browser UI on http://127.0.0.1:8080
  ocr2md serve

  # Expose the UI on the network
  ocr2md serve --host 0.0.0.0 --port 9000

ENVIRONMENT VARIABLES:
  MISTRAL_API_KEY        Mistral API key (required)
  OCR2MD_BASE_URL        Override the API base URL
  OCR2MD_MODEL           Override the OCR model ID
  OCR2MD_OUTPUT          Default output path for convert
  OCR2MD_TIMEOUT         Request timeout in seconds
  OCR2MD_MAX_UPLOAD_MB   Web upload limit in megabytes
  RUST_LOG               Tracing filter (overrides -q / -v)

SETUP:
  1. Create an API key:  https://console.mistral.ai/
  2. Export it:          export MISTRAL_API_KEY=...
  3. Convert:            ocr2md convert document.pdf
"#;

/// Convert PDF files and URLs to Markdown with the Mistral OCR API.
#[derive(Parser, Debug)]
#[command(
    name = "ocr2md",
    version,
    about = "Convert PDF files and URLs to Markdown with the Mistral OCR API",
    long_about = "Convert PDF documents (local files or URLs) to Markdown using Mistral's hosted \
OCR models. Remote documents are fetched by the API itself; local files are uploaded and \
exchanged for a signed URL first. Also ships a browser UI for interactive batch conversion.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, global = true, env = "OCR2MD_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, global = true, env = "OCR2MD_QUIET")]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Convert one PDF (local file or URL) to Markdown.
    Convert(ConvertArgs),

    /// Serve the browser UI and JSON API.
    #[cfg(feature = "web")]
    Serve(ServeArgs),
}

#[derive(Args, Debug)]
struct ConvertArgs {
    /// Local PDF file path or HTTP/HTTPS URL.
    input: String,

    /// Write Markdown to this file.
    #[arg(short, long, env = "OCR2MD_OUTPUT", default_value = "ocr_output.md")]
    output: PathBuf,

    /// OCR model ID.
    #[arg(long, env = "OCR2MD_MODEL")]
    model: Option<String>,

    /// API base URL, for self-hosted gateways or test deployments.
    #[arg(long, env = "OCR2MD_BASE_URL")]
    base_url: Option<String>,

    /// Request timeout in seconds.
    #[arg(long, env = "OCR2MD_TIMEOUT", default_value_t = 120)]
    timeout: u64,

    /// Ask the API to inline page images as base64 in the response.
    #[arg(long, env = "OCR2MD_INCLUDE_IMAGES", default_value_t = true,
          action = clap::ArgAction::Set)]
    include_images: bool,
}

#[cfg(feature = "web")]
#[derive(Args, Debug)]
struct ServeArgs {
    /// IP address to bind.
    #[arg(long, env = "OCR2MD_HOST", default_value = "127.0.0.1")]
    host: String,

    /// Port to bind.
    #[arg(long, env = "OCR2MD_PORT", default_value_t = 8080)]
    port: u16,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // Suppress INFO-level library logs while the spinner is active; the
    // spinner provides all the feedback that matters to the user.
    let show_progress = !cli.quiet && !cli.verbose && matches!(cli.command, Command::Convert(_));
    let filter = if cli.quiet || show_progress {
        "error"
    } else if cli.verbose {
        "debug"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    match cli.command {
        Command::Convert(args) => run_convert(args, cli.quiet, show_progress).await,
        #[cfg(feature = "web")]
        Command::Serve(args) => run_serve(args).await,
    }
}

async fn run_convert(args: ConvertArgs, quiet: bool, show_progress: bool) -> Result<()> {
    let mut builder = OcrConfig::builder()
        .timeout_secs(args.timeout)
        .include_images(args.include_images);
    if let Some(model) = args.model {
        builder = builder.model(model);
    }
    if let Some(base_url) = args.base_url {
        builder = builder.base_url(base_url);
    }
    let config = builder.build().context("Invalid configuration")?;
    let engine = MistralOcr::new(config).context("Failed to build the OCR client")?;

    let spinner = if show_progress {
        Some(make_spinner(&args.input))
    } else {
        None
    };

    let start = Instant::now();
    let result = convert_to_file(&args.input, &args.output, &engine).await;
    if let Some(bar) = &spinner {
        bar.finish_and_clear();
    }
    result.context("Conversion failed")?;

    if !quiet {
        eprintln!(
            "{}  {}  →  {}",
            green("✔"),
            dim(&format!("{:.1}s", start.elapsed().as_secs_f64())),
            bold(&args.output.display().to_string()),
        );
    }
    Ok(())
}

#[cfg(feature = "web")]
async fn run_serve(args: ServeArgs) -> Result<()> {
    let engine = MistralOcr::from_env().context("Failed to build the OCR client")?;
    ocr2md::web::serve(&args.host, args.port, std::sync::Arc::new(engine))
        .await
        .context("Web server failed")?;
    Ok(())
}

fn make_spinner(input: &str) -> ProgressBar {
    let bar = ProgressBar::new_spinner();
    let style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);

    bar.set_style(style);
    bar.set_prefix("Converting");
    bar.set_message(input.to_string());
    bar.enable_steady_tick(Duration::from_millis(80));
    bar
}
