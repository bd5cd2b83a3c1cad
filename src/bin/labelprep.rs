//! CLI binary for labelprep.
//!
//! A thin shim over the library crate that maps CLI arguments to
//! `PrepConfig`, binds the pdfium engine and prints the result.

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use labelprep::{
    inspect, Carrier, PdfiumEngine, PrepConfig, PreparationJob, PreparationProgressCallback,
    ProgressCallback, Stage,
};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

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

const TICKS: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"];

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress callback: a live bar plus one log line per label.
struct CliProgressCallback {
    bar: ProgressBar,
    /// Start time of the label being processed.
    label_started: Mutex<Option<Instant>>,
}

impl CliProgressCallback {
    /// Spinner-only until `on_preparation_start` reports the label count.
    fn new_dynamic() -> Arc<Self> {
        let bar = ProgressBar::new(0);
        let spinner_style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(TICKS);

        bar.set_style(spinner_style);
        bar.set_prefix("Preparing");
        bar.set_message("Scanning labels…");
        bar.enable_steady_tick(Duration::from_millis(80));

        Arc::new(Self {
            bar,
            label_started: Mutex::new(None),
        })
    }

    fn activate_bar(&self, total: usize) {
        let progress_style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  \
             [{bar:42.green/238}] {pos:>3}/{len} labels  \
             ⏱ {elapsed_precise}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ")
        .tick_strings(TICKS);

        self.bar.set_length(total as u64);
        self.bar.set_style(progress_style);
        self.bar.set_prefix("Cropping");
    }

    fn elapsed(&self) -> String {
        let ms = self
            .label_started
            .lock()
            .ok()
            .and_then(|mut started| started.take())
            .map(|t| t.elapsed().as_millis())
            .unwrap_or(0);
        dim(&format!("{:.1}s", ms as f64 / 1000.0))
    }
}

impl PreparationProgressCallback for CliProgressCallback {
    fn on_stage(&self, stage: Stage) {
        match stage {
            Stage::Merging => {
                self.bar.set_prefix("Merging");
                self.bar.set_message("");
            }
            Stage::CleaningUp => self.bar.set_prefix("Cleaning up"),
            Stage::Failed => self.bar.finish_and_clear(),
            _ => {}
        }
    }

    fn on_preparation_start(&self, total_labels: usize) {
        self.activate_bar(total_labels);
        self.bar.println(format!(
            "{} {}",
            cyan("◆"),
            bold(&format!("Preparing {total_labels} labels…"))
        ));
    }

    fn on_label_start(&self, _index: usize, _total: usize, name: &str) {
        if let Ok(mut started) = self.label_started.lock() {
            *started = Some(Instant::now());
        }
        self.bar.set_message(name.to_string());
    }

    fn on_label_complete(&self, index: usize, total: usize, name: &str, carrier: Carrier) {
        self.bar.println(format!(
            "  {} Label {:>3}/{:<3}  {:<32}  {:<14}  {}",
            green("✓"),
            index,
            total,
            name,
            dim(&carrier.to_string()),
            self.elapsed(),
        ));
        self.bar.inc(1);
    }

    fn on_label_error(&self, index: usize, total: usize, name: &str, error: &str) {
        // Truncate very long error messages to keep output tidy.
        let msg = if error.chars().count() > 80 {
            format!("{}\u{2026}", error.chars().take(79).collect::<String>())
        } else {
            error.to_string()
        };

        self.bar.println(format!(
            "  {} Label {:>3}/{:<3}  {:<32}  {}  {}",
            red("✗"),
            index,
            total,
            name,
            red(&msg),
            self.elapsed(),
        ));
    }

    fn on_preparation_complete(&self, output: &Path, labels: usize) {
        self.bar.finish_and_clear();
        eprintln!(
            "{} {} labels  →  {}",
            green("✔"),
            bold(&labels.to_string()),
            bold(&output.display().to_string())
        );
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Crop and merge every label of ~/Downloads/labels into ~/print
  labelprep ~/Downloads/labels ~/print

  # Show how a single label would be classified and cropped
  labelprep --inspect ~/Downloads/labels/order-1234.pdf

  # Machine-readable summary
  labelprep --json ~/Downloads/labels ~/print > summary.json

SUPPORTED CARRIERS:
  Carrier        Recognised by                             Crop (left bottom right top)  Rotation
  ─────────────  ────────────────────────────────────────  ────────────────────────────  ────────
  Mondial Relay  Author contains "MondialRelay"            0  H/2  W  H                  270°
  Colissimo      empty Author, Producer contains "iText"   52  160  W/2-76  H-85         none

OUTPUT:
  <DEST>/<YYYYMMDD-HHMM>_ready_to_print.pdf: every label in directory-listing order.
  Intermediate <DEST>/.cropped.<name> files are removed once the merge succeeds.

ENVIRONMENT VARIABLES:
  LABELPREP_SOURCE   Default source directory
  LABELPREP_DEST     Default destination directory
  PDFIUM_LIB_PATH    Path to the libpdfium shared library (otherwise ./ then the system library)
  RUST_LOG           Override the log filter (e.g. labelprep=debug)
"#;

/// Crop, rotate and merge carrier shipping labels into one print-ready PDF.
#[derive(Parser, Debug)]
#[command(
    name = "labelprep",
    version,
    about = "Crop, rotate and merge carrier shipping labels into one print-ready PDF",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Directory containing the label PDFs.
    #[arg(env = "LABELPREP_SOURCE", required_unless_present = "inspect")]
    source: Option<PathBuf>,

    /// Directory receiving the merged document.
    #[arg(env = "LABELPREP_DEST", required_unless_present = "inspect")]
    dest: Option<PathBuf>,

    /// Classify one label and print its crop region, without writing anything.
    #[arg(long, value_name = "FILE")]
    inspect: Option<PathBuf>,

    /// Output a JSON summary instead of text.
    #[arg(long, env = "LABELPREP_JSON")]
    json: bool,

    /// Disable progress bar.
    #[arg(long, env = "LABELPREP_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "LABELPREP_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "LABELPREP_QUIET")]
    quiet: bool,
}

/// Default log filter when `RUST_LOG` is not set.
fn log_filter(verbose: bool, quiet: bool, show_progress: bool) -> &'static str {
    if verbose {
        "debug"
    } else if quiet {
        "error"
    } else if show_progress {
        "warn"
    } else {
        "info"
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // Suppress INFO-level library logs when the progress bar is active;
    // the bar already reports every label. Skipped entries still warn.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json && cli.inspect.is_none();
    let filter = log_filter(cli.verbose, cli.quiet, show_progress);

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    let engine = PdfiumEngine::bind().context("PDF engine unavailable")?;

    // ── Inspect-only mode ────────────────────────────────────────────────
    if let Some(ref path) = cli.inspect {
        let inspection = inspect(&engine, path)
            .with_context(|| format!("Failed to inspect {}", path.display()))?;

        if cli.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&inspection)
                    .context("Failed to serialize inspection")?
            );
        } else {
            for line in &inspection.report {
                println!("{}", dim(line));
            }
            println!();
            println!("Carrier:      {}", bold(&inspection.carrier.to_string()));
            match inspection.region {
                Some(region) => {
                    println!("Crop region:  {region}");
                    println!(
                        "Rotation:     {}",
                        if inspection.rotated { "270°" } else { "none" }
                    );
                }
                None => println!("Crop region:  {}", red("none (label would be rejected)")),
            }
        }
        return Ok(());
    }

    // ── Build config ─────────────────────────────────────────────────────
    let (Some(source), Some(dest)) = (cli.source.clone(), cli.dest.clone()) else {
        anyhow::bail!("SOURCE and DEST directories are required");
    };

    let progress_cb: Option<ProgressCallback> = if show_progress {
        let cb = CliProgressCallback::new_dynamic();
        Some(cb as Arc<dyn PreparationProgressCallback>)
    } else {
        None
    };

    let mut builder = PrepConfig::builder(source, dest);
    if let Some(cb) = progress_cb {
        builder = builder.progress_callback(cb);
    }
    let config = builder.build().context("Invalid configuration")?;

    // ── Run preparation ──────────────────────────────────────────────────
    let output = PreparationJob::new(config)
        .context("Cannot start preparation")?
        .run(&engine)
        .context("Preparation failed")?;

    if cli.json {
        let json = serde_json::to_string_pretty(&output).context("Failed to serialise output")?;
        println!("{json}");
    } else if !cli.quiet && !show_progress {
        for label in &output.labels {
            eprintln!(
                "  {}  {:<14}  {}{}",
                label.source.display(),
                label.carrier.to_string(),
                label.region,
                if label.rotated { "  rotated 270°" } else { "" }
            );
        }
        eprintln!(
            "Prepared {} labels in {}ms → {}",
            output.labels.len(),
            output.duration_ms,
            output.output_path.display()
        );
    }

    Ok(())
}
