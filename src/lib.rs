//! # labelprep
//!
//! Prepare a batch of carrier shipping-label PDFs for printing.
//!
//! Carrier label PDFs come with margins, receipts and instructions around the
//! actual label. This crate recognises which carrier produced each label,
//! crops it to the label itself, rotates it when the carrier prints it
//! sideways, and merges every label of a directory into one document.
//!
//! ## Pipeline Overview
//!
//! ```text
//! source dir
//!  │
//!  ├─ 1. Scan      keep *.pdf, in directory-listing order
//!  ├─ 2. Inspect   engine info report → page size, author, producer
//!  ├─ 3. Classify  ordered rule table → Mondial Relay / Colissimo / unrecognized
//!  ├─ 4. Region    carrier formula → crop rectangle (points), bounds-checked
//!  ├─ 5. Transform crop to .cropped.<name>; rotate 270° for Mondial Relay
//!  ├─ 6. Merge     all cropped labels → <YYYYMMDD-HHMM>_ready_to_print.pdf
//!  └─ 7. Clean up  remove the .cropped.* intermediates
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use labelprep::{PdfiumEngine, PrepConfig, PreparationJob};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let engine = PdfiumEngine::bind()?;
//!     let config = PrepConfig::builder("labels/", "print/").build()?;
//!     let output = PreparationJob::new(config)?.run(&engine)?;
//!     println!("{}", output.output_path.display());
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `labelprep` binary (clap + anyhow + tracing-subscriber + indicatif) |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod classify;
pub mod config;
pub mod engine;
pub mod error;
pub mod metadata;
pub mod output;
pub mod prepare;
pub mod progress;
pub mod region;
pub mod transform;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use classify::{classify, Carrier};
pub use config::{PrepConfig, PrepConfigBuilder};
pub use engine::{PdfEngine, PdfiumEngine};
pub use error::{EngineError, PrepError};
pub use metadata::LabelMetadata;
pub use output::{LabelInspection, LabelOutcome, PreparationOutput};
pub use prepare::{inspect, LabelDocument, PreparationJob, Stage};
pub use progress::{NoopProgressCallback, PreparationProgressCallback, ProgressCallback};
pub use region::CropRegion;
