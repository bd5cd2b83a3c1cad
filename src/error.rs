//! Error types for the labelprep library.
//!
//! Two error types reflect two layers:
//!
//! * [`PrepError`]: **fatal**, the preparation run stops at the first one.
//!   Every variant names the file or directory it concerns so the caller can
//!   tell which label broke the batch.
//!
//! * [`EngineError`]: returned by a [`crate::engine::PdfEngine`] operation.
//!   It carries only the engine's own description; the pipeline wraps it into
//!   the matching [`PrepError`] variant together with the file context.

use crate::classify::Carrier;
use crate::region::CropRegion;
use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the labelprep library.
#[derive(Debug, Error)]
pub enum PrepError {
    // ── Job construction ──────────────────────────────────────────────────
    /// Source or destination directory is missing or is not a directory.
    #[error("{role} directory '{path}' is invalid: {reason}")]
    InvalidDirectory {
        role: &'static str,
        path: PathBuf,
        reason: &'static str,
    },

    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The PDF engine library could not be loaded.
    #[error(
        "Failed to bind to pdfium library: {0}\n\
Set PDFIUM_LIB_PATH=/path/to/libpdfium, place the library in the working directory, \
or install it on the system library path."
    )]
    EngineUnavailable(String),

    // ── Scanning ──────────────────────────────────────────────────────────
    /// The source directory could not be listed.
    #[error("Failed to list source directory '{path}': {source}")]
    ScanFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The source directory holds no `.pdf` file.
    #[error("No .pdf labels found in '{path}'")]
    NoLabelsFound { path: PathBuf },

    // ── Per-label processing ──────────────────────────────────────────────
    /// The info report could not be obtained or does not follow its schema.
    #[error("Metadata unavailable for '{path}': {detail}")]
    MetadataUnavailable { path: PathBuf, detail: String },

    /// The label was classified but has no crop formula (this includes
    /// labels no classification rule matched).
    #[error("No crop region defined for '{path}' (carrier: {carrier})")]
    NoRegionDefined { path: PathBuf, carrier: Carrier },

    /// The computed crop region does not fit on the page.
    #[error(
        "Crop region {region} for '{path}' ({carrier}) does not fit a \
         {page_width:.2} x {page_height:.2} points page"
    )]
    RegionOutOfBounds {
        path: PathBuf,
        carrier: Carrier,
        region: CropRegion,
        page_width: f64,
        page_height: f64,
    },

    /// Crop or rotate failed in the PDF engine.
    #[error("Failed to {operation} '{path}': {detail}")]
    TransformFailed {
        path: PathBuf,
        operation: &'static str,
        detail: String,
    },

    // ── Merge / cleanup ───────────────────────────────────────────────────
    /// The cropped labels could not be merged into the output document.
    #[error("Failed to merge {count} labels into '{output}': {detail}")]
    MergeFailed {
        output: PathBuf,
        count: usize,
        detail: String,
    },

    /// An intermediate file could not be deleted; `remaining` files (this one
    /// included) were left in place.
    #[error("Failed to remove intermediate '{path}' ({remaining} left on disk): {source}")]
    CleanupFailed {
        path: PathBuf,
        remaining: usize,
        #[source]
        source: std::io::Error,
    },
}

/// A failure reported by a [`crate::engine::PdfEngine`] operation.
#[derive(Debug, Clone, Error)]
#[error("{detail}")]
pub struct EngineError {
    pub detail: String,
}

impl EngineError {
    pub fn new(detail: impl Into<String>) -> Self {
        Self {
            detail: detail.into(),
        }
    }
}
