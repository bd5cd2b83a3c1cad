//! The PDF engine boundary.
//!
//! Everything that touches PDF bytes goes through [`PdfEngine`]: producing
//! the info report, setting crop boxes, rotating pages and merging documents.
//! The pipeline itself only decides *what* to do; swapping the backend (or a
//! recording fake in tests) never touches classification or orchestration.
//!
//! All operations are blocking and are called from a single thread.

pub mod pdfium;

use crate::error::EngineError;
use crate::region::CropRegion;
use std::path::{Path, PathBuf};

pub use self::pdfium::PdfiumEngine;

/// Crop, rotate, merge and describe PDF files.
pub trait PdfEngine {
    /// Fixed-schema informational report for `path`, one field per line.
    fn info(&self, path: &Path) -> Result<Vec<String>, EngineError>;

    /// Write `input` to `output` with every page cropped to `region`.
    fn crop(&self, input: &Path, output: &Path, region: &CropRegion) -> Result<(), EngineError>;

    /// Rotate every page of `input` clockwise by `degrees` (a multiple of 90),
    /// writing to `output`, or back to `input` when `output` is `None`.
    fn rotate(&self, input: &Path, output: Option<&Path>, degrees: i32)
        -> Result<(), EngineError>;

    /// Concatenate `inputs`, in order, into a new document at `output`.
    fn merge(&self, inputs: &[PathBuf], output: &Path) -> Result<(), EngineError>;

    /// Name of this backend (for diagnostics).
    fn backend_name(&self) -> &str;
}
