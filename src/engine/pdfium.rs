//! [`PdfEngine`] backed by the pdfium C++ library via `pdfium-render`.
//!
//! ## Binding
//!
//! `PDFIUM_LIB_PATH` names an explicit library file; otherwise the platform
//! library in the working directory is tried, then the system library search
//! path. Binding happens once per engine and every
//! operation reuses it.
//!
//! ## In-place rotation
//!
//! pdfium reads lazily from an open file handle, so writing back to the same
//! path while the document is loaded would corrupt it. Rotation therefore
//! loads the whole file into memory first.

use super::PdfEngine;
use crate::error::{EngineError, PrepError};
use crate::metadata::{AUTHOR_LABEL, PRODUCER_LABEL};
use crate::region::CropRegion;
use pdfium_render::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Document-level fields shown in the info report.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocumentInfo {
    pub version: String,
    pub page_count: usize,
    /// First page size in points.
    pub page_width: f64,
    pub page_height: f64,
    pub title: String,
    pub subject: String,
    pub author: String,
    pub creator: String,
    pub producer: String,
    pub creation_date: String,
    pub modification_date: String,
}

/// Render the fixed-schema info report.
///
/// Line positions are a contract with [`crate::metadata::extract`]:
/// the page size is on line 3, the author on line 6, the producer on line 8.
pub fn render_report(file_name: &str, doc: &DocumentInfo) -> Vec<String> {
    vec![
        format!("File: {file_name}"),
        format!("PDF version: {}", doc.version),
        format!("Page count: {}", doc.page_count),
        format!(
            "Page size: {:.2} x {:.2} points",
            doc.page_width, doc.page_height
        ),
        format!("Title: {}", doc.title),
        format!("Subject: {}", doc.subject),
        format!("{AUTHOR_LABEL} {}", doc.author),
        format!("Content creator: {}", doc.creator),
        format!("{PRODUCER_LABEL} {}", doc.producer),
        format!("Creation date: {}", doc.creation_date),
        format!("Modification date: {}", doc.modification_date),
    ]
}

/// The production PDF engine.
pub struct PdfiumEngine {
    pdfium: Pdfium,
}

impl PdfiumEngine {
    /// Bind to the pdfium library.
    pub fn bind() -> Result<Self, PrepError> {
        let bindings = match std::env::var("PDFIUM_LIB_PATH") {
            Ok(path) => {
                debug!("Binding pdfium from PDFIUM_LIB_PATH={}", path);
                Pdfium::bind_to_library(&path)
                    .map_err(|e| PrepError::EngineUnavailable(format!("'{path}': {e}")))?
            }
            Err(_) => Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path("./"))
                .or_else(|local| {
                    debug!("No pdfium in the working directory ({}), trying system library", local);
                    Pdfium::bind_to_system_library()
                })
                .map_err(|e| PrepError::EngineUnavailable(e.to_string()))?,
        };
        info!("PDF engine ready: pdfium");
        Ok(Self {
            pdfium: Pdfium::new(bindings),
        })
    }

    fn load(&self, path: &Path) -> Result<PdfDocument<'_>, EngineError> {
        self.pdfium
            .load_pdf_from_file(path, None)
            .map_err(|e| EngineError::new(format!("cannot open '{}': {:?}", path.display(), e)))
    }

    fn save(document: &PdfDocument<'_>, path: &Path) -> Result<(), EngineError> {
        document
            .save_to_file(path)
            .map_err(|e| EngineError::new(format!("cannot write '{}': {:?}", path.display(), e)))
    }
}

impl PdfEngine for PdfiumEngine {
    fn info(&self, path: &Path) -> Result<Vec<String>, EngineError> {
        let document = self.load(path)?;
        let pages = document.pages();
        let first = pages
            .get(0)
            .map_err(|e| EngineError::new(format!("document has no first page: {:?}", e)))?;

        // pdfium reports the displayed size; crop boxes live in unrotated space.
        let rotation = first
            .rotation()
            .map_err(|e| EngineError::new(format!("first page rotation: {:?}", e)))?;
        let (page_width, page_height) = unrotated_size(
            first.width().value as f64,
            first.height().value as f64,
            rotation,
        );

        let metadata = document.metadata();
        let get_meta = |tag: PdfDocumentMetadataTagType| -> String {
            metadata
                .get(tag)
                .map(|t| t.value().to_string())
                .unwrap_or_default()
        };

        let doc = DocumentInfo {
            version: format!("{:?}", document.version()),
            page_count: pages.len() as usize,
            page_width,
            page_height,
            title: get_meta(PdfDocumentMetadataTagType::Title),
            subject: get_meta(PdfDocumentMetadataTagType::Subject),
            author: get_meta(PdfDocumentMetadataTagType::Author),
            creator: get_meta(PdfDocumentMetadataTagType::Creator),
            producer: get_meta(PdfDocumentMetadataTagType::Producer),
            creation_date: get_meta(PdfDocumentMetadataTagType::CreationDate),
            modification_date: get_meta(PdfDocumentMetadataTagType::ModificationDate),
        };

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(render_report(&file_name, &doc))
    }

    fn crop(&self, input: &Path, output: &Path, region: &CropRegion) -> Result<(), EngineError> {
        let document = self.load(input)?;
        let rect = PdfRect::new_from_values(
            region.bottom as f32,
            region.left as f32,
            region.top as f32,
            region.right as f32,
        );

        for (index, mut page) in document.pages().iter().enumerate() {
            page.boundaries_mut()
                .set_crop(rect)
                .map_err(|e| EngineError::new(format!("page {}: {:?}", index + 1, e)))?;
        }
        debug!("Cropped {} to {}", input.display(), region);

        Self::save(&document, output)
    }

    fn rotate(
        &self,
        input: &Path,
        output: Option<&Path>,
        degrees: i32,
    ) -> Result<(), EngineError> {
        if degrees % 90 != 0 {
            return Err(EngineError::new(format!(
                "rotation must be a multiple of 90 degrees, got {degrees}"
            )));
        }

        let bytes = std::fs::read(input)
            .map_err(|e| EngineError::new(format!("cannot read '{}': {}", input.display(), e)))?;
        let document = self
            .pdfium
            .load_pdf_from_byte_vec(bytes, None)
            .map_err(|e| EngineError::new(format!("cannot open '{}': {:?}", input.display(), e)))?;

        for (index, mut page) in document.pages().iter().enumerate() {
            let current = page
                .rotation()
                .map_err(|e| EngineError::new(format!("page {}: {:?}", index + 1, e)))?;
            page.set_rotation(rotation_from_degrees(rotation_degrees(current) + degrees));
        }

        Self::save(&document, output.unwrap_or(input))
    }

    fn merge(&self, inputs: &[PathBuf], output: &Path) -> Result<(), EngineError> {
        if inputs.is_empty() {
            return Err(EngineError::new("no documents to merge"));
        }

        let mut merged = self
            .pdfium
            .create_new_pdf()
            .map_err(|e| EngineError::new(format!("cannot create document: {:?}", e)))?;

        for input in inputs {
            let source = self.load(input)?;
            merged.pages_mut().append(&source).map_err(|e| {
                EngineError::new(format!("cannot append '{}': {:?}", input.display(), e))
            })?;
        }
        debug!("Merged {} documents", inputs.len());

        Self::save(&merged, output)
    }

    fn backend_name(&self) -> &str {
        "pdfium"
    }
}

/// Page size in the page's own coordinate space, given its displayed size.
fn unrotated_size(width: f64, height: f64, rotation: PdfPageRenderRotation) -> (f64, f64) {
    match rotation {
        PdfPageRenderRotation::Degrees90 | PdfPageRenderRotation::Degrees270 => (height, width),
        _ => (width, height),
    }
}

fn rotation_degrees(rotation: PdfPageRenderRotation) -> i32 {
    match rotation {
        PdfPageRenderRotation::None => 0,
        PdfPageRenderRotation::Degrees90 => 90,
        PdfPageRenderRotation::Degrees180 => 180,
        PdfPageRenderRotation::Degrees270 => 270,
    }
}

fn rotation_from_degrees(degrees: i32) -> PdfPageRenderRotation {
    match degrees.rem_euclid(360) {
        90 => PdfPageRenderRotation::Degrees90,
        180 => PdfPageRenderRotation::Degrees180,
        270 => PdfPageRenderRotation::Degrees270,
        _ => PdfPageRenderRotation::None,
    }
}
