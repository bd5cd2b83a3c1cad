//! Batch preparation: scan, crop every label, merge, clean up.
//!
//! ## Stages
//!
//! ```text
//! Idle ──▶ Scanning ──▶ PerFileProcessing ──▶ Merging ──▶ CleaningUp ──▶ Done
//!              │                │                 │            │
//!              └────────────────┴─────────────────┴────────────┴──▶ Failed
//! ```
//!
//! A [`PreparationJob`] is consumed by [`PreparationJob::run`]: one job, one
//! run, no resumption. The first error of any stage ends the run.
//!
//! ## Intermediates
//!
//! Every `.cropped.<name>` file is recorded in an [`Intermediates`] guard
//! before the engine writes it. The cleaning-up stage deletes all of them and
//! reports the first failure together with the number of files it could not
//! remove. Whatever is still recorded when the guard is dropped after a failed
//! run is swept on a best-effort basis.

use crate::classify::{self, Carrier};
use crate::config::PrepConfig;
use crate::engine::PdfEngine;
use crate::error::PrepError;
use crate::metadata::{self, LabelMetadata};
use crate::output::{LabelInspection, LabelOutcome, PreparationOutput};
use crate::progress::{NoopProgressCallback, ProgressCallback};
use crate::region::{self, CropRegion, RegionError};
use crate::transform;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Prefix of the per-label cropped files written to the destination directory.
pub const INTERMEDIATE_PREFIX: &str = ".cropped.";
/// Suffix of the merged document's file name.
pub const OUTPUT_SUFFIX: &str = "_ready_to_print.pdf";
/// `chrono` format of the merged document's timestamp (`YYYYMMDD-HHMM`).
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d-%H%M";

/// Where a run currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Stage {
    Idle,
    Scanning,
    PerFileProcessing,
    Merging,
    CleaningUp,
    Done,
    Failed,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Stage::Idle => "idle",
            Stage::Scanning => "scanning",
            Stage::PerFileProcessing => "processing labels",
            Stage::Merging => "merging",
            Stage::CleaningUp => "cleaning up",
            Stage::Done => "done",
            Stage::Failed => "failed",
        })
    }
}

/// A label file with everything derived from its info report.
#[derive(Debug, Clone)]
pub struct LabelDocument {
    pub path: PathBuf,
    pub report: Vec<String>,
    pub metadata: LabelMetadata,
    pub carrier: Carrier,
}

impl LabelDocument {
    /// Read the info report of `path` and classify the label.
    pub fn load(engine: &dyn PdfEngine, path: &Path) -> Result<Self, PrepError> {
        let report = engine
            .info(path)
            .map_err(|e| PrepError::MetadataUnavailable {
                path: path.to_path_buf(),
                detail: e.detail,
            })?;
        let metadata =
            metadata::extract(&report).map_err(|e| PrepError::MetadataUnavailable {
                path: path.to_path_buf(),
                detail: e.0,
            })?;
        let carrier = classify::classify(&metadata.author, &metadata.producer);
        debug!(
            "{}: author={:?} producer={:?} page={}x{} → {}",
            path.display(),
            metadata.author,
            metadata.producer,
            metadata.page_width,
            metadata.page_height,
            carrier
        );

        Ok(Self {
            path: path.to_path_buf(),
            report,
            metadata,
            carrier,
        })
    }

    /// The carrier's crop region on this label's page.
    pub fn crop_region(&self) -> Result<CropRegion, PrepError> {
        region::compute(
            self.carrier,
            self.metadata.page_width,
            self.metadata.page_height,
        )
        .map_err(|e| match e {
            RegionError::NoRegionDefined { carrier } => PrepError::NoRegionDefined {
                path: self.path.clone(),
                carrier,
            },
            RegionError::OutOfBounds { carrier, region } => PrepError::RegionOutOfBounds {
                path: self.path.clone(),
                carrier,
                region,
                page_width: self.metadata.page_width,
                page_height: self.metadata.page_height,
            },
        })
    }

    fn file_name(&self) -> String {
        file_name(&self.path)
    }
}

/// Job-scoped record of intermediate files.
#[derive(Debug, Default)]
pub struct Intermediates {
    paths: Vec<PathBuf>,
}

impl Intermediates {
    pub fn track(&mut self, path: PathBuf) {
        self.paths.push(path);
    }

    /// Recorded files, in creation order.
    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Delete every recorded file, in order.
    ///
    /// A file that is already gone counts as removed, so cleaning an already
    /// cleaned set is a no-op. Files that cannot be deleted stay recorded and
    /// the first such failure is returned, with `remaining` counting what is
    /// still on disk. Returns how many files were removed.
    pub fn cleanup(&mut self) -> Result<usize, PrepError> {
        let mut removed = 0;
        let mut failure = None;
        self.paths.retain(|path| match remove_if_present(path) {
            Ok(()) => {
                removed += 1;
                false
            }
            Err(e) => {
                warn!("Could not remove intermediate {}: {}", path.display(), e);
                failure.get_or_insert((path.clone(), e));
                true
            }
        });

        match failure {
            Some((path, source)) => Err(PrepError::CleanupFailed {
                path,
                remaining: self.paths.len(),
                source,
            }),
            None => Ok(removed),
        }
    }
}

impl Drop for Intermediates {
    fn drop(&mut self) {
        for path in self.paths.drain(..) {
            match remove_if_present(&path) {
                Ok(()) => debug!("Swept leftover intermediate {}", path.display()),
                Err(e) => warn!(
                    "Could not remove leftover intermediate {}: {}",
                    path.display(),
                    e
                ),
            }
        }
    }
}

fn remove_if_present(path: &Path) -> io::Result<()> {
    match fs::remove_file(path) {
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        other => other,
    }
}

/// One preparation run over a source directory.
pub struct PreparationJob {
    source_dir: PathBuf,
    dest_dir: PathBuf,
    progress: ProgressCallback,
    stage: Stage,
}

impl PreparationJob {
    /// Validate both directories and create an idle job.
    pub fn new(config: PrepConfig) -> Result<Self, PrepError> {
        let source_dir = validate_directory("source", &config.source_dir)?;
        let dest_dir = validate_directory("destination", &config.dest_dir)?;

        Ok(Self {
            source_dir,
            dest_dir,
            progress: config
                .progress_callback
                .unwrap_or_else(|| Arc::new(NoopProgressCallback)),
            stage: Stage::Idle,
        })
    }

    pub fn source_dir(&self) -> &Path {
        &self.source_dir
    }

    pub fn dest_dir(&self) -> &Path {
        &self.dest_dir
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// Run the job, naming the output after the current local time.
    pub fn run(self, engine: &dyn PdfEngine) -> Result<PreparationOutput, PrepError> {
        self.run_at(engine, chrono::Local::now().naive_local())
    }

    /// Run the job with a fixed timestamp for the output name.
    pub fn run_at(
        mut self,
        engine: &dyn PdfEngine,
        timestamp: NaiveDateTime,
    ) -> Result<PreparationOutput, PrepError> {
        let started = Instant::now();
        info!(
            "Starting preparation of shipping labels ({} engine)",
            engine.backend_name()
        );

        let mut intermediates = Intermediates::default();
        let result = self.execute(engine, timestamp, &mut intermediates);

        match result {
            Ok((output_path, labels)) => {
                self.advance(Stage::Done);
                self.progress
                    .on_preparation_complete(&output_path, labels.len());
                Ok(PreparationOutput {
                    output_path,
                    labels,
                    duration_ms: started.elapsed().as_millis() as u64,
                })
            }
            Err(e) => {
                self.advance(Stage::Failed);
                Err(e)
            }
        }
    }

    fn execute(
        &mut self,
        engine: &dyn PdfEngine,
        timestamp: NaiveDateTime,
        intermediates: &mut Intermediates,
    ) -> Result<(PathBuf, Vec<LabelOutcome>), PrepError> {
        // ── Scanning ─────────────────────────────────────────────────────
        self.advance(Stage::Scanning);
        let sources = self.scan()?;
        if sources.is_empty() {
            return Err(PrepError::NoLabelsFound {
                path: self.source_dir.clone(),
            });
        }
        let total = sources.len();
        info!("Found {} labels in {}", total, self.source_dir.display());
        self.progress.on_preparation_start(total);

        // ── Per-file processing ──────────────────────────────────────────
        self.advance(Stage::PerFileProcessing);
        let mut labels = Vec::with_capacity(total);
        for (i, source) in sources.iter().enumerate() {
            let name = file_name(source);
            self.progress.on_label_start(i + 1, total, &name);

            match self.process_label(engine, source, intermediates) {
                Ok(outcome) => {
                    self.progress
                        .on_label_complete(i + 1, total, &name, outcome.carrier);
                    labels.push(outcome);
                }
                Err(e) => {
                    self.progress
                        .on_label_error(i + 1, total, &name, &e.to_string());
                    return Err(e);
                }
            }
        }
        info!("All files cropped!");

        // ── Merging ──────────────────────────────────────────────────────
        self.advance(Stage::Merging);
        let output_path = self.output_path(timestamp);
        info!(
            "Combining {} cropped files into {}",
            intermediates.len(),
            output_path.display()
        );
        engine
            .merge(intermediates.paths(), &output_path)
            .map_err(|e| PrepError::MergeFailed {
                output: output_path.clone(),
                count: intermediates.len(),
                detail: e.detail,
            })?;
        info!("All files combined to {}", output_path.display());

        // ── Cleaning up ──────────────────────────────────────────────────
        self.advance(Stage::CleaningUp);
        let removed = intermediates.cleanup()?;
        debug!("Removed {} intermediate files", removed);

        Ok((output_path, labels))
    }

    fn process_label(
        &self,
        engine: &dyn PdfEngine,
        source: &Path,
        intermediates: &mut Intermediates,
    ) -> Result<LabelOutcome, PrepError> {
        let label = LabelDocument::load(engine, source)?;
        let region = label.crop_region()?;
        info!("{}: provider identified as {}", label.file_name(), label.carrier);

        let cropped = self.intermediate_path(&label.file_name());
        intermediates.track(cropped.clone());
        let rotated = transform::apply(engine, source, label.carrier, &region, &cropped)?;

        Ok(LabelOutcome {
            source: label.path,
            carrier: label.carrier,
            region,
            rotated,
        })
    }

    /// Regular `.pdf` files of the source directory, in listing order.
    fn scan(&self) -> Result<Vec<PathBuf>, PrepError> {
        let scan_err = |source| PrepError::ScanFailed {
            path: self.source_dir.clone(),
            source,
        };

        let mut labels = Vec::new();
        for entry in fs::read_dir(&self.source_dir).map_err(scan_err)? {
            let entry = entry.map_err(scan_err)?;
            let path = entry.path();
            let name = entry.file_name().to_string_lossy().into_owned();

            if !name.ends_with(".pdf") {
                warn!("{} extension is not .pdf, ignoring", name);
                continue;
            }
            if !path.is_file() {
                warn!("{} is not a regular file, ignoring", name);
                continue;
            }
            labels.push(path);
        }
        Ok(labels)
    }

    fn intermediate_path(&self, name: &str) -> PathBuf {
        self.dest_dir.join(format!("{INTERMEDIATE_PREFIX}{name}"))
    }

    fn output_path(&self, timestamp: NaiveDateTime) -> PathBuf {
        self.dest_dir
            .join(format!("{}{}", timestamp.format(TIMESTAMP_FORMAT), OUTPUT_SUFFIX))
    }

    fn advance(&mut self, stage: Stage) {
        debug!("Stage: {} → {}", self.stage, stage);
        self.stage = stage;
        self.progress.on_stage(stage);
    }
}

/// Classify one label and compute its region without writing anything.
///
/// An unrecognized carrier or an out-of-page region is reported through
/// [`LabelInspection::region`] being `None`, not as an error.
pub fn inspect(engine: &dyn PdfEngine, path: &Path) -> Result<LabelInspection, PrepError> {
    let label = LabelDocument::load(engine, path)?;
    let region = label.crop_region().ok();
    let rotated = region.is_some() && transform::needs_rotation(label.carrier);

    Ok(LabelInspection {
        path: label.path,
        report: label.report,
        metadata: label.metadata,
        carrier: label.carrier,
        region,
        rotated,
    })
}

fn validate_directory(role: &'static str, path: &Path) -> Result<PathBuf, PrepError> {
    let invalid = |reason| PrepError::InvalidDirectory {
        role,
        path: path.to_path_buf(),
        reason,
    };

    match fs::metadata(path) {
        Ok(meta) if meta.is_dir() => {
            info!("Setting {} directory to: {}", role, path.display());
            Ok(path.to_path_buf())
        }
        Ok(_) => Err(invalid("not a directory")),
        Err(_) => Err(invalid("does not exist")),
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}
