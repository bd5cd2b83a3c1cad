//! Result types returned by a preparation run and by label inspection.

use crate::classify::Carrier;
use crate::metadata::LabelMetadata;
use crate::region::CropRegion;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// What happened to one label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelOutcome {
    /// Original label file.
    pub source: PathBuf,
    pub carrier: Carrier,
    pub region: CropRegion,
    /// Whether the cropped label was rotated.
    pub rotated: bool,
}

/// The result of a successful run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreparationOutput {
    /// The merged, print-ready document.
    pub output_path: PathBuf,
    /// Labels in merge order.
    pub labels: Vec<LabelOutcome>,
    /// Wall-clock time of the whole run.
    pub duration_ms: u64,
}

/// Classification of a single file, without transforming it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabelInspection {
    pub path: PathBuf,
    /// The raw info report.
    pub report: Vec<String>,
    pub metadata: LabelMetadata,
    pub carrier: Carrier,
    /// `None` when the carrier has no crop formula or the region does not fit.
    pub region: Option<CropRegion>,
    pub rotated: bool,
}
