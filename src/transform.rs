//! Per-label transform: crop, then rotate Mondial Relay labels.

use crate::classify::Carrier;
use crate::engine::PdfEngine;
use crate::error::PrepError;
use crate::region::CropRegion;
use std::path::Path;
use tracing::info;

/// Clockwise rotation applied to cropped Mondial Relay labels.
pub const MONDIAL_RELAY_ROTATION: i32 = 270;

/// Whether a cropped label of this carrier gets rotated.
pub fn needs_rotation(carrier: Carrier) -> bool {
    carrier == Carrier::MondialRelay
}

/// Crop `source` to `region` into `output`, then rotate `output` in place when
/// the carrier calls for it. Returns whether the label was rotated.
pub fn apply(
    engine: &dyn PdfEngine,
    source: &Path,
    carrier: Carrier,
    region: &CropRegion,
    output: &Path,
) -> Result<bool, PrepError> {
    info!("Cropping {} to {}", source.display(), output.display());
    engine
        .crop(source, output, region)
        .map_err(|e| PrepError::TransformFailed {
            path: source.to_path_buf(),
            operation: "crop",
            detail: e.detail,
        })?;

    if !needs_rotation(carrier) {
        return Ok(false);
    }

    info!("Got a {} label, rotating result", carrier);
    engine
        .rotate(output, None, MONDIAL_RELAY_ROTATION)
        .map_err(|e| PrepError::TransformFailed {
            path: output.to_path_buf(),
            operation: "rotate",
            detail: e.detail,
        })?;
    Ok(true)
}
