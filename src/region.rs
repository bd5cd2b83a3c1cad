//! Carrier-specific crop regions.
//!
//! Coordinates are PDF points (1/72 inch) with the origin at the bottom-left
//! corner of the page, listed as left, bottom, right, top.

use crate::classify::Carrier;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// The retained rectangle of a label page.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CropRegion {
    pub left: f64,
    pub bottom: f64,
    pub right: f64,
    pub top: f64,
}

impl CropRegion {
    pub fn new(left: f64, bottom: f64, right: f64, top: f64) -> Self {
        Self {
            left,
            bottom,
            right,
            top,
        }
    }

    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    pub fn height(&self) -> f64 {
        self.top - self.bottom
    }

    /// `0 ≤ left < right ≤ width` and `0 ≤ bottom < top ≤ height`.
    pub fn fits(&self, page_width: f64, page_height: f64) -> bool {
        0.0 <= self.left
            && self.left < self.right
            && self.right <= page_width
            && 0.0 <= self.bottom
            && self.bottom < self.top
            && self.top <= page_height
    }
}

impl fmt::Display for CropRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{:.2} {:.2} {:.2} {:.2}]",
            self.left, self.bottom, self.right, self.top
        )
    }
}

/// Why no usable region exists for a label.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RegionError {
    #[error("no crop region defined for {carrier} labels")]
    NoRegionDefined { carrier: Carrier },

    #[error("{carrier} crop region {region} does not fit the page")]
    OutOfBounds { carrier: Carrier, region: CropRegion },
}

// Colissimo margins, in points.
const COLISSIMO_LEFT: f64 = 52.0;
const COLISSIMO_BOTTOM: f64 = 160.0;
const COLISSIMO_RIGHT_INSET: f64 = 76.0;
const COLISSIMO_TOP_INSET: f64 = 85.0;

/// Compute the crop region for a carrier on a `page_width` x `page_height`
/// page, rejecting regions that fall outside the page.
pub fn compute(
    carrier: Carrier,
    page_width: f64,
    page_height: f64,
) -> Result<CropRegion, RegionError> {
    let region = match carrier {
        // Label sits in the upper half.
        Carrier::MondialRelay => CropRegion::new(0.0, page_height / 2.0, page_width, page_height),
        Carrier::Colissimo => CropRegion::new(
            COLISSIMO_LEFT,
            COLISSIMO_BOTTOM,
            page_width / 2.0 - COLISSIMO_RIGHT_INSET,
            page_height - COLISSIMO_TOP_INSET,
        ),
        Carrier::Unrecognized => return Err(RegionError::NoRegionDefined { carrier }),
    };

    if !region.fits(page_width, page_height) {
        return Err(RegionError::OutOfBounds { carrier, region });
    }
    Ok(region)
}
