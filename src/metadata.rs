//! Label metadata extraction from the engine's info report.
//!
//! The report is a fixed-schema list of `Label: value` lines (see
//! [`crate::engine::pdfium::render_report`]). Page size is found by pattern
//! anywhere in the report; author and producer are read from their fixed
//! positions, and each position must carry the expected label. Anything else
//! is reported as a [`MetadataError`] instead of indexing past the report.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Line index of the author field.
pub const AUTHOR_LINE: usize = 6;
/// Line index of the producer field.
pub const PRODUCER_LINE: usize = 8;

pub const AUTHOR_LABEL: &str = "Author:";
pub const PRODUCER_LABEL: &str = "PDF Producer:";

static PAGE_SIZE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"Page size: ([0-9.]+) x ([0-9.]+) points").unwrap());

/// The fields classification and region computation need.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelMetadata {
    /// Page width in points.
    pub page_width: f64,
    /// Page height in points.
    pub page_height: f64,
    pub author: String,
    pub producer: String,
}

/// Why a report could not be turned into [`LabelMetadata`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct MetadataError(pub String);

/// Extract page geometry, author and producer from an info report.
pub fn extract<S: AsRef<str>>(report: &[S]) -> Result<LabelMetadata, MetadataError> {
    if report.len() <= PRODUCER_LINE {
        return Err(MetadataError(format!(
            "info report has {} lines, expected at least {}",
            report.len(),
            PRODUCER_LINE + 1
        )));
    }

    let (page_width, page_height) = page_size(report)?;
    let author = field(report, AUTHOR_LINE, AUTHOR_LABEL)?;
    let producer = field(report, PRODUCER_LINE, PRODUCER_LABEL)?;

    Ok(LabelMetadata {
        page_width,
        page_height,
        author,
        producer,
    })
}

fn page_size<S: AsRef<str>>(report: &[S]) -> Result<(f64, f64), MetadataError> {
    let caps = report
        .iter()
        .find_map(|line| PAGE_SIZE_RE.captures(line.as_ref()))
        .ok_or_else(|| MetadataError("no 'Page size' line in info report".into()))?;

    let parse = |idx: usize| -> Result<f64, MetadataError> {
        let raw = &caps[idx];
        let value: f64 = raw
            .parse()
            .map_err(|_| MetadataError(format!("unparsable page dimension '{raw}'")))?;
        if value > 0.0 {
            Ok(value)
        } else {
            Err(MetadataError(format!("page dimension must be > 0, got {raw}")))
        }
    };

    Ok((parse(1)?, parse(2)?))
}

fn field<S: AsRef<str>>(report: &[S], index: usize, label: &str) -> Result<String, MetadataError> {
    let line = report[index].as_ref().trim_start();
    line.strip_prefix(label)
        .map(|value| value.trim().to_string())
        .ok_or_else(|| {
            MetadataError(format!(
                "line {index} should start with '{label}', got '{line}'"
            ))
        })
}
