//! Configuration for a preparation job.
//!
//! A job needs exactly two directories: where the carrier labels are read
//! from and where the print-ready document is written. Directory existence is
//! checked when the job is constructed ([`crate::prepare::PreparationJob::new`]),
//! not here, so a config can be built ahead of time.

use crate::error::PrepError;
use crate::progress::ProgressCallback;
use std::fmt;
use std::path::PathBuf;

/// Configuration for one preparation run.
///
/// Built via [`PrepConfig::builder()`].
///
/// # Example
/// ```rust
/// use labelprep::PrepConfig;
///
/// let config = PrepConfig::builder("labels/", "print/").build().unwrap();
/// assert_eq!(config.source_dir.to_str(), Some("labels/"));
/// ```
#[derive(Clone)]
pub struct PrepConfig {
    /// Directory scanned for `.pdf` labels.
    pub source_dir: PathBuf,

    /// Directory receiving intermediates and the merged output.
    pub dest_dir: PathBuf,

    /// Optional progress callback.
    pub progress_callback: Option<ProgressCallback>,
}

impl fmt::Debug for PrepConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrepConfig")
            .field("source_dir", &self.source_dir)
            .field("dest_dir", &self.dest_dir)
            .field(
                "progress_callback",
                &self
                    .progress_callback
                    .as_ref()
                    .map(|_| "<dyn PreparationProgressCallback>"),
            )
            .finish()
    }
}

impl PrepConfig {
    /// Create a new builder for `PrepConfig`.
    pub fn builder(
        source_dir: impl Into<PathBuf>,
        dest_dir: impl Into<PathBuf>,
    ) -> PrepConfigBuilder {
        PrepConfigBuilder {
            config: PrepConfig {
                source_dir: source_dir.into(),
                dest_dir: dest_dir.into(),
                progress_callback: None,
            },
        }
    }
}

/// Builder for [`PrepConfig`].
#[derive(Debug)]
pub struct PrepConfigBuilder {
    config: PrepConfig,
}

impl PrepConfigBuilder {
    pub fn source_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.source_dir = dir.into();
        self
    }

    pub fn dest_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.dest_dir = dir.into();
        self
    }

    /// Set a progress callback to receive per-label events.
    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<PrepConfig, PrepError> {
        let c = &self.config;
        if c.source_dir.as_os_str().is_empty() {
            return Err(PrepError::InvalidConfig(
                "source directory must not be empty".into(),
            ));
        }
        if c.dest_dir.as_os_str().is_empty() {
            return Err(PrepError::InvalidConfig(
                "destination directory must not be empty".into(),
            ));
        }
        Ok(self.config)
    }
}
