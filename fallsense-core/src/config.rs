//! Run configuration
//!
//! All knobs of a preparation run in one serde struct. Defaults reproduce
//! the reference setup: 10-sample windows over the twelve inertial and
//! orientation columns, labels and peaks from `JERK_MAG` at the 95th
//! percentile, peaks at least 10 samples apart.
//!
//! ```rust
//! use fallsense_core::config::PipelineConfig;
//!
//! let config = PipelineConfig::from_json_str(r#"{ "seq_len": 25, "peak_distance": 50 }"#).unwrap();
//! assert_eq!(config.seq_len, 25);
//! assert_eq!(config.label_percentile, 0.95);
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::errors::{CoreResult, InvalidInputError};
use crate::fields::{SensorField, DISTRIBUTION_FIELDS, FEATURE_FIELDS};
use crate::labeler::{PercentileThreshold, DEFAULT_LABEL_PERCENTILE};
use crate::peaks::{PeakDetector, DEFAULT_PEAK_DISTANCE, DEFAULT_PEAK_PERCENTILE};

/// Default window length in samples
pub const DEFAULT_SEQ_LEN: usize = 10;

/// Default number of histogram bins in distribution reports
pub const DEFAULT_HISTOGRAM_BINS: usize = 20;

/// Errors loading a configuration file
#[derive(Error, Debug)]
pub enum ConfigError {
    /// File could not be read
    #[error("cannot read config: {0}")]
    Io(#[from] std::io::Error),
    /// File is not valid JSON for this struct
    #[error("cannot parse config: {0}")]
    Parse(#[from] serde_json::Error),
    /// Values parsed but are out of range
    #[error(transparent)]
    Invalid(#[from] InvalidInputError),
}

/// Parameters of a preparation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Window length in samples
    pub seq_len: usize,
    /// Column thresholded when the recording has no labels
    pub label_field: SensorField,
    /// Quantile for the label threshold
    pub label_percentile: f64,
    /// Column scanned for spikes
    pub peak_field: SensorField,
    /// Quantile for the peak height
    pub peak_percentile: f64,
    /// Minimum samples between reported peaks
    pub peak_distance: usize,
    /// Model input columns, in order
    pub feature_fields: Vec<SensorField>,
    /// Columns summarised per label
    pub distribution_fields: Vec<SensorField>,
    /// Bins per distribution histogram
    pub histogram_bins: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            seq_len: DEFAULT_SEQ_LEN,
            label_field: SensorField::JerkMag,
            label_percentile: DEFAULT_LABEL_PERCENTILE,
            peak_field: SensorField::JerkMag,
            peak_percentile: DEFAULT_PEAK_PERCENTILE,
            peak_distance: DEFAULT_PEAK_DISTANCE,
            feature_fields: FEATURE_FIELDS.to_vec(),
            distribution_fields: DISTRIBUTION_FIELDS.to_vec(),
            histogram_bins: DEFAULT_HISTOGRAM_BINS,
        }
    }
}

impl PipelineConfig {
    /// Parse and validate JSON; missing keys take their defaults
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Set the window length
    pub fn with_seq_len(mut self, seq_len: usize) -> Self {
        self.seq_len = seq_len;
        self
    }

    /// Set the labelling column and quantile
    pub fn with_label_threshold(mut self, field: SensorField, percentile: f64) -> Self {
        self.label_field = field;
        self.label_percentile = percentile;
        self
    }

    /// Set the peak column, quantile and separation
    pub fn with_peaks(mut self, field: SensorField, percentile: f64, distance: usize) -> Self {
        self.peak_field = field;
        self.peak_percentile = percentile;
        self.peak_distance = distance;
        self
    }

    /// Set the model input columns
    pub fn with_feature_fields(mut self, fields: &[SensorField]) -> Self {
        self.feature_fields = fields.to_vec();
        self
    }

    /// Reject out-of-range parameters
    pub fn validate(&self) -> CoreResult<()> {
        if self.seq_len == 0 {
            return Err(InvalidInputError::NonPositiveWindow { seq_len: 0 });
        }
        if self.feature_fields.is_empty() {
            return Err(InvalidInputError::InvalidConfig { reason: "no feature fields" });
        }
        if self.histogram_bins == 0 {
            return Err(InvalidInputError::InvalidConfig { reason: "histogram needs at least one bin" });
        }
        self.labeling_policy()?;
        self.peak_detector()?;
        Ok(())
    }

    /// Fallback labelling policy described by this config
    pub fn labeling_policy(&self) -> CoreResult<PercentileThreshold> {
        PercentileThreshold::new(self.label_field, self.label_percentile)
    }

    /// Peak detector described by this config
    pub fn peak_detector(&self) -> CoreResult<PeakDetector> {
        PeakDetector::new(self.peak_percentile, self.peak_distance)
    }
}
