//! Spike Detection on a Magnitude Signal
//!
//! ## Overview
//!
//! Candidate fall events show up as short, high spikes in a magnitude signal
//! such as `JERK_MAG`. The detector reports them for review; it does not
//! feed the training pipeline.
//!
//! ## Algorithm
//!
//! 1. `height = quantile(signal, percentile)` (default 95th percentile)
//! 2. Find local maxima. A run of equal values counts as one maximum, located
//!    at its first index, when each neighbouring sample is strictly lower or
//!    absent (signal edge), and at least one neighbour exists. A constant
//!    signal has no maxima.
//! 3. Keep maxima with `value >= height`.
//! 4. Scan left to right keeping a maximum only if it lies at least
//!    `distance` samples after the last kept one. The earlier of two close
//!    maxima always wins.
//!
//! ```text
//! value
//!   |        x               x <- suppressed (within distance)
//!   |       / \     x       / \
//! --+------/---\---/-\-----/---\------ height
//!   |_____/     \_/   \___/     \____
//!           ^ kept  ^ kept
//! ```
//!
//! The result is strictly increasing and no two indices are closer than
//! `distance`.

use serde::{Deserialize, Serialize};

use crate::dataset::Label;
use crate::errors::{CoreResult, InvalidInputError};
use crate::fields::SensorField;
use crate::stats;

/// Default quantile for the height threshold
pub const DEFAULT_PEAK_PERCENTILE: f64 = 0.95;

/// Default minimum separation between reported peaks, in samples
pub const DEFAULT_PEAK_DISTANCE: usize = 10;

/// Percentile-height, minimum-distance peak finder
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PeakDetector {
    percentile: f64,
    distance: usize,
}

impl Default for PeakDetector {
    fn default() -> Self {
        Self {
            percentile: DEFAULT_PEAK_PERCENTILE,
            distance: DEFAULT_PEAK_DISTANCE,
        }
    }
}

impl PeakDetector {
    /// Detector with the given height quantile and minimum separation
    pub fn new(percentile: f64, distance: usize) -> CoreResult<Self> {
        stats::check_percentile(percentile)?;
        if distance == 0 {
            return Err(InvalidInputError::InvalidConfig { reason: "peak distance must be at least 1" });
        }
        Ok(Self { percentile, distance })
    }

    /// Height quantile
    pub fn percentile(&self) -> f64 {
        self.percentile
    }

    /// Minimum separation in samples
    pub fn distance(&self) -> usize {
        self.distance
    }

    /// Find peaks in `signal`
    ///
    /// An empty signal yields an empty set; a non-finite value is an error.
    pub fn detect(&self, signal: &[f32]) -> CoreResult<PeakSet> {
        if signal.is_empty() {
            return Ok(PeakSet { indices: Vec::new(), height: None });
        }
        let height = stats::quantile(signal, self.percentile)?;

        let mut indices: Vec<usize> = Vec::new();
        for candidate in local_maxima(signal) {
            if signal[candidate] < height {
                continue;
            }
            match indices.last() {
                Some(&last) if candidate - last < self.distance => {}
                _ => indices.push(candidate),
            }
        }

        log_debug!(
            "{} peaks at or above {:.4} (distance {}) in {} samples",
            indices.len(),
            height,
            self.distance,
            signal.len()
        );

        Ok(PeakSet { indices, height: Some(height) })
    }
}

/// First index of every plateau or point that is higher than its neighbours
pub fn local_maxima(signal: &[f32]) -> Vec<usize> {
    let n = signal.len();
    let mut maxima = Vec::new();
    let mut start = 0;
    while start < n {
        let value = signal[start];
        let mut end = start;
        while end + 1 < n && signal[end + 1] == value {
            end += 1;
        }

        let left_lower = start == 0 || signal[start - 1] < value;
        let right_lower = end + 1 == n || signal[end + 1] < value;
        let has_neighbour = start > 0 || end + 1 < n;
        if left_lower && right_lower && has_neighbour {
            maxima.push(start);
        }
        start = end + 1;
    }
    maxima
}

/// Detected peak positions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeakSet {
    indices: Vec<usize>,
    height: Option<f32>,
}

impl PeakSet {
    /// Peak indices, strictly increasing
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    /// Number of peaks
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    /// Whether no peak was found
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Height threshold used (`None` for an empty signal)
    pub fn height(&self) -> Option<f32> {
        self.height
    }

    /// Pair each peak with its signal value and, when given, its label
    pub fn report(&self, field: Option<SensorField>, signal: &[f32], labels: Option<&[Label]>) -> CoreResult<PeakReport> {
        if let Some(labels) = labels {
            if labels.len() != signal.len() {
                return Err(InvalidInputError::LengthMismatch {
                    expected: signal.len(),
                    actual: labels.len(),
                });
            }
        }
        let rows = self
            .indices
            .iter()
            .map(|&index| {
                let value = *signal.get(index).ok_or(InvalidInputError::LengthMismatch {
                    expected: index + 1,
                    actual: signal.len(),
                })?;
                Ok(PeakRow {
                    index,
                    value,
                    label: labels.map(|l| l[index]),
                })
            })
            .collect::<CoreResult<Vec<_>>>()?;

        Ok(PeakReport {
            field,
            height: self.height,
            rows,
        })
    }
}

/// One reported peak
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PeakRow {
    /// Sample index
    pub index: usize,
    /// Signal value at the peak
    pub value: f32,
    /// Label of the sample, when known
    pub label: Option<Label>,
}

/// Peaks ready for display or export
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeakReport {
    /// Column the signal came from
    pub field: Option<SensorField>,
    /// Height threshold
    pub height: Option<f32>,
    /// Peaks in index order
    pub rows: Vec<PeakRow>,
}

impl PeakReport {
    /// Number of detected peaks
    pub fn count(&self) -> usize {
        self.rows.len()
    }
}
