//! Report data for a processed recording
//!
//! Everything a front end needs to draw the usual charts of a fall-detection
//! run, without drawing them: class balance, per-label feature histograms,
//! peak tables, window shapes, test metrics, and the reference survey
//! figures that accompany the results. [`RunReport`] bundles it all and
//! serialises to JSON.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::dataset::{Dataset, Label, FALL, NO_FALL};
use crate::errors::{CoreResult, InvalidInputError};
use crate::fields::SensorField;
use crate::labeler::LabelSource;
use crate::peaks::PeakReport;
use crate::stats;

/// Class balance of a label array
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LabelSummary {
    /// Samples labelled 0
    pub no_fall: usize,
    /// Samples labelled 1
    pub fall: usize,
}

impl LabelSummary {
    /// Count both classes
    pub fn from_labels(labels: &[Label]) -> Self {
        let fall = labels.iter().filter(|&&l| l == FALL).count();
        Self {
            no_fall: labels.len() - fall,
            fall,
        }
    }

    /// Total labels
    pub fn total(&self) -> usize {
        self.no_fall + self.fall
    }

    /// Fraction labelled as a fall, 0.0 when empty
    pub fn positive_ratio(&self) -> f32 {
        if self.total() == 0 {
            0.0
        } else {
            self.fall as f32 / self.total() as f32
        }
    }
}

/// Histogram of one field, split by label
///
/// `edges` has `bins + 1` entries spanning the field's minimum to maximum.
/// The last bin is closed on the right so the maximum is counted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureDistribution {
    /// Summarised column
    pub field: SensorField,
    /// Bin edges
    pub edges: Vec<f32>,
    /// Counts of label-0 samples per bin
    pub no_fall: Vec<usize>,
    /// Counts of label-1 samples per bin
    pub fall: Vec<usize>,
}

impl FeatureDistribution {
    /// Bin `field` into `bins` equal-width bins, per label
    pub fn compute(dataset: &Dataset, labels: &[Label], field: SensorField, bins: usize) -> CoreResult<Self> {
        if bins == 0 {
            return Err(InvalidInputError::InvalidConfig { reason: "histogram needs at least one bin" });
        }
        let values = dataset.column(field)?;
        if labels.len() != values.len() {
            return Err(InvalidInputError::LengthMismatch {
                expected: values.len(),
                actual: labels.len(),
            });
        }
        let (lo, hi) = stats::min_max(&values).ok_or(InvalidInputError::EmptyDataset)?;
        let width = if hi > lo { (hi - lo) / bins as f32 } else { 1.0 };

        let edges = (0..=bins).map(|i| lo + width * i as f32).collect();
        let mut no_fall = vec![0; bins];
        let mut fall = vec![0; bins];
        for (&v, &label) in values.iter().zip(labels) {
            let bin = (((v - lo) / width) as usize).min(bins - 1);
            match label {
                NO_FALL => no_fall[bin] += 1,
                _ => fall[bin] += 1,
            }
        }

        Ok(Self { field, edges, no_fall, fall })
    }
}

/// One slice of the survey pie chart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurveyCategory {
    /// Category name
    pub label: String,
    /// Respondent percentage as reported
    pub size: f32,
    /// Share of the pie, `size / sum(sizes)`
    pub share: f32,
}

/// Reference survey of falls among elderly people
///
/// The reported percentages overlap (a person with two falls also had one),
/// so they sum past 100 and pie shares are normalised over their sum.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurveyBreakdown {
    /// Chart title
    pub title: String,
    /// Slices in display order
    pub categories: Vec<SurveyCategory>,
}

impl SurveyBreakdown {
    /// Build a breakdown from `(label, size)` pairs
    pub fn new(title: &str, sizes: &[(&str, f32)]) -> Self {
        let total: f32 = sizes.iter().map(|&(_, size)| size).sum();
        let categories = sizes
            .iter()
            .map(|&(label, size)| SurveyCategory {
                label: label.to_string(),
                size,
                share: if total > 0.0 { size / total } else { 0.0 },
            })
            .collect();
        Self {
            title: title.to_string(),
            categories,
        }
    }

    /// Yearly fall statistics among the elderly
    pub fn elderly_falls() -> Self {
        Self::new(
            "Elderly Fall Cases Distribution",
            &[
                ("Had >=1 fall", 35.0),
                ("Had >=2 falls", 15.0),
                ("Injured in fall", 20.0),
                ("Needed medical attention", 10.0),
                ("No falls", 65.0),
            ],
        )
    }
}

/// Everything produced by one run over a recording
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    /// Number of samples in the recording
    pub samples: usize,
    /// How labels were obtained
    pub label_source: LabelSource,
    /// Class balance over samples
    pub labels: LabelSummary,
    /// `(num_windows, seq_len, features)`
    pub window_shape: (usize, usize, usize),
    /// Class balance over windows
    pub window_labels: LabelSummary,
    /// Per-label histograms
    pub distributions: Vec<FeatureDistribution>,
    /// Detected spikes
    pub peaks: PeakReport,
    /// Survey reference figures
    pub survey: SurveyBreakdown,
    /// Named scalar metrics, e.g. test accuracy
    pub metrics: BTreeMap<String, f32>,
}

impl RunReport {
    /// Record a named metric
    pub fn with_metric(mut self, name: &str, value: f32) -> Self {
        self.metrics.insert(name.to_string(), value);
        self
    }

    /// Pretty-printed JSON
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Sample;

    #[test]
    fn label_summary_counts() {
        let summary = LabelSummary::from_labels(&[0, 1, 0, 0]);
        assert_eq!(summary, LabelSummary { no_fall: 3, fall: 1 });
        assert_eq!(summary.positive_ratio(), 0.25);
        assert_eq!(LabelSummary::default().positive_ratio(), 0.0);
    }

    #[test]
    fn distribution_splits_by_label() {
        let values = [0.0, 1.0, 2.0, 3.0, 4.0];
        let samples = values
            .iter()
            .map(|&v| Sample::from_pairs(&[(SensorField::Roll, v)]))
            .collect();
        let dataset = Dataset::with_columns(samples, &[SensorField::Roll]);

        let dist = FeatureDistribution::compute(&dataset, &[0, 0, 0, 1, 1], SensorField::Roll, 2).unwrap();
        assert_eq!(dist.edges, vec![0.0, 2.0, 4.0]);
        assert_eq!(dist.no_fall, vec![2, 1]);
        assert_eq!(dist.fall, vec![0, 2]);
        assert_eq!(dist.no_fall.iter().sum::<usize>() + dist.fall.iter().sum::<usize>(), 5);
    }

    #[test]
    fn distribution_of_constant_field() {
        let samples = vec![Sample::from_pairs(&[(SensorField::Pitch, 3.0)]); 4];
        let dataset = Dataset::with_columns(samples, &[SensorField::Pitch]);
        let dist = FeatureDistribution::compute(&dataset, &[0; 4], SensorField::Pitch, 5).unwrap();
        assert_eq!(dist.no_fall[0], 4);
        assert!(FeatureDistribution::compute(&dataset, &[0; 4], SensorField::Pitch, 0).is_err());
    }

    #[test]
    fn survey_shares_sum_to_one() {
        let survey = SurveyBreakdown::elderly_falls();
        assert_eq!(survey.categories.len(), 5);
        let total: f32 = survey.categories.iter().map(|c| c.share).sum();
        assert!((total - 1.0).abs() < 1e-6);
        // 35 of 145
        assert!((survey.categories[0].share - 35.0 / 145.0).abs() < 1e-6);
    }
}
