//! Fall Labels for Recordings Without Ground Truth
//!
//! ## Overview
//!
//! Supervised windowing needs exactly one label per sample. When a recording
//! carries a `LABEL` column those labels are used as-is. When it does not, a
//! [`LabelingPolicy`] derives them. The stock policy,
//! [`PercentileThreshold`], marks the top tail of a magnitude signal:
//!
//! ```text
//! threshold = quantile(JERK_MAG, 0.95)
//! label[i]  = 1  if JERK_MAG[i] >  threshold
//!             0  otherwise (ties at the threshold are 0)
//! ```
//!
//! With the linear quantile definition in [`crate::stats`] at most
//! `ceil(0.05 * N)` rows end up labelled 1.
//!
//! The heuristic is a stand-in for real annotations. Swapping in real labels
//! is a matter of passing a different policy (or a recording that has a
//! `LABEL` column), not of changing this module.

use serde::{Deserialize, Serialize};

use crate::dataset::{Dataset, Label, FALL, NO_FALL};
use crate::errors::{CoreResult, InvalidInputError};
use crate::fields::SensorField;
use crate::stats;

/// Default quantile for threshold labelling
pub const DEFAULT_LABEL_PERCENTILE: f64 = 0.95;

/// Where a label set came from
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LabelSource {
    /// The recording's own `LABEL` column
    GroundTruth,
    /// Percentile threshold over a magnitude field
    Threshold {
        /// Thresholded column
        field: SensorField,
        /// Quantile used
        percentile: f64,
        /// Resulting cut-off value
        threshold: f32,
    },
}

/// One label per sample, plus provenance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelSet {
    labels: Vec<Label>,
    source: LabelSource,
}

impl LabelSet {
    /// Wrap labels with their provenance
    pub fn new(labels: Vec<Label>, source: LabelSource) -> Self {
        Self { labels, source }
    }

    /// Labels in sample order
    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    /// Provenance
    pub fn source(&self) -> LabelSource {
        self.source
    }

    /// Threshold value, if the labels were derived
    pub fn threshold(&self) -> Option<f32> {
        match self.source {
            LabelSource::Threshold { threshold, .. } => Some(threshold),
            LabelSource::GroundTruth => None,
        }
    }

    /// Number of samples labelled as a fall
    pub fn positives(&self) -> usize {
        self.labels.iter().filter(|&&l| l == FALL).count()
    }

    /// Number of labels
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Whether there are no labels
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Take the label vector
    pub fn into_labels(self) -> Vec<Label> {
        self.labels
    }
}

/// Strategy that assigns one label per sample
pub trait LabelingPolicy {
    /// Label every sample of `dataset`, deterministically
    fn label(&self, dataset: &Dataset) -> CoreResult<LabelSet>;

    /// Short policy name for logs and reports
    fn name(&self) -> &'static str;
}

/// Label samples whose magnitude is strictly above a percentile of the whole
/// recording
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PercentileThreshold {
    /// Thresholded column
    pub field: SensorField,
    /// Quantile in `[0, 1]`
    pub percentile: f64,
}

impl Default for PercentileThreshold {
    fn default() -> Self {
        Self {
            field: SensorField::JerkMag,
            percentile: DEFAULT_LABEL_PERCENTILE,
        }
    }
}

impl PercentileThreshold {
    /// Threshold `field` at `percentile`
    pub fn new(field: SensorField, percentile: f64) -> CoreResult<Self> {
        stats::check_percentile(percentile)?;
        Ok(Self { field, percentile })
    }
}

impl LabelingPolicy for PercentileThreshold {
    fn label(&self, dataset: &Dataset) -> CoreResult<LabelSet> {
        if dataset.is_empty() {
            return Err(InvalidInputError::EmptyDataset);
        }
        let values = dataset.column(self.field)?;
        let (labels, threshold) = label_by_percentile(&values, self.percentile)?;

        log_debug!(
            "{} > {:.4} ({} percentile): {} of {} samples labelled as falls",
            self.field,
            threshold,
            self.percentile,
            labels.iter().filter(|&&l| l == FALL).count(),
            labels.len()
        );

        Ok(LabelSet::new(
            labels,
            LabelSource::Threshold {
                field: self.field,
                percentile: self.percentile,
                threshold,
            },
        ))
    }

    fn name(&self) -> &'static str {
        "percentile-threshold"
    }
}

/// Use the recording's own labels; fails when it has none
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ProvidedLabels;

impl LabelingPolicy for ProvidedLabels {
    fn label(&self, dataset: &Dataset) -> CoreResult<LabelSet> {
        let labels = dataset.labels().ok_or(InvalidInputError::MissingLabels)?;
        Ok(LabelSet::new(labels.to_vec(), LabelSource::GroundTruth))
    }

    fn name(&self) -> &'static str {
        "ground-truth"
    }
}

/// Ground truth when the recording has it, otherwise `fallback`
pub fn resolve_labels(dataset: &Dataset, fallback: &dyn LabelingPolicy) -> CoreResult<LabelSet> {
    if dataset.labels().is_some() {
        return ProvidedLabels.label(dataset);
    }
    log_info!("recording has no LABEL column; deriving labels with {}", fallback.name());
    fallback.label(dataset)
}

/// Threshold a signal at its `percentile`: 1 where strictly above, else 0
///
/// Returns the labels and the threshold.
pub fn label_by_percentile(values: &[f32], percentile: f64) -> CoreResult<(Vec<Label>, f32)> {
    let threshold = stats::quantile(values, percentile)?;
    let labels = values
        .iter()
        .map(|&v| if v > threshold { FALL } else { NO_FALL })
        .collect();
    Ok((labels, threshold))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Sample;

    fn jerk_dataset(values: &[f32]) -> Dataset {
        let samples = values
            .iter()
            .map(|&v| Sample::from_pairs(&[(SensorField::JerkMag, v)]))
            .collect();
        Dataset::with_columns(samples, &[SensorField::JerkMag])
    }

    #[test]
    fn single_spike_is_the_only_fall() {
        let mut values = vec![0.0; 20];
        values[19] = 100.0;
        let set = PercentileThreshold::default().label(&jerk_dataset(&values)).unwrap();

        assert_eq!(set.positives(), 1);
        assert_eq!(set.labels()[19], FALL);
        assert!(set.labels()[..19].iter().all(|&l| l == NO_FALL));
        assert!((set.threshold().unwrap() - 5.0).abs() < 1e-4);
    }

    #[test]
    fn ties_at_threshold_are_not_falls() {
        // Constant signal: threshold equals every value
        let set = PercentileThreshold::default().label(&jerk_dataset(&[3.0; 10])).unwrap();
        assert_eq!(set.positives(), 0);
    }

    #[test]
    fn values_equal_to_an_exact_percentile_are_not_falls() {
        // pos = 0.95 * 20 = 19 lands exactly on the first 100.0
        let mut values = vec![0.0; 19];
        values.extend([100.0, 100.0]);
        let (labels, threshold) = label_by_percentile(&values, DEFAULT_LABEL_PERCENTILE).unwrap();
        assert_eq!(threshold, 100.0);
        assert!(labels.iter().all(|&l| l == NO_FALL));
    }

    #[test]
    fn empty_dataset_fails() {
        let err = PercentileThreshold::default().label(&jerk_dataset(&[])).unwrap_err();
        assert_eq!(err, InvalidInputError::EmptyDataset);
    }

    #[test]
    fn missing_or_bad_values_fail() {
        let err = PercentileThreshold::default()
            .label(&jerk_dataset(&[1.0, f32::NAN]))
            .unwrap_err();
        assert_eq!(err, InvalidInputError::NonFiniteValue { field: SensorField::JerkMag, row: 1 });

        let policy = PercentileThreshold::new(SensorField::GyroMag, 0.95).unwrap();
        assert_eq!(
            policy.label(&jerk_dataset(&[1.0])).unwrap_err(),
            InvalidInputError::MissingField { field: SensorField::GyroMag }
        );
    }

    #[test]
    fn percentile_is_validated() {
        assert!(PercentileThreshold::new(SensorField::JerkMag, 1.2).is_err());
        assert!(PercentileThreshold::new(SensorField::JerkMag, -0.1).is_err());
    }

    #[test]
    fn labelling_is_idempotent() {
        let values: Vec<f32> = (0..50).map(|i| ((i * 37) % 23) as f32).collect();
        let dataset = jerk_dataset(&values);
        let policy = PercentileThreshold::default();
        assert_eq!(policy.label(&dataset).unwrap(), policy.label(&dataset).unwrap());
    }

    #[test]
    fn ground_truth_wins() {
        let dataset = jerk_dataset(&[0.0, 100.0]).with_labels(vec![FALL, NO_FALL]).unwrap();
        let set = resolve_labels(&dataset, &PercentileThreshold::default()).unwrap();
        assert_eq!(set.labels(), &[FALL, NO_FALL]);
        assert_eq!(set.source(), LabelSource::GroundTruth);
        assert_eq!(set.threshold(), None);
    }

    #[test]
    fn provided_labels_require_ground_truth() {
        assert_eq!(
            ProvidedLabels.label(&jerk_dataset(&[1.0])).unwrap_err(),
            InvalidInputError::MissingLabels
        );
    }
}
