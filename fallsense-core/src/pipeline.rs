//! Preparation pipeline
//!
//! Runs the stages in order on one recording:
//!
//! ```text
//! Dataset ─┬─> labels (ground truth or threshold policy)
//!          ├─> feature matrix ─> StandardScaler ─> windows(seq_len)
//!          └─> raw peak field ─> PeakDetector ─> peak report
//! ```
//!
//! Every stage takes its inputs explicitly and returns a new value; the
//! dataset is never mutated.

use crate::config::PipelineConfig;
use crate::dataset::Dataset;
use crate::errors::CoreResult;
use crate::labeler::{resolve_labels, LabelSet};
use crate::peaks::PeakReport;
use crate::report::{FeatureDistribution, LabelSummary, RunReport, SurveyBreakdown};
use crate::scaler::StandardScaler;
use crate::windower::{build_windows, WindowSet};

/// Output of [`prepare`]
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedData {
    /// One label per sample
    pub labels: LabelSet,
    /// Scaler fitted on the feature columns
    pub scaler: StandardScaler,
    /// Standardized windows with next-row labels
    pub windows: WindowSet,
    /// Spikes in the raw peak field
    pub peaks: PeakReport,
    /// Per-label histograms of the distribution fields present
    pub distributions: Vec<FeatureDistribution>,
}

impl PreparedData {
    /// Summarise the run; metrics can be added with [`RunReport::with_metric`]
    pub fn report(&self) -> RunReport {
        RunReport {
            samples: self.labels.len(),
            label_source: self.labels.source(),
            labels: LabelSummary::from_labels(self.labels.labels()),
            window_shape: self.windows.shape(),
            window_labels: LabelSummary::from_labels(&self.windows.labels()),
            distributions: self.distributions.clone(),
            peaks: self.peaks.clone(),
            survey: SurveyBreakdown::elderly_falls(),
            metrics: Default::default(),
        }
    }
}

/// Label, standardize, window and scan one recording
pub fn prepare(dataset: &Dataset, config: &PipelineConfig) -> CoreResult<PreparedData> {
    config.validate()?;

    let policy = config.labeling_policy()?;
    let labels = resolve_labels(dataset, &policy)?;
    log_info!(
        "labels: {} of {} samples are falls",
        labels.positives(),
        labels.len()
    );

    let matrix = dataset.feature_matrix(&config.feature_fields)?;
    let (scaler, scaled) = StandardScaler::fit_transform(&matrix)?;

    let windows = build_windows(&scaled, labels.labels(), config.seq_len)?;
    if windows.is_empty() {
        log_warn!(
            "recording of {} samples is too short for windows of {}",
            dataset.len(),
            config.seq_len
        );
    }
    log_info!("windows: shape {:?}, {} positive", windows.shape(), windows.positives());

    let signal = dataset.column(config.peak_field)?;
    let peaks = config
        .peak_detector()?
        .detect(&signal)?
        .report(Some(config.peak_field), &signal, Some(labels.labels()))?;
    log_info!("peaks: {} in {}", peaks.count(), config.peak_field);

    let distributions = config
        .distribution_fields
        .iter()
        .filter(|&&field| dataset.has_field(field))
        .map(|&field| FeatureDistribution::compute(dataset, labels.labels(), field, config.histogram_bins))
        .collect::<CoreResult<Vec<_>>>()?;

    Ok(PreparedData {
        labels,
        scaler,
        windows,
        peaks,
        distributions,
    })
}
