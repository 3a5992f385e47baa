//! Core data preparation for FallSense
//!
//! Turns a wearable-sensor recording into supervised training data for a
//! fall classifier and flags candidate fall spikes for review.
//!
//! Stages:
//! - **Labeler**: ground-truth labels, or a percentile threshold over a
//!   magnitude column when the recording has none
//! - **Windower**: fixed-length windows over standardized features, each
//!   labelled by the row that follows it
//! - **Peak detector**: percentile-height, minimum-distance spike finder
//!
//! All stages are pure functions over immutable inputs and never reorder
//! rows.
//!
//! ```no_run
//! use fallsense_core::{config::PipelineConfig, pipeline::prepare, stream::{FileFormat, FileStream}};
//!
//! let dataset = FileStream::read_dataset("recording.csv", FileFormat::Csv).unwrap();
//! let prepared = prepare(&dataset, &PipelineConfig::default()).unwrap();
//!
//! let (windows, seq_len, features) = prepared.windows.shape();
//! println!("{windows} windows of {seq_len}x{features}, {} peaks", prepared.peaks.count());
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

// Macros for optional logging
#[cfg(feature = "log")]
macro_rules! log_debug {
    ($($arg:tt)*) => { log::debug!($($arg)*) };
}

#[cfg(not(feature = "log"))]
macro_rules! log_debug {
    ($($arg:tt)*) => {};
}

#[cfg(feature = "log")]
macro_rules! log_info {
    ($($arg:tt)*) => { log::info!($($arg)*) };
}

#[cfg(not(feature = "log"))]
macro_rules! log_info {
    ($($arg:tt)*) => {};
}

#[cfg(feature = "log")]
macro_rules! log_warn {
    ($($arg:tt)*) => { log::warn!($($arg)*) };
}

#[cfg(not(feature = "log"))]
macro_rules! log_warn {
    ($($arg:tt)*) => {};
}

pub mod config;
pub mod dataset;
pub mod errors;
pub mod fields;
pub mod labeler;
pub mod peaks;
pub mod pipeline;
pub mod report;
pub mod scaler;
pub mod stats;
pub mod stream;
pub mod traits;
pub mod windower;

// Public API
pub use dataset::{Dataset, Label, RecordCollector, Sample, FALL, NO_FALL};
pub use errors::{CoreResult, InvalidInputError};
pub use fields::SensorField;
pub use labeler::{LabelingPolicy, PercentileThreshold, ProvidedLabels};
pub use peaks::{PeakDetector, PeakSet};
pub use windower::{build_windows, FeatureMatrix, Window, WindowSet};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
