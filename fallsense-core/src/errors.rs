//! Error Types for Malformed Recordings and Parameters
//!
//! ## Design
//!
//! Every operation in this crate is a pure transformation over an in-memory
//! recording, so there is exactly one failure kind: the input was not
//! acceptable. [`InvalidInputError`] names *which* input was wrong so the
//! caller can report it without re-inspecting the data.
//!
//! Errors are `Copy` and carry no heap data. Field names are carried as
//! [`SensorField`] values rather than strings.
//!
//! ## Error Categories
//!
//! ### Dataset problems
//! - `EmptyDataset`: nothing to compute a percentile over
//! - `MissingField`: the column was never present in the input
//! - `NonFiniteValue`: a cell is missing (NaN) or infinite
//! - `NonFiniteSample`: same, for a bare signal with no column name
//! - `LengthMismatch`: two arrays that must align do not
//! - `MissingLabels`: ground truth was requested but the recording has none
//!
//! ### Parameter problems
//! - `NonPositiveWindow`: `SEQ_LEN` of zero or less
//! - `InvalidPercentile`: quantile outside `[0, 1]`
//! - `InvalidConfig`: other out-of-range parameters
//!
//! ## Handling
//!
//! ```rust
//! use fallsense_core::{InvalidInputError, windower::{build_windows, FeatureMatrix}};
//!
//! let matrix = FeatureMatrix::from_rows(&[vec![0.0_f32], vec![1.0]]).unwrap();
//! match build_windows(&matrix, &[0, 1], 0) {
//!     Err(InvalidInputError::NonPositiveWindow { .. }) => {
//!         // Reject the configuration before training
//!     }
//!     _ => unreachable!(),
//! }
//! ```
//!
//! No error is retried internally: every operation is deterministic, so a
//! retry reproduces the failure.

use thiserror_no_std::Error;

use crate::fields::SensorField;

/// Result type for core operations
pub type CoreResult<T> = Result<T, InvalidInputError>;

/// Malformed, empty or out-of-range input to a core operation
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum InvalidInputError {
    /// Dataset or signal has no rows where at least one is required
    #[error("Dataset is empty")]
    EmptyDataset,

    /// Required column was not present in the recording
    #[error("Required field {field} is missing")]
    MissingField {
        /// The column that was requested
        field: SensorField,
    },

    /// A cell is missing or not a finite number
    #[error("Field {field} has a non-numeric value at row {row}")]
    NonFiniteValue {
        /// The column containing the bad cell
        field: SensorField,
        /// Zero-based row index of the bad cell
        row: usize,
    },

    /// A signal that is not tied to a named column holds a non-finite value
    #[error("Signal has a non-numeric value at row {row}")]
    NonFiniteSample {
        /// Zero-based row index of the bad value
        row: usize,
    },

    /// Window length must be strictly positive
    #[error("Window length must be positive, got {seq_len}")]
    NonPositiveWindow {
        /// The rejected window length
        seq_len: usize,
    },

    /// Two arrays that must have one entry per row disagree
    #[error("Length mismatch: expected {expected}, got {actual}")]
    LengthMismatch {
        /// Length implied by the reference array
        expected: usize,
        /// Length actually supplied
        actual: usize,
    },

    /// Quantile outside the closed unit interval
    #[error("Percentile {value} outside [0, 1]")]
    InvalidPercentile {
        /// The rejected quantile
        value: f64,
    },

    /// Ground-truth labels were required but the recording has none
    #[error("Recording has no LABEL column")]
    MissingLabels,

    /// Configuration parameter out of range
    #[error("Invalid configuration: {reason}")]
    InvalidConfig {
        /// Which parameter was rejected
        reason: &'static str,
    },
}
