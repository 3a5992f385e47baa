//! Training Support for Fall Classifiers
//!
//! ## Overview
//!
//! `fallsense-core` turns a recording into labelled windows of shape
//! `(num_windows, seq_len, features)`. This crate covers what happens next:
//!
//! 1. **Split**: a seeded shuffle into train and test partitions
//!    ([`train_test_split`], [`split_windows`])
//! 2. **Fit**: any model behind the [`SequenceClassifier`] trait, trained
//!    with a [`TrainConfig`] and reporting a per-epoch [`TrainingHistory`]
//! 3. **Evaluate**: binary cross-entropy and accuracy on held-out windows
//!
//! ## Models
//!
//! The production model is a recurrent network that lives outside this
//! workspace and plugs in through [`SequenceClassifier`]. The crate ships
//! [`LogisticBaseline`], a logistic regression over the flattened window.
//! It is the reference any recurrent model has to beat, and it keeps the
//! whole pipeline testable without a deep-learning runtime.
//!
//! ```text
//! window (seq_len x features) ──flatten──> x
//! p(fall) = sigmoid(w · x + b)
//! ```
//!
//! ## Training Defaults
//!
//! | Parameter          | Default |
//! |--------------------|---------|
//! | epochs             | 10      |
//! | batch size         | 32      |
//! | validation split   | 0.2     |
//! | test size          | 0.2     |
//! | seed               | 42      |
//!
//! The validation split takes the *last* fraction of the training windows,
//! before shuffling, so validation data is never seen by the optimiser.
//!
//! ## Example
//!
//! ```rust
//! use fallsense_core::{build_windows, FeatureMatrix};
//! use fallsense_ml::{split_windows, LogisticBaseline, SequenceClassifier, TrainConfig};
//!
//! let rows: Vec<Vec<f32>> = (0..200).map(|i| vec![if i % 4 == 3 { 1.0 } else { -1.0 }]).collect();
//! let labels: Vec<u8> = (0..200).map(|i| (i % 4 == 0 && i > 0) as u8).collect();
//! let matrix = FeatureMatrix::from_rows(&rows).unwrap();
//! let windows = build_windows(&matrix, &labels, 3).unwrap();
//!
//! let (train, test) = split_windows(&windows, 0.2, 42).unwrap();
//! let mut model = LogisticBaseline::new();
//! let history = model.fit(&train, &TrainConfig::default()).unwrap();
//! let evaluation = model.evaluate(&test).unwrap();
//! assert_eq!(history.epochs(), 10);
//! assert!(evaluation.accuracy > 0.5);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

// Macro for optional logging
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

pub mod baseline;
pub mod classifier;
pub mod rng;
pub mod split;

pub use baseline::LogisticBaseline;
pub use classifier::{binary_cross_entropy, Evaluation, SequenceClassifier, TrainConfig, TrainingHistory};
pub use rng::Rng;
pub use split::{split_windows, train_test_split, SplitIndices, DEFAULT_SEED, DEFAULT_TEST_SIZE};

use fallsense_core::InvalidInputError;
use thiserror_no_std::Error;

/// Result type for ML operations
pub type MLResult<T> = Result<T, MLError>;

/// Errors from splitting, training and scoring
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum MLError {
    /// Not enough windows for the requested operation
    #[error("Insufficient data: need {required}, have {available}")]
    InsufficientData {
        /// Minimum number of windows needed
        required: usize,
        /// Windows actually supplied
        available: usize,
    },

    /// Test or validation fraction outside `(0, 1)`
    #[error("Fraction {value} outside (0, 1)")]
    InvalidFraction {
        /// The rejected fraction
        value: f64,
    },

    /// Training parameter out of range
    #[error("Invalid training config: {reason}")]
    InvalidConfig {
        /// Which parameter was rejected
        reason: &'static str,
    },

    /// Model used before `fit`
    #[error("Model has not been fitted")]
    NotFitted,

    /// Window size differs from the one the model was fitted on
    #[error("Window has {actual} values, model expects {expected}")]
    ShapeMismatch {
        /// Values per window at fit time
        expected: usize,
        /// Values in the offending window
        actual: usize,
    },

    /// Error from the core data layer
    #[error("Invalid input: {0}")]
    Input(#[from] InvalidInputError),
}
