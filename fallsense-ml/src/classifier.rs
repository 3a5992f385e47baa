//! Sequence classifier seam
//!
//! A [`SequenceClassifier`] maps one window of shape `(seq_len, features)`
//! to the probability that the row after it is a fall. Training reports a
//! [`TrainingHistory`] with one entry per epoch, and evaluation reports
//! binary cross-entropy and accuracy.

use fallsense_core::{Label, Window, WindowSet, FALL};
use serde::{Deserialize, Serialize};

use crate::{MLError, MLResult, DEFAULT_SEED};

/// Probabilities are clipped to `[EPSILON, 1 - EPSILON]` before taking logs
pub const EPSILON: f32 = 1e-7;

/// Probability at or above which a window is predicted as a fall
pub const DECISION_THRESHOLD: f32 = 0.5;

/// Training parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainConfig {
    /// Passes over the training windows
    pub epochs: usize,
    /// Windows per gradient step
    pub batch_size: usize,
    /// Trailing fraction of the training windows held out for validation;
    /// 0 disables validation
    pub validation_split: f64,
    /// Gradient step size
    pub learning_rate: f32,
    /// L2 penalty on the weights
    pub l2: f32,
    /// Seed for initialisation and per-epoch shuffling
    pub seed: u32,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            epochs: 10,
            batch_size: 32,
            validation_split: 0.2,
            learning_rate: 0.1,
            l2: 0.0,
            seed: DEFAULT_SEED,
        }
    }
}

impl TrainConfig {
    /// Set the epoch count
    pub fn with_epochs(mut self, epochs: usize) -> Self {
        self.epochs = epochs;
        self
    }

    /// Set the learning rate
    pub fn with_learning_rate(mut self, learning_rate: f32) -> Self {
        self.learning_rate = learning_rate;
        self
    }

    /// Set the validation fraction
    pub fn with_validation_split(mut self, validation_split: f64) -> Self {
        self.validation_split = validation_split;
        self
    }

    /// Set the seed
    pub fn with_seed(mut self, seed: u32) -> Self {
        self.seed = seed;
        self
    }

    /// Check parameter ranges
    pub fn validate(&self) -> MLResult<()> {
        if self.epochs == 0 {
            return Err(MLError::InvalidConfig { reason: "epochs must be positive" });
        }
        if self.batch_size == 0 {
            return Err(MLError::InvalidConfig { reason: "batch_size must be positive" });
        }
        if !(self.learning_rate.is_finite() && self.learning_rate > 0.0) {
            return Err(MLError::InvalidConfig { reason: "learning_rate must be positive" });
        }
        if !(self.l2.is_finite() && self.l2 >= 0.0) {
            return Err(MLError::InvalidConfig { reason: "l2 must be non-negative" });
        }
        if !(0.0..1.0).contains(&self.validation_split) {
            return Err(MLError::InvalidFraction { value: self.validation_split });
        }
        Ok(())
    }

    /// Number of trailing windows held out for validation out of `len`
    ///
    /// Training keeps the first `floor(len * (1 - validation_split))`
    /// windows and validation gets the rest.
    pub fn validation_len(&self, len: usize) -> usize {
        len - (len as f64 * (1.0 - self.validation_split)).floor() as usize
    }
}

/// Per-epoch training curves
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrainingHistory {
    /// Training loss after each epoch
    pub loss: Vec<f32>,
    /// Validation loss after each epoch; empty without validation
    pub val_loss: Vec<f32>,
    /// Training accuracy after each epoch
    pub accuracy: Vec<f32>,
    /// Validation accuracy after each epoch; empty without validation
    pub val_accuracy: Vec<f32>,
}

impl TrainingHistory {
    /// Number of recorded epochs
    pub fn epochs(&self) -> usize {
        self.loss.len()
    }

    /// Append one epoch's training and (optional) validation scores
    pub fn record(&mut self, train: Evaluation, validation: Option<Evaluation>) {
        self.loss.push(train.loss);
        self.accuracy.push(train.accuracy);
        if let Some(val) = validation {
            self.val_loss.push(val.loss);
            self.val_accuracy.push(val.accuracy);
        }
    }

    /// Scores of the last epoch
    pub fn last(&self) -> Option<Evaluation> {
        Some(Evaluation {
            loss: *self.loss.last()?,
            accuracy: *self.accuracy.last()?,
        })
    }
}

/// Loss and accuracy over a window set
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    /// Mean binary cross-entropy
    pub loss: f32,
    /// Fraction of windows classified correctly
    pub accuracy: f32,
}

impl Evaluation {
    /// Score predicted probabilities against labels
    pub fn score(probabilities: &[f32], labels: &[Label]) -> MLResult<Self> {
        if probabilities.len() != labels.len() {
            return Err(MLError::ShapeMismatch {
                expected: labels.len(),
                actual: probabilities.len(),
            });
        }
        if labels.is_empty() {
            return Err(MLError::InsufficientData { required: 1, available: 0 });
        }

        let n = labels.len() as f64;
        let mut loss = 0.0f64;
        let mut correct = 0usize;
        for (&p, &label) in probabilities.iter().zip(labels) {
            loss += binary_cross_entropy(p, label) as f64;
            if (p >= DECISION_THRESHOLD) == (label == FALL) {
                correct += 1;
            }
        }

        Ok(Self {
            loss: (loss / n) as f32,
            accuracy: (correct as f64 / n) as f32,
        })
    }
}

/// Cross-entropy of one prediction, with `p` clipped away from 0 and 1
pub fn binary_cross_entropy(p: f32, label: Label) -> f32 {
    let p = p.clamp(EPSILON, 1.0 - EPSILON);
    if label == FALL {
        -p.ln()
    } else {
        -(1.0 - p).ln()
    }
}

/// Binary classifier over fixed-length windows
pub trait SequenceClassifier {
    /// Train on `windows`, returning per-epoch curves
    fn fit(&mut self, windows: &WindowSet, config: &TrainConfig) -> MLResult<TrainingHistory>;

    /// Probability that the row after `window` is a fall
    fn predict_proba(&self, window: &Window) -> MLResult<f32>;

    /// Hard prediction at [`DECISION_THRESHOLD`]
    fn predict(&self, window: &Window) -> MLResult<Label> {
        Ok((self.predict_proba(window)? >= DECISION_THRESHOLD) as Label)
    }

    /// Loss and accuracy over `windows`
    fn evaluate(&self, windows: &WindowSet) -> MLResult<Evaluation> {
        let probabilities = windows
            .windows()
            .iter()
            .map(|w| self.predict_proba(w))
            .collect::<MLResult<Vec<_>>>()?;
        Evaluation::score(&probabilities, &windows.labels())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fallsense_core::{build_windows, FeatureMatrix, NO_FALL};

    /// Predicts a fixed probability for every window
    struct Constant(f32);

    impl SequenceClassifier for Constant {
        fn fit(&mut self, _: &WindowSet, _: &TrainConfig) -> MLResult<TrainingHistory> {
            Ok(TrainingHistory::default())
        }

        fn predict_proba(&self, _: &Window) -> MLResult<f32> {
            Ok(self.0)
        }
    }

    #[test]
    fn cross_entropy_is_clipped() {
        assert!(binary_cross_entropy(0.0, FALL).is_finite());
        assert!(binary_cross_entropy(1.0, NO_FALL).is_finite());
        assert!(binary_cross_entropy(1.0, FALL) < 1e-6);
        assert!((binary_cross_entropy(0.5, FALL) - core::f32::consts::LN_2).abs() < 1e-6);
    }

    #[test]
    fn score_counts_threshold_hits() {
        let eval = Evaluation::score(&[0.9, 0.2, 0.5, 0.4], &[1, 0, 0, 1]).unwrap();
        assert_eq!(eval.accuracy, 0.5);
        assert!(eval.loss > 0.0);

        assert!(matches!(
            Evaluation::score(&[0.1], &[0, 1]),
            Err(MLError::ShapeMismatch { expected: 2, actual: 1 })
        ));
        assert!(Evaluation::score(&[], &[]).is_err());
    }

    #[test]
    fn default_evaluate_uses_window_labels() {
        let rows: Vec<Vec<f32>> = (0..6).map(|i| vec![i as f32]).collect();
        let matrix = FeatureMatrix::from_rows(&rows).unwrap();
        let windows = build_windows(&matrix, &[0, 0, 0, 1, 1, 0], 2).unwrap();
        // Window labels: rows 2..6 -> [0, 1, 1, 0]

        let eval = Constant(0.8).evaluate(&windows).unwrap();
        assert_eq!(eval.accuracy, 0.5);
        assert_eq!(Constant(0.8).predict(&windows.windows()[0]).unwrap(), FALL);
        assert_eq!(Constant(0.1).predict(&windows.windows()[0]).unwrap(), NO_FALL);
    }

    #[test]
    fn history_records_epochs() {
        let mut history = TrainingHistory::default();
        let eval = Evaluation { loss: 0.3, accuracy: 0.9 };
        history.record(eval, None);
        history.record(eval, Some(eval));
        assert_eq!(history.epochs(), 2);
        assert_eq!(history.val_loss.len(), 1);
        assert_eq!(history.last(), Some(eval));
    }

    #[test]
    fn config_validation() {
        assert!(TrainConfig::default().validate().is_ok());
        assert!(TrainConfig::default().with_epochs(0).validate().is_err());
        assert!(TrainConfig::default().with_learning_rate(-1.0).validate().is_err());
        assert!(matches!(
            TrainConfig::default().with_validation_split(1.0).validate(),
            Err(MLError::InvalidFraction { .. })
        ));
        assert!(TrainConfig::default().with_validation_split(0.0).validate().is_ok());
        assert_eq!(TrainConfig::default().validation_len(100), 20);
    }

    #[test]
    fn validation_takes_the_remainder_after_training_rows() {
        let config = TrainConfig::default();
        assert_eq!(config.validation_len(472), 95);
        assert_eq!(config.validation_len(9), 2);
        assert_eq!(config.validation_len(3), 1);
        assert_eq!(config.validation_len(10), 2);
        assert_eq!(config.validation_len(0), 0);
        assert_eq!(config.with_validation_split(0.0).validation_len(50), 0);
    }
}
