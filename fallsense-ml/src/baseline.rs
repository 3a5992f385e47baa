//! Logistic-regression baseline
//!
//! Flattens each `(seq_len, features)` window into one vector and fits
//! `p = sigmoid(w · x + b)` by mini-batch gradient descent on binary
//! cross-entropy. Windows are reshuffled every epoch with the configured
//! seed, so two fits with the same config and data produce identical
//! weights.

use fallsense_core::{Window, WindowSet, FALL};
use serde::{Deserialize, Serialize};

use crate::classifier::{Evaluation, SequenceClassifier, TrainConfig, TrainingHistory};
use crate::{MLError, MLResult, Rng};

/// Half-width of the uniform weight initialisation range
const INIT_SCALE: f32 = 0.01;

/// Logistic regression over flattened windows
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LogisticBaseline {
    weights: Vec<f32>,
    bias: f32,
    fitted: bool,
}

impl LogisticBaseline {
    /// Unfitted model
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `fit` has completed
    pub fn is_fitted(&self) -> bool {
        self.fitted
    }

    /// Learned weights, one per `(step, feature)` in row-major order
    pub fn weights(&self) -> &[f32] {
        &self.weights
    }

    /// Learned intercept
    pub fn bias(&self) -> f32 {
        self.bias
    }

    fn logit(&self, x: &[f32]) -> f32 {
        self.weights.iter().zip(x).map(|(w, v)| w * v).sum::<f32>() + self.bias
    }

    fn probability(&self, x: &[f32]) -> f32 {
        sigmoid(self.logit(x))
    }

    fn score(&self, windows: &[Window]) -> MLResult<Evaluation> {
        let probabilities: Vec<f32> = windows.iter().map(|w| self.probability(w.features())).collect();
        let labels: Vec<_> = windows.iter().map(Window::label).collect();
        Evaluation::score(&probabilities, &labels)
    }

    /// One gradient step over `batch`
    fn step(&mut self, batch: &[&Window], config: &TrainConfig) {
        let mut grad_w = vec![0.0f32; self.weights.len()];
        let mut grad_b = 0.0f32;

        for window in batch {
            let x = window.features();
            let target = if window.label() == FALL { 1.0 } else { 0.0 };
            let error = self.probability(x) - target;
            for (g, v) in grad_w.iter_mut().zip(x) {
                *g += error * v;
            }
            grad_b += error;
        }

        let scale = config.learning_rate / batch.len() as f32;
        for (w, g) in self.weights.iter_mut().zip(&grad_w) {
            *w -= scale * g + config.learning_rate * config.l2 * *w;
        }
        self.bias -= scale * grad_b;
    }
}

impl SequenceClassifier for LogisticBaseline {
    fn fit(&mut self, windows: &WindowSet, config: &TrainConfig) -> MLResult<TrainingHistory> {
        config.validate()?;

        let all = windows.windows();
        let val_len = config.validation_len(all.len());
        let (train, validation) = all.split_at(all.len() - val_len);
        if train.is_empty() {
            return Err(MLError::InsufficientData {
                required: 1,
                available: all.len(),
            });
        }

        let dim = windows.seq_len() * windows.features_per_step();
        let mut rng = Rng::new(config.seed);
        self.weights = (0..dim).map(|_| rng.next_f32_range(-INIT_SCALE, INIT_SCALE)).collect();
        self.bias = 0.0;

        log_info!(
            "fitting logistic baseline: {} train / {} validation windows, {} inputs",
            train.len(),
            validation.len(),
            dim
        );

        let mut order: Vec<&Window> = train.iter().collect();
        let mut history = TrainingHistory::default();
        for epoch in 0..config.epochs {
            rng.shuffle(&mut order);
            for batch in order.chunks(config.batch_size) {
                self.step(batch, config);
            }

            let train_eval = self.score(train)?;
            let val_eval = if validation.is_empty() {
                None
            } else {
                Some(self.score(validation)?)
            };
            log_debug!(
                "epoch {}/{}: loss {:.4}, accuracy {:.3}",
                epoch + 1,
                config.epochs,
                train_eval.loss,
                train_eval.accuracy
            );
            history.record(train_eval, val_eval);
        }

        self.fitted = true;
        Ok(history)
    }

    fn predict_proba(&self, window: &Window) -> MLResult<f32> {
        if !self.fitted {
            return Err(MLError::NotFitted);
        }
        if window.features().len() != self.weights.len() {
            return Err(MLError::ShapeMismatch {
                expected: self.weights.len(),
                actual: window.features().len(),
            });
        }
        Ok(self.probability(window.features()))
    }
}

/// Logistic function, evaluated on the side that cannot overflow
fn sigmoid(z: f32) -> f32 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fallsense_core::{build_windows, FeatureMatrix, Label};

    /// Labels from a seeded generator; row `r` carries the sign of the
    /// label of row `r + 1`, so the last step of each window gives its label
    fn separable(rows: usize, seq_len: usize) -> WindowSet {
        let mut rng = Rng::new(5);
        let labels: Vec<Label> = (0..rows).map(|_| (rng.next_f32() < 0.3) as Label).collect();
        let features: Vec<Vec<f32>> = (0..rows)
            .map(|r| {
                let next = labels.get(r + 1).copied().unwrap_or(0);
                vec![if next == FALL { 1.0 } else { -1.0 }]
            })
            .collect();
        let matrix = FeatureMatrix::from_rows(&features).unwrap();
        build_windows(&matrix, &labels, seq_len).unwrap()
    }

    #[test]
    fn learns_separable_windows() {
        let windows = separable(400, 3);
        let config = TrainConfig::default().with_learning_rate(0.5);

        let mut model = LogisticBaseline::new();
        let history = model.fit(&windows, &config).unwrap();

        assert_eq!(history.epochs(), 10);
        assert_eq!(history.val_loss.len(), 10);
        assert!(history.loss[9] < history.loss[0]);
        assert!(history.accuracy[9] > 0.9);
        assert!(model.evaluate(&windows).unwrap().accuracy > 0.9);
        // The last step decides the label
        assert!(model.weights()[2] > model.weights()[0].abs());
    }

    #[test]
    fn fitting_is_deterministic() {
        let windows = separable(120, 4);
        let config = TrainConfig::default().with_epochs(3);

        let mut a = LogisticBaseline::new();
        let mut b = LogisticBaseline::new();
        assert_eq!(a.fit(&windows, &config).unwrap(), b.fit(&windows, &config).unwrap());
        assert_eq!(a, b);

        let mut c = LogisticBaseline::new();
        c.fit(&windows, &config.clone().with_seed(7)).unwrap();
        assert_ne!(a.weights(), c.weights());
    }

    #[test]
    fn no_validation_when_split_is_zero() {
        let windows = separable(60, 3);
        let mut model = LogisticBaseline::new();
        let history = model
            .fit(&windows, &TrainConfig::default().with_validation_split(0.0))
            .unwrap();
        assert_eq!(history.epochs(), 10);
        assert!(history.val_loss.is_empty());
    }

    #[test]
    fn unfitted_model_refuses_to_predict() {
        let windows = separable(10, 3);
        let model = LogisticBaseline::new();
        assert!(!model.is_fitted());
        assert_eq!(model.predict_proba(&windows.windows()[0]), Err(MLError::NotFitted));
    }

    #[test]
    fn rejects_window_of_other_shape() {
        let mut model = LogisticBaseline::new();
        model.fit(&separable(50, 3), &TrainConfig::default()).unwrap();
        let other = separable(50, 4);
        assert_eq!(
            model.predict_proba(&other.windows()[0]),
            Err(MLError::ShapeMismatch { expected: 3, actual: 4 })
        );
    }

    #[test]
    fn empty_training_set_fails() {
        let windows = separable(3, 3);
        assert!(windows.is_empty());
        assert!(matches!(
            LogisticBaseline::new().fit(&windows, &TrainConfig::default()),
            Err(MLError::InsufficientData { .. })
        ));
    }

    #[test]
    fn sigmoid_is_stable() {
        assert_eq!(sigmoid(0.0), 0.5);
        assert!(sigmoid(1000.0) <= 1.0);
        assert!(sigmoid(-1000.0) >= 0.0);
        assert!(sigmoid(-1000.0).is_finite());
    }
}
