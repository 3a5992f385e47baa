//! Per-column standardization
//!
//! `z = (x - mean) / scale`, with `scale` the population standard deviation
//! of the column. A constant column would divide by zero, so its scale is
//! 1.0 and it standardizes to all zeros.

use serde::{Deserialize, Serialize};

use crate::errors::{CoreResult, InvalidInputError};
use crate::windower::FeatureMatrix;

/// Fitted per-column mean and scale
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    mean: Vec<f32>,
    scale: Vec<f32>,
}

impl StandardScaler {
    /// Learn column means and standard deviations
    pub fn fit(matrix: &FeatureMatrix) -> CoreResult<Self> {
        if matrix.rows() == 0 {
            return Err(InvalidInputError::EmptyDataset);
        }

        let n = matrix.rows() as f64;
        let mut sums = vec![0.0f64; matrix.cols()];
        for row in matrix.iter_rows() {
            for (sum, &v) in sums.iter_mut().zip(row) {
                *sum += f64::from(v);
            }
        }
        let means: Vec<f64> = sums.iter().map(|s| s / n).collect();

        let mut squares = vec![0.0f64; matrix.cols()];
        for row in matrix.iter_rows() {
            for ((sq, &v), m) in squares.iter_mut().zip(row).zip(&means) {
                *sq += (f64::from(v) - m).powi(2);
            }
        }

        let scale = squares
            .iter()
            .map(|sq| {
                let std = (sq / n).sqrt();
                if std > f64::EPSILON { std as f32 } else { 1.0 }
            })
            .collect();

        Ok(Self {
            mean: means.iter().map(|&m| m as f32).collect(),
            scale,
        })
    }

    /// Standardize `matrix` with the fitted parameters
    pub fn transform(&self, matrix: &FeatureMatrix) -> CoreResult<FeatureMatrix> {
        if matrix.cols() != self.mean.len() {
            return Err(InvalidInputError::LengthMismatch {
                expected: self.mean.len(),
                actual: matrix.cols(),
            });
        }
        let mut data = Vec::with_capacity(matrix.as_slice().len());
        for row in matrix.iter_rows() {
            data.extend(
                row.iter()
                    .zip(self.mean.iter().zip(&self.scale))
                    .map(|(&v, (&m, &s))| (v - m) / s),
            );
        }
        FeatureMatrix::new(data, matrix.rows(), matrix.cols())
    }

    /// [`fit`](Self::fit) then [`transform`](Self::transform)
    pub fn fit_transform(matrix: &FeatureMatrix) -> CoreResult<(Self, FeatureMatrix)> {
        let scaler = Self::fit(matrix)?;
        let scaled = scaler.transform(matrix)?;
        Ok((scaler, scaled))
    }

    /// Column means
    pub fn mean(&self) -> &[f32] {
        &self.mean
    }

    /// Column scales (1.0 for constant columns)
    pub fn scale(&self) -> &[f32] {
        &self.scale
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats;

    #[test]
    fn standardized_columns_have_zero_mean_unit_variance() {
        let matrix = FeatureMatrix::from_columns(&[
            vec![1.0, 2.0, 3.0, 4.0, 5.0],
            vec![10.0, 10.0, 20.0, 20.0, 40.0],
        ])
        .unwrap();
        let (scaler, scaled) = StandardScaler::fit_transform(&matrix).unwrap();

        assert_eq!(scaler.mean(), &[3.0, 20.0]);
        for c in 0..2 {
            let column = scaled.column(c);
            assert!(stats::mean(&column).unwrap().abs() < 1e-6);
            assert!((stats::std_dev(&column).unwrap() - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn constant_column_maps_to_zero() {
        let matrix = FeatureMatrix::from_columns(&[vec![7.0; 4]]).unwrap();
        let (scaler, scaled) = StandardScaler::fit_transform(&matrix).unwrap();
        assert_eq!(scaler.scale(), &[1.0]);
        assert_eq!(scaled.as_slice(), &[0.0; 4]);
    }

    #[test]
    fn shape_errors() {
        let empty = FeatureMatrix::new(Vec::new(), 0, 3).unwrap();
        assert_eq!(StandardScaler::fit(&empty), Err(InvalidInputError::EmptyDataset));

        let matrix = FeatureMatrix::from_columns(&[vec![1.0, 2.0]]).unwrap();
        let scaler = StandardScaler::fit(&matrix).unwrap();
        let wider = FeatureMatrix::from_columns(&[vec![1.0], vec![2.0]]).unwrap();
        assert_eq!(
            scaler.transform(&wider),
            Err(InvalidInputError::LengthMismatch { expected: 1, actual: 2 })
        );
    }
}
