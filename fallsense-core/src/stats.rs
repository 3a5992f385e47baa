//! Shared Numeric Helpers
//!
//! Pure functions over slices, used by the labeler, the scaler, the peak
//! detector and the reports. None of them allocate except [`quantile`], which
//! sorts a private copy so the caller's time order is never disturbed.
//!
//! ## Quantile Definition
//!
//! Quantiles use linear interpolation between order statistics:
//!
//! ```text
//! sorted = sort(values)
//! pos    = q * (n - 1)
//! lo, hi = floor(pos), ceil(pos)
//! result = sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo)
//! ```
//!
//! This is the common "linear" definition used by spreadsheet and dataframe
//! tooling, so thresholds agree with what an analyst sees when inspecting the
//! same recording. Arithmetic is carried out in `f64`.

use crate::errors::{CoreResult, InvalidInputError};
use crate::traits::Validatable;

/// Check that every value is finite, reporting the first offending row
pub fn check_finite(values: &[f32]) -> CoreResult<()> {
    match values.iter().position(|v| !v.is_valid()) {
        Some(row) => Err(InvalidInputError::NonFiniteSample { row }),
        None => Ok(()),
    }
}

/// Check that a quantile lies in `[0, 1]`
pub fn check_percentile(q: f64) -> CoreResult<()> {
    if (0.0..=1.0).contains(&q) {
        Ok(())
    } else {
        Err(InvalidInputError::InvalidPercentile { value: q })
    }
}

/// Linearly interpolated quantile of `values`
///
/// Fails on empty input, on a quantile outside `[0, 1]` and on non-finite
/// values.
pub fn quantile(values: &[f32], q: f64) -> CoreResult<f32> {
    check_percentile(q)?;
    if values.is_empty() {
        return Err(InvalidInputError::EmptyDataset);
    }
    check_finite(values)?;

    let mut sorted: Vec<f64> = values.iter().map(|&v| f64::from(v)).collect();
    sorted.sort_by(f64::total_cmp);

    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;

    Ok((sorted[lo] + (sorted[hi] - sorted[lo]) * frac) as f32)
}

/// Arithmetic mean, `None` for empty input
pub fn mean(values: &[f32]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let sum: f64 = values.iter().map(|&v| f64::from(v)).sum();
    Some(sum / values.len() as f64)
}

/// Population standard deviation (divides by `n`), `None` for empty input
pub fn std_dev(values: &[f32]) -> Option<f64> {
    let mean = mean(values)?;
    let variance = values
        .iter()
        .map(|&v| (f64::from(v) - mean).powi(2))
        .sum::<f64>()
        / values.len() as f64;
    Some(variance.sqrt())
}

/// Smallest and largest value, `None` for empty input
pub fn min_max(values: &[f32]) -> Option<(f32, f32)> {
    let first = *values.first()?;
    Some(values.iter().fold((first, first), |(lo, hi), &v| (lo.min(v), hi.max(v))))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quantile_interpolates() {
        let values = [1.0, 2.0, 3.0, 4.0, 5.0];
        assert_eq!(quantile(&values, 0.0).unwrap(), 1.0);
        assert_eq!(quantile(&values, 0.5).unwrap(), 3.0);
        assert_eq!(quantile(&values, 1.0).unwrap(), 5.0);
        // pos = 0.95 * 4 = 3.8
        assert!((quantile(&values, 0.95).unwrap() - 4.8).abs() < 1e-6);
    }

    #[test]
    fn quantile_ignores_input_order() {
        let shuffled = [5.0, 1.0, 4.0, 2.0, 3.0];
        assert_eq!(quantile(&shuffled, 0.5).unwrap(), 3.0);
    }

    #[test]
    fn quantile_of_single_spike() {
        let mut values = [0.0_f32; 20];
        values[19] = 100.0;
        // pos = 0.95 * 19 = 18.05 -> 0 + 100 * 0.05
        assert!((quantile(&values, 0.95).unwrap() - 5.0).abs() < 1e-4);
    }

    #[test]
    fn quantile_on_whole_position_hits_order_statistic() {
        let mut values = vec![0.0_f32; 19];
        values.extend([100.0, 100.0]);
        assert_eq!(quantile(&values, 0.95).unwrap(), 100.0);

        let ramp: Vec<f32> = (0..101).map(|i| i as f32).collect();
        assert_eq!(quantile(&ramp, 0.95).unwrap(), 95.0);
    }

    #[test]
    fn quantile_rejects_bad_input() {
        assert_eq!(quantile(&[], 0.5), Err(InvalidInputError::EmptyDataset));
        assert_eq!(
            quantile(&[1.0], 1.5),
            Err(InvalidInputError::InvalidPercentile { value: 1.5 })
        );
        assert_eq!(
            quantile(&[1.0, f32::NAN], 0.5),
            Err(InvalidInputError::NonFiniteSample { row: 1 })
        );
    }

    #[test]
    fn moments() {
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert_eq!(mean(&values), Some(5.0));
        assert_eq!(std_dev(&values), Some(2.0));
        assert_eq!(min_max(&values), Some((2.0, 9.0)));
        assert_eq!(mean(&[]), None);
        assert_eq!(min_max(&[]), None);
    }
}
