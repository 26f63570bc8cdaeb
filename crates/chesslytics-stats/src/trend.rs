//! Moving averages and trend direction over an ordered series.

use serde::Serialize;

use crate::estimate::{Estimate, mean};

/// Direction of a series, judged by comparing its two halves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    Improving,
    Declining,
    Flat,
}

/// Result of comparing the first and second half of a series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HalfComparison {
    pub first_half_mean: f64,
    pub second_half_mean: f64,
    /// `second_half_mean - first_half_mean`
    pub difference: f64,
    pub trend: Trend,
}

/// Trailing simple moving average.
///
/// Produces one average per full window. A series shorter than the window
/// yields a single average over everything available.
///
/// ```
/// use chesslytics_stats::trend::moving_average;
///
/// assert_eq!(moving_average(&[1.0, 0.0, -1.0, 1.0], 2), vec![0.5, -0.5, 0.0]);
/// assert_eq!(moving_average(&[1.0, 0.0], 5), vec![0.5]);
/// assert!(moving_average(&[], 3).is_empty());
/// ```
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn moving_average(values: &[f64], window: usize) -> Vec<f64> {
    if values.is_empty() {
        return vec![];
    }
    let window = window.clamp(1, values.len());
    values
        .windows(window)
        .map(|w| w.iter().sum::<f64>() / window as f64)
        .collect()
}

/// Compares the mean of the first half of `values` against the second half.
///
/// For an odd number of values the middle one belongs to neither half. The
/// trend is [`Trend::Flat`] when the halves differ by less than `epsilon`.
/// At least two values are required.
#[must_use]
pub fn compare_halves(values: &[f64], epsilon: f64) -> Estimate<HalfComparison> {
    if values.len() < 2 {
        return Estimate::insufficient(values.len(), 2);
    }
    let half = values.len() / 2;
    let first = &values[..half];
    let second = &values[values.len() - half..];

    let (Some(first_half_mean), Some(second_half_mean)) = (
        mean(first.iter().copied()).value(),
        mean(second.iter().copied()).value(),
    ) else {
        return Estimate::insufficient(values.len(), 2);
    };
    let difference = second_half_mean - first_half_mean;
    let trend = if difference.abs() < epsilon {
        Trend::Flat
    } else if difference > 0.0 {
        Trend::Improving
    } else {
        Trend::Declining
    };

    Estimate::Value(HalfComparison {
        first_half_mean,
        second_half_mean,
        difference,
        trend,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equal_halves_are_flat() {
        let comparison = compare_halves(&[1.0; 10], 0.05).value().unwrap();
        assert_eq!(comparison.trend, Trend::Flat);
        assert_eq!(comparison.difference, 0.0);
    }

    #[test]
    fn test_declining() {
        let comparison = compare_halves(&[1.0, 1.0, 0.0, -1.0, -1.0], 0.05)
            .value()
            .unwrap();
        assert_eq!(comparison.trend, Trend::Declining);
        assert_eq!(comparison.first_half_mean, 1.0);
        assert_eq!(comparison.second_half_mean, -1.0);
    }

    #[test]
    fn test_difference_below_epsilon() {
        let comparison = compare_halves(&[0.0, 0.0, 0.0, 0.1], 0.5).value().unwrap();
        assert_eq!(comparison.trend, Trend::Flat);
    }

    #[test]
    fn test_too_short() {
        assert!(compare_halves(&[1.0], 0.05).is_insufficient());
    }

    #[test]
    fn test_moving_average_length() {
        let values = [1.0; 30];
        assert_eq!(moving_average(&values, 10).len(), 21);
    }
}
