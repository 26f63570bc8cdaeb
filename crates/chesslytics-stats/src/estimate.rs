//! Estimates with an explicit insufficient-data marker
//!
//! Any rate whose denominator can be zero, and any statistic that is only
//! meaningful above a minimum sample size, is represented as an [`Estimate`].
//! Callers must match on it before trusting the number; the marker survives
//! serialization so reports stay honest about statistical confidence.
//!
//! # Examples
//!
//! ```
//! use chesslytics_stats::estimate::{Estimate, InsufficientData, mean, ratio};
//!
//! assert_eq!(ratio(6, 10), Estimate::Value(0.6));
//! assert_eq!(
//!     ratio(0, 0),
//!     Estimate::Insufficient(InsufficientData { samples: 0, required: 1 })
//! );
//! assert_eq!(mean([2.0, 4.0]), Estimate::Value(3.0));
//! ```

use serde::Serialize;

/// Marker for a statistic that could not be computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct InsufficientData {
    /// Number of samples that were available
    pub samples: usize,
    /// Number of samples the statistic requires
    pub required: usize,
}

/// A computed value, or the reason it could not be computed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, derive_more::IsVariant)]
#[serde(rename_all = "snake_case")]
pub enum Estimate<T> {
    Value(T),
    Insufficient(InsufficientData),
}

impl<T> Estimate<T> {
    /// Computes `value` only when enough samples back it.
    ///
    /// A `required` of zero is treated as one: no statistic is reported over an
    /// empty sample.
    ///
    /// # Arguments
    ///
    /// * `samples` - Number of observations the statistic would be computed from
    /// * `required` - Minimum number of observations
    /// * `value` - Computes the statistic; only called when the gate passes
    ///
    /// # Returns
    ///
    /// * `Estimate::Value` - if `samples >= max(required, 1)`
    /// * `Estimate::Insufficient` - otherwise, carrying `samples` and the effective `required`
    ///
    /// # Examples
    ///
    /// ```
    /// use chesslytics_stats::estimate::Estimate;
    ///
    /// let gated = Estimate::require(2, 3, || 0.5);
    /// assert!(gated.is_insufficient());
    /// let gated = Estimate::require(3, 3, || 0.5);
    /// assert_eq!(gated, Estimate::Value(0.5));
    /// ```
    pub fn require<F>(samples: usize, required: usize, value: F) -> Self
    where
        F: FnOnce() -> T,
    {
        let required = required.max(1);
        if samples < required {
            Self::insufficient(samples, required)
        } else {
            Self::Value(value())
        }
    }

    #[must_use]
    pub fn insufficient(samples: usize, required: usize) -> Self {
        Self::Insufficient(InsufficientData { samples, required })
    }

    /// Converts an optional value, recording `samples` and `required` when it is absent.
    pub fn from_option(value: Option<T>, samples: usize, required: usize) -> Self {
        match value {
            Some(value) => Self::Value(value),
            None => Self::insufficient(samples, required),
        }
    }

    pub fn value(self) -> Option<T> {
        match self {
            Self::Value(value) => Some(value),
            Self::Insufficient(_) => None,
        }
    }

    pub fn as_ref(&self) -> Estimate<&T> {
        match self {
            Self::Value(value) => Estimate::Value(value),
            Self::Insufficient(marker) => Estimate::Insufficient(*marker),
        }
    }

    pub fn map<U, F>(self, f: F) -> Estimate<U>
    where
        F: FnOnce(T) -> U,
    {
        match self {
            Self::Value(value) => Estimate::Value(f(value)),
            Self::Insufficient(marker) => Estimate::Insufficient(marker),
        }
    }

    /// Returns the insufficient-data marker, if any.
    pub fn marker(&self) -> Option<InsufficientData> {
        match self {
            Self::Value(_) => None,
            Self::Insufficient(marker) => Some(*marker),
        }
    }
}

/// Fraction `numerator / denominator`, insufficient when the denominator is zero.
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn ratio(numerator: usize, denominator: usize) -> Estimate<f64> {
    Estimate::require(denominator, 1, || numerator as f64 / denominator as f64)
}

/// Arithmetic mean, insufficient for an empty input.
#[expect(clippy::cast_precision_loss)]
pub fn mean<I>(values: I) -> Estimate<f64>
where
    I: IntoIterator<Item = f64>,
{
    let (sum, count) = values
        .into_iter()
        .fold((0.0, 0_usize), |(sum, count), v| (sum + v, count + 1));
    Estimate::require(count, 1, || sum / count as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ratio_bounds() {
        for denominator in 1..20 {
            for numerator in 0..=denominator {
                let rate = ratio(numerator, denominator).value().unwrap();
                assert!((0.0..=1.0).contains(&rate));
            }
        }
    }

    #[test]
    fn test_ratio_zero_denominator() {
        let rate = ratio(0, 0);
        assert_eq!(rate.marker(), Some(InsufficientData { samples: 0, required: 1 }));
        assert_eq!(rate.value(), None);
    }

    #[test]
    fn test_require_zero_still_needs_a_sample() {
        let mut called = false;
        let gated = Estimate::require(0, 0, || {
            called = true;
            1.0
        });
        assert!(!called);
        assert_eq!(gated.marker(), Some(InsufficientData { samples: 0, required: 1 }));
        assert_eq!(Estimate::require(1, 0, || 1.0), Estimate::Value(1.0));
    }

    #[test]
    fn test_mean_empty() {
        assert!(mean(std::iter::empty()).is_insufficient());
    }

    #[test]
    fn test_map_preserves_marker() {
        let marker = Estimate::<f64>::insufficient(1, 3);
        assert_eq!(marker.map(|v| v * 2.0), Estimate::insufficient(1, 3));
        assert_eq!(Estimate::Value(2.0).map(|v| v * 2.0), Estimate::Value(4.0));
    }

    #[test]
    fn test_serialized_shape() {
        let value = serde_json::to_string(&Estimate::Value(0.5)).unwrap();
        assert_eq!(value, r#"{"value":0.5}"#);
        let marker = serde_json::to_string(&Estimate::<f64>::insufficient(0, 3)).unwrap();
        assert_eq!(marker, r#"{"insufficient":{"samples":0,"required":3}}"#);
    }
}
