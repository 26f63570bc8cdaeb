//! Statistical building blocks for the chesslytics analysis engine.
//!
//! This crate is independent of chess. It provides:
//!
//! - **Estimates**: rates and means that carry an explicit insufficient-data marker
//!   instead of a misleading number when the denominator is empty
//! - **Descriptive statistics**: mean, median, standard deviation of a sample
//! - **Adaptive binning**: groups of values sized for stable per-bin statistics
//! - **Trends**: moving averages and first-half / second-half comparisons
//!
//! # Modules
//!
//! - [`estimate`]: [`Estimate`](estimate::Estimate) and [`ratio`](estimate::ratio)
//! - [`descriptive`]: Descriptive statistics for summarizing datasets
//! - [`binning`]: Adaptive binning with a minimum sample size per bin
//! - [`trend`]: Moving averages and trend direction
//!
//! # Examples
//!
//! ## Computing a rate
//!
//! ```
//! use chesslytics_stats::estimate::{Estimate, ratio};
//!
//! assert_eq!(ratio(3, 4), Estimate::Value(0.75));
//! assert!(ratio(0, 0).is_insufficient());
//! ```
//!
//! ## Computing descriptive statistics
//!
//! ```
//! use chesslytics_stats::descriptive::DescriptiveStats;
//!
//! let values = [1.0, 2.0, 3.0, 4.0, 5.0];
//! let stats = DescriptiveStats::new(values).unwrap();
//! assert_eq!(stats.mean, 3.0);
//! ```
//!
//! ## Detecting a trend
//!
//! ```
//! use chesslytics_stats::trend::{Trend, compare_halves};
//!
//! let scores = [-1.0, -1.0, 1.0, 1.0];
//! let comparison = compare_halves(&scores, 0.05).value().unwrap();
//! assert_eq!(comparison.trend, Trend::Improving);
//! ```

pub mod binning;
pub mod descriptive;
pub mod estimate;
pub mod trend;
