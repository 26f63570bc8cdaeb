//! Sample-driven bucketing of ordinal values
//!
//! Game lengths cluster around the middle with long tails on both sides, so
//! fixed-width buckets leave the tails with a handful of games each. Here
//! buckets grow over the distinct values in ascending order until they hold
//! `target_share` of the sample (and at least `min_samples`). A short final
//! bucket is folded into the one before it.
//!
//! ```
//! use chesslytics_stats::binning::create_adaptive_bins;
//!
//! let mut lengths = vec![18; 5];
//! lengths.extend(vec![30; 5]);
//! lengths.extend(vec![55, 60]);
//!
//! let bins = create_adaptive_bins(&lengths, 0.25, 4);
//!
//! assert_eq!(bins[&18].end, 18);
//! // The two long games cannot form a bin of their own
//! assert_eq!(bins[&30], bins[&60]);
//! ```

use std::collections::BTreeMap;

/// Value range and sample count of one bucket.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BinInfo<K> {
    /// Smallest value in the bucket
    pub start: K,
    /// Largest value in the bucket
    pub end: K,
    pub count: usize,
}

/// Buckets `values`, returning the bucket of every distinct value.
///
/// # Algorithm
///
/// 1. The bucket size is `ceil(values.len() * target_share)`, raised to
///    `min_samples` and capped at `values.len()`.
/// 2. Distinct values are visited in ascending order; each one joins the open
///    bucket, which closes as soon as it holds the bucket size.
/// 3. A bucket still open at the end is merged into the last closed one when
///    it holds fewer than `min_samples` values, and kept on its own otherwise.
///
/// Equal values never straddle two buckets, so a bucket may exceed the target.
///
/// # Arguments
///
/// * `values` - Sample to bucket, in any order; duplicates count individually
/// * `target_share` - Target fraction of the sample per bucket (0.0 to 1.0)
/// * `min_samples` - Minimum number of samples per bucket
///
/// # Returns
///
/// A map from each distinct value to the [`BinInfo`] of its bucket. The map is
/// empty when `values` is empty. Every bucket holds at least `min_samples`
/// samples unless the whole sample is smaller than that.
#[expect(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
#[must_use]
pub fn create_adaptive_bins<K>(
    values: &[K],
    target_share: f64,
    min_samples: usize,
) -> BTreeMap<K, BinInfo<K>>
where
    K: Ord + Copy,
{
    let total = values.len();
    if total == 0 {
        return BTreeMap::new();
    }
    let per_bin = ((total as f64 * target_share).ceil() as usize)
        .max(min_samples)
        .clamp(1, total);

    let mut histogram = BTreeMap::<K, usize>::new();
    for &value in values {
        *histogram.entry(value).or_default() += 1;
    }

    let mut closed: Vec<BinInfo<K>> = vec![];
    let mut open: Option<BinInfo<K>> = None;
    for (value, count) in histogram {
        let bin = open.get_or_insert(BinInfo {
            start: value,
            end: value,
            count: 0,
        });
        bin.end = value;
        bin.count += count;
        if bin.count >= per_bin {
            closed.extend(open.take());
        }
    }
    if let Some(rest) = open {
        match closed.last_mut() {
            Some(previous) if rest.count < min_samples => {
                previous.end = rest.end;
                previous.count += rest.count;
            }
            _ => closed.push(rest),
        }
    }

    let mut mapping = BTreeMap::new();
    for &value in values {
        if mapping.contains_key(&value) {
            continue;
        }
        if let Some(bin) = closed
            .iter()
            .find(|bin| bin.start <= value && value <= bin.end)
        {
            mapping.insert(value, bin.clone());
        }
    }
    mapping
}
