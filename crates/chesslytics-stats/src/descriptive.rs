use serde::Serialize;

/// Summary of a sample of ratings, game lengths or clock readings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DescriptiveStats {
    pub count: usize,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    /// Upper median for even counts.
    pub median: f64,
    /// Population standard deviation.
    pub std_dev: f64,
}

impl DescriptiveStats {
    /// Summarizes `values` in any order, or `None` for an empty sample.
    ///
    /// ```
    /// # use chesslytics_stats::descriptive::DescriptiveStats;
    /// let ratings = [1510.0, 1490.0, 1530.0, 1470.0];
    /// let stats = DescriptiveStats::new(ratings).unwrap();
    /// assert_eq!(stats.count, 4);
    /// assert_eq!(stats.mean, 1500.0);
    /// assert_eq!(stats.median, 1510.0);
    /// assert_eq!(stats.max - stats.min, 60.0);
    /// ```
    #[must_use]
    pub fn new<I>(values: I) -> Option<Self>
    where
        I: IntoIterator<Item = f64>,
    {
        let mut sample = Vec::from_iter(values);
        sample.sort_unstable_by(f64::total_cmp);
        Self::from_sorted(&sample)
    }

    /// Same as [`DescriptiveStats::new`] for a sample already in ascending order.
    ///
    /// # Panics
    ///
    /// Panics if `sample` is out of order.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn from_sorted(sample: &[f64]) -> Option<Self> {
        assert!(
            sample.is_sorted_by(|a, b| a <= b),
            "sample must be in ascending order"
        );
        let (&min, &max) = (sample.first()?, sample.last()?);

        let count = sample.len();
        let mean = sample.iter().sum::<f64>() / count as f64;
        let squared_error: f64 = sample.iter().map(|v| (v - mean) * (v - mean)).sum();

        Some(Self {
            count,
            min,
            max,
            mean,
            median: sample[count / 2],
            std_dev: (squared_error / count as f64).sqrt(),
        })
    }
}
