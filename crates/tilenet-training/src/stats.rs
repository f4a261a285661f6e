//! Descriptive statistics of a generation's fitness values.

use serde::Serialize;

/// Summary of the fitness values of one ranked generation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FitnessStats {
    pub min: usize,
    pub max: usize,
    pub mean: f64,
    pub median: usize,
    pub std_dev: f64,
}

impl FitnessStats {
    /// Computes statistics from unsorted fitness values.
    ///
    /// Returns `None` for an empty set.
    ///
    /// # Examples
    ///
    /// ```
    /// # use tilenet_training::stats::FitnessStats;
    /// let stats = FitnessStats::new([40, 10, 30, 20]).unwrap();
    /// assert_eq!(stats.min, 10);
    /// assert_eq!(stats.max, 40);
    /// assert_eq!(stats.mean, 25.0);
    /// assert_eq!(stats.median, 30);
    /// ```
    #[must_use]
    pub fn new<I>(values: I) -> Option<Self>
    where
        I: IntoIterator<Item = usize>,
    {
        let mut values = values.into_iter().collect::<Vec<_>>();
        values.sort_unstable();
        Self::from_sorted(&values)
    }

    /// Like [`Self::new`], but skips sorting.
    ///
    /// # Panics
    ///
    /// Panics if `sorted_values` is not sorted in ascending order.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn from_sorted(sorted_values: &[usize]) -> Option<Self> {
        assert!(
            sorted_values.is_sorted(),
            "values must be sorted in ascending order"
        );

        let min = *sorted_values.first()?;
        let max = *sorted_values.last()?;
        let n = sorted_values.len() as f64;
        let mean = sorted_values.iter().map(|v| *v as f64).sum::<f64>() / n;
        let median = sorted_values[sorted_values.len() / 2];
        let variance = sorted_values
            .iter()
            .map(|v| (*v as f64 - mean).powi(2))
            .sum::<f64>()
            / n;

        Some(Self {
            min,
            max,
            mean,
            median,
            std_dev: variance.sqrt(),
        })
    }
}
