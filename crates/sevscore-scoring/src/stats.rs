//! Statistics over raw and calibrated scores.

use serde::{Deserialize, Serialize};

use crate::calibrator::Category;

/// Summary statistics of a set of scores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreStats {
    pub count: usize,
    pub mean: f32,
    pub std_dev: f32,
    pub min: f32,
    pub max: f32,
    pub p10: f32,
    pub p25: f32,
    /// Median.
    pub p50: f32,
    pub p75: f32,
    pub p90: f32,
    pub p95: f32,
}

impl ScoreStats {
    /// Compute statistics over the finite values of `scores`.
    ///
    /// Returns `None` if there are none.
    pub fn compute(scores: &[f32]) -> Option<Self> {
        let mut sorted: Vec<f32> = scores.iter().copied().filter(|s| s.is_finite()).collect();
        if sorted.is_empty() {
            return None;
        }
        sorted.sort_by(f32::total_cmp);

        let count = sorted.len();
        let mean = sorted.iter().sum::<f32>() / count as f32;
        let variance = sorted.iter().map(|x| (x - mean).powi(2)).sum::<f32>() / count as f32;

        Some(Self {
            count,
            mean,
            std_dev: variance.sqrt(),
            min: sorted[0],
            max: sorted[count - 1],
            p10: percentile(&sorted, 10.0),
            p25: percentile(&sorted, 25.0),
            p50: percentile(&sorted, 50.0),
            p75: percentile(&sorted, 75.0),
            p90: percentile(&sorted, 90.0),
            p95: percentile(&sorted, 95.0),
        })
    }
}

/// Linear-interpolated percentile of an ascending slice; `p` in `0..=100`.
fn percentile(sorted: &[f32], p: f32) -> f32 {
    match sorted.len() {
        0 => 0.0,
        1 => sorted[0],
        n => {
            let index = (p.clamp(0.0, 100.0) / 100.0) * (n - 1) as f32;
            let lower = index.floor() as usize;
            let upper = index.ceil() as usize;
            let fraction = index - lower as f32;
            sorted[lower] * (1.0 - fraction) + sorted[upper] * fraction
        }
    }
}

/// How many scores fall into each category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreDistribution {
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

impl ScoreDistribution {
    pub fn from_scores(scores: &[f32]) -> Self {
        Self::from_categories(scores.iter().map(|&s| Category::from_score(s)))
    }

    pub fn from_categories(categories: impl IntoIterator<Item = Category>) -> Self {
        let mut distribution = Self::default();
        for category in categories {
            distribution.add(category);
        }
        distribution
    }

    pub fn add(&mut self, category: Category) {
        match category {
            Category::High => self.high += 1,
            Category::Medium => self.medium += 1,
            Category::Low => self.low += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.high + self.medium + self.low
    }

    pub fn count(&self, category: Category) -> usize {
        match category {
            Category::High => self.high,
            Category::Medium => self.medium,
            Category::Low => self.low,
        }
    }

    /// Share of `category` in percent; 0 for an empty distribution.
    pub fn percentage(&self, category: Category) -> f32 {
        match self.total() {
            0 => 0.0,
            total => self.count(category) as f32 * 100.0 / total as f32,
        }
    }
}

impl std::fmt::Display for ScoreDistribution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, category) in Category::ALL.into_iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(
                f,
                "  {:<6} {:>5} ({:.1}%)",
                category,
                self.count(category),
                self.percentage(category)
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compute_stats_empty() {
        assert!(ScoreStats::compute(&[]).is_none());
        assert!(ScoreStats::compute(&[f32::NAN]).is_none());
    }

    #[test]
    fn test_compute_stats_basic() {
        let stats = ScoreStats::compute(&[5.0, 1.0, 3.0, 2.0, 4.0]).unwrap();
        assert_eq!(stats.count, 5);
        assert!((stats.mean - 3.0).abs() < 0.001);
        assert_eq!(stats.min, 1.0);
        assert_eq!(stats.max, 5.0);
        assert!((stats.p50 - 3.0).abs() < 0.001);
        assert!(stats.std_dev > 1.0);
    }

    #[test]
    fn test_non_finite_values_ignored() {
        let stats = ScoreStats::compute(&[1.0, f32::INFINITY, 3.0, f32::NAN]).unwrap();
        assert_eq!(stats.count, 2);
        assert_eq!(stats.max, 3.0);
    }

    #[test]
    fn test_percentiles_interpolate() {
        let scores: Vec<f32> = (0..100).map(|i| i as f32).collect();
        let stats = ScoreStats::compute(&scores).unwrap();
        assert!((stats.p10 - 9.9).abs() < 0.01);
        assert!((stats.p50 - 49.5).abs() < 0.01);
        assert!((stats.p90 - 89.1).abs() < 0.01);
    }

    #[test]
    fn test_distribution_from_scores() {
        let distribution = ScoreDistribution::from_scores(&[95.0, 90.0, 85.0, 79.9, 10.0]);
        assert_eq!(distribution.high, 2);
        assert_eq!(distribution.medium, 1);
        assert_eq!(distribution.low, 2);
        assert_eq!(distribution.total(), 5);
        assert!((distribution.percentage(Category::High) - 40.0).abs() < 1e-4);
    }

    #[test]
    fn test_empty_distribution() {
        let distribution = ScoreDistribution::default();
        assert_eq!(distribution.percentage(Category::Low), 0.0);
    }

    #[test]
    fn test_distribution_display() {
        let distribution = ScoreDistribution::from_categories([Category::High, Category::Low]);
        let text = distribution.to_string();
        assert!(text.contains("High"));
        assert!(text.contains("50.0%"));
        assert_eq!(text.lines().count(), 3);
    }
}
