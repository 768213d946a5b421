//! Online summary statistics
use num_traits::{Float, Zero};
use serde::{Deserialize, Serialize};
use std::iter::{Extend, FromIterator};

/// Online mean and variance calculation using Welford's Algorithm
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OnlineMeanVariance<T> {
    mean: T,
    squared_residual_sum: T,
    count: u64,
}

impl<T: Zero> Default for OnlineMeanVariance<T> {
    fn default() -> Self {
        Self {
            mean: T::zero(),
            squared_residual_sum: T::zero(),
            count: 0,
        }
    }
}

impl<T: Copy> OnlineMeanVariance<T> {
    /// The mean of all accumulated values.
    pub fn mean(&self) -> T {
        self.mean
    }

    /// Sum of squared deviations of all accumulated values from their mean.
    pub fn squared_residual_sum(&self) -> T {
        self.squared_residual_sum
    }

    /// Number of accumulated values.
    pub fn count(&self) -> u64 {
        self.count
    }
}

impl<T: Float> OnlineMeanVariance<T> {
    /// The (population) variance of all accumulated values.
    ///
    /// `NaN` if no values have been accumulated.
    pub fn variance(&self) -> T {
        self.squared_residual_sum / T::from(self.count).unwrap_or_else(T::nan)
    }

    /// The (population) standard deviation of all accumulated values.
    pub fn stddev(&self) -> T {
        self.variance().sqrt()
    }

    /// Add a new value to the calculation.
    pub fn push(&mut self, value: T) {
        let residual_pre = value - self.mean;
        self.count += 1;
        self.mean = self.mean + residual_pre / T::from(self.count).unwrap_or_else(T::nan);
        let residual_post = value - self.mean;
        self.squared_residual_sum = self.squared_residual_sum + residual_pre * residual_post;
    }
}

impl<T: Float> Extend<T> for OnlineMeanVariance<T> {
    fn extend<I>(&mut self, iter: I)
    where
        I: IntoIterator<Item = T>,
    {
        for value in iter {
            self.push(value)
        }
    }
}

impl<T: Float> FromIterator<T> for OnlineMeanVariance<T> {
    fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = T>,
    {
        let mut s = Self::default();
        s.extend(iter);
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collect_f64() {
        let stats: OnlineMeanVariance<f64> = [1.0, 2.0, 3.0, 4.0].into_iter().collect();
        assert!((stats.mean() - 2.5).abs() < 1e-8);
        assert!((stats.variance() - 1.25).abs() < 1e-8);
        assert!((stats.squared_residual_sum() - 5.0).abs() < 1e-8);
        assert_eq!(stats.count(), 4);
    }

    #[test]
    fn constant_values_have_zero_spread() {
        let stats: OnlineMeanVariance<f64> = std::iter::repeat(0.5).take(10).collect();
        assert_eq!(stats.mean(), 0.5);
        assert_eq!(stats.squared_residual_sum(), 0.0);
    }

    #[test]
    fn empty_variance_is_nan() {
        assert!(OnlineMeanVariance::<f64>::default().variance().is_nan());
    }
}
