//! Series module - named, ordered, homogeneous columns.
//!
//! A Series is a one-dimensional array of values with an optional name,
//! the building block every DataFrame column is made of.

use std::fmt::Debug;
use std::iter::Sum;
use std::ops::{Add, Div, Mul, Sub};

use num_traits::NumCast;

use crate::core::error::{Error, Result};

pub mod datetime_accessor;
pub mod string_accessor;

pub use datetime_accessor::DateTimeAccessor;
pub use string_accessor::StringAccessor;

/// Series data structure
#[derive(Debug, Clone, PartialEq)]
pub struct Series<T: Debug + Clone> {
    /// Series data values
    values: Vec<T>,
    /// Optional name for the series
    name: Option<String>,
}

impl<T: Debug + Clone> Series<T> {
    /// Create a new Series from a vector
    ///
    /// # Example
    /// ```
    /// use rxlens::Series;
    ///
    /// let series = Series::new(vec![1, 2, 3], Some("data".to_string()));
    /// assert_eq!(series.len(), 3);
    /// ```
    pub fn new(values: Vec<T>, name: Option<String>) -> Self {
        Series { values, name }
    }

    /// Get the length of the Series
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if the Series is empty
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Get value by position
    pub fn get(&self, pos: usize) -> Option<&T> {
        self.values.get(pos)
    }

    /// Get the array of values
    pub fn values(&self) -> &[T] {
        &self.values
    }

    /// Get the name
    pub fn name(&self) -> Option<&String> {
        self.name.as_ref()
    }

    /// Set the name (mutable reference version)
    pub fn set_name(&mut self, name: String) {
        self.name = Some(name);
    }

    /// Set the name and return self (builder pattern)
    pub fn with_name(mut self, name: String) -> Self {
        self.name = Some(name);
        self
    }

    /// Build a new Series containing the values at the given positions.
    ///
    /// Positions out of range are skipped.
    pub fn take(&self, indices: &[usize]) -> Series<T> {
        let taken: Vec<T> = indices
            .iter()
            .filter_map(|&i| self.values.get(i).cloned())
            .collect();
        Series::new(taken, self.name.clone())
    }

    /// Convert Series<T> to Series<String>
    pub fn to_string_series(&self) -> Series<String>
    where
        T: std::fmt::Display,
    {
        let string_values: Vec<String> = self.values.iter().map(|v| v.to_string()).collect();
        Series::new(string_values, self.name.clone())
    }
}

impl Series<String> {
    /// String accessor, pandas-style `.str`
    pub fn str(&self) -> StringAccessor<'_> {
        StringAccessor::new(self)
    }
}

impl Series<chrono::NaiveDateTime> {
    /// Datetime accessor, pandas-style `.dt`
    pub fn dt(&self) -> DateTimeAccessor<'_> {
        DateTimeAccessor::new(self)
    }
}

// Specialized implementation for numeric Series
impl<T> Series<T>
where
    T: Debug
        + Clone
        + Copy
        + Sum<T>
        + PartialOrd
        + Add<Output = T>
        + Sub<Output = T>
        + Mul<Output = T>
        + Div<Output = T>
        + NumCast
        + Default,
{
    /// Calculate the sum
    pub fn sum(&self) -> T {
        if self.values.is_empty() {
            T::default()
        } else {
            self.values.iter().copied().sum()
        }
    }

    /// Calculate the mean
    pub fn mean(&self) -> Result<T> {
        if self.values.is_empty() {
            return Err(Error::Empty(
                "Cannot calculate mean of an empty Series".to_string(),
            ));
        }

        let sum = self.sum();
        let count: T = num_traits::cast(self.len())
            .ok_or_else(|| Error::Cast("Cannot cast length to numeric type".to_string()))?;

        Ok(sum / count)
    }

    /// Calculate the minimum value
    pub fn min(&self) -> Result<T> {
        self.values
            .iter()
            .copied()
            .fold(None, |acc: Option<T>, x| match acc {
                None => Some(x),
                Some(y) => Some(if x < y { x } else { y }),
            })
            .ok_or_else(|| Error::Empty("Cannot calculate minimum of an empty Series".to_string()))
    }

    /// Calculate the maximum value
    pub fn max(&self) -> Result<T> {
        self.values
            .iter()
            .copied()
            .fold(None, |acc: Option<T>, x| match acc {
                None => Some(x),
                Some(y) => Some(if x > y { x } else { y }),
            })
            .ok_or_else(|| Error::Empty("Cannot calculate maximum of an empty Series".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_stats() {
        let series = Series::new(vec![3.0, 1.0, 2.0], Some("vals".to_string()));
        assert_eq!(series.sum(), 6.0);
        assert_eq!(series.mean().unwrap(), 2.0);
        assert_eq!(series.min().unwrap(), 1.0);
        assert_eq!(series.max().unwrap(), 3.0);
    }

    #[test]
    fn test_empty_mean_is_error() {
        let series: Series<f64> = Series::new(vec![], None);
        assert!(series.mean().is_err());
    }

    #[test]
    fn test_take_skips_out_of_range() {
        let series = Series::new(vec![10, 20, 30], None);
        let taken = series.take(&[2, 0, 9]);
        assert_eq!(taken.values(), &[30, 10]);
    }
}
