//! DataFrame module - column-oriented 2D data structure.
//!
//! A DataFrame is an ordered collection of named, equally-long columns.
//! Columns are type-erased so a single frame can mix string, integer,
//! float and datetime Series, as query results do.

use std::any::Any;
use std::collections::HashMap;
use std::fmt::{Debug, Display};
use std::path::Path;

use chrono::NaiveDateTime;

use crate::core::error::{Error, Result};
use crate::series::Series;

pub mod transform;

// Column trait to allow storing different Series types in the DataFrame
trait ColumnAny: Debug + Send + Sync {
    fn as_any(&self) -> &dyn Any;
    fn len(&self) -> usize;
    fn clone_box(&self) -> Box<dyn ColumnAny + Send + Sync>;
    fn take_box(&self, indices: &[usize]) -> Box<dyn ColumnAny + Send + Sync>;
    fn value_string(&self, idx: usize) -> Option<String>;
    fn set_name(&mut self, name: String);
}

impl<T: 'static + Debug + Clone + Display + Send + Sync> ColumnAny for Series<T> {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn len(&self) -> usize {
        self.len()
    }

    fn clone_box(&self) -> Box<dyn ColumnAny + Send + Sync> {
        Box::new(self.clone())
    }

    fn take_box(&self, indices: &[usize]) -> Box<dyn ColumnAny + Send + Sync> {
        Box::new(self.take(indices))
    }

    fn value_string(&self, idx: usize) -> Option<String> {
        self.get(idx).map(|v| v.to_string())
    }

    fn set_name(&mut self, name: String) {
        Series::set_name(self, name);
    }
}

impl Clone for Box<dyn ColumnAny + Send + Sync> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

/// DataFrame struct: Column-oriented 2D data structure
#[derive(Debug, Clone, Default)]
pub struct DataFrame {
    columns: HashMap<String, Box<dyn ColumnAny + Send + Sync>>,
    column_order: Vec<String>,
    row_count: usize,
}

impl DataFrame {
    /// Create a new empty DataFrame
    pub fn new() -> Self {
        Self {
            columns: HashMap::new(),
            column_order: Vec::new(),
            row_count: 0,
        }
    }

    /// Check if the DataFrame contains a column with the given name
    pub fn contains_column(&self, column_name: &str) -> bool {
        self.columns.contains_key(column_name)
    }

    /// Get the number of rows in the DataFrame
    pub fn row_count(&self) -> usize {
        self.row_count
    }

    /// Get the number of columns in the DataFrame
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Get column names in insertion order
    pub fn column_names(&self) -> Vec<String> {
        self.column_order.clone()
    }

    /// Add a column to the DataFrame
    pub fn add_column<T: 'static + Debug + Clone + Display + Send + Sync>(
        &mut self,
        column_name: String,
        series: Series<T>,
    ) -> Result<()> {
        if self.contains_column(&column_name) {
            return Err(Error::DuplicateColumnName(column_name));
        }

        let series_len = series.len();
        if !self.columns.is_empty() && series_len != self.row_count {
            return Err(Error::InconsistentRowCount {
                expected: self.row_count,
                found: series_len,
            });
        }

        self.columns.insert(column_name.clone(), Box::new(series));
        self.column_order.push(column_name);

        if self.row_count == 0 {
            self.row_count = series_len;
        }

        Ok(())
    }

    /// Rename a column, keeping its position
    pub fn rename_column(&mut self, old_name: &str, new_name: &str) -> Result<()> {
        if !self.contains_column(old_name) {
            return Err(Error::ColumnNotFound(old_name.to_string()));
        }
        if old_name == new_name {
            return Ok(());
        }
        if self.contains_column(new_name) {
            return Err(Error::DuplicateColumnName(new_name.to_string()));
        }

        let mut column = self
            .columns
            .remove(old_name)
            .ok_or_else(|| Error::ColumnNotFound(old_name.to_string()))?;
        column.set_name(new_name.to_string());
        self.columns.insert(new_name.to_string(), column);

        for name in self.column_order.iter_mut() {
            if name == old_name {
                *name = new_name.to_string();
            }
        }
        Ok(())
    }

    /// Get a column from the DataFrame with generic type
    pub fn get_column<T: 'static + Debug + Clone + Display + Send + Sync>(
        &self,
        column_name: &str,
    ) -> Result<&Series<T>> {
        let col = self
            .columns
            .get(column_name)
            .ok_or_else(|| Error::ColumnNotFound(column_name.to_string()))?;

        col.as_any().downcast_ref::<Series<T>>().ok_or_else(|| {
            Error::Type(format!(
                "Column '{}' is not of the requested type",
                column_name
            ))
        })
    }

    /// Get the values of a column rendered as strings
    pub fn get_column_string_values(&self, column_name: &str) -> Result<Vec<String>> {
        let col = self
            .columns
            .get(column_name)
            .ok_or_else(|| Error::ColumnNotFound(column_name.to_string()))?;

        let mut result = Vec::with_capacity(self.row_count);
        for i in 0..col.len() {
            match col.value_string(i) {
                Some(v) => result.push(v),
                None => {
                    return Err(Error::InvalidValue(format!(
                        "Missing value at index {} in column '{}'",
                        i, column_name
                    )))
                }
            }
        }
        Ok(result)
    }

    /// Get the values of a column as f64
    ///
    /// Accepts float and integer columns, and string columns whose every
    /// value parses as a number.
    pub fn get_column_numeric_values(&self, column_name: &str) -> Result<Vec<f64>> {
        let col = self
            .columns
            .get(column_name)
            .ok_or_else(|| Error::ColumnNotFound(column_name.to_string()))?;

        if let Some(float_series) = col.as_any().downcast_ref::<Series<f64>>() {
            return Ok(float_series.values().to_vec());
        }
        if let Some(int_series) = col.as_any().downcast_ref::<Series<i64>>() {
            return Ok(int_series.values().iter().map(|&v| v as f64).collect());
        }
        if let Some(str_series) = col.as_any().downcast_ref::<Series<String>>() {
            let mut values = Vec::with_capacity(str_series.len());
            for (i, raw) in str_series.values().iter().enumerate() {
                let parsed = raw.trim().parse::<f64>().map_err(|_| {
                    Error::InvalidValue(format!(
                        "Value '{}' at index {} in column '{}' cannot be converted to numeric",
                        raw, i, column_name
                    ))
                })?;
                values.push(parsed);
            }
            return Ok(values);
        }

        Err(Error::Type(format!(
            "Column '{}' cannot be converted to numeric values",
            column_name
        )))
    }

    /// Get the values of a column as datetimes
    ///
    /// Accepts datetime columns directly, and string columns whose values
    /// parse with [`crate::series::datetime_accessor::parse_datetime`].
    pub fn get_column_datetime_values(&self, column_name: &str) -> Result<Vec<NaiveDateTime>> {
        if let Ok(series) = self.get_column::<NaiveDateTime>(column_name) {
            return Ok(series.values().to_vec());
        }

        let raw = self.get_column_string_values(column_name)?;
        let mut values = Vec::with_capacity(raw.len());
        for s in &raw {
            values.push(crate::series::datetime_accessor::parse_datetime(s)?);
        }
        Ok(values)
    }

    /// Count occurrences of each value in a column, most frequent first.
    /// Ties break lexicographically so the result is deterministic.
    pub fn value_counts(&self, column_name: &str) -> Result<Vec<(String, usize)>> {
        let values = self.get_column_string_values(column_name)?;

        let mut counts: HashMap<String, usize> = HashMap::new();
        for value in values {
            *counts.entry(value).or_insert(0) += 1;
        }

        let mut pairs: Vec<(String, usize)> = counts.into_iter().collect();
        pairs.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        Ok(pairs)
    }

    /// Build a new DataFrame containing the rows at the given positions,
    /// in the given order, across every column.
    pub fn take_rows(&self, indices: &[usize]) -> Result<DataFrame> {
        for &i in indices {
            if i >= self.row_count {
                return Err(Error::InvalidValue(format!(
                    "Row index {} out of range for {} rows",
                    i, self.row_count
                )));
            }
        }

        let mut df = DataFrame::new();
        df.row_count = indices.len();
        for name in &self.column_order {
            let col = &self.columns[name];
            df.columns.insert(name.clone(), col.take_box(indices));
            df.column_order.push(name.clone());
        }
        Ok(df)
    }

    /// Sort rows by a numeric column, ascending or descending.
    pub fn sort_by_numeric(&self, column_name: &str, descending: bool) -> Result<DataFrame> {
        let keys = self.get_column_numeric_values(column_name)?;

        let mut indices: Vec<usize> = (0..self.row_count).collect();
        indices.sort_by(|&a, &b| {
            let ord = keys[a]
                .partial_cmp(&keys[b])
                .unwrap_or(std::cmp::Ordering::Equal);
            if descending {
                ord.reverse()
            } else {
                ord
            }
        });

        self.take_rows(&indices)
    }

    /// Keep only the rows whose value in `column_name` is one of `keep`.
    pub fn filter_by_values(&self, column_name: &str, keep: &[String]) -> Result<DataFrame> {
        let values = self.get_column_string_values(column_name)?;
        let keep_set: std::collections::HashSet<&String> = keep.iter().collect();

        let indices: Vec<usize> = values
            .iter()
            .enumerate()
            .filter(|(_, v)| keep_set.contains(v))
            .map(|(i, _)| i)
            .collect();

        self.take_rows(&indices)
    }

    /// Replace a string column with a transformed copy of itself.
    pub fn map_string_column<F>(&mut self, column_name: &str, f: F) -> Result<()>
    where
        F: Fn(&Series<String>) -> Series<String>,
    {
        let transformed = {
            let series = self.get_column::<String>(column_name)?;
            f(series)
        };
        if transformed.len() != self.row_count {
            return Err(Error::InconsistentRowCount {
                expected: self.row_count,
                found: transformed.len(),
            });
        }
        self.columns.insert(column_name.to_string(), Box::new(transformed));
        Ok(())
    }

    /// Write the DataFrame to a CSV file
    pub fn to_csv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut writer = csv::Writer::from_path(path.as_ref()).map_err(Error::Csv)?;

        writer.write_record(&self.column_order)?;
        for row in 0..self.row_count {
            let mut record = Vec::with_capacity(self.column_order.len());
            for name in &self.column_order {
                record.push(self.columns[name].value_string(row).unwrap_or_default());
            }
            writer.write_record(&record)?;
        }
        writer.flush()?;
        Ok(())
    }

    /// Render the first `n` rows as a tab-separated preview
    pub fn head(&self, n: usize) -> String {
        let mut result = String::new();

        for (i, col_name) in self.column_order.iter().enumerate() {
            if i > 0 {
                result.push('\t');
            }
            result.push_str(col_name);
        }
        result.push('\n');

        let row_limit = n.min(self.row_count);
        for row_idx in 0..row_limit {
            for (i, col_name) in self.column_order.iter().enumerate() {
                if i > 0 {
                    result.push('\t');
                }
                result.push_str(
                    &self.columns[col_name]
                        .value_string(row_idx)
                        .unwrap_or_default(),
                );
            }
            result.push('\n');
        }

        result
    }
}
