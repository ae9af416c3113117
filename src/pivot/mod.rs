//! Module providing pivot table functionality

use std::collections::{BTreeSet, HashMap};

use crate::core::error::{Error, Result};
use crate::dataframe::DataFrame;
use crate::series::Series;

/// Aggregation function types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggFunction {
    /// Sum
    Sum,
    /// Mean
    Mean,
    /// Minimum
    Min,
    /// Maximum
    Max,
    /// Count
    Count,
}

impl AggFunction {
    /// Get function name as string
    pub fn name(&self) -> &'static str {
        match self {
            AggFunction::Sum => "sum",
            AggFunction::Mean => "mean",
            AggFunction::Min => "min",
            AggFunction::Max => "max",
            AggFunction::Count => "count",
        }
    }

    /// Parse aggregation function from string
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "sum" => Some(AggFunction::Sum),
            "mean" | "avg" | "average" => Some(AggFunction::Mean),
            "min" | "minimum" => Some(AggFunction::Min),
            "max" | "maximum" => Some(AggFunction::Max),
            "count" => Some(AggFunction::Count),
            _ => None,
        }
    }

    fn apply(&self, values: &[f64]) -> f64 {
        if values.is_empty() {
            return 0.0;
        }
        match self {
            AggFunction::Sum => values.iter().sum(),
            AggFunction::Mean => values.iter().sum::<f64>() / values.len() as f64,
            AggFunction::Min => values.iter().fold(f64::INFINITY, |a, &b| a.min(b)),
            AggFunction::Max => values.iter().fold(f64::NEG_INFINITY, |a, &b| a.max(b)),
            AggFunction::Count => values.len() as f64,
        }
    }
}

/// Structure for creating pivot tables
///
/// Reshapes a long-form frame into wide form: one row per distinct index
/// value, one column per distinct column value, each cell the aggregate of
/// the value column over the matching source rows. Combinations absent
/// from the source are filled with 0.
#[derive(Debug)]
pub struct PivotTable<'a> {
    /// Source DataFrame
    df: &'a DataFrame,

    /// Column name to use as index
    index: String,

    /// Column name to use as columns
    columns: String,

    /// Column name to use as values
    values: String,

    /// Aggregation function
    aggfunc: AggFunction,
}

impl<'a> PivotTable<'a> {
    /// Create a new pivot table
    pub fn new(
        df: &'a DataFrame,
        index: String,
        columns: String,
        values: String,
        aggfunc: AggFunction,
    ) -> Result<Self> {
        if !df.contains_column(&index) {
            return Err(Error::Pivot(format!("Index column '{}' not found", index)));
        }
        if !df.contains_column(&columns) {
            return Err(Error::Pivot(format!(
                "Column column '{}' not found",
                columns
            )));
        }
        if !df.contains_column(&values) {
            return Err(Error::Pivot(format!("Value column '{}' not found", values)));
        }

        Ok(PivotTable {
            df,
            index,
            columns,
            values,
            aggfunc,
        })
    }

    /// Execute pivot table and generate a new DataFrame
    ///
    /// Row and column keys appear in sorted order so repeated runs over
    /// the same data produce the same frame.
    pub fn execute(&self) -> Result<DataFrame> {
        let index_values_vec = self.df.get_column_string_values(&self.index)?;
        let column_values_vec = self.df.get_column_string_values(&self.columns)?;
        let values_data_vec = self.df.get_column_numeric_values(&self.values)?;

        let index_keys: BTreeSet<String> = index_values_vec.iter().cloned().collect();
        let column_keys: BTreeSet<String> = column_values_vec.iter().cloned().collect();

        // (index value, column value) -> observed values
        let mut aggregation_map: HashMap<(&String, &String), Vec<f64>> = HashMap::new();
        for i in 0..index_values_vec.len() {
            aggregation_map
                .entry((&index_values_vec[i], &column_values_vec[i]))
                .or_default()
                .push(values_data_vec[i]);
        }

        let mut result_df = DataFrame::new();
        let row_keys: Vec<String> = index_keys.into_iter().collect();
        result_df.add_column(
            self.index.clone(),
            Series::new(row_keys.clone(), Some(self.index.clone())),
        )?;

        for column_key in &column_keys {
            let mut cells = Vec::with_capacity(row_keys.len());
            for row_key in &row_keys {
                let cell = match aggregation_map.get(&(row_key, column_key)) {
                    Some(values) => self.aggfunc.apply(values),
                    None => 0.0,
                };
                cells.push(cell);
            }
            result_df.add_column(
                column_key.clone(),
                Series::new(cells, Some(column_key.clone())),
            )?;
        }

        Ok(result_df)
    }
}

/// DataFrame extension: Pivot table functionality
impl DataFrame {
    /// Create a pivot table
    pub fn pivot_table(
        &self,
        index: &str,
        columns: &str,
        values: &str,
        aggfunc: AggFunction,
    ) -> Result<DataFrame> {
        let pivot = PivotTable::new(
            self,
            index.to_string(),
            columns.to_string(),
            values.to_string(),
            aggfunc,
        )?;

        pivot.execute()
    }
}
