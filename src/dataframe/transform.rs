//! Row-wise DataFrame transformations: keyed merging of two frames.

use std::collections::HashMap;

use crate::core::error::{Error, Result};
use crate::dataframe::DataFrame;

/// Inner-join two frames on a shared string key column.
///
/// The result carries the key column once, then every other column of
/// `left`, then every other column of `right`. A right-side row is matched
/// by key; when the right side has duplicate keys the first occurrence
/// wins. Column names other than the key must not collide.
pub fn merge_on(left: &DataFrame, right: &DataFrame, on: &str) -> Result<DataFrame> {
    let left_keys = left.get_column_string_values(on)?;
    let right_keys = right.get_column_string_values(on)?;

    for name in right.column_names() {
        if name != on && left.contains_column(&name) {
            return Err(Error::DuplicateColumnName(name));
        }
    }

    let mut right_index: HashMap<&String, usize> = HashMap::new();
    for (i, key) in right_keys.iter().enumerate() {
        right_index.entry(key).or_insert(i);
    }

    let mut left_rows = Vec::new();
    let mut right_rows = Vec::new();
    for (i, key) in left_keys.iter().enumerate() {
        if let Some(&j) = right_index.get(key) {
            left_rows.push(i);
            right_rows.push(j);
        }
    }

    let left_taken = left.take_rows(&left_rows)?;
    let right_taken = right.take_rows(&right_rows)?;

    let mut merged = DataFrame::new();
    merged.add_column(
        on.to_string(),
        crate::series::Series::new(
            left_taken.get_column_string_values(on)?,
            Some(on.to_string()),
        ),
    )?;

    for name in left_taken.column_names() {
        if name == on {
            continue;
        }
        append_copied_column(&mut merged, &left_taken, &name)?;
    }
    for name in right_taken.column_names() {
        if name == on {
            continue;
        }
        append_copied_column(&mut merged, &right_taken, &name)?;
    }

    Ok(merged)
}

fn append_copied_column(dest: &mut DataFrame, src: &DataFrame, name: &str) -> Result<()> {
    // Numeric columns stay numeric across the merge; everything else is
    // carried as text.
    if let Ok(values) = src.get_column_numeric_values(name) {
        dest.add_column(
            name.to_string(),
            crate::series::Series::new(values, Some(name.to_string())),
        )
    } else {
        dest.add_column(
            name.to_string(),
            crate::series::Series::new(
                src.get_column_string_values(name)?,
                Some(name.to_string()),
            ),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::series::Series;

    fn frame(key: &[&str], col: &str, values: &[f64]) -> DataFrame {
        let mut df = DataFrame::new();
        df.add_column(
            "province".to_string(),
            Series::new(
                key.iter().map(|s| s.to_string()).collect(),
                Some("province".to_string()),
            ),
        )
        .unwrap();
        df.add_column(
            col.to_string(),
            Series::new(values.to_vec(), Some(col.to_string())),
        )
        .unwrap();
        df
    }

    #[test]
    fn test_merge_inner_drops_unmatched() {
        let facilities = frame(&["gauteng", "limpopo"], "facility_count", &[10.0, 4.0]);
        let visits = frame(&["limpopo", "natal"], "visit_count", &[40.0, 7.0]);

        let merged = merge_on(&facilities, &visits, "province").unwrap();
        assert_eq!(merged.row_count(), 1);
        assert_eq!(
            merged.get_column_string_values("province").unwrap(),
            vec!["limpopo".to_string()]
        );
        assert_eq!(
            merged.get_column_numeric_values("facility_count").unwrap(),
            vec![4.0]
        );
        assert_eq!(
            merged.get_column_numeric_values("visit_count").unwrap(),
            vec![40.0]
        );
    }

    #[test]
    fn test_merge_rejects_column_collision() {
        let a = frame(&["x"], "count", &[1.0]);
        let b = frame(&["x"], "count", &[2.0]);
        assert!(merge_on(&a, &b, "province").is_err());
    }
}
