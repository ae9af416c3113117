use rxlens::{DataFrame, Series};

fn sample_df() -> DataFrame {
    let mut df = DataFrame::new();
    df.add_column(
        "medication_type".to_string(),
        Series::new(
            vec!["Brand".to_string(), "Generic".to_string()],
            Some("medication_type".to_string()),
        ),
    )
    .unwrap();
    df.add_column(
        "total_cost".to_string(),
        Series::new(vec![1000.0, 200.0], Some("total_cost".to_string())),
    )
    .unwrap();
    df.add_column(
        "prescription_count".to_string(),
        Series::new(vec![5i64, 3i64], Some("prescription_count".to_string())),
    )
    .unwrap();
    df
}

#[test]
fn test_add_column_and_shape() {
    let df = sample_df();
    assert_eq!(df.row_count(), 2);
    assert_eq!(df.column_count(), 3);
    assert_eq!(
        df.column_names(),
        vec!["medication_type", "total_cost", "prescription_count"]
    );
}

#[test]
fn test_duplicate_column_is_rejected() {
    let mut df = sample_df();
    let result = df.add_column(
        "total_cost".to_string(),
        Series::new(vec![1.0, 2.0], None),
    );
    assert!(result.is_err());
}

#[test]
fn test_inconsistent_row_count_is_rejected() {
    let mut df = sample_df();
    let result = df.add_column("extra".to_string(), Series::new(vec![1.0], None));
    assert!(result.is_err());
}

#[test]
fn test_string_and_numeric_extraction() {
    let df = sample_df();
    assert_eq!(
        df.get_column_string_values("medication_type").unwrap(),
        vec!["Brand".to_string(), "Generic".to_string()]
    );
    // Integer columns are readable as numeric values
    assert_eq!(
        df.get_column_numeric_values("prescription_count").unwrap(),
        vec![5.0, 3.0]
    );
    // String columns are not numeric
    assert!(df.get_column_numeric_values("medication_type").is_err());
    assert!(df.get_column_numeric_values("missing").is_err());
}

#[test]
fn test_rename_column_keeps_position() {
    let mut df = sample_df();
    df.rename_column("total_cost", "cost").unwrap();
    assert_eq!(
        df.column_names(),
        vec!["medication_type", "cost", "prescription_count"]
    );
    assert_eq!(df.get_column_numeric_values("cost").unwrap(), vec![1000.0, 200.0]);
    assert!(df.rename_column("missing", "x").is_err());
    assert!(df.rename_column("cost", "medication_type").is_err());
}

#[test]
fn test_sort_by_numeric_descending() {
    let mut df = DataFrame::new();
    df.add_column(
        "name".to_string(),
        Series::new(
            vec!["a".to_string(), "b".to_string(), "c".to_string()],
            None,
        ),
    )
    .unwrap();
    df.add_column("value".to_string(), Series::new(vec![2.0, 9.0, 4.0], None))
        .unwrap();

    let sorted = df.sort_by_numeric("value", true).unwrap();
    assert_eq!(
        sorted.get_column_string_values("name").unwrap(),
        vec!["b".to_string(), "c".to_string(), "a".to_string()]
    );
    assert_eq!(
        sorted.get_column_numeric_values("value").unwrap(),
        vec![9.0, 4.0, 2.0]
    );
}

#[test]
fn test_filter_by_values() {
    let df = sample_df();
    let filtered = df
        .filter_by_values("medication_type", &["Generic".to_string()])
        .unwrap();
    assert_eq!(filtered.row_count(), 1);
    assert_eq!(
        filtered.get_column_numeric_values("total_cost").unwrap(),
        vec![200.0]
    );
}

#[test]
fn test_value_counts_orders_by_frequency_then_name() {
    let mut df = DataFrame::new();
    df.add_column(
        "drug".to_string(),
        Series::new(
            ["b", "a", "b", "c", "a", "b"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            None,
        ),
    )
    .unwrap();

    let counts = df.value_counts("drug").unwrap();
    assert_eq!(
        counts,
        vec![
            ("b".to_string(), 3),
            ("a".to_string(), 2),
            ("c".to_string(), 1)
        ]
    );
}

#[test]
fn test_take_rows_out_of_range_is_error() {
    let df = sample_df();
    assert!(df.take_rows(&[0, 7]).is_err());
}

#[test]
fn test_to_csv_round_trips_values() {
    let df = sample_df();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.csv");
    df.to_csv(&path).unwrap();

    let contents = std::fs::read_to_string(&path).unwrap();
    let mut lines = contents.lines();
    assert_eq!(
        lines.next().unwrap(),
        "medication_type,total_cost,prescription_count"
    );
    assert_eq!(lines.next().unwrap(), "Brand,1000,5");
    assert_eq!(lines.next().unwrap(), "Generic,200,3");
}

#[test]
fn test_head_preview() {
    let df = sample_df();
    let preview = df.head(1);
    assert!(preview.starts_with("medication_type\ttotal_cost\tprescription_count\n"));
    assert!(preview.contains("Brand"));
    assert!(!preview.contains("Generic"));
}
