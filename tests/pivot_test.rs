use rxlens::{AggFunction, DataFrame, PivotTable, Series};

fn long_frame() -> DataFrame {
    // (province, product, cost) in long form, with one (province, product)
    // combination missing and one duplicated.
    let mut df = DataFrame::new();
    df.add_column(
        "province_name".to_string(),
        Series::new(
            ["Gauteng", "Gauteng", "Limpopo", "Gauteng"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            Some("province_name".to_string()),
        ),
    )
    .unwrap();
    df.add_column(
        "prescription_name".to_string(),
        Series::new(
            ["Amoxil", "Panado", "Amoxil", "Amoxil"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            Some("prescription_name".to_string()),
        ),
    )
    .unwrap();
    df.add_column(
        "total_cost".to_string(),
        Series::new(vec![100.0, 40.0, 25.0, 10.0], Some("total_cost".to_string())),
    )
    .unwrap();
    df
}

#[test]
fn test_pivot_values_addressable_by_row_and_column() {
    let df = long_frame();
    let wide = df
        .pivot_table(
            "province_name",
            "prescription_name",
            "total_cost",
            AggFunction::Sum,
        )
        .unwrap();

    // Sorted row keys in the index column, sorted column keys after it
    assert_eq!(
        wide.column_names(),
        vec!["province_name", "Amoxil", "Panado"]
    );
    assert_eq!(
        wide.get_column_string_values("province_name").unwrap(),
        vec!["Gauteng".to_string(), "Limpopo".to_string()]
    );

    // Every source (row-key, column-key) pair is addressable in the result
    let amoxil = wide.get_column_numeric_values("Amoxil").unwrap();
    let panado = wide.get_column_numeric_values("Panado").unwrap();
    assert_eq!(amoxil, vec![110.0, 25.0]); // 100 + 10 aggregated
    assert_eq!(panado[0], 40.0);
}

#[test]
fn test_pivot_fills_missing_combinations_with_zero() {
    let df = long_frame();
    let wide = df
        .pivot_table(
            "province_name",
            "prescription_name",
            "total_cost",
            AggFunction::Sum,
        )
        .unwrap();

    // (Limpopo, Panado) never occurs in the source
    let panado = wide.get_column_numeric_values("Panado").unwrap();
    assert_eq!(panado[1], 0.0);
}

#[test]
fn test_pivot_mean_and_count() {
    let df = long_frame();

    let mean = df
        .pivot_table(
            "province_name",
            "prescription_name",
            "total_cost",
            AggFunction::Mean,
        )
        .unwrap();
    assert_eq!(mean.get_column_numeric_values("Amoxil").unwrap()[0], 55.0);

    let count = df
        .pivot_table(
            "province_name",
            "prescription_name",
            "total_cost",
            AggFunction::Count,
        )
        .unwrap();
    assert_eq!(count.get_column_numeric_values("Amoxil").unwrap(), vec![2.0, 1.0]);
}

#[test]
fn test_pivot_unknown_column_is_error() {
    let df = long_frame();
    assert!(PivotTable::new(
        &df,
        "province_name".to_string(),
        "no_such_column".to_string(),
        "total_cost".to_string(),
        AggFunction::Sum,
    )
    .is_err());
}
