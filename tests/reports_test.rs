use rxlens::vis::ChartData;
use rxlens::{DataFrame, ReportKind, Series};

fn string_column(values: &[&str]) -> Series<String> {
    Series::new(values.iter().map(|s| s.to_string()).collect(), None)
}

// The fixed result set from the medication type query: rows arrive
// ordered by total_cost descending, as the ORDER BY clause dictates.
fn medication_type_frame() -> DataFrame {
    let mut df = DataFrame::new();
    df.add_column(
        "medication_type".to_string(),
        string_column(&["Brand", "Generic"]),
    )
    .unwrap();
    df.add_column(
        "total_cost".to_string(),
        Series::new(vec![1000.0, 200.0], None),
    )
    .unwrap();
    df.add_column(
        "prescription_count".to_string(),
        Series::new(vec![5i64, 3i64], None),
    )
    .unwrap();
    df
}

#[test]
fn test_medication_type_bars_match_result_set() {
    let chart = ReportKind::MedicationTypeCosts
        .shape(&[medication_type_frame()])
        .unwrap();

    match chart {
        ChartData::Bars {
            categories,
            values,
            horizontal,
        } => {
            assert_eq!(categories, vec!["Brand".to_string(), "Generic".to_string()]);
            assert_eq!(values, vec![1000.0, 200.0]);
            assert!(values.windows(2).all(|w| w[0] >= w[1]));
            assert!(!horizontal);
        }
        other => panic!("expected bars, got {:?}", other),
    }
}

#[test]
fn test_practitioner_performance_groups_by_type() {
    let mut df = DataFrame::new();
    df.add_column(
        "practitioner_id".to_string(),
        Series::new(vec![1i64, 2, 3], None),
    )
    .unwrap();
    df.add_column(
        "practitioner_name".to_string(),
        string_column(&["A One", "B Two", "C Three"]),
    )
    .unwrap();
    df.add_column(
        "practitioner_type".to_string(),
        string_column(&["GP", "Specialist", "GP"]),
    )
    .unwrap();
    df.add_column(
        "average_prescription_cost".to_string(),
        Series::new(vec![120.0, 300.0, 90.0], None),
    )
    .unwrap();
    df.add_column(
        "prescription_count".to_string(),
        Series::new(vec![60i64, 52, 75], None),
    )
    .unwrap();

    let chart = ReportKind::PractitionerPerformance.shape(&[df]).unwrap();
    match chart {
        ChartData::Scatter { groups } => {
            assert_eq!(groups.len(), 2);
            assert_eq!(groups[0].name, "GP");
            assert_eq!(groups[0].xs, vec![60.0, 75.0]);
            assert_eq!(groups[0].ys, vec![120.0, 90.0]);
            assert_eq!(groups[1].name, "Specialist");
            assert_eq!(groups[1].xs, vec![52.0]);
        }
        other => panic!("expected scatter, got {:?}", other),
    }
}

#[test]
fn test_prescribing_heatmap_aggregates_into_sorted_matrix() {
    let mut df = DataFrame::new();
    df.add_column(
        "practitioner_type".to_string(),
        string_column(&["GP", "GP", "Specialist", "GP", "Specialist"]),
    )
    .unwrap();
    df.add_column(
        "medication_name".to_string(),
        string_column(&["Amoxil", "Panado", "Amoxil", "Amoxil", "Panado"]),
    )
    .unwrap();
    df.add_column(
        "prescription_count".to_string(),
        Series::new(vec![10i64, 5, 7, 2, 1], None),
    )
    .unwrap();
    df.add_column(
        "total_cost".to_string(),
        Series::new(vec![100.0, 50.0, 70.0, 20.0, 10.0], None),
    )
    .unwrap();

    let chart = ReportKind::PrescribingHeatmap.shape(&[df]).unwrap();
    match chart {
        ChartData::Heatmap { rows, cols, cells } => {
            // Sorted row and column keys from the pivot
            assert_eq!(rows, vec!["Amoxil".to_string(), "Panado".to_string()]);
            assert_eq!(cols, vec!["GP".to_string(), "Specialist".to_string()]);
            // Amoxil/GP aggregates two source rows: 10 + 2
            assert_eq!(cells[0], vec![12.0, 7.0]);
            assert_eq!(cells[1], vec![5.0, 1.0]);
        }
        other => panic!("expected heatmap, got {:?}", other),
    }
}

#[test]
fn test_prescribing_heatmap_cuts_to_ten_medications() {
    // Eleven medications with distinct row frequencies; the rarest one
    // must fall off the top-10 cut.
    let mut types = Vec::new();
    let mut meds = Vec::new();
    let mut counts = Vec::new();
    let mut costs = Vec::new();
    for m in 0..11u32 {
        for _ in 0..(11 - m) {
            types.push("GP".to_string());
            meds.push(format!("med-{:02}", m));
            counts.push(1i64);
            costs.push(10.0);
        }
    }

    let mut df = DataFrame::new();
    df.add_column("practitioner_type".to_string(), Series::new(types, None))
        .unwrap();
    df.add_column("medication_name".to_string(), Series::new(meds, None))
        .unwrap();
    df.add_column(
        "prescription_count".to_string(),
        Series::new(counts, None),
    )
    .unwrap();
    df.add_column("total_cost".to_string(), Series::new(costs, None))
        .unwrap();

    let chart = ReportKind::PrescribingHeatmap.shape(&[df]).unwrap();
    match chart {
        ChartData::Heatmap { rows, .. } => {
            assert_eq!(rows.len(), 10);
            assert!(!rows.contains(&"med-10".to_string()));
        }
        other => panic!("expected heatmap, got {:?}", other),
    }
}

#[test]
fn test_provincial_costs_normalizes_and_zero_fills() {
    let mut df = DataFrame::new();
    df.add_column(
        "province_name".to_string(),
        string_column(&["  gauteng ", "GAUTENG", "limpopo  "]),
    )
    .unwrap();
    df.add_column(
        "prescription_name".to_string(),
        string_column(&[" Amoxil ", "Panado", "Amoxil"]),
    )
    .unwrap();
    df.add_column(
        "total_cost".to_string(),
        Series::new(vec![100.0, 40.0, 25.0], None),
    )
    .unwrap();

    let chart = ReportKind::ProvincialCosts.shape(&[df]).unwrap();
    match chart {
        ChartData::Heatmap { rows, cols, cells } => {
            // Differently-cased and padded spellings fold together
            assert_eq!(rows, vec!["Gauteng".to_string(), "Limpopo".to_string()]);
            assert_eq!(cols, vec!["Amoxil".to_string(), "Panado".to_string()]);
            assert_eq!(cells[0], vec![100.0, 40.0]);
            // (Limpopo, Panado) is absent from the source
            assert_eq!(cells[1], vec![25.0, 0.0]);
        }
        other => panic!("expected heatmap, got {:?}", other),
    }
}

#[test]
fn test_monthly_trends_sorts_points_by_month() {
    let mut df = DataFrame::new();
    df.add_column(
        "prescription_name".to_string(),
        string_column(&["Amoxil", "Amoxil", "Panado"]),
    )
    .unwrap();
    // Months arrive unsorted per product
    df.add_column(
        "month".to_string(),
        string_column(&[
            "2024-02-01 00:00:00",
            "2024-01-01 00:00:00",
            "2024-01-01 00:00:00",
        ]),
    )
    .unwrap();
    df.add_column(
        "monthly_total".to_string(),
        Series::new(vec![80.0, 50.0, 30.0], None),
    )
    .unwrap();

    let chart = ReportKind::MonthlyTrends.shape(&[df]).unwrap();
    match chart {
        ChartData::Lines { series } => {
            assert_eq!(series.len(), 2);
            assert_eq!(series[0].name, "Amoxil");
            assert!(series[0].dates.windows(2).all(|w| w[0] <= w[1]));
            // Values follow their months through the sort
            assert_eq!(series[0].values, vec![50.0, 80.0]);
            assert_eq!(series[1].name, "Panado");
        }
        other => panic!("expected lines, got {:?}", other),
    }
}

#[test]
fn test_top_prescriptions_are_horizontal_bars() {
    let mut df = DataFrame::new();
    df.add_column(
        "prescription_name".to_string(),
        string_column(&["Amoxil", "Panado"]),
    )
    .unwrap();
    df.add_column(
        "total_claim_amount".to_string(),
        Series::new(vec![900.0, 400.0], None),
    )
    .unwrap();

    let chart = ReportKind::TopPrescriptions.shape(&[df]).unwrap();
    match chart {
        ChartData::Bars { horizontal, .. } => assert!(horizontal),
        other => panic!("expected bars, got {:?}", other),
    }
}

#[test]
fn test_tariff_vs_claim_strips_names() {
    let mut df = DataFrame::new();
    df.add_column(
        "prescription_name".to_string(),
        string_column(&["  Amoxil  "]),
    )
    .unwrap();
    df.add_column(
        "average_tariff_price".to_string(),
        Series::new(vec![50.0], None),
    )
    .unwrap();
    df.add_column(
        "average_claim_amount".to_string(),
        Series::new(vec![65.0], None),
    )
    .unwrap();
    df.add_column(
        "average_difference".to_string(),
        Series::new(vec![15.0], None),
    )
    .unwrap();

    let chart = ReportKind::TariffVsClaim.shape(&[df]).unwrap();
    match chart {
        ChartData::Bars {
            categories, values, ..
        } => {
            assert_eq!(categories, vec!["Amoxil".to_string()]);
            assert_eq!(values, vec![15.0]);
        }
        other => panic!("expected bars, got {:?}", other),
    }
}

#[test]
fn test_visits_per_facility_merges_and_divides() {
    let mut facilities = DataFrame::new();
    facilities
        .add_column(
            "province_name".to_string(),
            string_column(&["Gauteng ", "limpopo"]),
        )
        .unwrap();
    facilities
        .add_column(
            "facility_count".to_string(),
            Series::new(vec![10i64, 4], None),
        )
        .unwrap();

    let mut visits = DataFrame::new();
    visits
        .add_column(
            "province_name".to_string(),
            string_column(&["gauteng", "Limpopo"]),
        )
        .unwrap();
    visits
        .add_column(
            "patient_visit_count".to_string(),
            Series::new(vec![50i64, 12], None),
        )
        .unwrap();

    let chart = ReportKind::VisitsPerFacility
        .shape(&[facilities, visits])
        .unwrap();
    match chart {
        ChartData::Bars {
            categories, values, ..
        } => {
            assert_eq!(categories, vec!["gauteng".to_string(), "limpopo".to_string()]);
            assert_eq!(values, vec![5.0, 3.0]);
        }
        other => panic!("expected bars, got {:?}", other),
    }
}

#[test]
fn test_shape_fails_on_missing_columns() {
    // An empty result set has no columns to shape
    let result = ReportKind::MedicationTypeCosts.shape(&[DataFrame::new()]);
    assert!(result.is_err());
}
