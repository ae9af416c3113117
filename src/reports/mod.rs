//! The report library: every analysis this tool can run.
//!
//! A report is a fixed SQL text, a thin shaping step from the loaded
//! DataFrame to renderable [`ChartData`], and the chart's settings.
//! Aggregation happens in the database; shaping only renames, normalizes,
//! pivots, splits and sorts what the query returned.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::config::OutputSettings;
use crate::connectors::DataSource;
use crate::core::error::{Error, Result};
use crate::dataframe::{transform, DataFrame};
use crate::pivot::AggFunction;
use crate::vis::{self, ChartData, LineSeriesData, PlotKind, PlotSettings, ScatterGroup};

pub mod queries;

/// The analyses this tool can run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportKind {
    /// Total cost split into brand vs generic medication
    MedicationTypeCosts,
    /// Average cost vs volume per practitioner, colored by type
    PractitionerPerformance,
    /// Prescription counts by practitioner type and medication
    PrescribingHeatmap,
    /// Claim amount vs tariff price for the costliest products
    TariffVsClaim,
    /// Cost of the costliest products per province
    ProvincialCosts,
    /// Monthly cost trend for the costliest products
    MonthlyTrends,
    /// The ten costliest products overall
    TopPrescriptions,
    /// Member counts per province
    MembershipByProvince,
    /// Facility counts per province
    FacilitiesByProvince,
    /// Patient visit counts per province
    VisitsByProvince,
    /// Visits divided by facilities per province
    VisitsPerFacility,
}

impl ReportKind {
    /// Every report, in listing order
    pub fn all() -> &'static [ReportKind] {
        &[
            ReportKind::MedicationTypeCosts,
            ReportKind::PractitionerPerformance,
            ReportKind::PrescribingHeatmap,
            ReportKind::TariffVsClaim,
            ReportKind::ProvincialCosts,
            ReportKind::MonthlyTrends,
            ReportKind::TopPrescriptions,
            ReportKind::MembershipByProvince,
            ReportKind::FacilitiesByProvince,
            ReportKind::VisitsByProvince,
            ReportKind::VisitsPerFacility,
        ]
    }

    /// CLI name of the report
    pub fn name(&self) -> &'static str {
        match self {
            ReportKind::MedicationTypeCosts => "medication-type-costs",
            ReportKind::PractitionerPerformance => "practitioner-performance",
            ReportKind::PrescribingHeatmap => "prescribing-heatmap",
            ReportKind::TariffVsClaim => "tariff-vs-claim",
            ReportKind::ProvincialCosts => "provincial-costs",
            ReportKind::MonthlyTrends => "monthly-trends",
            ReportKind::TopPrescriptions => "top-prescriptions",
            ReportKind::MembershipByProvince => "membership-by-province",
            ReportKind::FacilitiesByProvince => "facilities-by-province",
            ReportKind::VisitsByProvince => "visits-by-province",
            ReportKind::VisitsPerFacility => "visits-per-facility",
        }
    }

    /// Chart title of the report
    pub fn title(&self) -> &'static str {
        match self {
            ReportKind::MedicationTypeCosts => "Total Cost by Medication Type",
            ReportKind::PractitionerPerformance => "Practitioner Performance Analysis",
            ReportKind::PrescribingHeatmap => {
                "Prescription Counts by Practitioner Type and Medication"
            }
            ReportKind::TariffVsClaim => "Average Difference Between Claim Amount and Tariff Price",
            ReportKind::ProvincialCosts => "Total Cost of Top Prescriptions by Province",
            ReportKind::MonthlyTrends => "Cost Trends Over Time for Top Prescriptions",
            ReportKind::TopPrescriptions => "Top 10 Costliest Prescriptions",
            ReportKind::MembershipByProvince => "Membership Counts by Province",
            ReportKind::FacilitiesByProvince => "Facility Counts by Province",
            ReportKind::VisitsByProvince => "Patient Visit Counts by Province",
            ReportKind::VisitsPerFacility => "Average Visits per Facility by Province",
        }
    }

    /// Chart kind the report draws
    pub fn plot_kind(&self) -> PlotKind {
        match self {
            ReportKind::MedicationTypeCosts
            | ReportKind::TariffVsClaim
            | ReportKind::MembershipByProvince
            | ReportKind::FacilitiesByProvince
            | ReportKind::VisitsByProvince
            | ReportKind::VisitsPerFacility => PlotKind::Bar,
            ReportKind::TopPrescriptions => PlotKind::HorizontalBar,
            ReportKind::PractitionerPerformance => PlotKind::Scatter,
            ReportKind::MonthlyTrends => PlotKind::Line,
            ReportKind::PrescribingHeatmap | ReportKind::ProvincialCosts => PlotKind::Heatmap,
        }
    }

    /// Resolve a report from its CLI name
    pub fn from_name(name: &str) -> Result<ReportKind> {
        ReportKind::all()
            .iter()
            .copied()
            .find(|kind| kind.name() == name)
            .ok_or_else(|| Error::UnknownReport(name.to_string()))
    }

    /// The SQL texts the report loads, in execution order
    pub fn queries(&self) -> Vec<&'static str> {
        match self {
            ReportKind::MedicationTypeCosts => vec![queries::MEDICATION_TYPE_COSTS],
            ReportKind::PractitionerPerformance => vec![queries::PRACTITIONER_PERFORMANCE],
            ReportKind::PrescribingHeatmap => {
                vec![queries::PRESCRIBING_BY_TYPE_AND_MEDICATION]
            }
            ReportKind::TariffVsClaim => vec![queries::TARIFF_VS_CLAIM],
            ReportKind::ProvincialCosts => vec![queries::PROVINCIAL_COSTS],
            ReportKind::MonthlyTrends => vec![queries::MONTHLY_TRENDS],
            ReportKind::TopPrescriptions => vec![queries::TOP_PRESCRIPTIONS],
            ReportKind::MembershipByProvince => vec![queries::MEMBERSHIP_BY_PROVINCE],
            ReportKind::FacilitiesByProvince => vec![queries::FACILITIES_BY_PROVINCE],
            ReportKind::VisitsByProvince => vec![queries::VISITS_BY_PROVINCE],
            ReportKind::VisitsPerFacility => {
                vec![queries::FACILITIES_BY_PROVINCE, queries::VISITS_BY_PROVINCE]
            }
        }
    }

    /// Chart settings of the report
    pub fn plot_settings(&self) -> PlotSettings {
        match self {
            ReportKind::MedicationTypeCosts => {
                PlotSettings::titled(self.title(), "Medication Type", "Total Cost")
            }
            ReportKind::PractitionerPerformance => PlotSettings::titled(
                self.title(),
                "Prescription Count",
                "Average Prescription Cost",
            ),
            ReportKind::PrescribingHeatmap => {
                PlotSettings::titled(self.title(), "Practitioner Type", "Medication Name")
            }
            ReportKind::TariffVsClaim => PlotSettings::titled(
                self.title(),
                "Prescription Name",
                "Average Difference (Claim Amount - Tariff Price)",
            ),
            ReportKind::ProvincialCosts => {
                PlotSettings::titled(self.title(), "Prescription Name", "Province")
            }
            ReportKind::MonthlyTrends => {
                PlotSettings::titled(self.title(), "Month", "Total Monthly Cost")
            }
            ReportKind::TopPrescriptions => {
                PlotSettings::titled(self.title(), "Total Claim Amount", "Prescription Name")
            }
            ReportKind::MembershipByProvince => {
                PlotSettings::titled(self.title(), "Province", "Number of Members")
            }
            ReportKind::FacilitiesByProvince => {
                PlotSettings::titled(self.title(), "Province", "Number of Facilities")
            }
            ReportKind::VisitsByProvince => {
                PlotSettings::titled(self.title(), "Province", "Number of Patient Visits")
            }
            ReportKind::VisitsPerFacility => {
                PlotSettings::titled(self.title(), "Province", "Visits per Facility")
            }
        }
    }

    /// Shape loaded frames into renderable chart data
    pub fn shape(&self, frames: &[DataFrame]) -> Result<ChartData> {
        let expected = self.queries().len();
        if frames.len() != expected {
            return Err(Error::InvalidOperation(format!(
                "Report '{}' expects {} result set(s), got {}",
                self.name(),
                expected,
                frames.len()
            )));
        }

        match self {
            ReportKind::MedicationTypeCosts => {
                shape_bars(&frames[0], "medication_type", "total_cost", false)
            }
            ReportKind::PractitionerPerformance => shape_practitioner_performance(&frames[0]),
            ReportKind::PrescribingHeatmap => shape_prescribing_heatmap(&frames[0]),
            ReportKind::TariffVsClaim => {
                let mut df = frames[0].clone();
                df.map_string_column("prescription_name", |s| s.str().strip())?;
                shape_bars(&df, "prescription_name", "average_difference", false)
            }
            ReportKind::ProvincialCosts => shape_provincial_costs(&frames[0]),
            ReportKind::MonthlyTrends => shape_monthly_trends(&frames[0]),
            ReportKind::TopPrescriptions => {
                shape_bars(&frames[0], "prescription_name", "total_claim_amount", true)
            }
            ReportKind::MembershipByProvince => {
                let mut df = frames[0].clone();
                df.map_string_column("province_name", |s| s.str().normalize())?;
                shape_bars(&df, "province_name", "member_count", false)
            }
            ReportKind::FacilitiesByProvince => {
                let mut df = frames[0].clone();
                df.map_string_column("province_name", |s| s.str().strip().str().lower())?;
                shape_bars(&df, "province_name", "facility_count", false)
            }
            ReportKind::VisitsByProvince => {
                let mut df = frames[0].clone();
                df.map_string_column("province_name", |s| s.str().strip().str().lower())?;
                shape_bars(&df, "province_name", "patient_visit_count", false)
            }
            ReportKind::VisitsPerFacility => shape_visits_per_facility(&frames[0], &frames[1]),
        }
    }
}

// One bar per row, category labels and values taken in row order, which
// is the query's ORDER BY.
fn shape_bars(
    df: &DataFrame,
    category_column: &str,
    value_column: &str,
    horizontal: bool,
) -> Result<ChartData> {
    Ok(ChartData::Bars {
        categories: df.get_column_string_values(category_column)?,
        values: df.get_column_numeric_values(value_column)?,
        horizontal,
    })
}

fn shape_practitioner_performance(df: &DataFrame) -> Result<ChartData> {
    let types = df.get_column_string_values("practitioner_type")?;
    let counts = df.get_column_numeric_values("prescription_count")?;
    let costs = df.get_column_numeric_values("average_prescription_cost")?;

    let mut index: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<ScatterGroup> = Vec::new();
    for ((t, &x), &y) in types.iter().zip(counts.iter()).zip(costs.iter()) {
        let idx = *index.entry(t.clone()).or_insert_with(|| {
            groups.push(ScatterGroup {
                name: t.clone(),
                xs: Vec::new(),
                ys: Vec::new(),
            });
            groups.len() - 1
        });
        groups[idx].xs.push(x);
        groups[idx].ys.push(y);
    }

    Ok(ChartData::Scatter { groups })
}

fn shape_prescribing_heatmap(df: &DataFrame) -> Result<ChartData> {
    // Focus on the ten most prescribed medications, as the full matrix is
    // unreadable.
    let top: Vec<String> = df
        .value_counts("medication_name")?
        .into_iter()
        .take(10)
        .map(|(name, _)| name)
        .collect();

    let filtered = df.filter_by_values("medication_name", &top)?;
    let pivot = filtered.pivot_table(
        "medication_name",
        "practitioner_type",
        "prescription_count",
        AggFunction::Sum,
    )?;

    pivot_to_heatmap(&pivot, "medication_name")
}

fn shape_provincial_costs(df: &DataFrame) -> Result<ChartData> {
    let mut df = df.clone();
    df.map_string_column("province_name", |s| s.str().normalize())?;
    df.map_string_column("prescription_name", |s| s.str().strip())?;

    let pivot = df.pivot_table(
        "province_name",
        "prescription_name",
        "total_cost",
        AggFunction::Sum,
    )?;

    pivot_to_heatmap(&pivot, "province_name")
}

fn shape_monthly_trends(df: &DataFrame) -> Result<ChartData> {
    let names = df.get_column_string_values("prescription_name")?;
    let months = df.get_column_datetime_values("month")?;
    let totals = df.get_column_numeric_values("monthly_total")?;

    let mut index: HashMap<String, usize> = HashMap::new();
    let mut grouped: Vec<(String, Vec<(chrono::NaiveDate, f64)>)> = Vec::new();
    for ((name, month), &total) in names.iter().zip(months.iter()).zip(totals.iter()) {
        let idx = *index.entry(name.clone()).or_insert_with(|| {
            grouped.push((name.clone(), Vec::new()));
            grouped.len() - 1
        });
        grouped[idx].1.push((month.date(), total));
    }

    let series = grouped
        .into_iter()
        .map(|(name, mut points)| {
            points.sort_by_key(|p| p.0);
            let (dates, values) = points.into_iter().unzip();
            LineSeriesData {
                name,
                dates,
                values,
            }
        })
        .collect();

    Ok(ChartData::Lines { series })
}

fn shape_visits_per_facility(facilities: &DataFrame, visits: &DataFrame) -> Result<ChartData> {
    let mut facilities = facilities.clone();
    let mut visits = visits.clone();
    facilities.map_string_column("province_name", |s| s.str().strip().str().lower())?;
    visits.map_string_column("province_name", |s| s.str().strip().str().lower())?;

    let combined = transform::merge_on(&facilities, &visits, "province_name")?;

    let provinces = combined.get_column_string_values("province_name")?;
    let facility_counts = combined.get_column_numeric_values("facility_count")?;
    let visit_counts = combined.get_column_numeric_values("patient_visit_count")?;

    let mut categories = Vec::with_capacity(provinces.len());
    let mut values = Vec::with_capacity(provinces.len());
    for ((province, &f_count), &v_count) in provinces
        .iter()
        .zip(facility_counts.iter())
        .zip(visit_counts.iter())
    {
        if f_count == 0.0 {
            continue;
        }
        categories.push(province.clone());
        values.push(v_count / f_count);
    }

    Ok(ChartData::Bars {
        categories,
        values,
        horizontal: false,
    })
}

fn pivot_to_heatmap(pivot: &DataFrame, index_column: &str) -> Result<ChartData> {
    let rows = pivot.get_column_string_values(index_column)?;
    let cols: Vec<String> = pivot
        .column_names()
        .into_iter()
        .filter(|name| name != index_column)
        .collect();

    let mut columns_data = Vec::with_capacity(cols.len());
    for col in &cols {
        columns_data.push(pivot.get_column_numeric_values(col)?);
    }

    let cells: Vec<Vec<f64>> = (0..rows.len())
        .map(|r| columns_data.iter().map(|column| column[r]).collect())
        .collect();

    Ok(ChartData::Heatmap { rows, cols, cells })
}

/// Load every result set the report needs.
pub async fn load_frames(kind: ReportKind, source: &DataSource) -> Result<Vec<DataFrame>> {
    let mut frames = Vec::new();
    for sql in kind.queries() {
        frames.push(source.read_sql(sql).await?);
    }
    Ok(frames)
}

/// Shape loaded frames and render the chart file.
pub fn render_frames(
    kind: ReportKind,
    frames: &[DataFrame],
    output: &OutputSettings,
) -> Result<PathBuf> {
    let chart = kind.shape(frames)?;

    let mut settings = kind.plot_settings();
    settings.width = output.width;
    settings.height = output.height;
    settings.output_type = output.output_type()?;

    std::fs::create_dir_all(&output.directory)?;
    let path = Path::new(&output.directory).join(format!(
        "{}.{}",
        kind.name(),
        settings.output_type.extension()
    ));
    vis::render(&chart, &settings, &path)?;
    Ok(path)
}
