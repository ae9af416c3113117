//! DateTime accessor for Series containing datetime data.
//!
//! Provides pandas-like datetime operations through the `.dt()` accessor,
//! plus parsing of the text shapes PostgreSQL clients commonly produce
//! for `DATE_TRUNC` output.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};

use crate::core::error::{Error, Result};
use crate::series::Series;

/// Parse a single timestamp/date string.
///
/// Accepted shapes: `%Y-%m-%d %H:%M:%S`, optionally with fractional
/// seconds or a trailing offset, RFC 3339, and bare `%Y-%m-%d`.
pub fn parse_datetime(s: &str) -> Result<NaiveDateTime> {
    let s = s.trim();

    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
        return Ok(dt);
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f") {
        return Ok(dt);
    }
    if let Ok(dt) = DateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%#z") {
        return Ok(dt.naive_utc());
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.naive_utc());
    }
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        if let Some(dt) = d.and_hms_opt(0, 0, 0) {
            return Ok(dt);
        }
    }

    Err(Error::InvalidValue(format!(
        "Cannot parse '{}' as a datetime",
        s
    )))
}

/// Parse a string Series into a datetime Series.
pub fn to_datetime(series: &Series<String>) -> Result<Series<NaiveDateTime>> {
    let mut parsed = Vec::with_capacity(series.len());
    for value in series.values() {
        parsed.push(parse_datetime(value)?);
    }
    Ok(Series::new(parsed, series.name().cloned()))
}

/// DateTime accessor for `Series<NaiveDateTime>`
#[derive(Clone)]
pub struct DateTimeAccessor<'a> {
    series: &'a Series<NaiveDateTime>,
}

impl<'a> DateTimeAccessor<'a> {
    /// Create a new DateTimeAccessor
    pub fn new(series: &'a Series<NaiveDateTime>) -> Self {
        DateTimeAccessor { series }
    }

    /// Extract year from datetime
    pub fn year(&self) -> Series<i32> {
        let years: Vec<i32> = self.series.values().iter().map(|dt| dt.year()).collect();
        Series::new(years, self.series.name().cloned())
    }

    /// Extract month from datetime
    pub fn month(&self) -> Series<u32> {
        let months: Vec<u32> = self.series.values().iter().map(|dt| dt.month()).collect();
        Series::new(months, self.series.name().cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_timestamp_shapes() {
        assert_eq!(
            parse_datetime("2024-03-01 00:00:00").unwrap().to_string(),
            "2024-03-01 00:00:00"
        );
        assert!(parse_datetime("2024-03-01 00:00:00.000").is_ok());
        assert!(parse_datetime("2024-03-01T00:00:00+00:00").is_ok());
        assert!(parse_datetime("2024-03-01").is_ok());
        assert!(parse_datetime("first of march").is_err());
    }

    #[test]
    fn test_accessor_fields() {
        let series = to_datetime(&Series::new(
            vec!["2024-03-01 00:00:00".to_string()],
            Some("month".to_string()),
        ))
        .unwrap();
        assert_eq!(series.dt().year().values(), &[2024]);
        assert_eq!(series.dt().month().values(), &[3]);
    }
}
