//! rxlens - prescription claims analytics
//!
//! Runs fixed aggregate SQL against a claims database, loads the result
//! into an in-memory DataFrame, applies thin reshaping (renaming, string
//! normalization, pivoting, datetime parsing, keyed merging) and renders
//! descriptive charts to PNG or SVG files.
//!
//! The pipeline is linear and runs once per invocation:
//! connect -> query -> load -> shape -> plot.

// Core module with the error type and dynamic cell values
pub mod core;

// Data structures
pub mod dataframe;
pub mod series;

// Reshaping
pub mod pivot;

// Database connectivity
pub mod connectors;

// Configuration
pub mod config;

// Chart rendering
pub mod vis;

// The report library
pub mod reports;

// Re-export core types
pub use crate::core::data_value::DataValue;
pub use crate::core::error::{Error, Result};

pub use crate::config::RxlensConfig;
pub use crate::connectors::{DataSource, DatabaseConfig};
pub use crate::dataframe::DataFrame;
pub use crate::pivot::{AggFunction, PivotTable};
pub use crate::reports::ReportKind;
pub use crate::series::Series;
pub use crate::vis::{ChartData, OutputType, PlotKind, PlotSettings};

// Export version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
