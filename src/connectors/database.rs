//! # Database Connectors
//!
//! Direct database connectivity for loading query results into DataFrames.
//! Rows are decoded cell by cell into [`DataValue`]s, then whole columns
//! are narrowed to typed Series.

use std::collections::HashMap;
use std::time::Duration;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::sqlite::{SqlitePoolOptions, SqliteRow};
use sqlx::{Column, Row};

use crate::core::data_value::DataValue;
use crate::core::error::{Error, Result};
use crate::dataframe::DataFrame;
use crate::series::Series;

/// Database connection configuration
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Database connection string
    pub connection_string: String,
    /// Connection pool size
    pub pool_size: Option<u32>,
    /// Connection timeout in seconds
    pub timeout: Option<u64>,
    /// Additional connection parameters
    pub parameters: HashMap<String, String>,
}

impl DatabaseConfig {
    /// Create a new database configuration
    pub fn new(connection_string: impl Into<String>) -> Self {
        Self {
            connection_string: connection_string.into(),
            pool_size: Some(4),
            timeout: Some(30),
            parameters: HashMap::new(),
        }
    }

    /// Set connection pool size
    pub fn with_pool_size(mut self, size: u32) -> Self {
        self.pool_size = Some(size);
        self
    }

    /// Set connection timeout
    pub fn with_timeout(mut self, timeout: u64) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Add connection parameter
    pub fn with_parameter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.parameters.insert(key.into(), value.into());
        self
    }
}

/// Generic database connector trait
#[allow(async_fn_in_trait)]
pub trait DatabaseConnector: Send + Sync {
    /// Connect to the database
    async fn connect(&mut self, config: &DatabaseConfig) -> Result<()>;

    /// Execute a query and return a DataFrame
    async fn query(&self, sql: &str) -> Result<DataFrame>;

    /// Execute raw SQL (no result set), returning affected rows
    async fn execute(&self, sql: &str) -> Result<u64>;

    /// Close the connection
    async fn close(&mut self) -> Result<()>;
}

/// PostgreSQL connector implementation
#[derive(Default)]
pub struct PostgresConnector {
    pool: Option<sqlx::PgPool>,
}

impl PostgresConnector {
    /// Create a new PostgreSQL connector
    pub fn new() -> Self {
        Self { pool: None }
    }

    fn pool(&self) -> Result<&sqlx::PgPool> {
        self.pool
            .as_ref()
            .ok_or_else(|| Error::Connection("Not connected to database".to_string()))
    }
}

impl DatabaseConnector for PostgresConnector {
    async fn connect(&mut self, config: &DatabaseConfig) -> Result<()> {
        let pool = PgPoolOptions::new()
            .max_connections(config.pool_size.unwrap_or(4))
            .acquire_timeout(Duration::from_secs(config.timeout.unwrap_or(30)))
            .connect(&config.connection_string)
            .await
            .map_err(|e| Error::Connection(format!("PostgreSQL connection failed: {}", e)))?;

        self.pool = Some(pool);
        Ok(())
    }

    async fn query(&self, sql: &str) -> Result<DataFrame> {
        let rows = sqlx::query(sql)
            .fetch_all(self.pool()?)
            .await
            .map_err(|e| Error::Query(format!("Query execution failed: {}", e)))?;

        if rows.is_empty() {
            return Ok(DataFrame::new());
        }

        let column_names: Vec<String> = rows[0]
            .columns()
            .iter()
            .map(|col| col.name().to_string())
            .collect();

        let mut df = DataFrame::new();
        for (idx, column_name) in column_names.iter().enumerate() {
            let mut cells = Vec::with_capacity(rows.len());
            for row in &rows {
                cells.push(decode_pg_cell(row, idx, column_name)?);
            }
            attach_column(&mut df, column_name, cells)?;
        }

        Ok(df)
    }

    async fn execute(&self, sql: &str) -> Result<u64> {
        let result = sqlx::query(sql)
            .execute(self.pool()?)
            .await
            .map_err(|e| Error::Query(format!("SQL execution failed: {}", e)))?;
        Ok(result.rows_affected())
    }

    async fn close(&mut self) -> Result<()> {
        if let Some(pool) = self.pool.take() {
            pool.close().await;
        }
        Ok(())
    }
}

/// SQLite connector implementation
///
/// Used as the stub data source in tests; the decode path is shared in
/// shape with the PostgreSQL connector.
#[derive(Default)]
pub struct SqliteConnector {
    pool: Option<sqlx::SqlitePool>,
}

impl SqliteConnector {
    /// Create a new SQLite connector
    pub fn new() -> Self {
        Self { pool: None }
    }

    /// Create in-memory SQLite database
    ///
    /// The pool is pinned to one connection: every pooled connection of an
    /// in-memory SQLite database would otherwise see its own empty
    /// database.
    pub async fn in_memory() -> Result<Self> {
        let config = DatabaseConfig::new("sqlite::memory:").with_pool_size(1);
        let mut connector = Self::new();
        connector.connect(&config).await?;
        Ok(connector)
    }

    fn pool(&self) -> Result<&sqlx::SqlitePool> {
        self.pool
            .as_ref()
            .ok_or_else(|| Error::Connection("Not connected to database".to_string()))
    }
}

impl DatabaseConnector for SqliteConnector {
    async fn connect(&mut self, config: &DatabaseConfig) -> Result<()> {
        let pool = SqlitePoolOptions::new()
            .max_connections(config.pool_size.unwrap_or(4))
            .acquire_timeout(Duration::from_secs(config.timeout.unwrap_or(30)))
            .connect(&config.connection_string)
            .await
            .map_err(|e| Error::Connection(format!("SQLite connection failed: {}", e)))?;

        self.pool = Some(pool);
        Ok(())
    }

    async fn query(&self, sql: &str) -> Result<DataFrame> {
        let rows = sqlx::query(sql)
            .fetch_all(self.pool()?)
            .await
            .map_err(|e| Error::Query(format!("Query execution failed: {}", e)))?;

        if rows.is_empty() {
            return Ok(DataFrame::new());
        }

        let column_names: Vec<String> = rows[0]
            .columns()
            .iter()
            .map(|col| col.name().to_string())
            .collect();

        let mut df = DataFrame::new();
        for (idx, column_name) in column_names.iter().enumerate() {
            let mut cells = Vec::with_capacity(rows.len());
            for row in &rows {
                cells.push(decode_sqlite_cell(row, idx, column_name)?);
            }
            attach_column(&mut df, column_name, cells)?;
        }

        Ok(df)
    }

    async fn execute(&self, sql: &str) -> Result<u64> {
        let result = sqlx::query(sql)
            .execute(self.pool()?)
            .await
            .map_err(|e| Error::Query(format!("SQL execution failed: {}", e)))?;
        Ok(result.rows_affected())
    }

    async fn close(&mut self) -> Result<()> {
        if let Some(pool) = self.pool.take() {
            pool.close().await;
        }
        Ok(())
    }
}

// Decode one PostgreSQL cell, trying concrete wire types widest-first.
// A successful try_get with a None payload is SQL NULL.
fn decode_pg_cell(row: &PgRow, idx: usize, name: &str) -> Result<DataValue> {
    if let Ok(v) = row.try_get::<Option<i64>, _>(idx) {
        return Ok(v.map(DataValue::Int).unwrap_or(DataValue::Null));
    }
    if let Ok(v) = row.try_get::<Option<i32>, _>(idx) {
        return Ok(v.map(|x| DataValue::Int(x as i64)).unwrap_or(DataValue::Null));
    }
    if let Ok(v) = row.try_get::<Option<i16>, _>(idx) {
        return Ok(v.map(|x| DataValue::Int(x as i64)).unwrap_or(DataValue::Null));
    }
    if let Ok(v) = row.try_get::<Option<f64>, _>(idx) {
        return Ok(v.map(DataValue::Float).unwrap_or(DataValue::Null));
    }
    if let Ok(v) = row.try_get::<Option<f32>, _>(idx) {
        return Ok(v
            .map(|x| DataValue::Float(x as f64))
            .unwrap_or(DataValue::Null));
    }
    if let Ok(v) = row.try_get::<Option<bool>, _>(idx) {
        return Ok(v.map(DataValue::Bool).unwrap_or(DataValue::Null));
    }
    if let Ok(v) = row.try_get::<Option<NaiveDateTime>, _>(idx) {
        return Ok(v.map(DataValue::DateTime).unwrap_or(DataValue::Null));
    }
    if let Ok(v) = row.try_get::<Option<DateTime<Utc>>, _>(idx) {
        return Ok(v
            .map(|x| DataValue::DateTime(x.naive_utc()))
            .unwrap_or(DataValue::Null));
    }
    if let Ok(v) = row.try_get::<Option<NaiveDate>, _>(idx) {
        return Ok(match v.and_then(|d| d.and_hms_opt(0, 0, 0)) {
            Some(dt) => DataValue::DateTime(dt),
            None => DataValue::Null,
        });
    }
    if let Ok(v) = row.try_get::<Option<String>, _>(idx) {
        return Ok(v.map(DataValue::Str).unwrap_or(DataValue::Null));
    }

    Err(Error::Type(format!(
        "Column '{}' has an unsupported database type",
        name
    )))
}

fn decode_sqlite_cell(row: &SqliteRow, idx: usize, name: &str) -> Result<DataValue> {
    if let Ok(v) = row.try_get::<Option<i64>, _>(idx) {
        return Ok(v.map(DataValue::Int).unwrap_or(DataValue::Null));
    }
    if let Ok(v) = row.try_get::<Option<f64>, _>(idx) {
        return Ok(v.map(DataValue::Float).unwrap_or(DataValue::Null));
    }
    if let Ok(v) = row.try_get::<Option<bool>, _>(idx) {
        return Ok(v.map(DataValue::Bool).unwrap_or(DataValue::Null));
    }
    if let Ok(v) = row.try_get::<Option<NaiveDateTime>, _>(idx) {
        return Ok(v.map(DataValue::DateTime).unwrap_or(DataValue::Null));
    }
    if let Ok(v) = row.try_get::<Option<String>, _>(idx) {
        return Ok(v.map(DataValue::Str).unwrap_or(DataValue::Null));
    }

    Err(Error::Type(format!(
        "Column '{}' has an unsupported database type",
        name
    )))
}

// Narrow one decoded column to a typed Series and attach it.
//
// All-integer columns stay integer, numeric columns become f64, pure
// datetime columns stay datetimes; anything mixed or containing NULL is
// carried as text (NULL renders as "null").
fn attach_column(df: &mut DataFrame, name: &str, cells: Vec<DataValue>) -> Result<()> {
    let has_null = cells.iter().any(|c| c.is_null());
    let all_int = !has_null && cells.iter().all(|c| matches!(c, DataValue::Int(_)));
    let all_numeric = !has_null
        && cells
            .iter()
            .all(|c| matches!(c, DataValue::Int(_) | DataValue::Float(_)));
    let all_datetime = !has_null && cells.iter().all(|c| matches!(c, DataValue::DateTime(_)));

    if all_int {
        let values: Vec<i64> = cells
            .iter()
            .map(|c| match c {
                DataValue::Int(v) => *v,
                _ => 0,
            })
            .collect();
        return df.add_column(name.to_string(), Series::new(values, Some(name.to_string())));
    }

    if all_numeric {
        let mut values = Vec::with_capacity(cells.len());
        for c in &cells {
            values.push(c.as_f64().ok_or_else(|| {
                Error::Type(format!("Non-numeric cell in numeric column '{}'", name))
            })?);
        }
        return df.add_column(name.to_string(), Series::new(values, Some(name.to_string())));
    }

    if all_datetime {
        let values: Vec<NaiveDateTime> = cells
            .iter()
            .filter_map(|c| match c {
                DataValue::DateTime(v) => Some(*v),
                _ => None,
            })
            .collect();
        return df.add_column(name.to_string(), Series::new(values, Some(name.to_string())));
    }

    let values: Vec<String> = cells.iter().map(|c| c.to_string()).collect();
    df.add_column(name.to_string(), Series::new(values, Some(name.to_string())))
}
