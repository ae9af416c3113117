//! # Data Connectors
//!
//! Connectivity to the relational stores rxlens can read from. The
//! connection string scheme picks the driver; [`DataSource::read_sql`] is
//! the one-call load path used by the report runner.

pub mod database;

// Re-export commonly used types
pub use database::{DatabaseConfig, DatabaseConnector, PostgresConnector, SqliteConnector};

use crate::core::error::{Error, Result};
use crate::dataframe::DataFrame;

/// Driver-dispatched database connector
pub enum DataConnector {
    Postgres(database::PostgresConnector),
    Sqlite(database::SqliteConnector),
}

impl DataConnector {
    /// Create PostgreSQL connector
    pub fn postgres() -> Self {
        Self::Postgres(database::PostgresConnector::new())
    }

    /// Create SQLite connector
    pub fn sqlite() -> Self {
        Self::Sqlite(database::SqliteConnector::new())
    }

    /// Create connector from connection string
    pub fn from_connection_string(connection_string: &str) -> Result<Self> {
        if connection_string.starts_with("postgresql://")
            || connection_string.starts_with("postgres://")
        {
            Ok(Self::postgres())
        } else if connection_string.starts_with("sqlite:") {
            Ok(Self::sqlite())
        } else {
            Err(Error::Connection(format!(
                "Unsupported connection string: {}",
                connection_string
            )))
        }
    }

    async fn connect(&mut self, config: &DatabaseConfig) -> Result<()> {
        match self {
            Self::Postgres(db) => db.connect(config).await,
            Self::Sqlite(db) => db.connect(config).await,
        }
    }
}

/// A connected data source ready to serve queries
pub struct DataSource {
    connector: DataConnector,
}

impl DataSource {
    /// Resolve the driver from the configured connection string and
    /// connect to it.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        let mut connector = DataConnector::from_connection_string(&config.connection_string)?;
        connector.connect(config).await?;
        Ok(Self { connector })
    }

    /// Read a DataFrame from a SQL query
    pub async fn read_sql(&self, query: &str) -> Result<DataFrame> {
        match &self.connector {
            DataConnector::Postgres(db) => db.query(query).await,
            DataConnector::Sqlite(db) => db.query(query).await,
        }
    }

    /// Execute raw SQL with no result set
    pub async fn execute(&self, sql: &str) -> Result<u64> {
        match &self.connector {
            DataConnector::Postgres(db) => db.execute(sql).await,
            DataConnector::Sqlite(db) => db.execute(sql).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connector_from_connection_string() {
        assert!(matches!(
            DataConnector::from_connection_string("postgres://localhost/db"),
            Ok(DataConnector::Postgres(_))
        ));
        assert!(matches!(
            DataConnector::from_connection_string("postgresql://localhost/db"),
            Ok(DataConnector::Postgres(_))
        ));
        assert!(matches!(
            DataConnector::from_connection_string("sqlite::memory:"),
            Ok(DataConnector::Sqlite(_))
        ));
        assert!(DataConnector::from_connection_string("mysql://localhost/db").is_err());
    }
}
