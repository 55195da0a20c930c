//! Database execution engine for hrchat.
//!
//! [`Store`] owns the SQLite connection pool. Every statement borrows one
//! pooled connection for its own duration and hands it back when the call
//! returns, whichever way it returns.

use crate::error::{ChatError, ChatResult};
use crate::model::{Department, Employee, ParsedQuery, Row};

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::{Column, Row as _, TypeInfo, ValueRef};
use std::str::FromStr;

/// Handle to the employee database.
#[derive(Clone)]
pub struct Store {
    pool: SqlitePool,
}

impl Store {
    /// Connect to a SQLite database using a connection URL.
    ///
    /// Supported URL formats:
    /// - `sqlite://path/to/hrchat.db` (created if missing)
    /// - `sqlite::memory:`
    ///
    /// An in-memory database lives only as long as its connection, so it is
    /// opened with a single connection that is never recycled.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let store = Store::connect("sqlite::memory:").await?;
    /// ```
    pub async fn connect(url: &str) -> ChatResult<Self> {
        if !url.starts_with("sqlite:") {
            return Err(ChatError::Config(format!(
                "Unsupported database URL '{}': expected sqlite://<path> or sqlite::memory:",
                url
            )));
        }

        let options = SqliteConnectOptions::from_str(url)
            .map_err(|e| ChatError::Config(format!("Invalid database URL '{}': {}", url, e)))?
            .create_if_missing(true);

        let pool_options = if url.contains(":memory:") {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(5)
        };

        let pool = pool_options
            .connect_with(options)
            .await
            .map_err(|e| ChatError::Connection(e.to_string()))?;

        Ok(Self { pool })
    }

    /// Get a reference to the underlying connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Run the statement for a recognized question and return its raw rows.
    ///
    /// Parameters are bound positionally, never spliced into the SQL text.
    pub async fn execute(&self, query: &ParsedQuery) -> ChatResult<Vec<Row>> {
        let sql = query.sql();
        tracing::debug!("Executing: {} {:?}", sql, query.params);

        let mut conn = self
            .pool
            .acquire()
            .await
            .map_err(|e| ChatError::Execution(e.to_string()))?;

        let mut statement = sqlx::query(sql);
        for param in &query.params {
            statement = statement.bind(param.as_str());
        }

        let rows: Vec<SqliteRow> = statement
            .fetch_all(&mut *conn)
            .await
            .map_err(|e| ChatError::Execution(e.to_string()))?;

        rows.iter().map(row_to_map).collect()
    }

    /// Read back every employee.
    pub async fn employees(&self) -> ChatResult<Vec<Employee>> {
        sqlx::query_as::<_, Employee>(
            "SELECT ID, Name, Department, Salary, Hire_Date FROM Employees ORDER BY ID",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| ChatError::Execution(e.to_string()))
    }

    /// Read back every department.
    pub async fn departments(&self) -> ChatResult<Vec<Department>> {
        sqlx::query_as::<_, Department>("SELECT ID, Name, Manager FROM Departments ORDER BY ID")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| ChatError::Execution(e.to_string()))
    }

    /// Close the pool, waiting for checked-out connections to come back.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

/// Convert a SqliteRow to an ordered column map.
///
/// SQLite types values per cell, so the decision is made on the value's
/// runtime type rather than the declared column type. BLOBs are rendered as
/// (lossy) UTF-8 text. A cell that cannot be decoded fails the whole row.
fn row_to_map(row: &SqliteRow) -> ChatResult<Row> {
    let mut map = Row::new();

    for (i, column) in row.columns().iter().enumerate() {
        let name = column.name();

        let raw = row.try_get_raw(i).map_err(|e| decode_error(name, e))?;
        if raw.is_null() {
            map.insert(name.to_string(), serde_json::Value::Null);
            continue;
        }
        let type_name = raw.type_info().name().to_ascii_uppercase();

        let value: serde_json::Value = match type_name.as_str() {
            "INTEGER" => row
                .try_get::<i64, _>(i)
                .map(|v| serde_json::Value::Number(v.into()))
                .map_err(|e| decode_error(name, e))?,
            "REAL" => {
                let v = row.try_get::<f64, _>(i).map_err(|e| decode_error(name, e))?;
                serde_json::Number::from_f64(v)
                    .map(serde_json::Value::Number)
                    .ok_or_else(|| {
                        ChatError::Execution(format!("column '{}' holds non-finite {}", name, v))
                    })?
            }
            "BLOB" => row
                .try_get::<Vec<u8>, _>(i)
                .map(|bytes| {
                    serde_json::Value::String(String::from_utf8_lossy(&bytes).into_owned())
                })
                .map_err(|e| decode_error(name, e))?,
            _ => row
                .try_get::<String, _>(i)
                .map(serde_json::Value::String)
                .map_err(|e| decode_error(name, e))?,
        };

        map.insert(name.to_string(), value);
    }

    Ok(map)
}

fn decode_error(column: &str, e: sqlx::Error) -> ChatError {
    tracing::error!("Failed to decode column '{}': {}", column, e);
    ChatError::Execution(format!("failed to decode column '{}': {}", column, e))
}
