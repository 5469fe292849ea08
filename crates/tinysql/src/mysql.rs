//! MySQL [`Connection`] backed by an `sqlx` pool.
//!
//! Outside a transaction every statement runs on whichever pooled connection
//! `sqlx` hands out. `begin()` checks one connection out and binds it; all
//! statements then run on it until `commit()`/`rollback()`. Dropping the
//! connection with a transaction still bound rolls it back.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use sqlx::mysql::{MySqlArguments, MySqlPoolOptions, MySqlRow};
use sqlx::query::Query;
use sqlx::{Column, MySql, MySqlPool, Row as SqlxRow, Transaction, ValueRef};
use tokio::sync::Mutex;

use crate::client::{Connection, ExecResult};
use crate::config::DatabaseConfig;
use crate::error::{OrmError, OrmResult};
use crate::log::SqlLog;
use crate::row::{Row, Rows};
use crate::value::Value;

pub struct MySqlConnection {
    pool: MySqlPool,
    tx: Mutex<Option<Transaction<'static, MySql>>>,
    active: AtomicBool,
    log: SqlLog,
}

impl MySqlConnection {
    /// Open a pool using `config`.
    pub async fn connect(config: &DatabaseConfig) -> OrmResult<Self> {
        let pool = MySqlPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
            .connect(&config.url)
            .await
            .map_err(|e| OrmError::Connection(e.to_string()))?;
        tracing::debug!(
            target: "tinysql.builder",
            max_connections = config.max_connections,
            "mysql pool ready"
        );
        Ok(Self::from_pool(pool, config.sql_log.clone()))
    }

    /// Wrap an existing pool.
    pub fn from_pool(pool: MySqlPool, log: SqlLog) -> Self {
        Self {
            pool,
            tx: Mutex::new(None),
            active: AtomicBool::new(false),
            log,
        }
    }

    pub fn pool(&self) -> &MySqlPool {
        &self.pool
    }
}

impl Connection for MySqlConnection {
    async fn execute(&self, sql: &str, params: &[Value]) -> OrmResult<ExecResult> {
        let mut guard = self.tx.lock().await;
        let result = if let Some(tx) = guard.as_mut() {
            bind_all(sqlx::query(sql), params)
                .execute(&mut **tx)
                .await
        } else {
            drop(guard);
            bind_all(sqlx::query(sql), params)
                .execute(&self.pool)
                .await
        }
        .map_err(OrmError::from_db_error)?;

        Ok(ExecResult {
            rows_affected: result.rows_affected(),
            last_insert_id: result.last_insert_id(),
        })
    }

    async fn query(&self, sql: &str, params: &[Value]) -> OrmResult<Rows> {
        let mut guard = self.tx.lock().await;
        let rows = if let Some(tx) = guard.as_mut() {
            bind_all(sqlx::query(sql), params)
                .fetch_all(&mut **tx)
                .await
        } else {
            drop(guard);
            bind_all(sqlx::query(sql), params)
                .fetch_all(&self.pool)
                .await
        }
        .map_err(OrmError::from_db_error)?;

        rows.iter()
            .map(convert_row)
            .collect::<OrmResult<Vec<_>>>()
            .map(Rows::new)
    }

    async fn begin(&self) -> OrmResult<()> {
        let mut guard = self.tx.lock().await;
        if guard.is_some() {
            return Err(OrmError::TransactionActive);
        }
        let tx = self.pool.begin().await.map_err(OrmError::from_db_error)?;
        *guard = Some(tx);
        self.active.store(true, Ordering::Release);
        tracing::debug!(target: "tinysql.sql", "begin");
        Ok(())
    }

    async fn commit(&self) -> OrmResult<()> {
        let tx = self.take_tx().await?;
        tracing::debug!(target: "tinysql.sql", "commit");
        tx.commit().await.map_err(OrmError::from_db_error)
    }

    async fn rollback(&self) -> OrmResult<()> {
        let tx = self.take_tx().await?;
        tracing::debug!(target: "tinysql.sql", "rollback");
        tx.rollback().await.map_err(OrmError::from_db_error)
    }

    fn in_transaction(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    fn sql_log(&self) -> SqlLog {
        self.log.clone()
    }
}

impl MySqlConnection {
    /// Unbind the current transaction; the connection is back in autocommit
    /// whatever the outcome of the following commit/rollback.
    async fn take_tx(&self) -> OrmResult<Transaction<'static, MySql>> {
        let tx = self
            .tx
            .lock()
            .await
            .take()
            .ok_or(OrmError::NoActiveTransaction)?;
        self.active.store(false, Ordering::Release);
        Ok(tx)
    }
}

fn bind_all<'q>(
    mut query: Query<'q, MySql, MySqlArguments>,
    params: &'q [Value],
) -> Query<'q, MySql, MySqlArguments> {
    for param in params {
        query = bind_value(query, param);
    }
    query
}

fn bind_value<'q>(
    query: Query<'q, MySql, MySqlArguments>,
    value: &'q Value,
) -> Query<'q, MySql, MySqlArguments> {
    match value {
        Value::Null => query.bind(None::<i32>),
        Value::Bool(b) => query.bind(*b),
        Value::Int(i) => query.bind(*i),
        Value::UInt(u) => query.bind(*u),
        Value::Float(f) => query.bind(*f),
        Value::Text(s) => query.bind(s.as_str()),
        Value::Bytes(b) => query.bind(b.as_slice()),
        Value::DateTime(dt) => query.bind(*dt),
    }
}

fn convert_row(mysql_row: &MySqlRow) -> OrmResult<Row> {
    let columns = mysql_row.columns();
    let mut names = Vec::with_capacity(columns.len());
    let mut values = Vec::with_capacity(columns.len());

    for column in columns {
        let i = column.ordinal();
        names.push(column.name().to_string());

        let raw = mysql_row
            .try_get_raw(i)
            .map_err(|e| OrmError::decode(column.name(), e.to_string()))?;
        if raw.is_null() {
            values.push(Value::Null);
            continue;
        }

        // TINYINT(1) decodes as an integer; `bool: FromValue` accepts 0/1.
        let value = if let Ok(v) = mysql_row.try_get::<i64, _>(i) {
            Value::Int(v)
        } else if let Ok(v) = mysql_row.try_get::<u64, _>(i) {
            Value::UInt(v)
        } else if let Ok(v) = mysql_row.try_get::<bool, _>(i) {
            Value::Bool(v)
        } else if let Ok(v) = mysql_row.try_get::<f64, _>(i) {
            Value::Float(v)
        } else if let Ok(v) = mysql_row.try_get::<chrono::NaiveDateTime, _>(i) {
            Value::DateTime(v)
        } else if let Ok(v) = mysql_row.try_get::<String, _>(i) {
            Value::Text(v)
        } else if let Ok(v) = mysql_row.try_get::<Vec<u8>, _>(i) {
            // Binary-collated text columns come back as blobs.
            match String::from_utf8(v) {
                Ok(s) => Value::Text(s),
                Err(e) => Value::Bytes(e.into_bytes()),
            }
        } else {
            // DECIMAL, DATE, TIME and friends travel as text on the wire.
            mysql_row
                .try_get_unchecked::<String, _>(i)
                .map(Value::Text)
                .map_err(|e| OrmError::decode(column.name(), e.to_string()))?
        };
        values.push(value);
    }

    Ok(Row::new(names, values))
}
