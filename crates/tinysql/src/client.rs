//! The execution capability a [`Builder`] is bound to.

use crate::builder::Builder;
use crate::error::OrmResult;
use crate::log::SqlLog;
use crate::row::Rows;
use crate::value::Value;

/// Outcome of a non-query statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ExecResult {
    pub rows_affected: u64,
    pub last_insert_id: u64,
}

/// A connection (or session) that can run parameterized SQL.
///
/// Transaction state is a two-state toggle owned by the implementation:
/// autocommit, or bound to exactly one open transaction. Nesting is not supported.
pub trait Connection: Send + Sync {
    /// Execute a statement and report affected rows / last insert id.
    fn execute(
        &self,
        sql: &str,
        params: &[Value],
    ) -> impl std::future::Future<Output = OrmResult<ExecResult>> + Send;

    /// Execute a query and return all rows.
    fn query(
        &self,
        sql: &str,
        params: &[Value],
    ) -> impl std::future::Future<Output = OrmResult<Rows>> + Send;

    /// Bind subsequent statements to a new transaction.
    ///
    /// Returns [`OrmError::TransactionActive`](crate::OrmError::TransactionActive)
    /// if one is already bound.
    fn begin(&self) -> impl std::future::Future<Output = OrmResult<()>> + Send;

    /// Commit the bound transaction and return to autocommit.
    ///
    /// Returns [`OrmError::NoActiveTransaction`](crate::OrmError::NoActiveTransaction)
    /// if none is bound.
    fn commit(&self) -> impl std::future::Future<Output = OrmResult<()>> + Send;

    /// Roll back the bound transaction and return to autocommit.
    fn rollback(&self) -> impl std::future::Future<Output = OrmResult<()>> + Send;

    /// Whether a transaction is currently bound.
    fn in_transaction(&self) -> bool;

    /// Logging settings for statements built against this connection.
    fn sql_log(&self) -> SqlLog {
        SqlLog::default()
    }

    /// Create an empty builder bound to this connection.
    fn builder(&self) -> Builder<'_, Self>
    where
        Self: Sized,
    {
        Builder::new(self)
    }
}
