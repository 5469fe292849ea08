//! Convenient imports for typical `tinysql` usage.
//!
//! ```ignore
//! use tinysql::prelude::*;
//! ```

pub use crate::{
    Builder, Connection, DatabaseConfig, FromRow, InsertModel, OrmError, OrmResult, Row, Rows,
    Value,
};

#[cfg(feature = "mysql")]
pub use crate::MySqlConnection;
