//! # tinysql
//!
//! A small fluent SQL builder for MySQL.
//!
//! ## Features
//!
//! - **Fluent chains**: accumulate tables, columns, joins, conditions, grouping,
//!   ordering and paging on a [`Builder`], then run one terminal operation
//! - **Always parameterized**: every value travels as a `?` placeholder
//! - **Quoted identifiers**: `u.name` becomes `` `u`.`name` ``, aliases are kept
//! - **Bracketed conditions**: `group_start()`/`group_end()` around `and_where`/`or_where`
//! - **Self-resetting**: every terminal operation leaves the builder empty
//! - **Typed rows**: map results with `FromRow`, insert structs with `InsertModel`
//! - **Statement logging**: each statement is emitted on the `tinysql.sql` tracing target
//!
//! ## Example
//!
//! ```ignore
//! use tinysql::prelude::*;
//!
//! #[derive(FromRow)]
//! struct Order {
//!     id: i64,
//!     total: f64,
//! }
//!
//! let conn = MySqlConnection::connect(&DatabaseConfig::from_env()?).await?;
//! let mut b = conn.builder();
//!
//! let orders: Vec<Order> = b
//!     .from("orders")
//!     .select("id, total")
//!     .and_where("status", "paid")
//!     .order_by("id desc")
//!     .limit(10, 0)
//!     .get()
//!     .await?;
//!
//! let affected = b
//!     .set("status", "shipped")
//!     .and_where_in("id", orders.iter().map(|o| o.id))
//!     .update("orders")
//!     .await?;
//! ```

pub mod builder;
pub mod client;
pub mod config;
pub mod error;
pub mod ident;
pub mod log;
pub mod model;
#[cfg(feature = "mysql")]
pub mod mysql;
pub mod prelude;
pub mod row;
pub mod value;

pub use builder::{Builder, Diagnostic, Statement, StatementKind};
pub use client::{Connection, ExecResult};
pub use config::DatabaseConfig;
pub use error::{OrmError, OrmResult};
pub use log::{LogLevel, SqlLog};
pub use model::InsertModel;
#[cfg(feature = "mysql")]
pub use mysql::MySqlConnection;
pub use row::{FromRow, Row, Rows};
pub use value::{FromValue, ToValue, Value};

#[cfg(feature = "derive")]
pub use tinysql_derive::{FromRow, InsertModel};
