//! Struct-to-columns capability used by inserts.

use crate::value::Value;

/// A record that can describe itself as `column -> value` pairs.
///
/// Derive it with `#[derive(InsertModel)]`:
///
/// ```ignore
/// use tinysql::InsertModel;
///
/// #[derive(InsertModel)]
/// #[orm(table = "users")]
/// struct NewUser {
///     name: String,
///     #[orm(column = "email_address")]
///     email: Option<String>,
///     #[orm(skip)]
///     password_confirmation: String,
///     #[orm(flatten)]
///     audit: Audit,
/// }
/// ```
///
/// - the table defaults to the snake_case struct name
/// - `#[orm(column = "...")]` overrides the column name
/// - `#[orm(skip)]` leaves the field out
/// - `#[orm(flatten)]` inlines the columns of an embedded `InsertModel`
pub trait InsertModel {
    /// Table the record is inserted into.
    fn table_name() -> &'static str
    where
        Self: Sized;

    /// Columns in field declaration order.
    fn columns(&self) -> Vec<(&'static str, Value)>;
}
