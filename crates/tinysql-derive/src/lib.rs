//! Derive macros for tinysql
//!
//! Provides `#[derive(FromRow)]` and `#[derive(InsertModel)]`.

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

mod attrs;
mod from_row;
mod insert_model;

/// Derive `FromRow` trait for a struct.
///
/// # Example
///
/// ```ignore
/// use tinysql::FromRow;
///
/// #[derive(FromRow)]
/// struct User {
///     id: i64,
///     username: String,
///     #[orm(column = "email_address")]
///     email: Option<String>,
/// }
/// ```
///
/// # Attributes
///
/// - `#[orm(column = "name")]` - Map field to a different column name
/// - `#[orm(skip)]` - Fill the field with `Default::default()`
/// - `#[orm(flatten)]` - Build the field from the same row via its own `FromRow`
#[proc_macro_derive(FromRow, attributes(orm))]
pub fn derive_from_row(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    from_row::expand(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}

/// Derive `InsertModel` for a struct.
///
/// # Example
///
/// ```ignore
/// use tinysql::InsertModel;
///
/// #[derive(InsertModel)]
/// #[orm(table = "users")]
/// struct NewUser {
///     username: String,
///     #[orm(column = "email_address")]
///     email: Option<String>,
/// }
/// ```
///
/// # Attributes
///
/// - `#[orm(table = "name")]` - Table name (defaults to the snake_case struct name)
/// - `#[orm(column = "name")]` - Map field to a different column name
/// - `#[orm(skip)]` - Leave the field out of the insert
/// - `#[orm(flatten)]` - Inline the columns of a nested `InsertModel`
#[proc_macro_derive(InsertModel, attributes(orm))]
pub fn derive_insert_model(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    insert_model::expand(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}
