//! Row mapping traits and utilities

use crate::error::{OrmError, OrmResult};
use crate::value::{FromValue, Value};

/// A decoded result row: column names with their values, in select-list order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Row {
    columns: Vec<String>,
    values: Vec<Value>,
}

impl Row {
    pub fn new(columns: Vec<String>, values: Vec<Value>) -> Self {
        debug_assert_eq!(columns.len(), values.len());
        Self { columns, values }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Value of the first column named `column`.
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.columns
            .iter()
            .position(|c| c == column)
            .map(|i| &self.values[i])
    }

    pub fn get_index(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }

    /// Decode a column by name.
    pub fn try_get<T: FromValue>(&self, column: &str) -> OrmResult<T> {
        let value = self
            .get(column)
            .ok_or_else(|| OrmError::decode(column, "column not found"))?;
        T::from_value(value).map_err(|message| OrmError::decode(column, message))
    }

    /// Decode a column by position.
    pub fn try_get_index<T: FromValue>(&self, index: usize) -> OrmResult<T> {
        let value = self
            .get_index(index)
            .ok_or_else(|| OrmError::decode(index.to_string(), "column index out of range"))?;
        T::from_value(value).map_err(|message| OrmError::decode(index.to_string(), message))
    }
}

/// Trait for types that can be constructed from a [`Row`].
///
/// Derive it with `#[derive(FromRow)]`; fields map to columns by name, with
/// `#[orm(column = "...")]` as an override.
pub trait FromRow: Sized {
    fn from_row(row: &Row) -> OrmResult<Self>;
}

impl FromRow for Row {
    fn from_row(row: &Row) -> OrmResult<Self> {
        Ok(row.clone())
    }
}

/// The row cursor returned by a query, in backend order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Rows {
    rows: Vec<Row>,
}

impl Rows {
    pub fn new(rows: Vec<Row>) -> Self {
        Self { rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Row> {
        self.rows.iter()
    }

    pub fn first(&self) -> Option<&Row> {
        self.rows.first()
    }

    pub fn into_vec(self) -> Vec<Row> {
        self.rows
    }

    /// Map every row to `T`, failing on the first decode error.
    pub fn map_to<T: FromRow>(&self) -> OrmResult<Vec<T>> {
        self.rows.iter().map(T::from_row).collect()
    }
}

impl From<Vec<Row>> for Rows {
    fn from(rows: Vec<Row>) -> Self {
        Self { rows }
    }
}

impl IntoIterator for Rows {
    type Item = Row;
    type IntoIter = std::vec::IntoIter<Row>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.into_iter()
    }
}

impl<'a> IntoIterator for &'a Rows {
    type Item = &'a Row;
    type IntoIter = std::slice::Iter<'a, Row>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user_row() -> Row {
        Row::new(
            vec!["id".into(), "name".into(), "email".into()],
            vec![Value::Int(7), Value::Text("ann".into()), Value::Null],
        )
    }

    #[test]
    fn get_by_name_and_index() {
        let row = user_row();
        assert_eq!(row.try_get::<i64>("id").unwrap(), 7);
        assert_eq!(row.try_get_index::<String>(1).unwrap(), "ann");
        assert_eq!(row.try_get::<Option<String>>("email").unwrap(), None);
    }

    #[test]
    fn missing_column_is_decode_error() {
        let err = user_row().try_get::<i64>("nope").unwrap_err();
        assert!(matches!(err, OrmError::Decode { ref column, .. } if column == "nope"));
    }

    #[test]
    fn type_mismatch_is_decode_error() {
        assert!(user_row().try_get::<i64>("name").is_err());
    }
}
