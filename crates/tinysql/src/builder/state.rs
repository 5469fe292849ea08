//! Accumulated clause state for one statement under construction.

use super::predicate::PredicateList;
use crate::ident::{QuoteMode, quote};
use crate::value::Value;

/// A table in `from`/`join`/`update`/`delete` position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRef {
    /// Quoted table name.
    pub name: String,
    /// Alias tail kept verbatim (`o`, `as o`).
    pub alias: Option<String>,
}

impl TableRef {
    /// Parse `table`, `table alias` or `table as alias`.
    pub fn parse(raw: &str) -> Option<Self> {
        let mut tokens = raw.split_whitespace();
        let name = quote(tokens.next()?, QuoteMode::Aliased)?;
        let tail: Vec<&str> = tokens.collect();
        Some(Self {
            name,
            alias: (!tail.is_empty()).then(|| tail.join(" ")),
        })
    }

    pub(crate) fn write_sql(&self, out: &mut String) {
        out.push_str(&self.name);
        if let Some(alias) = &self.alias {
            out.push(' ');
            out.push_str(alias);
        }
    }
}

/// A select-list entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnRef {
    /// Quoted column or a pre-rendered expression such as `` count(`id`) ``.
    pub expression: String,
    pub alias: Option<String>,
}

impl ColumnRef {
    /// Parse `col`, `t.col`, `t.*`, `col alias`, `col as alias`.
    pub fn parse(raw: &str) -> Option<Self> {
        let mut tokens = raw.split_whitespace();
        let expression = quote(tokens.next()?, QuoteMode::Dotted)?;
        let mut tail: Vec<&str> = tokens.collect();
        if tail.first().is_some_and(|t| t.eq_ignore_ascii_case("as")) {
            tail.remove(0);
        }
        Some(Self {
            expression,
            alias: (!tail.is_empty()).then(|| tail.join(" ")),
        })
    }

    /// An expression emitted as-is, never re-quoted.
    pub fn raw(expression: impl Into<String>, alias: &str) -> Self {
        let alias = alias.trim();
        Self {
            expression: expression.into(),
            alias: (!alias.is_empty()).then(|| alias.to_string()),
        }
    }

    pub(crate) fn write_sql(&self, out: &mut String) {
        out.push_str(&self.expression);
        if let Some(alias) = &self.alias {
            out.push_str(" as ");
            out.push_str(alias);
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinKind {
    Inner,
    Left,
    Right,
}

impl JoinKind {
    pub(crate) fn as_sql(self) -> &'static str {
        match self {
            Self::Inner => " inner join ",
            Self::Left => " left join ",
            Self::Right => " right join ",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinSpec {
    pub table: TableRef,
    /// Raw SQL fragment; the caller owns its correctness.
    pub condition: String,
    pub kind: JoinKind,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SetAssignment {
    /// Quoted column.
    pub column: String,
    pub value: Value,
}

/// Everything a statement accumulates before it is rendered.
///
/// `BuilderState::default()` is the empty state every builder starts from and
/// returns to after a terminal operation.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BuilderState {
    pub tables: Vec<TableRef>,
    pub columns: Vec<ColumnRef>,
    pub joins: Vec<JoinSpec>,
    pub predicates: PredicateList,
    pub group_by: Vec<String>,
    pub having: PredicateList,
    pub order_by: Vec<String>,
    pub distinct: bool,
    /// Zero means no limit clause.
    pub limit: u64,
    pub offset: u64,
    pub sets: Vec<SetAssignment>,
}

impl BuilderState {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
