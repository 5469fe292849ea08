//! Deterministic rendering of [`BuilderState`] into parameterized SQL.
//!
//! Every function here is pure: the same state always yields the same SQL text
//! and the same positional parameter list.

use super::state::{BuilderState, TableRef};
use crate::error::{OrmError, OrmResult};
use crate::ident::{QuoteMode, quote};
use crate::value::Value;

/// Statement kind, used for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementKind {
    Select,
    Count,
    Insert,
    Update,
    Delete,
}

impl StatementKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Select => "select",
            Self::Count => "count",
            Self::Insert => "insert",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }
}

/// A rendered statement: SQL text plus positional `?` parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    kind: StatementKind,
    sql: String,
    params: Vec<Value>,
}

impl Statement {
    pub fn kind(&self) -> StatementKind {
        self.kind
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn params(&self) -> &[Value] {
        &self.params
    }

    pub fn into_parts(self) -> (String, Vec<Value>) {
        (self.sql, self.params)
    }
}

/// `select [distinct] <cols> from <tables> [join..] [where..] [group by..] [having..] [order by..] [limit o,n]`
pub fn select(state: &BuilderState) -> OrmResult<Statement> {
    render_select(state, StatementKind::Select)
}

/// The select with its column list replaced by `count(*) as c` and no limit.
pub fn count(state: &BuilderState) -> OrmResult<Statement> {
    render_select(state, StatementKind::Count)
}

fn render_select(state: &BuilderState, kind: StatementKind) -> OrmResult<Statement> {
    if state.tables.is_empty() {
        return Err(OrmError::unrenderable("select requires at least one table"));
    }

    let mut sql = String::from("select ");
    let mut params = Vec::new();

    if state.distinct {
        sql.push_str("distinct ");
    }
    if kind == StatementKind::Count {
        sql.push_str("count(*) as c");
    } else if state.columns.is_empty() {
        sql.push('*');
    } else {
        for (i, col) in state.columns.iter().enumerate() {
            if i > 0 {
                sql.push(',');
            }
            col.write_sql(&mut sql);
        }
    }

    sql.push_str(" from ");
    write_tables(&mut sql, &state.tables);

    for join in &state.joins {
        sql.push_str(join.kind.as_sql());
        join.table.write_sql(&mut sql);
        sql.push_str(" on ");
        sql.push_str(&join.condition);
    }

    write_where(&mut sql, &mut params, state)?;

    if !state.group_by.is_empty() {
        sql.push_str(" group by ");
        sql.push_str(&state.group_by.join(","));
    }

    if !state.having.is_empty() {
        sql.push_str(" having ");
        state.having.render(&mut sql, &mut params)?;
    }

    if !state.order_by.is_empty() {
        sql.push_str(" order by ");
        sql.push_str(&state.order_by.join(","));
    }

    if kind != StatementKind::Count && state.limit != 0 {
        sql.push_str(&format!(" limit {},{}", state.offset, state.limit));
    }

    Ok(Statement { kind, sql, params })
}

/// `update <table> set <col>=?[,..] [where..]`
pub fn update(state: &BuilderState, table: &str) -> OrmResult<Statement> {
    let table =
        TableRef::parse(table).ok_or_else(|| OrmError::unrenderable("update requires a table"))?;
    if state.sets.is_empty() {
        return Err(OrmError::unrenderable("update requires at least one set()"));
    }

    let mut sql = String::from("update ");
    let mut params = Vec::with_capacity(state.sets.len());
    table.write_sql(&mut sql);
    sql.push_str(" set ");
    for (i, set) in state.sets.iter().enumerate() {
        if i > 0 {
            sql.push(',');
        }
        sql.push_str(&set.column);
        sql.push_str("=?");
        params.push(set.value.clone());
    }

    write_where(&mut sql, &mut params, state)?;

    Ok(Statement {
        kind: StatementKind::Update,
        sql,
        params,
    })
}

/// `delete from <table> [where..]`; exactly one table is required.
pub fn delete(state: &BuilderState) -> OrmResult<Statement> {
    if state.tables.len() != 1 {
        return Err(OrmError::unrenderable(format!(
            "delete requires exactly one table, got {}",
            state.tables.len()
        )));
    }

    let mut sql = String::from("delete from ");
    let mut params = Vec::new();
    state.tables[0].write_sql(&mut sql);
    write_where(&mut sql, &mut params, state)?;

    Ok(Statement {
        kind: StatementKind::Delete,
        sql,
        params,
    })
}

/// `insert into <table> (<cols>) values (?,..)`
pub fn insert(table: &str, columns: Vec<(&str, Value)>) -> OrmResult<Statement> {
    let table =
        TableRef::parse(table).ok_or_else(|| OrmError::unrenderable("insert requires a table"))?;
    if columns.is_empty() {
        return Err(OrmError::unrenderable("insert requires at least one column"));
    }

    let mut names = Vec::with_capacity(columns.len());
    let mut params = Vec::with_capacity(columns.len());
    for (name, value) in columns {
        let quoted = quote(name, QuoteMode::Dotted)
            .ok_or_else(|| OrmError::unrenderable("insert column name is blank"))?;
        names.push(quoted);
        params.push(value);
    }

    let mut sql = String::from("insert into ");
    table.write_sql(&mut sql);
    sql.push_str(" (");
    sql.push_str(&names.join(","));
    sql.push_str(") values (");
    sql.push_str(&vec!["?"; params.len()].join(","));
    sql.push(')');

    Ok(Statement {
        kind: StatementKind::Insert,
        sql,
        params,
    })
}

fn write_tables(sql: &mut String, tables: &[TableRef]) {
    for (i, table) in tables.iter().enumerate() {
        if i > 0 {
            sql.push(',');
        }
        table.write_sql(sql);
    }
}

fn write_where(sql: &mut String, params: &mut Vec<Value>, state: &BuilderState) -> OrmResult<()> {
    if !state.predicates.is_empty() {
        sql.push_str(" where ");
        state.predicates.render(sql, params)?;
    }
    Ok(())
}
