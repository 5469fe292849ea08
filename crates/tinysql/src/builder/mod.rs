//! Fluent statement builder.
//!
//! A [`Builder`] is bound to one [`Connection`] and accumulates the clauses of
//! a single statement. Chain calls never fail: malformed input (blank names,
//! unsupported comparators) is skipped and recorded as a [`Diagnostic`].
//! Terminal operations (`query`, `get`, `first`, `insert`, `update`, `delete`,
//! `count(true)`) take the accumulated state out of the builder before rendering,
//! so the builder is always empty afterwards and can be reused.
//!
//! ```ignore
//! let mut b = conn.builder();
//! let rows = b
//!     .from("orders o")
//!     .select("o.id, o.total")
//!     .group_start()
//!     .and_where("o.status", "paid")
//!     .or_where("o.status", "shipped")
//!     .group_end()
//!     .and_where("o.total>=", 100)
//!     .order_by("o.id desc")
//!     .limit(20, 0)
//!     .query()
//!     .await?;
//! // select `o`.`id`,`o`.`total` from `orders` o
//! //   where (`o`.`status`=? or `o`.`status`=?) and `o`.`total`>=? order by `o`.`id` desc limit 0,20
//! ```

mod diagnostics;
mod predicate;
mod render;
mod state;

pub use diagnostics::Diagnostic;
pub use predicate::{Bracket, BracketPosition, Combinator, Operand, Predicate, PredicateList};
pub use render::{Statement, StatementKind};
pub use state::{BuilderState, ColumnRef, JoinKind, JoinSpec, SetAssignment, TableRef};

use crate::client::Connection;
use crate::error::{OrmError, OrmResult};
use crate::ident::{QuoteMode, quote};
use crate::model::InsertModel;
use crate::row::{FromRow, Rows};
use crate::value::Value;

/// Statement builder bound to a connection.
pub struct Builder<'c, C: Connection + ?Sized> {
    conn: &'c C,
    state: BuilderState,
    diagnostics: Vec<Diagnostic>,
    strict: bool,
}

impl<'c, C: Connection + ?Sized> Builder<'c, C> {
    /// Create an empty builder bound to `conn`.
    pub fn new(conn: &'c C) -> Self {
        Self {
            conn,
            state: BuilderState::default(),
            diagnostics: Vec::new(),
            strict: false,
        }
    }

    pub fn connection(&self) -> &'c C {
        self.conn
    }

    /// Accumulated clause state.
    pub fn state(&self) -> &BuilderState {
        &self.state
    }

    /// Chain calls ignored so far, plus bracket calls the next render would drop.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        let mut all = self.diagnostics.clone();
        all.extend(self.state.predicates.unused_brackets());
        all
    }

    /// Fail terminal operations with [`OrmError::Validation`] when any chain
    /// call was ignored. The flag survives resets.
    pub fn strict(&mut self, strict: bool) -> &mut Self {
        self.strict = strict;
        self
    }

    /// Drop all accumulated clauses and diagnostics.
    pub fn reset(&mut self) -> &mut Self {
        self.state = BuilderState::default();
        self.diagnostics.clear();
        self
    }

    fn note(&mut self, diagnostic: Diagnostic) {
        tracing::trace!(target: "tinysql.builder", %diagnostic, "chain call ignored");
        self.diagnostics.push(diagnostic);
    }

    fn note_blank(&mut self, call: &'static str) {
        self.note(Diagnostic::BlankArgument { call });
    }

    // ==================== Tables ====================

    /// Add one or more comma-separated tables: `table`, `table alias`, `table as alias`.
    pub fn from(&mut self, spec: &str) -> &mut Self {
        if spec.trim().is_empty() {
            self.note_blank("from");
            return self;
        }
        for part in spec.split(',') {
            match TableRef::parse(part) {
                Some(table) => self.state.tables.push(table),
                None => self.note_blank("from"),
            }
        }
        self
    }

    fn push_join(&mut self, table: &str, condition: &str, kind: JoinKind, call: &'static str) {
        match TableRef::parse(table) {
            Some(table) => self.state.joins.push(JoinSpec {
                table,
                condition: condition.trim().to_string(),
                kind,
            }),
            None => self.note_blank(call),
        }
    }

    /// `inner join <table> on <condition>`.
    ///
    /// `condition` is inserted verbatim; it must not contain untrusted input.
    pub fn join(&mut self, table: &str, condition: &str) -> &mut Self {
        self.push_join(table, condition, JoinKind::Inner, "join");
        self
    }

    /// `left join <table> on <condition>`; `condition` is inserted verbatim.
    pub fn left_join(&mut self, table: &str, condition: &str) -> &mut Self {
        self.push_join(table, condition, JoinKind::Left, "left_join");
        self
    }

    /// `right join <table> on <condition>`; `condition` is inserted verbatim.
    pub fn right_join(&mut self, table: &str, condition: &str) -> &mut Self {
        self.push_join(table, condition, JoinKind::Right, "right_join");
        self
    }

    // ==================== Columns ====================

    /// Add comma-separated columns (`id, u.name, u.*, email as mail`).
    pub fn select(&mut self, spec: &str) -> &mut Self {
        if spec.trim().is_empty() {
            self.note_blank("select");
            return self;
        }
        for part in spec.split(',') {
            match ColumnRef::parse(part) {
                Some(column) => self.state.columns.push(column),
                None => self.note_blank("select"),
            }
        }
        self
    }

    /// Add a raw expression, never quoted; `alias` may be blank.
    pub fn select_as(&mut self, expr: &str, alias: &str) -> &mut Self {
        let expr = expr.trim();
        if expr.is_empty() {
            self.note_blank("select_as");
            return self;
        }
        self.state.columns.push(ColumnRef::raw(expr, alias));
        self
    }

    /// `count(col)`; `*` gives `count(*)` and a blank column gives `count(1)`.
    pub fn select_count(&mut self, col: &str, alias: &str) -> &mut Self {
        let expr = match col.trim() {
            "*" => "count(*)".to_string(),
            "" => "count(1)".to_string(),
            col => format!("count({})", quote(col, QuoteMode::Dotted).unwrap_or_default()),
        };
        self.state.columns.push(ColumnRef::raw(expr, alias));
        self
    }

    pub fn select_max(&mut self, col: &str, alias: &str) -> &mut Self {
        self.aggregate("max", col, alias, "select_max")
    }

    pub fn select_min(&mut self, col: &str, alias: &str) -> &mut Self {
        self.aggregate("min", col, alias, "select_min")
    }

    pub fn select_avg(&mut self, col: &str, alias: &str) -> &mut Self {
        self.aggregate("avg", col, alias, "select_avg")
    }

    pub fn select_sum(&mut self, col: &str, alias: &str) -> &mut Self {
        self.aggregate("sum", col, alias, "select_sum")
    }

    pub fn group_concat(&mut self, col: &str, alias: &str) -> &mut Self {
        self.aggregate("group_concat", col, alias, "group_concat")
    }

    fn aggregate(&mut self, func: &str, col: &str, alias: &str, call: &'static str) -> &mut Self {
        match quote(col, QuoteMode::Dotted) {
            Some(col) => self
                .state
                .columns
                .push(ColumnRef::raw(format!("{func}({col})"), alias)),
            None => self.note_blank(call),
        }
        self
    }

    pub fn distinct(&mut self) -> &mut Self {
        self.state.distinct = true;
        self
    }

    // ==================== Conditions ====================

    fn record(&mut self, outcome: Result<Option<Diagnostic>, Diagnostic>) -> &mut Self {
        match outcome {
            Ok(None) => {}
            Ok(Some(diagnostic)) | Err(diagnostic) => self.note(diagnostic),
        }
        self
    }

    /// Add an AND condition. The comparator is read from `key`
    /// (`"age>="`, `"status !="`) and defaults to `=`.
    pub fn and_where(&mut self, key: &str, val: impl Into<Value>) -> &mut Self {
        let outcome =
            self.state
                .predicates
                .push_compare(key, val.into(), Combinator::And, "and_where");
        self.record(outcome)
    }

    /// Add an OR condition; see [`Builder::and_where`].
    pub fn or_where(&mut self, key: &str, val: impl Into<Value>) -> &mut Self {
        let outcome =
            self.state
                .predicates
                .push_compare(key, val.into(), Combinator::Or, "or_where");
        self.record(outcome)
    }

    /// Add an AND `in (...)` condition. An empty list is accepted here but makes
    /// the statement unrenderable.
    pub fn and_where_in<I, V>(&mut self, key: &str, values: I) -> &mut Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.where_in(key, values, Combinator::And, "and_where_in")
    }

    /// Add an OR `in (...)` condition.
    pub fn or_where_in<I, V>(&mut self, key: &str, values: I) -> &mut Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.where_in(key, values, Combinator::Or, "or_where_in")
    }

    fn where_in<I, V>(
        &mut self,
        key: &str,
        values: I,
        combinator: Combinator,
        call: &'static str,
    ) -> &mut Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let values: Vec<Value> = values.into_iter().map(Into::into).collect();
        if values.is_empty() && !key.trim().is_empty() {
            self.note(Diagnostic::EmptyInList {
                column: key.trim().to_string(),
            });
        }
        let outcome = self
            .state
            .predicates
            .push_in(key, values, combinator, call);
        self.record(outcome)
    }

    /// Add an AND `like` condition.
    pub fn like(&mut self, key: &str, val: impl Into<Value>) -> &mut Self {
        let outcome = self
            .state
            .predicates
            .push_like(key, val.into(), Combinator::And, "like");
        self.record(outcome)
    }

    /// Add an OR `like` condition.
    pub fn or_like(&mut self, key: &str, val: impl Into<Value>) -> &mut Self {
        let outcome = self
            .state
            .predicates
            .push_like(key, val.into(), Combinator::Or, "or_like");
        self.record(outcome)
    }

    /// Open a bracket before the next condition. Consecutive calls nest.
    pub fn group_start(&mut self) -> &mut Self {
        self.state.predicates.group_start();
        self
    }

    /// Close a bracket after the previous condition. Closes not followed by
    /// another condition are emitted at the end of the where clause.
    pub fn group_end(&mut self) -> &mut Self {
        self.state.predicates.group_end();
        self
    }

    // ==================== Grouping, ordering, paging ====================

    /// Add comma-separated `group by` columns.
    pub fn group_by(&mut self, cols: &str) -> &mut Self {
        self.push_ordered(cols, "group_by", |state| &mut state.group_by)
    }

    /// Add an AND `having` condition (same key syntax as [`Builder::and_where`]).
    pub fn having(&mut self, key: &str, val: impl Into<Value>) -> &mut Self {
        let outcome = self
            .state
            .having
            .push_compare(key, val.into(), Combinator::And, "having");
        self.record(outcome)
    }

    /// Add an OR `having` condition.
    pub fn or_having(&mut self, key: &str, val: impl Into<Value>) -> &mut Self {
        let outcome = self
            .state
            .having
            .push_compare(key, val.into(), Combinator::Or, "or_having");
        self.record(outcome)
    }

    /// Add comma-separated `order by` columns; trailing tokens (`desc`) are kept.
    pub fn order_by(&mut self, cols: &str) -> &mut Self {
        self.push_ordered(cols, "order_by", |state| &mut state.order_by)
    }

    fn push_ordered(
        &mut self,
        cols: &str,
        call: &'static str,
        target: impl Fn(&mut BuilderState) -> &mut Vec<String>,
    ) -> &mut Self {
        if cols.trim().is_empty() {
            self.note_blank(call);
            return self;
        }
        for part in cols.split(',') {
            match quote(part, QuoteMode::OrderedAliased) {
                Some(col) => target(&mut self.state).push(col),
                None => self.note_blank(call),
            }
        }
        self
    }

    /// `limit <offset>,<limit>`; a zero limit renders no clause.
    pub fn limit(&mut self, limit: u64, offset: u64) -> &mut Self {
        self.state.limit = limit;
        self.state.offset = offset;
        self
    }

    /// Add a `set` assignment for [`Builder::update`].
    pub fn set(&mut self, col: &str, val: impl Into<Value>) -> &mut Self {
        match quote(col, QuoteMode::Dotted) {
            Some(column) => self.state.sets.push(SetAssignment {
                column,
                value: val.into(),
            }),
            None => self.note_blank("set"),
        }
        self
    }

    // ==================== Rendering ====================

    /// Render the current state as a select without executing it.
    pub fn build_select(&self) -> OrmResult<Statement> {
        render::select(&self.state)
    }

    /// Render the count query used by [`Builder::count`].
    pub fn build_count(&self) -> OrmResult<Statement> {
        render::count(&self.state)
    }

    pub fn build_update(&self, table: &str) -> OrmResult<Statement> {
        render::update(&self.state, table)
    }

    pub fn build_delete(&self) -> OrmResult<Statement> {
        render::delete(&self.state)
    }

    pub fn build_insert<M: InsertModel + ?Sized>(
        &self,
        table: &str,
        model: &M,
    ) -> OrmResult<Statement> {
        render::insert(table, model.columns())
    }

    fn check_strict(&self, diagnostics: &[Diagnostic]) -> OrmResult<()> {
        if self.strict && !diagnostics.is_empty() {
            let list: Vec<String> = diagnostics.iter().map(ToString::to_string).collect();
            return Err(OrmError::validation(list.join("; ")));
        }
        Ok(())
    }

    /// Take the state out of the builder (resetting it), then render.
    fn take_and_render(
        &mut self,
        render: impl FnOnce(&BuilderState) -> OrmResult<Statement>,
    ) -> OrmResult<Statement> {
        let state = std::mem::take(&mut self.state);
        let mut diagnostics = std::mem::take(&mut self.diagnostics);
        for unused in state.predicates.unused_brackets() {
            tracing::trace!(target: "tinysql.builder", diagnostic = %unused, "bracket dropped");
            diagnostics.push(unused);
        }
        self.check_strict(&diagnostics)?;
        let stmt = render(&state)?;
        self.conn.sql_log().emit(&stmt);
        Ok(stmt)
    }

    // ==================== Terminal operations ====================

    /// Run the select and return the row cursor.
    pub async fn query(&mut self) -> OrmResult<Rows> {
        let stmt = self.take_and_render(render::select)?;
        self.conn
            .query(stmt.sql(), stmt.params())
            .await
            .inspect_err(|e| warn_failed(&stmt, e))
    }

    /// Run the select and map every row to `T`.
    pub async fn get<T: FromRow>(&mut self) -> OrmResult<Vec<T>> {
        self.query().await?.map_to()
    }

    /// Run the select and map the first row, if any.
    pub async fn first<T: FromRow>(&mut self) -> OrmResult<Option<T>> {
        let rows = self.query().await?;
        rows.first().map(T::from_row).transpose()
    }

    /// Insert `model` into `table`, returning the last insert id.
    pub async fn insert<M: InsertModel + ?Sized>(
        &mut self,
        table: &str,
        model: &M,
    ) -> OrmResult<u64> {
        let columns = model.columns();
        let stmt = self.take_and_render(|_| render::insert(table, columns))?;
        let result = self
            .conn
            .execute(stmt.sql(), stmt.params())
            .await
            .inspect_err(|e| warn_failed(&stmt, e))?;
        Ok(result.last_insert_id)
    }

    /// Insert `model` into its own table ([`InsertModel::table_name`]).
    pub async fn insert_model<M: InsertModel>(&mut self, model: &M) -> OrmResult<u64> {
        self.insert(M::table_name(), model).await
    }

    /// Apply the accumulated `set` assignments to `table`, returning affected rows.
    pub async fn update(&mut self, table: &str) -> OrmResult<u64> {
        let stmt = self.take_and_render(|state| render::update(state, table))?;
        let result = self
            .conn
            .execute(stmt.sql(), stmt.params())
            .await
            .inspect_err(|e| warn_failed(&stmt, e))?;
        Ok(result.rows_affected)
    }

    /// Delete from the single `from` table, returning affected rows.
    pub async fn delete(&mut self) -> OrmResult<u64> {
        let stmt = self.take_and_render(render::delete)?;
        let result = self
            .conn
            .execute(stmt.sql(), stmt.params())
            .await
            .inspect_err(|e| warn_failed(&stmt, e))?;
        Ok(result.rows_affected)
    }

    /// Count matching rows, ignoring the column list and limit.
    ///
    /// With `reset == false` the accumulated state is left untouched so the same
    /// builder can still run the full [`Builder::query`].
    pub async fn count(&mut self, reset: bool) -> OrmResult<i64> {
        let stmt = if reset {
            self.take_and_render(render::count)?
        } else {
            self.check_strict(&self.diagnostics())?;
            let stmt = render::count(&self.state)?;
            self.conn.sql_log().emit(&stmt);
            stmt
        };

        let rows = self
            .conn
            .query(stmt.sql(), stmt.params())
            .await
            .inspect_err(|e| warn_failed(&stmt, e))?;
        match rows.first() {
            Some(row) => row.try_get_index::<i64>(0),
            None => Ok(0),
        }
    }

    // ==================== Transactions ====================

    /// Bind subsequent statements on this connection to a transaction.
    pub async fn begin(&self) -> OrmResult<()> {
        self.conn.begin().await
    }

    pub async fn commit(&self) -> OrmResult<()> {
        self.conn.commit().await
    }

    pub async fn rollback(&self) -> OrmResult<()> {
        self.conn.rollback().await
    }
}

fn warn_failed(stmt: &Statement, error: &OrmError) {
    tracing::warn!(
        target: "tinysql.sql",
        kind = stmt.kind().as_str(),
        sql = stmt.sql(),
        %error,
        "statement failed"
    );
}
