//! WHERE/HAVING predicate model.
//!
//! Predicates are kept in insertion order. Each one records how it joins its
//! predecessor (`and`/`or`) and, optionally, a bracket marker captured from the
//! `group_start()`/`group_end()` calls made right before it was appended.

use super::diagnostics::Diagnostic;
use crate::error::{OrmError, OrmResult};
use crate::ident::{QuoteMode, quote};
use crate::value::Value;

/// Comparators accepted in a `key` such as `"age>="`.
const COMPARATORS: &[&str] = &["=", "!=", "<>", "<", "<=", ">", ">=", "<=>"];

/// Boolean combinator relative to the previous predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combinator {
    And,
    Or,
}

impl Combinator {
    fn as_sql(self) -> &'static str {
        match self {
            Self::And => " and ",
            Self::Or => " or ",
        }
    }
}

/// Where a bracket marker is emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BracketPosition {
    #[default]
    None,
    /// `(` after the combinator, before the comparison.
    Open,
    /// `)` right after the previous predicate, before the combinator.
    Close,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Bracket {
    pub position: BracketPosition,
    pub depth: usize,
}

/// Right-hand side of a comparison.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    Single(Value),
    List(Vec<Value>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
    /// Quoted column (or qualified column).
    pub column: String,
    /// `=`, `!=`, `<`, `<=`, `>`, `>=`, `like`, or `in` for list operands.
    pub comparator: String,
    pub operand: Operand,
    pub combinator: Combinator,
    pub bracket: Bracket,
}

/// Ordered predicate sequence plus the not-yet-consumed bracket counters.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PredicateList {
    predicates: Vec<Predicate>,
    pending_open: usize,
    pending_close: usize,
}

impl PredicateList {
    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }

    pub fn len(&self) -> usize {
        self.predicates.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Predicate> {
        self.predicates.iter()
    }

    pub fn group_start(&mut self) {
        self.pending_open += 1;
    }

    pub fn group_end(&mut self) {
        self.pending_close += 1;
    }

    /// `group_end()` calls not consumed by any predicate.
    pub fn trailing_close(&self) -> usize {
        self.pending_close
    }

    /// `group_start()` calls not consumed by any predicate.
    pub fn pending_open(&self) -> usize {
        self.pending_open
    }

    /// Bracket calls that rendering drops.
    pub fn unused_brackets(&self) -> Vec<Diagnostic> {
        let mut out = Vec::new();
        if self.pending_open != 0 {
            out.push(Diagnostic::GroupStartUnused {
                depth: self.pending_open,
            });
        }
        if self.predicates.is_empty() && self.pending_close != 0 {
            out.push(Diagnostic::GroupEndUnused {
                depth: self.pending_close,
            });
        }
        out
    }

    /// Append a comparison parsed from `key` (`"col"`, `"col>="`, `"t.col !="`).
    pub fn push_compare(
        &mut self,
        key: &str,
        value: Value,
        combinator: Combinator,
        call: &'static str,
    ) -> Result<Option<Diagnostic>, Diagnostic> {
        let (column, comparator) = split_comparator(key, call)?;
        Ok(self.push(column, comparator, Operand::Single(value), combinator))
    }

    /// Append a `like` comparison.
    pub fn push_like(
        &mut self,
        key: &str,
        value: Value,
        combinator: Combinator,
        call: &'static str,
    ) -> Result<Option<Diagnostic>, Diagnostic> {
        let column = quote(key, QuoteMode::Dotted).ok_or(Diagnostic::BlankArgument { call })?;
        Ok(self.push(column, "like".to_string(), Operand::Single(value), combinator))
    }

    /// Append an `in (...)` comparison.
    pub fn push_in(
        &mut self,
        key: &str,
        values: Vec<Value>,
        combinator: Combinator,
        call: &'static str,
    ) -> Result<Option<Diagnostic>, Diagnostic> {
        let column = quote(key, QuoteMode::Dotted).ok_or(Diagnostic::BlankArgument { call })?;
        Ok(self.push(column, "in".to_string(), Operand::List(values), combinator))
    }

    /// Capture pending brackets into the new predicate.
    ///
    /// An open marker wins over a simultaneously pending close marker; the close
    /// counter is then dropped and reported back as a diagnostic.
    fn push(
        &mut self,
        column: String,
        comparator: String,
        operand: Operand,
        combinator: Combinator,
    ) -> Option<Diagnostic> {
        let mut discarded = None;
        let bracket = if self.pending_open != 0 {
            if self.pending_close != 0 {
                discarded = Some(Diagnostic::GroupEndDiscarded {
                    depth: self.pending_close,
                });
                self.pending_close = 0;
            }
            Bracket {
                position: BracketPosition::Open,
                depth: std::mem::take(&mut self.pending_open),
            }
        } else if self.pending_close != 0 {
            Bracket {
                position: BracketPosition::Close,
                depth: std::mem::take(&mut self.pending_close),
            }
        } else {
            Bracket::default()
        };

        self.predicates.push(Predicate {
            column,
            comparator,
            operand,
            combinator,
            bracket,
        });
        discarded
    }

    /// Render the predicate tree (without the `where`/`having` keyword).
    pub fn render(&self, sql: &mut String, params: &mut Vec<Value>) -> OrmResult<()> {
        for (i, p) in self.predicates.iter().enumerate() {
            if p.bracket.position == BracketPosition::Close {
                push_repeat(sql, ')', p.bracket.depth);
            }
            // The first predicate never renders its combinator.
            if i > 0 {
                sql.push_str(p.combinator.as_sql());
            }
            if p.bracket.position == BracketPosition::Open {
                push_repeat(sql, '(', p.bracket.depth);
            }

            match &p.operand {
                Operand::Single(value) => {
                    sql.push_str(&p.column);
                    if p.comparator == "like" {
                        sql.push_str(" like ?");
                    } else {
                        sql.push_str(&p.comparator);
                        sql.push('?');
                    }
                    params.push(value.clone());
                }
                Operand::List(values) => {
                    if values.is_empty() {
                        return Err(OrmError::unrenderable(format!(
                            "empty IN list for {}",
                            p.column
                        )));
                    }
                    sql.push_str(&p.column);
                    sql.push_str(" in (");
                    for j in 0..values.len() {
                        if j > 0 {
                            sql.push(',');
                        }
                        sql.push('?');
                    }
                    sql.push(')');
                    params.extend(values.iter().cloned());
                }
            }
        }
        push_repeat(sql, ')', self.pending_close);
        Ok(())
    }
}

fn push_repeat(sql: &mut String, ch: char, n: usize) {
    sql.extend(std::iter::repeat_n(ch, n));
}

/// Split `"age >="` into (`` `age` ``, `">="`); no operator means `=`.
fn split_comparator(key: &str, call: &'static str) -> Result<(String, String), Diagnostic> {
    match key.find(['!', '<', '=', '>']) {
        Some(pos) => {
            let column =
                quote(&key[..pos], QuoteMode::Dotted).ok_or(Diagnostic::BlankArgument { call })?;
            let comparator = key[pos..].trim();
            if !COMPARATORS.contains(&comparator) {
                return Err(Diagnostic::InvalidComparator {
                    call,
                    key: key.to_string(),
                });
            }
            Ok((column, comparator.to_string()))
        }
        None => {
            let column = quote(key, QuoteMode::Dotted).ok_or(Diagnostic::BlankArgument { call })?;
            Ok((column, "=".to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(list: &PredicateList) -> (String, Vec<Value>) {
        let mut sql = String::new();
        let mut params = Vec::new();
        list.render(&mut sql, &mut params).unwrap();
        (sql, params)
    }

    #[test]
    fn comparator_inference() {
        assert_eq!(
            split_comparator("age>=", "where").unwrap(),
            ("`age`".to_string(), ">=".to_string())
        );
        assert_eq!(
            split_comparator("u.name != ", "where").unwrap(),
            ("`u`.`name`".to_string(), "!=".to_string())
        );
        assert_eq!(
            split_comparator("id", "where").unwrap(),
            ("`id`".to_string(), "=".to_string())
        );
    }

    #[test]
    fn bad_comparator_is_rejected() {
        assert!(matches!(
            split_comparator("age=>", "where"),
            Err(Diagnostic::InvalidComparator { .. })
        ));
        assert!(matches!(
            split_comparator(" >", "where"),
            Err(Diagnostic::BlankArgument { .. })
        ));
    }

    #[test]
    fn open_wins_over_pending_close() {
        let mut list = PredicateList::default();
        list.push_compare("a", Value::Int(1), Combinator::And, "where")
            .unwrap();
        list.group_end();
        list.group_start();
        let discarded = list
            .push_compare("b", Value::Int(2), Combinator::Or, "where")
            .unwrap();
        assert_eq!(discarded, Some(Diagnostic::GroupEndDiscarded { depth: 1 }));
        assert_eq!(list.trailing_close(), 0);
        assert_eq!(render(&list).0, "`a`=? or (`b`=?");
    }

    #[test]
    fn trailing_group_end_is_flushed() {
        let mut list = PredicateList::default();
        list.group_start();
        list.push_compare("a", Value::Int(1), Combinator::And, "where")
            .unwrap();
        list.push_compare("b", Value::Int(2), Combinator::Or, "where")
            .unwrap();
        list.group_end();
        assert_eq!(render(&list).0, "(`a`=? or `b`=?)");
    }

    #[test]
    fn empty_in_list_is_unrenderable() {
        let mut list = PredicateList::default();
        list.push_in("id", vec![], Combinator::And, "where_in").unwrap();
        let mut sql = String::new();
        let mut params = Vec::new();
        let err = list.render(&mut sql, &mut params).unwrap_err();
        assert!(err.is_unrenderable());
    }
}
