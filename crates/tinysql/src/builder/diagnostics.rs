use std::fmt;

/// A chain call that was ignored (or partially ignored) by the builder.
///
/// Chain calls never fail; instead they record one of these. Inspect them via
/// [`Builder::diagnostics`](super::Builder::diagnostics) or turn them into a hard
/// error with [`Builder::strict`](super::Builder::strict).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// A blank table/column/key argument; the call was skipped.
    BlankArgument { call: &'static str },
    /// The operator embedded in a key is not a supported comparator.
    InvalidComparator { call: &'static str, key: String },
    /// `group_end()` calls dropped because `group_start()` was pending too.
    GroupEndDiscarded { depth: usize },
    /// `where_in` with no values; rendering this statement will fail.
    EmptyInList { column: String },
    /// `group_start()` calls with no later condition to open.
    GroupStartUnused { depth: usize },
    /// `group_end()` calls with no condition at all to close.
    GroupEndUnused { depth: usize },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BlankArgument { call } => write!(f, "{call}: blank argument ignored"),
            Self::InvalidComparator { call, key } => {
                write!(f, "{call}: unsupported comparator in '{key}'")
            }
            Self::GroupEndDiscarded { depth } => {
                write!(f, "group_end: {depth} pending close bracket(s) discarded by group_start")
            }
            Self::EmptyInList { column } => write!(f, "where_in: empty value list for '{column}'"),
            Self::GroupStartUnused { depth } => {
                write!(f, "group_start: {depth} open bracket(s) never followed by a condition")
            }
            Self::GroupEndUnused { depth } => {
                write!(f, "group_end: {depth} close bracket(s) with no condition to close")
            }
        }
    }
}
