//! Identifier quoting.
//!
//! Raw table/column tokens are normalized into backtick-quoted identifiers:
//!
//! - [`QuoteMode::Dotted`]: `db.table.column` -> `` `db`.`table`.`column` ``, `*` left bare
//! - [`QuoteMode::Aliased`]: `orders o` -> `` `orders` o ``, `orders as o` -> `` `orders` as o ``
//! - [`QuoteMode::OrderedAliased`]: `u.created_at desc` -> `` `u`.`created_at` desc ``
//!
//! Segments that are already validly quoted (wrapped in backticks, inner backticks
//! doubled) are passed through, so quoting is idempotent. Any other backtick is
//! escaped.
//!
//! # Example
//! ```
//! use tinysql::ident::{quote, QuoteMode};
//!
//! assert_eq!(quote("orders o", QuoteMode::Aliased).as_deref(), Some("`orders` o"));
//! assert_eq!(quote("u.*", QuoteMode::Dotted).as_deref(), Some("`u`.*"));
//! assert_eq!(quote("   ", QuoteMode::Dotted), None);
//! ```

/// MySQL identifier delimiter.
pub const QUOTE: char = '`';

/// How a raw token is split before quoting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuoteMode {
    /// Split on `.` and quote every segment except `*`.
    Dotted,
    /// Quote the first whitespace-delimited token as a bare identifier, keep the rest.
    Aliased,
    /// Apply [`QuoteMode::Dotted`] to the first token, keep the rest.
    OrderedAliased,
}

/// Quote `raw` according to `mode`.
///
/// Returns `None` for blank input; callers treat that as "skip this chain call".
pub fn quote(raw: &str, mode: QuoteMode) -> Option<String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    let out = match mode {
        QuoteMode::Dotted => quote_dotted(raw),
        QuoteMode::Aliased => with_tail(raw, quote_segment),
        QuoteMode::OrderedAliased => with_tail(raw, quote_dotted),
    };
    Some(out)
}

fn quote_dotted(raw: &str) -> String {
    // An already-quoted identifier may legally contain dots.
    if is_quoted(raw) {
        return raw.to_string();
    }
    raw.split('.')
        .map(|seg| seg.trim())
        .map(quote_segment)
        .collect::<Vec<_>>()
        .join(".")
}

fn with_tail(raw: &str, head: impl Fn(&str) -> String) -> String {
    let mut tokens = raw.split_whitespace();
    let mut out = match tokens.next() {
        Some(first) => head(first),
        None => return String::new(),
    };
    for token in tokens {
        out.push(' ');
        out.push_str(token);
    }
    out
}

fn quote_segment(seg: &str) -> String {
    if seg == "*" || is_quoted(seg) {
        return seg.to_string();
    }
    let mut out = String::with_capacity(seg.len() + 2);
    out.push(QUOTE);
    for ch in seg.chars() {
        // Escape embedded delimiters by doubling them.
        if ch == QUOTE {
            out.push(QUOTE);
        }
        out.push(ch);
    }
    out.push(QUOTE);
    out
}

/// A single quoted identifier: wrapped in backticks with every inner backtick doubled.
fn is_quoted(seg: &str) -> bool {
    let Some(inner) = seg
        .strip_prefix(QUOTE)
        .and_then(|rest| rest.strip_suffix(QUOTE))
    else {
        return false;
    };
    let mut chars = inner.chars();
    while let Some(ch) = chars.next() {
        if ch == QUOTE && chars.next() != Some(QUOTE) {
            return false;
        }
    }
    true
}
