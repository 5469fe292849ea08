//! `tracing` output for rendered statements.
//!
//! Every terminal builder operation emits one event on target `tinysql.sql`
//! before the statement reaches the connection.

use serde::Deserialize;
use tracing::Level;

use crate::builder::Statement;

/// Log level names accepted in configuration files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    #[default]
    Debug,
    Trace,
}

impl From<LogLevel> for Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => Level::ERROR,
            LogLevel::Warn => Level::WARN,
            LogLevel::Info => Level::INFO,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Trace => Level::TRACE,
        }
    }
}

/// Statement logging settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SqlLog {
    pub enabled: bool,
    pub level: LogLevel,
    /// Truncate long SQL strings (in bytes). `None` means no truncation.
    pub max_sql_length: Option<usize>,
}

impl Default for SqlLog {
    fn default() -> Self {
        Self {
            enabled: true,
            level: LogLevel::Debug,
            max_sql_length: Some(200),
        }
    }
}

impl SqlLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    pub fn level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }

    pub fn max_sql_length(mut self, len: usize) -> Self {
        self.max_sql_length = Some(len);
        self
    }

    pub fn no_truncate(mut self) -> Self {
        self.max_sql_length = None;
        self
    }

    fn truncate_sql<'a>(&self, sql: &'a str) -> std::borrow::Cow<'a, str> {
        match self.max_sql_length {
            Some(max) if sql.len() > max => format!("{}...", truncate_sql_bytes(sql, max)).into(),
            _ => sql.into(),
        }
    }

    pub(crate) fn emit(&self, stmt: &Statement) {
        if !self.enabled {
            return;
        }

        macro_rules! emit_at_level {
            ($level:expr, $($field:tt)*) => {
                match $level {
                    LogLevel::Error => tracing::error!($($field)*),
                    LogLevel::Warn  => tracing::warn!($($field)*),
                    LogLevel::Info  => tracing::info!($($field)*),
                    LogLevel::Debug => tracing::debug!($($field)*),
                    LogLevel::Trace => tracing::trace!($($field)*),
                }
            };
        }

        let sql = self.truncate_sql(stmt.sql());
        emit_at_level!(
            self.level,
            target: "tinysql.sql",
            kind = stmt.kind().as_str(),
            param_count = stmt.params().len(),
            sql = %sql,
        );
    }
}

fn truncate_sql_bytes(sql: &str, max_bytes: usize) -> &str {
    if sql.len() <= max_bytes {
        return sql;
    }
    let mut end = max_bytes;
    while end > 0 && !sql.is_char_boundary(end) {
        end -= 1;
    }
    &sql[..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncation_respects_char_boundaries() {
        assert_eq!(truncate_sql_bytes("abc", 10), "abc");
        assert_eq!(truncate_sql_bytes("héllo", 2), "h");
    }

    #[test]
    fn truncate_sql_appends_ellipsis() {
        let log = SqlLog::new().max_sql_length(6);
        assert_eq!(log.truncate_sql("select * from t"), "select...");
        assert_eq!(SqlLog::new().no_truncate().truncate_sql("select 1"), "select 1");
    }
}
