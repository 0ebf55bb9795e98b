use crate::error::{QueryError, QueryResult};
use crate::predicate::DEFAULT_IN_CHUNK_SIZE;

/// Configuration for building and rendering statements.
///
/// Defaults match the fixed output dialect: IN lists split every 1000 values,
/// logged SQL truncated to 200 bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryConfig {
    /// Maximum number of values inside one `IN(...)` group.
    pub in_chunk_size: usize,
    /// Truncate SQL in log events (in bytes). `None` means no truncation.
    pub max_logged_sql_length: Option<usize>,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            in_chunk_size: DEFAULT_IN_CHUNK_SIZE,
            max_logged_sql_length: Some(200),
        }
    }
}

impl QueryConfig {
    /// Create a new configuration with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the IN-list chunk size. Must be at least 1.
    pub fn with_in_chunk_size(mut self, size: usize) -> Self {
        self.in_chunk_size = size;
        self
    }

    /// Set maximum SQL length in log events.
    pub fn with_max_logged_sql_length(mut self, len: usize) -> Self {
        self.max_logged_sql_length = Some(len);
        self
    }

    /// Disable SQL truncation in log events.
    pub fn no_truncate(mut self) -> Self {
        self.max_logged_sql_length = None;
        self
    }

    pub fn validate(&self) -> QueryResult<()> {
        if self.in_chunk_size == 0 {
            return Err(QueryError::InvalidConfig(
                "in_chunk_size must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(feature = "tracing")]
pub(crate) fn truncate_sql_bytes(sql: &str, max_bytes: usize) -> &str {
    if sql.len() <= max_bytes {
        return sql;
    }
    let mut end = max_bytes;
    while end > 0 && !sql.is_char_boundary(end) {
        end -= 1;
    }
    &sql[..end]
}
