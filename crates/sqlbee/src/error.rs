//! Error types for sqlbee

use crate::builder::ScopeKind;
use thiserror::Error;

/// Result type alias for sqlbee operations
pub type QueryResult<T> = Result<T, QueryError>;

/// Errors raised while constructing a statement.
///
/// Rendering a built [`Statement`](crate::Statement) never fails; every variant
/// here is produced by the builder or by parsing helpers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    /// A scope was entered while another scope was still open
    #[error("Unbalanced scope: cannot enter {requested} while {open} is open")]
    UnbalancedScope {
        open: ScopeKind,
        requested: ScopeKind,
    },

    /// `end()` was called with no open scope
    #[error("Scope underflow: end() called at root")]
    ScopeUnderflow,

    /// `build()` was called while scopes were still open
    #[error("Cannot build with {depth} open scope(s), innermost is {innermost}")]
    OpenScopes { depth: usize, innermost: ScopeKind },

    /// The operation has no meaning in the active scope
    #[error("`{operation}` is not allowed in {scope}")]
    ScopeMismatch {
        scope: ScopeKind,
        operation: &'static str,
    },

    /// A condition was closed with an incomplete or inconsistent shape
    #[error("Malformed predicate: {0}")]
    MalformedPredicate(String),

    /// An ORDER BY scope was closed without a column
    #[error("Malformed order: {0}")]
    MalformedOrder(String),

    /// `build()` was called before a primary table was set
    #[error("No primary table set")]
    MissingTable,

    /// Operator spelling not recognized
    #[error("Invalid operator: '{0}'")]
    InvalidOperator(String),

    /// Configuration value rejected
    #[error("Invalid config: {0}")]
    InvalidConfig(String),
}

impl QueryError {
    /// Create a malformed predicate error
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedPredicate(message.into())
    }

    /// Check if this is a scope-protocol violation
    pub fn is_scope_error(&self) -> bool {
        matches!(
            self,
            Self::UnbalancedScope { .. }
                | Self::ScopeUnderflow
                | Self::OpenScopes { .. }
                | Self::ScopeMismatch { .. }
        )
    }

    /// Check if this is a malformed predicate or order error
    pub fn is_malformed(&self) -> bool {
        matches!(self, Self::MalformedPredicate(_) | Self::MalformedOrder(_))
    }
}
