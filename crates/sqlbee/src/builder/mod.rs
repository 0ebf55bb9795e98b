//! Scope-driven statement builder.
//!
//! ## Design
//!
//! - One mutable [`QueryBuilder`] collects clauses; [`QueryBuilder::build`]
//!   freezes them into an immutable [`Statement`](crate::Statement).
//! - Clause editing happens inside explicit scopes kept on a stack. Only
//!   conditions nest: inside `having()` they target HAVING, inside a join
//!   scope they target the latest join's ON list.
//! - Misuse is reported once: the first rejected call is kept and returned
//!   by `build()`.

mod scope;
pub mod select;

pub use scope::ScopeKind;
pub use select::QueryBuilder;
