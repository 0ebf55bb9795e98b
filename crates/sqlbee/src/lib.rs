//! # sqlbee
//!
//! A fluent, connection-free builder for parameterized SQL SELECT statements.
//!
//! ## Features
//!
//! - **Scoped building**: clauses are edited inside explicit scopes
//!   (`select()`, `condition()`, `group()`, `having()`, `order()`, joins)
//!   closed with `end()`
//! - **Frozen statements**: `build()` yields an immutable [`Statement`] that
//!   renders the same text and parameters every time, from any thread
//! - **Bound literals only**: every literal becomes a `?` placeholder with a
//!   matching entry in the parameter list
//! - **IN-list chunking**: long value lists split into OR-joined groups of at
//!   most 1000 values
//! - **Sub-statements**: EXISTS / NOT EXISTS / IN / comparisons embed another
//!   statement and splice its parameters in place
//!
//! ## Example
//!
//! ```rust
//! use sqlbee::{query, sub_query, Operator, Table, Value};
//!
//! let active = sub_query()
//!     .table("TABLE2", "T2")
//!     .select().column("T2.ID").end()
//!     .condition_op(Operator::Eq).left("T2.STATUS").value("active").end()
//!     .build()
//!     .unwrap();
//!
//! let stmt = query()
//!     .table("TABLE1", "T1")
//!     .left_join(Table::new("TABLE3", "T3")).on("T1.ID", "T3.ID").end()
//!     .in_list().left("T1.OWNER").sub(active).end()
//!     .order_by("T1.ID").desc().end()
//!     .first_results(0)
//!     .max_results(20)
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(
//!     stmt.output(),
//!     "SELECT * FROM TABLE1 AS T1 LEFT JOIN TABLE3 AS T3 ON (T1.ID = T3.ID) \
//!      WHERE (T1.OWNER IN(SELECT T2.ID FROM TABLE2 AS T2 WHERE (T2.STATUS = ?))) \
//!      ORDER BY T1.ID DESC LIMIT ?,?"
//! );
//! assert_eq!(
//!     stmt.params(),
//!     vec![Value::from("active"), Value::from(0i64), Value::from(20i64)]
//! );
//! ```
//!
//! ## Logging
//!
//! With the default `tracing` feature, `build()` emits a `DEBUG` event on
//! target `sqlbee.sql` carrying the rendered (truncated) SQL, and every
//! rejected builder call emits a `WARN` event on target `sqlbee.builder`.

pub mod builder;
pub mod clause;
pub mod config;
pub mod error;
pub mod operand;
pub mod param;
pub mod predicate;
pub mod prelude;
pub mod statement;
pub mod value;

pub use builder::{QueryBuilder, ScopeKind};
pub use clause::{Direction, JoinClause, JoinKind, OrderItem, SelectColumn, Table};
pub use config::QueryConfig;
pub use error::{QueryError, QueryResult};
pub use operand::Operand;
pub use param::ParamList;
pub use predicate::{DEFAULT_IN_CHUNK_SIZE, Operator, Predicate, PredicateList, chunk_in_list};
pub use statement::{QueryKind, Rendered, Statement};
pub use value::{Datum, Value, ValueType};

/// Start a top-level statement.
pub fn query() -> QueryBuilder {
    QueryBuilder::new(QueryKind::Query)
}

/// Start a statement meant to be embedded in another one.
pub fn sub_query() -> QueryBuilder {
    QueryBuilder::new(QueryKind::SubQuery)
}
