//! Convenient imports for typical `sqlbee` usage.
//!
//! ```
//! use sqlbee::prelude::*;
//!
//! let stmt = query().table("TABLE1", "T1").build().unwrap();
//! assert_eq!(stmt.output(), "SELECT * FROM TABLE1 AS T1");
//! ```

pub use crate::{
    JoinKind, Operator, Predicate, QueryBuilder, QueryError, QueryResult, Statement, Table, Value,
    query, sub_query,
};
