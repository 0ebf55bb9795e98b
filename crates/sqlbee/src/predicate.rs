//! Predicates and AND-joined predicate lists for WHERE, HAVING and join ON.
//!
//! This module provides [`Operator`] (the operator tag), [`Predicate`] (one
//! finished comparison) and [`PredicateList`].
//!
//! # Example
//! ```
//! use sqlbee::{ParamList, Predicate, PredicateList, Value};
//!
//! let mut list = PredicateList::new();
//! list.push(Predicate::eq("T1.CODE", Value::from("000000")));
//! list.push(Predicate::is_null("T1.DELETED_AT"));
//!
//! let mut params = ParamList::new();
//! let sql = list.render(1000, &mut params);
//! assert_eq!(sql, "(T1.CODE = ?) AND (T1.DELETED_AT IS NULL)");
//! assert_eq!(params.len(), 1);
//! ```

use crate::error::{QueryError, QueryResult};
use crate::operand::Operand;
use crate::param::ParamList;
use crate::statement::Statement;
use crate::value::Value;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Maximum number of values rendered inside one `IN(...)` group.
pub const DEFAULT_IN_CHUNK_SIZE: usize = 1000;

/// Predicate operator tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    /// `=`
    Eq,
    /// `<>`
    Ne,
    /// `>`
    Gt,
    /// `<`
    Lt,
    /// `>=`
    Ge,
    /// `<=`
    Le,
    Like,
    Between,
    In,
    IsNull,
    IsNotNull,
    Exists,
    NotExists,
}

impl Operator {
    /// SQL spelling of the operator.
    pub fn as_sql(&self) -> &'static str {
        match self {
            Operator::Eq => "=",
            Operator::Ne => "<>",
            Operator::Gt => ">",
            Operator::Lt => "<",
            Operator::Ge => ">=",
            Operator::Le => "<=",
            Operator::Like => "LIKE",
            Operator::Between => "BETWEEN",
            Operator::In => "IN",
            Operator::IsNull => "IS NULL",
            Operator::IsNotNull => "IS NOT NULL",
            Operator::Exists => "EXISTS",
            Operator::NotExists => "NOT EXISTS",
        }
    }

    /// Parse an operator from its SQL spelling (case-insensitive).
    pub fn parse(s: &str) -> QueryResult<Self> {
        let normalized = s.split_whitespace().collect::<Vec<_>>().join(" ");
        let op = match normalized.to_ascii_uppercase().as_str() {
            "=" | "==" => Operator::Eq,
            "<>" | "!=" => Operator::Ne,
            ">" => Operator::Gt,
            "<" => Operator::Lt,
            ">=" => Operator::Ge,
            "<=" => Operator::Le,
            "LIKE" => Operator::Like,
            "BETWEEN" => Operator::Between,
            "IN" => Operator::In,
            "IS NULL" => Operator::IsNull,
            "IS NOT NULL" => Operator::IsNotNull,
            "EXISTS" => Operator::Exists,
            "NOT EXISTS" => Operator::NotExists,
            _ => return Err(QueryError::InvalidOperator(s.to_string())),
        };
        Ok(op)
    }

    /// Binary comparison taking exactly one right operand.
    pub fn is_comparison(&self) -> bool {
        matches!(
            self,
            Operator::Eq
                | Operator::Ne
                | Operator::Gt
                | Operator::Lt
                | Operator::Ge
                | Operator::Le
                | Operator::Like
        )
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

impl FromStr for Operator {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Operator::parse(s)
    }
}

/// Right-hand side of an IN predicate.
#[derive(Debug, Clone, PartialEq)]
enum InSource {
    Values(Vec<Value>),
    Query(Arc<Statement>),
}

#[derive(Debug, Clone, PartialEq)]
enum PredicateInner {
    Compare {
        left: Operand,
        op: Operator,
        right: Operand,
    },
    Between {
        left: Operand,
        low: Operand,
        high: Operand,
    },
    In {
        left: Operand,
        source: InSource,
    },
    Null {
        left: Operand,
        negated: bool,
    },
    Exists {
        query: Arc<Statement>,
        negated: bool,
    },
}

/// A finished, immutable predicate.
///
/// Constructors enforce the operand shape of each operator, so every
/// `Predicate` renders.
#[derive(Debug, Clone, PartialEq)]
pub struct Predicate(PredicateInner);

impl Predicate {
    /// Binary comparison with an explicit operator.
    pub fn compare(
        op: Operator,
        left: impl Into<Operand>,
        right: impl Into<Operand>,
    ) -> QueryResult<Self> {
        if !op.is_comparison() {
            return Err(QueryError::malformed(format!(
                "{op} is not a binary comparison"
            )));
        }
        Ok(Predicate(PredicateInner::Compare {
            left: left.into(),
            op,
            right: right.into(),
        }))
    }

    fn cmp(op: Operator, left: impl Into<Operand>, right: impl Into<Operand>) -> Self {
        Predicate(PredicateInner::Compare {
            left: left.into(),
            op,
            right: right.into(),
        })
    }

    /// `left = right`
    pub fn eq(left: impl Into<Operand>, right: impl Into<Operand>) -> Self {
        Self::cmp(Operator::Eq, left, right)
    }

    /// `left <> right`
    pub fn ne(left: impl Into<Operand>, right: impl Into<Operand>) -> Self {
        Self::cmp(Operator::Ne, left, right)
    }

    /// `left > right`
    pub fn gt(left: impl Into<Operand>, right: impl Into<Operand>) -> Self {
        Self::cmp(Operator::Gt, left, right)
    }

    /// `left < right`
    pub fn lt(left: impl Into<Operand>, right: impl Into<Operand>) -> Self {
        Self::cmp(Operator::Lt, left, right)
    }

    /// `left >= right`
    pub fn ge(left: impl Into<Operand>, right: impl Into<Operand>) -> Self {
        Self::cmp(Operator::Ge, left, right)
    }

    /// `left <= right`
    pub fn le(left: impl Into<Operand>, right: impl Into<Operand>) -> Self {
        Self::cmp(Operator::Le, left, right)
    }

    /// `left LIKE pattern`
    pub fn like(left: impl Into<Operand>, pattern: impl Into<Operand>) -> Self {
        Self::cmp(Operator::Like, left, pattern)
    }

    /// `left BETWEEN low AND high`
    pub fn between(
        left: impl Into<Operand>,
        low: impl Into<Operand>,
        high: impl Into<Operand>,
    ) -> Self {
        Predicate(PredicateInner::Between {
            left: left.into(),
            low: low.into(),
            high: high.into(),
        })
    }

    /// `left IN(v1,v2,...)`; an empty list is rejected.
    pub fn in_list<V: Into<Value>>(
        left: impl Into<Operand>,
        values: impl IntoIterator<Item = V>,
    ) -> QueryResult<Self> {
        let values: Vec<Value> = values.into_iter().map(Into::into).collect();
        if values.is_empty() {
            return Err(QueryError::malformed("IN requires at least one value"));
        }
        Ok(Predicate(PredicateInner::In {
            left: left.into(),
            source: InSource::Values(values),
        }))
    }

    /// `left IN(sub_sql)`
    pub fn in_query(left: impl Into<Operand>, query: impl Into<Arc<Statement>>) -> Self {
        Predicate(PredicateInner::In {
            left: left.into(),
            source: InSource::Query(query.into()),
        })
    }

    /// `left IS NULL`
    pub fn is_null(left: impl Into<Operand>) -> Self {
        Predicate(PredicateInner::Null {
            left: left.into(),
            negated: false,
        })
    }

    /// `left IS NOT NULL`
    pub fn is_not_null(left: impl Into<Operand>) -> Self {
        Predicate(PredicateInner::Null {
            left: left.into(),
            negated: true,
        })
    }

    /// `EXISTS (sub_sql)`
    pub fn exists(query: impl Into<Arc<Statement>>) -> Self {
        Predicate(PredicateInner::Exists {
            query: query.into(),
            negated: false,
        })
    }

    /// `NOT EXISTS (sub_sql)`
    pub fn not_exists(query: impl Into<Arc<Statement>>) -> Self {
        Predicate(PredicateInner::Exists {
            query: query.into(),
            negated: true,
        })
    }

    /// The operator tag of this predicate.
    pub fn operator(&self) -> Operator {
        match &self.0 {
            PredicateInner::Compare { op, .. } => *op,
            PredicateInner::Between { .. } => Operator::Between,
            PredicateInner::In { .. } => Operator::In,
            PredicateInner::Null { negated: false, .. } => Operator::IsNull,
            PredicateInner::Null { negated: true, .. } => Operator::IsNotNull,
            PredicateInner::Exists { negated: false, .. } => Operator::Exists,
            PredicateInner::Exists { negated: true, .. } => Operator::NotExists,
        }
    }

    /// Whether this is an EXISTS / NOT EXISTS test.
    pub fn is_exists(&self) -> bool {
        matches!(self.0, PredicateInner::Exists { .. })
    }

    /// Render the predicate without list parentheses.
    pub fn render(&self, chunk_size: usize, params: &mut ParamList) -> String {
        match &self.0 {
            PredicateInner::Compare { left, op, right } => {
                let l = left.render(params);
                let r = right.render(params);
                format!("{l} {op} {r}")
            }
            PredicateInner::Between { left, low, high } => {
                let l = left.render(params);
                let lo = low.render(params);
                let hi = high.render(params);
                format!("{l} BETWEEN {lo} AND {hi}")
            }
            PredicateInner::In {
                left,
                source: InSource::Values(values),
            } => {
                let (sql, chunk_params) = chunk_in_list(left, values, chunk_size);
                params.append(chunk_params);
                sql
            }
            PredicateInner::In {
                left,
                source: InSource::Query(query),
            } => {
                let l = left.render(params);
                format!("{l} IN({})", query.render_into(params))
            }
            PredicateInner::Null { left, negated } => {
                let l = left.render(params);
                if *negated {
                    format!("{l} IS NOT NULL")
                } else {
                    format!("{l} IS NULL")
                }
            }
            PredicateInner::Exists { query, negated } => {
                let sub = query.render_into(params);
                if *negated {
                    format!("NOT EXISTS ({sub})")
                } else {
                    format!("EXISTS ({sub})")
                }
            }
        }
    }

    /// Render as a member of a [`PredicateList`].
    ///
    /// EXISTS and chunked IN groups already carry their own parentheses.
    pub fn render_member(&self, chunk_size: usize, params: &mut ParamList) -> String {
        let wrapped = match &self.0 {
            PredicateInner::Exists { .. } => false,
            PredicateInner::In {
                source: InSource::Values(values),
                ..
            } => values.len() <= chunk_size.max(1),
            _ => true,
        };
        let sql = self.render(chunk_size, params);
        if wrapped { format!("({sql})") } else { sql }
    }
}

/// Render `left IN(...)` over `values`, splitting into OR-joined groups of at
/// most `chunk_size` values.
///
/// A single group renders as `left IN(?,...)`; several render as
/// `(left IN(?,...) OR left IN(?,...))`. Parameters keep the original value
/// order. A bound `left` operand is repeated once per group.
pub fn chunk_in_list(left: &Operand, values: &[Value], chunk_size: usize) -> (String, ParamList) {
    let mut params = ParamList::new();
    let groups: Vec<String> = values
        .chunks(chunk_size.max(1))
        .map(|chunk| {
            let l = left.render(&mut params);
            params.extend(chunk.iter().cloned());
            format!("{l} IN({})", vec!["?"; chunk.len()].join(","))
        })
        .collect();

    let sql = if groups.len() > 1 {
        format!("({})", groups.join(" OR "))
    } else {
        groups.concat()
    };
    (sql, params)
}

/// AND-joined sequence of predicates, each rendered in its own parentheses.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PredicateList {
    predicates: Vec<Predicate>,
}

impl PredicateList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, predicate: Predicate) {
        self.predicates.push(predicate);
    }

    pub fn len(&self) -> usize {
        self.predicates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Predicate> {
        self.predicates.iter()
    }

    /// Render the list content (without a leading keyword).
    ///
    /// EXISTS / NOT EXISTS members go after all other members; both groups
    /// keep insertion order.
    pub fn render(&self, chunk_size: usize, params: &mut ParamList) -> String {
        let (plain, exists): (Vec<&Predicate>, Vec<&Predicate>) =
            self.predicates.iter().partition(|p| !p.is_exists());
        plain
            .into_iter()
            .chain(exists)
            .map(|p| p.render_member(chunk_size, params))
            .collect::<Vec<_>>()
            .join(" AND ")
    }
}
