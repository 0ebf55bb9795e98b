//! Builder scopes and the drafts they collect before being closed.

use crate::clause::{Direction, OrderItem};
use crate::error::{QueryError, QueryResult};
use crate::operand::Operand;
use crate::predicate::{Operator, Predicate};
use crate::statement::Statement;
use crate::value::Value;
use std::fmt;
use std::sync::Arc;

/// Which clause the builder is currently editing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScopeKind {
    Root,
    Select,
    TableJoin,
    Condition,
    GroupBy,
    OrderBy,
    Having,
}

impl fmt::Display for ScopeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ScopeKind::Root => "ROOT",
            ScopeKind::Select => "SELECT_COLUMNS",
            ScopeKind::TableJoin => "TABLE_JOIN",
            ScopeKind::Condition => "CONDITION",
            ScopeKind::GroupBy => "GROUP_BY",
            ScopeKind::OrderBy => "ORDER_BY",
            ScopeKind::Having => "HAVING",
        })
    }
}

/// Predicate list a closed condition is appended to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PredicateTarget {
    Where,
    Having,
    /// ON list of the join at this index.
    JoinOn(usize),
}

/// An open scope on the builder stack.
#[derive(Debug, Clone)]
pub(crate) enum Scope {
    Select,
    TableJoin,
    Condition(PredicateDraft),
    GroupBy,
    OrderBy(OrderDraft),
    Having,
}

impl Scope {
    pub(crate) fn kind(&self) -> ScopeKind {
        match self {
            Scope::Select => ScopeKind::Select,
            Scope::TableJoin => ScopeKind::TableJoin,
            Scope::Condition(_) => ScopeKind::Condition,
            Scope::GroupBy => ScopeKind::GroupBy,
            Scope::OrderBy(_) => ScopeKind::OrderBy,
            Scope::Having => ScopeKind::Having,
        }
    }
}

/// Slots of a condition being edited. Each slot is overwritten by later
/// calls, except `values` which collects every supplied literal. The
/// operator decides on close what the collected values mean.
#[derive(Debug, Clone)]
pub(crate) struct PredicateDraft {
    pub(crate) target: PredicateTarget,
    pub(crate) operator: Option<Operator>,
    pub(crate) left: Option<Operand>,
    pub(crate) right: Option<Operand>,
    pub(crate) low: Option<Operand>,
    pub(crate) high: Option<Operand>,
    pub(crate) values: Vec<Value>,
    pub(crate) query: Option<Arc<Statement>>,
}

impl PredicateDraft {
    pub(crate) fn new(target: PredicateTarget, operator: Option<Operator>) -> Self {
        Self {
            target,
            operator,
            left: None,
            right: None,
            low: None,
            high: None,
            values: Vec::new(),
            query: None,
        }
    }

    fn has_range(&self) -> bool {
        self.low.is_some() || self.high.is_some()
    }

    /// Validate the collected slots against the operator and freeze them.
    pub(crate) fn finish(self) -> QueryResult<Predicate> {
        let Some(op) = self.operator else {
            return Err(QueryError::malformed("condition closed without an operator"));
        };

        if matches!(op, Operator::Exists | Operator::NotExists) {
            if self.left.is_some() || self.right.is_some() || !self.values.is_empty() {
                return Err(QueryError::malformed(format!(
                    "{op} takes only a sub-statement"
                )));
            }
            let query = self
                .query
                .ok_or_else(|| QueryError::malformed(format!("{op} requires a sub-statement")))?;
            return Ok(if op == Operator::Exists {
                Predicate::exists(query)
            } else {
                Predicate::not_exists(query)
            });
        }

        let has_range = self.has_range();
        let left = self
            .left
            .ok_or_else(|| QueryError::malformed(format!("{op} requires a left operand")))?;

        match op {
            Operator::Between => {
                if self.right.is_some() || !self.values.is_empty() || self.query.is_some() {
                    return Err(QueryError::malformed("BETWEEN takes only two bounds"));
                }
                match (self.low, self.high) {
                    (Some(low), Some(high)) => Ok(Predicate::between(left, low, high)),
                    (None, _) => Err(QueryError::malformed("BETWEEN is missing its lower bound")),
                    (_, None) => Err(QueryError::malformed("BETWEEN is missing its upper bound")),
                }
            }
            Operator::In => {
                if self.right.is_some() || has_range {
                    return Err(QueryError::malformed("IN takes a value list or a sub-statement"));
                }
                match self.query {
                    Some(_) if !self.values.is_empty() => Err(QueryError::malformed(
                        "IN cannot mix a value list and a sub-statement",
                    )),
                    Some(query) => Ok(Predicate::in_query(left, query)),
                    None => Predicate::in_list(left, self.values),
                }
            }
            Operator::IsNull | Operator::IsNotNull => {
                if self.right.is_some()
                    || has_range
                    || !self.values.is_empty()
                    || self.query.is_some()
                {
                    return Err(QueryError::malformed(format!(
                        "{op} takes no right operand"
                    )));
                }
                Ok(if op == Operator::IsNull {
                    Predicate::is_null(left)
                } else {
                    Predicate::is_not_null(left)
                })
            }
            _ => {
                if has_range {
                    return Err(QueryError::malformed(format!("{op} takes no bounds")));
                }
                let mut values = self.values.into_iter();
                let value = values.next();
                if values.next().is_some() {
                    return Err(QueryError::malformed(format!(
                        "{op} takes a single value"
                    )));
                }
                let right = match (self.right, self.query, value) {
                    (Some(right), None, None) => right,
                    (None, Some(query), None) => Operand::Query(query),
                    (None, None, Some(value)) => Operand::Value(value),
                    (None, None, None) => {
                        return Err(QueryError::malformed(format!(
                            "{op} requires a right operand"
                        )));
                    }
                    _ => {
                        return Err(QueryError::malformed(format!(
                            "{op} takes exactly one of a right operand, a value or a sub-statement"
                        )));
                    }
                };
                Predicate::compare(op, left, right)
            }
        }
    }
}

/// ORDER BY key being edited.
#[derive(Debug, Clone, Default)]
pub(crate) struct OrderDraft {
    pub(crate) column: Option<Operand>,
    pub(crate) direction: Option<Direction>,
}

impl OrderDraft {
    pub(crate) fn finish(self) -> QueryResult<OrderItem> {
        let column = self
            .column
            .ok_or_else(|| QueryError::MalformedOrder("order closed without a column".to_string()))?;
        Ok(OrderItem {
            column,
            direction: self.direction,
        })
    }
}
