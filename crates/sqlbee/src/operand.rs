//! Operands: raw references, literals and embedded sub-statements.

use crate::param::ParamList;
use crate::statement::Statement;
use crate::value::Value;
use std::sync::Arc;

/// One side of a predicate, a grouping key or an ordering key.
///
/// Strings convert to [`Operand::Column`] and are rendered verbatim, so
/// `"T1.ID"` is a reference while `Value::from("T1.ID")` is a bound string.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    /// Raw column/table reference, rendered as-is.
    Column(String),
    /// Literal rendered as `?`.
    Value(Value),
    /// Sub-statement rendered as `(sql)`.
    Query(Arc<Statement>),
}

impl Operand {
    pub fn column(name: impl Into<String>) -> Self {
        Operand::Column(name.into())
    }

    pub fn value(value: impl Into<Value>) -> Self {
        Operand::Value(value.into())
    }

    pub fn query(statement: impl Into<Arc<Statement>>) -> Self {
        Operand::Query(statement.into())
    }

    /// Render the operand text, pushing its parameters in textual order.
    pub fn render(&self, params: &mut ParamList) -> String {
        match self {
            Operand::Column(name) => name.clone(),
            Operand::Value(v) => {
                params.push(v.clone());
                "?".to_string()
            }
            Operand::Query(stmt) => format!("({})", stmt.render_into(params)),
        }
    }
}

impl From<&str> for Operand {
    fn from(name: &str) -> Self {
        Operand::Column(name.to_string())
    }
}

impl From<String> for Operand {
    fn from(name: String) -> Self {
        Operand::Column(name)
    }
}

impl From<Value> for Operand {
    fn from(value: Value) -> Self {
        Operand::Value(value)
    }
}

impl From<Statement> for Operand {
    fn from(statement: Statement) -> Self {
        Operand::Query(Arc::new(statement))
    }
}

impl From<Arc<Statement>> for Operand {
    fn from(statement: Arc<Statement>) -> Self {
        Operand::Query(statement)
    }
}
