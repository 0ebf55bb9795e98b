//! Frozen statements and the renderer.
//!
//! A [`Statement`] is produced by [`QueryBuilder::build`](crate::QueryBuilder::build)
//! and never changes afterwards. Rendering is a pure function of the statement:
//! calling [`Statement::output`] or [`Statement::params`] any number of times,
//! from any number of threads, yields the same text and the same parameters.

use crate::clause::{JoinClause, OrderItem, SelectColumn, Table};
use crate::operand::Operand;
use crate::param::ParamList;
use crate::predicate::PredicateList;
use crate::value::Value;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Entry point a statement was created from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryKind {
    /// Top-level statement.
    Query,
    /// Statement meant to be embedded in EXISTS / IN / a comparison.
    SubQuery,
}

/// An immutable, fully-built SELECT statement.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub(crate) kind: QueryKind,
    pub(crate) columns: Vec<SelectColumn>,
    pub(crate) table: Table,
    pub(crate) joins: Vec<JoinClause>,
    pub(crate) where_list: PredicateList,
    pub(crate) group_by: Vec<Operand>,
    pub(crate) having: PredicateList,
    pub(crate) order_by: Vec<OrderItem>,
    pub(crate) offset: Option<i64>,
    pub(crate) limit: Option<i64>,
    pub(crate) count: bool,
    pub(crate) in_chunk_size: usize,
}

impl Statement {
    pub fn kind(&self) -> QueryKind {
        self.kind
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    pub fn joins(&self) -> &[JoinClause] {
        &self.joins
    }

    pub fn columns(&self) -> &[SelectColumn] {
        &self.columns
    }

    pub fn is_count(&self) -> bool {
        self.count
    }

    pub fn offset(&self) -> Option<i64> {
        self.offset
    }

    pub fn limit(&self) -> Option<i64> {
        self.limit
    }

    /// Rendered SQL text with `?` placeholders.
    pub fn output(&self) -> String {
        self.render_into(&mut ParamList::new())
    }

    /// Parameters in placeholder order.
    pub fn params(&self) -> Vec<Value> {
        let mut params = ParamList::new();
        self.render_into(&mut params);
        params.into_vec()
    }

    /// Number of bound parameters.
    pub fn param_count(&self) -> usize {
        let mut params = ParamList::new();
        self.render_into(&mut params);
        params.len()
    }

    /// Render text and parameters in one pass.
    pub fn render(&self) -> Rendered {
        let mut params = ParamList::new();
        let sql = self.render_into(&mut params);
        Rendered {
            sql,
            params: params.into_vec(),
        }
    }

    /// Render the statement, appending its parameters to `params`.
    ///
    /// Used when this statement is embedded in another one so that the
    /// sub-statement's parameters land at its textual position.
    pub fn render_into(&self, params: &mut ParamList) -> String {
        let chunk_size = self.in_chunk_size;

        let projection = if self.count {
            "COUNT(*) COUNT".to_string()
        } else if self.columns.is_empty() {
            "*".to_string()
        } else {
            self.columns
                .iter()
                .map(SelectColumn::to_sql)
                .collect::<Vec<_>>()
                .join(",")
        };

        let mut sql = format!("SELECT {} FROM {}", projection, self.table.to_sql());

        // JOINs
        for join in &self.joins {
            sql.push(' ');
            sql.push_str(&join.render(chunk_size, params));
        }

        // WHERE
        if !self.where_list.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&self.where_list.render(chunk_size, params));
        }

        // GROUP BY
        if !self.group_by.is_empty() {
            let cols: Vec<String> = self.group_by.iter().map(|c| c.render(params)).collect();
            sql.push_str(" GROUP BY ");
            sql.push_str(&cols.join(","));
        }

        // HAVING
        if !self.having.is_empty() {
            sql.push_str(" HAVING ");
            sql.push_str(&self.having.render(chunk_size, params));
        }

        // ORDER BY
        if !self.order_by.is_empty() {
            let items: Vec<String> = self.order_by.iter().map(|o| o.render(params)).collect();
            sql.push_str(" ORDER BY ");
            sql.push_str(&items.join(","));
        }

        // LIMIT offset,count (only when both bounds are set)
        if let (Some(offset), Some(limit)) = (self.offset, self.limit) {
            sql.push_str(" LIMIT ?,?");
            params.push(Value::from(offset));
            params.push(Value::from(limit));
        }

        sql
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.output())
    }
}

/// Rendered SQL text plus its ordered parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rendered {
    pub sql: String,
    pub params: Vec<Value>,
}

impl Rendered {
    /// Count of `?` placeholders in the text.
    pub fn placeholder_count(&self) -> usize {
        self.sql.matches('?').count()
    }

    /// Serialize as `{"sql": ..., "params": [...]}`.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
