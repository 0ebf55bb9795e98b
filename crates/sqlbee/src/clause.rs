//! Clause containers: tables, joins, projection columns and ordering items.

use crate::operand::Operand;
use crate::param::ParamList;
use crate::predicate::PredicateList;
use std::fmt;

/// A table reference with its alias.
///
/// # Example
///
/// ```rust
/// use sqlbee::Table;
///
/// let t = Table::new("TABLE1", "T1");
/// assert_eq!(t.to_sql(), "TABLE1 AS T1");
/// assert_eq!(Table::new("TABLE1", "").to_sql(), "TABLE1");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    pub name: String,
    pub alias: String,
    /// Optional row-type tag carried for callers; never rendered.
    pub tag: Option<i32>,
}

impl Table {
    pub fn new(name: impl Into<String>, alias: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            alias: alias.into(),
            tag: None,
        }
    }

    pub fn with_tag(mut self, tag: i32) -> Self {
        self.tag = Some(tag);
        self
    }

    pub fn to_sql(&self) -> String {
        if self.alias.is_empty() {
            self.name.clone()
        } else {
            format!("{} AS {}", self.name, self.alias)
        }
    }
}

impl<N: Into<String>, A: Into<String>> From<(N, A)> for Table {
    fn from((name, alias): (N, A)) -> Self {
        Table::new(name, alias)
    }
}

/// Join kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JoinKind {
    Inner,
    Left,
    Right,
}

impl JoinKind {
    pub fn as_sql(&self) -> &'static str {
        match self {
            JoinKind::Inner => "INNER JOIN",
            JoinKind::Left => "LEFT JOIN",
            JoinKind::Right => "RIGHT JOIN",
        }
    }
}

impl fmt::Display for JoinKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

/// One `JOIN ... ON ...` clause.
#[derive(Debug, Clone, PartialEq)]
pub struct JoinClause {
    pub kind: JoinKind,
    pub table: Table,
    pub on: PredicateList,
}

impl JoinClause {
    pub fn new(kind: JoinKind, table: Table) -> Self {
        Self {
            kind,
            table,
            on: PredicateList::new(),
        }
    }

    pub fn render(&self, chunk_size: usize, params: &mut ParamList) -> String {
        let mut sql = format!("{} {}", self.kind, self.table.to_sql());
        if !self.on.is_empty() {
            sql.push_str(" ON ");
            sql.push_str(&self.on.render(chunk_size, params));
        }
        sql
    }
}

/// A projection column, optionally aliased.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectColumn {
    pub expr: String,
    pub alias: Option<String>,
}

impl SelectColumn {
    pub fn new(expr: impl Into<String>) -> Self {
        Self {
            expr: expr.into(),
            alias: None,
        }
    }

    pub fn aliased(expr: impl Into<String>, alias: impl Into<String>) -> Self {
        Self {
            expr: expr.into(),
            alias: Some(alias.into()),
        }
    }

    /// `table.column alias`
    pub fn qualified(
        table: impl AsRef<str>,
        column: impl AsRef<str>,
        alias: impl Into<String>,
    ) -> Self {
        Self::aliased(format!("{}.{}", table.as_ref(), column.as_ref()), alias)
    }

    pub fn to_sql(&self) -> String {
        match &self.alias {
            Some(alias) if !alias.is_empty() => format!("{} {}", self.expr, alias),
            _ => self.expr.clone(),
        }
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Asc,
    Desc,
}

impl Direction {
    pub fn as_sql(&self) -> &'static str {
        match self {
            Direction::Asc => "ASC",
            Direction::Desc => "DESC",
        }
    }
}

/// One ORDER BY key.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderItem {
    pub column: Operand,
    /// `None` renders no direction keyword.
    pub direction: Option<Direction>,
}

impl OrderItem {
    pub fn render(&self, params: &mut ParamList) -> String {
        let col = self.column.render(params);
        match self.direction {
            Some(dir) => format!("{col} {}", dir.as_sql()),
            None => col,
        }
    }
}
