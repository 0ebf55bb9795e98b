use super::scope::{OrderDraft, PredicateDraft, PredicateTarget, Scope, ScopeKind};
use crate::clause::{Direction, JoinClause, JoinKind, OrderItem, SelectColumn, Table};
use crate::config::QueryConfig;
use crate::error::{QueryError, QueryResult};
use crate::operand::Operand;
use crate::predicate::{Operator, Predicate, PredicateList};
use crate::statement::{QueryKind, Statement};
use crate::value::Value;
use std::sync::Arc;

/// Clause contents collected so far.
#[derive(Debug, Clone, Default)]
struct Model {
    columns: Vec<SelectColumn>,
    table: Option<Table>,
    joins: Vec<JoinClause>,
    where_list: PredicateList,
    group_by: Vec<Operand>,
    having: PredicateList,
    order_by: Vec<OrderItem>,
    offset: Option<i64>,
    limit: Option<i64>,
    count: bool,
}

/// Fluent, scope-driven SELECT builder.
///
/// Clause scopes are opened with [`select`](Self::select),
/// [`inner_join`](Self::inner_join), [`condition`](Self::condition),
/// [`group`](Self::group), [`order`](Self::order) or [`having`](Self::having)
/// and closed with [`end`](Self::end). Calls that make no sense in the active
/// scope poison the builder: the rejected call has no effect, every later call
/// is ignored, and [`build`](Self::build) returns the first error.
///
/// # Example
///
/// ```rust
/// use sqlbee::{query, Operator, Value};
///
/// let stmt = query()
///     .table("TABLE1", "T1")
///     .select().column("T1.*").end()
///     .condition_op(Operator::Eq).left("T1.ID").value(7).end()
///     .build()
///     .unwrap();
///
/// assert_eq!(stmt.output(), "SELECT T1.* FROM TABLE1 AS T1 WHERE (T1.ID = ?)");
/// assert_eq!(stmt.params(), vec![Value::from(7)]);
/// ```
#[derive(Debug, Clone)]
pub struct QueryBuilder {
    kind: QueryKind,
    model: Model,
    scopes: Vec<Scope>,
    config: QueryConfig,
    error: Option<QueryError>,
}

impl QueryBuilder {
    /// Create a builder for a top-level statement or a sub-statement.
    pub fn new(kind: QueryKind) -> Self {
        Self::with_config(kind, QueryConfig::default())
    }

    /// Create a builder with explicit rendering options.
    ///
    /// An invalid config poisons the builder immediately.
    pub fn with_config(kind: QueryKind, config: QueryConfig) -> Self {
        let error = config.validate().err();
        Self {
            kind,
            model: Model::default(),
            scopes: Vec::new(),
            config,
            error,
        }
    }

    pub fn kind(&self) -> QueryKind {
        self.kind
    }

    pub fn config(&self) -> &QueryConfig {
        &self.config
    }

    /// The first rejected call, if any.
    pub fn error(&self) -> Option<&QueryError> {
        self.error.as_ref()
    }

    /// Number of open scopes.
    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    /// The innermost open scope, or [`ScopeKind::Root`].
    pub fn current_scope(&self) -> ScopeKind {
        self.scopes.last().map_or(ScopeKind::Root, Scope::kind)
    }

    fn apply<F>(&mut self, f: F) -> &mut Self
    where
        F: FnOnce(&mut Self) -> QueryResult<()>,
    {
        if self.error.is_some() {
            return self;
        }
        if let Err(err) = f(self) {
            #[cfg(feature = "tracing")]
            tracing::warn!(
                target: "sqlbee.builder",
                scope = %self.current_scope(),
                error = %err,
                "builder call rejected"
            );
            self.error = Some(err);
        }
        self
    }

    fn mismatch(scope: Option<&Scope>, operation: &'static str) -> QueryError {
        QueryError::ScopeMismatch {
            scope: scope.map_or(ScopeKind::Root, Scope::kind),
            operation,
        }
    }

    /// Close an innermost table/join scope. It holds no draft, so any call
    /// that does not belong to it ends it.
    fn leave_table_scope(&mut self) {
        if matches!(self.scopes.last(), Some(Scope::TableJoin)) {
            self.scopes.pop();
        }
    }

    fn at_root(&mut self, operation: &'static str) -> QueryResult<()> {
        self.leave_table_scope();
        match self.scopes.last() {
            None => Ok(()),
            Some(scope) => Err(Self::mismatch(Some(scope), operation)),
        }
    }

    fn enter(&mut self, scope: Scope) -> QueryResult<()> {
        self.leave_table_scope();
        if let Some(open) = self.scopes.last() {
            return Err(QueryError::UnbalancedScope {
                open: open.kind(),
                requested: scope.kind(),
            });
        }
        self.scopes.push(scope);
        Ok(())
    }

    /// Where a predicate created in the active scope belongs.
    ///
    /// Inside a table/join scope it targets the latest join's ON list; with
    /// no join yet the scope is closed and the predicate goes to WHERE.
    fn predicate_target(&mut self, requested: ScopeKind) -> QueryResult<PredicateTarget> {
        if matches!(self.scopes.last(), Some(Scope::TableJoin)) {
            match self.model.joins.len() {
                0 => self.leave_table_scope(),
                n => return Ok(PredicateTarget::JoinOn(n - 1)),
            }
        }
        match self.scopes.last() {
            None => Ok(PredicateTarget::Where),
            Some(Scope::Having) => Ok(PredicateTarget::Having),
            Some(open) => Err(QueryError::UnbalancedScope {
                open: open.kind(),
                requested,
            }),
        }
    }

    fn push_predicate(&mut self, target: PredicateTarget, predicate: Predicate) {
        match target {
            PredicateTarget::Where => self.model.where_list.push(predicate),
            PredicateTarget::Having => self.model.having.push(predicate),
            PredicateTarget::JoinOn(index) => self.model.joins[index].on.push(predicate),
        }
    }

    fn draft(&mut self, operation: &'static str) -> QueryResult<&mut PredicateDraft> {
        match self.scopes.last_mut() {
            Some(Scope::Condition(draft)) => Ok(draft),
            other => Err(Self::mismatch(other.map(|s| &*s), operation)),
        }
    }

    fn order_draft(&mut self, operation: &'static str) -> QueryResult<&mut OrderDraft> {
        match self.scopes.last_mut() {
            Some(Scope::OrderBy(draft)) => Ok(draft),
            other => Err(Self::mismatch(other.map(|s| &*s), operation)),
        }
    }

    /// Close the innermost scope.
    ///
    /// Closing a condition validates its shape and appends it to the WHERE,
    /// HAVING or ON list it was opened for. Closing an order appends one
    /// ORDER BY key.
    pub fn end(&mut self) -> &mut Self {
        self.apply(|b| {
            // Validate before popping so a rejected end() leaves the stack as is.
            let scope = b.scopes.last().cloned().ok_or(QueryError::ScopeUnderflow)?;
            match scope {
                Scope::Condition(draft) => {
                    let target = draft.target;
                    let predicate = draft.finish()?;
                    b.push_predicate(target, predicate);
                }
                Scope::OrderBy(draft) => {
                    let item = draft.finish()?;
                    b.model.order_by.push(item);
                }
                Scope::Select | Scope::TableJoin | Scope::GroupBy | Scope::Having => {}
            }
            b.scopes.pop();
            Ok(())
        })
    }

    // ==================== Tables ====================

    /// Set the primary table and open the table/join scope.
    ///
    /// Replaces any previous table. The scope is closed by `end()` or by the
    /// first call that does not add a join, so both
    /// `table(..).end().select()` and `table(..).select()` work.
    pub fn table(&mut self, name: impl Into<String>, alias: impl Into<String>) -> &mut Self {
        self.from(Table::new(name, alias))
    }

    /// Set the primary table from a [`Table`], see [`table`](Self::table).
    pub fn from(&mut self, table: impl Into<Table>) -> &mut Self {
        let table = table.into();
        self.apply(move |b| {
            match b.scopes.last() {
                None => b.scopes.push(Scope::TableJoin),
                Some(Scope::TableJoin) => {}
                other => return Err(Self::mismatch(other, "table")),
            }
            b.model.table = Some(table);
            Ok(())
        })
    }

    /// Open the table/join scope without adding a join.
    pub fn tables(&mut self) -> &mut Self {
        self.apply(|b| b.enter(Scope::TableJoin))
    }

    /// Add a join. Opens the table/join scope from root, or stays in it.
    pub fn join(&mut self, kind: JoinKind, table: impl Into<Table>) -> &mut Self {
        let table = table.into();
        self.apply(move |b| {
            if !matches!(b.scopes.last(), Some(Scope::TableJoin)) {
                b.enter(Scope::TableJoin)?;
            }
            b.model.joins.push(JoinClause::new(kind, table));
            Ok(())
        })
    }

    pub fn inner_join(&mut self, table: impl Into<Table>) -> &mut Self {
        self.join(JoinKind::Inner, table)
    }

    pub fn left_join(&mut self, table: impl Into<Table>) -> &mut Self {
        self.join(JoinKind::Left, table)
    }

    pub fn right_join(&mut self, table: impl Into<Table>) -> &mut Self {
        self.join(JoinKind::Right, table)
    }

    /// Append `left = right` to the latest join's ON list.
    pub fn on(&mut self, left: impl Into<Operand>, right: impl Into<Operand>) -> &mut Self {
        let predicate = Predicate::eq(left, right);
        self.apply(move |b| {
            match b.scopes.last() {
                Some(Scope::TableJoin) => {}
                other => return Err(Self::mismatch(other, "on")),
            }
            let join = b
                .model
                .joins
                .last_mut()
                .ok_or_else(|| QueryError::malformed("ON predicate without a join"))?;
            join.on.push(predicate);
            Ok(())
        })
    }

    // ==================== Projection ====================

    /// Open the projection scope.
    pub fn select(&mut self) -> &mut Self {
        self.apply(|b| b.enter(Scope::Select))
    }

    /// Add a column to the active scope.
    ///
    /// - SELECT: a projection column
    /// - GROUP BY: a grouping column
    /// - ORDER BY: the order key
    /// - CONDITION: the left operand
    pub fn column(&mut self, name: impl Into<String>) -> &mut Self {
        let name = name.into();
        self.apply(move |b| match b.scopes.last_mut() {
            Some(Scope::Select) => {
                b.model.columns.push(SelectColumn::new(name));
                Ok(())
            }
            Some(Scope::GroupBy) => {
                b.model.group_by.push(Operand::Column(name));
                Ok(())
            }
            Some(Scope::OrderBy(draft)) => {
                draft.column = Some(Operand::Column(name));
                Ok(())
            }
            Some(Scope::Condition(draft)) => {
                draft.left = Some(Operand::Column(name));
                Ok(())
            }
            other => Err(Self::mismatch(other.map(|s| &*s), "column")),
        })
    }

    /// Add an aliased projection column: `expr alias`.
    pub fn column_as(&mut self, expr: impl Into<String>, alias: impl Into<String>) -> &mut Self {
        self.push_column(SelectColumn::aliased(expr, alias))
    }

    /// Add a qualified projection column: `table.column alias`.
    pub fn table_column(
        &mut self,
        table: impl AsRef<str>,
        column: impl AsRef<str>,
        alias: impl Into<String>,
    ) -> &mut Self {
        self.push_column(SelectColumn::qualified(table, column, alias))
    }

    fn push_column(&mut self, column: SelectColumn) -> &mut Self {
        self.apply(move |b| match b.scopes.last() {
            Some(Scope::Select) => {
                b.model.columns.push(column);
                Ok(())
            }
            other => Err(Self::mismatch(other, "column_as")),
        })
    }

    /// Render `COUNT(*) COUNT` instead of the projection.
    pub fn count(&mut self, on: bool) -> &mut Self {
        self.apply(move |b| {
            b.at_root("count")?;
            b.model.count = on;
            Ok(())
        })
    }

    // ==================== Conditions ====================

    fn open_condition(&mut self, operator: Option<Operator>) -> &mut Self {
        self.apply(move |b| {
            let target = b.predicate_target(ScopeKind::Condition)?;
            b.scopes
                .push(Scope::Condition(PredicateDraft::new(target, operator)));
            Ok(())
        })
    }

    /// Open a condition scope. The operator must be set before `end()`.
    ///
    /// From root the condition lands in WHERE, inside `having()` in HAVING,
    /// and inside a join scope in the latest join's ON list.
    pub fn condition(&mut self) -> &mut Self {
        self.open_condition(None)
    }

    /// Open a condition scope with its operator preset.
    pub fn condition_op(&mut self, op: Operator) -> &mut Self {
        self.open_condition(Some(op))
    }

    /// Open an `IS NULL` condition.
    pub fn is_null(&mut self) -> &mut Self {
        self.open_condition(Some(Operator::IsNull))
    }

    /// Open an `IS NOT NULL` condition.
    pub fn is_not_null(&mut self) -> &mut Self {
        self.open_condition(Some(Operator::IsNotNull))
    }

    /// Open a `BETWEEN` condition.
    pub fn between(&mut self) -> &mut Self {
        self.open_condition(Some(Operator::Between))
    }

    /// Open an `IN` condition.
    pub fn in_list(&mut self) -> &mut Self {
        self.open_condition(Some(Operator::In))
    }

    /// Open an `EXISTS` condition.
    pub fn exists(&mut self) -> &mut Self {
        self.open_condition(Some(Operator::Exists))
    }

    /// Open a `NOT EXISTS` condition.
    pub fn not_exists(&mut self) -> &mut Self {
        self.open_condition(Some(Operator::NotExists))
    }

    /// Set the operator of the open condition.
    pub fn operator(&mut self, op: Operator) -> &mut Self {
        self.apply(move |b| {
            b.draft("operator")?.operator = Some(op);
            Ok(())
        })
    }

    /// Set the operator of the open condition from its SQL spelling.
    pub fn operator_str(&mut self, op: &str) -> &mut Self {
        let parsed = Operator::parse(op);
        self.apply(move |b| {
            let op = parsed?;
            b.draft("operator")?.operator = Some(op);
            Ok(())
        })
    }

    /// Set the left operand.
    pub fn left(&mut self, operand: impl Into<Operand>) -> &mut Self {
        let operand = operand.into();
        self.apply(move |b| {
            b.draft("left")?.left = Some(operand);
            Ok(())
        })
    }

    /// Set the right operand.
    pub fn right(&mut self, operand: impl Into<Operand>) -> &mut Self {
        let operand = operand.into();
        self.apply(move |b| {
            b.draft("right")?.right = Some(operand);
            Ok(())
        })
    }

    /// Set the lower `BETWEEN` bound.
    pub fn lower(&mut self, operand: impl Into<Operand>) -> &mut Self {
        let operand = operand.into();
        self.apply(move |b| {
            b.draft("lower")?.low = Some(operand);
            Ok(())
        })
    }

    /// Set the upper `BETWEEN` bound.
    pub fn upper(&mut self, operand: impl Into<Operand>) -> &mut Self {
        let operand = operand.into();
        self.apply(move |b| {
            b.draft("upper")?.high = Some(operand);
            Ok(())
        })
    }

    /// Supply a bound value.
    ///
    /// Values are collected until the condition is closed: `IN` takes them
    /// all as its list, a comparison takes exactly one as its right operand.
    pub fn value(&mut self, value: impl Into<Value>) -> &mut Self {
        let value = value.into();
        self.apply(move |b| {
            b.draft("value")?.values.push(value);
            Ok(())
        })
    }

    /// Supply several bound values at once, see [`value`](Self::value).
    pub fn values<V, I>(&mut self, values: I) -> &mut Self
    where
        V: Into<Value>,
        I: IntoIterator<Item = V>,
    {
        let values: Vec<Value> = values.into_iter().map(Into::into).collect();
        self.apply(move |b| {
            b.draft("values")?.values.extend(values);
            Ok(())
        })
    }

    /// Attach a sub-statement: the body of `EXISTS`/`IN`, or the right
    /// operand of a comparison when no other right operand is set.
    pub fn sub(&mut self, statement: impl Into<Arc<Statement>>) -> &mut Self {
        let statement = statement.into();
        self.apply(move |b| {
            b.draft("sub")?.query = Some(statement);
            Ok(())
        })
    }

    /// Append a ready-made predicate to the active predicate list.
    pub fn filter(&mut self, predicate: Predicate) -> &mut Self {
        self.apply(move |b| {
            let target = b.predicate_target(ScopeKind::Condition)?;
            b.push_predicate(target, predicate);
            Ok(())
        })
    }

    // ==================== Grouping ====================

    /// Open the GROUP BY scope.
    pub fn group(&mut self) -> &mut Self {
        self.apply(|b| b.enter(Scope::GroupBy))
    }

    /// Append a grouping column without opening a scope.
    pub fn group_by(&mut self, column: impl Into<String>) -> &mut Self {
        let column = column.into();
        self.apply(move |b| {
            b.at_root("group_by")?;
            b.model.group_by.push(Operand::Column(column));
            Ok(())
        })
    }

    /// Open the HAVING scope. Conditions opened inside land in HAVING.
    pub fn having(&mut self) -> &mut Self {
        self.apply(|b| b.enter(Scope::Having))
    }

    /// Append a ready-made predicate to HAVING.
    pub fn having_predicate(&mut self, predicate: Predicate) -> &mut Self {
        self.apply(move |b| {
            b.at_root("having_predicate")?;
            b.model.having.push(predicate);
            Ok(())
        })
    }

    // ==================== Ordering ====================

    /// Open an ORDER BY scope for one key.
    pub fn order(&mut self) -> &mut Self {
        self.apply(|b| b.enter(Scope::OrderBy(OrderDraft::default())))
    }

    /// Open an ORDER BY scope with its key preset.
    pub fn order_by(&mut self, column: impl Into<Operand>) -> &mut Self {
        let column = column.into();
        self.apply(move |b| {
            b.enter(Scope::OrderBy(OrderDraft {
                column: Some(column),
                direction: None,
            }))
        })
    }

    pub fn asc(&mut self) -> &mut Self {
        self.apply(|b| {
            b.order_draft("asc")?.direction = Some(Direction::Asc);
            Ok(())
        })
    }

    pub fn desc(&mut self) -> &mut Self {
        self.apply(|b| {
            b.order_draft("desc")?.direction = Some(Direction::Desc);
            Ok(())
        })
    }

    /// Drop every ORDER BY key collected so far.
    pub fn remove_order(&mut self) -> &mut Self {
        self.apply(|b| {
            b.at_root("remove_order")?;
            b.model.order_by.clear();
            Ok(())
        })
    }

    // ==================== Pagination ====================

    /// Row offset. Rendered only together with `max_results`.
    pub fn first_results(&mut self, offset: i64) -> &mut Self {
        self.apply(move |b| {
            b.at_root("first_results")?;
            b.model.offset = Some(offset);
            Ok(())
        })
    }

    /// Row count. Rendered only together with `first_results`.
    pub fn max_results(&mut self, limit: i64) -> &mut Self {
        self.apply(move |b| {
            b.at_root("max_results")?;
            b.model.limit = Some(limit);
            Ok(())
        })
    }

    pub fn remove_first_results(&mut self) -> &mut Self {
        self.apply(|b| {
            b.at_root("remove_first_results")?;
            b.model.offset = None;
            Ok(())
        })
    }

    pub fn remove_max_results(&mut self) -> &mut Self {
        self.apply(|b| {
            b.at_root("remove_max_results")?;
            b.model.limit = None;
            Ok(())
        })
    }

    // ==================== Build ====================

    /// Freeze the collected clauses into a [`Statement`].
    ///
    /// Fails with the first rejected call, with [`QueryError::OpenScopes`]
    /// when scopes other than a lone table/join scope are still open, or
    /// with [`QueryError::MissingTable`]. The builder is left untouched and
    /// may keep being used.
    pub fn build(&self) -> QueryResult<Statement> {
        if let Some(err) = &self.error {
            return Err(err.clone());
        }
        let open = match self.scopes.as_slice() {
            [Scope::TableJoin] => &[][..],
            scopes => scopes,
        };
        if let Some(innermost) = open.last() {
            return Err(QueryError::OpenScopes {
                depth: open.len(),
                innermost: innermost.kind(),
            });
        }
        let table = self.model.table.clone().ok_or(QueryError::MissingTable)?;

        let model = self.model.clone();
        let statement = Statement {
            kind: self.kind,
            columns: model.columns,
            table,
            joins: model.joins,
            where_list: model.where_list,
            group_by: model.group_by,
            having: model.having,
            order_by: model.order_by,
            offset: model.offset,
            limit: model.limit,
            count: model.count,
            in_chunk_size: self.config.in_chunk_size,
        };

        #[cfg(feature = "tracing")]
        self.log_statement(&statement);

        Ok(statement)
    }

    #[cfg(feature = "tracing")]
    fn log_statement(&self, statement: &Statement) {
        if !tracing::enabled!(target: "sqlbee.sql", tracing::Level::DEBUG) {
            return;
        }
        let rendered = statement.render();
        let sql = match self.config.max_logged_sql_length {
            Some(max) if rendered.sql.len() > max => {
                format!("{}...", crate::config::truncate_sql_bytes(&rendered.sql, max))
            }
            _ => rendered.sql,
        };
        tracing::debug!(
            target: "sqlbee.sql",
            kind = ?statement.kind(),
            params = rendered.params.len(),
            joins = statement.joins().len(),
            sql = %sql,
            "statement built"
        );
    }
}

impl Default for QueryBuilder {
    fn default() -> Self {
        Self::new(QueryKind::Query)
    }
}
