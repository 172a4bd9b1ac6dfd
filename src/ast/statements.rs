//! Statement nodes: SELECT, INSERT, UPDATE, DELETE.

use serde::{Deserialize, Serialize};

use crate::ast::{ClauseColumn, ClauseElement, ClauseList, ExpressionList, Operator, TableRef, Value};
use crate::schema::{Table, TableClause};

/// Add `condition` to an optional WHERE clause, ANDing with what is there.
fn and_where(existing: Option<ClauseElement>, condition: ClauseElement) -> ClauseElement {
    match existing {
        None => condition,
        Some(ClauseElement::ExpressionList(mut list)) if list.operator == Operator::And => {
            list.push(condition);
            list.into()
        }
        Some(other) => ExpressionList::new(Operator::And, [other, condition]).into(),
    }
}

/// Insert or replace `column` in an ordered value list.
fn set_value(values: &mut Vec<(String, Value)>, column: String, value: Value) {
    match values.iter_mut().find(|(c, _)| *c == column) {
        Some(slot) => slot.1 = value,
        None => values.push((column, value)),
    }
}

/// A SELECT statement.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Select {
    pub columns: Vec<ClauseElement>,
    /// Explicit FROM list; when empty the owners of the selected columns are used.
    #[serde(default)]
    pub froms: Vec<ClauseElement>,
    #[serde(default)]
    pub where_clause: Option<ClauseElement>,
    #[serde(default)]
    pub order_by_clause: Option<ClauseList>,
    #[serde(default)]
    pub limit: Option<u64>,
    #[serde(default)]
    pub offset: Option<u64>,
    #[serde(default)]
    pub distinct: bool,
}

impl Select {
    /// Select `items`. Tables and aliases expand to all of their columns.
    pub fn new(items: Vec<ClauseElement>) -> Self {
        let mut select = Self::default();
        for item in items {
            select = select.column(item);
        }
        select
    }

    /// Append a selected element. Tables and aliases expand to all of their columns.
    ///
    /// A join expands to the columns of every joined table and becomes an
    /// explicit FROM entry. A bare table clause has no known columns, so it
    /// is only added to the FROM list.
    pub fn column(mut self, item: impl Into<ClauseElement>) -> Self {
        match item.into() {
            ClauseElement::Table(t) => {
                self.columns
                    .extend(TableRef::Table(t).all_columns().into_iter().map(ClauseElement::from));
            }
            ClauseElement::Alias(a) => {
                self.columns
                    .extend(TableRef::Alias(a).all_columns().into_iter().map(ClauseElement::from));
            }
            ClauseElement::Join(j) => {
                self.columns.extend(
                    j.tables()
                        .iter()
                        .flat_map(TableRef::all_columns)
                        .map(ClauseElement::from),
                );
                self.add_from(ClauseElement::Join(j));
            }
            t @ ClauseElement::TableClause(_) => self.add_from(t),
            other => self.columns.push(other),
        }
        self
    }

    fn add_from(&mut self, from: ClauseElement) {
        if !self.froms.contains(&from) {
            self.froms.push(from);
        }
    }

    /// Add an explicit FROM element (table, alias or join).
    pub fn from(mut self, from: impl Into<ClauseElement>) -> Self {
        self.froms.push(from.into());
        self
    }

    /// Add a WHERE condition; repeated calls are ANDed.
    pub fn where_(mut self, condition: impl Into<ClauseElement>) -> Self {
        self.where_clause = Some(and_where(self.where_clause.take(), condition.into()));
        self
    }

    /// Append an ORDER BY term; repeated calls accumulate.
    pub fn order_by(mut self, term: impl Into<ClauseElement>) -> Self {
        self.order_by_clause
            .get_or_insert_with(|| ClauseList::new(Vec::new(), ","))
            .push(term);
        self
    }

    pub fn distinct(mut self) -> Self {
        self.distinct = true;
        self
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }

    /// The FROM list to render: the explicit one, or the distinct owners of
    /// the selected columns in first-seen order.
    pub fn effective_froms(&self) -> Vec<ClauseElement> {
        if !self.froms.is_empty() {
            return self.froms.clone();
        }
        let mut froms: Vec<ClauseElement> = Vec::new();
        for col in self.columns.iter().flat_map(column_refs) {
            let owner: ClauseElement = match (&col.table, &col.qualifier) {
                (Some(t), _) => t.clone().into(),
                (None, Some(q)) => TableClause::new(q.clone()).into(),
                (None, None) => continue,
            };
            if !froms.contains(&owner) {
                froms.push(owner);
            }
        }
        froms
    }
}

/// Column references reachable from an element, left to right.
fn column_refs(element: &ClauseElement) -> Vec<&ClauseColumn> {
    match element {
        ClauseElement::Column(c) => vec![c],
        ClauseElement::Expression(e) => {
            let mut cols = column_refs(&e.left);
            cols.extend(column_refs(&e.right));
            cols
        }
        ClauseElement::UnaryExpression(u) => column_refs(&u.element),
        ClauseElement::Grouping(g) => column_refs(&g.element),
        ClauseElement::ExpressionList(l) => l.expressions.iter().flat_map(column_refs).collect(),
        ClauseElement::ClauseList(l) => l.clauses.iter().flat_map(column_refs).collect(),
        _ => Vec::new(),
    }
}

/// An INSERT statement.
///
/// Without explicit values every column of the table is inserted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insert {
    pub table: Table,
    #[serde(default)]
    pub values: Option<Vec<(String, Value)>>,
}

impl Insert {
    pub fn new(table: Table) -> Self {
        Self { table, values: None }
    }

    /// Set column values; the given order is kept. Unknown columns fail at compile time.
    pub fn values<I, K, V>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        let slots = self.values.get_or_insert_with(Vec::new);
        for (k, v) in values {
            set_value(slots, k.into(), v.into());
        }
        self
    }
}

/// An UPDATE statement.
///
/// Without explicit values every column of the table is set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Update {
    pub table: Table,
    #[serde(default)]
    pub values: Option<Vec<(String, Value)>>,
    #[serde(default)]
    pub where_clause: Option<ClauseElement>,
}

impl Update {
    pub fn new(table: Table) -> Self {
        Self {
            table,
            values: None,
            where_clause: None,
        }
    }

    pub fn values<I, K, V>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        let slots = self.values.get_or_insert_with(Vec::new);
        for (k, v) in values {
            set_value(slots, k.into(), v.into());
        }
        self
    }

    pub fn where_(mut self, condition: impl Into<ClauseElement>) -> Self {
        self.where_clause = Some(and_where(self.where_clause.take(), condition.into()));
        self
    }
}

/// A DELETE statement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Delete {
    pub table: Table,
    #[serde(default)]
    pub where_clause: Option<ClauseElement>,
}

impl Delete {
    pub fn new(table: Table) -> Self {
        Self {
            table,
            where_clause: None,
        }
    }

    pub fn where_(mut self, condition: impl Into<ClauseElement>) -> Self {
        self.where_clause = Some(and_where(self.where_clause.take(), condition.into()));
        self
    }
}

impl From<Select> for ClauseElement {
    fn from(s: Select) -> Self {
        ClauseElement::Select(Box::new(s))
    }
}

impl From<Insert> for ClauseElement {
    fn from(i: Insert) -> Self {
        ClauseElement::Insert(i)
    }
}

impl From<Update> for ClauseElement {
    fn from(u: Update) -> Self {
        ClauseElement::Update(Box::new(u))
    }
}

impl From<Delete> for ClauseElement {
    fn from(d: Delete) -> Self {
        ClauseElement::Delete(Box::new(d))
    }
}
