//! Expression and join nodes.

use serde::{Deserialize, Serialize};

use crate::ast::builders::and_;
use crate::ast::{ClauseElement, Operator, Select, Selectable, TableRef, Value};
use crate::error::{ClauseError, ClauseResult};

/// `left <op> right`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expression {
    pub left: Box<ClauseElement>,
    pub operator: Operator,
    pub right: Box<ClauseElement>,
}

impl Expression {
    pub fn new(
        left: impl Into<ClauseElement>,
        operator: Operator,
        right: impl Into<ClauseElement>,
    ) -> Self {
        Self {
            left: Box::new(left.into()),
            operator,
            right: Box::new(right.into()),
        }
    }
}

/// An element with an optional prefix operator and an optional suffix modifier.
///
/// NOT uses the prefix; ASC/DESC use the suffix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnaryExpression {
    pub element: Box<ClauseElement>,
    #[serde(default)]
    pub operator: Option<Operator>,
    #[serde(default)]
    pub modifier: Option<Operator>,
}

impl UnaryExpression {
    pub fn prefix(operator: Operator, element: impl Into<ClauseElement>) -> Self {
        Self {
            element: Box::new(element.into()),
            operator: Some(operator),
            modifier: None,
        }
    }

    pub fn suffix(element: impl Into<ClauseElement>, modifier: Operator) -> Self {
        Self {
            element: Box::new(element.into()),
            operator: None,
            modifier: Some(modifier),
        }
    }
}

/// Members joined by AND or OR.
///
/// A nested list is always stored inside a [`Grouping`] so its precedence
/// survives rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpressionList {
    pub operator: Operator,
    pub expressions: Vec<ClauseElement>,
}

impl ExpressionList {
    pub fn new<I, E>(operator: Operator, expressions: I) -> Self
    where
        I: IntoIterator<Item = E>,
        E: Into<ClauseElement>,
    {
        let mut list = Self {
            operator,
            expressions: Vec::new(),
        };
        for e in expressions {
            list.push(e);
        }
        list
    }

    pub fn push(&mut self, element: impl Into<ClauseElement>) {
        let element = match element.into() {
            nested @ ClauseElement::ExpressionList(_) => nested.group(),
            other => other,
        };
        self.expressions.push(element);
    }
}

/// Parenthesized element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Grouping {
    pub element: Box<ClauseElement>,
}

impl Grouping {
    pub fn new(element: impl Into<ClauseElement>) -> Self {
        Self {
            element: Box::new(element.into()),
        }
    }
}

/// Clauses joined by a caller-supplied separator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClauseList {
    pub clauses: Vec<ClauseElement>,
    pub separator: String,
}

impl ClauseList {
    pub fn new(clauses: Vec<ClauseElement>, separator: impl Into<String>) -> Self {
        Self {
            clauses,
            separator: separator.into(),
        }
    }

    pub fn push(&mut self, clause: impl Into<ClauseElement>) {
        self.clauses.push(clause.into());
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }
}

/// A named placeholder and its value.
///
/// `key` need not be unique; the compiler suffixes it with a per-key counter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BindParam {
    pub key: String,
    pub value: Value,
}

impl BindParam {
    pub fn new(key: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// `left [LEFT OUTER] JOIN right ON on_clause`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Join {
    pub left: ClauseElement,
    pub right: ClauseElement,
    pub on_clause: ClauseElement,
    #[serde(default)]
    pub is_outer: bool,
}

impl Join {
    pub fn new(
        left: ClauseElement,
        right: ClauseElement,
        on_clause: ClauseElement,
        is_outer: bool,
    ) -> Self {
        Self {
            left,
            right,
            on_clause,
            is_outer,
        }
    }

    /// Build a join whose ON clause comes from the foreign keys linking
    /// `right` to any table already on the left side.
    ///
    /// Each link renders as `<referenced column> = <referencing column>`;
    /// several links are ANDed.
    pub fn infer(left: ClauseElement, right: TableRef, is_outer: bool) -> ClauseResult<Self> {
        let lefts = table_refs(&left);
        let mut conditions = Vec::new();
        for l in &lefts {
            for (col, fk) in right.table().foreign_keys() {
                if fk.table == l.table().name() {
                    conditions.push(l.c(&fk.column)?.eq(right.c(&col.name)?));
                }
            }
            for (col, fk) in l.table().foreign_keys() {
                if fk.table == right.table().name() {
                    conditions.push(right.c(&fk.column)?.eq(l.c(&col.name)?));
                }
            }
        }
        let on_clause = match conditions.len() {
            0 => {
                return Err(ClauseError::NoRelationship {
                    left: lefts
                        .iter()
                        .map(|l| l.name().to_string())
                        .collect::<Vec<_>>()
                        .join(", "),
                    right: right.name().to_string(),
                });
            }
            1 => conditions.remove(0),
            _ => and_(conditions),
        };
        Ok(Self::new(left, right.into(), on_clause, is_outer))
    }

    /// Make this a LEFT OUTER JOIN.
    pub fn outer(mut self) -> Self {
        self.is_outer = true;
        self
    }

    /// Every table or alias taking part in this join, left to right.
    pub fn tables(&self) -> Vec<TableRef> {
        let mut refs = table_refs(&self.left);
        refs.extend(table_refs(&self.right));
        refs
    }

    /// Chain another inner join, inferring its ON clause.
    pub fn join(self, right: impl Into<TableRef>) -> ClauseResult<Join> {
        Join::infer(self.into(), right.into(), false)
    }

    /// Chain another left outer join, inferring its ON clause.
    pub fn outer_join(self, right: impl Into<TableRef>) -> ClauseResult<Join> {
        Join::infer(self.into(), right.into(), true)
    }

    pub fn join_on(self, right: impl Into<TableRef>, on: impl Into<ClauseElement>) -> Join {
        let right: TableRef = right.into();
        Join::new(self.into(), right.into(), on.into(), false)
    }

    pub fn outer_join_on(self, right: impl Into<TableRef>, on: impl Into<ClauseElement>) -> Join {
        let right: TableRef = right.into();
        Join::new(self.into(), right.into(), on.into(), true)
    }

    /// `SELECT <every column of every joined table> FROM <join>`.
    pub fn select(&self) -> Select {
        let columns = self
            .tables()
            .iter()
            .flat_map(TableRef::all_columns)
            .map(ClauseElement::from)
            .collect();
        Select::new(columns).from(self.clone())
    }
}

fn table_refs(element: &ClauseElement) -> Vec<TableRef> {
    match element {
        ClauseElement::Table(t) => vec![t.table_ref()],
        ClauseElement::Alias(a) => vec![a.table_ref()],
        ClauseElement::Join(j) => j.tables(),
        _ => Vec::new(),
    }
}

impl From<Expression> for ClauseElement {
    fn from(e: Expression) -> Self {
        ClauseElement::Expression(e)
    }
}

impl From<UnaryExpression> for ClauseElement {
    fn from(u: UnaryExpression) -> Self {
        ClauseElement::UnaryExpression(u)
    }
}

impl From<ExpressionList> for ClauseElement {
    fn from(l: ExpressionList) -> Self {
        ClauseElement::ExpressionList(l)
    }
}

impl From<Grouping> for ClauseElement {
    fn from(g: Grouping) -> Self {
        ClauseElement::Grouping(g)
    }
}

impl From<ClauseList> for ClauseElement {
    fn from(l: ClauseList) -> Self {
        ClauseElement::ClauseList(l)
    }
}

impl From<BindParam> for ClauseElement {
    fn from(p: BindParam) -> Self {
        ClauseElement::BindParam(p)
    }
}

impl From<Join> for ClauseElement {
    fn from(j: Join) -> Self {
        ClauseElement::Join(Box::new(j))
    }
}
