//! The closed set of clause-tree nodes.

use serde::{Deserialize, Serialize};

use crate::ast::{
    BindParam, ClauseList, Delete, Expression, ExpressionList, Grouping, Insert, Join, Select,
    UnaryExpression, Update,
};
use crate::error::{ClauseError, ClauseResult};
use crate::schema::{Alias, Table, TableClause};

/// Any node of a clause tree.
///
/// Adding a construct means adding a variant here and a match arm in the
/// compiler; there is no fallback rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum ClauseElement {
    Table(Table),
    TableClause(TableClause),
    Alias(Alias),
    Column(ClauseColumn),
    Expression(Expression),
    UnaryExpression(UnaryExpression),
    ExpressionList(ExpressionList),
    Grouping(Grouping),
    ClauseList(ClauseList),
    BindParam(BindParam),
    Null,
    Join(Box<Join>),
    Select(Box<Select>),
    Insert(Insert),
    Update(Box<Update>),
    Delete(Box<Delete>),
}

impl ClauseElement {
    /// Every `kind` tag the compiler can render.
    pub const KINDS: &'static [&'static str] = &[
        "Table",
        "TableClause",
        "Alias",
        "Column",
        "Expression",
        "UnaryExpression",
        "ExpressionList",
        "Grouping",
        "ClauseList",
        "BindParam",
        "Null",
        "Join",
        "Select",
        "Insert",
        "Update",
        "Delete",
    ];

    /// The `kind` tag of this node.
    pub fn kind(&self) -> &'static str {
        match self {
            ClauseElement::Table(_) => "Table",
            ClauseElement::TableClause(_) => "TableClause",
            ClauseElement::Alias(_) => "Alias",
            ClauseElement::Column(_) => "Column",
            ClauseElement::Expression(_) => "Expression",
            ClauseElement::UnaryExpression(_) => "UnaryExpression",
            ClauseElement::ExpressionList(_) => "ExpressionList",
            ClauseElement::Grouping(_) => "Grouping",
            ClauseElement::ClauseList(_) => "ClauseList",
            ClauseElement::BindParam(_) => "BindParam",
            ClauseElement::Null => "Null",
            ClauseElement::Join(_) => "Join",
            ClauseElement::Select(_) => "Select",
            ClauseElement::Insert(_) => "Insert",
            ClauseElement::Update(_) => "Update",
            ClauseElement::Delete(_) => "Delete",
        }
    }

    /// Wrap this node in parentheses.
    pub fn group(self) -> ClauseElement {
        ClauseElement::Grouping(Grouping::new(self))
    }

    /// Load a tree from its JSON form.
    ///
    /// Every `kind` tag in the document is checked against [`Self::KINDS`]
    /// before deserializing, so an unsupported node is reported by name.
    pub fn from_json(json: &str) -> ClauseResult<ClauseElement> {
        let doc: serde_json::Value = serde_json::from_str(json)?;
        check_kinds(&doc)?;
        Ok(serde_json::from_value(doc)?)
    }

    pub fn to_json(&self) -> ClauseResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

fn check_kinds(doc: &serde_json::Value) -> ClauseResult<()> {
    match doc {
        serde_json::Value::Object(map) => {
            if let Some(serde_json::Value::String(kind)) = map.get("kind") {
                if !ClauseElement::KINDS.contains(&kind.as_str()) {
                    return Err(ClauseError::UnknownClauseElementType(kind.clone()));
                }
            }
            map.values().try_for_each(check_kinds)
        }
        serde_json::Value::Array(items) => items.iter().try_for_each(check_kinds),
        _ => Ok(()),
    }
}

/// Something a column can belong to and a query can select from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum TableRef {
    Table(Table),
    Alias(Alias),
}

impl TableRef {
    /// The name columns are qualified with: the alias name when aliased.
    pub fn name(&self) -> &str {
        match self {
            TableRef::Table(t) => t.name(),
            TableRef::Alias(a) => &a.name,
        }
    }

    /// The underlying table definition.
    pub fn table(&self) -> &Table {
        match self {
            TableRef::Table(t) => t,
            TableRef::Alias(a) => &a.table,
        }
    }

    /// Look up a declared column, qualified by this reference.
    pub fn c(&self, name: &str) -> ClauseResult<ClauseColumn> {
        if !self.table().has_column(name) {
            return Err(ClauseError::unknown_column(self.table().name(), name));
        }
        Ok(ClauseColumn {
            name: name.to_string(),
            table: Some(self.clone()),
            qualifier: None,
        })
    }

    /// All declared columns in order, qualified by this reference.
    pub fn all_columns(&self) -> Vec<ClauseColumn> {
        self.table()
            .column_names()
            .map(|name| ClauseColumn {
                name: name.to_string(),
                table: Some(self.clone()),
                qualifier: None,
            })
            .collect()
    }
}

impl From<Table> for TableRef {
    fn from(t: Table) -> Self {
        TableRef::Table(t)
    }
}

impl From<&Table> for TableRef {
    fn from(t: &Table) -> Self {
        TableRef::Table(t.clone())
    }
}

impl From<Alias> for TableRef {
    fn from(a: Alias) -> Self {
        TableRef::Alias(a)
    }
}

impl From<&Alias> for TableRef {
    fn from(a: &Alias) -> Self {
        TableRef::Alias(a.clone())
    }
}

impl From<TableRef> for ClauseElement {
    fn from(r: TableRef) -> Self {
        match r {
            TableRef::Table(t) => ClauseElement::Table(t),
            TableRef::Alias(a) => ClauseElement::Alias(a),
        }
    }
}

/// A column reference inside a clause tree.
///
/// `table` is a back-reference for qualification only; without it the
/// column renders unqualified.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClauseColumn {
    pub name: String,
    #[serde(default)]
    pub table: Option<TableRef>,
    /// Bare table name for columns built from a [`TableClause`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qualifier: Option<String>,
}

impl ClauseColumn {
    /// A free-standing, unqualified column.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            table: None,
            qualifier: None,
        }
    }

    /// A column qualified by a bare table name.
    pub fn qualified(name: impl Into<String>, qualifier: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            table: None,
            qualifier: Some(qualifier.into()),
        }
    }

    /// Name of the owner used for qualification, if any.
    pub fn owner_name(&self) -> Option<&str> {
        self.table
            .as_ref()
            .map(TableRef::name)
            .or(self.qualifier.as_deref())
    }
}

/// Shorthand for [`ClauseColumn::new`].
pub fn column(name: impl Into<String>) -> ClauseColumn {
    ClauseColumn::new(name)
}

/// Tables and aliases: column lookup, selects and joins.
pub trait Selectable {
    fn table_ref(&self) -> TableRef;

    /// Look up a declared column (UnknownColumn if absent).
    fn c(&self, name: &str) -> ClauseResult<ClauseColumn> {
        self.table_ref().c(name)
    }

    /// `SELECT <every column> FROM <self>`.
    fn select(&self) -> Select {
        let from = self.table_ref();
        Select::new(vec![from.into()])
    }

    /// `SELECT <named columns> FROM <self>`.
    fn select_columns<S: AsRef<str>>(&self, names: &[S]) -> ClauseResult<Select> {
        let from = self.table_ref();
        let cols = names
            .iter()
            .map(|n| from.c(n.as_ref()).map(ClauseElement::from))
            .collect::<ClauseResult<Vec<_>>>()?;
        Ok(Select::new(cols))
    }

    /// Inner join with the ON clause inferred from foreign keys.
    fn join(&self, right: impl Into<TableRef>) -> ClauseResult<Join> {
        Join::infer(self.table_ref().into(), right.into(), false)
    }

    /// Left outer join with the ON clause inferred from foreign keys.
    fn outer_join(&self, right: impl Into<TableRef>) -> ClauseResult<Join> {
        Join::infer(self.table_ref().into(), right.into(), true)
    }

    fn join_on(&self, right: impl Into<TableRef>, on: impl Into<ClauseElement>) -> Join {
        let right: TableRef = right.into();
        Join::new(self.table_ref().into(), right.into(), on.into(), false)
    }

    fn outer_join_on(&self, right: impl Into<TableRef>, on: impl Into<ClauseElement>) -> Join {
        let right: TableRef = right.into();
        Join::new(self.table_ref().into(), right.into(), on.into(), true)
    }
}

impl Selectable for TableRef {
    fn table_ref(&self) -> TableRef {
        self.clone()
    }
}

impl From<Table> for ClauseElement {
    fn from(t: Table) -> Self {
        ClauseElement::Table(t)
    }
}

impl From<&Table> for ClauseElement {
    fn from(t: &Table) -> Self {
        ClauseElement::Table(t.clone())
    }
}

impl From<Alias> for ClauseElement {
    fn from(a: Alias) -> Self {
        ClauseElement::Alias(a)
    }
}

impl From<TableClause> for ClauseElement {
    fn from(t: TableClause) -> Self {
        ClauseElement::TableClause(t)
    }
}

impl From<ClauseColumn> for ClauseElement {
    fn from(c: ClauseColumn) -> Self {
        ClauseElement::Column(c)
    }
}

impl From<&ClauseColumn> for ClauseElement {
    fn from(c: &ClauseColumn) -> Self {
        ClauseElement::Column(c.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Column, ColumnType};

    fn users() -> Table {
        Table::new("users", vec![Column::new("id", ColumnType::Integer)]).unwrap()
    }

    #[test]
    fn test_lookup_unknown_column() {
        let err = users().c("nope").unwrap_err();
        assert_eq!(err.to_string(), "Unknown column(s) nope in users table");
    }

    #[test]
    fn test_alias_qualifies_columns() {
        let u = users().alias("u").unwrap();
        assert_eq!(u.c("id").unwrap().owner_name(), Some("u"));
        assert_eq!(users().c("id").unwrap().owner_name(), Some("users"));
        assert_eq!(column("id").owner_name(), None);
    }

    #[test]
    fn test_from_json_rejects_unknown_kind() {
        let json = r#"{"kind":"Grouping","element":{"kind":"Subquery"}}"#;
        match ClauseElement::from_json(json) {
            Err(ClauseError::UnknownClauseElementType(kind)) => assert_eq!(kind, "Subquery"),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_from_json_validates_alias_name() {
        let alias: ClauseElement = users().alias("u").unwrap().into();
        let json = alias.to_json().unwrap();
        assert_eq!(ClauseElement::from_json(&json).unwrap(), alias);

        let bad = json.replace(r#""name": "u""#, r#""name": "u; DROP TABLE users; --""#);
        assert_ne!(bad, json);
        assert!(matches!(
            ClauseElement::from_json(&bad),
            Err(ClauseError::Json(_))
        ));
    }

    #[test]
    fn test_json_round_trip() {
        let el: ClauseElement = users().c("id").unwrap().eq(1).into();
        let back = ClauseElement::from_json(&el.to_json().unwrap()).unwrap();
        assert_eq!(back, el);
    }
}
