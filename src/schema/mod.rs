//! Table and column definitions.
//!
//! Schema objects are immutable once built. A [`Table`] is a cheap handle
//! (`Arc` inside) so the same definition can back any number of clause trees.

pub mod catalog;

use std::collections::HashSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::ast::{ClauseColumn, Delete, Insert, Selectable, TableRef, Update, Value};
use crate::error::{ClauseError, ClauseResult};
use crate::parser;

pub use catalog::Catalog;

/// Declared column type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    Integer,
    String,
    Text,
    Float,
    Boolean,
    Date,
    DateTime,
    Timestamp,
}

impl std::fmt::Display for ColumnType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ColumnType::Integer => write!(f, "INTEGER"),
            ColumnType::String => write!(f, "STRING"),
            ColumnType::Text => write!(f, "TEXT"),
            ColumnType::Float => write!(f, "FLOAT"),
            ColumnType::Boolean => write!(f, "BOOLEAN"),
            ColumnType::Date => write!(f, "DATE"),
            ColumnType::DateTime => write!(f, "DATETIME"),
            ColumnType::Timestamp => write!(f, "TIMESTAMP"),
        }
    }
}

/// A `table.column` reference declared on a column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForeignKey {
    pub table: String,
    pub column: String,
}

impl ForeignKey {
    pub fn new(table: impl Into<String>, column: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            column: column.into(),
        }
    }
}

impl std::str::FromStr for ForeignKey {
    type Err = ClauseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parser::parse_foreign_key(s)
    }
}

impl std::fmt::Display for ForeignKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.table, self.column)
    }
}

/// Column constraints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnOptions {
    #[serde(default)]
    pub length: Option<u32>,
    #[serde(default = "default_true")]
    pub nullable: bool,
    #[serde(default)]
    pub primary_key: bool,
    #[serde(default)]
    pub auto_increment: bool,
    #[serde(default)]
    pub foreign_key: Option<ForeignKey>,
    #[serde(default)]
    pub default: Option<Value>,
}

fn default_true() -> bool {
    true
}

impl Default for ColumnOptions {
    fn default() -> Self {
        Self {
            length: None,
            nullable: true,
            primary_key: false,
            auto_increment: false,
            foreign_key: None,
            default: None,
        }
    }
}

/// A column as declared on a table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    pub sql_type: ColumnType,
    #[serde(default)]
    pub options: ColumnOptions,
}

impl Column {
    pub fn new(name: impl Into<String>, sql_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            sql_type,
            options: ColumnOptions::default(),
        }
    }

    pub fn length(mut self, length: u32) -> Self {
        self.options.length = Some(length);
        self
    }

    pub fn not_null(mut self) -> Self {
        self.options.nullable = false;
        self
    }

    /// Primary keys are implicitly NOT NULL.
    pub fn primary_key(mut self) -> Self {
        self.options.primary_key = true;
        self.options.nullable = false;
        self
    }

    pub fn auto_increment(mut self) -> Self {
        self.options.auto_increment = true;
        self
    }

    pub fn references(mut self, table: impl Into<String>, column: impl Into<String>) -> Self {
        self.options.foreign_key = Some(ForeignKey::new(table, column));
        self
    }

    pub fn foreign_key(mut self, fk: ForeignKey) -> Self {
        self.options.foreign_key = Some(fk);
        self
    }

    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.options.default = Some(value.into());
        self
    }
}

/// The owned definition behind a [`Table`] handle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableDef {
    pub name: String,
    pub columns: Vec<Column>,
}

impl TryFrom<TableDef> for Table {
    type Error = ClauseError;

    fn try_from(def: TableDef) -> Result<Self, Self::Error> {
        Table::new(def.name, def.columns)
    }
}

impl From<Table> for TableDef {
    fn from(table: Table) -> Self {
        Arc::unwrap_or_clone(table.inner)
    }
}

/// A table definition: name plus columns in declared order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "TableDef", into = "TableDef")]
pub struct Table {
    inner: Arc<TableDef>,
}

impl Table {
    /// Build a table, rejecting an empty name or duplicate column names.
    pub fn new(name: impl Into<String>, columns: Vec<Column>) -> ClauseResult<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ClauseError::InvalidIdentifier(name));
        }
        let mut seen = HashSet::new();
        for col in &columns {
            if col.name.is_empty() {
                return Err(ClauseError::InvalidIdentifier(col.name.clone()));
            }
            if !seen.insert(col.name.as_str()) {
                return Err(ClauseError::DuplicateColumn {
                    table: name,
                    column: col.name.clone(),
                });
            }
        }
        Ok(Self {
            inner: Arc::new(TableDef { name, columns }),
        })
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    pub fn columns(&self) -> &[Column] {
        &self.inner.columns
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.inner.columns.iter().map(|c| c.name.as_str())
    }

    pub fn get_column(&self, name: &str) -> Option<&Column> {
        self.inner.columns.iter().find(|c| c.name == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.get_column(name).is_some()
    }

    /// Columns carrying a foreign key, with the key.
    pub fn foreign_keys(&self) -> impl Iterator<Item = (&Column, &ForeignKey)> {
        self.inner
            .columns
            .iter()
            .filter_map(|c| c.options.foreign_key.as_ref().map(|fk| (c, fk)))
    }

    /// Names from `names` that this table does not declare, in the given order.
    pub fn unknown_columns<'a, I>(&self, names: I) -> Vec<String>
    where
        I: IntoIterator<Item = &'a str>,
    {
        names
            .into_iter()
            .filter(|n| !self.has_column(n))
            .map(str::to_string)
            .collect()
    }

    /// Reference this table under another name.
    pub fn alias(&self, name: impl Into<String>) -> ClauseResult<Alias> {
        Alias::new(self.clone(), name)
    }

    pub fn insert(&self) -> Insert {
        Insert::new(self.clone())
    }

    pub fn update(&self) -> Update {
        Update::new(self.clone())
    }

    pub fn delete(&self) -> Delete {
        Delete::new(self.clone())
    }
}

impl Selectable for Table {
    fn table_ref(&self) -> TableRef {
        TableRef::Table(self.clone())
    }
}

/// Serialized form of an [`Alias`]; the name is checked on the way in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AliasDef {
    pub table: Table,
    pub name: String,
}

impl TryFrom<AliasDef> for Alias {
    type Error = ClauseError;

    fn try_from(def: AliasDef) -> Result<Self, Self::Error> {
        Alias::new(def.table, def.name)
    }
}

impl From<Alias> for AliasDef {
    fn from(alias: Alias) -> Self {
        Self {
            table: alias.table,
            name: alias.name,
        }
    }
}

/// A table referenced under an alias (`users AS u`).
///
/// The name is always a plain identifier, so it is rendered without quotes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "AliasDef", into = "AliasDef")]
pub struct Alias {
    pub table: Table,
    pub name: String,
}

impl Alias {
    pub fn new(table: Table, name: impl Into<String>) -> ClauseResult<Self> {
        let name = name.into();
        if !parser::is_identifier(&name) {
            return Err(ClauseError::InvalidIdentifier(name));
        }
        Ok(Self { table, name })
    }
}

impl Selectable for Alias {
    fn table_ref(&self) -> TableRef {
        TableRef::Alias(self.clone())
    }
}

/// A bare table name with no column metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableClause {
    pub name: String,
}

impl TableClause {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// A column qualified by this table name, without existence checks.
    pub fn c(&self, name: impl Into<String>) -> ClauseColumn {
        ClauseColumn::qualified(name, &self.name)
    }
}
