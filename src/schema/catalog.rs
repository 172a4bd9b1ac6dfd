//! Schema catalog loaded from TOML.
//!
//! ```toml
//! [[tables]]
//! name = "users"
//!
//! [[tables.columns]]
//! name = "id"
//! type = "integer"
//! primary_key = true
//!
//! [[tables.columns]]
//! name = "firstname"
//! type = "string(50)"
//! ```

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::ast::Value;
use crate::error::{ClauseError, ClauseResult};
use crate::parser;
use crate::schema::{Column, ColumnOptions, Table};

/// Column entry in a schema file.
#[derive(Debug, Clone, Deserialize)]
struct ColumnDef {
    name: String,
    #[serde(rename = "type")]
    col_type: String,
    #[serde(default)]
    length: Option<u32>,
    #[serde(default)]
    nullable: Option<bool>,
    #[serde(default)]
    primary_key: bool,
    #[serde(default)]
    auto_increment: bool,
    /// `table.column`
    #[serde(default)]
    references: Option<String>,
    #[serde(default)]
    default: Option<Value>,
}

impl ColumnDef {
    fn into_column(self) -> ClauseResult<Column> {
        let (sql_type, declared_length) = parser::parse_column_type(&self.col_type)?;
        let foreign_key = self
            .references
            .as_deref()
            .map(parser::parse_foreign_key)
            .transpose()?;
        Ok(Column {
            name: self.name,
            sql_type,
            options: ColumnOptions {
                length: self.length.or(declared_length),
                nullable: self.nullable.unwrap_or(!self.primary_key),
                primary_key: self.primary_key,
                auto_increment: self.auto_increment,
                foreign_key,
                default: self.default,
            },
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
struct TableEntry {
    name: String,
    #[serde(default)]
    columns: Vec<ColumnDef>,
}

#[derive(Debug, Clone, Deserialize)]
struct SchemaFile {
    #[serde(default)]
    tables: Vec<TableEntry>,
}

/// A named set of tables whose foreign keys all resolve.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    tables: Vec<Table>,
    index: HashMap<String, usize>,
}

impl Catalog {
    /// Build a catalog, rejecting duplicate table names and foreign keys
    /// that point at a missing table or column.
    pub fn new(tables: Vec<Table>) -> ClauseResult<Self> {
        let mut index = HashMap::new();
        for (i, table) in tables.iter().enumerate() {
            if index.insert(table.name().to_string(), i).is_some() {
                return Err(ClauseError::Schema(format!(
                    "table '{}' is defined twice",
                    table.name()
                )));
            }
        }

        for table in &tables {
            for (col, fk) in table.foreign_keys() {
                let target = index.get(&fk.table).map(|&i| &tables[i]).ok_or_else(|| {
                    ClauseError::Schema(format!(
                        "{}.{} references unknown table '{}'",
                        table.name(),
                        col.name,
                        fk.table
                    ))
                })?;
                if !target.has_column(&fk.column) {
                    return Err(ClauseError::Schema(format!(
                        "{}.{} references unknown column {}",
                        table.name(),
                        col.name,
                        fk
                    )));
                }
            }
        }

        Ok(Self { tables, index })
    }

    pub fn from_toml_str(content: &str) -> ClauseResult<Self> {
        let file: SchemaFile = toml::from_str(content)
            .map_err(|e| ClauseError::Schema(format!("Failed to parse schema: {}", e)))?;

        let mut tables = Vec::with_capacity(file.tables.len());
        for entry in file.tables {
            let columns = entry
                .columns
                .into_iter()
                .map(ColumnDef::into_column)
                .collect::<ClauseResult<Vec<_>>>()?;
            tracing::debug!("Loaded schema for table: {}", entry.name);
            tables.push(Table::new(entry.name, columns)?);
        }
        Self::new(tables)
    }

    /// Load a schema file.
    pub fn load(path: impl AsRef<Path>) -> ClauseResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let catalog = Self::from_toml_str(&content)?;
        tracing::info!("Loaded {} tables from {}", catalog.len(), path.display());
        Ok(catalog)
    }

    pub fn get(&self, name: &str) -> Option<&Table> {
        self.index.get(name).map(|&i| &self.tables[i])
    }

    /// Like [`Catalog::get`], failing with a schema error when absent.
    pub fn table(&self, name: &str) -> ClauseResult<&Table> {
        self.get(name)
            .ok_or_else(|| ClauseError::Schema(format!("Table '{}' not found in schema", name)))
    }

    /// Tables in file order.
    pub fn tables(&self) -> &[Table] {
        &self.tables
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.tables.iter().map(Table::name)
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{ColumnType, ForeignKey};

    const SCHEMA: &str = r#"
[[tables]]
name = "users"

[[tables.columns]]
name = "id"
type = "integer"
primary_key = true
auto_increment = true

[[tables.columns]]
name = "firstname"
type = "string(50)"

[[tables.columns]]
name = "active"
type = "boolean"
nullable = false
default = true

[[tables]]
name = "addresses"

[[tables.columns]]
name = "user_id"
type = "integer"
references = "users.id"

[[tables.columns]]
name = "email_address"
type = "string"
"#;

    #[test]
    fn test_load_catalog() {
        let catalog = Catalog::from_toml_str(SCHEMA).unwrap();
        assert_eq!(catalog.names().collect::<Vec<_>>(), vec!["users", "addresses"]);

        let users = catalog.table("users").unwrap();
        let id = users.get_column("id").unwrap();
        assert_eq!(id.sql_type, ColumnType::Integer);
        assert!(id.options.primary_key);
        assert!(!id.options.nullable);

        let firstname = users.get_column("firstname").unwrap();
        assert_eq!(firstname.options.length, Some(50));
        assert!(firstname.options.nullable);

        let active = users.get_column("active").unwrap();
        assert_eq!(active.options.default, Some(Value::Bool(true)));

        let user_id = catalog.table("addresses").unwrap().get_column("user_id").unwrap();
        assert_eq!(user_id.options.foreign_key, Some(ForeignKey::new("users", "id")));
    }

    #[test]
    fn test_missing_table() {
        let catalog = Catalog::from_toml_str(SCHEMA).unwrap();
        assert!(catalog.get("orders").is_none());
        assert!(matches!(catalog.table("orders"), Err(ClauseError::Schema(_))));
    }

    #[test]
    fn test_dangling_foreign_key() {
        let toml = r#"
[[tables]]
name = "addresses"
[[tables.columns]]
name = "user_id"
type = "integer"
references = "users.id"
"#;
        let err = Catalog::from_toml_str(toml).unwrap_err();
        assert!(err.to_string().contains("unknown table 'users'"));
    }

    #[test]
    fn test_duplicate_table() {
        let toml = r#"
[[tables]]
name = "t"
[[tables]]
name = "t"
"#;
        assert!(matches!(
            Catalog::from_toml_str(toml),
            Err(ClauseError::Schema(_))
        ));
    }

    #[test]
    fn test_bad_type_declaration() {
        let toml = r#"
[[tables]]
name = "t"
[[tables.columns]]
name = "x"
type = "blob"
"#;
        assert!(matches!(
            Catalog::from_toml_str(toml),
            Err(ClauseError::Parse { .. })
        ));
    }
}
