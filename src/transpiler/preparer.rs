//! Identifier quoting.

use serde::{Deserialize, Serialize};

use crate::ast::ClauseColumn;
use crate::error::ClauseError;

/// Dialects differ only in how identifiers are quoted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    /// No quoting at all.
    #[default]
    Generic,
    Sqlite,
    Postgres,
    Mysql,
}

impl Dialect {
    pub fn preparer(&self) -> IdentifierPreparer {
        match self {
            Dialect::Generic => IdentifierPreparer::default(),
            Dialect::Sqlite | Dialect::Postgres => IdentifierPreparer::new("\"", None),
            Dialect::Mysql => IdentifierPreparer::new("`", None),
        }
    }
}

impl std::str::FromStr for Dialect {
    type Err = ClauseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "generic" => Ok(Dialect::Generic),
            "sqlite" => Ok(Dialect::Sqlite),
            "postgres" | "postgresql" => Ok(Dialect::Postgres),
            "mysql" => Ok(Dialect::Mysql),
            other => Err(ClauseError::Config(format!("unknown dialect '{}'", other))),
        }
    }
}

/// Renders table and column identifiers with a configured quote pair.
///
/// Holds nothing but the quote characters, so one instance can be shared by
/// any number of concurrent compiles.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct IdentifierPreparer {
    initial_quote: String,
    final_quote: String,
}

impl IdentifierPreparer {
    /// `final_quote` defaults to `initial_quote`.
    pub fn new(initial_quote: &str, final_quote: Option<&str>) -> Self {
        Self {
            initial_quote: initial_quote.to_string(),
            final_quote: final_quote.unwrap_or(initial_quote).to_string(),
        }
    }

    pub fn initial_quote(&self) -> &str {
        &self.initial_quote
    }

    pub fn final_quote(&self) -> &str {
        &self.final_quote
    }

    /// Quote one identifier. A closing quote inside the name is doubled.
    pub fn quote_identifier(&self, value: &str) -> String {
        if self.initial_quote.is_empty() && self.final_quote.is_empty() {
            return value.to_string();
        }
        let escaped = if self.final_quote.is_empty() {
            value.to_string()
        } else {
            value.replace(&self.final_quote, &self.final_quote.repeat(2))
        };
        format!("{}{}{}", self.initial_quote, escaped, self.final_quote)
    }

    pub fn format_table(&self, name: &str) -> String {
        self.quote_identifier(name)
    }

    /// `owner.column` when the column has an owner, else just the column.
    pub fn format_column(&self, column: &ClauseColumn) -> String {
        match column.owner_name() {
            Some(owner) => format!(
                "{}.{}",
                self.format_table(owner),
                self.quote_identifier(&column.name)
            ),
            None => self.quote_identifier(&column.name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_quoting_by_default() {
        let p = IdentifierPreparer::default();
        assert_eq!(p.quote_identifier("users"), "users");
        assert_eq!(
            p.format_column(&ClauseColumn::qualified("id", "users")),
            "users.id"
        );
    }

    #[test]
    fn test_quote_pair() {
        let p = IdentifierPreparer::new("[", Some("]"));
        assert_eq!(p.format_column(&ClauseColumn::qualified("id", "users")), "[users].[id]");
        assert_eq!(p.quote_identifier("a]b"), "[a]]b]");
    }

    #[test]
    fn test_dialect_presets() {
        assert_eq!(Dialect::Postgres.preparer().quote_identifier("x\"y"), "\"x\"\"y\"");
        assert_eq!(Dialect::Mysql.preparer().quote_identifier("order"), "`order`");
        assert_eq!("SQLite".parse::<Dialect>().unwrap(), Dialect::Sqlite);
        assert!("oracle".parse::<Dialect>().is_err());
    }
}
