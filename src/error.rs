//! Error types for clausekit.

use thiserror::Error;

/// The main error type for building and compiling clause trees.
#[derive(Debug, Error)]
pub enum ClauseError {
    /// A serialized tree named a node kind the compiler does not know.
    #[error("Unknown clause element type: '{0}'")]
    UnknownClauseElementType(String),

    /// Insert/Update values (or a column lookup) named columns the table does not declare.
    #[error("Unknown column(s) {} in {table} table", columns.join(", "))]
    UnknownColumn { table: String, columns: Vec<String> },

    /// Negation requested on an operator with no logical inverse.
    #[error("Operator '{0}' cannot be inverted")]
    UninvertibleOperator(String),

    /// Empty table name or malformed alias.
    #[error("Invalid identifier: '{0}'")]
    InvalidIdentifier(String),

    /// Two columns with the same name in one table.
    #[error("Duplicate column '{column}' in {table} table")]
    DuplicateColumn { table: String, column: String },

    /// Two values claimed the same placeholder in one compile.
    #[error("Parameter ':{0}' is bound more than once")]
    DuplicateParameter(String),

    /// A conjunction or value list with nothing in it.
    #[error("Empty {0} cannot be rendered")]
    EmptyClause(&'static str),

    /// A join without ON clause between tables no foreign key links.
    #[error("No foreign key relationship between {left} and {right}")]
    NoRelationship { left: String, right: String },

    /// Failed to parse a type declaration, reference or filter.
    #[error("Parse error at position {position}: {message}")]
    Parse { position: usize, message: String },

    /// Inconsistent schema definition.
    #[error("Schema error: {0}")]
    Schema(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ClauseError {
    /// Create a parse error at the given position.
    pub fn parse(position: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            position,
            message: message.into(),
        }
    }

    /// Create an unknown column error for a single name.
    pub fn unknown_column(table: impl Into<String>, column: impl Into<String>) -> Self {
        Self::UnknownColumn {
            table: table.into(),
            columns: vec![column.into()],
        }
    }
}

/// Result type alias for clausekit operations.
pub type ClauseResult<T> = Result<T, ClauseError>;
