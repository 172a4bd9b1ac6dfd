//! # clausekit
//!
//! Build SQL as a tree of clause elements, then compile the tree into
//! parameterized SQL text plus the values for its placeholders.
//!
//! ## Quick Example
//!
//! ```rust
//! use clausekit::prelude::*;
//!
//! let users = Table::new("users", vec![
//!     Column::new("id", ColumnType::Integer).primary_key(),
//!     Column::new("lastname", ColumnType::String),
//! ]).unwrap();
//!
//! let query = users
//!     .select()
//!     .where_(users.c("lastname").unwrap().like("Do%"))
//!     .limit(10);
//!
//! let compiled = query.compile().unwrap();
//! assert_eq!(
//!     compiled.sql(),
//!     "SELECT users.id, users.lastname FROM users WHERE users.lastname LIKE :lastname_1 LIMIT 10"
//! );
//! assert_eq!(compiled.params().get("lastname_1"), Some(&Value::from("Do%")));
//! ```
//!
//! Trees are plain values: build them once, compile them from any number of
//! threads, each compile with its own parameter numbering.

pub mod ast;
pub mod config;
pub mod error;
pub mod parser;
pub mod schema;
pub mod transpiler;

pub mod prelude {
    pub use crate::ast::*;
    pub use crate::config::Config;
    pub use crate::error::*;
    pub use crate::schema::{
        Alias, Catalog, Column, ColumnOptions, ColumnType, ForeignKey, Table, TableClause,
    };
    pub use crate::transpiler::{Compile, Compiled, Compiler, Dialect, IdentifierPreparer, Params};
}

/// Compile a tree with the default, unquoted compiler.
///
/// # Example
///
/// ```
/// use clausekit::ast::column;
///
/// let compiled = clausekit::compile(&column("id").eq(1)).unwrap();
/// assert_eq!(compiled.sql(), "id = :id_1");
/// ```
pub fn compile(element: &ast::ClauseElement) -> error::ClauseResult<transpiler::Compiled> {
    transpiler::Compiler::default().compile(element)
}
