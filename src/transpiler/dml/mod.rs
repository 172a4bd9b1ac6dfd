//! Statement rendering: SELECT, INSERT, UPDATE, DELETE.

pub mod delete;
pub mod insert;
pub mod select;
pub mod update;

use crate::ast::Value;
use crate::error::{ClauseError, ClauseResult};
use crate::schema::Table;
use crate::transpiler::{BindContext, Compiler};

/// Column/placeholder pairs for INSERT and UPDATE.
///
/// Explicit values are validated against the table and recorded under the
/// bare column name. An explicitly empty value list is an error. Without
/// values every declared column is used and no parameter is recorded.
pub(crate) fn column_params(
    compiler: &Compiler,
    table: &Table,
    values: Option<&[(String, Value)]>,
    ctx: &mut BindContext,
) -> ClauseResult<Vec<(String, String)>> {
    let preparer = compiler.preparer();
    match values {
        Some(values) => {
            let unknown = table.unknown_columns(values.iter().map(|(c, _)| c.as_str()));
            if !unknown.is_empty() {
                return Err(ClauseError::UnknownColumn {
                    table: table.name().to_string(),
                    columns: unknown,
                });
            }
            if values.is_empty() {
                return Err(ClauseError::EmptyClause("value list"));
            }
            values
                .iter()
                .map(|(c, v)| ctx.record(c, v).map(|p| (preparer.quote_identifier(c), p)))
                .collect()
        }
        None => table
            .column_names()
            .map(|c| ctx.reserve(c).map(|p| (preparer.quote_identifier(c), p)))
            .collect(),
    }
}
