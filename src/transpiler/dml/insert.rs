//! INSERT SQL generation.

use crate::ast::Insert;
use crate::error::ClauseResult;
use crate::transpiler::{BindContext, Compiler};

pub fn build_insert(
    compiler: &Compiler,
    insert: &Insert,
    ctx: &mut BindContext,
) -> ClauseResult<String> {
    let pairs = super::column_params(compiler, &insert.table, insert.values.as_deref(), ctx)?;
    let (cols, placeholders): (Vec<String>, Vec<String>) = pairs.into_iter().unzip();
    Ok(format!(
        "INSERT INTO {} ({}) VALUES ({})",
        compiler.preparer().format_table(insert.table.name()),
        cols.join(", "),
        placeholders.join(", ")
    ))
}
