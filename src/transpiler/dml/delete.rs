//! DELETE SQL generation.

use crate::ast::Delete;
use crate::error::ClauseResult;
use crate::transpiler::{BindContext, Compiler};

pub fn build_delete(
    compiler: &Compiler,
    delete: &Delete,
    ctx: &mut BindContext,
) -> ClauseResult<String> {
    let mut sql = String::from("DELETE FROM ");
    sql.push_str(&compiler.preparer().format_table(delete.table.name()));

    if let Some(cond) = &delete.where_clause {
        sql.push_str(" WHERE ");
        sql.push_str(&compiler.process(cond, ctx)?);
    }

    Ok(sql)
}
