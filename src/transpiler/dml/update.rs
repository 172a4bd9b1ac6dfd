//! UPDATE SQL generation.

use crate::ast::Update;
use crate::error::ClauseResult;
use crate::transpiler::{BindContext, Compiler};

pub fn build_update(
    compiler: &Compiler,
    update: &Update,
    ctx: &mut BindContext,
) -> ClauseResult<String> {
    let sets: Vec<String> =
        super::column_params(compiler, &update.table, update.values.as_deref(), ctx)?
            .into_iter()
            .map(|(col, placeholder)| format!("{} = {}", col, placeholder))
            .collect();

    let mut sql = format!(
        "UPDATE {} SET {}",
        compiler.preparer().format_table(update.table.name()),
        sets.join(", ")
    );

    if let Some(cond) = &update.where_clause {
        sql.push_str(" WHERE ");
        sql.push_str(&compiler.process(cond, ctx)?);
    }

    Ok(sql)
}
