//! SELECT SQL generation.

use crate::ast::Select;
use crate::error::ClauseResult;
use crate::transpiler::{BindContext, Compiler};

pub fn build_select(
    compiler: &Compiler,
    select: &Select,
    ctx: &mut BindContext,
) -> ClauseResult<String> {
    let mut sql = if select.distinct {
        String::from("SELECT DISTINCT ")
    } else {
        String::from("SELECT ")
    };

    if select.columns.is_empty() {
        sql.push('*');
    } else {
        let cols = select
            .columns
            .iter()
            .map(|c| compiler.process(c, ctx))
            .collect::<ClauseResult<Vec<_>>>()?;
        sql.push_str(&cols.join(", "));
    }

    let froms = select
        .effective_froms()
        .iter()
        .map(|f| compiler.process(f, ctx))
        .collect::<ClauseResult<Vec<_>>>()?;
    if !froms.is_empty() {
        sql.push_str(" FROM ");
        sql.push_str(&froms.join(", "));
    }

    if let Some(cond) = &select.where_clause {
        sql.push_str(" WHERE ");
        sql.push_str(&compiler.process(cond, ctx)?);
    }

    if let Some(order) = select.order_by_clause.as_ref().filter(|o| !o.is_empty()) {
        sql.push_str(" ORDER BY ");
        sql.push_str(&compiler.process(&order.clone().into(), ctx)?);
    }

    sql.push_str(&limit_clause(select.limit, select.offset));
    Ok(sql)
}

/// ` LIMIT n`, ` OFFSET n`, or both. An offset alone gets `LIMIT -1`.
pub fn limit_clause(limit: Option<u64>, offset: Option<u64>) -> String {
    match (limit, offset) {
        (Some(l), Some(o)) => format!(" LIMIT {} OFFSET {}", l, o),
        (Some(l), None) => format!(" LIMIT {}", l),
        (None, Some(o)) => format!(" LIMIT -1 OFFSET {}", o),
        (None, None) => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_limit_clause() {
        assert_eq!(limit_clause(None, None), "");
        assert_eq!(limit_clause(Some(10), None), " LIMIT 10");
        assert_eq!(limit_clause(None, Some(10)), " LIMIT -1 OFFSET 10");
        assert_eq!(limit_clause(Some(5), Some(10)), " LIMIT 5 OFFSET 10");
    }
}
