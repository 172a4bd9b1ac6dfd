//! Clause-tree compiler.
//!
//! Walks a [`ClauseElement`] tree and produces SQL text plus the values for
//! its named placeholders.

pub mod dml;
pub mod params;
pub mod preparer;

#[cfg(test)]
mod tests;

use serde::Serialize;

use crate::ast::{ClauseElement, ExpressionList, Operator, UnaryExpression};
use crate::error::{ClauseError, ClauseResult};

pub use params::{BindContext, Params};
pub use preparer::{Dialect, IdentifierPreparer};

/// SQL text and the parameters bound while producing it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Compiled {
    sql: String,
    params: Params,
}

impl Compiled {
    pub fn new(sql: String, params: Params) -> Self {
        Self { sql, params }
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    pub fn into_parts(self) -> (String, Params) {
        (self.sql, self.params)
    }
}

impl std::fmt::Display for Compiled {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.sql)
    }
}

/// Turns clause trees into [`Compiled`] statements.
///
/// Stateless apart from its identifier preparer: every call to
/// [`Compiler::compile`] starts from a fresh [`BindContext`].
#[derive(Debug, Clone, Default)]
pub struct Compiler {
    preparer: IdentifierPreparer,
}

impl Compiler {
    pub fn new(preparer: IdentifierPreparer) -> Self {
        Self { preparer }
    }

    pub fn for_dialect(dialect: Dialect) -> Self {
        Self::new(dialect.preparer())
    }

    pub fn preparer(&self) -> &IdentifierPreparer {
        &self.preparer
    }

    pub fn compile(&self, element: &ClauseElement) -> ClauseResult<Compiled> {
        let mut ctx = BindContext::new();
        let sql = self.process(element, &mut ctx)?;
        let params = ctx.into_params();
        tracing::debug!("Compiled {} ({} params)", element.kind(), params.len());
        Ok(Compiled::new(sql, params))
    }

    /// Render one node. Each variant has exactly one rendering rule.
    pub(crate) fn process(
        &self,
        element: &ClauseElement,
        ctx: &mut BindContext,
    ) -> ClauseResult<String> {
        match element {
            ClauseElement::Table(t) => Ok(self.preparer.format_table(t.name())),
            ClauseElement::TableClause(t) => Ok(self.preparer.format_table(&t.name)),
            // Alias names are emitted as written, even under a quoting dialect.
            ClauseElement::Alias(a) => Ok(format!(
                "{} AS {}",
                self.preparer.format_table(a.table.name()),
                a.name
            )),
            ClauseElement::Column(c) => Ok(self.preparer.format_column(c)),
            ClauseElement::Expression(e) => Ok(format!(
                "{} {} {}",
                self.process(&e.left, ctx)?,
                e.operator.sql_symbol(),
                self.process(&e.right, ctx)?
            )),
            ClauseElement::UnaryExpression(u) => self.process_unary(u, ctx),
            ClauseElement::ExpressionList(l) => self.process_list(l, ctx),
            ClauseElement::Grouping(g) => {
                let inner = self.process(&g.element, ctx)?;
                // Nested groupings share one pair of parentheses.
                if matches!(*g.element, ClauseElement::Grouping(_)) {
                    Ok(inner)
                } else {
                    Ok(format!("({})", inner))
                }
            }
            ClauseElement::ClauseList(l) => {
                let parts = l
                    .clauses
                    .iter()
                    .map(|c| self.process(c, ctx))
                    .collect::<ClauseResult<Vec<_>>>()?;
                Ok(parts.join(&l.separator))
            }
            ClauseElement::BindParam(p) => Ok(ctx.bind(p)),
            ClauseElement::Null => Ok("NULL".to_string()),
            ClauseElement::Join(j) => Ok(format!(
                "{}{}{} ON {}",
                self.process(&j.left, ctx)?,
                if j.is_outer { " LEFT OUTER JOIN " } else { " JOIN " },
                self.process(&j.right, ctx)?,
                self.process(&j.on_clause, ctx)?
            )),
            ClauseElement::Select(s) => dml::select::build_select(self, s, ctx),
            ClauseElement::Insert(i) => dml::insert::build_insert(self, i, ctx),
            ClauseElement::Update(u) => dml::update::build_update(self, u, ctx),
            ClauseElement::Delete(d) => dml::delete::build_delete(self, d, ctx),
        }
    }

    fn process_unary(&self, u: &UnaryExpression, ctx: &mut BindContext) -> ClauseResult<String> {
        let mut sql = self.process(&u.element, ctx)?;
        if let Some(op) = &u.operator {
            sql = format!("{} {}", op.sql_symbol(), sql);
        }
        if let Some(modifier) = &u.modifier {
            sql = format!("{} {}", sql, modifier.sql_symbol());
        }
        Ok(sql)
    }

    fn process_list(&self, list: &ExpressionList, ctx: &mut BindContext) -> ClauseResult<String> {
        if list.expressions.is_empty() {
            return Err(ClauseError::EmptyClause(match list.operator {
                Operator::Or => "OR list",
                _ => "AND list",
            }));
        }
        let mut parts = Vec::with_capacity(list.expressions.len());
        for e in &list.expressions {
            // Lists deserialized from JSON may still hold bare nested lists.
            let part = match e {
                ClauseElement::ExpressionList(_) => format!("({})", self.process(e, ctx)?),
                other => self.process(other, ctx)?,
            };
            parts.push(part);
        }
        Ok(parts.join(&format!(" {} ", list.operator.sql_symbol())))
    }
}

/// Compile anything that converts into a clause tree.
pub trait Compile {
    /// Compile without identifier quoting.
    fn compile(&self) -> ClauseResult<Compiled> {
        self.compile_with(&Compiler::default())
    }

    fn compile_with(&self, compiler: &Compiler) -> ClauseResult<Compiled>;
}

impl<T> Compile for T
where
    T: Clone + Into<ClauseElement>,
{
    fn compile_with(&self, compiler: &Compiler) -> ClauseResult<Compiled> {
        compiler.compile(&self.clone().into())
    }
}
