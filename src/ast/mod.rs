//! Clause-tree model: nodes, operators, values and builders.

pub mod builders;
pub mod element;
pub mod expr;
pub mod operators;
pub mod statements;
pub mod values;

pub use builders::{IntoOperand, Operand, and_, not_, or_};
pub use element::{ClauseColumn, ClauseElement, Selectable, TableRef, column};
pub use expr::{BindParam, ClauseList, Expression, ExpressionList, Grouping, Join, UnaryExpression};
pub use operators::Operator;
pub use statements::{Delete, Insert, Select, Update};
pub use values::Value;
