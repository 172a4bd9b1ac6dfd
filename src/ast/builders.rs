//! Fluent builders: column comparisons, conjunctions and negation.
//!
//! Every builder returns a new node; the column or table it is called on is
//! never modified, so schema objects can back any number of trees.

use chrono::{NaiveDate, NaiveDateTime};

use crate::ast::{
    BindParam, ClauseColumn, ClauseElement, ClauseList, Expression, ExpressionList, Grouping,
    Operator, UnaryExpression, Value,
};
use crate::error::{ClauseError, ClauseResult};

/// Right-hand side of a comparison: a scalar to bind, or another element.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    Value(Value),
    Element(ClauseElement),
}

/// Anything usable on the right of a comparison.
pub trait IntoOperand {
    fn into_operand(self) -> Operand;
}

macro_rules! scalar_operand {
    ($($t:ty),* $(,)?) => {
        $(
            impl IntoOperand for $t {
                fn into_operand(self) -> Operand {
                    Operand::Value(self.into())
                }
            }
        )*
    };
}

scalar_operand!(Value, bool, i32, i64, u32, f64, &str, String, NaiveDate, NaiveDateTime);

impl<T: Into<Value>> IntoOperand for Option<T> {
    fn into_operand(self) -> Operand {
        Operand::Value(self.into())
    }
}

impl IntoOperand for ClauseColumn {
    fn into_operand(self) -> Operand {
        Operand::Element(self.into())
    }
}

impl IntoOperand for &ClauseColumn {
    fn into_operand(self) -> Operand {
        Operand::Element(self.clone().into())
    }
}

impl IntoOperand for ClauseElement {
    fn into_operand(self) -> Operand {
        Operand::Element(self)
    }
}

impl ClauseColumn {
    /// Bind `operand` under this column's name, or reference it as-is.
    fn operand_element(&self, operand: Operand) -> ClauseElement {
        match operand {
            Operand::Value(Value::Null) => ClauseElement::Null,
            Operand::Value(v) => BindParam::new(self.name.clone(), v).into(),
            Operand::Element(e) => e,
        }
    }

    /// Compare with any operator.
    ///
    /// Equality against NULL becomes `IS NULL`, inequality `IS NOT NULL`.
    pub fn compare(&self, operator: Operator, other: impl IntoOperand) -> ClauseElement {
        let operand = other.into_operand();
        let operator = match (&operand, operator) {
            (Operand::Value(Value::Null), Operator::Eq) => Operator::Is,
            (Operand::Value(Value::Null), Operator::Ne) => Operator::IsNot,
            (_, op) => op,
        };
        Expression::new(self.clone(), operator, self.operand_element(operand)).into()
    }

    pub fn eq(&self, other: impl IntoOperand) -> ClauseElement {
        self.compare(Operator::Eq, other)
    }

    pub fn ne(&self, other: impl IntoOperand) -> ClauseElement {
        self.compare(Operator::Ne, other)
    }

    pub fn lt(&self, other: impl IntoOperand) -> ClauseElement {
        self.compare(Operator::Lt, other)
    }

    pub fn le(&self, other: impl IntoOperand) -> ClauseElement {
        self.compare(Operator::Le, other)
    }

    pub fn gt(&self, other: impl IntoOperand) -> ClauseElement {
        self.compare(Operator::Gt, other)
    }

    pub fn ge(&self, other: impl IntoOperand) -> ClauseElement {
        self.compare(Operator::Ge, other)
    }

    pub fn like(&self, other: impl IntoOperand) -> ClauseElement {
        self.compare(Operator::Like, other)
    }

    pub fn not_like(&self, other: impl IntoOperand) -> ClauseElement {
        self.compare(Operator::NotLike, other)
    }

    pub fn is_null(&self) -> ClauseElement {
        self.compare(Operator::Is, Value::Null)
    }

    pub fn is_not_null(&self) -> ClauseElement {
        self.compare(Operator::IsNot, Value::Null)
    }

    /// `LIKE 'value%'`. `%` and `_` inside `value` are not escaped.
    pub fn startswith(&self, value: &str) -> ClauseElement {
        self.like(format!("{}%", value))
    }

    /// `LIKE '%value'`. `%` and `_` inside `value` are not escaped.
    pub fn endswith(&self, value: &str) -> ClauseElement {
        self.like(format!("%{}", value))
    }

    /// `LIKE '%value%'`. `%` and `_` inside `value` are not escaped.
    pub fn contains(&self, value: &str) -> ClauseElement {
        self.like(format!("%{}%", value))
    }

    /// Arbitrary operator token; unregistered tokens render verbatim.
    pub fn op(&self, token: &str, other: impl IntoOperand) -> ClauseElement {
        self.compare(Operator::from_token(token), other)
    }

    /// `col IN (:col_1,:col_2,...)`.
    ///
    /// An empty set renders `NULL IS NOT NULL`, which no row satisfies; its
    /// negation `NULL IS NULL` holds for every row.
    pub fn in_<I, T>(&self, values: I) -> ClauseElement
    where
        I: IntoIterator<Item = T>,
        T: IntoOperand,
    {
        let items: Vec<ClauseElement> = values
            .into_iter()
            .map(|v| self.operand_element(v.into_operand()))
            .collect();
        if items.is_empty() {
            let nothing = Expression::new(ClauseElement::Null, Operator::IsNot, ClauseElement::Null);
            return nothing.into();
        }
        let list = Grouping::new(ClauseList::new(items, ","));
        Expression::new(self.clone(), Operator::In, list).into()
    }

    pub fn asc(&self) -> ClauseElement {
        UnaryExpression::suffix(self.clone(), Operator::Asc).into()
    }

    pub fn desc(&self) -> ClauseElement {
        UnaryExpression::suffix(self.clone(), Operator::Desc).into()
    }
}

/// Join elements with AND. Nested lists are parenthesized.
pub fn and_<I, E>(elements: I) -> ClauseElement
where
    I: IntoIterator<Item = E>,
    E: Into<ClauseElement>,
{
    ExpressionList::new(Operator::And, elements).into()
}

/// Join elements with OR. Nested lists are parenthesized.
pub fn or_<I, E>(elements: I) -> ClauseElement
where
    I: IntoIterator<Item = E>,
    E: Into<ClauseElement>,
{
    ExpressionList::new(Operator::Or, elements).into()
}

/// Logically invert an element.
///
/// Operators with a registered inverse are swapped in place
/// (`=` becomes `!=`, `<` becomes `>=`, ...). Anything else is wrapped as
/// `NOT (...)`, and negating such a wrapper returns the wrapped element
/// unchanged. Orderings and conjunction operators fail with
/// [`ClauseError::UninvertibleOperator`].
pub fn not_(element: impl Into<ClauseElement>) -> ClauseResult<ClauseElement> {
    match element.into() {
        ClauseElement::Expression(mut e) => {
            if e.operator.is_uninvertible() {
                return Err(ClauseError::UninvertibleOperator(e.operator.to_string()));
            }
            match e.operator.inverse() {
                Some(inverse) => {
                    e.operator = inverse;
                    Ok(e.into())
                }
                None => Ok(negate(e.into())),
            }
        }
        ClauseElement::UnaryExpression(u) => {
            if let Some(m) = u.modifier.as_ref().filter(|m| m.is_uninvertible()) {
                return Err(ClauseError::UninvertibleOperator(m.to_string()));
            }
            if u.operator == Some(Operator::Not) && u.modifier.is_none() {
                return Ok(match *u.element {
                    ClauseElement::Grouping(g) => *g.element,
                    other => other,
                });
            }
            Ok(negate(u.into()))
        }
        other => Ok(negate(other)),
    }
}

/// `NOT (element)`. A Grouping input gets its own wrapper too, so a second
/// `not_` hands back exactly what was negated.
fn negate(element: ClauseElement) -> ClauseElement {
    UnaryExpression::prefix(Operator::Not, element.group()).into()
}
