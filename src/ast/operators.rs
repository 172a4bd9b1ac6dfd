use serde::{Deserialize, Serialize};

/// SQL operators known to the compiler.
///
/// `Custom` carries any token the registry does not know; it renders verbatim,
/// which is how dialect-specific operators pass through compilation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operator {
    /// Equal (=)
    Eq,
    /// Not equal (!=)
    Ne,
    /// IN (...)
    In,
    /// IS
    Is,
    /// IS NOT
    IsNot,
    /// Less than (<)
    Lt,
    /// Less than or equal (<=)
    Le,
    /// Greater than (>)
    Gt,
    /// Greater than or equal (>=)
    Ge,
    /// LIKE pattern match
    Like,
    /// NOT LIKE pattern match
    NotLike,
    And,
    Or,
    Not,
    Asc,
    Desc,
    /// Unregistered token, rendered as-is.
    Custom(String),
}

impl Operator {
    /// Returns the SQL token for this operator.
    pub fn sql_symbol(&self) -> &str {
        match self {
            Operator::Eq => "=",
            Operator::Ne => "!=",
            Operator::In => "IN",
            Operator::Is => "IS",
            Operator::IsNot => "IS NOT",
            Operator::Lt => "<",
            Operator::Le => "<=",
            Operator::Gt => ">",
            Operator::Ge => ">=",
            Operator::Like => "LIKE",
            Operator::NotLike => "NOT LIKE",
            Operator::And => "AND",
            Operator::Or => "OR",
            Operator::Not => "NOT",
            Operator::Asc => "ASC",
            Operator::Desc => "DESC",
            Operator::Custom(token) => token,
        }
    }

    /// Returns the logical inverse, if the registry defines one.
    pub fn inverse(&self) -> Option<Operator> {
        match self {
            Operator::Eq => Some(Operator::Ne),
            Operator::Ne => Some(Operator::Eq),
            Operator::Is => Some(Operator::IsNot),
            Operator::IsNot => Some(Operator::Is),
            Operator::Lt => Some(Operator::Ge),
            Operator::Le => Some(Operator::Gt),
            Operator::Gt => Some(Operator::Le),
            Operator::Ge => Some(Operator::Lt),
            Operator::Like => Some(Operator::NotLike),
            Operator::NotLike => Some(Operator::Like),
            _ => None,
        }
    }

    /// Conjunctions and orderings can never be negated.
    pub fn is_uninvertible(&self) -> bool {
        matches!(
            self,
            Operator::And | Operator::Or | Operator::Not | Operator::Asc | Operator::Desc
        )
    }

    /// Resolve a textual token against the registry, falling back to `Custom`.
    pub fn from_token(token: &str) -> Operator {
        match token.trim().to_uppercase().as_str() {
            "=" => Operator::Eq,
            "!=" => Operator::Ne,
            "IN" => Operator::In,
            "IS" => Operator::Is,
            "IS NOT" => Operator::IsNot,
            "<" => Operator::Lt,
            "<=" => Operator::Le,
            ">" => Operator::Gt,
            ">=" => Operator::Ge,
            "LIKE" => Operator::Like,
            "NOT LIKE" => Operator::NotLike,
            "AND" => Operator::And,
            "OR" => Operator::Or,
            "NOT" => Operator::Not,
            "ASC" => Operator::Asc,
            "DESC" => Operator::Desc,
            _ => Operator::Custom(token.to_string()),
        }
    }
}

impl std::fmt::Display for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.sql_symbol())
    }
}
