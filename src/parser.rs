//! Small parsers built on nom.
//!
//! Covers the textual forms that show up outside Rust code: column type
//! declarations in schema files (`string(50)`), foreign-key references
//! (`users.id`), and the filter/assignment arguments of the CLI
//! (`lastname~Do%`, `firstname=John`).

use nom::{
    IResult,
    branch::alt,
    bytes::complete::{tag, tag_no_case},
    character::complete::{alpha1, alphanumeric1, char, digit1, multispace0},
    combinator::{all_consuming, map, map_res, opt, recognize, rest, value},
    multi::many0,
    sequence::{delimited, pair, preceded, separated_pair, terminated, tuple},
};

use crate::ast::{ClauseElement, Operator, Selectable, Value};
use crate::error::{ClauseError, ClauseResult};
use crate::schema::{ColumnType, ForeignKey};

/// Run a parser over the whole input, mapping failures to a positioned error.
fn finish<'a, T>(
    input: &'a str,
    what: &str,
    result: IResult<&'a str, T>,
) -> ClauseResult<T> {
    match result {
        Ok((_, out)) => Ok(out),
        Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => Err(ClauseError::parse(
            input.len() - e.input.len(),
            format!("invalid {}: '{}'", what, input),
        )),
        Err(nom::Err::Incomplete(_)) => {
            Err(ClauseError::parse(input.len(), format!("incomplete {}", what)))
        }
    }
}

/// Parse an identifier: a letter or underscore, then letters, digits, underscores.
fn identifier(input: &str) -> IResult<&str, &str> {
    recognize(pair(
        alt((alpha1, tag("_"))),
        many0(alt((alphanumeric1, tag("_")))),
    ))(input)
}

/// True when `name` is a plain SQL identifier.
pub fn is_identifier(name: &str) -> bool {
    all_consuming(identifier)(name).is_ok()
}

/// Parse a `table.column` reference.
pub fn parse_foreign_key(input: &str) -> ClauseResult<ForeignKey> {
    let result = all_consuming(delimited(
        multispace0,
        separated_pair(identifier, char('.'), identifier),
        multispace0,
    ))(input);
    let (table, column) = finish(input, "foreign key reference", result)?;
    Ok(ForeignKey::new(table, column))
}

fn column_type(input: &str) -> IResult<&str, ColumnType> {
    alt((
        value(ColumnType::Integer, alt((tag_no_case("integer"), tag_no_case("int")))),
        value(ColumnType::String, alt((tag_no_case("string"), tag_no_case("varchar")))),
        value(ColumnType::Text, tag_no_case("text")),
        value(ColumnType::Float, tag_no_case("float")),
        value(ColumnType::Boolean, alt((tag_no_case("boolean"), tag_no_case("bool")))),
        value(ColumnType::DateTime, tag_no_case("datetime")),
        value(ColumnType::Date, tag_no_case("date")),
        value(ColumnType::Timestamp, tag_no_case("timestamp")),
    ))(input)
}

fn type_length(input: &str) -> IResult<&str, u32> {
    delimited(
        terminated(char('('), multispace0),
        map_res(digit1, str::parse::<u32>),
        preceded(multispace0, char(')')),
    )(input)
}

/// Parse a type declaration such as `integer`, `string(50)` or `DATETIME`.
pub fn parse_column_type(input: &str) -> ClauseResult<(ColumnType, Option<u32>)> {
    let result = all_consuming(delimited(
        multispace0,
        pair(column_type, opt(preceded(multispace0, type_length))),
        multispace0,
    ))(input);
    finish(input, "column type", result)
}

/// Parse a literal the way a shell user would write it.
///
/// `null`, `true`/`false`, integers and floats are typed; single-quoted text
/// loses its quotes; anything else is a string.
pub fn parse_value(input: &str) -> Value {
    let s = input.trim();
    if s.eq_ignore_ascii_case("null") {
        Value::Null
    } else if s == "true" {
        Value::Bool(true)
    } else if s == "false" {
        Value::Bool(false)
    } else if let Ok(n) = s.parse::<i64>() {
        Value::Int(n)
    } else if let Ok(f) = s.parse::<f64>() {
        Value::Float(f)
    } else if s.len() >= 2 && s.starts_with('\'') && s.ends_with('\'') {
        Value::String(s[1..s.len() - 1].to_string())
    } else {
        Value::String(s.to_string())
    }
}

/// Comparison written in a CLI filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    Like,
}

impl FilterOp {
    pub fn operator(self) -> Operator {
        match self {
            FilterOp::Eq => Operator::Eq,
            FilterOp::Ne => Operator::Ne,
            FilterOp::Lt => Operator::Lt,
            FilterOp::Le => Operator::Le,
            FilterOp::Gt => Operator::Gt,
            FilterOp::Ge => Operator::Ge,
            FilterOp::Like => Operator::Like,
        }
    }
}

fn filter_op(input: &str) -> IResult<&str, FilterOp> {
    alt((
        value(FilterOp::Ne, tag("!=")),
        value(FilterOp::Le, tag("<=")),
        value(FilterOp::Ge, tag(">=")),
        value(FilterOp::Eq, tag("=")),
        value(FilterOp::Lt, tag("<")),
        value(FilterOp::Gt, tag(">")),
        value(FilterOp::Like, tag("~")),
    ))(input)
}

/// A `column <op> value` condition.
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    pub column: String,
    pub op: FilterOp,
    pub value: Value,
}

impl Filter {
    /// Build the condition against a table or alias; the column must exist.
    pub fn to_clause(&self, from: &impl Selectable) -> ClauseResult<ClauseElement> {
        Ok(from.c(&self.column)?.compare(self.op.operator(), self.value.clone()))
    }
}

/// Parse `column<op>value`, e.g. `id>=10`, `lastname~Do%`, `email=null`.
pub fn parse_filter(input: &str) -> ClauseResult<Filter> {
    let result = all_consuming(map(
        tuple((
            preceded(multispace0, identifier),
            delimited(multispace0, filter_op, multispace0),
            rest,
        )),
        |(column, op, raw)| Filter {
            column: column.to_string(),
            op,
            value: parse_value(raw),
        },
    ))(input);
    finish(input, "filter", result)
}

/// Parse `column=value`.
pub fn parse_assignment(input: &str) -> ClauseResult<(String, Value)> {
    let result = all_consuming(separated_pair(
        preceded(multispace0, identifier),
        delimited(multispace0, char('='), multispace0),
        rest,
    ))(input);
    let (column, raw) = finish(input, "assignment", result)?;
    Ok((column.to_string(), parse_value(raw)))
}

/// Parse an ORDER BY term: `column`, `column:asc` or `column:desc`.
pub fn parse_order(input: &str) -> ClauseResult<(String, Option<Operator>)> {
    let direction = alt((
        value(Operator::Asc, tag_no_case("asc")),
        value(Operator::Desc, tag_no_case("desc")),
    ));
    let result = all_consuming(delimited(
        multispace0,
        pair(identifier, opt(preceded(char(':'), direction))),
        multispace0,
    ))(input);
    let (column, dir) = finish(input, "order term", result)?;
    Ok((column.to_string(), dir))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifier() {
        assert!(is_identifier("user_id"));
        assert!(is_identifier("_x1"));
        assert!(!is_identifier("1abc"));
        assert!(!is_identifier("a b"));
        assert!(!is_identifier(""));
    }

    #[test]
    fn test_foreign_key() {
        let fk = parse_foreign_key("users.id").unwrap();
        assert_eq!(fk.table, "users");
        assert_eq!(fk.column, "id");
        assert!(parse_foreign_key("users").is_err());
        assert!(parse_foreign_key("users.id.x").is_err());
    }

    #[test]
    fn test_column_types() {
        assert_eq!(parse_column_type("integer").unwrap(), (ColumnType::Integer, None));
        assert_eq!(parse_column_type("string(50)").unwrap(), (ColumnType::String, Some(50)));
        assert_eq!(parse_column_type(" VARCHAR ( 3 ) ").unwrap(), (ColumnType::String, Some(3)));
        assert_eq!(parse_column_type("datetime").unwrap(), (ColumnType::DateTime, None));
        assert_eq!(parse_column_type("date").unwrap(), (ColumnType::Date, None));
        let err = parse_column_type("blob").unwrap_err();
        assert!(matches!(err, ClauseError::Parse { position: 0, .. }));
    }

    #[test]
    fn test_values() {
        assert_eq!(parse_value("42"), Value::Int(42));
        assert_eq!(parse_value("4.5"), Value::Float(4.5));
        assert_eq!(parse_value("NULL"), Value::Null);
        assert_eq!(parse_value("true"), Value::Bool(true));
        assert_eq!(parse_value("'42'"), Value::String("42".to_string()));
        assert_eq!(parse_value("John"), Value::String("John".to_string()));
    }

    #[test]
    fn test_filters() {
        let f = parse_filter("id>=10").unwrap();
        assert_eq!(f.column, "id");
        assert_eq!(f.op, FilterOp::Ge);
        assert_eq!(f.value, Value::Int(10));

        let f = parse_filter("lastname ~ Do%").unwrap();
        assert_eq!(f.op, FilterOp::Like);
        assert_eq!(f.value, Value::String("Do%".to_string()));

        assert_eq!(parse_filter("a!=b").unwrap().op, FilterOp::Ne);
        assert!(parse_filter("=1").is_err());
    }

    #[test]
    fn test_assignment_and_order() {
        assert_eq!(
            parse_assignment("firstname=John").unwrap(),
            ("firstname".to_string(), Value::String("John".to_string()))
        );
        assert_eq!(parse_order("id").unwrap(), ("id".to_string(), None));
        assert_eq!(
            parse_order("id:desc").unwrap(),
            ("id".to_string(), Some(Operator::Desc))
        );
        assert!(parse_order("id:sideways").is_err());
    }
}
