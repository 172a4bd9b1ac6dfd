//! Compiler test modules.
//!
//! - `core`: tables, columns, operators, bind parameters, conjunctions, joins
//! - `negation`: `not_` over every operator family
//! - `statements`: SELECT, INSERT, UPDATE, DELETE
//! - `dialects`: identifier quoting

mod dialects;
mod statements;

use crate::schema::{Column, ColumnType, Table};

pub(super) fn users() -> Table {
    Table::new(
        "users",
        vec![
            Column::new("id", ColumnType::Integer),
            Column::new("firstname", ColumnType::String),
            Column::new("lastname", ColumnType::String),
        ],
    )
    .unwrap()
}

pub(super) fn addresses() -> Table {
    Table::new(
        "addresses",
        vec![
            Column::new("user_id", ColumnType::Integer).references("users", "id"),
            Column::new("email_address", ColumnType::String),
        ],
    )
    .unwrap()
}
