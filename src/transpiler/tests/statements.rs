//! SELECT, INSERT, UPDATE and DELETE compilation.

use pretty_assertions::assert_eq;

use super::{addresses, users};
use crate::ast::{ClauseElement, Select, Selectable, Value, and_, or_};
use crate::schema::{Column, ColumnType, Table};
use crate::error::ClauseError;
use crate::transpiler::Compile;

fn sql(element: impl Compile) -> String {
    element.compile().unwrap().sql().to_string()
}

#[test]
fn test_select() {
    let u = users();
    let a = addresses();

    assert_eq!(sql(u.select()), "SELECT users.id, users.firstname, users.lastname FROM users");
    assert_eq!(
        sql(u.select_columns(&["firstname", "lastname"]).unwrap()),
        "SELECT users.firstname, users.lastname FROM users"
    );
    assert_eq!(
        sql(Select::new(vec![
            u.c("firstname").unwrap().into(),
            u.c("lastname").unwrap().into(),
        ])),
        "SELECT users.firstname, users.lastname FROM users"
    );
    assert_eq!(
        sql(Select::new(vec![u.c("lastname").unwrap().into()]).distinct()),
        "SELECT DISTINCT users.lastname FROM users"
    );
    assert_eq!(
        sql(Select::new(vec![u.clone().into(), a.clone().into()])),
        "SELECT users.id, users.firstname, users.lastname, addresses.user_id, \
         addresses.email_address FROM users, addresses"
    );
}

#[test]
fn test_select_alias() {
    let u = users().alias("u").unwrap();
    assert_eq!(
        sql(u.select_columns(&["firstname", "lastname"]).unwrap()),
        "SELECT u.firstname, u.lastname FROM users AS u"
    );
    assert_eq!(
        sql(Select::new(vec![
            u.c("firstname").unwrap().into(),
            u.c("lastname").unwrap().into(),
        ])),
        "SELECT u.firstname, u.lastname FROM users AS u"
    );
}

#[test]
fn test_select_unknown_column() {
    let err = users().select_columns(&["firstname", "nickname"]).unwrap_err();
    assert_eq!(err.to_string(), "Unknown column(s) nickname in users table");
}

#[test]
fn test_select_where() {
    let u = users();
    let compiled = u.select().where_(u.c("id").unwrap().eq(1)).compile().unwrap();
    assert_eq!(
        compiled.sql(),
        "SELECT users.id, users.firstname, users.lastname FROM users WHERE users.id = :id_1"
    );
    assert_eq!(compiled.params().get("id_1"), Some(&Value::Int(1)));

    assert_eq!(
        sql(u
            .select()
            .where_(u.c("firstname").unwrap().like("John"))
            .where_(u.c("lastname").unwrap().like("Doe"))),
        "SELECT users.id, users.firstname, users.lastname FROM users \
         WHERE users.firstname LIKE :firstname_1 AND users.lastname LIKE :lastname_1"
    );
}

#[test]
fn test_select_from_join() {
    let join = users().join(&addresses()).unwrap();
    assert_eq!(
        sql(join.select()),
        "SELECT users.id, users.firstname, users.lastname, addresses.user_id, \
         addresses.email_address FROM users JOIN addresses ON users.id = addresses.user_id"
    );
}

#[test]
fn test_select_without_froms() {
    let s = Select::new(vec![crate::ast::column("now").into()]);
    assert_eq!(sql(s), "SELECT now");
}

#[test]
fn test_order_by() {
    let u = users();
    let id = u.c("id").unwrap();
    let firstname = u.c("firstname").unwrap();
    assert_eq!(
        sql(u.select().order_by(id.clone())),
        "SELECT users.id, users.firstname, users.lastname FROM users ORDER BY users.id"
    );
    assert_eq!(
        sql(u.select().order_by(id.asc()).order_by(firstname.desc())),
        "SELECT users.id, users.firstname, users.lastname FROM users \
         ORDER BY users.id ASC,users.firstname DESC"
    );
}

#[test]
fn test_offset_and_limit() {
    let u = users();
    let base = "SELECT users.id, users.firstname, users.lastname FROM users";
    assert_eq!(sql(u.select().limit(10)), format!("{} LIMIT 10", base));
    assert_eq!(sql(u.select().offset(10)), format!("{} LIMIT -1 OFFSET 10", base));
    assert_eq!(
        sql(u.select().limit(10).offset(10)),
        format!("{} LIMIT 10 OFFSET 10", base)
    );
}

#[test]
fn test_insert() {
    let u = users();
    let compiled = u.insert().compile().unwrap();
    assert_eq!(
        compiled.sql(),
        "INSERT INTO users (id, firstname, lastname) VALUES (:id, :firstname, :lastname)"
    );
    assert!(compiled.params().is_empty());

    let compiled = u
        .insert()
        .values([("firstname", "John"), ("lastname", "Doe")])
        .compile()
        .unwrap();
    assert_eq!(
        compiled.sql(),
        "INSERT INTO users (firstname, lastname) VALUES (:firstname, :lastname)"
    );
    assert_eq!(compiled.params().get("lastname"), Some(&Value::from("Doe")));
}

#[test]
fn test_insert_unknown_columns() {
    let err = users()
        .insert()
        .values([("foo", 1), ("id", 2), ("bar", 3)])
        .compile()
        .unwrap_err();
    match &err {
        ClauseError::UnknownColumn { table, columns } => {
            assert_eq!(table, "users");
            assert_eq!(columns, &vec!["foo".to_string(), "bar".to_string()]);
        }
        other => panic!("unexpected: {:?}", other),
    }
    assert_eq!(err.to_string(), "Unknown column(s) foo, bar in users table");
}

#[test]
fn test_update() {
    let u = users();
    assert_eq!(
        sql(u.update()),
        "UPDATE users SET id = :id, firstname = :firstname, lastname = :lastname"
    );
    assert_eq!(
        sql(u.update().values([("firstname", "Jack")])),
        "UPDATE users SET firstname = :firstname"
    );

    let compiled = u
        .update()
        .values([("lastname", "DOE")])
        .where_(u.c("lastname").unwrap().like("Doe"))
        .compile()
        .unwrap();
    assert_eq!(
        compiled.sql(),
        "UPDATE users SET lastname = :lastname WHERE users.lastname LIKE :lastname_1"
    );
    assert_eq!(compiled.params().get("lastname"), Some(&Value::from("DOE")));
    assert_eq!(compiled.params().get("lastname_1"), Some(&Value::from("Doe")));
}

fn scores() -> Table {
    Table::new(
        "t",
        vec![
            Column::new("score", ColumnType::Integer),
            Column::new("score_1", ColumnType::Integer),
        ],
    )
    .unwrap()
}

#[test]
fn test_value_placeholders_never_collide_with_binds() {
    let t = scores();
    let score = t.c("score").unwrap();

    let compiled = t
        .update()
        .values([("score_1", 100)])
        .where_(score.eq(5))
        .compile()
        .unwrap();
    assert_eq!(
        compiled.sql(),
        "UPDATE t SET score_1 = :score_1 WHERE t.score = :score_2"
    );
    assert_eq!(compiled.params().get("score_1"), Some(&Value::Int(100)));
    assert_eq!(compiled.params().get("score_2"), Some(&Value::Int(5)));
    assert_eq!(compiled.params().len(), 2);

    assert_eq!(
        sql(t.update().where_(score.eq(5))),
        "UPDATE t SET score = :score, score_1 = :score_1 WHERE t.score = :score_2"
    );
}

#[test]
fn test_empty_inputs_fail() {
    let t = scores();
    let score = t.c("score").unwrap();
    let no_values = Vec::<(String, Value)>::new;

    let err = t.insert().values(no_values()).compile().unwrap_err();
    assert!(matches!(err, ClauseError::EmptyClause(_)));
    let err = t.update().values(no_values()).compile().unwrap_err();
    assert!(matches!(err, ClauseError::EmptyClause(_)));

    let empty: Vec<ClauseElement> = Vec::new();
    for condition in [and_(empty.clone()), or_(empty.clone())] {
        let err = t.select().where_(condition.clone()).compile().unwrap_err();
        assert!(matches!(err, ClauseError::EmptyClause(_)));
        let err = t.delete().where_(condition).compile().unwrap_err();
        assert!(matches!(err, ClauseError::EmptyClause(_)));
    }

    let nested = and_([score.eq(1), or_(empty)]);
    assert!(matches!(nested.compile(), Err(ClauseError::EmptyClause(_))));
}

#[test]
fn test_select_join_item() {
    let join: ClauseElement = users().join(&addresses()).unwrap().into();
    assert_eq!(
        sql(Select::new(vec![join])),
        "SELECT users.id, users.firstname, users.lastname, addresses.user_id, \
         addresses.email_address FROM users JOIN addresses ON users.id = addresses.user_id"
    );
    assert_eq!(
        sql(Select::new(vec![crate::schema::TableClause::new("t").into()])),
        "SELECT * FROM t"
    );
}

#[test]
fn test_update_unknown_column() {
    let err = users().update().values([("nickname", "x")]).compile().unwrap_err();
    assert!(matches!(err, ClauseError::UnknownColumn { .. }));
}

#[test]
fn test_delete() {
    let u = users();
    assert_eq!(sql(u.delete()), "DELETE FROM users");
    assert_eq!(
        sql(u.delete().where_(u.c("lastname").unwrap().like("Doe"))),
        "DELETE FROM users WHERE users.lastname LIKE :lastname_1"
    );
}

#[test]
fn test_statement_round_trips_through_json() {
    let u = users();
    let tree: ClauseElement = u
        .select()
        .where_(u.c("id").unwrap().in_([1, 2]))
        .order_by(u.c("lastname").unwrap().desc())
        .limit(5)
        .into();
    let loaded = ClauseElement::from_json(&tree.to_json().unwrap()).unwrap();
    assert_eq!(loaded, tree);
    assert_eq!(
        sql(loaded),
        "SELECT users.id, users.firstname, users.lastname FROM users \
         WHERE users.id IN (:id_1,:id_2) ORDER BY users.lastname DESC LIMIT 5"
    );
}

#[test]
fn test_update_and_delete_nest_where_trees() {
    let u = users();
    let id = u.c("id").unwrap();
    let update: ClauseElement = u
        .update()
        .values([("lastname", "Doe")])
        .where_(id.eq(1))
        .into();
    let delete: ClauseElement = u.delete().where_(id.gt(1)).where_(id.lt(9)).into();
    for tree in [update, delete] {
        let loaded = ClauseElement::from_json(&tree.to_json().unwrap()).unwrap();
        assert_eq!(loaded, tree);
    }
    assert_eq!(
        sql(u.delete().where_(id.gt(1)).where_(id.lt(9))),
        "DELETE FROM users WHERE users.id > :id_1 AND users.id < :id_2"
    );
}
