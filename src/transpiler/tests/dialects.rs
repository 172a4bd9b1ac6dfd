//! Identifier quoting tests.

use pretty_assertions::assert_eq;

use super::{addresses, users};
use crate::ast::Selectable;
use crate::transpiler::{Compile, Compiler, Dialect, IdentifierPreparer};

#[test]
fn test_postgres_quoting() {
    let compiler = Compiler::for_dialect(Dialect::Postgres);
    let u = users().alias("u").unwrap();
    let compiled = u
        .select_columns(&["firstname"])
        .unwrap()
        .where_(u.c("id").unwrap().eq(1))
        .compile_with(&compiler)
        .unwrap();
    assert_eq!(
        compiled.sql(),
        r#"SELECT "u"."firstname" FROM "users" AS u WHERE "u"."id" = :id_1"#
    );
}

#[test]
fn test_mysql_quoting() {
    let compiler = Compiler::for_dialect(Dialect::Mysql);
    let compiled = users()
        .insert()
        .values([("firstname", "John")])
        .compile_with(&compiler)
        .unwrap();
    assert_eq!(compiled.sql(), "INSERT INTO `users` (`firstname`) VALUES (:firstname)");

    let join = users().join(&addresses()).unwrap();
    assert_eq!(
        join.compile_with(&compiler).unwrap().sql(),
        "`users` JOIN `addresses` ON `users`.`id` = `addresses`.`user_id`"
    );
}

#[test]
fn test_custom_quote_pair() {
    let compiler = Compiler::new(IdentifierPreparer::new("[", Some("]")));
    let u = users();
    assert_eq!(
        u.delete()
            .where_(u.c("id").unwrap().gt(3))
            .compile_with(&compiler)
            .unwrap()
            .sql(),
        "DELETE FROM [users] WHERE [users].[id] > :id_1"
    );
    assert_eq!(
        u.update()
            .values([("lastname", "Doe")])
            .compile_with(&compiler)
            .unwrap()
            .sql(),
        "UPDATE [users] SET [lastname] = :lastname"
    );
}

#[test]
fn test_generic_dialect_is_unquoted() {
    let compiled = users()
        .select()
        .compile_with(&Compiler::for_dialect(Dialect::Generic))
        .unwrap();
    assert_eq!(compiled.sql(), users().select().compile().unwrap().sql());
}
