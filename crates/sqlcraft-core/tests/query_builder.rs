//! End-to-end query builder behavior: binding alignment, pagination
//! across dialects, mutator guards and insert batching.

use sqlcraft_core::{Dialect, Error, QueryBuilder, Row, Value};

fn builder(dialect: Dialect) -> QueryBuilder {
    let mut q = QueryBuilder::new(dialect);
    q.table("orders").unwrap();
    q
}

#[test]
fn placeholder_count_equals_binding_count() {
    let mut q = builder(Dialect::Mysql);
    q.select(&["id", "total"]).unwrap();
    q.where_("status", "=", "paid").unwrap();
    q.or_where("total", ">", 100_i64).unwrap();
    q.where_in("region", vec!["eu", "us"]).unwrap();
    q.where_between("created", 10_i64, 20_i64).unwrap();
    q.where_group(|g| {
        g.where_("a", "=", 1_i64)?.or_where("b", "!=", 2_i64)?;
        Ok(())
    })
    .unwrap();
    q.group_by(&["region"]).unwrap();
    q.having("total", ">=", 5_i64).unwrap();

    let statement = q.get().unwrap();
    assert_eq!(statement.sql.matches('?').count(), statement.bindings.len());
    assert_eq!(statement.bindings.len(), 9);
}

#[test]
fn build_twice_is_identical() {
    let mut q = builder(Dialect::Sqlsrv);
    q.where_("id", ">", 5_i64).unwrap();
    q.order("id", "ASC").unwrap();
    q.limit(10);
    q.page(2).unwrap();

    assert_eq!(q.build().unwrap(), q.build().unwrap());
}

#[test]
fn sqlsrv_pagination_scenario() {
    let mut q = builder(Dialect::Sqlsrv);
    q.limit(10);
    assert_eq!(q.build().unwrap(), "SELECT TOP 10 * FROM [orders]");

    q.page(2).unwrap();
    assert!(matches!(
        q.build(),
        Err(Error::PaginationRequiresOrder("sqlsrv"))
    ));

    q.order("id", "ASC").unwrap();
    assert_eq!(
        q.build().unwrap(),
        "SELECT * FROM [orders] ORDER BY [id] ASC OFFSET 10 ROWS FETCH NEXT 10 ROWS ONLY"
    );
}

#[test]
fn sqlsrv_distinct_limit_keeps_keyword_order() {
    let mut q = builder(Dialect::Sqlsrv);
    q.select(&["region"]).unwrap();
    q.distinct();
    q.limit(10);
    assert_eq!(
        q.build().unwrap(),
        "SELECT DISTINCT TOP 10 [region] FROM [orders]"
    );
}

#[test]
fn pagination_across_dialects() {
    for (dialect, expected) in [
        (Dialect::Mysql, "SELECT * FROM `orders` LIMIT 5 OFFSET 10"),
        (Dialect::Pgsql, "SELECT * FROM \"orders\" LIMIT 5 OFFSET 10"),
        (Dialect::Sqlite, "SELECT * FROM \"orders\" LIMIT 5 OFFSET 10"),
        (Dialect::Firebird, "SELECT * FROM \"orders\" ROWS 11 TO 15"),
    ] {
        let mut q = builder(dialect);
        q.limit(5);
        q.page(3).unwrap();
        assert_eq!(q.build().unwrap(), expected, "{dialect}");
    }
}

#[test]
fn mutators_fail_closed_without_where() {
    let mut q = builder(Dialect::Mysql);
    q.limit(3);

    assert!(matches!(
        q.update(vec![("status", Value::Text("done".into()))]),
        Err(Error::MissingWhereClause("update"))
    ));
    assert!(matches!(q.delete(), Err(Error::MissingWhereClause("delete"))));
    assert!(matches!(
        q.increment("hits", 1),
        Err(Error::MissingWhereClause("increment"))
    ));
    assert!(matches!(
        q.decrement("hits", 1),
        Err(Error::MissingWhereClause("decrement"))
    ));

    // The failed mutators left the accumulated state untouched.
    assert_eq!(q.build().unwrap(), "SELECT * FROM `orders` LIMIT 3");
}

#[test]
fn insert_scenario() {
    let mut q = builder(Dialect::Mysql);
    let rows: Vec<Row<'_>> = vec![
        vec![("a", Value::Int(1)), ("b", Value::Int(2))],
        vec![("a", Value::Int(3)), ("b", Value::Int(4))],
    ];
    let statements = q.insert(&rows).unwrap();
    assert_eq!(statements.len(), 1);
    assert_eq!(
        statements[0].sql,
        "INSERT INTO `orders` (`a`, `b`) VALUES (?, ?), (?, ?)"
    );
    assert_eq!(
        statements[0].bindings,
        vec![Value::Int(1), Value::Int(2), Value::Int(3), Value::Int(4)]
    );
}

#[test]
fn insert_inconsistent_rows_produce_nothing() {
    let mut q = builder(Dialect::Mysql);
    let rows: Vec<Row<'_>> = vec![
        vec![("a", Value::Int(1))],
        vec![("b", Value::Int(2))],
    ];
    assert!(matches!(
        q.insert(&rows),
        Err(Error::InconsistentInsertColumns { row: 1 })
    ));
    // The guard failed before reset, so prior state is intact.
    assert_eq!(q.build().unwrap(), "SELECT * FROM `orders`");
}

#[test]
fn update_then_builder_is_reusable() {
    let mut q = builder(Dialect::Pgsql);
    q.where_("id", "=", 9_i64).unwrap();
    let statement = q.update(vec![("status", Value::Text("done".into()))]).unwrap();
    assert_eq!(
        statement.sql,
        "UPDATE \"orders\" SET \"status\" = ? WHERE \"id\" = ?"
    );

    // After a successful mutation the builder compiles fresh queries
    // against the same table.
    q.where_null("shipped_at").unwrap();
    let statement = q.get().unwrap();
    assert_eq!(
        statement.sql,
        "SELECT * FROM \"orders\" WHERE \"shipped_at\" IS NULL"
    );
}

#[test]
fn soft_delete_lifecycle() {
    let mut q = builder(Dialect::Mysql);
    q.soft(true);

    q.where_("id", "=", 1_i64).unwrap();
    let statement = q.delete().unwrap();
    assert_eq!(
        statement.sql,
        "UPDATE `orders` SET `deleted_at` = CURRENT_TIMESTAMP WHERE `id` = ?"
    );

    // Trashed rows stay queryable and can come back.
    q.only_trashed().unwrap();
    assert_eq!(
        q.build().unwrap(),
        "SELECT * FROM `orders` WHERE `deleted_at` IS NOT NULL"
    );
    q.where_("id", "=", 1_i64).unwrap();
    let statement = q.restore().unwrap();
    assert_eq!(
        statement.sql,
        "UPDATE `orders` SET `deleted_at` = NULL WHERE `id` = ?"
    );

    // Day-to-day reads exclude the trash explicitly.
    q.without_trashed().unwrap();
    assert_eq!(
        q.build().unwrap(),
        "SELECT * FROM `orders` WHERE `deleted_at` IS NULL"
    );
}

#[test]
fn debug_rendering_is_marked_unsafe_to_execute() {
    let mut q = builder(Dialect::Mysql);
    q.where_("name", "LIKE", "%o'brien%").unwrap();
    let statement = q.get().unwrap();
    assert_eq!(
        statement.debug(),
        "SELECT * FROM `orders` WHERE `name` LIKE '%o\\'brien%'"
    );
}

#[test]
fn malicious_identifiers_never_reach_sql() {
    let mut q = builder(Dialect::Mysql);
    assert!(matches!(
        q.where_("name; --", "=", 1_i64),
        Err(Error::InvalidIdentifier(_))
    ));
    assert!(matches!(
        q.select(&["a", "b) FROM secrets; --"]),
        Err(Error::InvalidIdentifier(_))
    ));
    assert!(matches!(
        QueryBuilder::new(Dialect::Mysql).table("orders`; DROP"),
        Err(Error::InvalidIdentifier(_))
    ));
}

#[test]
fn count_and_pluck_shapes() {
    let mut q = builder(Dialect::Oci);
    q.where_("total", ">", 0_i64).unwrap();
    let statement = q.count().unwrap();
    assert_eq!(
        statement.sql,
        "SELECT COUNT(*) AS count FROM \"orders\" WHERE \"total\" > ?"
    );

    q.where_("total", ">", 0_i64).unwrap();
    let statement = q.pluck("id").unwrap();
    assert_eq!(
        statement.sql,
        "SELECT \"id\" FROM \"orders\" WHERE \"total\" > ?"
    );
}
