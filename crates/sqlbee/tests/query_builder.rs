use sqlbee::{Operator, Predicate, Statement, Table, Value, query, sub_query};

fn assert_aligned(stmt: &Statement) {
    let rendered = stmt.render();
    assert_eq!(
        rendered.placeholder_count(),
        rendered.params.len(),
        "placeholders out of step with params in `{}`",
        rendered.sql
    );
}

const BASE: &str = "SELECT T1.* FROM TABLE1 AS T1 INNER JOIN TABLE2 AS T2 ON (T2.ID = T1.ID)";

#[test]
fn incremental_build_sequence() {
    let mut qb = query();
    qb.table("TABLE1", "T1");

    let stmt = qb.build().unwrap();
    assert_eq!(stmt.output(), "SELECT * FROM TABLE1 AS T1");
    assert!(stmt.params().is_empty());

    // two-table join
    qb.select()
        .column("T1.*")
        .end()
        .tables()
        .inner_join(Table::new("TABLE2", "T2"))
        .on("T2.ID", "T1.ID")
        .end();
    let stmt = qb.build().unwrap();
    assert_eq!(stmt.output(), BASE);
    assert!(stmt.params().is_empty());

    qb.condition()
        .operator(Operator::Eq)
        .left("T1.CATAGORY")
        .right(Value::from("TEST"))
        .end();
    let filtered = qb.build().unwrap();
    let filtered_sql = format!("{BASE} WHERE (T1.CATAGORY = ?)");
    assert_eq!(filtered.output(), filtered_sql);
    assert_eq!(filtered.params(), vec![Value::from("TEST")]);

    // ordering, then removal restores the prior text
    qb.order().column("T1.CREATE_DATE").desc().end();
    assert_eq!(
        qb.build().unwrap().output(),
        format!("{filtered_sql} ORDER BY T1.CREATE_DATE DESC")
    );
    qb.remove_order();
    assert_eq!(qb.build().unwrap().output(), filtered_sql);

    // pagination
    qb.first_results(100).max_results(400);
    let stmt = qb.build().unwrap();
    assert_eq!(stmt.output(), format!("{filtered_sql} LIMIT ?,?"));
    let params = stmt.params();
    assert_eq!(params.len(), 3);
    assert_eq!(params[0], "TEST");
    assert_eq!(params[1], 100i64);
    assert_eq!(params[2], 400i64);
    qb.remove_first_results().remove_max_results();
    assert_eq!(qb.build().unwrap().output(), filtered_sql);

    // aggregate mode
    qb.count(true);
    let stmt = qb.build().unwrap();
    assert_eq!(
        stmt.output(),
        "SELECT COUNT(*) COUNT FROM TABLE1 AS T1 INNER JOIN TABLE2 AS T2 ON (T2.ID = T1.ID) WHERE (T1.CATAGORY = ?)"
    );
    assert_eq!(stmt.params().len(), 1);
    qb.count(false);
    assert_eq!(qb.build().unwrap().output(), filtered_sql);

    // more projection columns
    qb.select()
        .table_column("T2", "ID", "ID2")
        .column_as("T2.CODE", "CODE2")
        .end();
    let head = "SELECT T1.*,T2.ID ID2,T2.CODE CODE2 FROM TABLE1 AS T1 \
                INNER JOIN TABLE2 AS T2 ON (T2.ID = T1.ID) WHERE (T1.CATAGORY = ?)";
    assert_eq!(qb.build().unwrap().output(), head);

    qb.is_null().column("T1.CREATOR").end();
    qb.is_not_null().column("T2.ENABLED").end();
    let with_nulls = format!("{head} AND (T1.CREATOR IS NULL) AND (T2.ENABLED IS NOT NULL)");
    let stmt = qb.build().unwrap();
    assert_eq!(stmt.output(), with_nulls);
    assert_eq!(stmt.params().len(), 1);

    qb.between()
        .column("T1.START_DATE")
        .lower(Value::from(2015))
        .upper(Value::from(2018))
        .end();
    let with_range = format!("{with_nulls} AND (T1.START_DATE BETWEEN ? AND ?)");
    let stmt = qb.build().unwrap();
    assert_eq!(stmt.output(), with_range);
    assert_eq!(stmt.params()[1], 2015);
    assert_eq!(stmt.params()[2], 2018);

    qb.in_list()
        .column("T2.CODE")
        .values(["1", "2", "3", "4", "5", "6"])
        .end();
    let with_in = format!("{with_range} AND (T2.CODE IN(?,?,?,?,?,?))");
    let stmt = qb.build().unwrap();
    assert_eq!(stmt.output(), with_in);
    let params = stmt.params();
    assert_eq!(params.len(), 9);
    for (i, expected) in ["1", "2", "3", "4", "5", "6"].iter().enumerate() {
        assert_eq!(params[i + 3], *expected);
    }

    // IN list above the chunk size
    let names: Vec<String> = (0..2235).map(|i| format!("test{i}")).collect();
    qb.in_list().column("T1.NAME").values(names.clone()).end();
    let stmt = qb.build().unwrap();
    let group = |n: usize| format!("T1.NAME IN({})", vec!["?"; n].join(","));
    assert_eq!(
        stmt.output(),
        format!(
            "{with_in} AND ({} OR {} OR {})",
            group(1000),
            group(1000),
            group(235)
        )
    );
    let params = stmt.params();
    assert_eq!(params.len(), 2244);
    assert_eq!(params[0], "TEST");
    for (i, name) in names.iter().enumerate() {
        assert_eq!(params[i + 9], *name);
    }
    assert_aligned(&stmt);
}

#[test]
fn group_having_order() {
    let stmt = query()
        .table("TABLE1", "T1")
        .group_by("T1.CODE")
        .group_by("T1.CLASS")
        .having_predicate(Predicate::gt("COUNt(*)", Value::from(2)))
        .order_by("T1.ID")
        .desc()
        .end()
        .build()
        .unwrap();
    assert_eq!(
        stmt.output(),
        "SELECT * FROM TABLE1 AS T1 GROUP BY T1.CODE,T1.CLASS HAVING (COUNt(*) > ?) ORDER BY T1.ID DESC"
    );
    assert_eq!(stmt.params(), vec![Value::from(2)]);
}

fn correlated_sub() -> Statement {
    sub_query()
        .table("TABLE2", "T2")
        .condition_op(Operator::Eq)
        .left("T2.NAME")
        .value("测试")
        .end()
        .condition_op(Operator::Eq)
        .left("T1.ID")
        .right("T2.ID")
        .end()
        .build()
        .unwrap()
}

#[test]
fn exists_splices_sub_params() {
    let stmt = query()
        .table("TABLE1", "T1")
        .end()
        .condition_op(Operator::Gt)
        .left("T1.CODE")
        .value(111)
        .end()
        .exists()
        .sub(correlated_sub())
        .end()
        .condition_op(Operator::Eq)
        .left("T1.CLASS")
        .value("ABC")
        .end()
        .build()
        .unwrap();
    assert_eq!(
        stmt.output(),
        "SELECT * FROM TABLE1 AS T1 WHERE (T1.CODE > ?) AND (T1.CLASS = ?) AND \
         EXISTS (SELECT * FROM TABLE2 AS T2 WHERE (T2.NAME = ?) AND (T1.ID = T2.ID))"
    );
    let params = stmt.params();
    assert_eq!(params[0], 111);
    assert_eq!(params[1], "ABC");
    assert_eq!(params[2], "测试");
    assert_aligned(&stmt);
}

#[test]
fn exists_first_then_plain_predicates() {
    let stmt = query()
        .table("TABLE1", "T1")
        .end()
        .exists()
        .sub(correlated_sub())
        .end()
        .condition_op(Operator::Eq)
        .left("T1.CLASS")
        .value("ABC")
        .end()
        .in_list()
        .left("T1.ID")
        .values([1, 2])
        .end()
        .is_null()
        .left("T1.DELETED")
        .end()
        .build()
        .unwrap();
    assert_eq!(
        stmt.output(),
        "SELECT * FROM TABLE1 AS T1 WHERE (T1.CLASS = ?) AND (T1.ID IN(?,?)) AND \
         (T1.DELETED IS NULL) AND \
         EXISTS (SELECT * FROM TABLE2 AS T2 WHERE (T2.NAME = ?) AND (T1.ID = T2.ID))"
    );
    assert_eq!(
        stmt.params(),
        vec![
            Value::from("ABC"),
            Value::from(1),
            Value::from(2),
            Value::from("测试"),
        ]
    );
    assert_aligned(&stmt);
}

#[test]
fn not_exists_between_parent_params() {
    let stmt = query()
        .table("TABLE1", "T1")
        .end()
        .condition_op(Operator::Gt)
        .left("T1.CODE")
        .value(111)
        .end()
        .not_exists()
        .sub(correlated_sub())
        .end()
        .condition_op(Operator::Like)
        .left("T1.NAME")
        .value("A%")
        .end()
        .exists()
        .sub(
            sub_query()
                .table("TABLE3", "T3")
                .end()
                .condition_op(Operator::Eq)
                .left("T3.KIND")
                .value(7)
                .end()
                .build()
                .unwrap(),
        )
        .end()
        .build()
        .unwrap();
    assert_eq!(
        stmt.output(),
        "SELECT * FROM TABLE1 AS T1 WHERE (T1.CODE > ?) AND (T1.NAME LIKE ?) AND \
         NOT EXISTS (SELECT * FROM TABLE2 AS T2 WHERE (T2.NAME = ?) AND (T1.ID = T2.ID)) AND \
         EXISTS (SELECT * FROM TABLE3 AS T3 WHERE (T3.KIND = ?))"
    );
    assert_eq!(
        stmt.params(),
        vec![
            Value::from(111),
            Value::from("A%"),
            Value::from("测试"),
            Value::from(7),
        ]
    );
    assert_aligned(&stmt);
}

#[test]
fn not_exists_only() {
    let stmt = query()
        .table("TABLE1", "T1")
        .end()
        .not_exists()
        .sub(correlated_sub())
        .end()
        .build()
        .unwrap();
    assert_eq!(
        stmt.output(),
        "SELECT * FROM TABLE1 AS T1 WHERE \
         NOT EXISTS (SELECT * FROM TABLE2 AS T2 WHERE (T2.NAME = ?) AND (T1.ID = T2.ID))"
    );
    assert_eq!(stmt.params(), vec![Value::from("测试")]);
}

#[test]
fn chained_left_joins() {
    let mut qb = query();
    qb.table("TABLE1", "T1")
        .select()
        .column("T1.*")
        .end()
        .left_join(Table::new("TABLE2", "T2"))
        .on("T1.ID", "T2.ID")
        .left_join(Table::new("TABLE4", "T4"))
        .on("T1.ID", "T4.ID")
        .end();
    assert_eq!(
        qb.build().unwrap().output(),
        "SELECT T1.* FROM TABLE1 AS T1 LEFT JOIN TABLE2 AS T2 ON (T1.ID = T2.ID) \
         LEFT JOIN TABLE4 AS T4 ON (T1.ID = T4.ID)"
    );

    // literal ON operand, then a WHERE literal: params follow render order
    qb.tables()
        .left_join(Table::new("TABLE5", "T5"))
        .on("T5.KIND", Value::from("1"))
        .end()
        .condition_op(Operator::Like)
        .left("T1.NAME")
        .value("test")
        .end();
    let stmt = qb.build().unwrap();
    assert!(
        stmt.output()
            .ends_with("LEFT JOIN TABLE5 AS T5 ON (T5.KIND = ?) WHERE (T1.NAME LIKE ?)")
    );
    assert_eq!(stmt.params(), vec![Value::from("1"), Value::from("test")]);
}

#[test]
fn right_join_then_select() {
    let stmt = query()
        .table("TABLE1", "T1")
        .right_join(Table::new("TABLE2", "T2").with_tag(1))
        .on("T1.ID", "T2.ID")
        .end()
        .select()
        .column("T1.*")
        .end()
        .build()
        .unwrap();
    assert_eq!(
        stmt.output(),
        "SELECT T1.* FROM TABLE1 AS T1 RIGHT JOIN TABLE2 AS T2 ON (T1.ID = T2.ID)"
    );
    assert!(stmt.params().is_empty());
}

#[test]
fn where_after_join_keeps_render_order() {
    let stmt = query()
        .table("TABLE1", "T1")
        .condition_op(Operator::Eq)
        .left("T1.A")
        .value(1)
        .end()
        .inner_join(("TABLE2", "T2"))
        .condition_op(Operator::Eq)
        .left("T2.B")
        .value(2)
        .end()
        .end()
        .build()
        .unwrap();
    assert_eq!(
        stmt.output(),
        "SELECT * FROM TABLE1 AS T1 INNER JOIN TABLE2 AS T2 ON (T2.B = ?) WHERE (T1.A = ?)"
    );
    let params = stmt.params();
    assert_eq!(params[0], 2);
    assert_eq!(params[1], 1);
}

#[test]
fn comparison_with_sub_statement() {
    let max_id = sub_query()
        .table("TABLE2", "T2")
        .select()
        .column("MAX(T2.ID)")
        .end()
        .condition_op(Operator::Eq)
        .left("T2.KIND")
        .value(3)
        .end()
        .build()
        .unwrap();
    let stmt = query()
        .table("TABLE1", "T1")
        .condition_op(Operator::Lt)
        .left("T1.ID")
        .sub(max_id)
        .end()
        .build()
        .unwrap();
    assert_eq!(
        stmt.output(),
        "SELECT * FROM TABLE1 AS T1 WHERE (T1.ID < (SELECT MAX(T2.ID) FROM TABLE2 AS T2 WHERE (T2.KIND = ?)))"
    );
    assert_eq!(stmt.params(), vec![Value::from(3)]);
}

#[test]
fn rendered_json_shape() {
    let stmt = query()
        .table("TABLE1", "T1")
        .condition_op(Operator::Eq)
        .left("T1.ID")
        .value(5i64)
        .end()
        .build()
        .unwrap();
    let json: serde_json::Value = serde_json::from_str(&stmt.render().to_json().unwrap()).unwrap();
    assert_eq!(json["sql"], "SELECT * FROM TABLE1 AS T1 WHERE (T1.ID = ?)");
    assert_eq!(json["params"][0]["datum"]["type"], "int");
    assert_eq!(json["params"][0]["datum"]["value"], 5);
}

#[test]
fn operator_chosen_after_values() {
    let stmt = query()
        .table("TABLE1", "T1")
        .end()
        .condition()
        .left("T1.ID")
        .value(1)
        .value(2)
        .operator(Operator::In)
        .end()
        .build()
        .unwrap();
    assert_eq!(stmt.output(), "SELECT * FROM TABLE1 AS T1 WHERE (T1.ID IN(?,?))");
    assert_eq!(stmt.params(), vec![Value::from(1), Value::from(2)]);
    assert_aligned(&stmt);
}
