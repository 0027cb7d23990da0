use std::sync::Arc;

use nullsafe::{
    Executor, MapParameterSource, NamedArgs, NullSafe, NullSafeOptions, ParamMap, ParamTarget,
    SafeSetter, SqlType, TypeSource, Value,
};
use nullsafe_test::{
    setup_if_needed, Bound, CallKind, MockDatabaseError, MockExecutor, RecordingSink,
};

fn wrap(inner: MockExecutor) -> (NullSafe<MockExecutor>, RecordingSink) {
    setup_if_needed();

    let sink = RecordingSink::new();
    let exec = NullSafe::with_sink(inner, NullSafeOptions::new(), Arc::new(sink.clone()));

    (exec, sink)
}

/// An interceptor in front of a strict driver that binds through the same setter.
fn strict() -> (NullSafe<MockExecutor>, RecordingSink) {
    setup_if_needed();

    let sink = RecordingSink::new();
    let setter = SafeSetter::with_sink(NullSafeOptions::new(), Arc::new(sink.clone()));
    let exec = NullSafe::with_setter(MockExecutor::with_setter(setter.clone()), setter);

    (exec, sink)
}

fn typed_null(ty: SqlType) -> Value {
    Value::TypedNull(ty)
}

#[test]
fn it_types_nulls_in_single_exec() -> anyhow::Result<()> {
    let (mut exec, sink) = wrap(MockExecutor::new());

    let sql = "UPDATE t SET a=? WHERE b=?";
    let mut args = vec![Value::Null, Value::from("x")];

    exec.execute(sql, &mut args, None)?;

    let call = exec.get_ref().last_call().unwrap();
    assert_eq!(exec.get_ref().calls().len(), 1);
    assert_eq!(call.sql, sql);
    assert_eq!(call.args, [[typed_null(SqlType::Varchar), Value::from("x")]]);

    let records = sink.take();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].target, ParamTarget::Position(1));
    assert_eq!(records[0].sql_type, SqlType::Varchar);
    assert!(records[0].is_null);

    Ok(())
}

#[test]
fn it_keeps_order_and_count_in_single_exec() -> anyhow::Result<()> {
    let (mut exec, _) = wrap(MockExecutor::new());

    let mut args = vec![
        Value::Int(1),
        Value::Null,
        Value::from("two"),
        Value::Null,
        Value::Bool(false),
    ];

    exec.execute("INSERT INTO t VALUES (?,?,?,?,?)", &mut args, None)?;

    assert_eq!(
        exec.get_ref().last_call().unwrap().args[0],
        [
            Value::Int(1),
            typed_null(SqlType::Varchar),
            Value::from("two"),
            typed_null(SqlType::Varchar),
            Value::Bool(false),
        ]
    );

    Ok(())
}

#[test]
fn it_leaves_single_exec_with_declared_types_alone() -> anyhow::Result<()> {
    let (mut exec, sink) = wrap(MockExecutor::new());

    let original = vec![Value::Null, Value::Int(7)];
    let mut args = original.clone();
    let declared = [SqlType::Numeric, SqlType::Integer];

    // the raw mock driver refuses the untyped null, which proves it arrived as-is
    let err = exec
        .execute("UPDATE t SET a=? WHERE b=?", &mut args, Some(&declared))
        .unwrap_err();

    assert_eq!(
        err.as_database_error().and_then(|e| e.code()).as_deref(),
        Some("ORA-17004")
    );
    assert_eq!(args, original);
    assert_eq!(exec.get_ref().last_call().unwrap().args, [original]);
    assert!(sink.take().is_empty());

    Ok(())
}

#[test]
fn it_types_batch_nulls_from_declared_types() -> anyhow::Result<()> {
    let (mut exec, sink) = wrap(MockExecutor::new());

    let mut rows = vec![
        vec![Value::Null, Value::Int(5)],
        vec![Value::Int(3), Value::Null],
    ];
    let declared = [SqlType::Integer, SqlType::Numeric];

    let results = exec.execute_batch("INSERT INTO t VALUES (?,?)", &mut rows, Some(&declared))?;

    assert_eq!(results.len(), 2);
    assert_eq!(
        exec.get_ref().last_call().unwrap().args,
        [
            [typed_null(SqlType::Integer), Value::Int(5)],
            [Value::Int(3), typed_null(SqlType::Numeric)],
        ]
    );

    let records = sink.take();
    let summary: Vec<_> = records
        .iter()
        .map(|r| (r.target.clone(), r.sql_type))
        .collect();

    assert_eq!(
        summary,
        [
            (ParamTarget::Batch { row: 0, position: 1 }, SqlType::Integer),
            (ParamTarget::Batch { row: 1, position: 2 }, SqlType::Numeric),
        ]
    );

    Ok(())
}

#[test]
fn batch_columns_past_declared_types_fall_back() -> anyhow::Result<()> {
    let (mut exec, sink) = wrap(MockExecutor::new());

    let mut rows = vec![
        vec![Value::Null, Value::Null, Value::Null],
        vec![Value::Null],
    ];
    let declared = [SqlType::Timestamp];

    exec.execute_batch("INSERT INTO t VALUES (?,?,?)", &mut rows, Some(&declared))?;

    assert_eq!(
        rows,
        [
            vec![
                typed_null(SqlType::Timestamp),
                typed_null(SqlType::Varchar),
                typed_null(SqlType::Varchar),
            ],
            vec![typed_null(SqlType::Timestamp)],
        ]
    );

    let sources: Vec<_> = sink.take().iter().map(|r| r.source).collect();
    assert_eq!(
        sources,
        [
            TypeSource::Declared,
            TypeSource::Fallback,
            TypeSource::Fallback,
            TypeSource::Declared,
        ]
    );

    Ok(())
}

#[test]
fn batch_rows_resolve_independently() -> anyhow::Result<()> {
    let (mut exec, _) = wrap(MockExecutor::new());

    // the first row is already typed (and "wrong" for column 0); it must not leak into row 1
    let mut rows = vec![
        vec![typed_null(SqlType::Clob), Value::Null],
        vec![Value::Null, Value::Int(1)],
    ];
    let declared = [SqlType::Integer, SqlType::NVarchar];

    exec.execute_batch("INSERT INTO t VALUES (?,?)", &mut rows, Some(&declared))?;

    assert_eq!(
        rows,
        [
            vec![typed_null(SqlType::Clob), typed_null(SqlType::NVarchar)],
            vec![typed_null(SqlType::Integer), Value::Int(1)],
        ]
    );

    Ok(())
}

#[test]
fn unknown_typed_nulls_are_typed_again() -> anyhow::Result<()> {
    let (mut exec, sink) = wrap(MockExecutor::new());

    let mut args = vec![typed_null(SqlType::Unknown)];
    exec.execute("UPDATE t SET a=?", &mut args, None)?;

    assert_eq!(
        exec.get_ref().last_call().unwrap().args,
        [[typed_null(SqlType::Varchar)]]
    );
    assert_eq!(sink.take().len(), 1);

    let mut rows = vec![vec![typed_null(SqlType::Unknown)]];
    exec.execute_batch("INSERT INTO t VALUES (?)", &mut rows, Some(&[SqlType::Integer]))?;

    assert_eq!(
        exec.get_ref().last_call().unwrap().args,
        [[typed_null(SqlType::Integer)]]
    );

    let records = sink.take();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].source, TypeSource::Declared);

    Ok(())
}

#[test]
fn empty_calls_are_forwarded_once() -> anyhow::Result<()> {
    let (mut exec, sink) = wrap(MockExecutor::new());

    exec.execute("SELECT 1", &mut [], None)?;
    assert_eq!(exec.get_ref().calls().len(), 1);

    let declared = [SqlType::Integer];
    let results = exec.execute_batch("INSERT INTO t VALUES (?)", &mut [], Some(&declared))?;
    assert!(results.is_empty());
    assert_eq!(exec.get_ref().calls().len(), 2);
    assert_eq!(exec.get_ref().calls()[1].kind, CallKind::Batch);

    assert!(sink.take().is_empty());

    Ok(())
}

#[test]
fn it_leaves_batch_without_declared_types_alone() -> anyhow::Result<()> {
    let (mut exec, sink) = wrap(MockExecutor::new());

    let mut rows = vec![vec![Value::Int(1)], vec![Value::Null]];

    assert!(exec
        .execute_batch("INSERT INTO t VALUES (?)", &mut rows, None)
        .is_err());

    assert_eq!(rows[1], [Value::Null]);
    assert!(sink.take().is_empty());

    Ok(())
}

#[test]
fn it_types_nulls_in_named_maps() -> anyhow::Result<()> {
    let (mut exec, sink) = wrap(MockExecutor::new());

    let mut params = ParamMap::new();
    params.insert("name".to_owned(), Value::Null);
    params.insert("age".to_owned(), Value::Int(30));

    exec.execute_named(
        "UPDATE people SET name = :name WHERE age = :age",
        NamedArgs::Map(&mut params),
    )?;

    let call = exec.get_ref().last_call().unwrap();
    assert_eq!(call.kind, CallKind::Named);
    assert_eq!(call.names, ["name", "age"]);
    assert_eq!(call.args, [[typed_null(SqlType::Varchar), Value::Int(30)]]);

    // the caller's map was rewritten in place, keys untouched
    assert_eq!(params.keys().collect::<Vec<_>>(), ["name", "age"]);
    assert_eq!(params["name"], typed_null(SqlType::Varchar));
    assert_eq!(params["age"], Value::Int(30));

    let records = sink.take();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].target, ParamTarget::Name("name".into()));
    assert_eq!(records[0].sql_type, SqlType::Varchar);

    Ok(())
}

#[test]
fn it_leaves_parameter_sources_alone() -> anyhow::Result<()> {
    let (mut exec, sink) = strict();

    let source = MapParameterSource::new()
        .add_typed_value("born", None::<i64>, SqlType::Timestamp)
        .add_value("name", "ferris");

    exec.execute_named(
        "UPDATE people SET born = :born WHERE name = :name",
        NamedArgs::Source(&source),
    )?;

    let call = exec.get_ref().last_call().unwrap();
    assert_eq!(call.kind, CallKind::NamedSource);
    assert_eq!(call.args, [[Value::Null, Value::from("ferris")]]);

    // typed by the source's own declaration, at bind time
    assert_eq!(
        call.bound[0][0],
        Some(Bound::Null(SqlType::Timestamp))
    );

    let records = sink.take();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].target, ParamTarget::Position(1));
    assert_eq!(records[0].source, TypeSource::Declared);

    Ok(())
}

#[test]
fn rewriting_twice_does_not_double_wrap() -> anyhow::Result<()> {
    let (mut exec, sink) = wrap(MockExecutor::new());

    let mut args = vec![Value::Null, typed_null(SqlType::Clob), Value::Int(1)];

    exec.execute("UPDATE t SET a=?, b=? WHERE c=?", &mut args, None)?;
    let once = args.clone();
    assert_eq!(sink.take().len(), 1);

    exec.execute("UPDATE t SET a=?, b=? WHERE c=?", &mut args, None)?;

    assert_eq!(args, once);
    assert_eq!(args[1], typed_null(SqlType::Clob));
    assert!(sink.take().is_empty());

    let mut outer = NullSafe::new(exec, NullSafeOptions::new().logging_enabled(false));
    let mut args = vec![Value::Null];
    outer.execute("UPDATE t SET a=?", &mut args, None)?;

    assert_eq!(
        outer.get_ref().get_ref().last_call().unwrap().args,
        [[typed_null(SqlType::Varchar)]]
    );

    Ok(())
}

#[test]
fn driver_failures_pass_through_unchanged() -> anyhow::Result<()> {
    let (mut exec, _) = wrap(MockExecutor::new());

    let failure = MockDatabaseError::new("unique constraint violated").with_code("ORA-00001");
    exec.get_mut().fail_next(failure.clone());

    let mut args = vec![Value::Null];
    let err = exec
        .execute("INSERT INTO t VALUES (?)", &mut args, None)
        .unwrap_err();

    let db_err = err.as_database_error().expect("a database error");
    assert_eq!(db_err.message(), failure.message);
    assert_eq!(db_err.code().as_deref(), Some("ORA-00001"));

    // forwarded exactly once, with the rewrite applied
    assert_eq!(exec.get_ref().calls().len(), 1);
    assert_eq!(args, [typed_null(SqlType::Varchar)]);

    Ok(())
}

#[test]
fn disabled_logging_still_rewrites() -> anyhow::Result<()> {
    setup_if_needed();

    let sink = RecordingSink::with_values();
    let mut exec = NullSafe::with_sink(
        MockExecutor::new(),
        NullSafeOptions::new().logging_enabled(false),
        Arc::new(sink.clone()),
    );

    let mut args = vec![Value::Null];
    exec.execute("UPDATE t SET a=?", &mut args, None)?;

    assert_eq!(args, [typed_null(SqlType::Varchar)]);
    assert!(sink.take().is_empty());

    Ok(())
}

#[test]
fn strict_driver_accepts_every_rewritten_shape() -> anyhow::Result<()> {
    let (mut exec, _) = strict();

    let mut args = vec![Value::Null, Value::from("x")];
    exec.execute("UPDATE t SET a=? WHERE b=?", &mut args, None)?;

    let mut rows = vec![vec![Value::Null, Value::Int(5)], vec![Value::Int(3), Value::Null]];
    exec.execute_batch(
        "INSERT INTO t VALUES (?,?)",
        &mut rows,
        Some(&[SqlType::Integer, SqlType::Numeric]),
    )?;

    let mut params = ParamMap::new();
    params.insert("name".to_owned(), Value::Null);
    exec.execute_named("UPDATE t SET name = :name", NamedArgs::Map(&mut params))?;

    let bound: Vec<_> = exec
        .get_ref()
        .calls()
        .iter()
        .map(|call| call.bound.clone())
        .collect();

    assert_eq!(
        bound,
        [
            vec![vec![
                Some(Bound::Null(SqlType::Varchar)),
                Some(Bound::Value(SqlType::Unknown, Value::from("x"))),
            ]],
            vec![
                vec![
                    Some(Bound::Null(SqlType::Integer)),
                    Some(Bound::Value(SqlType::Numeric, Value::Int(5))),
                ],
                vec![
                    Some(Bound::Value(SqlType::Integer, Value::Int(3))),
                    Some(Bound::Null(SqlType::Numeric)),
                ],
            ],
            vec![vec![Some(Bound::Null(SqlType::Varchar))]],
        ]
    );

    Ok(())
}

#[test]
fn unwrapped_strict_driver_rejects_untyped_nulls() {
    setup_if_needed();

    let mut exec = MockExecutor::new();
    let mut args = vec![Value::Null];

    let err = exec
        .execute("UPDATE t SET a=?", &mut args, None)
        .unwrap_err();

    assert!(err.to_string().contains("invalid column type"));
}
