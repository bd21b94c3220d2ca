//! End-to-end session through the public `Database` API, including reopen

use tabledb::{
    AlwaysConfirm, ColumnDef, ColumnType, Condition, DBConfig, Database, ErrorKind, NeverConfirm,
    Outcome, Value,
};

fn users_columns() -> Vec<ColumnDef> {
    vec![
        ColumnDef::new("name", ColumnType::Str),
        ColumnDef::new("age", ColumnType::Int),
    ]
}

#[test]
fn test_session_survives_reopen() {
    let temp_dir = tempfile::tempdir().unwrap();
    let config = DBConfig::for_testing(temp_dir.path());

    {
        let db = Database::open(config.clone()).unwrap();
        let schema = db.create_table("users", users_columns()).unwrap();
        assert_eq!(schema.describe(), "ID:int, name:str, age:int");

        db.insert("users", vec!["Sergei".into(), 28.into()]).unwrap();
        db.insert("users", vec!["Ann".into(), 31.into()]).unwrap();

        let deleted = db
            .delete("users", &Condition::new("ID", 2), &mut AlwaysConfirm)
            .unwrap();
        assert_eq!(deleted, Outcome::Completed(1));
    }

    let db = Database::open(config).unwrap();
    assert_eq!(db.list_tables().unwrap(), vec!["users"]);

    let rows = db.select("users", None).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].get("name"), Some(&Value::from("Sergei")));

    // IDs are never reused, even after a delete and a reopen
    let record = db.insert("users", vec!["Bo".into(), 40.into()]).unwrap();
    assert_eq!(record.id(), Some(3));
}

#[test]
fn test_update_is_idempotent() {
    let temp_dir = tempfile::tempdir().unwrap();
    let db = Database::open(DBConfig::for_testing(temp_dir.path())).unwrap();
    db.create_table("users", users_columns()).unwrap();
    db.insert("users", vec!["Sergei".into(), 28.into()]).unwrap();

    let filter = Condition::new("name", "Sergei");
    assert_eq!(db.update("users", "age", Value::Int(29), &filter).unwrap(), 1);
    let after_first = db.select("users", None).unwrap();

    assert_eq!(db.update("users", "age", Value::Int(29), &filter).unwrap(), 1);
    assert_eq!(db.select("users", None).unwrap(), after_first);
}

#[test]
fn test_cache_is_scoped_per_table() {
    let temp_dir = tempfile::tempdir().unwrap();
    let db = Database::open(DBConfig::for_testing(temp_dir.path())).unwrap();
    db.create_table("users", users_columns()).unwrap();
    db.create_table("tags", vec![ColumnDef::new("label", ColumnType::Str)])
        .unwrap();
    db.insert("tags", vec!["red".into()]).unwrap();

    db.select("users", None).unwrap();
    db.select("tags", None).unwrap();
    assert_eq!(db.cache_stats().size, 2);

    db.insert("users", vec!["Ann".into(), 30.into()]).unwrap();
    assert_eq!(db.cache_stats().size, 1);

    // tags entry survived: this select is a hit
    let hits_before = db.cache_stats().hits;
    assert_eq!(db.select("tags", None).unwrap().len(), 1);
    assert_eq!(db.cache_stats().hits, hits_before + 1);

    assert_eq!(db.select("users", None).unwrap().len(), 1);
}

#[test]
fn test_declined_drop_and_errors() {
    let temp_dir = tempfile::tempdir().unwrap();
    let db = Database::open(DBConfig::for_testing(temp_dir.path())).unwrap();
    db.create_table("users", users_columns()).unwrap();

    assert!(db.drop_table("users", &mut NeverConfirm).unwrap().is_aborted());
    assert_eq!(db.info("users").unwrap().record_count, 0);

    let err = db
        .select("users", Some(&Condition::new("email", "a@b.c")))
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::ColumnNotFound);

    let err = db
        .update("users", "ID", Value::Int(7), &Condition::new("name", "x"))
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::ReadOnlyColumn);

    let err = db.insert("missing", vec![]).unwrap_err();
    assert_eq!(err.kind, ErrorKind::TableNotFound);
}
