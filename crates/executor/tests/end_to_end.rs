use catalog::Tables;
use executor::execute;
use relation::{ColumnAttribute, DataType, Row, Value};
use sql::{ColumnDef, ColumnType, Statement};

fn create_test_table(catalog: &mut Tables) {
    let result = execute(
        catalog,
        Statement::CreateTable {
            table: "_test".to_string(),
            columns: vec![
                ColumnDef {
                    name: "a".to_string(),
                    data_type: ColumnType::Int,
                },
                ColumnDef {
                    name: "b".to_string(),
                    data_type: ColumnType::Text,
                },
            ],
        },
    );
    assert_eq!(result.message, "created table _test");
}

#[test]
fn s5_end_to_end_create_insert_select_drop() {
    let dir = tempfile::tempdir().unwrap();
    let mut catalog = Tables::open(dir.path()).unwrap();

    create_test_table(&mut catalog);

    let columns = execute(
        &mut catalog,
        Statement::ShowColumns {
            table: "_test".to_string(),
        },
    );
    assert_eq!(
        columns.rows.unwrap(),
        vec![
            vec![Value::Text("a".to_string()), Value::Text("INT".to_string())],
            vec![Value::Text("b".to_string()), Value::Text("TEXT".to_string())],
        ]
    );
    assert_eq!(
        columns.column_attributes.unwrap(),
        vec![
            ColumnAttribute {
                data_type: DataType::Text
            },
            ColumnAttribute {
                data_type: DataType::Text
            },
        ]
    );

    let mut row = Row::new();
    row.insert("a".to_string(), Value::Int(12));
    row.insert("b".to_string(), Value::Text("Hello!".to_string()));
    let table = catalog.get_table("_test").unwrap();
    let handle = table.insert(&row).unwrap();

    let handles = table.select().unwrap();
    assert_eq!(handles, vec![handle]);
    assert_eq!(table.project(handle).unwrap(), row);

    let result = execute(
        &mut catalog,
        Statement::DropTable {
            table: "_test".to_string(),
        },
    );
    assert_eq!(result.message, "dropped table _test");

    let tables = execute(&mut catalog, Statement::ShowTables);
    assert!(tables.rows.unwrap().is_empty());
    assert!(!dir.path().join("_test.db").exists());
}

#[test]
fn s6_catalog_tables_filtered_from_show_tables() {
    let dir = tempfile::tempdir().unwrap();
    let mut catalog = Tables::open(dir.path()).unwrap();
    let result = execute(&mut catalog, Statement::ShowTables);
    assert_eq!(result.message, "0 tables");
    assert!(result.rows.unwrap().is_empty());
}

#[test]
fn drop_is_total() {
    let dir = tempfile::tempdir().unwrap();
    let mut catalog = Tables::open(dir.path()).unwrap();
    create_test_table(&mut catalog);

    execute(
        &mut catalog,
        Statement::DropTable {
            table: "_test".to_string(),
        },
    );

    let reopened = Tables::open(dir.path()).unwrap();
    assert!(reopened.get_columns("_test").is_err());
    assert!(!dir.path().join("_test.db").exists());
}

#[test]
fn parsed_statements_drive_the_same_dispatch() {
    let dir = tempfile::tempdir().unwrap();
    let mut catalog = Tables::open(dir.path()).unwrap();

    let stmt = sql::parse("CREATE TABLE widgets (a INT, b TEXT)").unwrap();
    let result = execute(&mut catalog, stmt);
    assert_eq!(result.message, "created table widgets");

    let stmt = sql::parse("SHOW TABLES").unwrap();
    let result = execute(&mut catalog, stmt);
    assert_eq!(result.rows.unwrap(), vec![vec![Value::Text("widgets".to_string())]]);
}
