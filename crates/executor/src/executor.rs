use catalog::Tables;
use relation::{ColumnAttribute, DataType, Value};
use sql::{ColumnType, Statement};
use tracing::{info, instrument};

use crate::errors::ExecError;
use crate::result::QueryResult;

fn map_column_type(data_type: ColumnType) -> DataType {
    match data_type {
        ColumnType::Int => DataType::Int,
        ColumnType::Text => DataType::Text,
    }
}

/// Dispatches one parsed statement against `catalog`, translating it into catalog
/// and relation operations and returning a [`QueryResult`].
#[instrument(skip(catalog))]
pub fn execute(catalog: &mut Tables, statement: Statement) -> QueryResult {
    let outcome = match statement {
        Statement::CreateTable { table, columns } => create_table(catalog, &table, columns),
        Statement::DropTable { table } => drop_table(catalog, &table),
        Statement::ShowTables => show_tables(catalog),
        Statement::ShowColumns { table } => show_columns(catalog, &table),
    };
    match outcome {
        Ok(result) => result,
        Err(err) => {
            info!(error = %err, "statement execution failed");
            QueryResult::message(err.to_string())
        }
    }
}

fn create_table(
    catalog: &mut Tables,
    table: &str,
    columns: Vec<sql::ColumnDef>,
) -> Result<QueryResult, ExecError> {
    let relation_columns: Vec<(String, ColumnAttribute)> = columns
        .into_iter()
        .map(|column| {
            (
                column.name,
                ColumnAttribute {
                    data_type: map_column_type(column.data_type),
                },
            )
        })
        .collect();
    catalog.create_table(table, relation_columns)?;
    Ok(QueryResult::message(format!("created table {table}")))
}

fn drop_table(catalog: &mut Tables, table: &str) -> Result<QueryResult, ExecError> {
    catalog.drop_table(table)?;
    Ok(QueryResult::message(format!("dropped table {table}")))
}

fn show_tables(catalog: &mut Tables) -> Result<QueryResult, ExecError> {
    let names = catalog.show_tables()?;
    let message = format!("{} tables", names.len());
    let rows = names.into_iter().map(|name| vec![Value::Text(name)]).collect();
    Ok(QueryResult::rows(
        vec!["table_name".to_string()],
        vec![ColumnAttribute {
            data_type: DataType::Text,
        }],
        rows,
        message,
    ))
}

fn show_columns(catalog: &mut Tables, table: &str) -> Result<QueryResult, ExecError> {
    let schema = catalog.get_columns(table)?;
    let message = format!("{} columns", schema.columns.len());
    let rows = schema
        .columns
        .into_iter()
        .map(|(name, attr)| vec![Value::Text(name), Value::Text(attr.data_type.as_str().to_string())])
        .collect();
    Ok(QueryResult::rows(
        vec!["column_name".to_string(), "data_type".to_string()],
        vec![
            ColumnAttribute {
                data_type: DataType::Text,
            },
            ColumnAttribute {
                data_type: DataType::Text,
            },
        ],
        rows,
        message,
    ))
}
