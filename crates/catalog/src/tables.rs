use std::collections::HashMap;
use std::path::{Path, PathBuf};

use relation::{ColumnAttribute, DataType, HeapTable, RelationError, Row, Schema, Value};

use crate::errors::CatalogError;

const TABLES_NAME: &str = "_tables";
const COLUMNS_NAME: &str = "_columns";

fn tables_schema() -> Schema {
    Schema::new(
        TABLES_NAME,
        vec![(
            "table_name".to_string(),
            ColumnAttribute {
                data_type: DataType::Text,
            },
        )],
    )
}

fn columns_schema() -> Schema {
    Schema::new(
        COLUMNS_NAME,
        vec![
            (
                "table_name".to_string(),
                ColumnAttribute {
                    data_type: DataType::Text,
                },
            ),
            (
                "column_name".to_string(),
                ColumnAttribute {
                    data_type: DataType::Text,
                },
            ),
            (
                "data_type".to_string(),
                ColumnAttribute {
                    data_type: DataType::Text,
                },
            ),
        ],
    )
}

fn text(value: &str) -> Value {
    Value::Text(value.to_string())
}

/// The self-describing schema catalog: the two distinguished relations `_tables`
/// and `_columns`, plus a name-keyed cache of opened user-relation instances.
#[derive(Debug)]
pub struct Tables {
    dir: PathBuf,
    tables_rel: HeapTable,
    columns_rel: HeapTable,
    cache: HashMap<String, HeapTable>,
}

impl Tables {
    /// Opens the catalog rooted at `dir`, creating and seeding it if this is a fresh
    /// database environment.
    pub fn open(dir: &Path) -> Result<Self, CatalogError> {
        let tables_is_new = !dir.join(format!("{TABLES_NAME}.db")).exists();
        let columns_is_new = !dir.join(format!("{COLUMNS_NAME}.db")).exists();

        let tables_rel = HeapTable::create_if_not_exists(dir, tables_schema())?;
        let columns_rel = HeapTable::create_if_not_exists(dir, columns_schema())?;

        let mut catalog = Self {
            dir: dir.to_path_buf(),
            tables_rel,
            columns_rel,
            cache: HashMap::new(),
        };
        if tables_is_new || columns_is_new {
            catalog.seed()?;
        }
        Ok(catalog)
    }

    /// Inserts `{_tables}` and `{_columns}` into `_tables`, and one row per column
    /// of each catalog relation into `_columns`, so the catalog can describe itself.
    fn seed(&mut self) -> Result<(), CatalogError> {
        for name in [TABLES_NAME, COLUMNS_NAME] {
            let mut row = Row::new();
            row.insert("table_name".to_string(), text(name));
            self.tables_rel.insert(&row)?;
        }
        for schema in [self.tables_rel.schema().clone(), self.columns_rel.schema().clone()] {
            self.insert_column_rows(&schema)?;
        }
        Ok(())
    }

    fn insert_column_rows(&mut self, schema: &Schema) -> Result<(), RelationError> {
        for (column_name, attr) in &schema.columns {
            let mut row = Row::new();
            row.insert("table_name".to_string(), text(&schema.table_name));
            row.insert("column_name".to_string(), text(column_name));
            row.insert("data_type".to_string(), text(attr.data_type.as_str()));
            self.columns_rel.insert(&row)?;
        }
        Ok(())
    }

    fn filter_by_table(table_name: &str) -> Row {
        let mut filter = Row::new();
        filter.insert("table_name".to_string(), text(table_name));
        filter
    }

    /// Reconstructs `name`'s schema by projecting `_columns`, without caching the
    /// relation itself.
    pub fn get_columns(&self, name: &str) -> Result<Schema, CatalogError> {
        let handles = self.columns_rel.select_where(&Self::filter_by_table(name))?;
        if handles.is_empty() {
            return Err(CatalogError::UnknownTable {
                name: name.to_string(),
            });
        }
        let mut columns = Vec::new();
        for handle in handles {
            let row = self.columns_rel.project(handle)?;
            let column_name = match row.get("column_name") {
                Some(Value::Text(s)) => s.clone(),
                _ => unreachable!("column_name is always TEXT"),
            };
            let raw_type = match row.get("data_type") {
                Some(Value::Text(s)) => s.clone(),
                _ => unreachable!("data_type is always TEXT"),
            };
            let data_type = DataType::parse(&raw_type).ok_or_else(|| CatalogError::UnknownDataType {
                table: name.to_string(),
                column: column_name.clone(),
                raw: raw_type.clone(),
            })?;
            columns.push((column_name, ColumnAttribute { data_type }));
        }
        Ok(Schema::new(name, columns))
    }

    /// Returns the cached, opened relation for `name`, opening and caching it on
    /// first access.
    pub fn get_table(&mut self, name: &str) -> Result<&mut HeapTable, CatalogError> {
        if !self.cache.contains_key(name) {
            let schema = self.get_columns(name)?;
            let table = HeapTable::open(&self.dir, schema)?;
            self.cache.insert(name.to_string(), table);
        }
        Ok(self.cache.get_mut(name).expect("just inserted"))
    }

    fn table_exists(&self, name: &str) -> Result<bool, CatalogError> {
        Ok(!self
            .tables_rel
            .select_where(&Self::filter_by_table(name))?
            .is_empty())
    }

    /// Registers a new table in the catalog and creates its backing heap file.
    pub fn create_table(
        &mut self,
        name: &str,
        columns: Vec<(String, ColumnAttribute)>,
    ) -> Result<(), CatalogError> {
        if self.table_exists(name)? {
            return Err(RelationError::TableAlreadyExists {
                table: name.to_string(),
            }
            .into());
        }

        let mut table_row = Row::new();
        table_row.insert("table_name".to_string(), text(name));
        let table_handle = self.tables_rel.insert(&table_row)?;

        let schema = Schema::new(name, columns);
        if let Err(err) = self.insert_column_rows(&schema) {
            let _ = self.tables_rel.del(table_handle);
            return Err(err.into());
        }

        match HeapTable::create(&self.dir, schema) {
            Ok(table) => {
                self.cache.insert(name.to_string(), table);
                Ok(())
            }
            Err(err) => {
                let _ = self.tables_rel.del(table_handle);
                for handle in self
                    .columns_rel
                    .select_where(&Self::filter_by_table(name))
                    .unwrap_or_default()
                {
                    let _ = self.columns_rel.del(handle);
                }
                Err(err.into())
            }
        }
    }

    /// Removes `name` from the catalog and deletes its backing file. Refuses to drop
    /// either catalog table.
    pub fn drop_table(&mut self, name: &str) -> Result<(), CatalogError> {
        if name == TABLES_NAME || name == COLUMNS_NAME {
            return Err(CatalogError::ProtectedTable {
                name: name.to_string(),
            });
        }

        for handle in self.columns_rel.select_where(&Self::filter_by_table(name))? {
            self.columns_rel.del(handle)?;
        }

        let table = match self.cache.remove(name) {
            Some(table) => table,
            None => {
                let schema = self.get_columns(name)?;
                HeapTable::open(&self.dir, schema)?
            }
        };
        table.drop_table()?;

        for handle in self.tables_rel.select_where(&Self::filter_by_table(name))? {
            self.tables_rel.del(handle)?;
        }
        Ok(())
    }

    /// Every user table name, excluding the two catalog tables themselves.
    pub fn show_tables(&self) -> Result<Vec<String>, CatalogError> {
        let mut names = Vec::new();
        for handle in self.tables_rel.select()? {
            let row = self.tables_rel.project(handle)?;
            if let Some(Value::Text(name)) = row.get("table_name") {
                if name != TABLES_NAME && name != COLUMNS_NAME {
                    names.push(name.clone());
                }
            }
        }
        Ok(names)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_database_seeds_itself() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = Tables::open(dir.path()).unwrap();
        assert!(catalog.show_tables().unwrap().is_empty());

        let tables_schema = catalog.get_columns(TABLES_NAME).unwrap();
        assert_eq!(tables_schema.column_names(), vec!["table_name"]);

        let columns_schema = catalog.get_columns(COLUMNS_NAME).unwrap();
        assert_eq!(
            columns_schema.column_names(),
            vec!["table_name", "column_name", "data_type"]
        );
    }

    #[test]
    fn reopen_reconstructs_self_description() {
        let dir = tempfile::tempdir().unwrap();
        {
            Tables::open(dir.path()).unwrap();
        }
        let reopened = Tables::open(dir.path()).unwrap();
        assert_eq!(
            reopened.get_columns(TABLES_NAME).unwrap().column_names(),
            vec!["table_name"]
        );
        assert_eq!(
            reopened.get_columns(COLUMNS_NAME).unwrap().column_names(),
            vec!["table_name", "column_name", "data_type"]
        );
    }

    #[test]
    fn create_then_show_then_drop() {
        let dir = tempfile::tempdir().unwrap();
        let mut catalog = Tables::open(dir.path()).unwrap();

        catalog
            .create_table(
                "widgets",
                vec![
                    (
                        "a".to_string(),
                        ColumnAttribute {
                            data_type: DataType::Int,
                        },
                    ),
                    (
                        "b".to_string(),
                        ColumnAttribute {
                            data_type: DataType::Text,
                        },
                    ),
                ],
            )
            .unwrap();

        assert_eq!(catalog.show_tables().unwrap(), vec!["widgets".to_string()]);
        assert!(dir.path().join("widgets.db").exists());

        catalog.drop_table("widgets").unwrap();
        assert!(catalog.show_tables().unwrap().is_empty());
        assert!(!dir.path().join("widgets.db").exists());
        assert!(
            catalog
                .columns_rel
                .select_where(&Tables::filter_by_table("widgets"))
                .unwrap()
                .is_empty()
        );
    }

    #[test]
    fn create_table_twice_fails_and_does_not_duplicate_rows() {
        let dir = tempfile::tempdir().unwrap();
        let mut catalog = Tables::open(dir.path()).unwrap();
        catalog.create_table("widgets", vec![]).unwrap();

        assert!(catalog.create_table("widgets", vec![]).is_err());
        assert_eq!(catalog.show_tables().unwrap(), vec!["widgets".to_string()]);
    }

    #[test]
    fn drop_table_refuses_catalog_tables() {
        let dir = tempfile::tempdir().unwrap();
        let mut catalog = Tables::open(dir.path()).unwrap();
        assert!(matches!(
            catalog.drop_table(TABLES_NAME),
            Err(CatalogError::ProtectedTable { .. })
        ));
    }
}
