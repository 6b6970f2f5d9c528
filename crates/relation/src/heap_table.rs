use std::path::{Path, PathBuf};

use file::{FileError, HeapFile};
use page::PageError;

use crate::errors::RelationError;
use crate::marshal::{marshal, unmarshal};
use crate::types::{Handle, Row, Schema};

/// Presents the rows of one relation as dictionaries over a declared [`Schema`],
/// translating to and from raw record bytes stored in one [`HeapFile`].
#[derive(Debug)]
pub struct HeapTable {
    schema: Schema,
    file: HeapFile,
}

impl HeapTable {
    fn path_for(dir: &Path, table_name: &str) -> PathBuf {
        dir.join(format!("{table_name}.db"))
    }

    /// Creates a brand-new relation file. Fails if the table already has one.
    pub fn create(dir: &Path, schema: Schema) -> Result<Self, RelationError> {
        let path = Self::path_for(dir, &schema.table_name);
        let file = HeapFile::create(&path).map_err(|err| match err {
            FileError::AlreadyExists { .. } => RelationError::TableAlreadyExists {
                table: schema.table_name.clone(),
            },
            other => other.into(),
        })?;
        Ok(Self { schema, file })
    }

    /// Creates the relation file, or opens it if it already exists.
    pub fn create_if_not_exists(dir: &Path, schema: Schema) -> Result<Self, RelationError> {
        let path = Self::path_for(dir, &schema.table_name);
        let file = HeapFile::create_if_not_exists(&path)?;
        Ok(Self { schema, file })
    }

    /// Opens an existing relation file under its declared schema.
    pub fn open(dir: &Path, schema: Schema) -> Result<Self, RelationError> {
        let path = Self::path_for(dir, &schema.table_name);
        let file = HeapFile::open(&path)?;
        Ok(Self { schema, file })
    }

    /// Closes and deletes the backing file.
    pub fn drop_table(self) -> Result<(), RelationError> {
        Ok(self.file.drop_file()?)
    }

    /// Closes the backing file handle without deleting it.
    pub fn close(self) -> Result<(), RelationError> {
        Ok(self.file.close()?)
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Validates, marshals, and inserts `row`, returning its new [`Handle`].
    pub fn insert(&mut self, row: &Row) -> Result<Handle, RelationError> {
        let bytes = marshal(&self.schema, row)?;
        self.append(&bytes)
    }

    /// Appends already-marshalled `bytes`, trying the last page first and falling
    /// back to a freshly allocated page on `NoRoom`.
    fn append(&mut self, bytes: &[u8]) -> Result<Handle, RelationError> {
        let mut page = match self.file.last_block_id() {
            Some(block_id) => self.file.get(block_id)?,
            None => self.file.get_new()?,
        };
        match page.add(bytes) {
            Ok(record_id) => {
                self.file.put(&page)?;
                Ok(Handle::new(page.block_id(), record_id))
            }
            Err(PageError::NoRoom { .. }) => {
                let mut fresh = self.file.get_new()?;
                let record_id = fresh.add(bytes)?;
                self.file.put(&fresh)?;
                Ok(Handle::new(fresh.block_id(), record_id))
            }
            Err(other) => Err(other.into()),
        }
    }

    /// Every live handle in the relation, in `(block, record)` order.
    pub fn select(&self) -> Result<Vec<Handle>, RelationError> {
        let mut handles = Vec::new();
        for block_id in self.file.block_ids() {
            let page = self.file.get(block_id)?;
            for record_id in page.ids()? {
                handles.push(Handle::new(block_id, record_id));
            }
        }
        Ok(handles)
    }

    /// Every live handle whose projected row matches `filter` by equality on each of
    /// `filter`'s columns.
    pub fn select_where(&self, filter: &Row) -> Result<Vec<Handle>, RelationError> {
        let mut matching = Vec::new();
        for handle in self.select()? {
            let row = self.project(handle)?;
            if filter
                .iter()
                .all(|(column, value)| row.get(column) == Some(value))
            {
                matching.push(handle);
            }
        }
        Ok(matching)
    }

    /// Reads and unmarshals the full row at `handle`. Fails if `handle` is a tombstone.
    pub fn project(&self, handle: Handle) -> Result<Row, RelationError> {
        let page = self.file.get(handle.block_id)?;
        let bytes = page
            .get(handle.record_id)?
            .ok_or(RelationError::Tombstone { handle })?;
        unmarshal(&self.schema, &bytes)
    }

    /// Reads the row at `handle`, restricted to `cols`.
    pub fn project_cols(&self, handle: Handle, cols: &[&str]) -> Result<Row, RelationError> {
        let row = self.project(handle)?;
        Ok(row
            .into_iter()
            .filter(|(name, _)| cols.contains(&name.as_str()))
            .collect())
    }

    /// Removes the slot at `handle` from its page.
    pub fn del(&mut self, handle: Handle) -> Result<(), RelationError> {
        let mut page = self.file.get(handle.block_id)?;
        page.del(handle.record_id)?;
        self.file.put(&page)?;
        Ok(())
    }

    /// Merges `new_values` into the row at `handle` and rewrites it. Tries the
    /// current page first; on `NoRoom` the row is moved to a new page and the
    /// original slot becomes a tombstone.
    pub fn update(&mut self, handle: Handle, new_values: &Row) -> Result<Handle, RelationError> {
        let mut merged = self.project(handle)?;
        for (column, value) in new_values {
            merged.insert(column.clone(), value.clone());
        }
        let bytes = marshal(&self.schema, &merged)?;

        let mut page = self.file.get(handle.block_id)?;
        match page.put(handle.record_id, &bytes) {
            Ok(()) => {
                self.file.put(&page)?;
                Ok(handle)
            }
            Err(PageError::NoRoom { .. }) => {
                page.del(handle.record_id)?;
                self.file.put(&page)?;
                self.append(&bytes)
            }
            Err(other) => Err(other.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ColumnAttribute, DataType, Value};

    fn schema() -> Schema {
        Schema::new(
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
    }

    fn row(a: i32, b: &str) -> Row {
        let mut row = Row::new();
        row.insert("a".to_string(), Value::Int(a));
        row.insert("b".to_string(), Value::Text(b.to_string()));
        row
    }

    #[test]
    fn insert_select_project_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let mut table = HeapTable::create(dir.path(), schema()).unwrap();

        let handle = table.insert(&row(12, "Hello!")).unwrap();
        let handles = table.select().unwrap();
        assert_eq!(handles, vec![handle]);
        assert_eq!(table.project(handle).unwrap(), row(12, "Hello!"));
    }

    #[test]
    fn select_where_filters_by_equality() {
        let dir = tempfile::tempdir().unwrap();
        let mut table = HeapTable::create(dir.path(), schema()).unwrap();
        table.insert(&row(1, "x")).unwrap();
        let keep = table.insert(&row(2, "y")).unwrap();
        table.insert(&row(3, "z")).unwrap();

        let mut filter = Row::new();
        filter.insert("a".to_string(), Value::Int(2));
        assert_eq!(table.select_where(&filter).unwrap(), vec![keep]);
    }

    #[test]
    fn del_makes_row_unprojectable() {
        let dir = tempfile::tempdir().unwrap();
        let mut table = HeapTable::create(dir.path(), schema()).unwrap();
        let handle = table.insert(&row(1, "x")).unwrap();

        table.del(handle).unwrap();
        assert!(table.select().unwrap().is_empty());
        assert!(matches!(
            table.project(handle),
            Err(RelationError::Tombstone { .. })
        ));
    }

    #[test]
    fn update_merges_values_in_place() {
        let dir = tempfile::tempdir().unwrap();
        let mut table = HeapTable::create(dir.path(), schema()).unwrap();
        let handle = table.insert(&row(1, "x")).unwrap();

        let mut patch = Row::new();
        patch.insert("b".to_string(), Value::Text("y".to_string()));
        let new_handle = table.update(handle, &patch).unwrap();

        assert_eq!(table.project(new_handle).unwrap(), row(1, "y"));
    }

    #[test]
    fn update_falls_back_to_new_page_on_no_room() {
        let dir = tempfile::tempdir().unwrap();
        let mut table = HeapTable::create(dir.path(), schema()).unwrap();
        let handle = table.insert(&row(1, "short")).unwrap();

        let mut patch = Row::new();
        patch.insert("b".to_string(), Value::Text("x".repeat(4000)));
        let new_handle = table.update(handle, &patch).unwrap();

        assert_ne!(new_handle.block_id, handle.block_id);
        assert!(matches!(
            table.project(handle),
            Err(RelationError::Tombstone { .. })
        ));
        assert_eq!(
            table.project(new_handle).unwrap().get("b"),
            Some(&Value::Text("x".repeat(4000)))
        );
    }

    #[test]
    fn create_twice_reports_table_already_exists() {
        let dir = tempfile::tempdir().unwrap();
        HeapTable::create(dir.path(), schema()).unwrap();
        assert!(matches!(
            HeapTable::create(dir.path(), schema()),
            Err(RelationError::TableAlreadyExists { .. })
        ));
    }

    #[test]
    fn close_then_reopen_preserves_rows() {
        let dir = tempfile::tempdir().unwrap();
        let mut table = HeapTable::create(dir.path(), schema()).unwrap();
        let handle = table.insert(&row(1, "x")).unwrap();
        table.close().unwrap();

        let reopened = HeapTable::open(dir.path(), schema()).unwrap();
        assert_eq!(reopened.project(handle).unwrap(), row(1, "x"));
    }
}
