use binary_helpers::le::{read_le, write_le};

use crate::errors::RelationError;
use crate::types::{DataType, Row, Schema, Value};

/// Looks up every declared column in `row`, failing if any is missing. Returns the
/// values in declared-column order, ready for [`marshal`].
pub fn validate(schema: &Schema, row: &Row) -> Result<Vec<Value>, RelationError> {
    schema
        .columns
        .iter()
        .map(|(name, _)| {
            row.get(name)
                .cloned()
                .ok_or_else(|| RelationError::MissingColumn {
                    column: name.clone(),
                })
        })
        .collect()
}

/// Serializes `row` into its flat byte image, driven by `schema`'s declared column
/// order: `INT` as 4 little-endian bytes, `TEXT` as a 2-byte little-endian length
/// followed by ASCII bytes. The result carries no padding.
pub fn marshal(schema: &Schema, row: &Row) -> Result<Vec<u8>, RelationError> {
    let values = validate(schema, row)?;
    let mut out = Vec::new();
    for ((name, attr), value) in schema.columns.iter().zip(values.iter()) {
        match (attr.data_type, value) {
            (DataType::Int, Value::Int(n)) => {
                let mut buf = [0u8; 4];
                write_le::<i32>(&mut buf, 0, *n)?;
                out.extend_from_slice(&buf);
            }
            (DataType::Text, Value::Text(text)) => {
                let mut len_buf = [0u8; 2];
                write_le::<u16>(&mut len_buf, 0, text.len() as u16)?;
                out.extend_from_slice(&len_buf);
                out.extend_from_slice(text.as_bytes());
            }
            _ => {
                return Err(RelationError::UnsupportedType {
                    column: name.clone(),
                });
            }
        }
    }
    Ok(out)
}

/// Inverse of [`marshal`], driven by `schema`. Bytes beyond the last declared column
/// are ignored.
pub fn unmarshal(schema: &Schema, bytes: &[u8]) -> Result<Row, RelationError> {
    let mut row = Row::new();
    let mut cursor = 0usize;
    for (name, attr) in &schema.columns {
        match attr.data_type {
            DataType::Int => {
                let n = read_le::<i32>(bytes, cursor)?;
                cursor += 4;
                row.insert(name.clone(), Value::Int(n));
            }
            DataType::Text => {
                let len = read_le::<u16>(bytes, cursor)? as usize;
                cursor += 2;
                let text_bytes = bytes.get(cursor..cursor + len).ok_or(
                    binary_helpers::bin_error::BinaryError::SliceRangeOutOfBounds {
                        expected: len,
                        from_offset: cursor,
                    },
                )?;
                let text = String::from_utf8_lossy(text_bytes).into_owned();
                cursor += len;
                row.insert(name.clone(), Value::Text(text));
            }
        }
    }
    Ok(row)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ColumnAttribute;

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

    #[test]
    fn marshal_unmarshal_round_trip() {
        let schema = schema();
        let mut row = Row::new();
        row.insert("a".to_string(), Value::Int(12));
        row.insert("b".to_string(), Value::Text("Hello!".to_string()));

        let bytes = marshal(&schema, &row).unwrap();
        let back = unmarshal(&schema, &bytes).unwrap();
        assert_eq!(back, row);
    }

    #[test]
    fn marshal_missing_column_fails() {
        let schema = schema();
        let mut row = Row::new();
        row.insert("a".to_string(), Value::Int(1));
        assert!(matches!(
            marshal(&schema, &row),
            Err(RelationError::MissingColumn { .. })
        ));
    }

    #[test]
    fn unmarshal_ignores_trailing_bytes() {
        let schema = Schema::new(
            "just_a",
            vec![(
                "a".to_string(),
                ColumnAttribute {
                    data_type: DataType::Int,
                },
            )],
        );
        let mut bytes = vec![0u8; 4];
        write_le::<i32>(&mut bytes, 0, 7).unwrap();
        bytes.extend_from_slice(b"trailing garbage");

        let row = unmarshal(&schema, &bytes).unwrap();
        assert_eq!(row.get("a"), Some(&Value::Int(7)));
    }
}
