use crate::errors::ParseError;
use crate::statement::{ColumnDef, ColumnType, Statement};

fn tokenize(input: &str) -> Vec<String> {
    let spaced = input
        .replace('(', " ( ")
        .replace(')', " ) ")
        .replace(',', " , ");
    spaced.split_whitespace().map(str::to_string).collect()
}

fn expect<'a>(tokens: &'a [String], index: usize, reason: &str) -> Result<&'a str, ParseError> {
    tokens
        .get(index)
        .map(String::as_str)
        .ok_or_else(|| ParseError::new(reason))
}

fn expect_keyword(tokens: &[String], index: usize, keyword: &str) -> Result<(), ParseError> {
    let token = expect(tokens, index, &format!("expected `{keyword}`"))?;
    if token.eq_ignore_ascii_case(keyword) {
        Ok(())
    } else {
        Err(ParseError::new(format!(
            "expected `{keyword}`, found `{token}`"
        )))
    }
}

fn parse_column_type(raw: &str) -> Result<ColumnType, ParseError> {
    match raw.to_uppercase().as_str() {
        "INT" => Ok(ColumnType::Int),
        "TEXT" => Ok(ColumnType::Text),
        other => Err(ParseError::new(format!("unknown column type `{other}`"))),
    }
}

/// `CREATE TABLE name ( col TYPE, col TYPE, ... )`
fn parse_create_table(tokens: &[String]) -> Result<Statement, ParseError> {
    expect_keyword(tokens, 1, "TABLE")?;
    let table = expect(tokens, 2, "expected table name")?.to_string();
    expect_keyword(tokens, 3, "(")?;

    let mut columns = Vec::new();
    let mut cursor = 4;
    loop {
        let name = expect(tokens, cursor, "expected column name or `)`")?;
        if name == ")" {
            cursor += 1;
            break;
        }
        let data_type = parse_column_type(expect(tokens, cursor + 1, "expected column type")?)?;
        columns.push(ColumnDef {
            name: name.to_string(),
            data_type,
        });
        cursor += 2;
        match expect(tokens, cursor, "expected `,` or `)`")? {
            "," => cursor += 1,
            ")" => {
                cursor += 1;
                break;
            }
            other => return Err(ParseError::new(format!("expected `,` or `)`, found `{other}`"))),
        }
    }
    if cursor != tokens.len() {
        return Err(ParseError::new("unexpected tokens after column list"));
    }
    if columns.is_empty() {
        return Err(ParseError::new("a table needs at least one column"));
    }
    Ok(Statement::CreateTable { table, columns })
}

/// `DROP TABLE name`
fn parse_drop_table(tokens: &[String]) -> Result<Statement, ParseError> {
    expect_keyword(tokens, 1, "TABLE")?;
    let table = expect(tokens, 2, "expected table name")?.to_string();
    if tokens.len() != 3 {
        return Err(ParseError::new("unexpected tokens after table name"));
    }
    Ok(Statement::DropTable { table })
}

/// `SHOW TABLES` or `SHOW COLUMNS FROM name`
fn parse_show(tokens: &[String]) -> Result<Statement, ParseError> {
    let what = expect(tokens, 1, "expected TABLES or COLUMNS")?;
    if what.eq_ignore_ascii_case("TABLES") {
        if tokens.len() != 2 {
            return Err(ParseError::new("unexpected tokens after TABLES"));
        }
        return Ok(Statement::ShowTables);
    }
    if what.eq_ignore_ascii_case("COLUMNS") {
        expect_keyword(tokens, 2, "FROM")?;
        let table = expect(tokens, 3, "expected table name")?.to_string();
        if tokens.len() != 4 {
            return Err(ParseError::new("unexpected tokens after table name"));
        }
        return Ok(Statement::ShowColumns { table });
    }
    Err(ParseError::new(format!(
        "expected TABLES or COLUMNS, found `{what}`"
    )))
}

/// Parses one line of input into a [`Statement`]. Keywords are case-insensitive;
/// table and column names are not.
pub fn parse(input: &str) -> Result<Statement, ParseError> {
    let tokens = tokenize(input);
    let keyword = expect(&tokens, 0, "empty statement")?;
    match keyword.to_uppercase().as_str() {
        "CREATE" => parse_create_table(&tokens),
        "DROP" => parse_drop_table(&tokens),
        "SHOW" => parse_show(&tokens),
        other => Err(ParseError::new(format!("unrecognized statement `{other}`"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_create_table() {
        let stmt = parse("CREATE TABLE widgets (a INT, b TEXT)").unwrap();
        assert_eq!(
            stmt,
            Statement::CreateTable {
                table: "widgets".to_string(),
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
            }
        );
    }

    #[test]
    fn keywords_are_case_insensitive() {
        assert_eq!(
            parse("create table t (a int)").unwrap(),
            parse("CREATE TABLE t (a INT)").unwrap()
        );
    }

    #[test]
    fn parses_drop_table() {
        assert_eq!(
            parse("DROP TABLE widgets").unwrap(),
            Statement::DropTable {
                table: "widgets".to_string(),
            }
        );
    }

    #[test]
    fn parses_show_tables() {
        assert_eq!(parse("SHOW TABLES").unwrap(), Statement::ShowTables);
    }

    #[test]
    fn parses_show_columns_from() {
        assert_eq!(
            parse("SHOW COLUMNS FROM widgets").unwrap(),
            Statement::ShowColumns {
                table: "widgets".to_string(),
            }
        );
    }

    #[test]
    fn rejects_unknown_statement() {
        assert!(parse("SELECT * FROM widgets").is_err());
    }

    #[test]
    fn rejects_unknown_column_type() {
        assert!(parse("CREATE TABLE t (a FLOAT)").is_err());
    }

    #[test]
    fn rejects_trailing_garbage() {
        assert!(parse("SHOW TABLES extra").is_err());
    }
}
