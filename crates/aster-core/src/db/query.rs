use super::filter::Filter;
use super::value::{Row, Value};
use crate::error::{AsterError, Result};

/// SQL text plus its positional parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct SqlQuery {
    pub sql: String,
    pub params: Vec<Value>,
}

impl SqlQuery {
    fn new(sql: String, params: Vec<Value>) -> Self {
        Self { sql, params }
    }
}

/// Quote an identifier for SQLite, doubling embedded quotes.
pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

fn checked_ident(kind: &str, name: &str) -> Result<String> {
    if name.trim().is_empty() {
        return Err(AsterError::config(format!("{kind} name must not be empty")));
    }
    Ok(quote_ident(name))
}

/// Builds statements from structured inputs. Pure; no I/O.
pub struct QueryBuilder;

impl QueryBuilder {
    /// `CREATE TABLE IF NOT EXISTS` with column declarations in the given order.
    /// Declarations are engine-specific text (`"INTEGER PRIMARY KEY"`, `"TEXT UNIQUE"`).
    pub fn create_table<K, D>(
        table: &str,
        columns: impl IntoIterator<Item = (K, D)>,
    ) -> Result<SqlQuery>
    where
        K: AsRef<str>,
        D: AsRef<str>,
    {
        let table = checked_ident("table", table)?;
        let mut defs = Vec::new();
        for (name, decl) in columns {
            let name = checked_ident("column", name.as_ref())?;
            let decl = decl.as_ref().trim();
            if decl.is_empty() {
                defs.push(name);
            } else {
                defs.push(format!("{name} {decl}"));
            }
        }
        if defs.is_empty() {
            return Err(AsterError::config(format!(
                "table {table} needs at least one column"
            )));
        }
        Ok(SqlQuery::new(
            format!("CREATE TABLE IF NOT EXISTS {table} ({})", defs.join(", ")),
            Vec::new(),
        ))
    }

    pub fn drop_table(table: &str) -> Result<SqlQuery> {
        let table = checked_ident("table", table)?;
        Ok(SqlQuery::new(format!("DROP TABLE IF EXISTS {table}"), Vec::new()))
    }

    pub fn insert(table: &str, row: &Row) -> Result<SqlQuery> {
        let table = checked_ident("table", table)?;
        if row.is_empty() {
            return Err(AsterError::config(format!("insert into {table} with no values")));
        }
        let columns = row
            .columns()
            .map(|c| checked_ident("column", c))
            .collect::<Result<Vec<_>>>()?;
        let placeholders = vec!["?"; columns.len()].join(", ");
        Ok(SqlQuery::new(
            format!(
                "INSERT INTO {table} ({}) VALUES ({placeholders})",
                columns.join(", ")
            ),
            row.values().cloned().collect(),
        ))
    }

    pub fn select(
        table: &str,
        columns: Option<&[&str]>,
        filter: Option<&Filter>,
    ) -> Result<SqlQuery> {
        let table = checked_ident("table", table)?;
        let projection = match columns {
            Some(cols) if !cols.is_empty() => cols
                .iter()
                .map(|c| checked_ident("column", c))
                .collect::<Result<Vec<_>>>()?
                .join(", "),
            _ => "*".to_string(),
        };
        let mut sql = format!("SELECT {projection} FROM {table}");
        let mut params = Vec::new();
        if let Some(filter) = filter {
            let (clause, bound) = filter.to_sql();
            sql.push_str(" WHERE ");
            sql.push_str(&clause);
            params = bound;
        }
        Ok(SqlQuery::new(sql, params))
    }

    pub fn update(table: &str, row: &Row, filter: &Filter) -> Result<SqlQuery> {
        let table = checked_ident("table", table)?;
        if row.is_empty() {
            return Err(AsterError::config(format!("update of {table} with no values")));
        }
        let assignments = row
            .columns()
            .map(|c| checked_ident("column", c).map(|c| format!("{c} = ?")))
            .collect::<Result<Vec<_>>>()?;
        let (clause, bound) = filter.to_sql();
        let mut params: Vec<Value> = row.values().cloned().collect();
        params.extend(bound);
        Ok(SqlQuery::new(
            format!("UPDATE {table} SET {} WHERE {clause}", assignments.join(", ")),
            params,
        ))
    }

    pub fn delete(table: &str, filter: &Filter) -> Result<SqlQuery> {
        let table = checked_ident("table", table)?;
        let (clause, params) = filter.to_sql();
        Ok(SqlQuery::new(format!("DELETE FROM {table} WHERE {clause}"), params))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_table_keeps_column_order() {
        let q = QueryBuilder::create_table(
            "books",
            [("id", "INTEGER PRIMARY KEY"), ("title", "TEXT"), ("outline", "TEXT")],
        )
        .unwrap();
        assert_eq!(
            q.sql,
            "CREATE TABLE IF NOT EXISTS \"books\" (\"id\" INTEGER PRIMARY KEY, \"title\" TEXT, \"outline\" TEXT)"
        );
        assert!(q.params.is_empty());
    }

    #[test]
    fn test_create_table_requires_columns() {
        let cols: Vec<(String, String)> = Vec::new();
        let err = QueryBuilder::create_table("empty", cols).unwrap_err();
        assert!(matches!(err, AsterError::Configuration(_)));
    }

    #[test]
    fn test_insert_binds_values_in_row_order() {
        let row = Row::new().with("name", "John Doe").with("age", 30);
        let q = QueryBuilder::insert("users", &row).unwrap();
        assert_eq!(q.sql, "INSERT INTO \"users\" (\"name\", \"age\") VALUES (?, ?)");
        assert_eq!(q.params, vec![Value::from("John Doe"), Value::Integer(30)]);
    }

    #[test]
    fn test_select_defaults_to_all_columns() {
        let q = QueryBuilder::select("users", None, None).unwrap();
        assert_eq!(q.sql, "SELECT * FROM \"users\"");
    }

    #[test]
    fn test_select_with_columns_and_filter() {
        let filter = Filter::lt("age", 20);
        let q = QueryBuilder::select("users", Some(&["name", "age"][..]), Some(&filter)).unwrap();
        assert_eq!(
            q.sql,
            "SELECT \"name\", \"age\" FROM \"users\" WHERE \"age\" < ?"
        );
        assert_eq!(q.params, vec![Value::Integer(20)]);
    }

    #[test]
    fn test_update_params_are_set_then_where() {
        let row = Row::new().with("age", 31);
        let q = QueryBuilder::update("users", &row, &Filter::eq("name", "ann")).unwrap();
        assert_eq!(q.sql, "UPDATE \"users\" SET \"age\" = ? WHERE \"name\" = ?");
        assert_eq!(q.params, vec![Value::Integer(31), Value::from("ann")]);
    }

    #[test]
    fn test_delete_and_drop() {
        let q = QueryBuilder::delete("users", &Filter::ge("age", 65)).unwrap();
        assert_eq!(q.sql, "DELETE FROM \"users\" WHERE \"age\" >= ?");
        let q = QueryBuilder::drop_table("users").unwrap();
        assert_eq!(q.sql, "DROP TABLE IF EXISTS \"users\"");
    }

    #[test]
    fn test_empty_table_name_rejected() {
        assert!(QueryBuilder::drop_table("  ").is_err());
        assert!(QueryBuilder::insert("", &Row::new().with("a", 1)).is_err());
    }
}
