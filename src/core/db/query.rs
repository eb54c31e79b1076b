/// Query Execution Module
///
/// This module provides the statement primitives every menu operation is
/// built on. Each primitive prepares one statement, binds its parameters,
/// marshals the result into one of a few string-typed shapes, and releases
/// the statement before returning.

use crate::core::Result;
use rusqlite::{types::ValueRef, Connection, Params, Row};
use std::io::Write;
use tracing::debug;

/// Represents the result of a SQL query execution
#[derive(Debug, Clone, PartialEq)]
pub struct QueryResult {
    /// Column names from the query result
    pub columns: Vec<String>,
    /// Rows of data as string values
    pub rows: Vec<Vec<String>>,
    /// Number of rows returned
    pub row_count: usize,
}

impl QueryResult {
    /// Creates a new QueryResult from column names and row data
    pub fn new(columns: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        let row_count = rows.len();
        QueryResult {
            columns,
            rows,
            row_count,
        }
    }
}

/// Statement execution service that operates on a database connection
pub struct StatementExecutor<'a> {
    connection: &'a Connection,
}

impl<'a> StatementExecutor<'a> {
    /// Creates a new StatementExecutor for the given connection
    pub fn new(connection: &'a Connection) -> Self {
        StatementExecutor { connection }
    }

    /// Executes a mutating statement (INSERT, UPDATE, DELETE, DDL).
    ///
    /// # Returns
    ///
    /// The number of rows changed.
    ///
    /// # Errors
    ///
    /// Returns `ConsoleError::Sql` if the statement cannot be prepared or fails,
    /// including constraint violations such as a duplicate username.
    pub fn execute_update<P: Params>(&self, sql: &str, params: P) -> Result<usize> {
        debug!(sql, "execute update");
        let mut stmt = self.connection.prepare(sql)?;
        let changed = stmt.execute(params)?;
        Ok(changed)
    }

    /// Executes a query and returns only the number of rows it produced.
    pub fn execute_query_count<P: Params>(&self, sql: &str, params: P) -> Result<usize> {
        debug!(sql, "execute count");
        let mut stmt = self.connection.prepare(sql)?;
        let mut rows = stmt.query(params)?;
        let mut count = 0;
        while rows.next()?.is_some() {
            count += 1;
        }
        Ok(count)
    }

    /// Executes a query and writes the result set to `out` as tab-separated text.
    ///
    /// The header line of column names is written once, just before the first
    /// row, so an empty result prints nothing at all.
    ///
    /// # Returns
    ///
    /// The number of body rows written; the header line is not counted.
    pub fn execute_query_print<P: Params, W: Write + ?Sized>(&self, sql: &str, params: P, out: &mut W) -> Result<usize> {
        debug!(sql, "execute print");
        let mut stmt = self.connection.prepare(sql)?;
        let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();

        let mut rows = stmt.query(params)?;
        let mut row_count = 0;
        while let Some(row) = rows.next()? {
            if row_count == 0 {
                for name in &columns {
                    write!(out, "{}\t", name)?;
                }
                writeln!(out)?;
            }
            for value in row_values(row, columns.len())? {
                write!(out, "{}\t", value)?;
            }
            writeln!(out)?;
            row_count += 1;
        }
        out.flush()?;
        Ok(row_count)
    }

    /// Executes a query and returns every cell as a string.
    ///
    /// `records[i][j]` is the cell at row `i`, column `j` of the result set.
    pub fn execute_query_records<P: Params>(&self, sql: &str, params: P) -> Result<Vec<Vec<String>>> {
        Ok(self.execute_query(sql, params)?.rows)
    }

    /// Executes a query and returns column names together with the rows
    ///
    /// # Errors
    ///
    /// Returns `ConsoleError::Sql` if the SQL is invalid or the query fails.
    pub fn execute_query<P: Params>(&self, sql: &str, params: P) -> Result<QueryResult> {
        debug!(sql, "execute query");
        let mut stmt = self.connection.prepare(sql)?;
        let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();
        let column_count = columns.len();

        let rows = stmt
            .query_map(params, |row| row_values(row, column_count))?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(QueryResult::new(columns, rows))
    }

    /// Returns the rowid of the most recent successful insert on this connection.
    pub fn last_insert_id(&self) -> i64 {
        self.connection.last_insert_rowid()
    }
}

fn row_values(row: &Row<'_>, column_count: usize) -> rusqlite::Result<Vec<String>> {
    let mut values = Vec::with_capacity(column_count);
    for i in 0..column_count {
        values.push(format_value(row.get_ref(i)?));
    }
    Ok(values)
}

/// Formats a SQLite value for display
fn format_value(value: ValueRef) -> String {
    match value {
        ValueRef::Null => "NULL".to_string(),
        ValueRef::Integer(i) => i.to_string(),
        ValueRef::Real(f) => f.to_string(),
        ValueRef::Text(t) => String::from_utf8_lossy(t).to_string(),
        ValueRef::Blob(b) => format!("<BLOB: {} bytes>", b.len()),
    }
}
