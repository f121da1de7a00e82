//! Store operations over a borrowed connection. The desktop commands lock the
//! shared connection and delegate here.

pub mod auth;
pub mod customers;
pub mod inventory;
pub mod invoices;
pub mod reports;
pub mod settings;

use rusqlite::Connection;

use crate::error::AppResult;

/// Next integer id for a table: `max(id) + 1`, or 1 when empty.
pub(crate) fn next_id(conn: &Connection, table: &str) -> AppResult<i64> {
    let id = conn.query_row(
        &format!("SELECT COALESCE(MAX(id), 0) + 1 FROM {table}"),
        [],
        |row| row.get(0),
    )?;
    Ok(id)
}

pub(crate) fn blank_to_none(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
