mod categories;
mod expenses;
mod import;
mod reports;

use rusqlite::types::Value;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;
use tracing::debug;

use crate::categories::DefaultCategory;
use crate::error::{ExpenseError, Result};
use crate::models::Expense;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS categories (
    id   INTEGER PRIMARY KEY,
    name TEXT UNIQUE NOT NULL
);

CREATE TABLE IF NOT EXISTS expenses (
    id          INTEGER PRIMARY KEY,
    date        TEXT NOT NULL,
    category_id INTEGER NOT NULL,
    amount      REAL NOT NULL,
    notes       TEXT,
    FOREIGN KEY (category_id) REFERENCES categories (id)
);
";

/// Handle to the expense store. Owns a single SQLite connection for the
/// lifetime of the value; every write runs in its own transaction.
pub struct Database {
    conn: Connection,
}

impl Database {
    pub fn open(path: &Path) -> Result<Self> {
        debug!(path = %path.display(), "opening expense store");
        Self::from_connection(Connection::open(path)?)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        conn.pragma_update(None, "foreign_keys", true)?;
        let mut db = Database { conn };
        db.initialize()?;
        Ok(db)
    }

    /// Creates the tables if needed and seeds the default categories.
    /// Safe to run on every startup.
    pub fn initialize(&mut self) -> Result<()> {
        let tx = self.conn.transaction()?;
        tx.execute_batch(SCHEMA)?;
        for category in DefaultCategory::all() {
            tx.execute(
                "INSERT OR IGNORE INTO categories (name) VALUES (?)",
                params![category.name()],
            )?;
        }
        tx.commit()?;
        debug!("schema ready");
        Ok(())
    }

    pub fn expense_count(&self) -> Result<i64> {
        Ok(self
            .conn
            .query_row("SELECT COUNT(*) FROM expenses", [], |row| row.get(0))?)
    }
}

fn lookup_category_id(conn: &Connection, name: &str) -> rusqlite::Result<Option<i64>> {
    conn.query_row(
        "SELECT id FROM categories WHERE name = ?",
        params![name],
        |row| row.get(0),
    )
    .optional()
}

/// Returns the id of `name`, inserting the category when missing.
fn resolve_or_create_category(conn: &Connection, name: &str) -> rusqlite::Result<i64> {
    if let Some(id) = lookup_category_id(conn, name)? {
        return Ok(id);
    }
    conn.execute("INSERT INTO categories (name) VALUES (?)", params![name])?;
    Ok(conn.last_insert_rowid())
}

fn insert_expense(
    conn: &Connection,
    date: chrono::NaiveDate,
    category_id: i64,
    amount: f64,
    notes: Option<&str>,
) -> rusqlite::Result<i64> {
    conn.execute(
        "INSERT INTO expenses (date, category_id, amount, notes) VALUES (?, ?, ?, ?)",
        params![date, category_id, amount, notes],
    )?;
    Ok(conn.last_insert_rowid())
}

fn expense_from_row(row: &Row<'_>) -> rusqlite::Result<Expense> {
    Ok(Expense {
        id: row.get(0)?,
        date: row.get(1)?,
        category: row.get(2)?,
        amount: row.get(3)?,
        notes: row.get(4)?,
    })
}

fn date_value(date: chrono::NaiveDate) -> Value {
    Value::Text(date.format("%Y-%m-%d").to_string())
}

/// Blank notes are stored as NULL.
fn clean_notes(notes: Option<&str>) -> Option<&str> {
    notes.map(str::trim).filter(|n| !n.is_empty())
}

fn require_positive(amount: f64) -> Result<()> {
    if amount.is_finite() && amount > 0.0 {
        Ok(())
    } else {
        Err(ExpenseError::InvalidAmount(amount))
    }
}

fn require_non_negative(amount: f64) -> Result<()> {
    if amount.is_finite() && amount >= 0.0 {
        Ok(())
    } else {
        Err(ExpenseError::InvalidAmount(amount))
    }
}
