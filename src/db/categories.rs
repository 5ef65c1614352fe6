use rusqlite::params;
use tracing::{info, warn};

use super::{lookup_category_id, Database};
use crate::categories::DefaultCategory;
use crate::error::{ExpenseError, Result};

impl Database {
    /// All category names in creation order.
    pub fn load_categories(&self) -> Result<Vec<String>> {
        let mut stmt = self.conn.prepare("SELECT name FROM categories ORDER BY id")?;
        let names = stmt
            .query_map([], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<String>>>()?;
        Ok(names)
    }

    pub fn category_id(&self, name: &str) -> Result<Option<i64>> {
        Ok(lookup_category_id(&self.conn, name)?)
    }

    pub fn add_category(&mut self, name: &str) -> Result<i64> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ExpenseError::EmptyCategoryName);
        }

        let tx = self.conn.transaction()?;
        if lookup_category_id(&tx, name)?.is_some() {
            warn!(category = name, "refused duplicate category");
            return Err(ExpenseError::DuplicateCategory(name.to_string()));
        }
        tx.execute("INSERT INTO categories (name) VALUES (?)", params![name])?;
        let id = tx.last_insert_rowid();
        tx.commit()?;

        info!(category = name, id, "category added");
        Ok(id)
    }

    /// Removes a user-added category that no expense references.
    pub fn remove_category(&mut self, name: &str) -> Result<()> {
        let name = name.trim();
        if DefaultCategory::is_default(name) {
            warn!(category = name, "refused removal of default category");
            return Err(ExpenseError::ProtectedCategory(name.to_string()));
        }

        let tx = self.conn.transaction()?;
        let id = lookup_category_id(&tx, name)?
            .ok_or_else(|| ExpenseError::UnknownCategory(name.to_string()))?;

        let used: bool = tx.query_row(
            "SELECT EXISTS(SELECT 1 FROM expenses WHERE category_id = ?)",
            params![id],
            |row| row.get(0),
        )?;
        if used {
            warn!(category = name, "refused removal of category in use");
            return Err(ExpenseError::CategoryInUse(name.to_string()));
        }

        tx.execute("DELETE FROM categories WHERE id = ?", params![id])?;
        tx.commit()?;

        info!(category = name, "category removed");
        Ok(())
    }
}
