use chrono::NaiveDate;
use rusqlite::params;
use tracing::{debug, info, warn};

use super::{
    clean_notes, insert_expense, lookup_category_id, require_non_negative, require_positive,
    resolve_or_create_category, Database,
};
use crate::error::{ExpenseError, Result};
use crate::models::ClosureAmounts;

impl Database {
    /// Records a single expense and returns its id.
    pub fn add_expense(
        &mut self,
        date: NaiveDate,
        category: &str,
        amount: f64,
        notes: Option<&str>,
    ) -> Result<i64> {
        if let Err(e) = require_positive(amount) {
            warn!(amount, "refused expense with non-positive amount");
            return Err(e);
        }

        let tx = self.conn.transaction()?;
        let category_id = lookup_category_id(&tx, category)?
            .ok_or_else(|| ExpenseError::UnknownCategory(category.to_string()))?;
        let id = insert_expense(&tx, date, category_id, amount, clean_notes(notes))?;
        tx.commit()?;

        info!(id, %date, category, amount, "expense added");
        Ok(id)
    }

    /// Returns whether a row was removed. Missing ids are not an error.
    pub fn delete_expense(&mut self, id: i64) -> Result<bool> {
        let tx = self.conn.transaction()?;
        let removed = tx.execute("DELETE FROM expenses WHERE id = ?", params![id])?;
        tx.commit()?;

        if removed > 0 {
            info!(id, "expense deleted");
        } else {
            debug!(id, "no expense to delete");
        }
        Ok(removed > 0)
    }

    /// Books the end-of-day amounts against the closure categories.
    ///
    /// Zero amounts are skipped. All rows are written in one transaction,
    /// so either every non-zero amount is recorded or none is. A closure
    /// category missing from the store is created in the same transaction.
    pub fn daily_closure(
        &mut self,
        date: NaiveDate,
        amounts: ClosureAmounts,
        notes: Option<&str>,
    ) -> Result<Vec<i64>> {
        for (category, amount) in amounts.by_category() {
            if let Err(e) = require_non_negative(amount) {
                warn!(category, amount, "refused closure with negative amount");
                return Err(e);
            }
        }

        let notes = clean_notes(notes);
        let tx = self.conn.transaction()?;
        let mut ids = Vec::new();
        for (category, amount) in amounts.by_category() {
            if amount == 0.0 {
                continue;
            }
            let category_id = resolve_or_create_category(&tx, category)?;
            ids.push(insert_expense(&tx, date, category_id, amount, notes)?);
        }
        tx.commit()?;

        info!(%date, rows = ids.len(), "daily closure recorded");
        Ok(ids)
    }
}
