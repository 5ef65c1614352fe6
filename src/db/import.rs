use std::fs::File;
use std::path::Path;
use tracing::{debug, info};

use super::{insert_expense, lookup_category_id, resolve_or_create_category, Database};
use crate::error::Result;
use crate::import::{parse_legacy, ImportStats, LegacyRecord};

/// `user_version` once the legacy file has been imported.
const LEGACY_IMPORTED: i64 = 1;

impl Database {
    /// Inserts every record in one transaction, creating categories as
    /// they are first seen.
    pub fn import_records(&mut self, records: &[LegacyRecord]) -> Result<ImportStats> {
        let tx = self.conn.transaction()?;
        let mut stats = ImportStats::default();

        for record in records {
            let category_id = match lookup_category_id(&tx, &record.category)? {
                Some(id) => id,
                None => {
                    stats.categories_created += 1;
                    debug!(category = %record.category, "creating category from import");
                    resolve_or_create_category(&tx, &record.category)?
                }
            };
            insert_expense(
                &tx,
                record.date,
                category_id,
                record.amount,
                record.notes.as_deref(),
            )?;
            stats.rows_imported += 1;
        }

        tx.pragma_update(None, "user_version", LEGACY_IMPORTED)?;
        tx.commit()?;
        info!(
            rows = stats.rows_imported,
            categories = stats.categories_created,
            "legacy records imported"
        );
        Ok(stats)
    }

    pub fn import_legacy_file(&mut self, path: &Path) -> Result<ImportStats> {
        let file = File::open(path)?;
        let records = parse_legacy(file)?;
        self.import_records(&records)
    }

    pub fn legacy_import_done(&self) -> Result<bool> {
        let version: i64 = self
            .conn
            .pragma_query_value(None, "user_version", |row| row.get(0))?;
        Ok(version >= LEGACY_IMPORTED)
    }

    fn mark_legacy_import_done(&self) -> Result<()> {
        self.conn.pragma_update(None, "user_version", LEGACY_IMPORTED)?;
        Ok(())
    }

    /// Imports the legacy file once per store. Later calls are no-ops even
    /// after every expense has been deleted.
    pub fn import_on_first_launch(&mut self, path: &Path) -> Result<Option<ImportStats>> {
        if self.legacy_import_done()? {
            debug!("legacy import already done");
            return Ok(None);
        }
        if !path.exists() {
            debug!(path = %path.display(), "no legacy file to import");
            return Ok(None);
        }
        // stores populated before the import flag existed
        if self.expense_count()? > 0 {
            debug!(path = %path.display(), "store already populated, skipping import");
            self.mark_legacy_import_done()?;
            return Ok(None);
        }
        self.import_legacy_file(path).map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ExpenseError;
    use crate::import::tests::SAMPLE;
    use std::fs;
    use tempfile::TempDir;

    fn write_csv(dir: &TempDir, contents: &str) -> std::path::PathBuf {
        let path = dir.path().join("expenses.csv");
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_import_creates_missing_categories() {
        let mut db = Database::open_in_memory().unwrap();
        let records = parse_legacy(SAMPLE.as_bytes()).unwrap();
        let stats = db.import_records(&records).unwrap();

        assert_eq!(
            stats,
            ImportStats {
                rows_imported: 3,
                categories_created: 1
            }
        );
        assert_eq!(db.load_categories().unwrap().last().map(String::as_str), Some("Fuel"));
        assert!(db.is_category_used("Fuel").unwrap());
        assert_eq!(db.expense_count().unwrap(), 3);
    }

    #[test]
    fn test_imported_rows_show_in_reports() {
        let mut db = Database::open_in_memory().unwrap();
        let records = parse_legacy(SAMPLE.as_bytes()).unwrap();
        db.import_records(&records).unwrap();

        let totals: Vec<(String, f64)> = db
            .totals_by_month()
            .unwrap()
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect();
        assert_eq!(totals, [("2024-01".to_string(), 540.5), ("2024-02".to_string(), 12.25)]);
    }

    #[test]
    fn test_first_launch_import_skips_missing_file() {
        let mut db = Database::open_in_memory().unwrap();
        let stats = db
            .import_on_first_launch(Path::new("definitely/not/here.csv"))
            .unwrap();
        assert_eq!(stats, None);
        assert_eq!(db.expense_count().unwrap(), 0);
    }

    #[test]
    fn test_first_launch_import_runs_once() {
        let dir = TempDir::new().unwrap();
        let csv_path = write_csv(&dir, SAMPLE);
        let db_path = dir.path().join("expenses.db");

        let mut db = Database::open(&db_path).unwrap();
        let stats = db.import_on_first_launch(&csv_path).unwrap();
        assert_eq!(stats.map(|s| s.rows_imported), Some(3));
        assert!(db.legacy_import_done().unwrap());

        for expense in db.list_all_expenses().unwrap() {
            db.delete_expense(expense.id).unwrap();
        }
        drop(db);

        let mut db = Database::open(&db_path).unwrap();
        assert_eq!(db.import_on_first_launch(&csv_path).unwrap(), None);
        assert_eq!(db.expense_count().unwrap(), 0);
    }

    #[test]
    fn test_import_legacy_file() {
        let dir = TempDir::new().unwrap();
        let csv_path = write_csv(&dir, SAMPLE);

        let mut db = Database::open_in_memory().unwrap();
        let stats = db.import_legacy_file(&csv_path).unwrap();
        assert_eq!(stats.rows_imported, 3);
        assert_eq!(db.expense_count().unwrap(), 3);
    }

    #[test]
    fn test_bad_row_rolls_back_whole_file() {
        let dir = TempDir::new().unwrap();
        let csv_path = write_csv(
            &dir,
            "date,category,amount,notes\n2024-01-15,Fuel,40,\n2024-01-16,Fuel,abc,\n",
        );

        let mut db = Database::open_in_memory().unwrap();
        match db.import_on_first_launch(&csv_path) {
            Err(ExpenseError::ImportRow { line, .. }) => assert_eq!(line, 3),
            other => panic!("expected row error, got {:?}", other),
        }
        assert_eq!(db.expense_count().unwrap(), 0);
        assert_eq!(db.category_id("Fuel").unwrap(), None);
        assert!(!db.legacy_import_done().unwrap());
    }

    #[test]
    fn test_populated_store_skips_import() {
        let dir = TempDir::new().unwrap();
        let csv_path = write_csv(&dir, SAMPLE);

        let mut db = Database::open_in_memory().unwrap();
        db.add_expense(crate::db::tests::date("2024-03-01"), "Rent", 100.0, None)
            .unwrap();
        assert_eq!(db.import_on_first_launch(&csv_path).unwrap(), None);
        assert_eq!(db.expense_count().unwrap(), 1);
        assert!(db.legacy_import_done().unwrap());
    }
}
