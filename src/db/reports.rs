use chrono::NaiveDate;
use rusqlite::types::Value;
use rusqlite::params;
use std::collections::BTreeMap;
use tracing::debug;

use super::{date_value, expense_from_row, Database};
use crate::categories::VISA_CASH_CATEGORIES;
use crate::error::Result;
use crate::models::{CategoryTotal, Expense, MonthlyReport, ReportEntry};
use crate::month::MonthKey;

const EXPENSE_SELECT: &str = "SELECT e.id, e.date, c.name, e.amount, e.notes
     FROM expenses e
     JOIN categories c ON e.category_id = c.id";

impl Database {
    /// Runs the joined expense select with an optional WHERE clause,
    /// ordered by date then id.
    fn query_expenses(&self, filter: &str, params_vec: Vec<Value>) -> Result<Vec<Expense>> {
        let mut query = String::from(EXPENSE_SELECT);
        if !filter.is_empty() {
            query.push_str(" WHERE ");
            query.push_str(filter);
        }
        query.push_str(" ORDER BY e.date ASC, e.id ASC");

        let mut stmt = self.conn.prepare(&query)?;
        let rows = stmt.query_map(rusqlite::params_from_iter(params_vec), expense_from_row)?;

        let mut results = Vec::new();
        for row in rows {
            results.push(row?);
        }
        debug!(filter, rows = results.len(), "expense query");
        Ok(results)
    }

    fn query_entries(&self, filter: &str, params_vec: Vec<Value>) -> Result<Vec<ReportEntry>> {
        Ok(self
            .query_expenses(filter, params_vec)?
            .into_iter()
            .map(ReportEntry::from)
            .collect())
    }

    pub fn list_all_expenses(&self) -> Result<Vec<Expense>> {
        self.query_expenses("", Vec::new())
    }

    /// One total per category that has at least one expense, in category order.
    pub fn totals_by_category(&self) -> Result<Vec<CategoryTotal>> {
        let mut stmt = self.conn.prepare(
            "SELECT c.name, SUM(e.amount)
             FROM expenses e
             JOIN categories c ON e.category_id = c.id
             GROUP BY c.id
             ORDER BY c.id",
        )?;
        let totals = stmt
            .query_map([], |row| {
                Ok(CategoryTotal {
                    category: row.get(0)?,
                    total: row.get(1)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(totals)
    }

    pub fn totals_by_month(&self) -> Result<BTreeMap<MonthKey, f64>> {
        let mut stmt = self
            .conn
            .prepare("SELECT date, amount FROM expenses ORDER BY date ASC, id ASC")?;
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, NaiveDate>(0)?, row.get::<_, f64>(1)?))
        })?;

        let mut totals = BTreeMap::new();
        for row in rows {
            let (date, amount) = row?;
            *totals.entry(MonthKey::of(date)).or_insert(0.0) += amount;
        }
        Ok(totals)
    }

    /// Every expense bucketed by month, each bucket in date order.
    pub fn detailed_monthly_expenses(&self) -> Result<BTreeMap<MonthKey, MonthlyReport>> {
        let mut months: BTreeMap<MonthKey, MonthlyReport> = BTreeMap::new();
        for expense in self.list_all_expenses()? {
            months
                .entry(MonthKey::of(expense.date))
                .or_default()
                .entries
                .push(expense.into());
        }
        Ok(months)
    }

    pub fn daily_expenses(&self, date: NaiveDate) -> Result<Vec<ReportEntry>> {
        self.query_entries("e.date = ?", vec![date_value(date)])
    }

    pub fn monthly_expenses(&self, month: MonthKey) -> Result<Vec<ReportEntry>> {
        let (start, end) = month.date_range();
        self.query_entries("e.date >= ? AND e.date < ?", vec![date_value(start), date_value(end)])
    }

    /// Monthly listing restricted to the card, cash and closure categories.
    pub fn visa_cash_expenses(&self, month: MonthKey) -> Result<Vec<ReportEntry>> {
        let (start, end) = month.date_range();
        let mut params_vec = vec![date_value(start), date_value(end)];
        params_vec.extend(VISA_CASH_CATEGORIES.iter().map(|c| Value::Text(c.to_string())));

        let placeholders = vec!["?"; VISA_CASH_CATEGORIES.len()].join(", ");
        let filter = format!("e.date >= ? AND e.date < ? AND c.name IN ({})", placeholders);
        self.query_entries(&filter, params_vec)
    }

    /// False for names that are not categories at all.
    pub fn is_category_used(&self, name: &str) -> Result<bool> {
        Ok(self.conn.query_row(
            "SELECT EXISTS(
                SELECT 1 FROM expenses e
                JOIN categories c ON e.category_id = c.id
                WHERE c.name = ?
             )",
            params![name],
            |row| row.get(0),
        )?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::tests::date;
    use crate::models::ClosureAmounts;

    fn month(s: &str) -> MonthKey {
        s.parse().unwrap()
    }

    fn seeded() -> Database {
        let mut db = Database::open_in_memory().unwrap();
        db.add_expense(date("2024-02-10"), "Electricity", 80.0, None).unwrap();
        db.add_expense(date("2024-01-15"), "Rent", 500.0, Some("January")).unwrap();
        db.add_expense(date("2024-01-20"), "Internet", 25.5, None).unwrap();
        db.add_expense(date("2024-02-01"), "Rent", 500.0, None).unwrap();
        db.add_expense(date("2023-12-31"), "Visa", 12.25, None).unwrap();
        db
    }

    #[test]
    fn test_empty_store_reports_are_empty() {
        let db = Database::open_in_memory().unwrap();
        assert!(db.list_all_expenses().unwrap().is_empty());
        assert!(db.totals_by_category().unwrap().is_empty());
        assert!(db.totals_by_month().unwrap().is_empty());
        assert!(db.detailed_monthly_expenses().unwrap().is_empty());
        assert!(db.daily_expenses(date("2024-01-01")).unwrap().is_empty());
        assert!(db.monthly_expenses(month("2024-01")).unwrap().is_empty());
        assert!(db.visa_cash_expenses(month("2024-01")).unwrap().is_empty());
    }

    #[test]
    fn test_single_rent_expense() {
        let mut db = Database::open_in_memory().unwrap();
        db.add_expense(date("2024-01-15"), "Rent", 500.0, Some("")).unwrap();

        let all = db.list_all_expenses().unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(
            (all[0].date, all[0].category.as_str(), all[0].amount),
            (date("2024-01-15"), "Rent", 500.0)
        );

        let totals = db.totals_by_month().unwrap();
        assert_eq!(totals.len(), 1);
        assert_eq!(totals[&month("2024-01")], 500.0);
    }

    #[test]
    fn test_list_is_date_ordered() {
        let db = seeded();
        let dates: Vec<String> = db
            .list_all_expenses()
            .unwrap()
            .iter()
            .map(|e| e.date.to_string())
            .collect();
        assert_eq!(dates, ["2023-12-31", "2024-01-15", "2024-01-20", "2024-02-01", "2024-02-10"]);
    }

    #[test]
    fn test_totals_by_category() {
        let db = seeded();
        let totals: Vec<(String, f64)> = db
            .totals_by_category()
            .unwrap()
            .into_iter()
            .map(|t| (t.category, t.total))
            .collect();
        assert_eq!(
            totals,
            [
                ("Electricity".to_string(), 80.0),
                ("Internet".to_string(), 25.5),
                ("Rent".to_string(), 1000.0),
                ("Visa".to_string(), 12.25),
            ]
        );
    }

    #[test]
    fn test_totals_by_month() {
        let db = seeded();
        let totals: Vec<(String, f64)> = db
            .totals_by_month()
            .unwrap()
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect();
        assert_eq!(
            totals,
            [
                ("2023-12".to_string(), 12.25),
                ("2024-01".to_string(), 525.5),
                ("2024-02".to_string(), 580.0),
            ]
        );
    }

    #[test]
    fn test_detailed_months_match_monthly_totals() {
        let db = seeded();
        let detailed = db.detailed_monthly_expenses().unwrap();
        let rebuilt: BTreeMap<MonthKey, f64> =
            detailed.iter().map(|(k, r)| (*k, r.total())).collect();
        assert_eq!(rebuilt, db.totals_by_month().unwrap());

        let february = &detailed[&month("2024-02")];
        let dates: Vec<NaiveDate> = february.entries.iter().map(|e| e.date).collect();
        assert_eq!(dates, [date("2024-02-01"), date("2024-02-10")]);
    }

    #[test]
    fn test_daily_expenses_exact_match() {
        let db = seeded();
        let rows = db.daily_expenses(date("2024-01-15")).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].notes.as_deref(), Some("January"));
        assert!(db.daily_expenses(date("2024-01-16")).unwrap().is_empty());
    }

    #[test]
    fn test_monthly_expenses_stays_within_month() {
        let db = seeded();
        let rows = db.monthly_expenses(month("2024-01")).unwrap();
        let categories: Vec<&str> = rows.iter().map(|r| r.category.as_str()).collect();
        assert_eq!(categories, ["Rent", "Internet"]);

        let december = db.monthly_expenses(month("2023-12")).unwrap();
        assert_eq!(december.len(), 1);
    }

    #[test]
    fn test_visa_cash_expenses() {
        let mut db = seeded();
        db.add_expense(date("2024-02-03"), "Personal Expenses", 15.0, None).unwrap();
        db.add_expense(date("2024-03-03"), "Cash", 99.0, None).unwrap();
        let amounts = ClosureAmounts { visa: 7.0, cash: 3.0, expenses: 2.0 };
        db.daily_closure(date("2024-02-20"), amounts, None).unwrap();

        let rows = db.visa_cash_expenses(month("2024-02")).unwrap();
        let booked: Vec<(&str, f64)> =
            rows.iter().map(|r| (r.category.as_str(), r.amount)).collect();
        assert_eq!(
            booked,
            [("Personal Expenses", 15.0), ("Visa", 7.0), ("Cash", 3.0), ("Expenses", 2.0)]
        );
    }

    #[test]
    fn test_is_category_used() {
        let db = seeded();
        assert!(db.is_category_used("Rent").unwrap());
        assert!(!db.is_category_used("Garbage").unwrap());
        assert!(!db.is_category_used("No Such Category").unwrap());
    }
}
