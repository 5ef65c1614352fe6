use chrono::NaiveDate;
use serde::Serialize;

/// A stored expense joined with its category name.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Expense {
    pub id: i64,
    pub date: NaiveDate,
    pub category: String,
    pub amount: f64,
    pub notes: Option<String>,
}

/// One line of a report listing. Same as [`Expense`] without the id.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportEntry {
    pub date: NaiveDate,
    pub category: String,
    pub amount: f64,
    pub notes: Option<String>,
}

impl From<Expense> for ReportEntry {
    fn from(e: Expense) -> Self {
        Self {
            date: e.date,
            category: e.category,
            amount: e.amount,
            notes: e.notes,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryTotal {
    pub category: String,
    pub total: f64,
}

/// All entries of one month, in date order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MonthlyReport {
    pub entries: Vec<ReportEntry>,
}

impl MonthlyReport {
    pub fn total(&self) -> f64 {
        self.entries.iter().map(|e| e.amount).sum()
    }
}

/// Amounts entered at the end of a day.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ClosureAmounts {
    pub visa: f64,
    pub cash: f64,
    pub expenses: f64,
}

impl ClosureAmounts {
    /// Pairs each amount with the category it is booked against.
    pub fn by_category(&self) -> [(&'static str, f64); 3] {
        let [visa, cash, expenses] = crate::categories::CLOSURE_CATEGORIES;
        [(visa, self.visa), (cash, self.cash), (expenses, self.expenses)]
    }
}
