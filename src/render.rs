use std::collections::BTreeMap;
use std::fmt::Write;

use crate::models::{CategoryTotal, Expense, MonthlyReport, ReportEntry};
use crate::month::MonthKey;

const EMPTY: &str = "No expenses yet.";

fn notes(n: &Option<String>) -> &str {
    n.as_deref().unwrap_or("")
}

pub fn expenses_table(rows: &[Expense]) -> String {
    if rows.is_empty() {
        return format!("{}\n", EMPTY);
    }
    let mut out = format!(
        "{: >6}  {: <10}  {: <20}  {: >12}  {}\n",
        "id", "date", "category", "amount", "notes"
    );
    for e in rows {
        let _ = writeln!(
            out,
            "{: >6}  {: <10}  {: <20}  {: >12.2}  {}",
            e.id,
            e.date.to_string(),
            e.category,
            e.amount,
            notes(&e.notes)
        );
    }
    out
}

pub fn entries_table(rows: &[ReportEntry]) -> String {
    if rows.is_empty() {
        return format!("{}\n", EMPTY);
    }
    let mut out = format!("{: <10}  {: <20}  {: >12}  {}\n", "date", "category", "amount", "notes");
    for e in rows {
        let _ = writeln!(
            out,
            "{: <10}  {: <20}  {: >12.2}  {}",
            e.date.to_string(),
            e.category,
            e.amount,
            notes(&e.notes)
        );
    }
    out
}

pub fn category_totals_table(rows: &[CategoryTotal]) -> String {
    if rows.is_empty() {
        return format!("{}\n", EMPTY);
    }
    let mut out = format!("{: <20}  {: >12}\n", "category", "total");
    for t in rows {
        let _ = writeln!(out, "{: <20}  {: >12.2}", t.category, t.total);
    }
    out
}

pub fn month_totals_table(totals: &BTreeMap<MonthKey, f64>) -> String {
    if totals.is_empty() {
        return format!("{}\n", EMPTY);
    }
    let mut out = format!("{: <8}  {: >12}\n", "month", "total");
    for (month, total) in totals {
        let _ = writeln!(out, "{: <8}  {: >12.2}", month.to_string(), total);
    }
    out
}

/// One section per month followed by the month total.
pub fn detailed_report(months: &BTreeMap<MonthKey, MonthlyReport>) -> String {
    if months.is_empty() {
        return format!("{}\n", EMPTY);
    }
    let mut out = String::new();
    for (month, report) in months {
        let _ = writeln!(out, "Month: {}", month);
        out.push_str(&entries_table(&report.entries));
        let _ = writeln!(out, "Total: {:.2}\n", report.total());
    }
    out
}

pub fn category_list(names: &[String]) -> String {
    let mut out = String::from("Categories:\n");
    for name in names {
        let _ = writeln!(out, "- {}", name);
    }
    out
}
