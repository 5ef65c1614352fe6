use std::error::Error;
use std::path::{Path, PathBuf};
use std::process;

use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

use expense_ledger::config::Config;
use expense_ledger::models::ClosureAmounts;
use expense_ledger::month::parse_date;
use expense_ledger::{render, Database, ExpenseError, MonthKey};

type CliResult = Result<(), Box<dyn Error>>;

const USAGE: &str = "Usage: expense-ledger [--db <path>] [--json] <command> [args]
Commands:
  add <date> <category> <amount> [notes]
  list
  delete <id>
  totals categories|months
  report
  daily <date>
  monthly <YYYY-MM>
  visa-cash <YYYY-MM>
  closure <date> <visa> <cash> <expenses> [notes]
  categories list
  categories add <name>
  categories remove <name>
  import <path>";

struct Output {
    json: bool,
}

impl Output {
    fn show<T: Serialize + ?Sized>(&self, value: &T, text: impl FnOnce(&T) -> String) -> CliResult {
        if self.json {
            println!("{}", serde_json::to_string_pretty(value)?);
        } else {
            print!("{}", text(value));
        }
        Ok(())
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = run(std::env::args().skip(1).collect()) {
        eprintln!("{}", error_message(err.as_ref()));
        process::exit(1);
    }
}

/// Input mistakes read as plain errors; store and file failures are flagged
/// so they are not mistaken for something the user typed.
fn error_message(err: &(dyn Error + 'static)) -> String {
    match err.downcast_ref::<ExpenseError>() {
        Some(e) if !e.is_user_error() => format!("Storage failure, nothing was changed: {}", e),
        _ => format!("Error: {}", err),
    }
}

fn run(args: Vec<String>) -> CliResult {
    let config = Config::from_env();
    let mut db_path = config.database_path.clone();
    let mut json = false;
    let mut rest = Vec::new();

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--db" => {
                let path = args.get(i + 1).ok_or("--db needs a path")?;
                db_path = PathBuf::from(path);
                i += 2;
            }
            "--json" => {
                json = true;
                i += 1;
            }
            _ => {
                rest.push(args[i].as_str());
                i += 1;
            }
        }
    }

    let Some((&command, params)) = rest.split_first() else {
        println!("{}", USAGE);
        return Ok(());
    };

    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let mut db = Database::open(&db_path)?;
    if command != "import" {
        if let Some(stats) = db.import_on_first_launch(&config.import_path)? {
            info!(
                rows = stats.rows_imported,
                path = %config.import_path.display(),
                "first launch import"
            );
        }
    }

    let out = Output { json };
    dispatch(&mut db, &out, command, params)
}

fn arg<'a>(params: &[&'a str], index: usize, name: &str) -> Result<&'a str, Box<dyn Error>> {
    params
        .get(index)
        .copied()
        .ok_or_else(|| format!("missing <{}>\n{}", name, USAGE).into())
}

fn amount_arg(params: &[&str], index: usize, name: &str) -> Result<f64, Box<dyn Error>> {
    let raw = arg(params, index, name)?;
    raw.trim()
        .parse::<f64>()
        .map_err(|_| format!("invalid {} '{}'", name, raw).into())
}

fn notes_arg(params: &[&str], from: usize) -> Option<String> {
    let joined = params.get(from..).map(|rest| rest.join(" ")).unwrap_or_default();
    if joined.trim().is_empty() {
        None
    } else {
        Some(joined)
    }
}

fn dispatch(db: &mut Database, out: &Output, command: &str, params: &[&str]) -> CliResult {
    match command {
        "add" => {
            let date = parse_date(arg(params, 0, "date")?)?;
            let category = arg(params, 1, "category")?;
            let amount = amount_arg(params, 2, "amount")?;
            let notes = notes_arg(params, 3);
            let id = db.add_expense(date, category, amount, notes.as_deref())?;
            println!("Added expense #{}", id);
            Ok(())
        }
        "list" => out.show(&db.list_all_expenses()?, |rows| render::expenses_table(rows)),
        "delete" => {
            let raw = arg(params, 0, "id")?;
            let id: i64 = raw.parse().map_err(|_| format!("invalid id '{}'", raw))?;
            if db.delete_expense(id)? {
                println!("Deleted expense #{}", id);
            } else {
                println!("No expense #{}", id);
            }
            Ok(())
        }
        "totals" => match arg(params, 0, "categories|months")? {
            "categories" => out.show(&db.totals_by_category()?, |rows| {
                render::category_totals_table(rows)
            }),
            "months" => out.show(&db.totals_by_month()?, render::month_totals_table),
            other => Err(format!("unknown totals kind: {}", other).into()),
        },
        "report" => out.show(&db.detailed_monthly_expenses()?, render::detailed_report),
        "daily" => {
            let date = parse_date(arg(params, 0, "date")?)?;
            out.show(&db.daily_expenses(date)?, |rows| render::entries_table(rows))
        }
        "monthly" => {
            let month: MonthKey = arg(params, 0, "YYYY-MM")?.parse()?;
            out.show(&db.monthly_expenses(month)?, |rows| render::entries_table(rows))
        }
        "visa-cash" => {
            let month: MonthKey = arg(params, 0, "YYYY-MM")?.parse()?;
            out.show(&db.visa_cash_expenses(month)?, |rows| render::entries_table(rows))
        }
        "closure" => {
            let date = parse_date(arg(params, 0, "date")?)?;
            let amounts = ClosureAmounts {
                visa: amount_arg(params, 1, "visa")?,
                cash: amount_arg(params, 2, "cash")?,
                expenses: amount_arg(params, 3, "expenses")?,
            };
            let notes = notes_arg(params, 4);
            let ids = db.daily_closure(date, amounts, notes.as_deref())?;
            println!("Recorded {} closure entries for {}", ids.len(), date);
            Ok(())
        }
        "categories" => match params.first().copied().unwrap_or("list") {
            "list" => out.show(&db.load_categories()?, |names| render::category_list(names)),
            "add" => {
                let name = arg(params, 1, "name")?;
                db.add_category(name)?;
                println!("Added category: {}", name.trim());
                Ok(())
            }
            "remove" => {
                let name = arg(params, 1, "name")?;
                db.remove_category(name)?;
                println!("Removed category: {}", name);
                Ok(())
            }
            other => Err(format!("unknown categories subcommand: {}", other).into()),
        },
        "import" => {
            let path = arg(params, 0, "path")?;
            let stats = db.import_legacy_file(Path::new(path))?;
            println!(
                "Imported {} expenses ({} new categories)",
                stats.rows_imported, stats.categories_created
            );
            Ok(())
        }
        other => Err(format!("unknown command: {}\n{}", other, USAGE).into()),
    }
}
