pub mod categories;
pub mod config;
pub mod db;
pub mod error;
pub mod import;
pub mod models;
pub mod month;
pub mod render;

pub use db::Database;
pub use error::{ExpenseError, Result};
pub use month::MonthKey;
