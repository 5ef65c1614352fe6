use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_path: PathBuf,
    pub import_path: PathBuf,
}

impl Config {
    pub fn from_env() -> Self {
        // Load .env file if present (silently ignored if missing)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F: Fn(&str) -> Option<String>>(lookup: F) -> Self {
        let database_path =
            lookup("EXPENSES_DB").unwrap_or_else(|| "expenses.db".to_string());
        let import_path =
            lookup("EXPENSES_IMPORT_CSV").unwrap_or_else(|| "expenses.csv".to_string());

        Self {
            database_path: PathBuf::from(database_path),
            import_path: PathBuf::from(import_path),
        }
    }
}
