use thiserror::Error;

pub type Result<T> = std::result::Result<T, ExpenseError>;

#[derive(Debug, Error)]
pub enum ExpenseError {
    #[error("category '{0}' already exists")]
    DuplicateCategory(String),

    #[error("category '{0}' is a default category and cannot be removed")]
    ProtectedCategory(String),

    #[error("category '{0}' is used by existing expenses and cannot be removed")]
    CategoryInUse(String),

    #[error("invalid amount: {0}")]
    InvalidAmount(f64),

    #[error("unknown category '{0}'")]
    UnknownCategory(String),

    #[error("category name must not be empty")]
    EmptyCategoryName,

    #[error("invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("invalid month '{0}', expected YYYY-MM")]
    InvalidMonthKey(String),

    #[error("import failed on line {line}: {reason}")]
    ImportRow { line: u64, reason: String },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("storage unavailable: {0}")]
    StorageUnavailable(#[from] rusqlite::Error),
}

impl ExpenseError {
    /// True for the errors a user can fix by changing their input.
    pub fn is_user_error(&self) -> bool {
        !matches!(
            self,
            ExpenseError::StorageUnavailable(_) | ExpenseError::Io(_)
        )
    }
}
