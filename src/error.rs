use std::path::PathBuf;

use chrono::NaiveDate;

pub type BsResult<T> = Result<T, BsError>;

#[derive(Debug, thiserror::Error)]
pub enum BsError {
    #[error("[Access Denied] {message}")]
    AccessDenied { message: String },

    #[error("[Constraint Violation] {message}")]
    ConstraintViolation { code: &'static str, message: String },

    #[error("[CSV Error] {0}")]
    CsvError(#[from] ::csv::Error),

    #[error("[Duplicate Key] ({date}, {ticker}) already exists")]
    DuplicateKey { date: NaiveDate, ticker: String },

    #[error("[Invalid] {message}")]
    Invalid { code: &'static str, message: String },

    #[error("[IO Error] {0}")]
    IoError(#[from] std::io::Error),

    #[error("[Lock Error] {0}")]
    LockError(String),

    #[error("[Not Exists] {message}")]
    NotExists { code: &'static str, message: String },

    #[error("[Parse Config Error] {0}")]
    ParseConfigError(#[from] ::confy::ConfyError),

    #[error("[Parse DataTime Error] {0}")]
    ParseDataTimeError(#[from] chrono::ParseError),

    #[error("[Parse Decimal Error] {0}")]
    ParseDecimalError(#[from] ::rust_decimal::Error),

    #[error("[Serde JSON Error] {0}")]
    SerdeJsonError(#[from] ::serde_json::Error),

    #[error("[SQL Error] {0}")]
    SqlError(#[from] ::libsql::Error),
}

impl From<std::sync::PoisonError<std::sync::RwLockReadGuard<'_, Option<PathBuf>>>> for BsError {
    fn from(err: std::sync::PoisonError<std::sync::RwLockReadGuard<'_, Option<PathBuf>>>) -> Self {
        Self::LockError(err.to_string())
    }
}
