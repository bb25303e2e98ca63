use thiserror::Error;

#[derive(Error, Debug)]
pub enum PrStatsError {
    #[error("Invalid timestamp for pull request #{number} ({field}): {value:?}: {source}")]
    TimestampParse {
        number: u64,
        field: &'static str,
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("Invalid month {0}, expected a value between 1 and 12")]
    InvalidMonth(u32),

    #[error("Invalid year {0}")]
    InvalidYear(i32),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, PrStatsError>;
