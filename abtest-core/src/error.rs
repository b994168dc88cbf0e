use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    #[error("Insufficient data: sample '{label}' has {actual} observation(s), at least {required} required")]
    InsufficientData {
        label: String,
        actual: usize,
        required: usize,
    },

    #[error("Invalid alpha: {0} (significance level must lie strictly between 0 and 1)")]
    InvalidAlpha(f64),

    #[error("Degenerate sample: {0}")]
    DegenerateSample(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Data source error: {0}")]
    DataSource(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("I/O error: {0}")]
    Io(String),
}

pub type Result<T> = std::result::Result<T, CoreError>;

impl From<serde_json::Error> for CoreError {
    fn from(err: serde_json::Error) -> Self {
        CoreError::Serialization(err.to_string())
    }
}

impl From<std::io::Error> for CoreError {
    fn from(err: std::io::Error) -> Self {
        CoreError::Io(err.to_string())
    }
}

