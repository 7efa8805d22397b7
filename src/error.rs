/// Application-level errors
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("External API error: {0}")]
    ExternalApi(String),

    #[error("Preference store error: {0}")]
    Store(#[from] redis::RedisError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// True for failures of the remote catalog itself (transport, status or payload)
    pub fn is_transport(&self) -> bool {
        matches!(self, AppError::HttpClient(_) | AppError::ExternalApi(_))
    }
}

pub type AppResult<T> = Result<T, AppError>;
