use thiserror::Error;

/// Failure inside a bundled backend.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[cfg(feature = "json")]
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[cfg(feature = "umya")]
    #[error("xlsx error: {0}")]
    Xlsx(#[from] umya_spreadsheet::XlsxError),

    #[cfg(feature = "calamine")]
    #[error("calamine error: {0}")]
    Calamine(#[from] calamine::Error),

    #[error("no sheet at index {0}")]
    NoSheet(usize),

    #[error("{0}")]
    Unsupported(String),
}

impl BackendError {
    pub fn unsupported(message: impl Into<String>) -> Self {
        BackendError::Unsupported(message.into())
    }
}
