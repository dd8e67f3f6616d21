use thiserror::Error;

/// Failure of a read or write operation.
///
/// Configuration and sheet-resolution errors surface before any row is
/// touched. `Conversion` aborts the remaining rows. `Cancelled` is an
/// expected outcome rather than a fault; see [`MapError::is_cancelled`].
#[derive(Debug, Error)]
pub enum MapError {
    #[error("invalid options: {field} must be >= 1 (got {value})")]
    InvalidOptions { field: &'static str, value: i64 },

    #[error("sheet not found: {0}")]
    SheetNotFound(String),

    /// The backend reported a sheet at this index but handed back no sheet.
    #[error("backend returned no sheet for index {index}")]
    NullSource { index: usize },

    #[error("cannot convert `{text}` to {target} for field '{field}' at row {row}, column {column}")]
    Conversion {
        /// 1-based row number.
        row: u32,
        /// 1-based column number.
        column: u32,
        field: String,
        text: String,
        target: String,
    },

    #[error("operation cancelled")]
    Cancelled,

    #[error("duplicate column map profile: {0}")]
    DuplicateProfile(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("{backend} backend error: {message}")]
    Backend {
        backend: &'static str,
        message: String,
    },
}

impl MapError {
    pub fn from_backend<E: std::error::Error>(backend: &'static str, err: E) -> Self {
        MapError::Backend {
            backend,
            message: err.to_string(),
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, MapError::Cancelled)
    }
}

impl From<serde_yaml::Error> for MapError {
    fn from(err: serde_yaml::Error) -> Self {
        MapError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for MapError {
    fn from(err: serde_json::Error) -> Self {
        MapError::Config(err.to_string())
    }
}

/// Convert a 1-based column number to its letter form (`1` → `A`, `28` → `AB`).
pub fn col_to_a1(mut col: u32) -> String {
    let mut letters = Vec::new();
    while col > 0 {
        let rem = ((col - 1) % 26) as u8;
        letters.push((b'A' + rem) as char);
        col = (col - 1) / 26;
    }
    letters.iter().rev().collect()
}
