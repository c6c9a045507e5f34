use thiserror::Error;

pub type Result<T> = std::result::Result<T, FsNavError>;

/// Failures a navigation action can run into.
///
/// Every variant is caught at the controller boundary: the navigation state
/// is left untouched and the error is handed back to the caller to log.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NavError {
    #[error("network error: {0}")]
    Network(String),
    #[error("authentication error: {0}")]
    Auth(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("unexpected response: {0}")]
    Protocol(String),
    #[error("page size must be greater than zero")]
    InvalidPageSize,
}

impl NavError {
    /// Classify a non-success HTTP status returned by the backend.
    pub fn from_status(status: u16, context: &str) -> Self {
        match status {
            401 | 403 => NavError::Auth(format!("{} rejected with HTTP {}", context, status)),
            404 => NavError::NotFound(context.to_string()),
            _ => NavError::Network(format!("{} failed with HTTP {}", context, status)),
        }
    }
}

impl From<reqwest::Error> for NavError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_decode() {
            return NavError::Protocol(error.to_string());
        }
        match error.status() {
            Some(status) => NavError::from_status(status.as_u16(), "request"),
            None => NavError::Network(error.to_string()),
        }
    }
}

#[derive(Debug, Error)]
pub enum FsNavError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Navigation error: {0}")]
    Navigation(#[from] NavError),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Error: {0}")]
    Generic(String),
}

impl From<String> for FsNavError {
    fn from(error: String) -> Self {
        FsNavError::Generic(error)
    }
}

impl From<&str> for FsNavError {
    fn from(error: &str) -> Self {
        FsNavError::Generic(error.to_string())
    }
}
