use thiserror::Error;

/// Exit codes for the CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// Every probe resolved to a usable verdict
    Success = 0,
    /// At least one probe ended with the `Failed` verdict
    ProbeFailure = 1,
    /// Invalid input (unknown service id, bad argument)
    InvalidInput = 2,
    /// Could not construct the HTTP client or write the report
    SetupFailure = 3,
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> i32 {
        code as i32
    }
}

/// Main error type for the application
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl AppError {
    pub fn exit_code(&self) -> ExitCode {
        match self {
            AppError::InvalidInput(_) => ExitCode::InvalidInput,
            AppError::Io(_) | AppError::Http(_) | AppError::Json(_) => ExitCode::SetupFailure,
        }
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
