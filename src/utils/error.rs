use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Plist error: {0}")]
    Plist(#[from] plist::Error),

    #[error("Invalid pattern: {0}")]
    Regex(#[from] regex::Error),

    #[error("Error in package {package}: {message}")]
    InvalidDirective { package: String, message: String },

    #[error("Installer for {package} failed on {bundle}: {source}")]
    InstallFailed {
        package: String,
        bundle: String,
        #[source]
        source: Box<AppError>,
    },

    #[error("Command failed: {0}")]
    CommandFailed(String),

    #[error("{command} timed out after {secs}s")]
    Timeout { command: String, secs: u64 },

    #[error("{0}")]
    Custom(String),
}

impl AppError {
    pub fn invalid_directive(package: &str, message: impl Into<String>) -> Self {
        AppError::InvalidDirective {
            package: package.to_string(),
            message: message.into(),
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;
