use thiserror::Error;

#[derive(Debug, Error)]
pub enum CtlError {
    #[error("invalid arguments: {0}")]
    InvalidArgument(String),

    #[error("authentication failed: {0}")]
    Authentication(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("{operation} failed for {target}: {message}")]
    Remote {
        operation: &'static str,
        target: String,
        message: String,
    },

    #[error("home directory not found: set HOME or OMNISTRATE_CONFIG_DIR")]
    HomeNotFound,

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl CtlError {
    pub fn invalid(message: impl Into<String>) -> Self {
        CtlError::InvalidArgument(message.into())
    }

    pub fn remote(
        operation: &'static str,
        target: impl Into<String>,
        message: impl std::fmt::Display,
    ) -> Self {
        CtlError::Remote {
            operation,
            target: target.into(),
            message: message.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, CtlError>;
