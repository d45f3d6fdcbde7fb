use thiserror::Error;

#[derive(Error, Debug)]
pub enum FormError {
    #[error("Request has no body")]
    NoBody,

    #[error("Failed to read request body: {message}")]
    BodyRead { message: String },

    #[error("Invalid JSON body: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Failed to write record '{key}': {message}")]
    StorageWrite { key: String, message: String },

    #[error("Failed to list records: {message}")]
    StorageList { message: String },

    #[error("Mail delivery failed: {message}")]
    Delivery { message: String },

    #[error("Shared secret header missing or mismatched")]
    AuthMismatch,

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid configuration value for {field} ('{value}'): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

impl FormError {
    pub fn storage_write(key: &str, err: impl std::fmt::Display) -> Self {
        FormError::StorageWrite {
            key: key.to_string(),
            message: err.to_string(),
        }
    }

    pub fn storage_list(err: impl std::fmt::Display) -> Self {
        FormError::StorageList {
            message: err.to_string(),
        }
    }

    pub fn delivery(err: impl std::fmt::Display) -> Self {
        FormError::Delivery {
            message: err.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, FormError>;
