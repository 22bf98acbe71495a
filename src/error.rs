use serde::Serialize;
use std::fmt;

/// Which stage of an attempt failed. Every kind is terminal for the current
/// attempt; nothing is retried automatically.
#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NoFileSelected,
    HealthCheckFailed,
    RequestFailed,
    InvalidResponseShape,
    Io,
    Internal,
}

#[derive(Debug, Serialize, Clone)]
pub struct AppError {
    pub kind: ErrorKind,
    pub message: String,
}

impl AppError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        AppError {
            kind,
            message: message.into(),
        }
    }

    pub fn no_file_selected() -> Self {
        AppError::new(ErrorKind::NoFileSelected, "Please select a file")
    }

    pub fn request_failed(message: impl Into<String>) -> Self {
        AppError::new(ErrorKind::RequestFailed, message)
    }

    pub fn invalid_response() -> Self {
        AppError::new(ErrorKind::InvalidResponseShape, "Invalid response format")
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for AppError {}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError {
            kind: ErrorKind::Io,
            message: err.to_string(),
        }
    }
}

impl From<image::ImageError> for AppError {
    fn from(err: image::ImageError) -> Self {
        AppError {
            kind: ErrorKind::Io,
            message: err.to_string(),
        }
    }
}

// Transport errors only ever come out of the predict/health/latest calls.
impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError {
            kind: ErrorKind::RequestFailed,
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError {
            kind: ErrorKind::Internal,
            message: err.to_string(),
        }
    }
}

impl From<String> for AppError {
    fn from(msg: String) -> Self {
        AppError {
            kind: ErrorKind::Internal,
            message: msg,
        }
    }
}

impl From<&str> for AppError {
    fn from(msg: &str) -> Self {
        AppError {
            kind: ErrorKind::Internal,
            message: msg.to_string(),
        }
    }
}
