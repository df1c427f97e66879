//! Result and error types for the core library

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Core library error type
#[derive(Error, Debug)]
pub enum Error {
    #[error("Validation error: {0}")]
    Validation(String),

    /// The receipt parsed fine but nothing billable could be found in it
    #[error("No monetary values detected in receipt")]
    NoMonetaryValues,

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Store error: {0}")]
    Store(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a store error
    pub fn store(msg: impl Into<String>) -> Self {
        Self::Store(msg.into())
    }

    /// HTTP-equivalent status code for surfacing this error to a caller
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Validation(_) | Self::Json(_) => 400,
            Self::Unauthorized => 401,
            Self::NoMonetaryValues => 422,
            Self::Store(_) | Self::Io(_) => 500,
        }
    }
}

/// Core library result type
pub type Result<T> = std::result::Result<T, Error>;

/// Operation result with optional context (for JSON output)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperationResult<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<HashMap<String, serde_json::Value>>,
}

impl<T> OperationResult<T> {
    /// Create a successful result
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            status: None,
            context: None,
        }
    }

    /// Create a failed result
    pub fn fail(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
            status: None,
            context: None,
        }
    }

    /// Attach a context value
    pub fn with_context(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.context
            .get_or_insert_with(HashMap::new)
            .insert(key.into(), value);
        self
    }
}

impl<T> From<Result<T>> for OperationResult<T> {
    fn from(result: Result<T>) -> Self {
        match result {
            Ok(data) => Self::ok(data),
            Err(e) => {
                let status = e.status_code();
                let mut failed = Self::fail(e.to_string());
                failed.status = Some(status);
                failed
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operation_result_ok() {
        let result: OperationResult<i32> = OperationResult::ok(42);
        assert!(result.success);
        assert_eq!(result.data, Some(42));
        assert!(result.error.is_none());
        assert!(result.status.is_none());
    }

    #[test]
    fn test_from_result_carries_status() {
        let err: Result<i32> = Err(Error::NoMonetaryValues);
        let result: OperationResult<i32> = err.into();
        assert!(!result.success);
        assert_eq!(result.status, Some(422));
        assert_eq!(
            result.error.as_deref(),
            Some("No monetary values detected in receipt")
        );

        let err: Result<i32> = Err(Error::validation("bad input"));
        let result: OperationResult<i32> = err.into();
        assert_eq!(result.status, Some(400));
        assert!(result.error.unwrap().contains("Validation error"));
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(Error::Unauthorized.status_code(), 401);
        assert_eq!(Error::store("disk full").status_code(), 500);
    }

    #[test]
    fn test_with_context() {
        let result = OperationResult::ok(1).with_context("preview", serde_json::json!(true));
        let context = result.context.unwrap();
        assert_eq!(context.get("preview"), Some(&serde_json::json!(true)));
    }
}
