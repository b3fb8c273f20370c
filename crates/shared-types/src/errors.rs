//! Common error types used across the annotation crates
//! Provides consistent error handling and reporting

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{Arity, DrawingType};

/// Base error type for drawing operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DrawingError {
    // Data model errors
    #[error("Unknown drawing type: {literal}")]
    UnknownType { literal: String },

    #[error("{drawing_type} expects {expected:?} points but has {actual}")]
    ArityMismatch {
        drawing_type: DrawingType,
        expected: Arity,
        actual: usize,
    },

    #[error("Drawing {id} has a non-finite price")]
    NonFinitePrice { id: String },

    #[error("Drawing not found: {id}")]
    NotFound { id: String },

    // Properties editor errors
    #[error("Unknown property: {key}")]
    UnknownField { key: String },

    #[error("Invalid value for {key}: {message}")]
    InvalidFieldValue { key: String, message: String },

    #[error("Property {key} does not apply to {drawing_type}")]
    FieldNotApplicable {
        key: String,
        drawing_type: DrawingType,
    },

    // Serialization errors
    #[error("Serialization error: {message}")]
    Serialization { message: String },

    // Host interop errors
    #[error("JavaScript interop error: {message}")]
    JsInterop { message: String },
}

/// Result type alias for drawing operations
pub type DrawingResult<T> = Result<T, DrawingError>;

impl From<serde_json::Error> for DrawingError {
    fn from(err: serde_json::Error) -> Self {
        DrawingError::Serialization {
            message: err.to_string(),
        }
    }
}

/// Error response structure for JavaScript interop
#[derive(Serialize, Deserialize, Debug)]
pub struct ErrorResponse {
    pub success: bool,
    pub message: String,
    pub context: Option<ErrorContext>,
}

/// Additional context for error reporting
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ErrorContext {
    pub component: String,
    pub operation: String,
}

impl ErrorResponse {
    /// Create a new error response
    pub fn new(error: &DrawingError) -> Self {
        Self {
            success: false,
            message: error.to_string(),
            context: None,
        }
    }

    /// Add context to the error response
    pub fn with_context(mut self, component: &str, operation: &str) -> Self {
        self.context = Some(ErrorContext {
            component: component.to_string(),
            operation: operation.to_string(),
        });
        self
    }

    /// Convert to JSON string for JavaScript
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| {
            r#"{"success":false,"message":"Failed to serialize error","context":null}"#
                .to_string()
        })
    }
}
