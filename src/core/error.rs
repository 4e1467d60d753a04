//! Typed error handling for the fieldgate framework
//!
//! This module provides the error hierarchy surfaced to callers. Validation
//! failures are structured, field-attributed values rather than thrown
//! exceptions; the enclosing HTTP collaborator decides how to render them.
//!
//! # Error Categories
//!
//! - [`FieldError`]: one validation failure attributed to one field
//! - [`GateError`]: the top-level error with HTTP status mapping
//! - [`ConfigError`]: configuration parsing errors

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use serde::ser::SerializeStruct;
use std::fmt;

/// The kind of a single field validation failure
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldErrorKind {
    /// Required field with no matching input and no default
    MissingRequired,
    /// Raw value could not be converted to the field's semantic type
    TypeMismatch,
    /// A constraint failed; carries the constraint's stable identifier
    ConstraintViolation(&'static str),
    /// Value is not a member of the field's enumeration
    EnumMismatch,
    /// Input name not declared by the schema (reject policy only)
    UnknownField,
}

impl FieldErrorKind {
    pub fn code(&self) -> &'static str {
        match self {
            FieldErrorKind::MissingRequired => "MISSING_REQUIRED",
            FieldErrorKind::TypeMismatch => "TYPE_MISMATCH",
            FieldErrorKind::ConstraintViolation(_) => "CONSTRAINT_VIOLATION",
            FieldErrorKind::EnumMismatch => "ENUM_MISMATCH",
            FieldErrorKind::UnknownField => "UNKNOWN_FIELD",
        }
    }
}

/// A single validation failure with the field it belongs to
///
/// Nested fields use dotted/indexed names (`images[1].url`).
#[derive(Debug, Clone, PartialEq)]
pub struct FieldError {
    pub field: String,
    pub kind: FieldErrorKind,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, kind: FieldErrorKind, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            kind,
            message: message.into(),
        }
    }

    pub fn missing(field: impl Into<String>) -> Self {
        let field = field.into();
        let message = format!("field '{}' is required", field);
        Self::new(field, FieldErrorKind::MissingRequired, message)
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl Serialize for FieldError {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let constraint = match &self.kind {
            FieldErrorKind::ConstraintViolation(kind) => Some(*kind),
            _ => None,
        };
        let len = if constraint.is_some() { 4 } else { 3 };
        let mut state = serializer.serialize_struct("FieldError", len)?;
        state.serialize_field("field", &self.field)?;
        state.serialize_field("code", self.kind.code())?;
        if let Some(constraint) = constraint {
            state.serialize_field("constraint", constraint)?;
        }
        state.serialize_field("message", &self.message)?;
        state.end()
    }
}

/// The main error type for the fieldgate framework
#[derive(Debug)]
pub enum GateError {
    /// One or more fields failed validation
    Validation(Vec<FieldError>),

    /// A handler-level business rule signalled not-found
    NotFound { resource: String, id: i64 },

    /// The request could not be parsed into inputs at all
    BadRequest(String),

    /// Configuration errors
    Config(ConfigError),

    /// Internal framework errors (should not happen in normal operation)
    Internal(String),
}

impl fmt::Display for GateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GateError::Validation(errors) => {
                let msgs: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
                write!(f, "Validation errors: {}", msgs.join(", "))
            }
            GateError::NotFound { resource, id } => {
                write!(f, "{} with id '{}' not found", resource, id)
            }
            GateError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            GateError::Config(e) => write!(f, "{}", e),
            GateError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for GateError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GateError::Config(e) => Some(e),
            _ => None,
        }
    }
}

/// Error response structure for HTTP responses
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl GateError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            GateError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            GateError::NotFound { .. } => StatusCode::NOT_FOUND,
            GateError::BadRequest(_) => StatusCode::BAD_REQUEST,
            GateError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            GateError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            GateError::Validation(_) => "VALIDATION_ERROR",
            GateError::NotFound { .. } => "NOT_FOUND",
            GateError::BadRequest(_) => "BAD_REQUEST",
            GateError::Config(_) => "CONFIG_ERROR",
            GateError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Convert to an error response
    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            code: self.error_code().to_string(),
            message: self.to_string(),
            details: self.details(),
        }
    }

    /// Get additional details for the error
    fn details(&self) -> Option<serde_json::Value> {
        match self {
            GateError::Validation(errors) => Some(serde_json::json!(errors)),
            GateError::NotFound { resource, id } => Some(serde_json::json!({
                "resource": resource,
                "id": id,
            })),
            _ => None,
        }
    }
}

impl IntoResponse for GateError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(self.to_response());
        (status, body).into_response()
    }
}

impl From<Vec<FieldError>> for GateError {
    fn from(errors: Vec<FieldError>) -> Self {
        GateError::Validation(errors)
    }
}

// =============================================================================
// Config Errors
// =============================================================================

/// Errors related to configuration
#[derive(Debug)]
pub enum ConfigError {
    /// Failed to parse configuration content
    ParseError {
        file: Option<String>,
        message: String,
    },

    /// IO error while reading configuration
    IoError { message: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ParseError { file, message } => {
                if let Some(file) = file {
                    write!(f, "Failed to parse config file '{}': {}", file, message)
                } else {
                    write!(f, "Failed to parse config: {}", message)
                }
            }
            ConfigError::IoError { message } => {
                write!(f, "IO error: {}", message)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<ConfigError> for GateError {
    fn from(err: ConfigError) -> Self {
        GateError::Config(err)
    }
}

impl From<serde_yaml::Error> for ConfigError {
    fn from(err: serde_yaml::Error) -> Self {
        ConfigError::ParseError {
            file: None,
            message: err.to_string(),
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        ConfigError::IoError {
            message: err.to_string(),
        }
    }
}

// =============================================================================
// Result type alias
// =============================================================================

/// A specialized Result type for fieldgate operations
pub type GateResult<T> = Result<T, GateError>;

// =============================================================================
// Tests
// =============================================================================
