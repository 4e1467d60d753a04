//! Building request inputs from incoming HTTP requests
//!
//! Adapts what axum hands us (path parameter map, raw query string, header
//! map, body bytes) into the engine's source buckets. Extraction failures
//! are request errors (400), not validation errors: they mean the request
//! could not be read at all.

use axum::body::Bytes;
use axum::http::HeaderMap;
use axum::http::header::COOKIE;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;

use crate::core::error::GateError;
use crate::core::inputs::{RawValue, RequestInputs};
use crate::core::schema::Source;

/// Errors that can occur while assembling request inputs
#[derive(Debug, Clone)]
pub enum ExtractError {
    InvalidQuery(String),
    InvalidJson(String),
    InvalidForm(String),
}

impl fmt::Display for ExtractError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtractError::InvalidQuery(msg) => write!(f, "Invalid query string: {}", msg),
            ExtractError::InvalidJson(msg) => write!(f, "Invalid JSON body: {}", msg),
            ExtractError::InvalidForm(msg) => write!(f, "Invalid form body: {}", msg),
        }
    }
}

impl std::error::Error for ExtractError {}

impl From<ExtractError> for GateError {
    fn from(err: ExtractError) -> Self {
        GateError::BadRequest(err.to_string())
    }
}

/// Assemble the path, query, header, and cookie buckets
///
/// Repeated query keys collect into a list value. The `Cookie` header is
/// split into individual cookie-bucket entries instead of being stored as
/// a header. Header values that are not valid UTF-8 are skipped.
pub fn base_inputs(
    params: &HashMap<String, String>,
    query: Option<&str>,
    headers: &HeaderMap,
) -> Result<RequestInputs, ExtractError> {
    let mut inputs = RequestInputs::new();

    for (name, value) in params {
        inputs.insert(Source::Path, name.clone(), RawValue::Text(value.clone()));
    }

    if let Some(query) = query {
        let pairs: Vec<(String, String)> = serde_urlencoded::from_str(query)
            .map_err(|e| ExtractError::InvalidQuery(e.to_string()))?;
        for (name, value) in pairs {
            inputs.append(Source::Query, name, value);
        }
    }

    for (name, value) in headers {
        if name == COOKIE {
            continue;
        }
        if let Ok(value) = value.to_str() {
            inputs.insert(
                Source::Header,
                name.as_str().to_string(),
                RawValue::Text(value.to_string()),
            );
        }
    }

    for cookie_header in headers.get_all(COOKIE) {
        let Ok(raw) = cookie_header.to_str() else {
            continue;
        };
        for pair in raw.split(';') {
            if let Some((name, value)) = pair.trim().split_once('=') {
                inputs.insert(
                    Source::Cookie,
                    name.trim().to_string(),
                    RawValue::Text(value.trim().to_string()),
                );
            }
        }
    }

    tracing::debug!(path_params = params.len(), "request inputs assembled");
    Ok(inputs)
}

/// Parse a JSON body into the body bucket
///
/// An empty body sets nothing; required body fields then surface as
/// missing-field validation errors rather than a parse error.
pub fn with_json_body(inputs: &mut RequestInputs, body: &Bytes) -> Result<(), ExtractError> {
    if body.is_empty() {
        return Ok(());
    }
    let payload: Value =
        serde_json::from_slice(body).map_err(|e| ExtractError::InvalidJson(e.to_string()))?;
    inputs.set_body_object(payload);
    Ok(())
}

/// Parse a urlencoded form body into the form bucket
pub fn with_form_body(inputs: &mut RequestInputs, body: &Bytes) -> Result<(), ExtractError> {
    let pairs: Vec<(String, String)> = serde_urlencoded::from_bytes(body)
        .map_err(|e| ExtractError::InvalidForm(e.to_string()))?;
    for (name, value) in pairs {
        inputs.append(Source::Form, name, value);
    }
    Ok(())
}
