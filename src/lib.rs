//! # Fieldgate
//!
//! A declarative request-validation and dispatch framework for building HTTP
//! APIs in Rust.
//!
//! ## Features
//!
//! - **Schema-Driven Validation**: Describe each input field as data (type,
//!   source, constraints) instead of scattering checks through handlers
//! - **All Request Sources**: Path segments, query strings, headers, cookies,
//!   form fields and JSON bodies share one validation pipeline
//! - **Typed Errors**: Structured, field-attributed failures with stable
//!   error codes and HTTP status mapping
//! - **Fail Fast Per Field**: The first failing constraint stops checking a
//!   field, while errors are still collected across all fields
//! - **Nested Payloads**: Lists and nested objects validated element by
//!   element with the same rules
//! - **Defaulting**: Optional fields substitute declared defaults before the
//!   handler ever sees them
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use fieldgate::prelude::*;
//!
//! let schema = Schema::new("create_item")
//!     .field(FieldSpec::new("name", Source::Body, FieldType::String).max_length(50))
//!     .field(FieldSpec::new("price", Source::Body, FieldType::Float).gt(0.0));
//!
//! let inputs = RequestInputs::new()
//!     .with_body_object(json!({ "name": "Hammer", "price": 9.99 }));
//!
//! let engine = Engine::new();
//! match engine.validate(&schema, &inputs) {
//!     Ok(values) => println!("validated: {:?}", values),
//!     Err(errors) => eprintln!("rejected: {:?}", errors),
//! }
//! ```

pub mod catalog;
pub mod config;
pub mod core;
pub mod server;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core Types ===
    pub use crate::core::{
        engine::Engine,
        error::{ConfigError, FieldError, FieldErrorKind, GateError, GateResult},
        filters,
        inputs::{RawValue, RequestInputs},
        schema::{Constraint, FieldSpec, FieldType, Schema, Source},
    };

    // === Catalog ===
    pub use crate::catalog::ModelName;

    // === Config ===
    pub use crate::config::{GateConfig, UnknownFieldPolicy};

    // === Server ===
    pub use crate::server::{AppState, ServerBuilder, build_routes};

    // === External dependencies ===
    pub use anyhow::Result;
    pub use serde::{Deserialize, Serialize};
    pub use serde_json::{Value, json};

    // === Axum ===
    pub use axum::{
        Router,
        extract::{Path, RawQuery, State},
        http::HeaderMap,
        routing::{get, post, put},
    };
}
