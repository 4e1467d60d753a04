//! Core module containing the validation engine and its data model

pub mod engine;
pub mod error;
pub mod filters;
pub mod inputs;
pub mod schema;

pub use engine::Engine;
pub use error::{FieldError, FieldErrorKind, GateError, GateResult};
pub use inputs::{RawValue, RequestInputs};
pub use schema::{Constraint, FieldSpec, FieldType, Schema, Source};
