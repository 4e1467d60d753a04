//! The validation engine
//!
//! Interprets a [`Schema`] against a [`RequestInputs`] and produces either a
//! typed, defaulted value map or the full list of per-field failures. The
//! engine is a pure function over its inputs: no retained state, no side
//! effects, safe to call concurrently.
//!
//! Per-field policy is fail fast: the first failing constraint stops further
//! checks for that field. Across fields, every error is collected so callers
//! can report all problems at once.

use super::error::{FieldError, FieldErrorKind};
use super::inputs::{RawValue, RequestInputs};
use super::schema::{Constraint, FieldSpec, FieldType, Schema, Source};
use crate::config::{GateConfig, UnknownFieldPolicy};
use indexmap::IndexMap;
use serde_json::{Number, Value};

/// Stateless validator parameterized by the unknown-field policy
#[derive(Debug, Clone, Default)]
pub struct Engine {
    unknown_fields: UnknownFieldPolicy,
}

impl Engine {
    /// Create an engine with the default policy (unknown fields ignored)
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(policy: UnknownFieldPolicy) -> Self {
        Self {
            unknown_fields: policy,
        }
    }

    pub fn from_config(config: &GateConfig) -> Self {
        Self::with_policy(config.unknown_fields)
    }

    /// Validate raw inputs against a schema
    ///
    /// Returns the typed values keyed by field name, in schema declaration
    /// order. Optional fields without a default that are absent from the
    /// inputs are omitted from the map; handlers test for presence.
    pub fn validate(
        &self,
        schema: &Schema,
        inputs: &RequestInputs,
    ) -> Result<IndexMap<String, Value>, Vec<FieldError>> {
        let mut values = IndexMap::new();
        let mut errors = Vec::new();

        // A non-object body payload cannot satisfy any body field; report it
        // once instead of a misleading cascade of missing-field errors.
        let body_not_object = inputs.has_non_object_body()
            && schema.fields.iter().any(|f| f.source == Source::Body);
        if body_not_object {
            errors.push(FieldError::new(
                "body",
                FieldErrorKind::TypeMismatch,
                "request body must be a JSON object",
            ));
        }

        for spec in &schema.fields {
            if body_not_object && spec.source == Source::Body {
                continue;
            }
            match inputs.get(spec.source, &spec.name) {
                None => {
                    if let Some(default) = &spec.default {
                        values.insert(spec.name.clone(), default.clone());
                    } else if spec.required {
                        errors.push(FieldError::missing(&spec.name));
                    }
                }
                Some(raw) => match self.validate_value(spec, raw, &spec.name) {
                    Ok(value) => {
                        values.insert(spec.name.clone(), value);
                    }
                    Err(field_errors) => errors.extend(field_errors),
                },
            }
        }

        if self.unknown_fields == UnknownFieldPolicy::Reject {
            errors.extend(self.unknown_field_errors(schema, inputs));
        }

        if errors.is_empty() {
            Ok(values)
        } else {
            Err(errors)
        }
    }

    /// Coerce one raw value and apply the field's constraints
    ///
    /// `label` names the field in error reports; list elements and nested
    /// object members extend it (`images[1].url`).
    fn validate_value(
        &self,
        spec: &FieldSpec,
        raw: &RawValue,
        label: &str,
    ) -> Result<Value, Vec<FieldError>> {
        let value = self.coerce(spec, raw, label)?;

        for constraint in spec.ordered_constraints() {
            if let Err(message) = check_constraint(constraint, &value) {
                return Err(vec![FieldError::new(
                    label,
                    FieldErrorKind::ConstraintViolation(constraint.kind()),
                    message,
                )]);
            }
        }

        Ok(value)
    }

    fn coerce(&self, spec: &FieldSpec, raw: &RawValue, label: &str) -> Result<Value, Vec<FieldError>> {
        match &spec.field_type {
            FieldType::Integer => match raw {
                RawValue::Text(s) => s
                    .parse::<i64>()
                    .map(Value::from)
                    .map_err(|_| mismatch(label, "an integer", raw)),
                RawValue::Json(v) => v
                    .as_i64()
                    .map(Value::from)
                    .ok_or_else(|| mismatch(label, "an integer", raw)),
                RawValue::Items(_) => Err(mismatch(label, "an integer", raw)),
            },
            FieldType::Float => {
                let parsed = match raw {
                    RawValue::Text(s) => s.parse::<f64>().ok(),
                    RawValue::Json(v) => v.as_f64(),
                    RawValue::Items(_) => None,
                };
                parsed
                    .and_then(Number::from_f64)
                    .map(Value::Number)
                    .ok_or_else(|| mismatch(label, "a number", raw))
            }
            FieldType::String => match raw {
                RawValue::Text(s) => Ok(Value::String(s.clone())),
                RawValue::Json(Value::String(s)) => Ok(Value::String(s.clone())),
                _ => Err(mismatch(label, "a string", raw)),
            },
            FieldType::Boolean => match raw {
                RawValue::Text(s) => parse_bool(s)
                    .map(Value::Bool)
                    .ok_or_else(|| mismatch(label, "a boolean", raw)),
                RawValue::Json(Value::Bool(b)) => Ok(Value::Bool(*b)),
                _ => Err(mismatch(label, "a boolean", raw)),
            },
            FieldType::Enum(members) => {
                let candidate = match raw {
                    RawValue::Text(s) => s.as_str(),
                    RawValue::Json(Value::String(s)) => s.as_str(),
                    _ => return Err(mismatch(label, "an enumeration value", raw)),
                };
                if members.contains(&candidate) {
                    Ok(Value::String(candidate.to_string()))
                } else {
                    Err(vec![FieldError::new(
                        label,
                        FieldErrorKind::EnumMismatch,
                        format!(
                            "must be one of [{}] (got '{}')",
                            members.join(", "),
                            candidate
                        ),
                    )])
                }
            }
            FieldType::List(element) => {
                let raws: Vec<RawValue> = match raw {
                    RawValue::Items(items) => {
                        items.iter().map(|s| RawValue::Text(s.clone())).collect()
                    }
                    // A single occurrence of a repeatable key is one element
                    RawValue::Text(s) => vec![RawValue::Text(s.clone())],
                    RawValue::Json(Value::Array(elements)) => {
                        elements.iter().map(|v| RawValue::Json(v.clone())).collect()
                    }
                    RawValue::Json(_) => return Err(mismatch(label, "a list", raw)),
                };

                let mut out = Vec::with_capacity(raws.len());
                let mut errors = Vec::new();
                for (index, element_raw) in raws.iter().enumerate() {
                    let element_label = format!("{}[{}]", label, index);
                    match self.validate_value(element, element_raw, &element_label) {
                        Ok(value) => out.push(value),
                        Err(element_errors) => errors.extend(element_errors),
                    }
                }
                if errors.is_empty() {
                    Ok(Value::Array(out))
                } else {
                    Err(errors)
                }
            }
            FieldType::Object(nested) => match raw {
                RawValue::Json(payload @ Value::Object(_)) => {
                    let mut nested_inputs = RequestInputs::new();
                    nested_inputs.set_body_object(payload.clone());
                    match self.validate(nested, &nested_inputs) {
                        Ok(members) => Ok(Value::Object(members.into_iter().collect())),
                        Err(nested_errors) => Err(nested_errors
                            .into_iter()
                            .map(|mut e| {
                                e.field = format!("{}.{}", label, e.field);
                                e
                            })
                            .collect()),
                    }
                }
                _ => Err(mismatch(label, "an object", raw)),
            },
        }
    }

    /// Report undeclared input names under the reject policy
    ///
    /// Only query, form, and body buckets are enforced: header and cookie
    /// buckets always carry undeclared entries from the wire.
    fn unknown_field_errors(&self, schema: &Schema, inputs: &RequestInputs) -> Vec<FieldError> {
        let mut errors = Vec::new();
        for source in [Source::Query, Source::Form, Source::Body] {
            for name in inputs.names(source) {
                if schema.declares(name, source) {
                    continue;
                }
                errors.push(FieldError::new(
                    name,
                    FieldErrorKind::UnknownField,
                    format!("unexpected {} field '{}'", source.as_str(), name),
                ));
            }
        }
        errors.sort_by(|a, b| a.field.cmp(&b.field));
        errors
    }
}

fn parse_bool(s: &str) -> Option<bool> {
    match s {
        "true" | "1" | "on" | "yes" => Some(true),
        "false" | "0" | "off" | "no" => Some(false),
        _ => None,
    }
}

fn mismatch(label: &str, expected: &str, raw: &RawValue) -> Vec<FieldError> {
    let got = match raw {
        RawValue::Text(s) => format!("'{}'", s),
        RawValue::Items(_) => "a repeated value".to_string(),
        RawValue::Json(v) => v.to_string(),
    };
    vec![FieldError::new(
        label,
        FieldErrorKind::TypeMismatch,
        format!("expected {}, got {}", expected, got),
    )]
}

fn check_constraint(constraint: &Constraint, value: &Value) -> Result<(), String> {
    match constraint {
        Constraint::MinLength(min) => {
            if let Some(s) = value.as_str() {
                if s.len() < *min {
                    return Err(format!(
                        "must have at least {} characters (got {})",
                        min,
                        s.len()
                    ));
                }
            }
            Ok(())
        }
        Constraint::MaxLength(max) => {
            if let Some(s) = value.as_str() {
                if s.len() > *max {
                    return Err(format!(
                        "must have at most {} characters (got {})",
                        max,
                        s.len()
                    ));
                }
            }
            Ok(())
        }
        Constraint::Gt(bound) => {
            if let Some(n) = value.as_f64() {
                if n <= *bound {
                    return Err(format!("must be greater than {} (got {})", bound, n));
                }
            }
            Ok(())
        }
        Constraint::Ge(bound) => {
            if let Some(n) = value.as_f64() {
                if n < *bound {
                    return Err(format!(
                        "must be greater than or equal to {} (got {})",
                        bound, n
                    ));
                }
            }
            Ok(())
        }
        Constraint::Lt(bound) => {
            if let Some(n) = value.as_f64() {
                if n >= *bound {
                    return Err(format!("must be less than {} (got {})", bound, n));
                }
            }
            Ok(())
        }
        Constraint::Le(bound) => {
            if let Some(n) = value.as_f64() {
                if n > *bound {
                    return Err(format!(
                        "must be less than or equal to {} (got {})",
                        bound, n
                    ));
                }
            }
            Ok(())
        }
        Constraint::Pattern(regex) => {
            if let Some(s) = value.as_str() {
                if !regex.is_match(s) {
                    return Err(format!(
                        "must match pattern '{}' (got '{}')",
                        regex.as_str(),
                        s
                    ));
                }
            }
            Ok(())
        }
    }
}
