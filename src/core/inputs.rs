//! Raw request inputs, grouped by source
//!
//! A [`RequestInputs`] is constructed once per incoming call from whatever
//! the host framework extracted (path segments, query pairs, headers,
//! cookies, form fields, body payload), validated once, and discarded.

use super::schema::Source;
use serde_json::Value;
use std::collections::HashMap;

/// One raw, unvalidated value
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    /// A single raw string (path segment, query value, header, cookie, form field)
    Text(String),
    /// A repeated key (e.g. `?r=a&r=b`)
    Items(Vec<String>),
    /// A piece of an already-parsed JSON body
    Json(Value),
}

/// The raw values of one incoming call, bucketed by source
#[derive(Debug, Clone, Default)]
pub struct RequestInputs {
    buckets: HashMap<Source, HashMap<String, RawValue>>,
    non_object_body: bool,
}

impl RequestInputs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a raw value, replacing any previous value for the name
    pub fn insert(&mut self, source: Source, name: impl Into<String>, value: RawValue) {
        self.buckets
            .entry(source)
            .or_default()
            .insert(name.into(), value);
    }

    /// Insert a single string value; a repeated name upgrades to `Items`
    pub fn append(&mut self, source: Source, name: impl Into<String>, value: impl Into<String>) {
        let bucket = self.buckets.entry(source).or_default();
        let name = name.into();
        let value = value.into();
        match bucket.remove(&name) {
            None => {
                bucket.insert(name, RawValue::Text(value));
            }
            Some(RawValue::Text(first)) => {
                bucket.insert(name, RawValue::Items(vec![first, value]));
            }
            Some(RawValue::Items(mut items)) => {
                items.push(value);
                bucket.insert(name, RawValue::Items(items));
            }
            Some(other @ RawValue::Json(_)) => {
                // JSON values are never mixed with string appends; keep the latest
                let _ = other;
                bucket.insert(name, RawValue::Text(value));
            }
        }
    }

    /// Spread a JSON object's top-level keys into the body bucket
    ///
    /// Non-object payloads set a marker instead; the engine reports a single
    /// type mismatch against the schema's body fields. The marker is carried
    /// separately from the buckets so object keys (including the empty
    /// string) are never confused with a malformed body shape.
    pub fn set_body_object(&mut self, payload: Value) {
        match payload {
            Value::Object(members) => {
                for (name, value) in members {
                    self.insert(Source::Body, name, RawValue::Json(value));
                }
            }
            _ => self.non_object_body = true,
        }
    }

    /// Whether a body payload was supplied but was not a JSON object
    pub fn has_non_object_body(&self) -> bool {
        self.non_object_body
    }

    // --- Fluent constructors, used mostly by tests and embedders ---

    pub fn with_path(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(Source::Path, name, RawValue::Text(value.into()));
        self
    }

    pub fn with_query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.append(Source::Query, name, value);
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(Source::Header, name, RawValue::Text(value.into()));
        self
    }

    pub fn with_cookie(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(Source::Cookie, name, RawValue::Text(value.into()));
        self
    }

    pub fn with_form(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.append(Source::Form, name, value);
        self
    }

    pub fn with_body_object(mut self, payload: Value) -> Self {
        self.set_body_object(payload);
        self
    }

    /// Look up a raw value by name in one source bucket
    pub fn get(&self, source: Source, name: &str) -> Option<&RawValue> {
        self.buckets.get(&source).and_then(|b| b.get(name))
    }

    /// Names present in one source bucket
    pub fn names(&self, source: Source) -> impl Iterator<Item = &str> {
        self.buckets
            .get(&source)
            .into_iter()
            .flat_map(|b| b.keys().map(|k| k.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.values().all(|b| b.is_empty())
    }
}
