//! Reusable post-validation filters
//!
//! These filters transform already-validated values before the handler
//! builds its response. Values whose shape does not match pass through
//! unchanged.

use anyhow::Result;
use serde_json::Value;

/// Filter: drop duplicate strings from an array, keeping first-occurrence order
pub fn dedupe() -> impl Fn(&str, Value) -> Result<Value> + Send + Sync + Clone {
    |_: &str, value: Value| {
        if let Value::Array(elements) = value {
            let mut seen = Vec::new();
            let mut out = Vec::with_capacity(elements.len());
            for element in elements {
                match element.as_str() {
                    Some(s) if seen.contains(&s.to_string()) => {}
                    Some(s) => {
                        seen.push(s.to_string());
                        out.push(element);
                    }
                    None => out.push(element),
                }
            }
            Ok(Value::Array(out))
        } else {
            Ok(value)
        }
    }
}

/// Filter: rewrite a leading `http://` scheme to `https://`
pub fn force_https() -> impl Fn(&str, Value) -> Result<Value> + Send + Sync + Clone {
    |_: &str, value: Value| {
        if let Some(s) = value.as_str() {
            if let Some(rest) = s.strip_prefix("http://") {
                return Ok(Value::String(format!("https://{}", rest)));
            }
        }
        Ok(value)
    }
}
