//! HTTP handlers for the demo API
//!
//! Every handler follows the same shape: assemble [`RequestInputs`] from the
//! request, validate against a catalog schema, then construct the response
//! mapping from the typed values. No handler owns state beyond the engine;
//! the in-memory item list stands in for a database.

use axum::Json;
use axum::body::Bytes;
use axum::extract::{Path, RawQuery, State};
use axum::http::{HeaderMap, StatusCode};
use indexmap::IndexMap;
use serde_json::{Map, Value, json};
use std::collections::HashMap;

use super::extract;
use crate::catalog::{self, ModelName};
use crate::core::engine::Engine;
use crate::core::error::GateError;
use crate::core::filters;
use crate::core::inputs::RequestInputs;
use crate::core::schema::Schema;

/// Shared state for all handlers
#[derive(Debug, Clone, Default)]
pub struct AppState {
    pub engine: Engine,
}

/// Identifier the demo treats as never present
pub const RESERVED_ITEM_ID: i64 = 999;

fn fake_items_db() -> Vec<Value> {
    vec![
        json!({ "item_name": "Foo" }),
        json!({ "item_name": "Bar" }),
        json!({ "item_name": "Baz" }),
    ]
}

fn run_validation(
    engine: &Engine,
    schema: &Schema,
    inputs: &RequestInputs,
) -> Result<IndexMap<String, Value>, GateError> {
    engine.validate(schema, inputs).map_err(|errors| {
        tracing::debug!(
            schema = %schema.name,
            errors = errors.len(),
            "validation rejected request"
        );
        GateError::Validation(errors)
    })
}

fn required_i64(values: &IndexMap<String, Value>, name: &str) -> Result<i64, GateError> {
    values.get(name).and_then(Value::as_i64).ok_or_else(|| {
        GateError::Internal(format!("validated field '{}' missing or not an integer", name))
    })
}

fn apply_filter<F>(filter: &F, name: &str, value: Value) -> Result<Value, GateError>
where
    F: Fn(&str, Value) -> anyhow::Result<Value>,
{
    filter(name, value).map_err(|e| GateError::Internal(e.to_string()))
}

fn to_object(values: IndexMap<String, Value>) -> Value {
    Value::Object(values.into_iter().collect())
}

/// `GET /`
pub async fn read_root() -> Json<Value> {
    Json(json!({ "Hello": "World" }))
}

/// `GET /items/{item_id}`
///
/// Echoes the item id, a page of the fake item list, whichever of q/p/r
/// were supplied, and the long description unless `short` was requested.
pub async fn read_item(
    State(state): State<AppState>,
    Path(params): Path<HashMap<String, String>>,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
) -> Result<Json<Value>, GateError> {
    let inputs = extract::base_inputs(&params, query.as_deref(), &headers)?;
    let values = run_validation(&state.engine, catalog::read_item(), &inputs)?;

    let item_id = required_i64(&values, "item_id")?;
    if item_id == RESERVED_ITEM_ID {
        return Err(GateError::NotFound {
            resource: "item".to_string(),
            id: item_id,
        });
    }

    let skip = required_i64(&values, "skip")?.max(0) as usize;
    let limit = required_i64(&values, "limit")?.max(0) as usize;
    let short = values
        .get("short")
        .and_then(Value::as_bool)
        .unwrap_or(false);

    let db = fake_items_db();
    let start = skip.min(db.len());
    let end = (start + limit).min(db.len());

    let mut item = Map::new();
    item.insert("item_id".to_string(), json!(item_id));
    item.insert("fakeitemdb".to_string(), Value::Array(db[start..end].to_vec()));
    for name in ["q", "p", "r"] {
        if let Some(value) = values.get(name) {
            item.insert(name.to_string(), value.clone());
        }
    }
    if !short {
        item.insert(
            "description".to_string(),
            json!("This is an amazing item that has a long description"),
        );
    }

    Ok(Json(Value::Object(item)))
}

/// `POST /items/`
pub async fn create_item(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<Value>, GateError> {
    let mut inputs = RequestInputs::new();
    extract::with_json_body(&mut inputs, &body)?;
    let mut values = run_validation(&state.engine, catalog::item_body(), &inputs)?;

    // Tags carry set semantics: duplicates are dropped, order preserved
    if let Some(tags) = values.get("tags").cloned() {
        let deduped = apply_filter(&filters::dedupe(), "tags", tags)?;
        values.insert("tags".to_string(), deduped);
    }

    Ok(Json(to_object(values)))
}

/// `PUT /items/{item_id}`
pub async fn update_item(
    State(state): State<AppState>,
    Path(params): Path<HashMap<String, String>>,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<Value>, GateError> {
    let mut inputs = extract::base_inputs(&params, query.as_deref(), &headers)?;
    extract::with_json_body(&mut inputs, &body)?;
    let values = run_validation(&state.engine, catalog::update_item(), &inputs)?;

    let mut result = Map::new();
    result.insert("item_id".to_string(), json!(required_i64(&values, "item_id")?));
    for field in &catalog::item_body().fields {
        if let Some(value) = values.get(&field.name) {
            result.insert(field.name.clone(), value.clone());
        }
    }
    // An empty q (e.g. `?q=`) is treated as absent
    if let Some(q) = values.get("q").and_then(Value::as_str).filter(|s| !s.is_empty()) {
        result.insert("q".to_string(), json!(q));
    }

    Ok(Json(Value::Object(result)))
}

/// `PUT /items/{item_id}/images`
///
/// Each validated image has its url scheme upgraded from `http://` to
/// `https://`; all other fields pass through unchanged.
pub async fn update_item_images(
    State(state): State<AppState>,
    Path(params): Path<HashMap<String, String>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<Value>, GateError> {
    let mut inputs = extract::base_inputs(&params, None, &headers)?;
    extract::with_json_body(&mut inputs, &body)?;
    let values = run_validation(&state.engine, catalog::update_item_images(), &inputs)?;

    let item_id = required_i64(&values, "item_id")?;
    let force = filters::force_https();
    let mut images = values.get("images").cloned().unwrap_or_else(|| json!([]));
    if let Value::Array(elements) = &mut images {
        for element in elements {
            if let Some(url) = element.get("url").cloned() {
                element["url"] = apply_filter(&force, "url", url)?;
            }
        }
    }

    Ok(Json(json!({ "item_id": item_id, "images": images })))
}

/// `GET /models/{model_name}`
pub async fn get_model(
    State(state): State<AppState>,
    Path(params): Path<HashMap<String, String>>,
    headers: HeaderMap,
) -> Result<Json<Value>, GateError> {
    let inputs = extract::base_inputs(&params, None, &headers)?;
    let values = run_validation(&state.engine, catalog::get_model(), &inputs)?;

    let raw = values
        .get("model_name")
        .and_then(Value::as_str)
        .ok_or_else(|| GateError::Internal("model_name missing after validation".to_string()))?;
    let model = ModelName::from_value(raw)
        .ok_or_else(|| GateError::Internal(format!("unknown model '{}' after validation", raw)))?;

    let message = match model {
        ModelName::Alexnet => "Deep Learning FTW!",
        ModelName::Lenet => "LeCNN all the images",
        ModelName::Resnet => "Have some residuals",
    };

    Ok(Json(json!({ "model_name": raw, "message": message })))
}

/// `POST /offers/`
pub async fn create_offer(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<Value>, GateError> {
    let mut inputs = RequestInputs::new();
    extract::with_json_body(&mut inputs, &body)?;
    let values = run_validation(&state.engine, catalog::offer_body(), &inputs)?;
    Ok(Json(to_object(values)))
}

/// `POST /users/`
///
/// The password is validated like any other field but never echoed back.
pub async fn create_user(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<(StatusCode, Json<Value>), GateError> {
    let mut inputs = RequestInputs::new();
    extract::with_json_body(&mut inputs, &body)?;
    let values = run_validation(&state.engine, catalog::user_body(), &inputs)?;

    let mut result = Map::new();
    for name in ["username", "full_name"] {
        if let Some(value) = values.get(name) {
            result.insert(name.to_string(), value.clone());
        }
    }

    Ok((StatusCode::CREATED, Json(Value::Object(result))))
}

/// `POST /login/`
pub async fn login(State(state): State<AppState>, body: Bytes) -> Result<Json<Value>, GateError> {
    let mut inputs = RequestInputs::new();
    extract::with_form_body(&mut inputs, &body)?;
    let values = run_validation(&state.engine, catalog::login_form(), &inputs)?;

    let username = values
        .get("username")
        .cloned()
        .ok_or_else(|| GateError::Internal("username missing after validation".to_string()))?;
    Ok(Json(json!({ "username": username })))
}

/// `GET /client-meta/`
pub async fn client_meta(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Value>, GateError> {
    let inputs = extract::base_inputs(&HashMap::new(), None, &headers)?;
    let values = run_validation(&state.engine, catalog::client_meta(), &inputs)?;

    let mut result = Map::new();
    if let Some(agent) = values.get("user-agent") {
        result.insert("user_agent".to_string(), agent.clone());
    }
    if let Some(ads_id) = values.get("ads_id") {
        result.insert("ads_id".to_string(), ads_id.clone());
    }

    Ok(Json(Value::Object(result)))
}

#[cfg(test)]
mod tests {
    use super::*;

    // === root ===

    #[test]
    fn test_read_root_greeting() {
        let Json(body) = tokio_test::block_on(read_root());
        assert_eq!(body, json!({ "Hello": "World" }));
    }

    // === fake db paging ===

    #[test]
    fn test_fake_items_db_contents() {
        let db = fake_items_db();
        assert_eq!(db.len(), 3);
        assert_eq!(db[0]["item_name"], "Foo");
        assert_eq!(db[2]["item_name"], "Baz");
    }

    // === reserved id ===

    #[test]
    fn test_reserved_item_id_is_999() {
        assert_eq!(RESERVED_ITEM_ID, 999);
    }

    // === direct handler invocation ===

    fn item_path(id: &str) -> Path<HashMap<String, String>> {
        let mut params = HashMap::new();
        params.insert("item_id".to_string(), id.to_string());
        Path(params)
    }

    #[test]
    fn test_read_item_reserved_id_not_found() {
        let result = tokio_test::block_on(read_item(
            State(AppState::default()),
            item_path("999"),
            RawQuery(Some("p=abc".to_string())),
            HeaderMap::new(),
        ));
        assert!(matches!(
            result,
            Err(GateError::NotFound { id: 999, .. })
        ));
    }

    #[test]
    fn test_read_item_pages_fake_db() {
        let result = tokio_test::block_on(read_item(
            State(AppState::default()),
            item_path("1"),
            RawQuery(Some("p=abc&skip=1&limit=1".to_string())),
            HeaderMap::new(),
        ));
        let Json(body) = result.expect("should succeed");
        assert_eq!(body["fakeitemdb"], json!([{ "item_name": "Bar" }]));
    }

    #[test]
    fn test_read_item_short_omits_description() {
        let result = tokio_test::block_on(read_item(
            State(AppState::default()),
            item_path("1"),
            RawQuery(Some("p=abc&short=true".to_string())),
            HeaderMap::new(),
        ));
        let Json(body) = result.expect("should succeed");
        assert!(body.get("description").is_none());
    }

    #[test]
    fn test_update_item_empty_q_not_echoed() {
        let body = Bytes::from(r#"{"name":"Hammer","price":9.99}"#);
        let result = tokio_test::block_on(update_item(
            State(AppState::default()),
            item_path("5"),
            RawQuery(Some("q=".to_string())),
            HeaderMap::new(),
            body,
        ));
        let Json(body) = result.expect("should succeed");
        assert_eq!(body["item_id"], json!(5));
        assert!(body.get("q").is_none());
    }

    #[test]
    fn test_update_item_nonempty_q_echoed() {
        let body = Bytes::from(r#"{"name":"Hammer","price":9.99}"#);
        let result = tokio_test::block_on(update_item(
            State(AppState::default()),
            item_path("5"),
            RawQuery(Some("q=fixedquery".to_string())),
            HeaderMap::new(),
            body,
        ));
        let Json(body) = result.expect("should succeed");
        assert_eq!(body["q"], json!("fixedquery"));
    }

    #[test]
    fn test_create_item_dedupes_tags() {
        let body = Bytes::from(
            r#"{"name":"Hammer","price":9.99,"tags":["tool","tool","steel"]}"#,
        );
        let result = tokio_test::block_on(create_item(State(AppState::default()), body));
        let Json(body) = result.expect("should succeed");
        assert_eq!(body["tags"], json!(["tool", "steel"]));
    }

    #[test]
    fn test_create_user_never_echoes_password() {
        let body = Bytes::from(
            r#"{"username":"alice","full_name":"Alice","password":"supersecret"}"#,
        );
        let result = tokio_test::block_on(create_user(State(AppState::default()), body));
        let (status, Json(body)) = result.expect("should succeed");
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["username"], "alice");
        assert!(body.get("password").is_none());
    }
}
