//! End-to-end tests against the demo API
//!
//! Spins up the full router with an in-process test server and exercises
//! every route: success paths, validation failures (422), missing resources
//! (404), and malformed requests (400).

use axum::http::StatusCode;
use axum::http::header::{COOKIE, USER_AGENT};
use axum_test::TestServer;
use fieldgate::config::{GateConfig, UnknownFieldPolicy};
use fieldgate::server::ServerBuilder;
use serde_json::{Value, json};

fn test_server() -> TestServer {
    TestServer::new(ServerBuilder::new().build())
}

fn reject_server() -> TestServer {
    let app = ServerBuilder::new()
        .with_config(GateConfig {
            unknown_fields: UnknownFieldPolicy::Reject,
        })
        .build();
    TestServer::new(app)
}

fn error_fields(body: &Value) -> Vec<&str> {
    body["details"]
        .as_array()
        .map(|details| {
            details
                .iter()
                .filter_map(|d| d["field"].as_str())
                .collect()
        })
        .unwrap_or_default()
}

// =============================================================================
// Root
// =============================================================================

#[tokio::test]
async fn test_read_root() {
    let server = test_server();
    let response = server.get("/").await;
    response.assert_status_ok();
    response.assert_json(&json!({ "Hello": "World" }));
}

// =============================================================================
// GET /items/{item_id}
// =============================================================================

#[tokio::test]
async fn test_read_item_success_with_defaults() {
    let server = test_server();
    let response = server.get("/items/1?p=abc").await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["item_id"], json!(1));
    assert_eq!(body["p"], json!("abc"));
    // skip=0, limit=10 defaults expose the whole fake db
    assert_eq!(body["fakeitemdb"].as_array().map(|a| a.len()), Some(3));
    assert!(body["description"].is_string());
}

#[tokio::test]
async fn test_read_item_paging() {
    let server = test_server();
    let response = server.get("/items/1?p=abc&skip=1&limit=1").await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["fakeitemdb"], json!([{ "item_name": "Bar" }]));
}

#[tokio::test]
async fn test_read_item_short_drops_description() {
    let server = test_server();
    let response = server.get("/items/1?p=abc&short=1").await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert!(body.get("description").is_none());
}

#[tokio::test]
async fn test_read_item_repeated_query_key_collects_list() {
    let server = test_server();
    let response = server.get("/items/1?p=abc&r=x&r=y").await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["r"], json!(["x", "y"]));
}

#[tokio::test]
async fn test_read_item_missing_required_query_param() {
    let server = test_server();
    let response = server.get("/items/1").await;
    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);

    let body: Value = response.json();
    assert_eq!(body["code"], json!("VALIDATION_ERROR"));
    assert_eq!(error_fields(&body), vec!["p"]);
    assert_eq!(body["details"][0]["code"], json!("MISSING_REQUIRED"));
}

#[tokio::test]
async fn test_read_item_pattern_mismatch() {
    let server = test_server();
    let response = server.get("/items/1?p=abc&q=wrongquery").await;
    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);

    let body: Value = response.json();
    assert_eq!(body["details"][0]["field"], json!("q"));
    assert_eq!(body["details"][0]["constraint"], json!("pattern"));
}

#[tokio::test]
async fn test_read_item_fixedquery_passes_pattern() {
    let server = test_server();
    let response = server.get("/items/1?p=abc&q=fixedquery").await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["q"], json!("fixedquery"));
}

#[tokio::test]
async fn test_read_item_non_integer_path() {
    let server = test_server();
    let response = server.get("/items/foo?p=abc").await;
    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);

    let body: Value = response.json();
    assert_eq!(body["details"][0]["field"], json!("item_id"));
    assert_eq!(body["details"][0]["code"], json!("TYPE_MISMATCH"));
}

#[tokio::test]
async fn test_read_item_reserved_id_is_not_found() {
    let server = test_server();
    let response = server.get("/items/999?p=abc").await;
    response.assert_status(StatusCode::NOT_FOUND);

    let body: Value = response.json();
    assert_eq!(body["code"], json!("NOT_FOUND"));
}

#[tokio::test]
async fn test_read_item_collects_multiple_errors() {
    let server = test_server();
    // p too short AND q violates the pattern
    let response = server.get("/items/1?p=ab&q=nope").await;
    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);

    let body: Value = response.json();
    let fields = error_fields(&body);
    assert!(fields.contains(&"q"));
    assert!(fields.contains(&"p"));
    assert_eq!(fields.len(), 2);
}

// =============================================================================
// POST /items/
// =============================================================================

#[tokio::test]
async fn test_create_item_echoes_typed_values() {
    let server = test_server();
    let response = server
        .post("/items/")
        .json(&json!({
            "name": "Hammer",
            "description": "Claw hammer",
            "price": 9.99,
            "tax": 1.2
        }))
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["name"], json!("Hammer"));
    assert_eq!(body["price"], json!(9.99));
}

#[tokio::test]
async fn test_create_item_price_must_be_positive() {
    let server = test_server();
    let response = server
        .post("/items/")
        .json(&json!({ "name": "Hammer", "price": 0 }))
        .await;
    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);

    let body: Value = response.json();
    assert_eq!(body["details"][0]["field"], json!("price"));
    assert_eq!(body["details"][0]["constraint"], json!("gt"));
}

#[tokio::test]
async fn test_create_item_deduplicates_tags() {
    let server = test_server();
    let response = server
        .post("/items/")
        .json(&json!({
            "name": "Hammer",
            "price": 9.99,
            "tags": ["tool", "steel", "tool"]
        }))
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["tags"], json!(["tool", "steel"]));
}

#[tokio::test]
async fn test_create_item_malformed_json_is_bad_request() {
    let server = test_server();
    let response = server.post("/items/").text("{not json").await;
    response.assert_status(StatusCode::BAD_REQUEST);

    let body: Value = response.json();
    assert_eq!(body["code"], json!("BAD_REQUEST"));
}

#[tokio::test]
async fn test_create_item_accepts_object_with_empty_string_key() {
    let server = test_server();
    let response = server
        .post("/items/")
        .json(&json!({ "": 1, "name": "Hammer", "price": 9.99 }))
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["name"], json!("Hammer"));
    assert!(body.get("").is_none());
}

#[tokio::test]
async fn test_create_item_non_object_body_is_single_body_error() {
    let server = test_server();
    let response = server.post("/items/").json(&json!([1, 2, 3])).await;
    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);

    let body: Value = response.json();
    assert_eq!(error_fields(&body), vec!["body"]);
    assert_eq!(body["details"][0]["code"], json!("TYPE_MISMATCH"));
}

// =============================================================================
// PUT /items/{item_id}
// =============================================================================

#[tokio::test]
async fn test_update_item_combines_path_query_and_body() {
    let server = test_server();
    let response = server
        .put("/items/42?q=fixedquery")
        .json(&json!({ "name": "Hammer", "price": 12.5 }))
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["item_id"], json!(42));
    assert_eq!(body["name"], json!("Hammer"));
    assert_eq!(body["q"], json!("fixedquery"));
}

// =============================================================================
// PUT /items/{item_id}/images
// =============================================================================

#[tokio::test]
async fn test_update_item_images_rewrites_http_to_https() {
    let server = test_server();
    let response = server
        .put("/items/7/images")
        .json(&json!({
            "images": [
                { "url": "http://example.com/a.png", "name": "a" },
                { "url": "https://example.com/b.png", "name": "b" }
            ]
        }))
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["images"][0]["url"], json!("https://example.com/a.png"));
    assert_eq!(body["images"][1]["url"], json!("https://example.com/b.png"));
}

#[tokio::test]
async fn test_update_item_images_reports_bad_element_by_index() {
    let server = test_server();
    let response = server
        .put("/items/7/images")
        .json(&json!({
            "images": [
                { "url": "https://example.com/a.png", "name": "a" },
                { "name": "missing url" }
            ]
        }))
        .await;
    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);

    let body: Value = response.json();
    assert_eq!(body["details"][0]["field"], json!("images[1].url"));
}

// =============================================================================
// GET /models/{model_name}
// =============================================================================

#[tokio::test]
async fn test_get_model_known_members() {
    let server = test_server();
    for (name, message) in [
        ("alexnet", "Deep Learning FTW!"),
        ("lenet", "LeCNN all the images"),
        ("resnet", "Have some residuals"),
    ] {
        let response = server.get(&format!("/models/{}", name)).await;
        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["model_name"], json!(name));
        assert_eq!(body["message"], json!(message));
    }
}

#[tokio::test]
async fn test_get_model_unknown_member_is_enum_mismatch() {
    let server = test_server();
    let response = server.get("/models/googlenet").await;
    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);

    let body: Value = response.json();
    assert_eq!(body["details"][0]["code"], json!("ENUM_MISMATCH"));
}

#[tokio::test]
async fn test_get_model_membership_is_case_sensitive() {
    let server = test_server();
    let response = server.get("/models/Lenet").await;
    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
}

// =============================================================================
// POST /offers/
// =============================================================================

#[tokio::test]
async fn test_create_offer_with_nested_items() {
    let server = test_server();
    let response = server
        .post("/offers/")
        .json(&json!({
            "name": "Summer sale",
            "price": 100.0,
            "items": [
                { "name": "Hammer", "price": 9.99 },
                { "name": "Saw", "price": 14.5 }
            ]
        }))
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["items"].as_array().map(|a| a.len()), Some(2));
}

#[tokio::test]
async fn test_create_offer_reports_nested_item_error() {
    let server = test_server();
    let response = server
        .post("/offers/")
        .json(&json!({
            "name": "Summer sale",
            "price": 100.0,
            "items": [{ "name": "Hammer", "price": -1 }]
        }))
        .await;
    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);

    let body: Value = response.json();
    assert_eq!(body["details"][0]["field"], json!("items[0].price"));
}

// =============================================================================
// POST /users/ and POST /login/
// =============================================================================

#[tokio::test]
async fn test_create_user_returns_201_without_password() {
    let server = test_server();
    let response = server
        .post("/users/")
        .json(&json!({
            "username": "alice",
            "full_name": "Alice Example",
            "password": "supersecret"
        }))
        .await;
    response.assert_status(StatusCode::CREATED);

    let body: Value = response.json();
    assert_eq!(body["username"], json!("alice"));
    assert!(body.get("password").is_none());
}

#[tokio::test]
async fn test_create_user_short_username_rejected() {
    let server = test_server();
    let response = server
        .post("/users/")
        .json(&json!({ "username": "ab", "password": "supersecret" }))
        .await;
    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);

    let body: Value = response.json();
    assert_eq!(body["details"][0]["field"], json!("username"));
    assert_eq!(body["details"][0]["constraint"], json!("min_length"));
}

#[tokio::test]
async fn test_login_accepts_form_body() {
    let server = test_server();
    let response = server
        .post("/login/")
        .form(&[("username", "alice"), ("password", "secret123")])
        .await;
    response.assert_status_ok();
    response.assert_json(&json!({ "username": "alice" }));
}

#[tokio::test]
async fn test_login_missing_password_rejected() {
    let server = test_server();
    let response = server.post("/login/").form(&[("username", "alice")]).await;
    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);

    let body: Value = response.json();
    assert_eq!(error_fields(&body), vec!["password"]);
}

// =============================================================================
// GET /client-meta/
// =============================================================================

#[tokio::test]
async fn test_client_meta_echoes_header_and_cookie() {
    let server = test_server();
    let response = server
        .get("/client-meta/")
        .add_header(USER_AGENT, "fieldgate-test")
        .add_header(COOKIE, "ads_id=abc123")
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["user_agent"], json!("fieldgate-test"));
    assert_eq!(body["ads_id"], json!("abc123"));
}

#[tokio::test]
async fn test_client_meta_all_optional() {
    let server = test_server();
    let response = server.get("/client-meta/").await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert!(body.get("ads_id").is_none());
}

// =============================================================================
// Unknown-field policy
// =============================================================================

#[tokio::test]
async fn test_default_server_ignores_unknown_query_params() {
    let server = test_server();
    let response = server.get("/items/1?p=abc&bogus=1").await;
    response.assert_status_ok();
}

#[tokio::test]
async fn test_reject_server_flags_unknown_query_params() {
    let server = reject_server();
    let response = server.get("/items/1?p=abc&bogus=1").await;
    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);

    let body: Value = response.json();
    assert_eq!(error_fields(&body), vec!["bogus"]);
    assert_eq!(body["details"][0]["code"], json!("UNKNOWN_FIELD"));
}

#[tokio::test]
async fn test_reject_server_ignores_extra_headers() {
    // Headers always carry transport noise; the reject policy only covers
    // query, form, and body buckets.
    let server = reject_server();
    let response = server
        .get("/items/1?p=abc")
        .add_header(USER_AGENT, "fieldgate-test")
        .await;
    response.assert_status_ok();
}
