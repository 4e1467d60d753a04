//! Router builder for the demo API routes

use super::handlers::{
    AppState, client_meta, create_item, create_offer, create_user, get_model, login, read_item,
    read_root, update_item, update_item_images,
};
use axum::{
    Router,
    routing::{get, post, put},
};

/// Build the demo API routes
///
/// - GET  /                        - Greeting
/// - GET  /items/{item_id}         - Read one item with query validation
/// - POST /items/                  - Create an item from a JSON body
/// - PUT  /items/{item_id}         - Update an item (path + body + query)
/// - PUT  /items/{item_id}/images  - Replace an item's image list
/// - GET  /models/{model_name}     - Enum-constrained path segment
/// - POST /offers/                 - Create an offer with nested items
/// - POST /users/                  - Create a user (201, password masked)
/// - POST /login/                  - Form login
/// - GET  /client-meta/            - Header/cookie extraction
pub fn build_routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(read_root))
        .route("/items/", post(create_item))
        .route("/items/{item_id}", get(read_item).put(update_item))
        .route("/items/{item_id}/images", put(update_item_images))
        .route("/models/{model_name}", get(get_model))
        .route("/offers/", post(create_offer))
        .route("/users/", post(create_user))
        .route("/login/", post(login))
        .route("/client-meta/", get(client_meta))
        .with_state(state)
}
