pub mod dynamics;

use axum::Router;
use axum::routing::{delete, get};

use crate::state::SharedState;

pub fn api_routes() -> Router<SharedState> {
    Router::new()
        .route("/api/v1/dynamic-forms", get(dynamics::list))
        .route("/api/v1/dynamic-forms/fields", get(dynamics::fields))
        .route("/api/v1/dynamic-forms/{id}", delete(dynamics::delete))
}
