pub mod movie;
pub mod search;

use axum::{Json, extract::State};
use serde_json::{Value, json};

use crate::AppState;

pub async fn health(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "app": state.config.app_name,
        "cache_enabled": state.catalog.cache().is_enabled(),
    }))
}
