use axum::{extract::State, response::Json};
use serde_json::{json, Value};

use crate::proxy::server::AppState;

/// Health check handler
pub async fn health_check_handler(State(state): State<AppState>) -> Json<Value> {
    let token_manager = state.forwarder.token_manager();
    Json(json!({
        "status": "ok",
        "credentials_configured": token_manager.has_credentials(),
        "token_cached": token_manager.has_valid_token(),
    }))
}
