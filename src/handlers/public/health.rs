use axum::{extract::State, response::Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /health - liveness plus configuration status of external collaborators
pub async fn health(State(state): State<AppState>) -> Json<Value> {
    let now = chrono::Utc::now();

    Json(json!({
        "success": true,
        "data": {
            "status": "ok",
            "timestamp": now,
            "asset_host": if state.config.assets.is_configured() { "configured" } else { "unconfigured" },
            "identity": if state.config.auth.jwt_secret.is_empty() { "unconfigured" } else { "configured" },
        }
    }))
}
