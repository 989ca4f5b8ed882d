/*
 * Responsibility
 * - GET /health (疎通用、ゲートなし)
 * - 検証に使うアルゴリズムだけ返す (鍵そのものは出さない)
 */
use axum::{Json, extract::State};
use serde_json::{Value, json};

use crate::state::AppState;

pub async fn health(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "alg": format!("{:?}", state.auth.public_key().algorithm()),
    }))
}
