pub mod availability;
pub mod booking;
pub mod stats;
pub mod token;

use axum::Json;

pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}
