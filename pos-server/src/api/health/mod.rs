//! Health API Module

use axum::{Json, Router, extract::State, routing::get};
use serde::Serialize;

use super::{ApiResponse, AppResult};
use crate::core::ServerState;
use crate::utils::time::now_millis;

pub fn router() -> Router<ServerState> {
    Router::new().route("/api/health", get(health))
}

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub timestamp: i64,
    pub connected_clients: usize,
}

/// GET /api/health - 存活检查 (顺带验证数据库连通)
async fn health(State(state): State<ServerState>) -> AppResult<Json<ApiResponse<HealthStatus>>> {
    sqlx::query("SELECT 1")
        .execute(state.pool())
        .await
        .map_err(|e| shared::error::AppError::database(e.to_string()))?;

    Ok(Json(ApiResponse::success(HealthStatus {
        status: "ok",
        timestamp: now_millis(),
        connected_clients: state.bus.get_connected_clients().len(),
    })))
}
