//! Inventory API Handlers

use axum::{Json, extract::State};
use serde::Serialize;
use shared::models::InventoryItem;

use crate::api::{ApiResponse, AppResult};
use crate::core::ServerState;
use crate::db::repository::inventory;
use crate::utils::AppError;

/// 库存项 + 低库存标记
#[derive(Debug, Serialize)]
pub struct InventoryView {
    #[serde(flatten)]
    pub item: InventoryItem,
    pub low_stock: bool,
}

/// GET /api/inventory - 全量库存 (含低库存标记)
pub async fn list(
    State(state): State<ServerState>,
) -> AppResult<Json<ApiResponse<Vec<InventoryView>>>> {
    let items = inventory::find_all(state.pool())
        .await
        .map_err(|e| AppError::database(e.to_string()))?;

    let views = items
        .into_iter()
        .map(|item| InventoryView {
            low_stock: item.is_low_stock(),
            item,
        })
        .collect();

    Ok(Json(ApiResponse::success(views)))
}
