//! Menu API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use shared::models::{MenuItem, RecipeLine};

use crate::api::{ApiResponse, AppResult};
use crate::core::ServerState;
use crate::db::repository::{menu, recipe};
use crate::utils::AppError;

/// GET /api/menu - 全量菜单
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<ApiResponse<Vec<MenuItem>>>> {
    let items = menu::find_all(state.pool())
        .await
        .map_err(|e| AppError::database(e.to_string()))?;
    Ok(Json(ApiResponse::success(items)))
}

/// GET /api/menu/:id/recipe - 菜单项配方 (空配方 = 不跟踪库存)
pub async fn recipe(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<Vec<RecipeLine>>>> {
    let lines = recipe::find_by_menu_item_pool(state.pool(), id)
        .await
        .map_err(|e| AppError::database(e.to_string()))?;
    Ok(Json(ApiResponse::success(lines)))
}
