//! Orders API Handlers
//!
//! - 下单 (服务端重算金额，客户端金额仅对账)
//! - 状态迁移 (取消触发库存回冲)
//! - 订单列表 / 详情查询

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::{Deserialize, Serialize};
use shared::message::LowStockPayload;
use shared::models::{Order, OrderStatus};

use crate::api::{ApiResponse, AppResult};
use crate::core::ServerState;
use crate::db::repository::order as order_repo;
use crate::fulfillment::NewOrderLine;
use crate::utils::AppError;
use crate::utils::time::{day_end_millis, day_start_millis, parse_date};

/// 下单请求体
#[derive(Debug, Deserialize)]
pub struct PlaceOrderRequest {
    pub items: Vec<NewOrderLine>,
    /// 客户端计算的金额 (仅对账，服务端金额为准)
    pub total: Option<f64>,
}

/// 下单响应
#[derive(Debug, Serialize)]
pub struct PlaceOrderResponse {
    pub order: Order,
    /// 本单触发的低库存提醒 (同时也已广播给管理端)
    pub low_stock: Vec<LowStockPayload>,
}

/// POST /api/orders - 下单
pub async fn place(
    State(state): State<ServerState>,
    Json(req): Json<PlaceOrderRequest>,
) -> AppResult<Json<ApiResponse<PlaceOrderResponse>>> {
    let placed = state.coordinator.place_order(&req.items, req.total).await?;
    Ok(Json(ApiResponse::success(PlaceOrderResponse {
        order: placed.order,
        low_stock: placed.low_stock,
    })))
}

/// 状态迁移请求体
#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: OrderStatus,
}

/// PATCH /api/orders/:order_number/status - 状态迁移
pub async fn update_status(
    State(state): State<ServerState>,
    Path(order_number): Path<String>,
    Json(req): Json<UpdateStatusRequest>,
) -> AppResult<Json<ApiResponse<Order>>> {
    let updated = state
        .coordinator
        .update_status(&order_number, req.status)
        .await?;
    Ok(Json(ApiResponse::success(updated)))
}

/// 列表查询参数
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    /// 按状态过滤
    pub status: Option<OrderStatus>,
    /// 按营业日过滤 (YYYY-MM-DD，UTC)
    pub date: Option<String>,
    /// 创建时间下界 (毫秒，含)
    pub from: Option<i64>,
    /// 创建时间上界 (毫秒，含)
    pub to: Option<i64>,
}

/// GET /api/orders - 订单列表 (厨房显示屏轮询与管理端报表共用)
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<ApiResponse<Vec<Order>>>> {
    let (from, to) = match &query.date {
        Some(date) => {
            let day = parse_date(date)?;
            // list() 的上界是含语义，取次日零点前最后一毫秒
            (Some(day_start_millis(day)), Some(day_end_millis(day) - 1))
        }
        None => (query.from, query.to),
    };

    let orders = order_repo::list(state.pool(), query.status, from, to)
        .await
        .map_err(|e| AppError::database(e.to_string()))?;
    Ok(Json(ApiResponse::success(orders)))
}

/// GET /api/orders/:order_number - 订单详情 (含冻结行项)
pub async fn get_by_number(
    State(state): State<ServerState>,
    Path(order_number): Path<String>,
) -> AppResult<Json<ApiResponse<Order>>> {
    let mut conn = state
        .pool()
        .acquire()
        .await
        .map_err(|e| AppError::database(e.to_string()))?;

    let order = order_repo::find_by_number_with_items(&mut conn, &order_number)
        .await
        .map_err(|e| AppError::database(e.to_string()))?
        .ok_or_else(|| AppError::not_found(format!("Order {}", order_number)))?;

    Ok(Json(ApiResponse::success(order)))
}
