//! Inventory API Module
//!
//! 管理端库存只读查询。库存扣减/回冲只发生在订单事务内。

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().route("/api/inventory", get(handler::list))
}
