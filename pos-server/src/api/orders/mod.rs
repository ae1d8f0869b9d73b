//! Orders API Module
//!
//! 下单、状态迁移与订单查询。

mod handler;

use axum::{
    Router,
    routing::{get, patch, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/orders", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", post(handler::place).get(handler::list))
        .route("/{order_number}", get(handler::get_by_number))
        .route("/{order_number}/status", patch(handler::update_status))
}
