//! Fulfillment error types

use shared::error::AppError;
use shared::models::OrderStatus;
use thiserror::Error;

use crate::db::repository::RepoError;

#[derive(Debug, Error)]
pub enum FulfillmentError {
    /// 库存不足 (带原料名，便于收银端直接展示)
    #[error("Insufficient stock: {item_name}")]
    InsufficientStock { item_name: String },

    #[error("Menu item not found: {0}")]
    MenuItemNotFound(i64),

    #[error("Order not found: {0}")]
    OrderNotFound(String),

    /// 非法状态迁移 (含终态出边)
    #[error("Invalid status transition: {from} -> {to}")]
    InvalidTransition { from: OrderStatus, to: OrderStatus },

    #[error("Order must contain at least one item")]
    EmptyOrder,

    #[error("Invalid quantity for menu item {menu_item_id}: {quantity}")]
    InvalidQuantity { menu_item_id: i64, quantity: i64 },

    #[error("Database error: {0}")]
    Database(String),
}

pub type FulfillmentResult<T> = Result<T, FulfillmentError>;

impl From<RepoError> for FulfillmentError {
    fn from(err: RepoError) -> Self {
        FulfillmentError::Database(err.to_string())
    }
}

impl From<sqlx::Error> for FulfillmentError {
    fn from(err: sqlx::Error) -> Self {
        FulfillmentError::Database(err.to_string())
    }
}

impl From<FulfillmentError> for AppError {
    fn from(err: FulfillmentError) -> Self {
        match err {
            FulfillmentError::InsufficientStock { .. } => AppError::business_rule(err.to_string()),
            FulfillmentError::MenuItemNotFound(id) => {
                AppError::not_found(format!("Menu item {}", id))
            }
            FulfillmentError::OrderNotFound(number) => {
                AppError::not_found(format!("Order {}", number))
            }
            FulfillmentError::InvalidTransition { .. } => AppError::conflict(err.to_string()),
            FulfillmentError::EmptyOrder | FulfillmentError::InvalidQuantity { .. } => {
                AppError::validation(err.to_string())
            }
            FulfillmentError::Database(msg) => AppError::database(msg),
        }
    }
}
