//! 共享类型库 - POS 服务端与客户端之间的公共类型
//!
//! # 内容
//!
//! - [`models`] - 领域模型 (菜单、库存、配方、订单)
//! - [`message`] - 消息总线事件类型 (强类型 tagged variants)
//! - [`error`] - 统一错误类型 [`AppError`] 和 [`AppResult`]
//! - [`response`] - API 响应封装 [`ApiResponse`]
//! - [`client`] - 客户端角色 (收银/后厨/管理)

pub mod client;
pub mod error;
pub mod message;
pub mod models;
pub mod response;

// Re-export 常用类型
pub use client::ClientRole;
pub use error::{ApiErrorCode, AppError, AppResult};
pub use message::{BusMessage, EventPayload};
pub use response::ApiResponse;
