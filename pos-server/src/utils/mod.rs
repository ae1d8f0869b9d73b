//! 工具模块 - 日志与通用辅助函数

pub mod logger;
pub mod time;

pub use logger::{init_logger, init_logger_with_file};

// Re-export error types so handlers can `use crate::utils::{AppError, AppResult}`
pub use shared::error::{AppError, AppResult};
pub use shared::response::ApiResponse;
