//! POS Server - 餐厅点单与厨房协同服务端
//!
//! # 架构概述
//!
//! - **订单履约** (`fulfillment`): 配方解析、库存台账、订单事务协调
//! - **数据库** (`db`): SQLite (WAL) + 仓储层
//! - **消息总线** (`message`): 服务端广播，按角色 (收银/厨房/管理) 过滤
//! - **HTTP API** (`api`): RESTful 接口
//!
//! # 模块结构
//!
//! ```text
//! pos-server/src/
//! ├── core/          # 配置、状态、服务器生命周期
//! ├── api/           # HTTP 路由和处理器
//! ├── db/            # 数据库层 (连接池、迁移、仓储)
//! ├── fulfillment/   # 订单履约核心
//! ├── message/       # 消息总线 (TCP 广播)
//! └── utils/         # 日志、时间工具
//! ```

pub mod api;
pub mod core;
pub mod db;
pub mod fulfillment;
pub mod message;
pub mod utils;

// Re-export 公共类型
pub use core::{Config, Server, ServerState};
pub use fulfillment::{FulfillmentError, OrderCoordinator};
pub use message::MessageBus;
pub use utils::{ApiResponse, AppError, AppResult};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

/// 设置运行环境 (dotenv + 日志)
pub fn setup_environment() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    let log_level = std::env::var("LOG_LEVEL").ok();
    let log_dir = std::env::var("LOG_DIR").ok();
    init_logger_with_file(log_level.as_deref(), log_dir.as_deref());

    Ok(())
}

pub fn print_banner() {
    println!(
        r#"
    ____  ____  _____
   / __ \/ __ \/ ___/
  / /_/ / / / /\__ \
 / ____/ /_/ /___/ /
/_/    \____//____/
    "#
    );
}
