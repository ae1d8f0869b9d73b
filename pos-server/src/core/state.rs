use std::sync::Arc;

use shared::error::{AppError, AppResult};
use sqlx::SqlitePool;

use crate::core::Config;
use crate::db::DbService;
use crate::fulfillment::OrderCoordinator;
use crate::message::{MessageBus, TransportConfig};

/// 服务器状态 - 持有所有服务的单例引用
///
/// 使用 Arc 实现浅拷贝，作为 axum 的共享状态注入所有 handler。
///
/// | 字段 | 说明 |
/// |------|------|
/// | config | 配置项 (不可变) |
/// | db | SQLite 连接池 |
/// | bus | 广播消息总线 |
/// | coordinator | 订单事务协调器 |
#[derive(Clone)]
pub struct ServerState {
    pub config: Config,
    pub db: DbService,
    pub bus: Arc<MessageBus>,
    pub coordinator: Arc<OrderCoordinator>,
}

impl ServerState {
    /// 初始化所有服务 (建目录、开库、跑迁移、建总线)
    pub async fn initialize(config: &Config) -> AppResult<Self> {
        std::fs::create_dir_all(&config.work_dir).map_err(|e| {
            AppError::internal(format!(
                "Failed to create work dir {}: {}",
                config.work_dir, e
            ))
        })?;

        let db = DbService::new(&config.database_path()).await?;

        let bus = Arc::new(MessageBus::from_config(TransportConfig {
            tcp_listen_addr: format!("0.0.0.0:{}", config.message_tcp_port),
            channel_capacity: config.channel_capacity,
        }));

        let coordinator = Arc::new(OrderCoordinator::new(db.pool.clone(), bus.clone()));

        Ok(Self {
            config: config.clone(),
            db,
            bus,
            coordinator,
        })
    }

    /// 启动后台任务 (消息总线 TCP 服务器)
    pub fn start_background_tasks(&self) {
        let bus = self.bus.clone();
        tokio::spawn(async move {
            if let Err(e) = bus.start_tcp_server().await {
                tracing::error!("Message bus TCP server failed: {}", e);
            }
        });
    }

    /// 获取数据库连接池
    pub fn pool(&self) -> &SqlitePool {
        &self.db.pool
    }
}
