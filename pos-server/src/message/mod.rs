//! 消息模块
//!
//! 服务端到工作站的事件分发：
//! - [`bus`] - 进程内广播总线
//! - [`transport`] - 可插拔传输层 (TCP / Memory)
//! - [`tcp_server`] - TCP 监听与角色握手

pub mod bus;
pub mod tcp_server;
pub mod transport;

pub use bus::{MessageBus, TransportConfig};

use serde::Serialize;
use shared::client::ClientRole;

/// 已连接的工作站信息
#[derive(Debug, Clone, Serialize)]
pub struct ConnectedClient {
    pub id: String,
    pub role: ClientRole,
    pub addr: Option<String>,
}
