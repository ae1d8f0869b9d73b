use serde::{Deserialize, Serialize};

use crate::client::ClientRole;
use crate::models::{Order, OrderStatus};

// ==================== Broadcast Events ====================

/// 广播事件载荷 - 每种事件一个变体
///
/// 序列化为 `{"event": "...", "data": {...}}`，客户端在边界处按
/// tag 解析，不存在松散对象。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum EventPayload {
    /// 新订单创建 (完整订单载荷，含冻结的订单行)
    OrderCreated(Order),
    /// 订单状态变更
    OrderStatusChanged {
        order_number: String,
        status: OrderStatus,
    },
    /// 低库存提醒 (advisory，不阻断已提交订单)
    LowStock(LowStockPayload),
}

/// 低库存提醒载荷 (服务端 -> 管理端)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LowStockPayload {
    pub inventory_item_id: i64,
    /// Ingredient name
    pub name: String,
    /// Remaining quantity after the deduction that tripped the threshold
    pub quantity: f64,
    pub low_stock_threshold: f64,
    pub unit: String,
}

// ==================== Client Handshake ====================

/// 握手载荷 (客户端 -> 服务端)
///
/// TCP 连接建立后客户端发送的第一帧，声明协议版本与订阅角色。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HandshakePayload {
    /// 协议版本
    pub version: u16,
    /// 订阅角色 (决定接收哪些定向广播)
    pub role: ClientRole,
    /// 客户端名称/标识
    pub client_name: Option<String>,
}

/// 握手应答 (服务端 -> 客户端)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HandshakeAck {
    pub client_id: String,
    pub message: String,
}

impl HandshakeAck {
    pub fn success(client_id: impl Into<String>) -> Self {
        let client_id = client_id.into();
        Self {
            message: format!("Connected as client: {}", client_id),
            client_id,
        }
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            client_id: String::new(),
            message: message.into(),
        }
    }
}
