//! 消息总线消息类型定义
//!
//! 这些类型在 pos-server 和各工作站客户端之间共享，用于进程内
//! (内存) 和网络 (TCP) 通信。
//!
//! 广播事件是强类型 tagged variants ([`EventPayload`])，每种事件一个
//! 构造函数 —— 杜绝松散 JSON 对象在边界上传递。

use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub mod payload;
pub use payload::*;

use crate::client::ClientRole;
use crate::models::{Order, OrderStatus};

/// 协议版本号
pub const PROTOCOL_VERSION: u16 = 1;

/// 消息总线消息体 (服务端 -> 客户端广播)
///
/// `target` 为 None 时广播给所有角色；为 Some(role) 时仅该角色接收
/// (如低库存提醒只发管理端)。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BusMessage {
    pub request_id: Uuid,
    /// Restrict delivery to a single role; None = everyone
    pub target: Option<ClientRole>,
    pub payload: EventPayload,
}

impl BusMessage {
    fn new(payload: EventPayload) -> Self {
        Self {
            request_id: Uuid::new_v4(),
            target: None,
            payload,
        }
    }

    /// 设置目标角色
    pub fn with_target(mut self, target: ClientRole) -> Self {
        self.target = Some(target);
        self
    }

    /// 创建 "新订单" 广播 (全员)
    pub fn order_created(order: &Order) -> Self {
        Self::new(EventPayload::OrderCreated(order.clone()))
    }

    /// 创建 "订单状态变更" 广播 (全员)
    pub fn order_status_changed(order_number: &str, status: OrderStatus) -> Self {
        Self::new(EventPayload::OrderStatusChanged {
            order_number: order_number.to_string(),
            status,
        })
    }

    /// 创建 "低库存" 提醒 (仅管理端)
    pub fn low_stock(payload: &LowStockPayload) -> Self {
        Self::new(EventPayload::LowStock(payload.clone())).with_target(ClientRole::Admin)
    }

    /// 该消息是否应投递给指定角色
    pub fn is_for(&self, role: ClientRole) -> bool {
        match self.target {
            None => true,
            Some(target) => target == role,
        }
    }

    /// 序列化为二进制 (JSON)
    pub fn to_bytes(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }

    /// 从二进制解析
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::OrderStatus;

    fn sample_order() -> Order {
        Order {
            id: 1,
            order_number: "ORD1724380000000001".to_string(),
            items: vec![],
            total: 12.50,
            status: OrderStatus::Pending,
            created_at: 1724380000000,
        }
    }

    #[test]
    fn test_order_created_is_broadcast() {
        let msg = BusMessage::order_created(&sample_order());
        assert!(msg.target.is_none());
        assert!(msg.is_for(ClientRole::Cashier));
        assert!(msg.is_for(ClientRole::Kitchen));
        assert!(msg.is_for(ClientRole::Admin));
    }

    #[test]
    fn test_low_stock_targets_admin_only() {
        let payload = LowStockPayload {
            inventory_item_id: 3,
            name: "Bun".to_string(),
            quantity: 4.0,
            low_stock_threshold: 5.0,
            unit: "pcs".to_string(),
        };
        let msg = BusMessage::low_stock(&payload);
        assert_eq!(msg.target, Some(ClientRole::Admin));
        assert!(msg.is_for(ClientRole::Admin));
        assert!(!msg.is_for(ClientRole::Kitchen));
        assert!(!msg.is_for(ClientRole::Cashier));
    }

    #[test]
    fn test_tagged_serialization() {
        let msg = BusMessage::order_status_changed("ORD17", OrderStatus::Preparing);
        let json = serde_json::to_string(&msg).unwrap();
        assert!(json.contains("\"event\":\"order_status_changed\""));
        assert!(json.contains("\"status\":\"preparing\""));

        let recovered = BusMessage::from_bytes(json.as_bytes()).unwrap();
        assert_eq!(recovered, msg);
    }
}
