//! 消息总线 TCP 集成测试
//!
//! 覆盖角色握手、按角色过滤的广播下发与版本拒绝。

use std::sync::Arc;
use std::time::Duration;

use pos_server::message::transport::{TcpTransport, Transport};
use pos_server::message::{MessageBus, TransportConfig};
use shared::client::ClientRole;
use shared::message::{
    BusMessage, EventPayload, HandshakeAck, HandshakePayload, LowStockPayload, PROTOCOL_VERSION,
};
use shared::models::OrderStatus;
use tokio::net::TcpListener;

async fn start_bus() -> (Arc<MessageBus>, String) {
    let bus = Arc::new(MessageBus::from_config(TransportConfig {
        tcp_listen_addr: "127.0.0.1:0".to_string(),
        channel_capacity: 64,
    }));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap().to_string();

    let server_bus = bus.clone();
    tokio::spawn(async move {
        let _ = server_bus.serve_on(listener).await;
    });

    (bus, addr)
}

async fn connect_as(addr: &str, role: ClientRole, name: &str) -> TcpTransport {
    let transport = TcpTransport::connect(addr).await.unwrap();

    let handshake = HandshakePayload {
        version: PROTOCOL_VERSION,
        role,
        client_name: Some(name.to_string()),
    };
    transport
        .write_frame(&serde_json::to_vec(&handshake).unwrap())
        .await
        .unwrap();

    let ack: HandshakeAck =
        serde_json::from_slice(&transport.read_frame().await.unwrap()).unwrap();
    assert_eq!(ack.client_id, name);

    transport
}

/// 等客户端完成注册 (握手应答到达后注册已完成，轮询只是兜底)
async fn wait_for_clients(bus: &MessageBus, expected: usize) {
    for _ in 0..50 {
        if bus.get_connected_clients().len() == expected {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("expected {} connected clients", expected);
}

#[tokio::test]
async fn broadcast_reaches_every_role() {
    let (bus, addr) = start_bus().await;

    let kitchen = connect_as(&addr, ClientRole::Kitchen, "kds-1").await;
    let cashier = connect_as(&addr, ClientRole::Cashier, "till-1").await;
    wait_for_clients(&bus, 2).await;

    bus.publish(BusMessage::order_status_changed(
        "ORD1",
        OrderStatus::Preparing,
    ));

    for transport in [&kitchen, &cashier] {
        let msg = tokio::time::timeout(Duration::from_secs(2), transport.read_message())
            .await
            .unwrap()
            .unwrap();
        assert!(matches!(
            msg.payload,
            EventPayload::OrderStatusChanged { .. }
        ));
    }
}

#[tokio::test]
async fn targeted_message_skips_other_roles() {
    let (bus, addr) = start_bus().await;

    let kitchen = connect_as(&addr, ClientRole::Kitchen, "kds-1").await;
    let admin = connect_as(&addr, ClientRole::Admin, "back-office").await;
    wait_for_clients(&bus, 2).await;

    let advisory = LowStockPayload {
        inventory_item_id: 1,
        name: "Bun".to_string(),
        quantity: 1.0,
        low_stock_threshold: 2.0,
        unit: "pcs".to_string(),
    };
    bus.publish(BusMessage::low_stock(&advisory));
    bus.publish(BusMessage::order_status_changed(
        "ORD2",
        OrderStatus::Completed,
    ));

    // 管理端先收到定向的低库存，再收到广播
    let first = tokio::time::timeout(Duration::from_secs(2), admin.read_message())
        .await
        .unwrap()
        .unwrap();
    assert!(matches!(first.payload, EventPayload::LowStock(_)));

    // 厨房端跳过低库存，直接收到广播
    let msg = tokio::time::timeout(Duration::from_secs(2), kitchen.read_message())
        .await
        .unwrap()
        .unwrap();
    assert!(matches!(
        msg.payload,
        EventPayload::OrderStatusChanged { .. }
    ));
}

#[tokio::test]
async fn version_mismatch_is_rejected() {
    let (_bus, addr) = start_bus().await;

    let transport = TcpTransport::connect(&addr).await.unwrap();
    let handshake = HandshakePayload {
        version: PROTOCOL_VERSION + 1,
        role: ClientRole::Kitchen,
        client_name: Some("old-client".to_string()),
    };
    transport
        .write_frame(&serde_json::to_vec(&handshake).unwrap())
        .await
        .unwrap();

    let ack: HandshakeAck =
        serde_json::from_slice(&transport.read_frame().await.unwrap()).unwrap();
    assert!(ack.client_id.is_empty());
    assert!(ack.message.contains("version mismatch"));
}

#[tokio::test]
async fn disconnect_removes_client_from_registry() {
    let (bus, addr) = start_bus().await;

    let kitchen = connect_as(&addr, ClientRole::Kitchen, "kds-1").await;
    wait_for_clients(&bus, 1).await;
    assert_eq!(bus.get_connected_clients()[0].role, ClientRole::Kitchen);

    drop(kitchen);
    // 服务端在下一次下发失败后才摘除；持续推送直到注册表清空
    for _ in 0..50 {
        bus.publish(BusMessage::order_status_changed(
            "ORD3",
            OrderStatus::Completed,
        ));
        if bus.get_connected_clients().is_empty() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("client was not removed from registry after disconnect");
}
