//! TCP 服务器实现
//!
//! 负责处理工作站的 TCP 连接：
//! - 监听连接
//! - 协议握手 (版本 + 角色声明)
//! - 按角色过滤并转发广播

use std::net::SocketAddr;
use std::sync::Arc;

use dashmap::DashMap;
use shared::client::ClientRole;
use shared::message::{BusMessage, HandshakeAck, HandshakePayload, PROTOCOL_VERSION};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use super::ConnectedClient;
use super::bus::MessageBus;
use super::transport::{TcpTransport, Transport};
use crate::utils::AppError;

impl MessageBus {
    /// Start TCP server (for workstation clients)
    ///
    /// 1. Accepts connections
    /// 2. Performs the role handshake
    /// 3. Forwards server broadcasts the client's role should see
    /// 4. Gracefully shuts down on cancellation signal
    pub async fn start_tcp_server(&self) -> Result<(), AppError> {
        let listener = TcpListener::bind(&self.config.tcp_listen_addr)
            .await
            .map_err(|e| AppError::internal(format!("Failed to bind: {}", e)))?;

        tracing::info!(
            "Message bus TCP server listening on {}",
            self.config.tcp_listen_addr
        );

        self.accept_loop(listener).await
    }

    /// 在已绑定的监听器上服务 (测试可先绑端口 0 再取真实地址)
    pub async fn serve_on(&self, listener: TcpListener) -> Result<(), AppError> {
        self.accept_loop(listener).await
    }

    /// Main accept loop
    async fn accept_loop(&self, listener: TcpListener) -> Result<(), AppError> {
        loop {
            tokio::select! {
                _ = self.shutdown_token().cancelled() => {
                    tracing::info!("Message bus TCP server shutting down");
                    break;
                }

                result = listener.accept() => {
                    match result {
                        Ok((stream, addr)) => {
                            tracing::debug!("Client connected: {}", addr);
                            self.spawn_client_handler(stream, addr);
                        }
                        Err(e) => {
                            tracing::error!("Failed to accept connection: {}", e);
                        }
                    }
                }
            }
        }

        Ok(())
    }

    /// Spawn a new task to handle client connection
    fn spawn_client_handler(&self, stream: TcpStream, addr: SocketAddr) {
        let server_tx = self.sender().clone();
        let shutdown_token = self.shutdown_token().clone();
        let clients = self.clients.clone();

        tokio::spawn(async move {
            if let Err(e) =
                handle_client_connection(stream, addr, server_tx, shutdown_token, clients).await
            {
                tracing::debug!("Client {} handler finished: {}", addr, e);
            }
        });
    }
}

/// Handle a single client connection
async fn handle_client_connection(
    stream: TcpStream,
    addr: SocketAddr,
    server_tx: broadcast::Sender<BusMessage>,
    shutdown_token: CancellationToken,
    clients: Arc<DashMap<String, ConnectedClient>>,
) -> Result<(), AppError> {
    let transport: Arc<dyn Transport> = Arc::new(TcpTransport::from_stream(stream));

    // Protocol handshake
    let (client_id, role) = perform_handshake(&transport, addr).await?;

    clients.insert(
        client_id.clone(),
        ConnectedClient {
            id: client_id.clone(),
            role,
            addr: transport.peer_addr(),
        },
    );
    tracing::debug!(client_id = %client_id, role = %role, "Client registered");

    forward_broadcasts(
        &transport,
        server_tx.subscribe(),
        &shutdown_token,
        &client_id,
        role,
    )
    .await;

    // Cleanup
    let _ = transport.close().await;
    clients.remove(&client_id);
    tracing::debug!(client_id = %client_id, "Client removed from registry");

    Ok(())
}

/// Perform protocol handshake with client
///
/// 第一帧必须是 [`HandshakePayload`]；版本不符时回一帧拒绝应答再断开。
async fn perform_handshake(
    transport: &Arc<dyn Transport>,
    addr: SocketAddr,
) -> Result<(String, ClientRole), AppError> {
    tracing::debug!("Waiting for handshake from {}", addr);

    let frame = transport.read_frame().await.map_err(|e| {
        tracing::warn!("Client {} handshake error: {}", addr, e);
        e
    })?;

    let payload: HandshakePayload = serde_json::from_slice(&frame).map_err(|e| {
        tracing::warn!("Client {} sent invalid handshake payload: {}", addr, e);
        AppError::invalid(format!("Invalid handshake payload: {}", e))
    })?;

    if payload.version != PROTOCOL_VERSION {
        tracing::warn!(
            "Client {} protocol version mismatch: expected {}, got {}",
            addr,
            PROTOCOL_VERSION,
            payload.version
        );
        send_handshake_rejection(
            transport,
            &format!(
                "Protocol version mismatch: server={}, client={}. Please update your client.",
                PROTOCOL_VERSION, payload.version
            ),
        )
        .await;
        return Err(AppError::invalid("Protocol version mismatch"));
    }

    let client_id = payload
        .client_name
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    tracing::debug!(
        "Client {} handshake success (v{}, role: {}, id: {})",
        addr,
        payload.version,
        payload.role,
        client_id
    );

    let ack = HandshakeAck::success(client_id.clone());
    let bytes = serde_json::to_vec(&ack)
        .map_err(|e| AppError::internal(format!("Serialize ack failed: {}", e)))?;
    if let Err(e) = transport.write_frame(&bytes).await {
        tracing::warn!("Failed to send handshake ack: {}", e);
    }

    Ok((client_id, payload.role))
}

/// Delay before closing connection after sending rejection (allows client to receive it)
const HANDSHAKE_ERROR_DELAY_MS: u64 = 100;

/// Send handshake rejection to client
async fn send_handshake_rejection(transport: &Arc<dyn Transport>, message: &str) {
    let ack = HandshakeAck::rejected(message);
    match serde_json::to_vec(&ack) {
        Ok(bytes) => {
            if let Err(e) = transport.write_frame(&bytes).await {
                tracing::error!("Failed to send handshake rejection: {}", e);
            }
        }
        Err(e) => tracing::error!("Failed to serialize handshake rejection: {}", e),
    }

    tokio::time::sleep(tokio::time::Duration::from_millis(HANDSHAKE_ERROR_DELAY_MS)).await;
}

/// Forward server broadcasts to the client, filtered by role
async fn forward_broadcasts(
    transport: &Arc<dyn Transport>,
    mut rx: broadcast::Receiver<BusMessage>,
    shutdown_token: &CancellationToken,
    client_id: &str,
    role: ClientRole,
) {
    loop {
        tokio::select! {
            _ = shutdown_token.cancelled() => {
                tracing::debug!(client_id = %client_id, "Forwarder shutting down");
                break;
            }
            msg_result = rx.recv() => {
                match msg_result {
                    Ok(msg) => {
                        // 角色过滤：定向消息只发给匹配的角色
                        if !msg.is_for(role) {
                            continue;
                        }

                        if let Err(e) = transport.write_message(&msg).await {
                            tracing::debug!(client_id = %client_id, "Client write failed: {}", e);
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        // 客户端掉队：丢弃积压，继续推最新事件，
                        // 客户端可通过 HTTP 列表接口补齐
                        tracing::warn!(
                            client_id = %client_id,
                            dropped_messages = n,
                            "Client lagged behind broadcast channel"
                        );
                    }
                    Err(broadcast::error::RecvError::Closed) => {
                        tracing::debug!(client_id = %client_id, "Broadcast channel closed");
                        break;
                    }
                }
            }
        }
    }
}
