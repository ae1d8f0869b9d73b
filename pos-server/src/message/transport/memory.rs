//! Memory 传输层实现 (同进程通信)

use std::sync::Arc;

use async_trait::async_trait;
use shared::message::BusMessage;
use tokio::sync::Mutex;
use tokio::sync::broadcast;

use super::Transport;
use crate::utils::AppError;

/// In-process memory transport
///
/// 直接挂在总线的 broadcast 通道上，无网络开销。用于测试或同进程
/// 的展示端。写入的帧被留存，测试可以断言服务端会下发什么。
#[derive(Debug, Clone)]
pub struct MemoryTransport {
    rx: Arc<Mutex<broadcast::Receiver<BusMessage>>>,
    written: Arc<Mutex<Vec<Vec<u8>>>>,
}

impl MemoryTransport {
    /// Create from a message bus sender (for receiving broadcasts)
    pub fn new(tx: &broadcast::Sender<BusMessage>) -> Self {
        Self {
            rx: Arc::new(Mutex::new(tx.subscribe())),
            written: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// 取出已写入的帧 (测试用)
    pub async fn take_written(&self) -> Vec<Vec<u8>> {
        std::mem::take(&mut *self.written.lock().await)
    }
}

#[async_trait]
impl Transport for MemoryTransport {
    async fn read_frame(&self) -> Result<Vec<u8>, AppError> {
        let mut rx = self.rx.lock().await;
        let msg = rx
            .recv()
            .await
            .map_err(|e| AppError::internal(e.to_string()))?;
        msg.to_bytes()
            .map_err(|e| AppError::internal(e.to_string()))
    }

    async fn write_frame(&self, bytes: &[u8]) -> Result<(), AppError> {
        self.written.lock().await.push(bytes.to_vec());
        Ok(())
    }

    async fn close(&self) -> Result<(), AppError> {
        Ok(())
    }
}
