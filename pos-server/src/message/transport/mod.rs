//! Transport 传输层抽象
//!
//! ```text
//!         ┌────────────────────┐
//!         │   Transport Trait  │  ◄── 可插拔接口
//!         └────────┬───────────┘
//!                  │
//!          ┌───────┴────────┐
//!          ▼                ▼
//!     TcpTransport    MemoryTransport
//!     (网络客户端)     (同进程/测试)
//! ```
//!
//! 线格式：4 字节小端长度前缀 + JSON 载荷。

mod memory;
mod tcp;

pub use memory::MemoryTransport;
pub use tcp::TcpTransport;

use async_trait::async_trait;
use shared::message::BusMessage;
use tokio::io::{AsyncReadExt, AsyncWriteExt};

use crate::utils::AppError;

/// 单帧载荷上限 (1 MiB)，防御畸形长度前缀
const MAX_FRAME_LEN: usize = 1024 * 1024;

/// Transport 传输层特征
#[async_trait]
pub trait Transport: Send + Sync + std::fmt::Debug {
    /// 读取一帧原始字节
    async fn read_frame(&self) -> Result<Vec<u8>, AppError>;

    /// 写入一帧原始字节
    async fn write_frame(&self, bytes: &[u8]) -> Result<(), AppError>;

    /// 关闭传输连接
    async fn close(&self) -> Result<(), AppError>;

    /// 获取对端地址
    fn peer_addr(&self) -> Option<String> {
        None
    }

    /// 读取一条总线消息
    async fn read_message(&self) -> Result<BusMessage, AppError> {
        let bytes = self.read_frame().await?;
        BusMessage::from_bytes(&bytes)
            .map_err(|e| AppError::invalid(format!("Invalid message frame: {}", e)))
    }

    /// 写入一条总线消息
    async fn write_message(&self, msg: &BusMessage) -> Result<(), AppError> {
        let bytes = msg
            .to_bytes()
            .map_err(|e| AppError::internal(format!("Serialize message failed: {}", e)))?;
        self.write_frame(&bytes).await
    }
}

// ========== 辅助函数 ==========

/// 从异步流中读取一帧
pub(crate) async fn read_frame_from<R: AsyncReadExt + Unpin>(
    reader: &mut R,
) -> Result<Vec<u8>, AppError> {
    let mut len_buf = [0u8; 4];
    match reader.read_exact(&mut len_buf).await {
        Ok(_) => {}
        Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
            return Err(AppError::ClientDisconnected);
        }
        Err(e) => {
            return Err(AppError::internal(format!("Read frame length failed: {}", e)));
        }
    }

    let len = u32::from_le_bytes(len_buf) as usize;
    if len > MAX_FRAME_LEN {
        return Err(AppError::invalid(format!("Frame too large: {} bytes", len)));
    }

    let mut payload = vec![0u8; len];
    reader
        .read_exact(&mut payload)
        .await
        .map_err(|e| AppError::internal(format!("Read frame payload failed: {}", e)))?;
    Ok(payload)
}

/// 向异步流写入一帧
pub(crate) async fn write_frame_to<W: AsyncWriteExt + Unpin>(
    writer: &mut W,
    bytes: &[u8],
) -> Result<(), AppError> {
    let mut data = Vec::with_capacity(4 + bytes.len());
    data.extend_from_slice(&(bytes.len() as u32).to_le_bytes());
    data.extend_from_slice(bytes);

    writer
        .write_all(&data)
        .await
        .map_err(|e| AppError::internal(format!("Write failed: {}", e)))?;
    Ok(())
}
