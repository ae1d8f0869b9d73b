//! Client role types
//!
//! Every connected client subscribes as one of three roles. Broadcast
//! messages carry an optional target role; untargeted messages reach
//! everyone (see `message::BusMessage`).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 客户端角色 - 对应原 POS 的三类工作站
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClientRole {
    /// 收银台 - 下单
    Cashier,
    /// 后厨显示屏 - 更新制作状态
    Kitchen,
    /// 管理端 - 接收低库存提醒等
    Admin,
}

impl fmt::Display for ClientRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cashier => write!(f, "cashier"),
            Self::Kitchen => write!(f, "kitchen"),
            Self::Admin => write!(f, "admin"),
        }
    }
}

impl FromStr for ClientRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cashier" => Ok(Self::Cashier),
            "kitchen" => Ok(Self::Kitchen),
            "admin" => Ok(Self::Admin),
            other => Err(format!("Unknown client role: {}", other)),
        }
    }
}
