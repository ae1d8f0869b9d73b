//! Menu Item Model

use serde::{Deserialize, Serialize};

/// 菜单项 - 收银端可售卖的商品
///
/// 价格以 f64 存储 (两位小数)，精确计算在服务端用 Decimal 完成。
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct MenuItem {
    pub id: i64,
    pub name: String,
    /// Unit price (2 decimal places)
    pub price: f64,
    /// Optional image reference (path or URL)
    pub image: Option<String>,
}
