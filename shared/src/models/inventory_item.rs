//! Inventory Item Model

use serde::{Deserialize, Serialize};

/// 库存项 - 原料的当前库存水平
///
/// Invariant: `quantity >= 0`，由台账层 (Ledger) 在任何扣减提交前保证。
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct InventoryItem {
    pub id: i64,
    /// Unique ingredient name
    pub name: String,
    /// Current stock level, never negative
    pub quantity: f64,
    /// Unit of measure (e.g. "pcs", "kg", "l")
    pub unit: String,
    /// Advisory threshold; quantity <= threshold fires a low-stock event
    pub low_stock_threshold: f64,
}

impl InventoryItem {
    /// 是否处于低库存状态
    pub fn is_low_stock(&self) -> bool {
        self.quantity <= self.low_stock_threshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_low_stock_boundary() {
        let mut item = InventoryItem {
            id: 1,
            name: "Bun".into(),
            quantity: 5.0,
            unit: "pcs".into(),
            low_stock_threshold: 5.0,
        };
        assert!(item.is_low_stock());
        item.quantity = 5.1;
        assert!(!item.is_low_stock());
    }
}
