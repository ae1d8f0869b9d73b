//! 库存台账
//!
//! 事务内的扣减 / 回冲封装。`deduct` 依赖守卫式 UPDATE：余量不足时
//! 0 行受影响，当场失败并回滚，竞态窗口被数据库本身关死。

use shared::message::LowStockPayload;
use shared::models::IngredientRequirement;
use sqlx::SqliteConnection;
use tracing::warn;

use super::error::{FulfillmentError, FulfillmentResult};
use crate::db::repository::inventory;

pub struct InventoryLedger;

impl InventoryLedger {
    /// 逐项守卫扣减；第一个不足的原料立刻报错 (带名称)
    pub async fn deduct(
        conn: &mut SqliteConnection,
        requirements: &[IngredientRequirement],
    ) -> FulfillmentResult<()> {
        for req in requirements {
            let deducted = inventory::deduct_checked(
                &mut *conn,
                req.inventory_item_id,
                req.quantity,
            )
            .await?;
            if !deducted {
                return Err(FulfillmentError::InsufficientStock {
                    item_name: req.inventory_item_name.clone(),
                });
            }
        }
        Ok(())
    }

    /// 回冲 (取消订单)。目标原料已被删除时记 warn 跳过，不阻断取消。
    pub async fn restore(
        conn: &mut SqliteConnection,
        requirements: &[IngredientRequirement],
    ) -> FulfillmentResult<()> {
        for req in requirements {
            let restored =
                inventory::restore(&mut *conn, req.inventory_item_id, req.quantity).await?;
            if !restored {
                warn!(
                    inventory_item_id = req.inventory_item_id,
                    name = %req.inventory_item_name,
                    "skipping restore for missing inventory item"
                );
            }
        }
        Ok(())
    }

    /// 扣减后检查触线原料，返回待广播的低库存告警
    pub async fn low_stock_advisories(
        conn: &mut SqliteConnection,
        requirements: &[IngredientRequirement],
    ) -> FulfillmentResult<Vec<LowStockPayload>> {
        let ids: Vec<i64> = requirements.iter().map(|r| r.inventory_item_id).collect();
        let items = inventory::find_low_stock_among(conn, &ids).await?;
        Ok(items
            .into_iter()
            .map(|item| LowStockPayload {
                inventory_item_id: item.id,
                name: item.name,
                quantity: item.quantity,
                low_stock_threshold: item.low_stock_threshold,
                unit: item.unit,
            })
            .collect())
    }
}
