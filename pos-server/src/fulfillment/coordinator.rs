//! 订单事务协调器
//!
//! 下单与状态迁移的唯一入口。所有检查与写入都压在同一个 SQLite
//! 事务里：要么订单 + 行项 + 库存扣减全部落库，要么全部回滚。
//! 广播只在 commit 成功之后发出，订阅端看不到未提交的订单。

use std::sync::Arc;

use serde::Deserialize;
use shared::message::{BusMessage, LowStockPayload};
use shared::models::{Order, OrderLine, OrderStatus};
use sqlx::{Connection, SqlitePool};
use tracing::{info, warn};

use super::error::{FulfillmentError, FulfillmentResult};
use super::ledger::InventoryLedger;
use super::money;
use super::order_number::OrderNumberGenerator;
use super::resolver::RecipeResolver;
use crate::db::repository::{menu, order};
use crate::message::bus::MessageBus;
use crate::utils::time::now_millis;

/// 下单请求中的单个菜单行
#[derive(Debug, Clone, Deserialize)]
pub struct NewOrderLine {
    pub menu_item_id: i64,
    pub quantity: i64,
}

/// 下单结果：已落库的订单 + 本次触发的低库存告警
#[derive(Debug)]
pub struct PlacedOrder {
    pub order: Order,
    pub low_stock: Vec<LowStockPayload>,
}

pub struct OrderCoordinator {
    pool: SqlitePool,
    bus: Arc<MessageBus>,
    number_gen: OrderNumberGenerator,
}

impl OrderCoordinator {
    pub fn new(pool: SqlitePool, bus: Arc<MessageBus>) -> Self {
        Self {
            pool,
            bus,
            number_gen: OrderNumberGenerator::new(),
        }
    }

    /// 下单
    ///
    /// `client_total` 仅作对账参考：服务端金额始终以冻结单价重算，
    /// 不一致时记 warn，不拒单。
    pub async fn place_order(
        &self,
        lines: &[NewOrderLine],
        client_total: Option<f64>,
    ) -> FulfillmentResult<PlacedOrder> {
        if lines.is_empty() {
            return Err(FulfillmentError::EmptyOrder);
        }
        for line in lines {
            if line.quantity <= 0 {
                return Err(FulfillmentError::InvalidQuantity {
                    menu_item_id: line.menu_item_id,
                    quantity: line.quantity,
                });
            }
        }

        // BEGIN IMMEDIATE: 提前拿写锁。延迟事务在 WAL 下读后写会因
        // 快照过期直接 SQLITE_BUSY；立即事务让并发写者在 busy_timeout
        // 内排队，失败语义收敛为"库存不足"而非数据库错误。
        let mut conn = self.pool.acquire().await?;
        let mut tx = conn.begin_with("BEGIN IMMEDIATE").await?;

        // 冻结行项并展开原料需求
        let mut frozen = Vec::with_capacity(lines.len());
        let mut requirements = Vec::new();
        let mut total = rust_decimal::Decimal::ZERO;
        for line in lines {
            let item = menu::find_by_id(&mut *tx, line.menu_item_id)
                .await?
                .ok_or(FulfillmentError::MenuItemNotFound(line.menu_item_id))?;

            total += money::line_total(item.price, line.quantity);
            frozen.push(OrderLine {
                menu_item_id: item.id,
                name: item.name,
                unit_price: item.price,
                quantity: line.quantity,
            });

            let line_reqs =
                RecipeResolver::resolve(&mut *tx, line.menu_item_id, line.quantity).await?;
            if line_reqs.is_empty() {
                tracing::debug!(menu_item_id = line.menu_item_id, "untracked menu item, no deduction");
            }
            requirements.extend(line_reqs);
        }
        let requirements = RecipeResolver::aggregate(requirements);

        InventoryLedger::deduct(&mut *tx, &requirements).await?;
        let low_stock = InventoryLedger::low_stock_advisories(&mut *tx, &requirements).await?;

        let total = money::to_f64(total);
        if let Some(claimed) = client_total {
            if !money::totals_match(claimed, total) {
                warn!(claimed, authoritative = total, "client total mismatch");
            }
        }

        let order_number = self.number_gen.next();
        let created_at = now_millis();
        let order_id = order::insert_with_items(
            &mut *tx,
            &order_number,
            total,
            OrderStatus::Pending,
            created_at,
            &frozen,
        )
        .await?;

        tx.commit().await?;

        let placed = Order {
            id: order_id,
            order_number,
            items: frozen,
            total,
            status: OrderStatus::Pending,
            created_at,
        };

        info!(order_number = %placed.order_number, total, "order placed");
        self.bus.publish(BusMessage::order_created(&placed));
        for advisory in &low_stock {
            self.bus.publish(BusMessage::low_stock(advisory));
        }

        Ok(PlacedOrder {
            order: placed,
            low_stock,
        })
    }

    /// 状态迁移；目标为 `cancelled` 时按当前配方 × 冻结数量回冲库存
    pub async fn update_status(
        &self,
        order_number: &str,
        new_status: OrderStatus,
    ) -> FulfillmentResult<Order> {
        let mut conn = self.pool.acquire().await?;
        let mut tx = conn.begin_with("BEGIN IMMEDIATE").await?;

        let mut target = order::find_by_number_with_items(&mut *tx, order_number)
            .await?
            .ok_or_else(|| FulfillmentError::OrderNotFound(order_number.to_string()))?;

        if !target.status.can_transition_to(new_status) {
            return Err(FulfillmentError::InvalidTransition {
                from: target.status,
                to: new_status,
            });
        }

        if new_status == OrderStatus::Cancelled {
            let mut requirements = Vec::new();
            for line in &target.items {
                let line_reqs =
                    RecipeResolver::resolve(&mut *tx, line.menu_item_id, line.quantity).await?;
                if line_reqs.is_empty() {
                    // 配方已被删除 (或本就不跟踪)：跳过该行回冲，不阻断取消
                    warn!(
                        order_number = %target.order_number,
                        menu_item_id = line.menu_item_id,
                        "no recipe rows at cancellation, skipping restore for line"
                    );
                }
                requirements.extend(line_reqs);
            }
            let requirements = RecipeResolver::aggregate(requirements);
            InventoryLedger::restore(&mut *tx, &requirements).await?;
        }

        order::update_status(&mut *tx, target.id, new_status).await?;
        tx.commit().await?;

        target.status = new_status;
        info!(order_number = %target.order_number, status = %new_status, "order status changed");
        self.bus
            .publish(BusMessage::order_status_changed(&target.order_number, new_status));

        Ok(target)
    }
}
