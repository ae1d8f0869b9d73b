//! 配方解析器
//!
//! 把一张订单的菜单行展开成按原料聚合的需求量。同一原料出现在多个
//! 菜品的配方里时需求量累加，保证扣减阶段每个原料只碰一次。

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use shared::models::IngredientRequirement;
use sqlx::SqliteConnection;

use super::error::FulfillmentResult;
use super::money::{to_decimal, to_f64};
use crate::db::repository::recipe;

pub struct RecipeResolver;

impl RecipeResolver {
    /// 解析单个菜单行：配方行 × 下单数量
    ///
    /// 无配方的菜单项返回空集 —— 不跟踪库存，直接可售。
    pub async fn resolve(
        conn: &mut SqliteConnection,
        menu_item_id: i64,
        quantity: i64,
    ) -> FulfillmentResult<Vec<IngredientRequirement>> {
        let lines = recipe::find_by_menu_item(conn, menu_item_id).await?;
        let quantity = Decimal::from(quantity);

        Ok(lines
            .into_iter()
            .map(|line| IngredientRequirement {
                inventory_item_id: line.inventory_item_id,
                inventory_item_name: line.inventory_item_name,
                quantity: to_f64(to_decimal(line.quantity_needed) * quantity),
                unit: line.unit_needed,
            })
            .collect())
    }

    /// 跨菜单行聚合：BTreeMap 按原料 ID 排序，扣减顺序稳定，
    /// 避免并发事务间的锁顺序颠倒。
    pub fn aggregate(requirements: Vec<IngredientRequirement>) -> Vec<IngredientRequirement> {
        let mut merged: BTreeMap<i64, IngredientRequirement> = BTreeMap::new();
        for req in requirements {
            match merged.get_mut(&req.inventory_item_id) {
                Some(existing) => {
                    existing.quantity =
                        to_f64(to_decimal(existing.quantity) + to_decimal(req.quantity));
                }
                None => {
                    merged.insert(req.inventory_item_id, req);
                }
            }
        }
        merged.into_values().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn req(id: i64, name: &str, quantity: f64) -> IngredientRequirement {
        IngredientRequirement {
            inventory_item_id: id,
            inventory_item_name: name.to_string(),
            quantity,
            unit: "g".to_string(),
        }
    }

    #[test]
    fn test_aggregate_merges_shared_ingredient() {
        let merged = RecipeResolver::aggregate(vec![
            req(2, "cheese", 30.0),
            req(1, "dough", 200.0),
            req(2, "cheese", 45.0),
        ]);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].inventory_item_id, 1);
        assert_eq!(merged[1].quantity, 75.0);
    }

    #[test]
    fn test_aggregate_sorted_by_ingredient_id() {
        let merged =
            RecipeResolver::aggregate(vec![req(9, "c", 1.0), req(3, "a", 1.0), req(7, "b", 1.0)]);
        let ids: Vec<i64> = merged.iter().map(|r| r.inventory_item_id).collect();
        assert_eq!(ids, vec![3, 7, 9]);
    }

    #[test]
    fn test_aggregate_empty() {
        assert!(RecipeResolver::aggregate(Vec::new()).is_empty());
    }
}
