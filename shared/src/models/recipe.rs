//! Recipe (bill of materials) Model
//!
//! One row relates a menu item to one inventory ingredient with the
//! quantity consumed per single unit sold. A menu item with zero rows
//! is "untracked": sellable, no inventory effect.

use serde::{Deserialize, Serialize};

/// 配方行 - menu_item_ingredients 表的一行
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct RecipeLine {
    pub menu_item_id: i64,
    pub inventory_item_id: i64,
    /// Amount consumed per single unit of the menu item
    pub quantity_needed: f64,
    pub unit_needed: String,
    /// Ingredient name, joined from inventory_items for display
    pub inventory_item_name: String,
}

/// 原料需求 - Recipe Resolver 的输出
///
/// `quantity = quantity_needed × ordered_quantity`，跨订单行累加后
/// 交给台账层做充足性检查与扣减。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngredientRequirement {
    pub inventory_item_id: i64,
    pub inventory_item_name: String,
    pub quantity: f64,
    pub unit: String,
}
