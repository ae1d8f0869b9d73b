//! Inventory item queries and stock mutations
//!
//! The mutation functions take `&mut SqliteConnection` and are only
//! ever called inside the order transaction — never as standalone
//! round-trips (the check-then-deduct race is closed by the guarded
//! UPDATE plus the enclosing transaction).

use shared::models::InventoryItem;
use sqlx::{SqliteConnection, SqlitePool};

use super::RepoResult;

const SELECT_COLUMNS: &str = "id, name, quantity, unit, low_stock_threshold";

/// 全量库存 (管理端只读)
pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<InventoryItem>> {
    let items = sqlx::query_as::<_, InventoryItem>(&format!(
        "SELECT {SELECT_COLUMNS} FROM inventory_items ORDER BY name"
    ))
    .fetch_all(pool)
    .await?;
    Ok(items)
}

/// 按 ID 查单个库存项 (事务内)
pub async fn find_by_id(
    conn: &mut SqliteConnection,
    id: i64,
) -> RepoResult<Option<InventoryItem>> {
    let item = sqlx::query_as::<_, InventoryItem>(&format!(
        "SELECT {SELECT_COLUMNS} FROM inventory_items WHERE id = ?"
    ))
    .bind(id)
    .fetch_optional(conn)
    .await?;
    Ok(item)
}

/// 带充足性守卫的扣减
///
/// 只在 `quantity >= amount` 时扣减；返回是否成功 (0 行受影响 =
/// 库存不足或并发竞争失败)。非负不变量由守卫条件保证。
pub async fn deduct_checked(
    conn: &mut SqliteConnection,
    id: i64,
    amount: f64,
) -> RepoResult<bool> {
    let result = sqlx::query(
        "UPDATE inventory_items SET quantity = quantity - ? WHERE id = ? AND quantity >= ?",
    )
    .bind(amount)
    .bind(id)
    .bind(amount)
    .execute(conn)
    .await?;
    Ok(result.rows_affected() == 1)
}

/// 回冲库存 (取消订单时的反向操作)
pub async fn restore(conn: &mut SqliteConnection, id: i64, amount: f64) -> RepoResult<bool> {
    let result = sqlx::query("UPDATE inventory_items SET quantity = quantity + ? WHERE id = ?")
        .bind(amount)
        .bind(id)
        .execute(conn)
        .await?;
    Ok(result.rows_affected() == 1)
}

/// 在给定 ID 集合中查出处于低库存状态的项 (扣减后、提交前调用)
pub async fn find_low_stock_among(
    conn: &mut SqliteConnection,
    ids: &[i64],
) -> RepoResult<Vec<InventoryItem>> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }

    // sqlx has no array binding for SQLite; build the placeholder list
    let placeholders = vec!["?"; ids.len()].join(", ");
    let sql = format!(
        "SELECT {SELECT_COLUMNS} FROM inventory_items \
         WHERE id IN ({placeholders}) AND quantity <= low_stock_threshold"
    );

    let mut query = sqlx::query_as::<_, InventoryItem>(&sql);
    for id in ids {
        query = query.bind(*id);
    }

    let items = query.fetch_all(conn).await?;
    Ok(items)
}
