//! Recipe (menu_item_ingredients) queries
//!
//! Read-only: recipe editing is an admin CRUD concern outside the
//! fulfillment core.

use shared::models::RecipeLine;
use sqlx::{SqliteConnection, SqlitePool};

use super::RepoResult;

/// 查某菜单项的配方行，join 库存表取原料名称
///
/// 空结果不是错误：无配方 = 不跟踪库存的菜单项。
pub async fn find_by_menu_item(
    conn: &mut SqliteConnection,
    menu_item_id: i64,
) -> RepoResult<Vec<RecipeLine>> {
    let lines = sqlx::query_as::<_, RecipeLine>(
        "SELECT r.menu_item_id, r.inventory_item_id, r.quantity_needed, r.unit_needed, \
                i.name AS inventory_item_name \
         FROM menu_item_ingredients r \
         JOIN inventory_items i ON i.id = r.inventory_item_id \
         WHERE r.menu_item_id = ? \
         ORDER BY r.inventory_item_id",
    )
    .bind(menu_item_id)
    .fetch_all(conn)
    .await?;
    Ok(lines)
}

/// Pool 版本，供只读 API (`GET /api/menu/{id}/recipe`) 使用
pub async fn find_by_menu_item_pool(
    pool: &SqlitePool,
    menu_item_id: i64,
) -> RepoResult<Vec<RecipeLine>> {
    let mut conn = pool.acquire().await.map_err(super::RepoError::from)?;
    find_by_menu_item(&mut conn, menu_item_id).await
}
