//! Menu item queries (read-only; menu CRUD lives outside the core)

use shared::models::MenuItem;
use sqlx::{SqliteConnection, SqlitePool};

use super::RepoResult;

/// 全量菜单 (收银端展示用)
pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<MenuItem>> {
    let items = sqlx::query_as::<_, MenuItem>(
        "SELECT id, name, price, image FROM menu_items ORDER BY name",
    )
    .fetch_all(pool)
    .await?;
    Ok(items)
}

/// 按 ID 查单个菜单项 (事务内使用，下单时冻结名称/单价)
pub async fn find_by_id(conn: &mut SqliteConnection, id: i64) -> RepoResult<Option<MenuItem>> {
    let item =
        sqlx::query_as::<_, MenuItem>("SELECT id, name, price, image FROM menu_items WHERE id = ?")
            .bind(id)
            .fetch_optional(conn)
            .await?;
    Ok(item)
}
