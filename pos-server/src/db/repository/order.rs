//! Order persistence
//!
//! `insert_with_items` runs on the caller's connection so the order row,
//! its frozen line items and the stock deductions all commit (or roll
//! back) together.

use shared::models::{Order, OrderLine, OrderStatus};
use sqlx::{SqliteConnection, SqlitePool};

use super::RepoResult;

const SELECT_COLUMNS: &str = "id, order_number, total, status, created_at";

/// 插入订单及其冻结行项 (事务内)
///
/// 返回新订单的 rowid。
pub async fn insert_with_items(
    conn: &mut SqliteConnection,
    order_number: &str,
    total: f64,
    status: OrderStatus,
    created_at: i64,
    items: &[OrderLine],
) -> RepoResult<i64> {
    let result = sqlx::query(
        "INSERT INTO orders (order_number, total, status, created_at) VALUES (?, ?, ?, ?)",
    )
    .bind(order_number)
    .bind(total)
    .bind(status)
    .bind(created_at)
    .execute(&mut *conn)
    .await?;
    let order_id = result.last_insert_rowid();

    for line in items {
        sqlx::query(
            "INSERT INTO order_items (order_id, menu_item_id, name, unit_price, quantity) \
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(order_id)
        .bind(line.menu_item_id)
        .bind(&line.name)
        .bind(line.unit_price)
        .bind(line.quantity)
        .execute(&mut *conn)
        .await?;
    }

    Ok(order_id)
}

/// 按订单号查订单 (不含行项)
pub async fn find_by_number(
    conn: &mut SqliteConnection,
    order_number: &str,
) -> RepoResult<Option<Order>> {
    let order = sqlx::query_as::<_, Order>(&format!(
        "SELECT {SELECT_COLUMNS} FROM orders WHERE order_number = ?"
    ))
    .bind(order_number)
    .fetch_optional(conn)
    .await?;
    Ok(order)
}

/// 查订单行项 (取消回冲与详情 API 共用)
pub async fn find_items(conn: &mut SqliteConnection, order_id: i64) -> RepoResult<Vec<OrderLine>> {
    let items = sqlx::query_as::<_, OrderLine>(
        "SELECT menu_item_id, name, unit_price, quantity FROM order_items \
         WHERE order_id = ? ORDER BY id",
    )
    .bind(order_id)
    .fetch_all(conn)
    .await?;
    Ok(items)
}

/// 按订单号查订单并装载行项
pub async fn find_by_number_with_items(
    conn: &mut SqliteConnection,
    order_number: &str,
) -> RepoResult<Option<Order>> {
    let Some(mut order) = find_by_number(&mut *conn, order_number).await? else {
        return Ok(None);
    };
    order.items = find_items(conn, order.id).await?;
    Ok(Some(order))
}

/// 更新订单状态；返回是否有行受影响
pub async fn update_status(
    conn: &mut SqliteConnection,
    order_id: i64,
    status: OrderStatus,
) -> RepoResult<bool> {
    let result = sqlx::query("UPDATE orders SET status = ? WHERE id = ?")
        .bind(status)
        .bind(order_id)
        .execute(conn)
        .await?;
    Ok(result.rows_affected() == 1)
}

/// 订单列表，可按状态与创建时间范围 (毫秒) 过滤
///
/// 行项随单装载：厨房显示屏需要完整的菜品清单。
pub async fn list(
    pool: &SqlitePool,
    status: Option<OrderStatus>,
    from_millis: Option<i64>,
    to_millis: Option<i64>,
) -> RepoResult<Vec<Order>> {
    let mut sql = format!("SELECT {SELECT_COLUMNS} FROM orders WHERE 1=1");
    if status.is_some() {
        sql.push_str(" AND status = ?");
    }
    if from_millis.is_some() {
        sql.push_str(" AND created_at >= ?");
    }
    if to_millis.is_some() {
        sql.push_str(" AND created_at <= ?");
    }
    sql.push_str(" ORDER BY created_at DESC");

    let mut query = sqlx::query_as::<_, Order>(&sql);
    if let Some(status) = status {
        query = query.bind(status);
    }
    if let Some(from) = from_millis {
        query = query.bind(from);
    }
    if let Some(to) = to_millis {
        query = query.bind(to);
    }

    let mut orders = query.fetch_all(pool).await?;

    let mut conn = pool.acquire().await.map_err(super::RepoError::from)?;
    for order in &mut orders {
        order.items = find_items(&mut conn, order.id).await?;
    }
    Ok(orders)
}
