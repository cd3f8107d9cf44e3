//! # 장바구니 데이터베이스 쿼리 모듈
//!
//! 모든 쿼리는 `user_id` 조건을 포함하므로 다른 사용자의 항목에는 접근할 수 없습니다.
//! `(user_id, product_id)`에 UNIQUE 제약이 있어 같은 상품은 한 행으로 유지됩니다.

use crate::error::AppError;
use crate::models::*;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

/// 장바구니 항목과 상품을 JOIN한 평면(flat) 행
#[derive(Debug, sqlx::FromRow)]
struct CartItemRow {
    id: String,
    user_id: String,
    product_id: String,
    quantity: i64,
    product_name: String,
    product_category_id: String,
    product_price: f64,
    product_rating: f64,
    product_created_at: String,
    product_updated_at: String,
}

impl From<CartItemRow> for CartItemDetail {
    fn from(row: CartItemRow) -> Self {
        Self {
            product: Product {
                id: row.product_id.clone(),
                name: row.product_name,
                category_id: row.product_category_id,
                price: row.product_price,
                rating: row.product_rating,
                created_at: row.product_created_at,
                updated_at: row.product_updated_at,
            },
            item: CartItem {
                id: row.id,
                user_id: row.user_id,
                product_id: row.product_id,
                quantity: row.quantity,
            },
        }
    }
}

const DETAIL_SELECT: &str = r#"
    SELECT c.id, c.user_id, c.product_id, c.quantity,
           p.name AS product_name, p.category_id AS product_category_id,
           p.price AS product_price, p.rating AS product_rating,
           p.created_at AS product_created_at, p.updated_at AS product_updated_at
    FROM cart_items c
    JOIN products p ON p.id = c.product_id
"#;

fn push_filters(qb: &mut QueryBuilder<'_, Sqlite>, user_id: &str, filter: &CartFilter) {
    qb.push(" WHERE c.user_id = ").push_bind(user_id.to_string());
    if let Some(product_id) = &filter.product_id {
        qb.push(" AND c.product_id = ").push_bind(product_id.clone());
    }
    if let Some(min_quantity) = filter.min_quantity {
        qb.push(" AND c.quantity >= ").push_bind(min_quantity);
    }
    if let Some(max_quantity) = filter.max_quantity {
        qb.push(" AND c.quantity <= ").push_bind(max_quantity);
    }
}

/// 장바구니에 상품을 담습니다.
///
/// 이미 담긴 상품이면 `ON CONFLICT ... DO UPDATE`로 수량을 더합니다.
/// 조회와 삽입 사이에 경쟁 조건이 생기지 않도록 한 문장으로 처리합니다.
pub async fn add_cart_item(
    pool: &SqlitePool,
    user_id: &str,
    product_id: &str,
    quantity: i64,
) -> Result<CartItem, AppError> {
    let id = uuid::Uuid::now_v7().to_string();

    sqlx::query(
        r#"
        INSERT INTO cart_items (id, user_id, product_id, quantity)
        VALUES (?, ?, ?, ?)
        ON CONFLICT(user_id, product_id)
        DO UPDATE SET quantity = cart_items.quantity + excluded.quantity
        "#,
    )
    .bind(&id)
    .bind(user_id)
    .bind(product_id)
    .bind(quantity)
    .execute(pool)
    .await?;

    let item = sqlx::query_as::<_, CartItem>(
        "SELECT id, user_id, product_id, quantity FROM cart_items WHERE user_id = ? AND product_id = ?",
    )
    .bind(user_id)
    .bind(product_id)
    .fetch_one(pool)
    .await?;

    Ok(item)
}

pub async fn list_cart_items(
    pool: &SqlitePool,
    user_id: &str,
    filter: &CartFilter,
    page: Page,
) -> Result<(Vec<CartItemDetail>, i64), AppError> {
    let mut count_qb: QueryBuilder<Sqlite> = QueryBuilder::new("SELECT COUNT(*) FROM cart_items c");
    push_filters(&mut count_qb, user_id, filter);
    let total = count_qb.build_query_scalar::<i64>().fetch_one(pool).await?;

    let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new(DETAIL_SELECT);
    push_filters(&mut qb, user_id, filter);
    qb.push(" ORDER BY c.id LIMIT ")
        .push_bind(page.limit())
        .push(" OFFSET ")
        .push_bind(page.offset());

    let rows = qb.build_query_as::<CartItemRow>().fetch_all(pool).await?;

    Ok((rows.into_iter().map(CartItemDetail::from).collect(), total))
}

pub async fn get_cart_item(
    pool: &SqlitePool,
    user_id: &str,
    id: &str,
) -> Result<Option<CartItemDetail>, AppError> {
    let row = sqlx::query_as::<_, CartItemRow>(&format!(
        "{} WHERE c.id = ? AND c.user_id = ?",
        DETAIL_SELECT
    ))
    .bind(id)
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(CartItemDetail::from))
}

/// 수량을 변경합니다. `quantity`가 None이면 값은 그대로 두고 항목만 반환합니다.
pub async fn update_cart_item(
    pool: &SqlitePool,
    user_id: &str,
    id: &str,
    quantity: Option<i64>,
) -> Result<Option<CartItem>, AppError> {
    if let Some(quantity) = quantity {
        sqlx::query("UPDATE cart_items SET quantity = ? WHERE id = ? AND user_id = ?")
            .bind(quantity)
            .bind(id)
            .bind(user_id)
            .execute(pool)
            .await?;
    }

    let item = sqlx::query_as::<_, CartItem>(
        "SELECT id, user_id, product_id, quantity FROM cart_items WHERE id = ? AND user_id = ?",
    )
    .bind(id)
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    Ok(item)
}

pub async fn delete_cart_item(pool: &SqlitePool, user_id: &str, id: &str) -> Result<bool, AppError> {
    let result = sqlx::query("DELETE FROM cart_items WHERE id = ? AND user_id = ?")
        .bind(id)
        .bind(user_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// 사용자의 장바구니를 비웁니다. 삭제된 항목 수를 반환합니다.
pub async fn clear_cart(pool: &SqlitePool, user_id: &str) -> Result<u64, AppError> {
    let result = sqlx::query("DELETE FROM cart_items WHERE user_id = ?")
        .bind(user_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}

/// 장바구니에 담긴 상품 수량의 합계 (비어 있으면 0)
pub async fn cart_quantity_total(pool: &SqlitePool, user_id: &str) -> Result<i64, AppError> {
    let total = sqlx::query_scalar::<_, i64>(
        "SELECT COALESCE(SUM(quantity), 0) FROM cart_items WHERE user_id = ?",
    )
    .bind(user_id)
    .fetch_one(pool)
    .await?;

    Ok(total)
}
