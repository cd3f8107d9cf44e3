//! # 상품 데이터베이스 쿼리 모듈
//!
//! 목록/검색 API는 필터 조합이 다양하므로 `sqlx::QueryBuilder`로
//! WHERE 절을 동적으로 구성합니다. COUNT 쿼리와 SELECT 쿼리가
//! 같은 필터 함수(`push_filters`)를 공유하여 `total`과 `items`가 항상 일치합니다.

use crate::db::escape_like;
use crate::error::AppError;
use crate::models::*;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

const PRODUCT_COLUMNS: &str = "id, name, category_id, price, rating, created_at, updated_at";

/// 필터 조건을 `AND ...` 형태로 덧붙입니다.
/// 호출 전 쿼리는 이미 `WHERE deleted_at IS NULL`로 끝나 있어야 합니다.
fn push_filters(qb: &mut QueryBuilder<'_, Sqlite>, filter: &ProductFilter) {
    if let Some(name) = filter.name.as_deref().filter(|n| !n.is_empty()) {
        qb.push(" AND name_lower LIKE ")
            .push_bind(format!("%{}%", escape_like(&name.to_lowercase())))
            .push(" ESCAPE '\\'");
    }
    if let Some(min_price) = filter.min_price {
        qb.push(" AND price >= ").push_bind(min_price);
    }
    if let Some(max_price) = filter.max_price {
        qb.push(" AND price <= ").push_bind(max_price);
    }
    if let Some(min_rating) = filter.min_rating {
        qb.push(" AND rating >= ").push_bind(min_rating);
    }
    if let Some(category_id) = &filter.category_id {
        qb.push(" AND category_id = ").push_bind(category_id.clone());
    }
}

/// 필터에 맞는 상품 수와 해당 페이지의 상품 목록을 함께 반환합니다.
pub async fn list_products(
    pool: &SqlitePool,
    filter: &ProductFilter,
    page: Page,
) -> Result<(Vec<Product>, i64), AppError> {
    let mut count_qb: QueryBuilder<Sqlite> =
        QueryBuilder::new("SELECT COUNT(*) FROM products WHERE deleted_at IS NULL");
    push_filters(&mut count_qb, filter);
    let total = count_qb.build_query_scalar::<i64>().fetch_one(pool).await?;

    let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new(format!(
        "SELECT {} FROM products WHERE deleted_at IS NULL",
        PRODUCT_COLUMNS
    ));
    push_filters(&mut qb, filter);
    qb.push(" ORDER BY created_at, id LIMIT ")
        .push_bind(page.limit())
        .push(" OFFSET ")
        .push_bind(page.offset());

    let products = qb.build_query_as::<Product>().fetch_all(pool).await?;

    Ok((products, total))
}

pub async fn get_product(pool: &SqlitePool, id: &str) -> Result<Option<Product>, AppError> {
    let product = sqlx::query_as::<_, Product>(&format!(
        "SELECT {} FROM products WHERE id = ? AND deleted_at IS NULL",
        PRODUCT_COLUMNS
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(product)
}

/// 새 상품을 생성합니다. 카테고리 존재 확인은 호출하는 쪽의 책임입니다.
pub async fn create_product(pool: &SqlitePool, req: &CreateProductRequest) -> Result<Product, AppError> {
    let id = uuid::Uuid::now_v7().to_string();

    sqlx::query(
        "INSERT INTO products (id, name, name_lower, category_id, price) VALUES (?, ?, ?, ?, ?)",
    )
    .bind(&id)
    .bind(&req.name)
    .bind(req.name.to_lowercase())
    .bind(&req.category_id)
    .bind(req.price)
    .execute(pool)
    .await?;

    get_product(pool, &id)
        .await?
        .ok_or(AppError::Internal("Failed to retrieve created product".to_string()))
}

/// 상품을 부분 업데이트합니다. `None`인 필드는 COALESCE로 기존 값을 유지합니다.
pub async fn update_product(
    pool: &SqlitePool,
    id: &str,
    req: &UpdateProductRequest,
) -> Result<Option<Product>, AppError> {
    let result = sqlx::query(
        r#"
        UPDATE products
        SET name = COALESCE(?, name),
            name_lower = COALESCE(?, name_lower),
            price = COALESCE(?, price),
            category_id = COALESCE(?, category_id),
            updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
        WHERE id = ? AND deleted_at IS NULL
        "#,
    )
    .bind(&req.name)
    .bind(req.name.as_deref().map(str::to_lowercase))
    .bind(req.price)
    .bind(&req.category_id)
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Ok(None);
    }

    get_product(pool, id).await
}

pub async fn delete_product(pool: &SqlitePool, id: &str) -> Result<bool, AppError> {
    let result = sqlx::query(
        r#"
        UPDATE products
        SET deleted_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
        WHERE id = ? AND deleted_at IS NULL
        "#,
    )
    .bind(id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// 상품 평점을 살아있는 리뷰들의 평균으로 다시 계산합니다. 리뷰가 없으면 0.
pub async fn refresh_product_rating(pool: &SqlitePool, product_id: &str) -> Result<(), AppError> {
    sqlx::query(
        r#"
        UPDATE products
        SET rating = COALESCE(
            (SELECT AVG(rating) FROM reviews WHERE product_id = ? AND deleted_at IS NULL),
            0
        )
        WHERE id = ?
        "#,
    )
    .bind(product_id)
    .bind(product_id)
    .execute(pool)
    .await?;

    Ok(())
}
