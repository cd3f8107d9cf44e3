//! # 프로모션 데이터베이스 쿼리 모듈
//!
//! 프로모션과 상품은 `promotion_products` 중간 테이블로 연결됩니다.
//! 상품 연결은 항상 "전체 교체" 방식이며, 트랜잭션 안에서 DELETE 후 INSERT 합니다.
//! 프로모션 생성 시에는 행 INSERT와 상품 연결이 한 트랜잭션으로 묶입니다.
//!
//! 활성 여부는 `start_date <= now AND end_date >= now`로 판단합니다.
//! 날짜 컬럼은 고정 형식의 UTC 문자열이므로 문자열 비교로 충분합니다.

use crate::error::AppError;
use crate::models::*;
use sqlx::{QueryBuilder, Sqlite, SqliteConnection, SqlitePool};

const PROMOTION_COLUMNS: &str = "id, name, description, url, image_path, image_url, \
     start_date, end_date, created_at, updated_at";

/// INSERT할 프로모션 값. 날짜는 이미 정규화된 타임스탬프 문자열입니다.
#[derive(Debug)]
pub struct NewPromotion<'a> {
    pub id: &'a str,
    pub name: &'a str,
    pub description: &'a str,
    pub url: Option<&'a str>,
    pub image_path: Option<&'a str>,
    pub image_url: Option<&'a str>,
    pub start_date: &'a str,
    pub end_date: &'a str,
}

/// 부분 업데이트 값. None인 필드는 기존 값을 유지합니다.
#[derive(Debug, Default)]
pub struct PromotionChanges {
    pub name: Option<String>,
    pub description: Option<String>,
    pub url: Option<String>,
    pub image_path: Option<String>,
    pub image_url: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

fn push_filters(qb: &mut QueryBuilder<'_, Sqlite>, filter: &PromotionFilter, now: &str) {
    if filter.active_only {
        qb.push(" AND start_date <= ")
            .push_bind(now.to_string())
            .push(" AND end_date >= ")
            .push_bind(now.to_string());
    }
    if let Some(product_id) = &filter.product_id {
        qb.push(
            " AND EXISTS (SELECT 1 FROM promotion_products pp \
             WHERE pp.promotion_id = promotions.id AND pp.product_id = ",
        )
        .push_bind(product_id.clone())
        .push(")");
    }
}

/// `skip`/`limit` 방식으로 프로모션 목록과 전체 개수를 조회합니다.
pub async fn list_promotions(
    pool: &SqlitePool,
    filter: &PromotionFilter,
    now: &str,
) -> Result<(Vec<Promotion>, i64), AppError> {
    let mut count_qb: QueryBuilder<Sqlite> =
        QueryBuilder::new("SELECT COUNT(*) FROM promotions WHERE deleted_at IS NULL");
    push_filters(&mut count_qb, filter, now);
    let total = count_qb.build_query_scalar::<i64>().fetch_one(pool).await?;

    let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new(format!(
        "SELECT {} FROM promotions WHERE deleted_at IS NULL",
        PROMOTION_COLUMNS
    ));
    push_filters(&mut qb, filter, now);
    qb.push(" ORDER BY start_date DESC, id LIMIT ")
        .push_bind(filter.limit)
        .push(" OFFSET ")
        .push_bind(filter.skip);

    let promotions = qb.build_query_as::<Promotion>().fetch_all(pool).await?;

    Ok((promotions, total))
}

/// 현재 진행 중인 프로모션 (시작일 순)
pub async fn list_active_promotions(pool: &SqlitePool, now: &str) -> Result<Vec<Promotion>, AppError> {
    let promotions = sqlx::query_as::<_, Promotion>(&format!(
        r#"
        SELECT {}
        FROM promotions
        WHERE deleted_at IS NULL AND start_date <= ? AND end_date >= ?
        ORDER BY start_date, id
        "#,
        PROMOTION_COLUMNS
    ))
    .bind(now)
    .bind(now)
    .fetch_all(pool)
    .await?;

    Ok(promotions)
}

/// 특정 상품이 연결된 프로모션 목록
pub async fn list_product_promotions(
    pool: &SqlitePool,
    product_id: &str,
) -> Result<Vec<Promotion>, AppError> {
    let promotions = sqlx::query_as::<_, Promotion>(
        r#"
        SELECT p.id, p.name, p.description, p.url, p.image_path, p.image_url,
               p.start_date, p.end_date, p.created_at, p.updated_at
        FROM promotions p
        JOIN promotion_products pp ON pp.promotion_id = p.id
        WHERE pp.product_id = ? AND p.deleted_at IS NULL
        ORDER BY p.start_date DESC, p.id
        "#,
    )
    .bind(product_id)
    .fetch_all(pool)
    .await?;

    Ok(promotions)
}

pub async fn get_promotion(pool: &SqlitePool, id: &str) -> Result<Option<Promotion>, AppError> {
    let promotion = sqlx::query_as::<_, Promotion>(&format!(
        "SELECT {} FROM promotions WHERE id = ? AND deleted_at IS NULL",
        PROMOTION_COLUMNS
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(promotion)
}

/// 프로모션 행을 INSERT 합니다. 상품 연결과 같은 트랜잭션에서 호출합니다.
pub async fn insert_promotion(conn: &mut SqliteConnection, new: &NewPromotion<'_>) -> Result<(), AppError> {
    sqlx::query(
        r#"
        INSERT INTO promotions
            (id, name, description, url, image_path, image_url, start_date, end_date)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(new.id)
    .bind(new.name)
    .bind(new.description)
    .bind(new.url)
    .bind(new.image_path)
    .bind(new.image_url)
    .bind(new.start_date)
    .bind(new.end_date)
    .execute(conn)
    .await?;

    Ok(())
}

pub async fn update_promotion(
    pool: &SqlitePool,
    id: &str,
    changes: &PromotionChanges,
) -> Result<Option<Promotion>, AppError> {
    let result = sqlx::query(
        r#"
        UPDATE promotions
        SET name = COALESCE(?, name),
            description = COALESCE(?, description),
            url = COALESCE(?, url),
            image_path = COALESCE(?, image_path),
            image_url = COALESCE(?, image_url),
            start_date = COALESCE(?, start_date),
            end_date = COALESCE(?, end_date),
            updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
        WHERE id = ? AND deleted_at IS NULL
        "#,
    )
    .bind(&changes.name)
    .bind(&changes.description)
    .bind(&changes.url)
    .bind(&changes.image_path)
    .bind(&changes.image_url)
    .bind(&changes.start_date)
    .bind(&changes.end_date)
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Ok(None);
    }

    get_promotion(pool, id).await
}

pub async fn delete_promotion(pool: &SqlitePool, id: &str) -> Result<bool, AppError> {
    let result = sqlx::query(
        r#"
        UPDATE promotions
        SET deleted_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
        WHERE id = ? AND deleted_at IS NULL
        "#,
    )
    .bind(id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// 주어진 ID 중 실제로 존재하는(삭제되지 않은) 상품 ID만 입력 순서대로 돌려줍니다.
/// 중복 ID는 한 번만 남깁니다.
pub async fn existing_product_ids(
    pool: &SqlitePool,
    product_ids: &[String],
) -> Result<Vec<String>, AppError> {
    let mut existing = Vec::with_capacity(product_ids.len());
    for product_id in product_ids {
        if existing.contains(product_id) {
            continue;
        }
        if crate::db::get_product(pool, product_id).await?.is_some() {
            existing.push(product_id.clone());
        }
    }
    Ok(existing)
}

/// 프로모션에 연결된 상품을 `product_ids`로 통째로 교체합니다.
/// 호출하는 쪽이 연 트랜잭션 안에서 실행됩니다.
pub async fn link_promotion_products(
    conn: &mut SqliteConnection,
    promotion_id: &str,
    product_ids: &[String],
) -> Result<(), AppError> {
    sqlx::query("DELETE FROM promotion_products WHERE promotion_id = ?")
        .bind(promotion_id)
        .execute(&mut *conn)
        .await?;

    for product_id in product_ids {
        sqlx::query(
            "INSERT OR IGNORE INTO promotion_products (promotion_id, product_id) VALUES (?, ?)",
        )
        .bind(promotion_id)
        .bind(product_id)
        .execute(&mut *conn)
        .await?;
    }

    Ok(())
}

pub async fn replace_promotion_products(
    pool: &SqlitePool,
    promotion_id: &str,
    product_ids: &[String],
) -> Result<(), AppError> {
    let mut tx = pool.begin().await?;
    link_promotion_products(&mut *tx, promotion_id, product_ids).await?;
    tx.commit().await?;
    Ok(())
}

/// 프로모션에 연결된 상품 요약 목록. 삭제된 상품은 제외합니다.
pub async fn promotion_products(
    pool: &SqlitePool,
    promotion_id: &str,
) -> Result<Vec<PromotionProduct>, AppError> {
    let products = sqlx::query_as::<_, PromotionProduct>(
        r#"
        SELECT p.id AS product_id, p.name, p.price, p.rating
        FROM promotion_products pp
        JOIN products p ON p.id = pp.product_id
        WHERE pp.promotion_id = ? AND p.deleted_at IS NULL
        ORDER BY p.name, p.id
        "#,
    )
    .bind(promotion_id)
    .fetch_all(pool)
    .await?;

    Ok(products)
}

/// 프로모션 엔티티에 연결 상품 목록을 붙여 응답 형태로 만듭니다.
pub async fn with_products(
    pool: &SqlitePool,
    promotion: Promotion,
) -> Result<PromotionResponse, AppError> {
    let products = promotion_products(pool, &promotion.id).await?;
    Ok(PromotionResponse { promotion, products })
}
