//! # 리뷰 데이터베이스 쿼리 모듈
//!
//! 리뷰 목록은 최신순(`created_at DESC`)으로 정렬합니다.
//! 리뷰가 생성/수정/삭제되면 라우트 핸들러가 `refresh_product_rating`을 호출해
//! 상품 평점을 갱신합니다.

use std::collections::BTreeMap;

use crate::error::{is_unique_violation, AppError};
use crate::models::*;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

const REVIEW_COLUMNS: &str = "id, user_id, product_id, text, rating, created_at, updated_at";

fn push_filters(qb: &mut QueryBuilder<'_, Sqlite>, filter: &ReviewFilter) {
    if let Some(product_id) = &filter.product_id {
        qb.push(" AND product_id = ").push_bind(product_id.clone());
    }
    if let Some(user_id) = &filter.user_id {
        qb.push(" AND user_id = ").push_bind(user_id.clone());
    }
    if let Some(min_rating) = filter.min_rating {
        qb.push(" AND rating >= ").push_bind(min_rating);
    }
    if let Some(max_rating) = filter.max_rating {
        qb.push(" AND rating <= ").push_bind(max_rating);
    }
}

/// 필터에 맞는 리뷰 한 페이지와 전체 개수를 반환합니다.
pub async fn list_reviews(
    pool: &SqlitePool,
    filter: &ReviewFilter,
    page: Page,
) -> Result<(Vec<Review>, i64), AppError> {
    let mut count_qb: QueryBuilder<Sqlite> =
        QueryBuilder::new("SELECT COUNT(*) FROM reviews WHERE deleted_at IS NULL");
    push_filters(&mut count_qb, filter);
    let total = count_qb.build_query_scalar::<i64>().fetch_one(pool).await?;

    let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new(format!(
        "SELECT {} FROM reviews WHERE deleted_at IS NULL",
        REVIEW_COLUMNS
    ));
    push_filters(&mut qb, filter);
    qb.push(" ORDER BY created_at DESC, id DESC LIMIT ")
        .push_bind(page.limit())
        .push(" OFFSET ")
        .push_bind(page.offset());

    let reviews = qb.build_query_as::<Review>().fetch_all(pool).await?;

    Ok((reviews, total))
}

pub async fn get_review(pool: &SqlitePool, id: &str) -> Result<Option<Review>, AppError> {
    let review = sqlx::query_as::<_, Review>(&format!(
        "SELECT {} FROM reviews WHERE id = ? AND deleted_at IS NULL",
        REVIEW_COLUMNS
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(review)
}

/// 사용자가 해당 상품에 남긴 (삭제되지 않은) 리뷰를 찾습니다.
pub async fn find_user_review(
    pool: &SqlitePool,
    user_id: &str,
    product_id: &str,
) -> Result<Option<Review>, AppError> {
    let review = sqlx::query_as::<_, Review>(&format!(
        "SELECT {} FROM reviews WHERE user_id = ? AND product_id = ? AND deleted_at IS NULL",
        REVIEW_COLUMNS
    ))
    .bind(user_id)
    .bind(product_id)
    .fetch_optional(pool)
    .await?;

    Ok(review)
}

pub async fn create_review(
    pool: &SqlitePool,
    user_id: &str,
    req: &CreateReviewRequest,
) -> Result<Review, AppError> {
    let id = uuid::Uuid::now_v7().to_string();

    sqlx::query(
        r#"
        INSERT INTO reviews (id, user_id, product_id, text, rating)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(&id)
    .bind(user_id)
    .bind(&req.product_id)
    .bind(&req.text)
    .bind(req.rating)
    .execute(pool)
    .await
    .map_err(|e| {
        // idx_reviews_user_product_live: 삭제되지 않은 리뷰는 사용자/상품당 하나
        if is_unique_violation(&e) {
            AppError::BadRequest("You have already reviewed this product".to_string())
        } else {
            AppError::Database(e)
        }
    })?;

    get_review(pool, &id)
        .await?
        .ok_or(AppError::Internal("Failed to retrieve created review".to_string()))
}

pub async fn update_review(
    pool: &SqlitePool,
    id: &str,
    req: &UpdateReviewRequest,
) -> Result<Option<Review>, AppError> {
    let result = sqlx::query(
        r#"
        UPDATE reviews
        SET text = COALESCE(?, text),
            rating = COALESCE(?, rating),
            updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
        WHERE id = ? AND deleted_at IS NULL
        "#,
    )
    .bind(&req.text)
    .bind(req.rating)
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Ok(None);
    }

    get_review(pool, id).await
}

pub async fn delete_review(pool: &SqlitePool, id: &str) -> Result<bool, AppError> {
    let result = sqlx::query(
        r#"
        UPDATE reviews
        SET deleted_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
        WHERE id = ? AND deleted_at IS NULL
        "#,
    )
    .bind(id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// 상품의 평균 평점, 리뷰 수, 등급별 개수를 계산합니다.
pub async fn review_statistics(
    pool: &SqlitePool,
    product_id: &str,
) -> Result<ReviewStatistics, AppError> {
    let (average, total): (Option<f64>, i64) = sqlx::query_as(
        r#"
        SELECT AVG(rating), COUNT(*)
        FROM reviews
        WHERE product_id = ? AND deleted_at IS NULL
        "#,
    )
    .bind(product_id)
    .fetch_one(pool)
    .await?;

    let grouped: Vec<(i64, i64)> = sqlx::query_as(
        r#"
        SELECT rating, COUNT(*)
        FROM reviews
        WHERE product_id = ? AND deleted_at IS NULL
        GROUP BY rating
        "#,
    )
    .bind(product_id)
    .fetch_all(pool)
    .await?;

    // 1~5 모든 등급을 0으로 채운 뒤 실제 개수로 덮어씁니다.
    let mut rating_counts: BTreeMap<String, i64> =
        (1..=5).map(|r| (format!("{}_star", r), 0)).collect();
    for (rating, count) in grouped {
        rating_counts.insert(format!("{}_star", rating), count);
    }

    Ok(ReviewStatistics {
        product_id: product_id.to_string(),
        average_rating: round_to_tenth(average.unwrap_or(0.0)),
        total_reviews: total,
        rating_counts,
    })
}

fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
