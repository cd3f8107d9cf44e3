//! # 카테고리 데이터베이스 쿼리 모듈
//!
//! `categories` 테이블의 CRUD 쿼리입니다. 삭제는 soft delete이며,
//! 이름은 UNIQUE 제약이 걸려 있어 중복 시 400 에러로 변환합니다.

use crate::error::{is_unique_violation, AppError};
use crate::models::*;
use sqlx::SqlitePool;

fn duplicate_name(name: &str) -> AppError {
    AppError::BadRequest(format!("Category with name '{}' already exists", name))
}

/// 삭제되지 않은 카테고리 수
pub async fn count_categories(pool: &SqlitePool) -> Result<i64, AppError> {
    let total = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM categories WHERE deleted_at IS NULL",
    )
    .fetch_one(pool)
    .await?;

    Ok(total)
}

/// 카테고리를 이름순으로 한 페이지 조회합니다.
pub async fn list_categories(pool: &SqlitePool, page: Page) -> Result<Vec<Category>, AppError> {
    let categories = sqlx::query_as::<_, Category>(
        r#"
        SELECT id, name, created_at, updated_at
        FROM categories
        WHERE deleted_at IS NULL
        ORDER BY name
        LIMIT ? OFFSET ?
        "#,
    )
    .bind(page.limit())
    .bind(page.offset())
    .fetch_all(pool)
    .await?;

    Ok(categories)
}

pub async fn get_category(pool: &SqlitePool, id: &str) -> Result<Option<Category>, AppError> {
    let category = sqlx::query_as::<_, Category>(
        r#"
        SELECT id, name, created_at, updated_at
        FROM categories
        WHERE id = ? AND deleted_at IS NULL
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(category)
}

/// soft delete 여부와 관계없이 카테고리를 조회합니다.
/// 삭제된 카테고리에 속한 상품의 상세 응답에 사용합니다.
pub async fn get_category_any(pool: &SqlitePool, id: &str) -> Result<Option<Category>, AppError> {
    let category = sqlx::query_as::<_, Category>(
        "SELECT id, name, created_at, updated_at FROM categories WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(category)
}

/// 새 카테고리를 생성합니다.
///
/// 같은 이름이 이미 있으면 (soft delete된 것 포함) `BadRequest`를 반환합니다.
pub async fn create_category(pool: &SqlitePool, name: &str) -> Result<Category, AppError> {
    let id = uuid::Uuid::now_v7().to_string();

    sqlx::query("INSERT INTO categories (id, name) VALUES (?, ?)")
        .bind(&id)
        .bind(name)
        .execute(pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                duplicate_name(name)
            } else {
                AppError::Database(e)
            }
        })?;

    get_category(pool, &id)
        .await?
        .ok_or(AppError::Internal("Failed to retrieve created category".to_string()))
}

/// 카테고리를 부분 업데이트합니다.
///
/// ## 반환값
/// - `Ok(Some(Category))`: 업데이트 성공 (변경할 필드가 없으면 그대로 반환)
/// - `Ok(None)`: 해당 ID의 카테고리가 없음
pub async fn update_category(
    pool: &SqlitePool,
    id: &str,
    req: &UpdateCategoryRequest,
) -> Result<Option<Category>, AppError> {
    if get_category(pool, id).await?.is_none() {
        return Ok(None);
    }

    if let Some(name) = &req.name {
        sqlx::query(
            r#"
            UPDATE categories
            SET name = ?, updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
            WHERE id = ? AND deleted_at IS NULL
            "#,
        )
        .bind(name)
        .bind(id)
        .execute(pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                duplicate_name(name)
            } else {
                AppError::Database(e)
            }
        })?;
    }

    get_category(pool, id).await
}

/// 카테고리를 soft delete합니다. 삭제된 행이 없으면 `false`.
pub async fn delete_category(pool: &SqlitePool, id: &str) -> Result<bool, AppError> {
    let result = sqlx::query(
        r#"
        UPDATE categories
        SET deleted_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
        WHERE id = ? AND deleted_at IS NULL
        "#,
    )
    .bind(id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}
