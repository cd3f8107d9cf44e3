//! # 카테고리 모델 정의
//!
//! - `Category`: DB의 `categories` 테이블 한 행 (응답용)
//! - `CreateCategoryRequest`: `POST /api/v1/category` 요청 본문
//! - `UpdateCategoryRequest`: `PUT /api/v1/category/{id}` 요청 본문 (부분 업데이트)

use serde::{Deserialize, Serialize};

/// 카테고리 엔티티
///
/// `deleted_at`은 조회 쿼리에서 항상 `IS NULL`로 걸러지므로 구조체에 포함하지 않습니다.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Category {
    #[serde(rename = "category_id")]
    pub id: String,
    pub name: String,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateCategoryRequest {
    pub name: String,
}

/// 모든 필드가 Option: 보낸 필드만 변경합니다.
#[derive(Debug, Deserialize)]
pub struct UpdateCategoryRequest {
    pub name: Option<String>,
}
