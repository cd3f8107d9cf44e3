//! # 프로모션 모델 정의
//!
//! 프로모션은 기간(start_date ~ end_date)을 가진 기획전이며,
//! `promotion_products` 중간 테이블로 여러 상품과 N:M 관계를 맺습니다.
//!
//! ## 날짜 입력 형식
//! 요청의 날짜는 문자열로 받아 `services::timestamps::parse_timestamp`로 해석합니다.
//! RFC 3339(`2025-01-01T00:00:00Z`)와 시간대 없는 ISO 8601(`2025-01-01T00:00:00`, UTC로 간주)을 모두 허용합니다.

use serde::{Deserialize, Serialize};

/// 프로모션 엔티티: DB의 `promotions` 테이블 한 행
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Promotion {
    #[serde(rename = "promotion_id")]
    pub id: String,
    pub name: String,
    pub description: String,
    pub url: Option<String>,
    /// 디스크상의 이미지 경로. 서버 내부 정보이므로 응답에서 제외합니다.
    #[serde(skip_serializing, default)]
    pub image_path: Option<String>,
    pub image_url: Option<String>,
    pub start_date: String,
    pub end_date: String,
    pub created_at: String,
    pub updated_at: String,
}

/// 프로모션에 연결된 상품 요약 정보
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct PromotionProduct {
    pub product_id: String,
    pub name: String,
    pub price: f64,
    pub rating: f64,
}

/// 프로모션 응답: 엔티티 필드 + 연결된 상품 목록
#[derive(Debug, Clone, Serialize)]
pub struct PromotionResponse {
    #[serde(flatten)]
    pub promotion: Promotion,
    pub products: Vec<PromotionProduct>,
}

#[derive(Debug, Deserialize)]
pub struct CreatePromotionRequest {
    pub name: String,
    pub description: String,
    pub url: Option<String>,
    pub start_date: String,
    pub end_date: String,
    /// base64로 인코딩된 이미지 (선택)
    pub image_base64: Option<String>,
    #[serde(default)]
    pub product_ids: Vec<String>,
}

/// 부분 업데이트. `product_ids`가 Some이면 연결 상품 전체를 교체합니다.
#[derive(Debug, Deserialize)]
pub struct UpdatePromotionRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub url: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub image_base64: Option<String>,
    pub product_ids: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
pub struct PromotionProductsRequest {
    pub product_ids: Vec<String>,
}

/// `GET /api/v1/promotion` 쿼리 파라미터
#[derive(Debug, Deserialize)]
pub struct PromotionFilter {
    #[serde(default)]
    pub active_only: bool,
    pub product_id: Option<String>,
    #[serde(default)]
    pub skip: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_limit() -> i64 {
    100
}

#[derive(Debug, Serialize)]
pub struct PromotionList {
    pub items: Vec<PromotionResponse>,
    pub total: i64,
}
