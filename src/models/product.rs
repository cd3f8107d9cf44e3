//! # 상품 모델 정의
//!
//! 상품(Product)과 목록/검색 API의 필터 파라미터를 정의합니다.

use serde::{Deserialize, Serialize};

use super::Category;

/// 상품 엔티티: DB의 `products` 테이블 한 행에 대응합니다.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Product {
    #[serde(rename = "product_id")]
    pub id: String,
    pub name: String,
    pub category_id: String,
    pub price: f64,
    /// 리뷰 평점의 평균. 리뷰가 없으면 0.
    pub rating: f64,
    pub created_at: String,
    pub updated_at: String,
}

/// 상세 조회 응답: 상품 필드에 소속 카테고리를 함께 담습니다.
#[derive(Debug, Clone, Serialize)]
pub struct ProductDetail {
    #[serde(flatten)]
    pub product: Product,
    pub category: Category,
}

#[derive(Debug, Deserialize)]
pub struct CreateProductRequest {
    pub name: String,
    pub price: f64,
    pub category_id: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateProductRequest {
    pub name: Option<String>,
    pub price: Option<f64>,
    pub category_id: Option<String>,
}

/// 상품 목록 필터: `GET /api/v1/product?name=...&min_price=...`
///
/// 모든 조건은 AND로 결합됩니다. 페이지네이션 파라미터는
/// 별도의 `Query<PaginationParams>`로 추출합니다.
#[derive(Debug, Default, Deserialize)]
pub struct ProductFilter {
    /// 이름 부분 일치 (대소문자 무시)
    pub name: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub min_rating: Option<f64>,
    pub category_id: Option<String>,
}

/// `GET /api/v1/product/search?query=...`의 검색어
#[derive(Debug, Deserialize)]
pub struct ProductSearchQuery {
    pub query: String,
}
