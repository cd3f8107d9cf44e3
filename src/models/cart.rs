//! # 장바구니 모델 정의
//!
//! 장바구니 항목은 사용자별로 격리되며, 같은 상품은 한 행으로 합쳐집니다.
//! 다른 엔티티와 달리 soft delete 없이 실제로 삭제됩니다.

use serde::{Deserialize, Serialize};

use super::Product;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct CartItem {
    #[serde(rename = "cart_item_id")]
    pub id: String,
    pub user_id: String,
    pub product_id: String,
    pub quantity: i64,
}

/// 목록/단건 조회 응답: 항목에 상품 정보를 함께 담습니다.
#[derive(Debug, Clone, Serialize)]
pub struct CartItemDetail {
    #[serde(flatten)]
    pub item: CartItem,
    pub product: Product,
}

#[derive(Debug, Deserialize)]
pub struct AddCartItemRequest {
    pub product_id: String,
    pub quantity: i64,
}

#[derive(Debug, Deserialize)]
pub struct UpdateCartItemRequest {
    pub quantity: Option<i64>,
}

/// `GET /api/v1/cart/items`의 필터
#[derive(Debug, Default, Deserialize)]
pub struct CartFilter {
    pub product_id: Option<String>,
    pub min_quantity: Option<i64>,
    pub max_quantity: Option<i64>,
}
