//! # 장바구니 API 라우트 핸들러
//!
//! 모든 엔드포인트는 인증이 필요하며 현재 사용자의 장바구니만 다룹니다.
//!
//! | 메서드 | 경로 | 설명 |
//! |--------|------|------|
//! | POST | /api/v1/cart/items | 상품 담기 (201, 이미 있으면 수량 합산) |
//! | GET | /api/v1/cart/items | 장바구니 목록 (상품 정보 포함) |
//! | DELETE | /api/v1/cart/items | 장바구니 비우기 (204) |
//! | GET | /api/v1/cart/items/{id} | 항목 조회 |
//! | PUT | /api/v1/cart/items/{id} | 수량 변경 |
//! | DELETE | /api/v1/cart/items/{id} | 항목 삭제 (204) |
//! | GET | /api/v1/cart/count | 담긴 수량 합계 |

use crate::{app::AppState, db, error::AppError, middleware::auth::AuthUser, models::*};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/items",
            get(list_cart_items).post(add_cart_item).delete(clear_cart),
        )
        .route(
            "/items/{id}",
            get(get_cart_item).put(update_cart_item).delete(delete_cart_item),
        )
        .route("/count", get(cart_count))
}

fn validate_quantity(quantity: i64) -> Result<(), AppError> {
    if quantity < 1 {
        return Err(AppError::BadRequest("Quantity must be at least 1".to_string()));
    }
    Ok(())
}

pub async fn add_cart_item(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Json(req): Json<AddCartItemRequest>,
) -> Result<(StatusCode, Json<CartItem>), AppError> {
    validate_quantity(req.quantity)?;
    if db::get_product(&state.pool, &req.product_id).await?.is_none() {
        return Err(AppError::not_found("Product", &req.product_id));
    }

    let item = db::add_cart_item(&state.pool, &auth_user.user_id, &req.product_id, req.quantity).await?;

    Ok((StatusCode::CREATED, Json(item)))
}

pub async fn list_cart_items(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Query(params): Query<PaginationParams>,
    Query(filter): Query<CartFilter>,
) -> Result<Json<Paginated<CartItemDetail>>, AppError> {
    let page = params.validate()?;
    let (items, total) = db::list_cart_items(&state.pool, &auth_user.user_id, &filter, page).await?;

    Ok(Json(Paginated::new(items, total, page)))
}

pub async fn get_cart_item(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<CartItemDetail>, AppError> {
    let item = db::get_cart_item(&state.pool, &auth_user.user_id, &id)
        .await?
        .ok_or_else(|| AppError::not_found("Cart item", &id))?;

    Ok(Json(item))
}

pub async fn update_cart_item(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
    Json(req): Json<UpdateCartItemRequest>,
) -> Result<Json<CartItem>, AppError> {
    if let Some(quantity) = req.quantity {
        validate_quantity(quantity)?;
    }

    let item = db::update_cart_item(&state.pool, &auth_user.user_id, &id, req.quantity)
        .await?
        .ok_or_else(|| AppError::not_found("Cart item", &id))?;

    Ok(Json(item))
}

pub async fn delete_cart_item(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    if !db::delete_cart_item(&state.pool, &auth_user.user_id, &id).await? {
        return Err(AppError::not_found("Cart item", &id));
    }

    Ok(StatusCode::NO_CONTENT)
}

pub async fn clear_cart(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<StatusCode, AppError> {
    let removed = db::clear_cart(&state.pool, &auth_user.user_id).await?;
    tracing::debug!(user_id = %auth_user.user_id, removed, "Cart cleared");

    Ok(StatusCode::NO_CONTENT)
}

/// 응답 본문은 JSON 정수 하나입니다. 예: `3`
pub async fn cart_count(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<i64>, AppError> {
    let total = db::cart_quantity_total(&state.pool, &auth_user.user_id).await?;

    Ok(Json(total))
}
