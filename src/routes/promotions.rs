//! # 프로모션 API 라우트 핸들러
//!
//! | 메서드 | 경로 | 설명 |
//! |--------|------|------|
//! | POST | /api/v1/promotion | 프로모션 생성 (admin, 201) |
//! | GET | /api/v1/promotion | 목록 (`active_only`, `product_id`, `skip`, `limit`) |
//! | GET | /api/v1/promotion/active | 현재 진행 중인 프로모션 |
//! | GET | /api/v1/promotion/product/{product_id} | 상품이 포함된 프로모션 |
//! | GET | /api/v1/promotion/{id} | 프로모션 조회 |
//! | PUT | /api/v1/promotion/{id} | 부분 수정 (admin) |
//! | DELETE | /api/v1/promotion/{id} | 삭제 (admin, soft delete, 204) |
//! | POST | /api/v1/promotion/{id}/products | 연결 상품 교체 (admin) |
//!
//! 생성/수정 시 존재하지 않는 상품 ID는 조용히 건너뛰지만,
//! `/{id}/products`는 하나라도 없으면 400으로 거부합니다.
//!
//! 이미지(`image_base64`)는 `<STATIC_PATH>/images/promotions/<id>.jpg`에 저장되고
//! 응답의 `image_url`은 `/static/images/promotions/<id>.jpg`가 됩니다.

use crate::{
    app::AppState,
    db::{self, NewPromotion, PromotionChanges},
    error::AppError,
    middleware::auth::AuthUser,
    models::*,
    services::{
        format_timestamp, now_timestamp, parse_timestamp, save_promotion_image, PendingImage,
        StoredImage,
    },
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use url::Url;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_promotions).post(create_promotion))
        .route("/active", get(list_active_promotions))
        .route("/product/{product_id}", get(list_product_promotions))
        .route(
            "/{id}",
            get(get_promotion).put(update_promotion).delete(delete_promotion),
        )
        .route("/{id}/products", post(set_promotion_products))
}

/// 절대 URL(http/https)만 허용합니다.
fn validate_url(value: &str) -> Result<String, AppError> {
    let value = value.trim();
    let parsed = Url::parse(value)
        .map_err(|e| AppError::BadRequest(format!("Invalid URL '{}': {}", value, e)))?;

    match parsed.scheme() {
        "http" | "https" => Ok(value.to_string()),
        scheme => Err(AppError::BadRequest(format!("Unsupported URL scheme: {}", scheme))),
    }
}

fn validate_period(start: &DateTime<Utc>, end: &DateTime<Utc>) -> Result<(), AppError> {
    if end < start {
        return Err(AppError::BadRequest("end_date must be after start_date".to_string()));
    }
    Ok(())
}

/// 빈 문자열은 이미지가 없는 것으로 취급합니다.
fn non_empty_image(image_base64: Option<&str>) -> Option<&str> {
    image_base64.map(str::trim).filter(|s| !s.is_empty())
}

async fn store_image(
    state: &AppState,
    promotion_id: &str,
    image_base64: Option<&str>,
) -> Result<Option<StoredImage>, AppError> {
    match non_empty_image(image_base64) {
        Some(image) => Ok(Some(
            save_promotion_image(&state.static_path, promotion_id, image).await?,
        )),
        None => Ok(None),
    }
}

async fn find_promotion(state: &AppState, id: &str) -> Result<Promotion, AppError> {
    db::get_promotion(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("Promotion", id))
}

async fn with_products_all(
    state: &AppState,
    promotions: Vec<Promotion>,
) -> Result<Vec<PromotionResponse>, AppError> {
    let mut responses = Vec::with_capacity(promotions.len());
    for promotion in promotions {
        responses.push(db::with_products(&state.pool, promotion).await?);
    }
    Ok(responses)
}

pub async fn create_promotion(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Json(req): Json<CreatePromotionRequest>,
) -> Result<(StatusCode, Json<PromotionResponse>), AppError> {
    auth_user.require_admin()?;

    let name = req.name.trim();
    if name.is_empty() {
        return Err(AppError::BadRequest("Promotion name must not be empty".to_string()));
    }
    let start = parse_timestamp(&req.start_date)?;
    let end = parse_timestamp(&req.end_date)?;
    validate_period(&start, &end)?;
    let url = req.url.as_deref().map(validate_url).transpose()?;

    let id = uuid::Uuid::now_v7().to_string();
    let image = non_empty_image(req.image_base64.as_deref())
        .map(|data| PendingImage::decode(&state.static_path, &id, data))
        .transpose()?;
    let product_ids = db::existing_product_ids(&state.pool, &req.product_ids).await?;
    let start_date = format_timestamp(&start);
    let end_date = format_timestamp(&end);

    // 행 INSERT와 상품 연결은 한 트랜잭션. 이미지 파일은 둘 다 성공한 뒤에 씁니다.
    let mut tx = state.pool.begin().await?;
    db::insert_promotion(
        &mut *tx,
        &NewPromotion {
            id: &id,
            name,
            description: &req.description,
            url: url.as_deref(),
            image_path: image.as_ref().map(|i| i.location.path.as_str()),
            image_url: image.as_ref().map(|i| i.location.url.as_str()),
            start_date: &start_date,
            end_date: &end_date,
        },
    )
    .await?;
    db::link_promotion_products(&mut *tx, &id, &product_ids).await?;

    if let Some(image) = &image {
        image.write().await?;
    }
    if let Err(e) = tx.commit().await {
        if let Some(image) = &image {
            image.discard().await;
        }
        return Err(e.into());
    }
    tracing::info!(
        promotion_id = %id,
        products = product_ids.len(),
        "Promotion created"
    );

    let promotion = find_promotion(&state, &id).await?;
    let response = db::with_products(&state.pool, promotion).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

pub async fn list_promotions(
    State(state): State<AppState>,
    Query(filter): Query<PromotionFilter>,
) -> Result<Json<PromotionList>, AppError> {
    if filter.skip < 0 {
        return Err(AppError::BadRequest("skip must not be negative".to_string()));
    }
    if !(1..=MAX_PAGE_SIZE).contains(&filter.limit) {
        return Err(AppError::BadRequest(format!(
            "limit must be between 1 and {}",
            MAX_PAGE_SIZE
        )));
    }

    let (promotions, total) = db::list_promotions(&state.pool, &filter, &now_timestamp()).await?;
    let items = with_products_all(&state, promotions).await?;

    Ok(Json(PromotionList { items, total }))
}

pub async fn list_active_promotions(
    State(state): State<AppState>,
) -> Result<Json<Vec<PromotionResponse>>, AppError> {
    let promotions = db::list_active_promotions(&state.pool, &now_timestamp()).await?;

    Ok(Json(with_products_all(&state, promotions).await?))
}

pub async fn list_product_promotions(
    State(state): State<AppState>,
    Path(product_id): Path<String>,
) -> Result<Json<Vec<PromotionResponse>>, AppError> {
    if db::get_product(&state.pool, &product_id).await?.is_none() {
        return Err(AppError::not_found("Product", &product_id));
    }
    let promotions = db::list_product_promotions(&state.pool, &product_id).await?;

    Ok(Json(with_products_all(&state, promotions).await?))
}

pub async fn get_promotion(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<PromotionResponse>, AppError> {
    let promotion = find_promotion(&state, &id).await?;

    Ok(Json(db::with_products(&state.pool, promotion).await?))
}

/// 부분 수정. 기간은 수정 후의 시작/종료일 기준으로 검증합니다.
pub async fn update_promotion(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
    Json(req): Json<UpdatePromotionRequest>,
) -> Result<Json<PromotionResponse>, AppError> {
    auth_user.require_admin()?;
    let existing = find_promotion(&state, &id).await?;

    let start = match &req.start_date {
        Some(value) => parse_timestamp(value)?,
        None => parse_timestamp(&existing.start_date)?,
    };
    let end = match &req.end_date {
        Some(value) => parse_timestamp(value)?,
        None => parse_timestamp(&existing.end_date)?,
    };
    validate_period(&start, &end)?;

    if let Some(name) = &req.name {
        if name.trim().is_empty() {
            return Err(AppError::BadRequest("Promotion name must not be empty".to_string()));
        }
    }
    let url = req.url.as_deref().map(validate_url).transpose()?;
    let image = store_image(&state, &id, req.image_base64.as_deref()).await?;

    let changes = PromotionChanges {
        name: req.name.as_deref().map(|n| n.trim().to_string()),
        description: req.description.clone(),
        url,
        image_path: image.as_ref().map(|i| i.path.clone()),
        image_url: image.map(|i| i.url),
        start_date: req.start_date.as_ref().map(|_| format_timestamp(&start)),
        end_date: req.end_date.as_ref().map(|_| format_timestamp(&end)),
    };
    let promotion = db::update_promotion(&state.pool, &id, &changes)
        .await?
        .ok_or_else(|| AppError::not_found("Promotion", &id))?;

    if let Some(product_ids) = &req.product_ids {
        let product_ids = db::existing_product_ids(&state.pool, product_ids).await?;
        db::replace_promotion_products(&state.pool, &id, &product_ids).await?;
    }

    Ok(Json(db::with_products(&state.pool, promotion).await?))
}

pub async fn delete_promotion(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    auth_user.require_admin()?;

    if !db::delete_promotion(&state.pool, &id).await? {
        return Err(AppError::not_found("Promotion", &id));
    }
    tracing::info!(promotion_id = %id, "Promotion deleted");

    Ok(StatusCode::NO_CONTENT)
}

/// 연결 상품을 통째로 교체합니다. 없는 상품 ID가 하나라도 있으면 아무것도 바꾸지 않습니다.
pub async fn set_promotion_products(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
    Json(req): Json<PromotionProductsRequest>,
) -> Result<Json<PromotionResponse>, AppError> {
    auth_user.require_admin()?;
    let promotion = find_promotion(&state, &id).await?;

    for product_id in &req.product_ids {
        if db::get_product(&state.pool, product_id).await?.is_none() {
            return Err(AppError::BadRequest(format!(
                "Product with ID {} not found",
                product_id
            )));
        }
    }
    db::replace_promotion_products(&state.pool, &id, &req.product_ids).await?;

    Ok(Json(db::with_products(&state.pool, promotion).await?))
}
