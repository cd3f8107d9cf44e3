//! # 리뷰 API 라우트 핸들러
//!
//! | 메서드 | 경로 | 설명 |
//! |--------|------|------|
//! | POST | /api/v1/review | 리뷰 작성 (인증, 201) |
//! | GET | /api/v1/review | 리뷰 목록 (필터 + 페이지네이션) |
//! | GET | /api/v1/review/product/{product_id} | 상품별 리뷰 |
//! | GET | /api/v1/review/my | 내가 쓴 리뷰 (인증) |
//! | GET | /api/v1/review/statistics/{product_id} | 상품 리뷰 통계 |
//! | GET | /api/v1/review/{id} | 리뷰 조회 |
//! | PUT | /api/v1/review/{id} | 리뷰 수정 (작성자만) |
//! | DELETE | /api/v1/review/{id} | 리뷰 삭제 (작성자만, 204) |
//!
//! 사용자당 상품 하나에 리뷰 하나만 쓸 수 있습니다.
//! 리뷰를 쓰거나 고치거나 지우면 해당 상품의 `rating`을 다시 계산합니다.

use crate::{app::AppState, db, error::AppError, middleware::auth::AuthUser, models::*};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_reviews).post(create_review))
        .route("/product/{product_id}", get(list_product_reviews))
        .route("/my", get(list_my_reviews))
        .route("/statistics/{product_id}", get(review_statistics))
        .route(
            "/{id}",
            get(get_review).put(update_review).delete(delete_review),
        )
}

fn validate_rating(name: &str, rating: i64) -> Result<(), AppError> {
    if !(1..=5).contains(&rating) {
        return Err(AppError::BadRequest(format!("{} must be between 1 and 5", name)));
    }
    Ok(())
}

fn validate_filter(filter: &ReviewFilter) -> Result<(), AppError> {
    if let Some(min_rating) = filter.min_rating {
        validate_rating("min_rating", min_rating)?;
    }
    if let Some(max_rating) = filter.max_rating {
        validate_rating("max_rating", max_rating)?;
    }
    Ok(())
}

async fn ensure_product(state: &AppState, product_id: &str) -> Result<Product, AppError> {
    db::get_product(&state.pool, product_id)
        .await?
        .ok_or_else(|| AppError::not_found("Product", product_id))
}

/// 리뷰를 찾고 요청자가 작성자인지 확인합니다.
async fn owned_review(
    state: &AppState,
    auth_user: &AuthUser,
    id: &str,
    action: &str,
) -> Result<Review, AppError> {
    let review = db::get_review(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("Review", id))?;

    if review.user_id != auth_user.user_id {
        return Err(AppError::Forbidden(format!(
            "You don't have permission to {} this review",
            action
        )));
    }

    Ok(review)
}

async fn paginated_reviews(
    state: &AppState,
    filter: &ReviewFilter,
    params: &PaginationParams,
) -> Result<Json<Paginated<Review>>, AppError> {
    validate_filter(filter)?;
    let page = params.validate()?;
    let (items, total) = db::list_reviews(&state.pool, filter, page).await?;

    Ok(Json(Paginated::new(items, total, page)))
}

pub async fn create_review(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Json(req): Json<CreateReviewRequest>,
) -> Result<(StatusCode, Json<Review>), AppError> {
    validate_rating("Rating", req.rating)?;
    ensure_product(&state, &req.product_id).await?;

    if db::find_user_review(&state.pool, &auth_user.user_id, &req.product_id)
        .await?
        .is_some()
    {
        return Err(AppError::BadRequest(
            "You have already reviewed this product".to_string(),
        ));
    }

    let review = db::create_review(&state.pool, &auth_user.user_id, &req).await?;
    db::refresh_product_rating(&state.pool, &review.product_id).await?;
    tracing::info!(review_id = %review.id, product_id = %review.product_id, "Review created");

    Ok((StatusCode::CREATED, Json(review)))
}

pub async fn list_reviews(
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
    Query(filter): Query<ReviewFilter>,
) -> Result<Json<Paginated<Review>>, AppError> {
    paginated_reviews(&state, &filter, &params).await
}

pub async fn list_product_reviews(
    State(state): State<AppState>,
    Path(product_id): Path<String>,
    Query(params): Query<PaginationParams>,
    Query(filter): Query<ReviewFilter>,
) -> Result<Json<Paginated<Review>>, AppError> {
    ensure_product(&state, &product_id).await?;

    let filter = ReviewFilter {
        product_id: Some(product_id),
        user_id: None,
        ..filter
    };
    paginated_reviews(&state, &filter, &params).await
}

pub async fn list_my_reviews(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Query(params): Query<PaginationParams>,
) -> Result<Json<Paginated<Review>>, AppError> {
    let filter = ReviewFilter {
        user_id: Some(auth_user.user_id),
        ..Default::default()
    };
    paginated_reviews(&state, &filter, &params).await
}

pub async fn review_statistics(
    State(state): State<AppState>,
    Path(product_id): Path<String>,
) -> Result<Json<ReviewStatistics>, AppError> {
    ensure_product(&state, &product_id).await?;
    let statistics = db::review_statistics(&state.pool, &product_id).await?;

    Ok(Json(statistics))
}

pub async fn get_review(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Review>, AppError> {
    let review = db::get_review(&state.pool, &id)
        .await?
        .ok_or_else(|| AppError::not_found("Review", &id))?;

    Ok(Json(review))
}

pub async fn update_review(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
    Json(req): Json<UpdateReviewRequest>,
) -> Result<Json<Review>, AppError> {
    if let Some(rating) = req.rating {
        validate_rating("Rating", rating)?;
    }
    let review = owned_review(&state, &auth_user, &id, "update").await?;

    let updated = db::update_review(&state.pool, &id, &req)
        .await?
        .ok_or_else(|| AppError::not_found("Review", &id))?;
    if req.rating.is_some() {
        db::refresh_product_rating(&state.pool, &review.product_id).await?;
    }

    Ok(Json(updated))
}

pub async fn delete_review(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let review = owned_review(&state, &auth_user, &id, "delete").await?;

    if !db::delete_review(&state.pool, &id).await? {
        return Err(AppError::not_found("Review", &id));
    }
    db::refresh_product_rating(&state.pool, &review.product_id).await?;

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use crate::test_support::{create_category, create_product, register, send, TestApp};
    use axum::http::{Method, StatusCode};
    use axum::Router;
    use serde_json::{json, Value};

    async fn setup(app: &TestApp) -> (String, String) {
        let token = register(&app.router, "alice").await;
        let category_id = create_category(&app.router, &token, "Books").await;
        let product_id = create_product(&app.router, &token, &category_id, "Dune", 10.0).await;
        (token, product_id)
    }

    async fn post_review(
        router: &Router,
        token: &str,
        product_id: &str,
        rating: i64,
    ) -> (StatusCode, Value) {
        send(
            router,
            Method::POST,
            "/api/v1/review",
            Some(token),
            Some(json!({ "product_id": product_id, "text": "Great read", "rating": rating })),
        )
        .await
    }

    #[tokio::test]
    async fn create_review_updates_product_rating() {
        let app = TestApp::new().await;
        let (alice, product_id) = setup(&app).await;
        let bob = register(&app.router, "bob").await;

        let (status, body) = post_review(&app.router, &alice, &product_id, 5).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["rating"], 5);
        post_review(&app.router, &bob, &product_id, 2).await;

        let (_, product) = send(
            &app.router,
            Method::GET,
            &format!("/api/v1/product/{}", product_id),
            None,
            None,
        )
        .await;
        assert_eq!(product["rating"], 3.5);
    }

    #[tokio::test]
    async fn rating_outside_range_is_bad_request() {
        let app = TestApp::new().await;
        let (token, product_id) = setup(&app).await;

        for rating in [0, 6] {
            let (status, _) = post_review(&app.router, &token, &product_id, rating).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
        }
    }

    #[tokio::test]
    async fn second_review_for_same_product_is_rejected() {
        let app = TestApp::new().await;
        let (token, product_id) = setup(&app).await;
        post_review(&app.router, &token, &product_id, 4).await;

        let (status, body) = post_review(&app.router, &token, &product_id, 3).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["message"], "You have already reviewed this product");
    }

    #[tokio::test]
    async fn review_for_missing_product_is_not_found() {
        let app = TestApp::new().await;
        let (token, _) = setup(&app).await;

        let (status, _) = post_review(&app.router, &token, "missing", 4).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn only_author_can_update_or_delete() {
        let app = TestApp::new().await;
        let (alice, product_id) = setup(&app).await;
        let bob = register(&app.router, "bob").await;
        let (_, review) = post_review(&app.router, &alice, &product_id, 4).await;
        let uri = format!("/api/v1/review/{}", review["review_id"].as_str().unwrap());

        let (status, _) = send(
            &app.router,
            Method::PUT,
            &uri,
            Some(&bob),
            Some(json!({ "rating": 1 })),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, _) = send(&app.router, Method::DELETE, &uri, Some(&bob), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, body) = send(
            &app.router,
            Method::PUT,
            &uri,
            Some(&alice),
            Some(json!({ "rating": 2 })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["rating"], 2);
        assert_eq!(body["text"], "Great read");

        let (status, _) = send(&app.router, Method::DELETE, &uri, Some(&alice), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (_, product) = send(
            &app.router,
            Method::GET,
            &format!("/api/v1/product/{}", product_id),
            None,
            None,
        )
        .await;
        assert_eq!(product["rating"], 0.0);
    }

    #[tokio::test]
    async fn statistics_fill_every_star_bucket() {
        let app = TestApp::new().await;
        let (alice, product_id) = setup(&app).await;
        let bob = register(&app.router, "bob").await;
        let carol = register(&app.router, "carol").await;
        post_review(&app.router, &alice, &product_id, 5).await;
        post_review(&app.router, &bob, &product_id, 4).await;
        post_review(&app.router, &carol, &product_id, 4).await;

        let (status, body) = send(
            &app.router,
            Method::GET,
            &format!("/api/v1/review/statistics/{}", product_id),
            None,
            None,
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["average_rating"], 4.3);
        assert_eq!(body["total_reviews"], 3);
        assert_eq!(
            body["rating_counts"],
            json!({ "1_star": 0, "2_star": 0, "3_star": 0, "4_star": 2, "5_star": 1 })
        );
    }

    #[tokio::test]
    async fn my_reviews_and_filters() {
        let app = TestApp::new().await;
        let (alice, product_id) = setup(&app).await;
        let bob = register(&app.router, "bob").await;
        post_review(&app.router, &alice, &product_id, 5).await;
        post_review(&app.router, &bob, &product_id, 1).await;

        let (_, mine) = send(&app.router, Method::GET, "/api/v1/review/my", Some(&alice), None).await;
        assert_eq!(mine["total"], 1);
        assert_eq!(mine["items"][0]["rating"], 5);

        let (_, high) = send(
            &app.router,
            Method::GET,
            &format!("/api/v1/review/product/{}?min_rating=3", product_id),
            None,
            None,
        )
        .await;
        assert_eq!(high["total"], 1);

        let (status, _) = send(&app.router, Method::GET, "/api/v1/review?max_rating=9", None, None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
