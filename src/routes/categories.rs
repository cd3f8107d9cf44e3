//! # 카테고리 API 라우트 핸들러
//!
//! | 메서드 | 경로 | 설명 |
//! |--------|------|------|
//! | GET | /api/v1/category | 카테고리 목록 (페이지네이션, 이름순) |
//! | POST | /api/v1/category | 카테고리 생성 (인증, 201) |
//! | GET | /api/v1/category/{id} | 카테고리 조회 |
//! | PUT | /api/v1/category/{id} | 카테고리 수정 (인증) |
//! | DELETE | /api/v1/category/{id} | 카테고리 삭제 (인증, soft delete, 204) |

use crate::{app::AppState, db, error::AppError, middleware::auth::AuthUser, models::*};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_categories).post(create_category))
        .route(
            "/{id}",
            get(get_category).put(update_category).delete(delete_category),
        )
}

fn validate_name(name: &str) -> Result<&str, AppError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::BadRequest("Category name must not be empty".to_string()));
    }
    Ok(name)
}

pub async fn list_categories(
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> Result<Json<Paginated<Category>>, AppError> {
    let page = params.validate()?;
    let total = db::count_categories(&state.pool).await?;
    let items = db::list_categories(&state.pool, page).await?;

    Ok(Json(Paginated::new(items, total, page)))
}

pub async fn create_category(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    Json(req): Json<CreateCategoryRequest>,
) -> Result<(StatusCode, Json<Category>), AppError> {
    let name = validate_name(&req.name)?;
    let category = db::create_category(&state.pool, name).await?;
    tracing::info!(category_id = %category.id, "Category created");

    Ok((StatusCode::CREATED, Json(category)))
}

pub async fn get_category(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Category>, AppError> {
    let category = db::get_category(&state.pool, &id)
        .await?
        .ok_or_else(|| AppError::not_found("Category", &id))?;

    Ok(Json(category))
}

pub async fn update_category(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    Path(id): Path<String>,
    Json(mut req): Json<UpdateCategoryRequest>,
) -> Result<Json<Category>, AppError> {
    if let Some(name) = &req.name {
        req.name = Some(validate_name(name)?.to_string());
    }

    let category = db::update_category(&state.pool, &id, &req)
        .await?
        .ok_or_else(|| AppError::not_found("Category", &id))?;

    Ok(Json(category))
}

pub async fn delete_category(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    if !db::delete_category(&state.pool, &id).await? {
        return Err(AppError::not_found("Category", &id));
    }

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use crate::test_support::{create_category, register, send, TestApp};
    use axum::http::{Method, StatusCode};
    use serde_json::json;

    #[tokio::test]
    async fn create_and_get_category() {
        let app = TestApp::new().await;
        let token = register(&app.router, "alice").await;
        let id = create_category(&app.router, &token, "Books").await;

        let (status, body) = send(
            &app.router,
            Method::GET,
            &format!("/api/v1/category/{}", id),
            None,
            None,
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["name"], "Books");
        assert_eq!(body["category_id"], json!(id));
    }

    #[tokio::test]
    async fn duplicate_name_is_bad_request() {
        let app = TestApp::new().await;
        let token = register(&app.router, "alice").await;
        create_category(&app.router, &token, "Books").await;

        let (status, body) = send(
            &app.router,
            Method::POST,
            "/api/v1/category",
            Some(&token),
            Some(json!({ "name": "Books" })),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["message"], "Category with name 'Books' already exists");
    }

    #[tokio::test]
    async fn create_requires_auth() {
        let app = TestApp::new().await;

        let (status, _) = send(
            &app.router,
            Method::POST,
            "/api/v1/category",
            None,
            Some(json!({ "name": "Books" })),
        )
        .await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn list_is_paginated_by_name() {
        let app = TestApp::new().await;
        let token = register(&app.router, "alice").await;
        for name in ["Toys", "Books", "Garden"] {
            create_category(&app.router, &token, name).await;
        }

        let (status, body) = send(
            &app.router,
            Method::GET,
            "/api/v1/category?page=1&page_size=2",
            None,
            None,
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total"], 3);
        assert_eq!(body["pages"], 2);
        assert_eq!(body["items"][0]["name"], "Books");
        assert_eq!(body["items"][1]["name"], "Garden");
    }

    #[tokio::test]
    async fn page_size_out_of_range_is_bad_request() {
        let app = TestApp::new().await;

        let (status, _) = send(&app.router, Method::GET, "/api/v1/category?page_size=101", None, None).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn page_beyond_offset_range_is_bad_request() {
        let app = TestApp::new().await;

        let (status, body) = send(
            &app.router,
            Method::GET,
            "/api/v1/category?page=9223372036854775807&page_size=100",
            None,
            None,
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["message"], "page is too large");
    }

    #[tokio::test]
    async fn update_and_soft_delete() {
        let app = TestApp::new().await;
        let token = register(&app.router, "alice").await;
        let id = create_category(&app.router, &token, "Books").await;
        let uri = format!("/api/v1/category/{}", id);

        let (status, body) = send(
            &app.router,
            Method::PUT,
            &uri,
            Some(&token),
            Some(json!({ "name": "Comics" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["name"], "Comics");

        let (status, _) = send(&app.router, Method::DELETE, &uri, Some(&token), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, body) = send(&app.router, Method::GET, &uri, None, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(
            body["error"]["message"],
            format!("Category with ID {} not found", id)
        );

        let (status, body) = send(&app.router, Method::GET, "/api/v1/category", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total"], 0);
        assert_eq!(body["items"], json!([]));
    }
}
