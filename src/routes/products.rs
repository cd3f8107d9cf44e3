//! # 상품 API 라우트 핸들러
//!
//! | 메서드 | 경로 | 설명 |
//! |--------|------|------|
//! | GET | /api/v1/product | 상품 목록 (필터 + 페이지네이션) |
//! | POST | /api/v1/product | 상품 생성 (인증, 201) |
//! | GET | /api/v1/product/search?query= | 이름 검색 |
//! | GET | /api/v1/product/category/{category_id} | 카테고리별 상품 |
//! | GET | /api/v1/product/{id} | 상품 상세 (카테고리 포함) |
//! | PUT | /api/v1/product/{id} | 상품 수정 (인증) |
//! | DELETE | /api/v1/product/{id} | 상품 삭제 (인증, 204) |
//!
//! 필터(`name`, `min_price`, `max_price`, `min_rating`, `category_id`)와
//! 페이지네이션 파라미터는 서로 다른 `Query` 추출자로 받습니다.

use crate::{app::AppState, db, error::AppError, middleware::auth::AuthUser, models::*};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_products).post(create_product))
        .route("/search", get(search_products))
        .route("/category/{category_id}", get(list_products_by_category))
        .route(
            "/{id}",
            get(get_product).put(update_product).delete(delete_product),
        )
}

fn validate_price(price: f64) -> Result<(), AppError> {
    if !price.is_finite() || price < 0.0 {
        return Err(AppError::BadRequest("Price must be a non-negative number".to_string()));
    }
    Ok(())
}

async fn ensure_category(state: &AppState, category_id: &str) -> Result<Category, AppError> {
    db::get_category(&state.pool, category_id)
        .await?
        .ok_or_else(|| AppError::not_found("Category", category_id))
}

pub async fn list_products(
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
    Query(filter): Query<ProductFilter>,
) -> Result<Json<Paginated<Product>>, AppError> {
    let page = params.validate()?;
    let (items, total) = db::list_products(&state.pool, &filter, page).await?;

    Ok(Json(Paginated::new(items, total, page)))
}

/// `query`를 이름 부분 일치(대소문자 무시) 조건으로 사용합니다.
/// 나머지 필터는 목록 API와 같습니다.
pub async fn search_products(
    State(state): State<AppState>,
    Query(search): Query<ProductSearchQuery>,
    Query(params): Query<PaginationParams>,
    Query(mut filter): Query<ProductFilter>,
) -> Result<Json<Paginated<Product>>, AppError> {
    let query = search.query.trim();
    if query.is_empty() {
        return Err(AppError::BadRequest("Search query must not be empty".to_string()));
    }
    let page = params.validate()?;

    filter.name = Some(query.to_string());
    let (items, total) = db::list_products(&state.pool, &filter, page).await?;

    Ok(Json(Paginated::new(items, total, page)))
}

pub async fn list_products_by_category(
    State(state): State<AppState>,
    Path(category_id): Path<String>,
    Query(params): Query<PaginationParams>,
) -> Result<Json<Paginated<Product>>, AppError> {
    let page = params.validate()?;
    ensure_category(&state, &category_id).await?;

    let filter = ProductFilter {
        category_id: Some(category_id),
        ..Default::default()
    };
    let (items, total) = db::list_products(&state.pool, &filter, page).await?;

    Ok(Json(Paginated::new(items, total, page)))
}

pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ProductDetail>, AppError> {
    let product = db::get_product(&state.pool, &id)
        .await?
        .ok_or_else(|| AppError::not_found("Product", &id))?;
    let category = db::get_category_any(&state.pool, &product.category_id)
        .await?
        .ok_or_else(|| AppError::not_found("Category", &product.category_id))?;

    Ok(Json(ProductDetail { product, category }))
}

pub async fn create_product(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    Json(mut req): Json<CreateProductRequest>,
) -> Result<(StatusCode, Json<Product>), AppError> {
    req.name = req.name.trim().to_string();
    if req.name.is_empty() {
        return Err(AppError::BadRequest("Product name must not be empty".to_string()));
    }
    validate_price(req.price)?;
    ensure_category(&state, &req.category_id).await?;

    let product = db::create_product(&state.pool, &req).await?;
    tracing::info!(product_id = %product.id, "Product created");

    Ok((StatusCode::CREATED, Json(product)))
}

pub async fn update_product(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    Path(id): Path<String>,
    Json(req): Json<UpdateProductRequest>,
) -> Result<Json<Product>, AppError> {
    if db::get_product(&state.pool, &id).await?.is_none() {
        return Err(AppError::not_found("Product", &id));
    }
    if let Some(name) = &req.name {
        if name.trim().is_empty() {
            return Err(AppError::BadRequest("Product name must not be empty".to_string()));
        }
    }
    if let Some(price) = req.price {
        validate_price(price)?;
    }
    if let Some(category_id) = &req.category_id {
        ensure_category(&state, category_id).await?;
    }

    let product = db::update_product(&state.pool, &id, &req)
        .await?
        .ok_or_else(|| AppError::not_found("Product", &id))?;

    Ok(Json(product))
}

pub async fn delete_product(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    if !db::delete_product(&state.pool, &id).await? {
        return Err(AppError::not_found("Product", &id));
    }

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use crate::test_support::{create_category, create_product, register, send, TestApp};
    use axum::http::{Method, StatusCode};
    use serde_json::json;

    #[tokio::test]
    async fn product_detail_embeds_category() {
        let app = TestApp::new().await;
        let token = register(&app.router, "alice").await;
        let category_id = create_category(&app.router, &token, "Books").await;
        let product_id = create_product(&app.router, &token, &category_id, "Dune", 12.5).await;

        let (status, body) = send(
            &app.router,
            Method::GET,
            &format!("/api/v1/product/{}", product_id),
            None,
            None,
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["name"], "Dune");
        assert_eq!(body["price"], 12.5);
        assert_eq!(body["rating"], 0.0);
        assert_eq!(body["category"]["name"], "Books");
    }

    #[tokio::test]
    async fn create_with_unknown_category_is_not_found() {
        let app = TestApp::new().await;
        let token = register(&app.router, "alice").await;

        let (status, _) = send(
            &app.router,
            Method::POST,
            "/api/v1/product",
            Some(&token),
            Some(json!({ "name": "Dune", "price": 10.0, "category_id": "missing" })),
        )
        .await;

        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn list_filters_by_price_and_name() {
        let app = TestApp::new().await;
        let token = register(&app.router, "alice").await;
        let category_id = create_category(&app.router, &token, "Books").await;
        create_product(&app.router, &token, &category_id, "Dune", 10.0).await;
        create_product(&app.router, &token, &category_id, "Dune Messiah", 25.0).await;
        create_product(&app.router, &token, &category_id, "Emma", 5.0).await;

        let (_, body) = send(
            &app.router,
            Method::GET,
            "/api/v1/product?name=dune&min_price=20",
            None,
            None,
        )
        .await;
        assert_eq!(body["total"], 1);
        assert_eq!(body["items"][0]["name"], "Dune Messiah");

        let (_, body) = send(&app.router, Method::GET, "/api/v1/product?max_price=10", None, None).await;
        assert_eq!(body["total"], 2);
    }

    #[tokio::test]
    async fn search_requires_non_empty_query() {
        let app = TestApp::new().await;
        let token = register(&app.router, "alice").await;
        let category_id = create_category(&app.router, &token, "Books").await;
        create_product(&app.router, &token, &category_id, "100% Cotton", 10.0).await;
        create_product(&app.router, &token, &category_id, "1000 Pieces", 10.0).await;

        let (status, _) = send(&app.router, Method::GET, "/api/v1/product/search?query=", None, None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        // LIKE 와일드카드는 문자 그대로 검색됨
        let (status, body) = send(
            &app.router,
            Method::GET,
            "/api/v1/product/search?query=100%25",
            None,
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total"], 1);
        assert_eq!(body["items"][0]["name"], "100% Cotton");
    }

    #[tokio::test]
    async fn list_by_category_checks_category() {
        let app = TestApp::new().await;
        let token = register(&app.router, "alice").await;
        let books = create_category(&app.router, &token, "Books").await;
        let toys = create_category(&app.router, &token, "Toys").await;
        create_product(&app.router, &token, &books, "Dune", 10.0).await;
        create_product(&app.router, &token, &toys, "Yo-yo", 3.0).await;

        let (status, body) = send(
            &app.router,
            Method::GET,
            &format!("/api/v1/product/category/{}", books),
            None,
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total"], 1);
        assert_eq!(body["items"][0]["name"], "Dune");

        let (status, _) = send(&app.router, Method::GET, "/api/v1/product/category/missing", None, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn update_and_delete_product() {
        let app = TestApp::new().await;
        let token = register(&app.router, "alice").await;
        let category_id = create_category(&app.router, &token, "Books").await;
        let product_id = create_product(&app.router, &token, &category_id, "Dune", 10.0).await;
        let uri = format!("/api/v1/product/{}", product_id);

        let (status, body) = send(
            &app.router,
            Method::PUT,
            &uri,
            Some(&token),
            Some(json!({ "price": 15.0 })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["price"], 15.0);
        assert_eq!(body["name"], "Dune");

        let (status, _) = send(
            &app.router,
            Method::PUT,
            &uri,
            Some(&token),
            Some(json!({ "category_id": "missing" })),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send(&app.router, Method::DELETE, &uri, Some(&token), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, _) = send(&app.router, Method::GET, &uri, None, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn deleted_product_leaves_list_and_search() {
        let app = TestApp::new().await;
        let token = register(&app.router, "alice").await;
        let category_id = create_category(&app.router, &token, "Books").await;
        let dune = create_product(&app.router, &token, &category_id, "Dune", 10.0).await;
        create_product(&app.router, &token, &category_id, "Emma", 5.0).await;

        let (status, _) = send(
            &app.router,
            Method::DELETE,
            &format!("/api/v1/product/{}", dune),
            Some(&token),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (_, body) = send(&app.router, Method::GET, "/api/v1/product", None, None).await;
        assert_eq!(body["total"], 1);
        assert_eq!(body["items"][0]["name"], "Emma");

        let (_, body) = send(&app.router, Method::GET, "/api/v1/product/search?query=Dune", None, None).await;
        assert_eq!(body["total"], 0);
        assert_eq!(body["items"], json!([]));

        let (_, body) = send(
            &app.router,
            Method::GET,
            &format!("/api/v1/product/category/{}", category_id),
            None,
            None,
        )
        .await;
        assert_eq!(body["total"], 1);
    }

    #[tokio::test]
    async fn name_match_ignores_case_beyond_ascii() {
        let app = TestApp::new().await;
        let token = register(&app.router, "alice").await;
        let category_id = create_category(&app.router, &token, "Electronics").await;
        create_product(&app.router, &token, &category_id, "Телефон", 300.0).await;
        create_product(&app.router, &token, &category_id, "Ökotest Kabel", 4.0).await;

        // "телефон"
        let query = "%D1%82%D0%B5%D0%BB%D0%B5%D1%84%D0%BE%D0%BD";

        let (status, body) = send(
            &app.router,
            Method::GET,
            &format!("/api/v1/product/search?query={}", query),
            None,
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total"], 1);
        assert_eq!(body["items"][0]["name"], "Телефон");

        let (_, body) = send(
            &app.router,
            Method::GET,
            &format!("/api/v1/product?name={}", query),
            None,
            None,
        )
        .await;
        assert_eq!(body["total"], 1);

        // "ÖKO"
        let (_, body) = send(&app.router, Method::GET, "/api/v1/product?name=%C3%96KO", None, None).await;
        assert_eq!(body["total"], 1);
        assert_eq!(body["items"][0]["name"], "Ökotest Kabel");
    }

    #[tokio::test]
    async fn renamed_product_is_found_by_new_name() {
        let app = TestApp::new().await;
        let token = register(&app.router, "alice").await;
        let category_id = create_category(&app.router, &token, "Books").await;
        let product_id = create_product(&app.router, &token, &category_id, "Dune", 10.0).await;

        send(
            &app.router,
            Method::PUT,
            &format!("/api/v1/product/{}", product_id),
            Some(&token),
            Some(json!({ "name": "Солярис" })),
        )
        .await;

        // "солярис"
        let (_, body) = send(
            &app.router,
            Method::GET,
            "/api/v1/product/search?query=%D1%81%D0%BE%D0%BB%D1%8F%D1%80%D0%B8%D1%81",
            None,
            None,
        )
        .await;
        assert_eq!(body["total"], 1);

        let (_, body) = send(&app.router, Method::GET, "/api/v1/product/search?query=dune", None, None).await;
        assert_eq!(body["total"], 0);
    }
}
