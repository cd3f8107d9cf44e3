//! 테스트 공용 도우미: 인메모리 DB, 라우터, 요청 전송, 회원가입

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use tempfile::TempDir;
use tower::ServiceExt;

use crate::app::{build_router, AppState};

pub const ADMIN_USERNAME: &str = "admin";

pub struct TestApp {
    pub router: Router,
    pub pool: SqlitePool,
    pub static_dir: TempDir,
}

impl TestApp {
    pub async fn new() -> Self {
        // 인메모리 DB는 연결마다 따로 생기므로 연결 하나를 계속 유지합니다.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        sqlx::migrate!("./migrations").run(&pool).await.unwrap();

        let static_dir = tempfile::tempdir().unwrap();
        let state = AppState {
            pool: pool.clone(),
            jwt_secret: "test-secret".to_string(),
            static_path: static_dir.path().to_string_lossy().into_owned(),
            admin_usernames: vec![ADMIN_USERNAME.to_string()],
            project_name: "Storefront API".to_string(),
            project_version: "test".to_string(),
        };

        Self {
            router: build_router(state),
            pool,
            static_dir,
        }
    }
}

/// 라우터에 요청을 보내고 (상태 코드, JSON 본문)을 돌려줍니다.
/// 본문이 비어 있으면 `Value::Null`입니다.
pub async fn send(
    router: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };

    (status, value)
}

/// 사용자를 가입시키고 access 토큰을 반환합니다.
pub async fn register(router: &Router, username: &str) -> String {
    let (status, body) = send(
        router,
        Method::POST,
        "/api/v1/auth/register",
        None,
        Some(json!({
            "username": username,
            "email": format!("{}@example.com", username),
            "password": "password123"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "register failed: {}", body);

    body["access_token"].as_str().unwrap().to_string()
}

pub async fn create_category(router: &Router, token: &str, name: &str) -> String {
    let (status, body) = send(
        router,
        Method::POST,
        "/api/v1/category",
        Some(token),
        Some(json!({ "name": name })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "create category failed: {}", body);

    body["category_id"].as_str().unwrap().to_string()
}

pub async fn create_product(
    router: &Router,
    token: &str,
    category_id: &str,
    name: &str,
    price: f64,
) -> String {
    let (status, body) = send(
        router,
        Method::POST,
        "/api/v1/product",
        Some(token),
        Some(json!({ "name": name, "price": price, "category_id": category_id })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "create product failed: {}", body);

    body["product_id"].as_str().unwrap().to_string()
}
