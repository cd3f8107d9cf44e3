//! # 애플리케이션 상태와 라우터 조립
//!
//! `AppState`는 모든 핸들러가 공유하는 의존성(DB 풀, 설정값)을 담습니다.
//! `build_router`는 헬스체크, 루트, `/api/v1` 리소스 라우트, 정적 파일 서빙,
//! 공통 미들웨어(CORS, 요청 로깅)를 하나의 `Router`로 묶습니다.
//!
//! `main.rs`와 테스트가 같은 함수를 사용하므로, 테스트는 실제 서버와 동일한
//! 라우팅 구성을 검증합니다.

use axum::{http::StatusCode, response::IntoResponse, routing::get, Json, Router};
use serde_json::json;
use sqlx::SqlitePool;
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};

use crate::config::Config;
use crate::routes;

/// 모든 라우트 핸들러가 공유하는 상태
///
/// `SqlitePool`은 내부적으로 Arc이므로 clone해도 같은 풀을 가리킵니다.
#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub jwt_secret: String,
    /// 업로드 이미지 저장 루트 (`/static`으로 서빙)
    pub static_path: String,
    /// 가입 시 admin 역할을 받는 사용자 이름
    pub admin_usernames: Vec<String>,
    pub project_name: String,
    pub project_version: String,
}

impl AppState {
    pub fn new(pool: SqlitePool, config: &Config) -> Self {
        Self {
            pool,
            jwt_secret: config.jwt_secret.clone(),
            static_path: config.static_path.clone(),
            admin_usernames: config.admin_usernames.clone(),
            project_name: config.project_name.clone(),
            project_version: config.project_version.clone(),
        }
    }
}

/// 전체 애플리케이션 라우터를 만듭니다.
pub fn build_router(state: AppState) -> Router {
    // 리소스 API는 전부 /api/v1 아래에 둡니다.
    let api_v1 = Router::new()
        .nest("/auth", routes::auth::router())
        .nest("/category", routes::categories::router())
        .nest("/product", routes::products::router())
        .nest("/review", routes::reviews::router())
        .nest("/cart", routes::cart::router())
        .nest("/promotion", routes::promotions::router());

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let static_files = ServeDir::new(&state.static_path);

    Router::new()
        .route("/", get(routes::health::root))
        .merge(routes::health::router())
        .nest("/api/v1", api_v1)
        .nest_service("/static", static_files)
        .fallback(handler_404)
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

async fn handler_404() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "error": {
                "code": "not_found",
                "message": "The requested resource was not found"
            }
        })),
    )
}
