//! # 헬스체크(Health Check) 핸들러
//!
//! 서버와 데이터베이스가 정상적으로 동작하는지 확인하는 엔드포인트입니다.
//!
//! ## 엔드포인트
//! - `GET /` → `{ "message": "Welcome to the API", ... }`
//! - `GET /health`, `GET /health/` → `{ "status": "ok" }`
//! - `GET /health/db` → `SELECT 1` 실행 결과
//!
//! `/health/db`는 DB 오류가 나도 HTTP 200을 반환하고, 본문의 `status`와
//! `details`로 실패를 알립니다. 모니터링 도구가 상태 코드가 아닌 본문을 보고
//! 판단할 수 있도록 하기 위함입니다.

use axum::{extract::State, routing::get, Json, Router};
use serde_json::{json, Value};

use crate::{app::AppState, db};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_check))
        .route("/health/", get(health_check))
        .route("/health/db", get(db_health_check))
}

/// `GET /`: 환영 메시지와 서비스 이름/버전
pub async fn root(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "message": "Welcome to the API",
        "name": state.project_name,
        "version": state.project_version,
    }))
}

/// `GET /health`: 서버 상태를 확인합니다.
///
/// State 없이 고정된 JSON만 반환하므로 실패하지 않습니다.
pub async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "ok"
    }))
}

/// `GET /health/db`: 데이터베이스 연결을 확인합니다.
///
/// 어떤 에러든 하나의 분기에서 잡아 `details`에 에러 문자열을 담습니다.
pub async fn db_health_check(State(state): State<AppState>) -> Json<Value> {
    match db::ping(&state.pool).await {
        Ok(()) => Json(json!({
            "status": "Database connection established"
        })),
        Err(e) => {
            tracing::warn!("Database health check failed: {}", e);
            Json(json!({
                "status": "Database connection failed",
                "details": e.to_string()
            }))
        }
    }
}
