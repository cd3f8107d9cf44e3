//! # 에러 처리 모듈
//!
//! 애플리케이션에서 발생할 수 있는 모든 에러 타입을 정의합니다.
//!
//! 이 모듈의 핵심:
//! - `AppError` 열거형(enum): 모든 에러 종류를 하나의 타입으로 통합
//! - `IntoResponse` 구현: 에러를 HTTP 응답으로 자동 변환
//!
//! 응답 본문 형식:
//! `{ "error": { "code": "not_found", "message": "Product with ID ... not found" } }`

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// 애플리케이션에서 발생할 수 있는 모든 에러 종류
///
/// 핸들러에서 `Result<T, AppError>`를 반환하면,
/// Axum이 자동으로 `IntoResponse`를 호출하여 HTTP 응답으로 변환합니다.
#[derive(Debug, Error)]
pub enum AppError {
    /// 요청한 리소스를 찾을 수 없음 (HTTP 404)
    /// 메시지에 어떤 리소스인지 담습니다. 예: "Category with ID ... not found"
    #[error("{0}")]
    NotFound(String),

    /// 잘못된 요청 (HTTP 400)
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// 인증 실패 (HTTP 401)
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// 권한 없음 (HTTP 403): 다른 사용자의 리뷰 수정, admin 전용 API 등
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// 리소스 충돌 (HTTP 409)
    #[error("Conflict: {0}")]
    Conflict(String),

    /// 서버 내부 오류 (HTTP 500)
    #[error("Internal error: {0}")]
    Internal(String),

    /// 데이터베이스 오류 (HTTP 500)
    /// #[from]: sqlx 함수에서 `?`를 쓰면 자동으로 AppError::Database로 변환됩니다.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// 파일 입출력 오류 (HTTP 500)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl AppError {
    /// "<Resource> with ID <id> not found" 형태의 404 에러를 만듭니다.
    pub fn not_found(resource: &str, id: &str) -> Self {
        AppError::NotFound(format!("{} with ID {} not found", resource, id))
    }
}

impl IntoResponse for AppError {
    /// AppError를 HTTP 응답으로 변환합니다.
    ///
    /// 내부 에러(Database, IO, Internal)는 실제 에러 내용을 로그에만 기록하고,
    /// 클라이언트에는 일반적인 메시지만 반환합니다.
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            AppError::NotFound(ref msg) => (StatusCode::NOT_FOUND, "not_found", msg.clone()),
            AppError::BadRequest(ref msg) => {
                (StatusCode::BAD_REQUEST, "bad_request", msg.clone())
            }
            AppError::Unauthorized(ref msg) => {
                (StatusCode::UNAUTHORIZED, "unauthorized", msg.clone())
            }
            AppError::Forbidden(ref msg) => (StatusCode::FORBIDDEN, "forbidden", msg.clone()),
            AppError::Conflict(ref msg) => (StatusCode::CONFLICT, "conflict", msg.clone()),
            AppError::Internal(ref msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".to_string(),
                )
            }
            AppError::Database(ref e) => {
                tracing::error!("Database error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "database_error",
                    "A database error occurred".to_string(),
                )
            }
            AppError::Io(ref e) => {
                tracing::error!("IO error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "io_error",
                    "An IO error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

/// sqlx 에러가 UNIQUE 제약 조건 위반인지 확인합니다.
///
/// 카테고리 이름 중복처럼 DB 제약으로 잡는 충돌을 400/409로 바꿀 때 사용합니다.
pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err.is_unique_violation(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_variants_to_status_codes() {
        let cases = [
            (AppError::not_found("Product", "x"), StatusCode::NOT_FOUND),
            (AppError::BadRequest("b".into()), StatusCode::BAD_REQUEST),
            (AppError::Unauthorized("u".into()), StatusCode::UNAUTHORIZED),
            (AppError::Forbidden("f".into()), StatusCode::FORBIDDEN),
            (AppError::Conflict("c".into()), StatusCode::CONFLICT),
            (AppError::Internal("i".into()), StatusCode::INTERNAL_SERVER_ERROR),
            (AppError::Database(sqlx::Error::PoolClosed), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, expected) in cases {
            assert_eq!(err.into_response().status(), expected);
        }
    }

    #[test]
    fn not_found_message_names_resource_and_id() {
        let err = AppError::not_found("Category", "abc");
        assert_eq!(err.to_string(), "Category with ID abc not found");
    }

    #[test]
    fn pool_errors_are_not_unique_violations() {
        assert!(!is_unique_violation(&sqlx::Error::PoolClosed));
    }
}
