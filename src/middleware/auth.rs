//! # 인증(JWT) 모듈
//!
//! access 토큰(15분)과 refresh 토큰(7일)을 HS256으로 서명합니다.
//! 두 토큰은 `kind` 클레임으로 구분되며, API 인증에는 access 토큰만 허용됩니다.
//! refresh 토큰은 원문 대신 SHA-256 해시만 DB에 저장합니다.
//!
//! 핸들러 인자에 `AuthUser`를 넣으면 `Authorization: Bearer <token>` 헤더를
//! 검증한 뒤 사용자 ID와 역할을 꺼내 줍니다. 실패하면 401 응답이 나갑니다.

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use serde_json::json;
use sha2::{Digest, Sha256};

use crate::app::AppState;
use crate::error::AppError;
use crate::models::user::ROLE_ADMIN;

const ACCESS_TOKEN_MINUTES: i64 = 15;
pub const REFRESH_TOKEN_DAYS: i64 = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String, // user id
    #[serde(default)]
    pub roles: Vec<String>,
    pub exp: i64,
    pub iat: i64,
    /// 같은 초에 발급된 토큰도 서로 다른 값이 되도록 하는 고유 ID
    pub jti: String,
    pub kind: TokenKind,
}

#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: String,
    pub roles: Vec<String>,
}

impl AuthUser {
    pub fn is_admin(&self) -> bool {
        self.roles.iter().any(|r| r == ROLE_ADMIN)
    }

    /// admin 역할이 없으면 403을 반환합니다.
    pub fn require_admin(&self) -> Result<(), AppError> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(AppError::Forbidden("Admin privileges required".to_string()))
        }
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or(AuthError::MissingToken)?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or(AuthError::InvalidToken)?;

        let claims = verify_token(token, &state.jwt_secret, TokenKind::Access)?;

        Ok(AuthUser {
            user_id: claims.sub,
            roles: claims.roles,
        })
    }
}

#[derive(Debug)]
pub enum AuthError {
    MissingToken,
    InvalidToken,
    ExpiredToken,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (code, message) = match self {
            AuthError::MissingToken => ("missing_token", "Authorization token is required"),
            AuthError::InvalidToken => ("invalid_token", "Invalid authorization token"),
            AuthError::ExpiredToken => ("expired_token", "Authorization token has expired"),
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (StatusCode::UNAUTHORIZED, body).into_response()
    }
}

fn create_token(
    user_id: &str,
    roles: &[String],
    kind: TokenKind,
    lifetime: Duration,
    secret: &str,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = Utc::now();
    let claims = Claims {
        sub: user_id.to_string(),
        roles: roles.to_vec(),
        iat: now.timestamp(),
        exp: (now + lifetime).timestamp(),
        jti: uuid::Uuid::now_v7().to_string(),
        kind,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

pub fn create_access_token(
    user_id: &str,
    roles: &[String],
    secret: &str,
) -> Result<String, jsonwebtoken::errors::Error> {
    create_token(
        user_id,
        roles,
        TokenKind::Access,
        Duration::minutes(ACCESS_TOKEN_MINUTES),
        secret,
    )
}

pub fn create_refresh_token(
    user_id: &str,
    secret: &str,
) -> Result<String, jsonwebtoken::errors::Error> {
    create_token(
        user_id,
        &[],
        TokenKind::Refresh,
        Duration::days(REFRESH_TOKEN_DAYS),
        secret,
    )
}

/// 서명과 만료를 확인하고, 토큰 종류가 `expected`와 같은지 검사합니다.
pub fn verify_token(token: &str, secret: &str, expected: TokenKind) -> Result<Claims, AuthError> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::ExpiredToken,
        _ => AuthError::InvalidToken,
    })?;

    if token_data.claims.kind != expected {
        return Err(AuthError::InvalidToken);
    }

    Ok(token_data.claims)
}

pub fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret";

    #[test]
    fn access_token_carries_roles() {
        let roles = vec!["user".to_string(), "admin".to_string()];
        let token = create_access_token("u1", &roles, SECRET).unwrap();

        let claims = verify_token(&token, SECRET, TokenKind::Access).unwrap();
        assert_eq!(claims.sub, "u1");
        assert_eq!(claims.roles, roles);
    }

    #[test]
    fn refresh_token_is_not_an_access_token() {
        let token = create_refresh_token("u1", SECRET).unwrap();

        assert!(matches!(
            verify_token(&token, SECRET, TokenKind::Access),
            Err(AuthError::InvalidToken)
        ));
        assert!(verify_token(&token, SECRET, TokenKind::Refresh).is_ok());
    }

    #[test]
    fn tokens_issued_together_differ() {
        let a = create_refresh_token("u1", SECRET).unwrap();
        let b = create_refresh_token("u1", SECRET).unwrap();
        assert_ne!(hash_token(&a), hash_token(&b));
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token = create_access_token("u1", &[], SECRET).unwrap();
        assert!(matches!(
            verify_token(&token, "other", TokenKind::Access),
            Err(AuthError::InvalidToken)
        ));
    }

    #[test]
    fn require_admin_checks_role() {
        let user = AuthUser { user_id: "u".into(), roles: vec!["user".into()] };
        assert!(matches!(user.require_admin(), Err(AppError::Forbidden(_))));

        let admin = AuthUser { user_id: "a".into(), roles: vec!["admin".into()] };
        assert!(admin.require_admin().is_ok());
    }
}
