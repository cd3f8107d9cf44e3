//! # 인증 API 라우트 핸들러
//!
//! | 메서드 | 경로 | 설명 |
//! |--------|------|------|
//! | POST | /api/v1/auth/register | 회원가입 (201) |
//! | POST | /api/v1/auth/login | 로그인 |
//! | POST | /api/v1/auth/refresh | refresh 토큰 교체 |
//! | POST | /api/v1/auth/logout | 모든 refresh 토큰 폐기 (인증 필요) |
//! | GET | /api/v1/auth/me | 내 정보 (인증 필요) |
//!
//! `ADMIN_USERNAMES`에 포함된 이름으로 가입하면 `admin` 역할이 함께 부여됩니다.

use crate::{
    app::AppState,
    db::users as db_users,
    error::AppError,
    middleware::auth::{
        create_access_token, create_refresh_token, hash_token, verify_token, AuthUser, TokenKind,
        REFRESH_TOKEN_DAYS,
    },
    models::user::*,
    services::{format_timestamp, parse_timestamp},
};
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use axum::{extract::State, http::StatusCode, routing::{get, post}, Json, Router};
use chrono::{Duration, Utc};
use serde_json::{json, Value};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/refresh", post(refresh))
        .route("/logout", post(logout))
        .route("/me", get(me))
}

/// access/refresh 토큰 쌍을 발급하고 refresh 토큰 해시를 저장합니다.
async fn issue_tokens(state: &AppState, user: User) -> Result<AuthResponse, AppError> {
    let roles = user.role_list();
    let access_token = create_access_token(&user.id, &roles, &state.jwt_secret)
        .map_err(|e| AppError::Internal(format!("Token generation failed: {}", e)))?;
    let refresh_token = create_refresh_token(&user.id, &state.jwt_secret)
        .map_err(|e| AppError::Internal(format!("Token generation failed: {}", e)))?;

    let token_id = uuid::Uuid::now_v7().to_string();
    let expires_at = format_timestamp(&(Utc::now() + Duration::days(REFRESH_TOKEN_DAYS)));
    db_users::store_refresh_token(
        &state.pool,
        &token_id,
        &user.id,
        &hash_token(&refresh_token),
        &expires_at,
    )
    .await?;

    Ok(AuthResponse {
        user: user.into(),
        access_token,
        refresh_token,
    })
}

pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), AppError> {
    let username = req.username.trim();
    if username.chars().count() < 3 {
        return Err(AppError::BadRequest("Username must be at least 3 characters".to_string()));
    }
    if req.password.chars().count() < 8 {
        return Err(AppError::BadRequest("Password must be at least 8 characters".to_string()));
    }
    let email = req.email.as_deref().map(str::trim).filter(|e| !e.is_empty());
    if let Some(email) = email {
        if !email.contains('@') {
            return Err(AppError::BadRequest("Invalid email address".to_string()));
        }
        if db_users::find_by_email(&state.pool, email).await?.is_some() {
            return Err(AppError::Conflict("Email already exists".to_string()));
        }
    }

    if db_users::find_by_username(&state.pool, username).await?.is_some() {
        return Err(AppError::Conflict("Username already exists".to_string()));
    }

    // Argon2id
    let salt = SaltString::generate(&mut OsRng);
    let password_hash = Argon2::default()
        .hash_password(req.password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(format!("Password hashing failed: {}", e)))?
        .to_string();

    let roles = if state.admin_usernames.iter().any(|name| name == username) {
        format!("{},{}", ROLE_USER, ROLE_ADMIN)
    } else {
        ROLE_USER.to_string()
    };

    let user_id = uuid::Uuid::now_v7().to_string();
    let user = db_users::create_user(&state.pool, &user_id, username, email, &password_hash, &roles)
        .await?;
    tracing::info!(user_id = %user.id, username = %user.username, "User registered");

    let response = issue_tokens(&state, user).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let user = db_users::find_by_username(&state.pool, req.username.trim())
        .await?
        .ok_or(AppError::Unauthorized("Invalid username or password".to_string()))?;

    let parsed_hash = PasswordHash::new(&user.password_hash)
        .map_err(|e| AppError::Internal(format!("Password hash parse error: {}", e)))?;

    Argon2::default()
        .verify_password(req.password.as_bytes(), &parsed_hash)
        .map_err(|_| AppError::Unauthorized("Invalid username or password".to_string()))?;

    Ok(Json(issue_tokens(&state, user).await?))
}

/// refresh 토큰을 새 토큰 쌍으로 교체합니다. 사용한 토큰은 즉시 폐기됩니다.
pub async fn refresh(
    State(state): State<AppState>,
    Json(req): Json<RefreshRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    verify_token(&req.refresh_token, &state.jwt_secret, TokenKind::Refresh)
        .map_err(|_| AppError::Unauthorized("Invalid refresh token".to_string()))?;

    let token_hash = hash_token(&req.refresh_token);
    let (_token_id, user_id, expires_at) = db_users::find_refresh_token(&state.pool, &token_hash)
        .await?
        .ok_or(AppError::Unauthorized("Refresh token not found or revoked".to_string()))?;

    // 저장된 만료 시각도 한 번 더 확인
    if parse_timestamp(&expires_at)? < Utc::now() {
        db_users::delete_refresh_token(&state.pool, &token_hash).await?;
        return Err(AppError::Unauthorized("Refresh token expired".to_string()));
    }

    let user = db_users::find_by_id(&state.pool, &user_id)
        .await?
        .ok_or(AppError::Unauthorized("User not found".to_string()))?;

    db_users::delete_refresh_token(&state.pool, &token_hash).await?;

    Ok(Json(issue_tokens(&state, user).await?))
}

pub async fn logout(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<Value>, AppError> {
    db_users::delete_user_refresh_tokens(&state.pool, &auth_user.user_id).await?;

    Ok(Json(json!({ "message": "Logged out successfully" })))
}

pub async fn me(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<UserResponse>, AppError> {
    let user = db_users::find_by_id(&state.pool, &auth_user.user_id)
        .await?
        .ok_or_else(|| AppError::not_found("User", &auth_user.user_id))?;

    Ok(Json(user.into()))
}
