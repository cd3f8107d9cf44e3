//! # 미들웨어 / 추출자 모듈
//!
//! - `auth`: JWT 발급·검증과 인증된 사용자를 꺼내는 `AuthUser` 추출자

pub mod auth;
