//! # 라우트 핸들러 모듈
//!
//! HTTP 요청을 처리하는 핸들러 함수들을 모아둔 모듈입니다.
//! 각 하위 모듈은 자신의 경로들을 묶은 `router()`를 제공하고,
//! `app::build_router`가 이를 `/api/v1` 아래에 중첩(nest)합니다.
//!
//! 각 하위 모듈:
//! - `auth`: 회원가입, 로그인, 토큰 갱신, 로그아웃, 내 정보
//! - `cart`: 장바구니
//! - `categories`: 카테고리 CRUD
//! - `health`: 루트(`/`)와 헬스체크(`/health`, `/health/db`)
//! - `products`: 상품 CRUD와 검색
//! - `promotions`: 프로모션 CRUD와 상품 연결
//! - `reviews`: 리뷰 CRUD와 통계

pub mod auth;
pub mod cart;
pub mod categories;
pub mod health;
pub mod products;
pub mod promotions;
pub mod reviews;
