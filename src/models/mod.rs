//! # 데이터 모델 모듈
//!
//! 애플리케이션에서 사용하는 데이터 구조체(struct)들을 정의합니다.
//! 각 하위 모듈은 특정 도메인의 데이터 타입을 담당합니다:
//! - `cart`: 장바구니 항목
//! - `category`: 상품 카테고리
//! - `pagination`: 페이지네이션 파라미터와 응답 래퍼
//! - `product`: 상품과 검색 필터
//! - `promotion`: 프로모션(기획전)과 연결 상품
//! - `review`: 상품 리뷰와 통계
//! - `user`: 사용자(User)와 인증 요청/응답
//!
//! 응답 JSON의 ID 필드는 `category_id`, `product_id`처럼 리소스 이름을 붙여 내보냅니다.
//! DB 컬럼은 모두 `id`이므로 `#[serde(rename = ...)]`로 맞춥니다.

pub mod cart;
pub mod category;
pub mod pagination;
pub mod product;
pub mod promotion;
pub mod review;
pub mod user;

pub use cart::*;
pub use category::*;
pub use pagination::*;
pub use product::*;
pub use promotion::*;
pub use review::*;
pub use user::*;
