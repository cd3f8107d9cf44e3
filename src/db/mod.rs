//! # 데이터베이스 접근 계층 (Data Access Layer)
//!
//! 데이터베이스와 직접 상호작용하는 함수들을 모아둔 모듈입니다.
//! 라우트 핸들러(routes/)에서 이 모듈의 함수를 호출하여 DB 작업을 수행합니다.
//!
//! 각 하위 모듈:
//! - `cart`: 장바구니 항목 쿼리 (사용자별)
//! - `categories`: 카테고리 CRUD (soft delete)
//! - `health`: 연결 확인용 `SELECT 1`
//! - `products`: 상품 CRUD, 필터 검색, 평점 재계산
//! - `promotions`: 프로모션 CRUD와 상품 연결
//! - `reviews`: 리뷰 CRUD와 통계
//! - `users`: 사용자 인증 관련 쿼리
//!
//! ## soft delete 규칙
//! `deleted_at` 컬럼을 가진 테이블은 모든 조회에서 `deleted_at IS NULL`을 조건으로 겁니다.
//! 삭제는 `deleted_at`에 현재 시각을 기록하는 UPDATE입니다.

pub mod cart;
pub mod categories;
pub mod health;
pub mod products;
pub mod promotions;
pub mod reviews;
pub mod users;

pub use cart::*;
pub use categories::*;
pub use health::*;
pub use products::*;
pub use promotions::*;
pub use reviews::*;

/// LIKE 패턴의 와일드카드(`%`, `_`)와 이스케이프 문자를 무력화합니다.
/// 쿼리에는 `ESCAPE '\'`를 함께 써야 합니다.
pub(crate) fn escape_like(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
