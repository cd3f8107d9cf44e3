//! # 페이지네이션
//!
//! 목록 API 공통의 `page` / `page_size` 쿼리 파라미터와
//! `{ items, total, page, page_size, pages }` 응답 래퍼입니다.

use serde::{Deserialize, Serialize};

use crate::error::AppError;

pub const DEFAULT_PAGE_SIZE: i64 = 10;
pub const MAX_PAGE_SIZE: i64 = 100;

/// URL 쿼리에서 그대로 파싱되는 값. 범위 검증 전 상태입니다.
#[derive(Debug, Default, Deserialize)]
pub struct PaginationParams {
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}

/// 검증을 통과한 페이지 정보
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub page: i64,
    pub page_size: i64,
}

impl PaginationParams {
    /// `page >= 1`, `1 <= page_size <= 100`을 확인합니다.
    pub fn validate(&self) -> Result<Page, AppError> {
        let page = self.page.unwrap_or(1);
        let page_size = self.page_size.unwrap_or(DEFAULT_PAGE_SIZE);

        if page < 1 {
            return Err(AppError::BadRequest("page must be at least 1".to_string()));
        }
        if !(1..=MAX_PAGE_SIZE).contains(&page_size) {
            return Err(AppError::BadRequest(format!(
                "page_size must be between 1 and {}",
                MAX_PAGE_SIZE
            )));
        }

        // OFFSET = (page - 1) * page_size가 i64 범위를 넘으면 거부
        if (page - 1).checked_mul(page_size).is_none() {
            return Err(AppError::BadRequest("page is too large".to_string()));
        }

        Ok(Page { page, page_size })
    }
}

impl Page {
    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.page_size)
    }

    pub fn limit(&self) -> i64 {
        self.page_size
    }
}

#[derive(Debug, Serialize)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub total: i64,
    pub page: i64,
    pub page_size: i64,
    pub pages: i64,
}

impl<T> Paginated<T> {
    pub fn new(items: Vec<T>, total: i64, page: Page) -> Self {
        // 올림 나눗셈: total=0이면 pages=0
        let pages = (total + page.page_size - 1) / page.page_size;
        Self {
            items,
            total,
            page: page.page,
            page_size: page.page_size,
            pages,
        }
    }
}
