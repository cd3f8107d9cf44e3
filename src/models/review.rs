use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Review {
    #[serde(rename = "review_id")]
    pub id: String,
    pub user_id: String,
    pub product_id: String,
    pub text: String,
    pub rating: i64,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateReviewRequest {
    pub product_id: String,
    pub text: String,
    pub rating: i64,
}

#[derive(Debug, Deserialize)]
pub struct UpdateReviewRequest {
    pub text: Option<String>,
    pub rating: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ReviewFilter {
    pub product_id: Option<String>,
    pub user_id: Option<String>,
    pub min_rating: Option<i64>,
    pub max_rating: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct ReviewStatistics {
    pub product_id: String,
    /// 소수점 첫째 자리에서 반올림
    pub average_rating: f64,
    pub total_reviews: i64,
    /// "1_star" ~ "5_star" 키. 리뷰가 없는 등급도 0으로 채웁니다.
    pub rating_counts: BTreeMap<String, i64>,
}
