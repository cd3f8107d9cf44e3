//! # 타임스탬프 유틸리티
//!
//! DB의 모든 시각 컬럼은 `strftime('%Y-%m-%dT%H:%M:%fZ', 'now')`와 같은
//! `2025-01-31T12:00:00.000Z` 형식의 UTC 문자열입니다.
//! 형식이 고정되어 있으므로 문자열 비교가 곧 시간 비교가 됩니다.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use crate::error::AppError;

/// SQLite `strftime('%Y-%m-%dT%H:%M:%fZ')`와 같은 결과를 내는 chrono 포맷
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

pub fn format_timestamp(dt: &DateTime<Utc>) -> String {
    dt.format(TIMESTAMP_FORMAT).to_string()
}

pub fn now_timestamp() -> String {
    format_timestamp(&Utc::now())
}

/// 클라이언트가 보낸 날짜 문자열을 UTC 시각으로 해석합니다.
///
/// 허용 형식:
/// - RFC 3339: `2025-01-01T09:00:00+09:00`, `2025-01-01T00:00:00Z`
/// - 시간대 없는 ISO 8601: `2025-01-01T00:00:00`, `2025-01-01T00:00:00.123456` (UTC로 간주)
/// - 날짜만: `2025-01-01` (자정)
pub fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, AppError> {
    let value = value.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(naive.and_utc());
    }
    if let Some(naive) = NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
    {
        return Ok(naive.and_utc());
    }

    Err(AppError::BadRequest(format!("Invalid datetime: {}", value)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn formats_like_sqlite_strftime() {
        let dt = Utc.with_ymd_and_hms(2025, 3, 4, 5, 6, 7).unwrap();
        assert_eq!(format_timestamp(&dt), "2025-03-04T05:06:07.000Z");
    }

    #[test]
    fn parses_offset_and_naive_inputs() {
        let expected = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(parse_timestamp("2025-01-01T00:00:00Z").unwrap(), expected);
        assert_eq!(parse_timestamp("2025-01-01T09:00:00+09:00").unwrap(), expected);
        assert_eq!(parse_timestamp("2025-01-01T00:00:00").unwrap(), expected);
        assert_eq!(parse_timestamp("2025-01-01").unwrap(), expected);
        assert!(parse_timestamp("2025-01-01T00:00:00.250").is_ok());
    }

    #[test]
    fn rejects_garbage() {
        assert!(matches!(
            parse_timestamp("next tuesday"),
            Err(AppError::BadRequest(_))
        ));
    }
}
