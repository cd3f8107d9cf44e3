use sqlx::SqlitePool;

/// 데이터베이스 연결을 확인합니다. 리터럴 `SELECT 1`을 실행할 뿐입니다.
///
/// `/health/db` 핸들러가 에러 문자열을 그대로 응답에 싣기 때문에
/// `AppError`가 아닌 원본 `sqlx::Error`를 반환합니다.
pub async fn ping(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query_scalar::<_, i64>("SELECT 1").fetch_one(pool).await?;
    Ok(())
}
