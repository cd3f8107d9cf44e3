use crate::error::{is_unique_violation, AppError};
use crate::models::user::User;
use sqlx::SqlitePool;

const USER_COLUMNS: &str = "id, username, email, password_hash, roles, created_at, updated_at";

pub async fn create_user(
    pool: &SqlitePool,
    id: &str,
    username: &str,
    email: Option<&str>,
    password_hash: &str,
    roles: &str,
) -> Result<User, AppError> {
    sqlx::query(
        r#"
        INSERT INTO users (id, username, email, password_hash, roles)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(id)
    .bind(username)
    .bind(email)
    .bind(password_hash)
    .bind(roles)
    .execute(pool)
    .await
    .map_err(|e| {
        // 사전 중복 검사와 INSERT 사이에 끼어든 동시 가입
        if is_unique_violation(&e) {
            AppError::Conflict("Username or email already exists".to_string())
        } else {
            AppError::Database(e)
        }
    })?;

    find_by_id(pool, id)
        .await?
        .ok_or(AppError::Internal("Failed to retrieve created user".to_string()))
}

pub async fn find_by_username(pool: &SqlitePool, username: &str) -> Result<Option<User>, AppError> {
    let user = sqlx::query_as::<_, User>(&format!(
        "SELECT {} FROM users WHERE username = ?",
        USER_COLUMNS
    ))
    .bind(username)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

pub async fn find_by_id(pool: &SqlitePool, id: &str) -> Result<Option<User>, AppError> {
    let user = sqlx::query_as::<_, User>(&format!("SELECT {} FROM users WHERE id = ?", USER_COLUMNS))
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(user)
}

pub async fn find_by_email(pool: &SqlitePool, email: &str) -> Result<Option<User>, AppError> {
    let user = sqlx::query_as::<_, User>(&format!(
        "SELECT {} FROM users WHERE email = ?",
        USER_COLUMNS
    ))
    .bind(email)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

pub async fn store_refresh_token(
    pool: &SqlitePool,
    id: &str,
    user_id: &str,
    token_hash: &str,
    expires_at: &str,
) -> Result<(), AppError> {
    sqlx::query(
        r#"
        INSERT INTO refresh_tokens (id, user_id, token_hash, expires_at)
        VALUES (?, ?, ?, ?)
        "#,
    )
    .bind(id)
    .bind(user_id)
    .bind(token_hash)
    .bind(expires_at)
    .execute(pool)
    .await?;

    Ok(())
}

/// (id, user_id, expires_at)
pub async fn find_refresh_token(
    pool: &SqlitePool,
    token_hash: &str,
) -> Result<Option<(String, String, String)>, AppError> {
    let row = sqlx::query_as::<_, (String, String, String)>(
        r#"
        SELECT id, user_id, expires_at
        FROM refresh_tokens
        WHERE token_hash = ?
        "#,
    )
    .bind(token_hash)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

pub async fn delete_refresh_token(pool: &SqlitePool, token_hash: &str) -> Result<(), AppError> {
    sqlx::query("DELETE FROM refresh_tokens WHERE token_hash = ?")
        .bind(token_hash)
        .execute(pool)
        .await?;

    Ok(())
}

pub async fn delete_user_refresh_tokens(pool: &SqlitePool, user_id: &str) -> Result<(), AppError> {
    sqlx::query("DELETE FROM refresh_tokens WHERE user_id = ?")
        .bind(user_id)
        .execute(pool)
        .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::TestApp;

    #[tokio::test]
    async fn duplicate_username_insert_is_conflict() {
        let app = TestApp::new().await;
        create_user(&app.pool, "u1", "alice", None, "hash", "user")
            .await
            .unwrap();

        let err = create_user(&app.pool, "u2", "alice", None, "hash", "user")
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn duplicate_email_insert_is_conflict() {
        let app = TestApp::new().await;
        create_user(&app.pool, "u1", "alice", Some("a@example.com"), "hash", "user")
            .await
            .unwrap();

        let err = create_user(&app.pool, "u2", "bob", Some("a@example.com"), "hash", "user")
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Conflict(_)));
    }
}
