//! # Storefront 웹 서버 진입점
//!
//! 이 파일이 수행하는 작업:
//! 1. 환경변수(.env) 로딩
//! 2. 로깅(tracing) 초기화 (`RUST_LOG`가 없으면 `DEBUG`에 따라 기본 레벨 결정)
//! 3. SQLite 데이터베이스 연결 풀 생성 (파일이 없으면 생성)
//! 4. 데이터베이스 마이그레이션 실행
//! 5. 정적 파일(업로드 이미지) 디렉토리 생성
//! 6. 라우터 조립 후 HTTP 서버 시작

mod app;
mod config;
mod db;
mod error;
mod middleware;
mod models;
mod routes;
mod services;
#[cfg(test)]
mod test_support;

use std::path::Path;
use std::str::FromStr;

use anyhow::Result;
use app::{build_router, AppState};
use config::Config;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // .env 파일이 없어도 에러 없이 넘어갑니다.
    dotenvy::dotenv().ok();

    // 로거보다 설정을 먼저 읽어야 DEBUG 값으로 기본 로그 레벨을 정할 수 있습니다.
    let config = Config::from_env()?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.default_log_filter().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        "Starting {} v{} on {}:{} (debug: {})",
        config.project_name,
        config.project_version,
        config.host,
        config.port,
        config.debug
    );

    let connect_options =
        SqliteConnectOptions::from_str(&config.database_url)?.create_if_missing(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .connect_with(connect_options)
        .await?;

    tracing::info!("Running database migrations...");
    sqlx::migrate!("./migrations").run(&pool).await?;

    let static_path = Path::new(&config.static_path);
    if !static_path.exists() {
        tokio::fs::create_dir_all(static_path).await?;
        tracing::info!("Created static directory: {}", config.static_path);
    }

    let app = build_router(AppState::new(pool, &config));

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
