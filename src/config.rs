//! # 애플리케이션 설정(Configuration) 모듈
//!
//! 환경변수에서 서버 설정값을 읽어오는 모듈입니다.
//! `.env` 파일이나 시스템 환경변수에서 값을 가져옵니다.
//!
//! 설정 항목:
//! - `DATABASE_URL`: SQLite 데이터베이스 경로 (필수)
//! - `JWT_SECRET`: 토큰 서명에 사용할 비밀키 (필수)
//! - `DEBUG`: 디버그 모드 여부 (기본값: false)
//! - `PROJECT_NAME` / `PROJECT_VERSION`: 서비스 이름과 버전
//! - `STATIC_PATH`: 프로모션 이미지 등 정적 파일 저장 디렉토리
//! - `ADMIN_USERNAMES`: 가입 시 admin 역할을 부여할 사용자 이름 목록 (쉼표 구분)
//! - `DATABASE_MAX_CONNECTIONS`: 연결 풀 크기
//! - `HOST` / `PORT`: 서버 바인딩 주소

use std::env;

/// 애플리케이션 전체 설정을 담는 구조체
///
/// 서버 시작 시 환경변수에서 한 번 읽어온 후,
/// 애플리케이션 전체에서 공유됩니다.
#[derive(Debug, Clone)]
pub struct Config {
    /// SQLite 데이터베이스 URL (예: "sqlite:data/storefront.db")
    pub database_url: String,
    /// access/refresh 토큰 서명/검증에 사용하는 비밀키
    pub jwt_secret: String,
    /// 디버그 모드. 켜져 있으면 기본 로그 레벨이 debug가 됩니다.
    pub debug: bool,
    pub project_name: String,
    pub project_version: String,
    /// 업로드된 이미지가 저장되는 디렉토리 (`/static`으로 서빙됨)
    pub static_path: String,
    /// 가입 시 admin 역할을 받는 사용자 이름들
    pub admin_usernames: Vec<String>,
    pub max_connections: u32,
    /// 서버가 바인딩할 호스트 주소 (기본값: "0.0.0.0")
    pub host: String,
    /// 서버 포트 번호 (기본값: 8000)
    pub port: u16,
}

impl Config {
    /// 환경변수에서 설정값을 읽어 Config 인스턴스를 생성합니다.
    ///
    /// # 에러
    /// `DATABASE_URL`과 `JWT_SECRET`은 필수이며, 없으면 에러가 발생합니다.
    /// 나머지 설정은 기본값이 있어 환경변수가 없어도 동작합니다.
    pub fn from_env() -> Result<Self, env::VarError> {
        Ok(Self {
            database_url: env::var("DATABASE_URL")?,
            jwt_secret: env::var("JWT_SECRET")?,
            debug: env::var("DEBUG").map(|v| parse_bool(&v)).unwrap_or(false),
            project_name: env::var("PROJECT_NAME")
                .unwrap_or_else(|_| "Storefront API".to_string()),
            project_version: env::var("PROJECT_VERSION")
                .unwrap_or_else(|_| env!("CARGO_PKG_VERSION").to_string()),
            static_path: env::var("STATIC_PATH").unwrap_or_else(|_| "static".to_string()),
            admin_usernames: env::var("ADMIN_USERNAMES")
                .map(|v| parse_list(&v))
                .unwrap_or_default(),
            max_connections: env::var("DATABASE_MAX_CONNECTIONS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(5),
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            // 파싱 실패 시 기본값 8000
            port: env::var("PORT")
                .unwrap_or_else(|_| "8000".to_string())
                .parse()
                .unwrap_or(8000),
        })
    }

    /// `RUST_LOG`가 없을 때 사용할 기본 로그 필터
    pub fn default_log_filter(&self) -> &'static str {
        if self.debug {
            "storefront=debug,tower_http=debug,axum=debug"
        } else {
            "storefront=info,tower_http=info"
        }
    }
}

/// "true", "1", "yes", "on"(대소문자 무시)을 참으로 해석합니다.
fn parse_bool(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "true" | "1" | "yes" | "on"
    )
}

fn parse_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
