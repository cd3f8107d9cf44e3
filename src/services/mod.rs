//! # 서비스 모듈
//!
//! DB 밖의 부수 작업을 담당합니다.
//! - `images`: base64 이미지를 디스크에 저장
//! - `timestamps`: 타임스탬프 생성/파싱 (DB 저장 형식과 동일)

pub mod images;
pub mod timestamps;

pub use images::*;
pub use timestamps::*;
