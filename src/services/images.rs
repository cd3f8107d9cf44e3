//! # 프로모션 이미지 저장 서비스
//!
//! 클라이언트가 JSON 본문에 base64로 실어 보낸 이미지를 디코딩해
//! `<static_path>/images/promotions/<promotion_id>.jpg`에 저장합니다.
//! 저장된 파일은 `/static/images/promotions/<promotion_id>.jpg` URL로 서빙됩니다.

use std::path::{Path, PathBuf};

use base64::{engine::general_purpose::STANDARD, Engine as _};
use tokio::fs;

use crate::error::AppError;

const PROMOTION_IMAGE_DIR: &str = "images/promotions";

/// 저장된 이미지의 디스크 경로와 공개 URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredImage {
    pub path: String,
    pub url: String,
}

/// base64 문자열을 디코딩합니다.
///
/// `data:image/png;base64,...` 형태의 data URL 접두사가 있으면 제거합니다.
pub fn decode_image(image_base64: &str) -> Result<Vec<u8>, AppError> {
    let payload = match image_base64.split_once(";base64,") {
        Some((prefix, data)) if prefix.starts_with("data:") => data,
        _ => image_base64,
    };

    STANDARD
        .decode(payload.trim())
        .map_err(|e| AppError::BadRequest(format!("Invalid base64 image: {}", e)))
}

/// 디코딩까지 끝났지만 아직 디스크에 쓰지 않은 이미지.
///
/// 프로모션 생성은 DB INSERT가 성공한 뒤에만 파일을 쓰므로,
/// 입력 검증(디코딩)과 파일 쓰기를 두 단계로 나눕니다.
#[derive(Debug)]
pub struct PendingImage {
    pub location: StoredImage,
    bytes: Vec<u8>,
}

impl PendingImage {
    pub fn decode(static_path: &str, promotion_id: &str, image_base64: &str) -> Result<Self, AppError> {
        let bytes = decode_image(image_base64)?;

        let filename = format!("{}.jpg", promotion_id);
        let full_path = PathBuf::from(static_path).join(PROMOTION_IMAGE_DIR).join(&filename);

        Ok(Self {
            location: StoredImage {
                path: full_path.to_string_lossy().into_owned(),
                url: format!("/static/{}/{}", PROMOTION_IMAGE_DIR, filename),
            },
            bytes,
        })
    }

    /// 같은 프로모션의 기존 이미지는 덮어씁니다.
    pub async fn write(&self) -> Result<(), AppError> {
        let path = Path::new(&self.location.path);
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).await?;
        }
        fs::write(path, &self.bytes).await?;
        Ok(())
    }

    /// 써 둔 파일을 지웁니다. 실패해도 경고만 남깁니다.
    pub async fn discard(&self) {
        if let Err(e) = fs::remove_file(&self.location.path).await {
            tracing::warn!(path = %self.location.path, error = %e, "Failed to remove promotion image");
        }
    }
}

/// 프로모션 이미지를 디코딩해 바로 디스크에 저장합니다.
pub async fn save_promotion_image(
    static_path: &str,
    promotion_id: &str,
    image_base64: &str,
) -> Result<StoredImage, AppError> {
    let image = PendingImage::decode(static_path, promotion_id, image_base64)?;
    image.write().await?;
    Ok(image.location)
}

#[cfg(test)]
mod tests {
    use super::*;

    // 1x1 투명 PNG
    const PIXEL: &str = "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAQAAAC1HAwCAAAAC0lEQVR42mNk+A8AAQUBAScY42YAAAAASUVORK5CYII=";

    #[test]
    fn strips_data_url_prefix() {
        let plain = decode_image(PIXEL).unwrap();
        let with_prefix = decode_image(&format!("data:image/png;base64,{}", PIXEL)).unwrap();
        assert_eq!(plain, with_prefix);
    }

    #[test]
    fn invalid_payload_is_bad_request() {
        assert!(matches!(
            decode_image("not base64!!"),
            Err(AppError::BadRequest(_))
        ));
    }

    #[tokio::test]
    async fn writes_image_under_static_dir() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().to_str().unwrap();

        let stored = save_promotion_image(root, "promo-1", PIXEL).await.unwrap();

        assert_eq!(stored.url, "/static/images/promotions/promo-1.jpg");
        let written = std::fs::read(&stored.path).unwrap();
        assert_eq!(written, decode_image(PIXEL).unwrap());
    }

    #[tokio::test]
    async fn pending_image_touches_disk_only_on_write() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().to_str().unwrap();

        let image = PendingImage::decode(root, "promo-2", PIXEL).unwrap();
        assert!(!Path::new(&image.location.path).exists());

        image.write().await.unwrap();
        assert!(Path::new(&image.location.path).exists());

        image.discard().await;
        assert!(!Path::new(&image.location.path).exists());
    }
}
