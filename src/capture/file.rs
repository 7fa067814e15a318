use std::path::Path;

use crate::capture::EncodedImage;
use crate::error::CaptureError;

/// Reads a user-chosen file and wraps it as an encoded still.
///
/// No validation beyond format sniffing; dimensions and content are the
/// service's problem.
pub async fn load_image_file(path: &Path) -> Result<EncodedImage, CaptureError> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|source| CaptureError::FileRead {
            path: path.display().to_string(),
            source,
        })?;

    EncodedImage::from_bytes(bytes)
        .ok_or_else(|| CaptureError::UnsupportedFile(path.display().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbImage;
    use std::io::Write;

    #[tokio::test]
    async fn loads_a_png_from_disk() {
        let image = RgbImage::from_pixel(4, 4, image::Rgb([10, 20, 30]));
        let mut bytes = Vec::new();
        image
            .write_with_encoder(image::codecs::png::PngEncoder::new(&mut bytes))
            .unwrap();

        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&bytes).unwrap();

        let encoded = load_image_file(file.path()).await.unwrap();
        assert_eq!(encoded.mime(), "image/png");
    }

    #[tokio::test]
    async fn rejects_a_text_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"hello, not an image").unwrap();

        let err = load_image_file(file.path()).await.unwrap_err();
        assert!(matches!(err, CaptureError::UnsupportedFile(_)));
    }

    #[tokio::test]
    async fn missing_file_is_a_read_error() {
        let err = load_image_file(Path::new("/nonexistent/selfie.jpg"))
            .await
            .unwrap_err();
        assert!(matches!(err, CaptureError::FileRead { .. }));
    }
}
