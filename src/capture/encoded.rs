use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use image::RgbImage;

use crate::error::CaptureError;

const JPEG_QUALITY: u8 = 90;

/// One encoded still image, as produced by both acquisition sources and
/// consumed by the analysis client.
#[derive(Clone, PartialEq, Eq)]
pub struct EncodedImage {
    bytes: Vec<u8>,
    mime: &'static str,
}

impl std::fmt::Debug for EncodedImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EncodedImage")
            .field("mime", &self.mime)
            .field("bytes", &self.bytes.len())
            .finish()
    }
}

impl EncodedImage {
    /// Wraps already-encoded bytes, sniffing the format from magic bytes.
    /// Returns `None` for anything that is not a recognized image type.
    pub fn from_bytes(bytes: Vec<u8>) -> Option<Self> {
        let mime = sniff_mime(&bytes)?;
        Some(Self { bytes, mime })
    }

    /// JPEG-encodes a raw RGB frame (camera snapshot path).
    pub fn from_rgb(image: &RgbImage) -> Result<Self, CaptureError> {
        let mut bytes = Vec::new();
        let encoder =
            image::codecs::jpeg::JpegEncoder::new_with_quality(&mut bytes, JPEG_QUALITY);
        image.write_with_encoder(encoder)?;
        Ok(Self {
            bytes,
            mime: "image/jpeg",
        })
    }

    pub fn mime(&self) -> &'static str {
        self.mime
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Base64 payload for the service's `inline_data` part.
    pub fn base64_payload(&self) -> String {
        BASE64.encode(&self.bytes)
    }

    /// Decodes a `data:<mime>;base64,<payload>` URL, as pasted into the
    /// upload box. The payload's magic bytes win over the declared mime.
    pub fn from_data_url(url: &str) -> Option<Self> {
        let rest = url.strip_prefix("data:")?;
        let (_, payload) = rest.split_once(";base64,")?;
        let bytes = BASE64.decode(payload).ok()?;
        Self::from_bytes(bytes)
    }
}

fn sniff_mime(bytes: &[u8]) -> Option<&'static str> {
    if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
        Some("image/jpeg")
    } else if bytes.starts_with(&[0x89, b'P', b'N', b'G']) {
        Some("image/png")
    } else if bytes.starts_with(b"GIF8") {
        Some("image/gif")
    } else if bytes.len() >= 12 && bytes.starts_with(b"RIFF") && &bytes[8..12] == b"WEBP" {
        Some("image/webp")
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tiny_png_bytes() -> Vec<u8> {
        let image = RgbImage::from_pixel(2, 2, image::Rgb([200, 100, 50]));
        let mut bytes = Vec::new();
        image
            .write_with_encoder(image::codecs::png::PngEncoder::new(&mut bytes))
            .unwrap();
        bytes
    }

    #[test]
    fn sniffs_png_and_jpeg_magic_bytes() {
        let png = EncodedImage::from_bytes(tiny_png_bytes()).unwrap();
        assert_eq!(png.mime(), "image/png");

        let jpeg =
            EncodedImage::from_rgb(&RgbImage::from_pixel(2, 2, image::Rgb([0, 0, 0]))).unwrap();
        assert_eq!(jpeg.mime(), "image/jpeg");
        assert!(jpeg.bytes().starts_with(&[0xFF, 0xD8, 0xFF]));
    }

    #[test]
    fn rejects_non_image_bytes() {
        assert!(EncodedImage::from_bytes(b"not an image".to_vec()).is_none());
    }

    #[test]
    fn pasted_data_url_decodes_to_the_original_bytes() {
        let original = EncodedImage::from_bytes(tiny_png_bytes()).unwrap();
        let url = format!("data:image/png;base64,{}", original.base64_payload());
        assert_eq!(EncodedImage::from_data_url(&url).unwrap(), original);
    }

    #[test]
    fn malformed_data_urls_are_rejected() {
        // Bad base64, non-image payload, and a plain URL.
        assert!(EncodedImage::from_data_url("data:image/png;base64,!!!").is_none());
        assert!(EncodedImage::from_data_url("data:text/plain;base64,aGVsbG8=").is_none());
        assert!(EncodedImage::from_data_url("https://example.com/a.png").is_none());
    }
}
