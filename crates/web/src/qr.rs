use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use image::Luma;
use qrcode::{EcLevel, QrCode};
use rand::RngCore;
use rand::rngs::OsRng;
use std::io::Cursor;
use thiserror::Error;

/// Bytes of randomness behind each token. Six bytes encode to exactly eight
/// base64url characters, which is plenty for a roster in the low thousands.
const TOKEN_RANDOM_BYTES: usize = 6;

/// Module pixel size; together with the quiet zone this keeps the code
/// scannable when printed small.
const QR_MODULE_SIZE: u32 = 8;

#[derive(Debug, Error)]
pub enum QrRenderError {
    #[error("QR encoding failed: {0}")]
    Encode(#[from] qrcode::types::QrError),

    #[error("PNG rendering failed: {0}")]
    Image(#[from] image::ImageError),
}

/// Generate an unpredictable, URL-safe check-in token.
pub fn generate_token() -> String {
    let mut bytes = [0u8; TOKEN_RANDOM_BYTES];
    OsRng.fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

pub fn check_in_url(app_url: &str, token: &str) -> String {
    format!("{}/check-in?token={}", app_url.trim_end_matches('/'), token)
}

/// Render the check-in URL into a PNG QR code. Error-correction level M
/// tolerates print damage without inflating the module count.
pub fn render_png(url: &str) -> Result<Vec<u8>, QrRenderError> {
    let code = QrCode::with_error_correction_level(url, EcLevel::M)?;
    let image = code
        .render::<Luma<u8>>()
        .module_dimensions(QR_MODULE_SIZE, QR_MODULE_SIZE)
        .build();

    let mut png = Vec::new();
    image.write_to(&mut Cursor::new(&mut png), image::ImageFormat::Png)?;
    Ok(png)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn token_is_eight_url_safe_chars() {
        let token = generate_token();
        assert_eq!(token.len(), 8);
        assert!(
            token
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        );
    }

    #[test]
    fn tokens_do_not_repeat() {
        let tokens: HashSet<String> = (0..500).map(|_| generate_token()).collect();
        assert_eq!(tokens.len(), 500);
    }

    #[test]
    fn check_in_url_appends_token_query() {
        let url = check_in_url("https://attend.example.com", "abc123XY");
        assert_eq!(url, "https://attend.example.com/check-in?token=abc123XY");

        // Trailing slash on the base must not produce a double slash.
        let url = check_in_url("https://attend.example.com/", "abc123XY");
        assert_eq!(url, "https://attend.example.com/check-in?token=abc123XY");
    }

    #[test]
    fn render_produces_png_bytes() {
        let png = render_png("https://attend.example.com/check-in?token=abc123XY").unwrap();
        assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");
    }
}
