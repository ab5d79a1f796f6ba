// src/render/qr.rs

use image::{GrayImage, Luma};
use qrcode::{EcLevel, QrCode, types::QrError};

/// URL que o QR Code do recibo carrega: abrir leva ao download do PDF.
pub fn download_url(origin: &str, receipt_id: &str) -> String {
    format!(
        "{}/receipt/{}?download=true",
        origin.trim().trim_end_matches('/'),
        receipt_id
    )
}

pub fn encode(payload: &str) -> Result<QrCode, QrError> {
    QrCode::with_error_correction_level(payload.as_bytes(), EcLevel::M)
}

/// Codifica e já rasteriza em tons de cinza (módulos de 4px, com margem).
pub fn encode_image(payload: &str) -> Result<GrayImage, QrError> {
    let code = encode(payload)?;
    Ok(code
        .render::<Luma<u8>>()
        .module_dimensions(4, 4)
        .quiet_zone(true)
        .build())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_format() {
        assert_eq!(
            download_url("http://localhost:8080/", "abc123"),
            "http://localhost:8080/receipt/abc123?download=true"
        );
    }

    #[test]
    fn encodes_receipt_url() {
        let image = encode_image(&download_url("http://localhost:8080", "abc123")).unwrap();
        assert!(image.width() > 0);
        assert_eq!(image.width(), image.height());
    }

    #[test]
    fn oversized_payload_fails() {
        assert!(matches!(encode(&"x".repeat(5000)), Err(QrError::DataTooLong)));
    }
}
