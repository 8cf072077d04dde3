use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use qrcode::render::svg;
use qrcode::{EcLevel, QrCode};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum QrError {
    #[error("no se pudo generar el código QR: {0}")]
    Encode(#[from] qrcode::types::QrError),
}

/// A rendered ticket. The token is carried alongside the image so nothing
/// downstream ever re-derives the payload from pixels.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QrTicket {
    pub token: String,
    pub data_url: String,
}

/// Render an opaque token as a scannable data URL (high error correction,
/// embeddable in mail clients and `<img>` tags).
pub fn render(token: &str) -> Result<QrTicket, QrError> {
    let code = QrCode::with_error_correction_level(token.as_bytes(), EcLevel::H)?;
    let image = code
        .render::<svg::Color>()
        .min_dimensions(300, 300)
        .build();

    Ok(QrTicket {
        token: token.to_string(),
        data_url: format!("data:image/svg+xml;base64,{}", STANDARD.encode(image)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_is_preserved_alongside_the_image() {
        let ticket = render("550e8400-e29b-41d4-a716-446655440000").unwrap();
        assert_eq!(ticket.token, "550e8400-e29b-41d4-a716-446655440000");
        assert!(ticket.data_url.starts_with("data:image/svg+xml;base64,"));
    }

    #[test]
    fn rendering_is_deterministic() {
        let a = render("some-token").unwrap();
        let b = render("some-token").unwrap();
        assert_eq!(a.data_url, b.data_url);
    }

    #[test]
    fn distinct_tokens_produce_distinct_images() {
        let a = render("token-one").unwrap();
        let b = render("token-two").unwrap();
        assert_ne!(a.data_url, b.data_url);
    }

    #[test]
    fn payload_decodes_back_to_svg() {
        let ticket = render("round-trip").unwrap();
        let encoded = ticket
            .data_url
            .strip_prefix("data:image/svg+xml;base64,")
            .unwrap();
        let bytes = STANDARD.decode(encoded).unwrap();
        let svg = String::from_utf8(bytes).unwrap();
        assert!(svg.contains("<svg"));
    }
}
