// src/render.rs
//
// Renderização do recibo: tela (detalhe e prévia) e PDF.
// As duas saídas leem o registro pelo normalizador de campos.

pub mod layout;
pub mod pdf;
pub mod qr;
pub mod screen;

use rust_decimal::Decimal;
use thiserror::Error;

pub use layout::{Block, LayoutBuilder, LayoutOptions, PdfCursor, ReceiptLayout, build_layout};
pub use pdf::PdfRenderer;
pub use screen::{PreviewView, ScreenView};

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Fonte não encontrada: {0}")]
    FontNotFound(String),

    #[error("Falha ao montar o PDF: {0}")]
    Pdf(#[from] genpdf::error::Error),
}

/// Duas casas, sem separador de milhar: `$1234.50`.
pub fn format_money(amount: Decimal) -> String {
    format!("${:.2}", amount)
}

/// `receipt_<número>.pdf`. O número vem do backend: só letras, dígitos,
/// `-` e `_` passam; o resto vira `_`.
pub fn pdf_file_name(receipt_number: &str) -> String {
    let safe: String = receipt_number
        .trim()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();
    format!("receipt_{}.pdf", safe)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn money_has_two_decimals() {
        assert_eq!(format_money(Decimal::new(15050, 2)), "$150.50");
        assert_eq!(format_money(Decimal::from(30)), "$30.00");
    }

    #[test]
    fn file_name() {
        assert_eq!(pdf_file_name("M00042"), "receipt_M00042.pdf");
        assert_eq!(pdf_file_name(" M-0_1 "), "receipt_M-0_1.pdf");
    }

    #[test]
    fn file_name_never_leaves_the_folder() {
        for hostile in ["../../etc/passwd", "..\\boot.ini", "/tmp/x", "a\"b"] {
            let name = pdf_file_name(hostile);
            assert!(!name.contains('/') && !name.contains('\\') && !name.contains(".."), "{name}");
            assert!(!name.contains('"'));
            assert_eq!(std::path::Path::new(&name).components().count(), 1);
        }
    }
}
