// src/render/pdf.rs

use std::path::{Path, PathBuf};

use genpdf::{Alignment, Element, Scale, elements, style};

use super::{
    RenderError,
    layout::{Block, ReceiptLayout},
};

/// Desenha um `ReceiptLayout` com genpdf. Trabalho síncrono e pesado: no
/// servidor, chamar dentro de `spawn_blocking`.
#[derive(Debug, Clone)]
pub struct PdfRenderer {
    fonts_dir: PathBuf,
    font_family: String,
    logo_path: Option<PathBuf>,
}

impl PdfRenderer {
    pub fn new(fonts_dir: impl Into<PathBuf>, font_family: impl Into<String>) -> Self {
        Self {
            fonts_dir: fonts_dir.into(),
            font_family: font_family.into(),
            logo_path: None,
        }
    }

    pub fn with_logo(mut self, logo_path: Option<PathBuf>) -> Self {
        self.logo_path = logo_path;
        self
    }

    pub fn render(&self, layout: &ReceiptLayout) -> Result<Vec<u8>, RenderError> {
        // Carrega a fonte da pasta configurada (Regular, Bold, Italic, BoldItalic)
        let font_family = genpdf::fonts::from_files(&self.fonts_dir, &self.font_family, None)
            .map_err(|_| {
                RenderError::FontNotFound(format!(
                    "{} em {}",
                    self.font_family,
                    self.fonts_dir.display()
                ))
            })?;

        let mut doc = genpdf::Document::new(font_family);
        doc.set_title(layout.title.clone());
        let mut decorator = genpdf::SimplePageDecorator::new();
        decorator.set_margins(20);
        doc.set_page_decorator(decorator);

        for block in &layout.blocks {
            self.push_block(&mut doc, block)?;
        }

        let mut buffer = Vec::new();
        doc.render(&mut buffer)?;
        Ok(buffer)
    }

    fn push_block(&self, doc: &mut genpdf::Document, block: &Block) -> Result<(), RenderError> {
        let bold = style::Style::new().bold();

        match block {
            // --- CABEÇALHO ---
            Block::Header { booking_number, date } => {
                if let Some(logo) = self.logo_path.as_deref() {
                    push_logo(doc, logo);
                }
                doc.push(elements::Break::new(1));
                doc.push(
                    elements::Paragraph::new(format!("BOOKING NUMBER: {booking_number}"))
                        .styled(style::Style::new().with_font_size(10)),
                );
                doc.push(
                    elements::Paragraph::new(format!("DATE: {date}"))
                        .styled(style::Style::new().with_font_size(10)),
                );
                doc.push(elements::Break::new(2));
            }

            // --- BILL TO | PAYMENT METHOD ---
            Block::BillTo {
                full_name,
                email,
                phone,
                date,
                payment_method,
                payer_name,
                payer_phone,
            } => {
                let small = style::Style::new().with_font_size(9);
                let bill_to = elements::LinearLayout::vertical()
                    .element(elements::Paragraph::new("Bill To:").styled(bold.with_font_size(10)))
                    .element(elements::Paragraph::new(format!("Full Name: {full_name}")).styled(small))
                    .element(elements::Paragraph::new(format!("Email: {email}")).styled(small))
                    .element(elements::Paragraph::new(format!("Phone: {phone}")).styled(small))
                    .element(elements::Paragraph::new(format!("Date: {date}")).styled(small));
                let payment = elements::LinearLayout::vertical()
                    .element(elements::Paragraph::new("Payment Method").styled(bold.with_font_size(10)))
                    .element(elements::Paragraph::new(payment_method.as_str()).styled(small))
                    .element(elements::Paragraph::new(payer_name.as_str()).styled(small))
                    .element(elements::Paragraph::new(payer_phone.as_str()).styled(small));

                let mut columns = elements::TableLayout::new(vec![1, 1]);
                columns.row().element(bill_to).element(payment).push()?;
                doc.push(columns);
                doc.push(elements::Break::new(2));
            }

            // --- ATIVIDADE ---
            Block::Activity { title, rows } => {
                doc.push(elements::Paragraph::new(title.as_str()).styled(bold.with_font_size(12)));

                let cell = style::Style::new().with_font_size(8);
                let mut table = elements::TableLayout::new(vec![1, 3]);
                table.set_cell_decorator(elements::FrameCellDecorator::new(true, true, false));
                table
                    .row()
                    .element(elements::Paragraph::new("Item").styled(bold.with_font_size(8)).padded(1))
                    .element(elements::Paragraph::new("Details").styled(bold.with_font_size(8)).padded(1))
                    .push()?;
                for (label, value) in rows {
                    table
                        .row()
                        .element(elements::Paragraph::new(label.as_str()).styled(cell).padded(1))
                        .element(elements::Paragraph::new(value.as_str()).styled(cell).padded(1))
                        .push()?;
                }
                doc.push(table);
                doc.push(elements::Break::new(1.5));
            }

            // --- TOTAL ---
            Block::Total { amount } => {
                let mut total = elements::TableLayout::new(vec![3, 1]);
                let mut value = elements::Paragraph::new(amount.as_str());
                value.set_alignment(Alignment::Right);
                total
                    .row()
                    .element(elements::Paragraph::new("Total Amount").styled(bold.with_font_size(16)))
                    .element(value.styled(bold.with_font_size(16)))
                    .push()?;
                doc.push(total);
                doc.push(elements::Break::new(2));
            }

            // --- QR CODE ---
            Block::QrCode { image, .. } => {
                let dynamic_image = image::DynamicImage::ImageLuma8(image.clone());
                let qr = elements::Image::from_dynamic_image(dynamic_image)?
                    .with_alignment(Alignment::Right)
                    .with_scale(Scale::new(0.5, 0.5));
                doc.push(qr);
                let mut caption = elements::Paragraph::new("Scan to download");
                caption.set_alignment(Alignment::Right);
                doc.push(caption.styled(style::Style::new().with_font_size(8)));
            }
            Block::QrUnavailable => {
                doc.push(
                    elements::Paragraph::new("QR Code unavailable")
                        .styled(style::Style::new().with_font_size(8)),
                );
            }

            Block::PageBreak => doc.push(elements::PageBreak::new()),
        }

        Ok(())
    }
}

// Logo é opcional: se não abrir, o PDF sai sem ele.
fn push_logo(doc: &mut genpdf::Document, path: &Path) {
    match elements::Image::from_path(path) {
        Ok(logo) => doc.push(
            logo.with_alignment(Alignment::Center)
                .with_scale(Scale::new(0.5, 0.5)),
        ),
        Err(e) => tracing::warn!("⚠️ Logo {} não pôde ser carregado: {}", path.display(), e),
    }
}
