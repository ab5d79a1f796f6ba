// src/render/layout.rs
//
// Montagem do PDF em blocos, sem depender de fontes: o `PdfCursor` estima a
// posição vertical (mm) e decide as quebras de página antes de cada seção.
// O `PdfRenderer` só desenha o que sair daqui.

use image::GrayImage;

use crate::{
    common::{dates, fields::Field},
    models::{
        receipt::ActivityType,
        record::{ActivityRecord, ReceiptRecord},
    },
};

use super::{format_money, pdf_file_name, qr, screen::activity_title};

pub const PAGE_TOP_MM: f64 = 20.0;
pub const PAGE_BREAK_THRESHOLD_MM: f64 = 220.0;

// Alturas estimadas (mm) de cada bloco.
const HEADER_HEIGHT: f64 = 60.0;
const BILL_TO_HEIGHT: f64 = 33.0;
const SECTION_TITLE_HEIGHT: f64 = 8.0;
const TABLE_ROW_HEIGHT: f64 = 7.0;
const SECTION_GAP: f64 = 8.0;
const TOTAL_HEIGHT: f64 = 15.0;
const QR_HEIGHT: f64 = 60.0;
const NOTICE_HEIGHT: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PdfCursor {
    y: f64,
    top: f64,
    threshold: f64,
}

impl Default for PdfCursor {
    fn default() -> Self {
        Self::new(PAGE_TOP_MM, PAGE_BREAK_THRESHOLD_MM)
    }
}

impl PdfCursor {
    pub fn new(top: f64, threshold: f64) -> Self {
        Self { y: top, top, threshold }
    }

    pub fn y(&self) -> f64 {
        self.y
    }

    /// Passou do limite: a próxima seção vai para uma página nova.
    pub fn needs_break(&self) -> bool {
        self.y > self.threshold
    }

    pub fn break_page(&mut self) -> f64 {
        self.y = self.top;
        self.y
    }

    pub fn advance(&mut self, height: f64) -> f64 {
        self.y += height;
        self.y
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Header {
        booking_number: String,
        date: String,
    },
    BillTo {
        full_name: String,
        email: String,
        phone: String,
        date: String,
        payment_method: String,
        payer_name: String,
        payer_phone: String,
    },
    Activity {
        title: String,
        rows: Vec<(String, String)>,
    },
    Total {
        amount: String,
    },
    QrCode {
        url: String,
        image: GrayImage,
    },
    QrUnavailable,
    PageBreak,
}

impl Block {
    pub fn estimated_height(&self) -> f64 {
        match self {
            Block::Header { .. } => HEADER_HEIGHT,
            Block::BillTo { .. } => BILL_TO_HEIGHT,
            // Título + cabeçalho "Item | Details" + linhas + respiro.
            Block::Activity { rows, .. } => {
                SECTION_TITLE_HEIGHT + TABLE_ROW_HEIGHT * (rows.len() as f64 + 1.0) + SECTION_GAP
            }
            Block::Total { .. } => TOTAL_HEIGHT,
            Block::QrCode { .. } => QR_HEIGHT,
            Block::QrUnavailable => NOTICE_HEIGHT,
            Block::PageBreak => 0.0,
        }
    }
}

/// Acumula blocos e insere `PageBreak` quando o cursor passa do limite.
#[derive(Debug, Default)]
pub struct LayoutBuilder {
    cursor: PdfCursor,
    blocks: Vec<Block>,
}

impl LayoutBuilder {
    pub fn new(cursor: PdfCursor) -> Self {
        Self { cursor, blocks: Vec::new() }
    }

    /// Adiciona uma seção e devolve a nova posição do cursor.
    pub fn append(&mut self, block: Block) -> f64 {
        if self.cursor.needs_break() {
            self.blocks.push(Block::PageBreak);
            self.cursor.break_page();
        }
        let height = block.estimated_height();
        self.blocks.push(block);
        self.cursor.advance(height)
    }

    pub fn cursor(&self) -> PdfCursor {
        self.cursor
    }

    pub fn finish(self) -> Vec<Block> {
        self.blocks
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LayoutOptions {
    /// Origem pública usada na URL do QR Code.
    pub public_origin: String,
    pub payment_method: String,
    pub cursor: PdfCursor,
}

impl LayoutOptions {
    pub fn new(public_origin: impl Into<String>, payment_method: impl Into<String>) -> Self {
        Self {
            public_origin: public_origin.into(),
            payment_method: payment_method.into(),
            cursor: PdfCursor::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReceiptLayout {
    pub title: String,
    pub file_name: String,
    pub qr_url: String,
    pub blocks: Vec<Block>,
}

/// Cabeçalho, "Bill To", uma tabela por atividade, total e QR Code, nesta ordem.
pub fn build_layout(record: &ReceiptRecord, options: &LayoutOptions) -> ReceiptLayout {
    let receipt_number = record.receipt_number();
    let print_date = dates::format_print_date(&record.text(Field::ReceiptDate));
    let client_name = record.text(Field::ClientName);
    let client_phone = record.text(Field::ClientPhone);
    let qr_url = qr::download_url(&options.public_origin, &record.id());

    let mut builder = LayoutBuilder::new(options.cursor);

    builder.append(Block::Header {
        booking_number: receipt_number.clone(),
        date: print_date.clone(),
    });
    builder.append(Block::BillTo {
        full_name: client_name.clone(),
        email: record.text(Field::ClientEmail),
        phone: client_phone.clone(),
        date: print_date,
        payment_method: options.payment_method.clone(),
        payer_name: client_name.to_uppercase(),
        payer_phone: client_phone,
    });

    for activity in record.activities() {
        builder.append(Block::Activity {
            title: activity_title(&activity),
            rows: print_rows(&activity),
        });
    }

    builder.append(Block::Total {
        amount: format_money(record.total()),
    });

    match qr::encode_image(&qr_url) {
        Ok(image) => {
            builder.append(Block::QrCode { url: qr_url.clone(), image });
        }
        Err(e) => {
            tracing::warn!(receipt_number = %receipt_number, "⚠️ QR Code indisponível: {}", e);
            builder.append(Block::QrUnavailable);
        }
    }

    ReceiptLayout {
        title: format!("Receipt {receipt_number}"),
        file_name: pdf_file_name(&receipt_number),
        qr_url,
        blocks: builder.finish(),
    }
}

/// Linhas "Item | Details" de uma atividade no PDF.
pub fn print_rows(activity: &ActivityRecord<'_>) -> Vec<(String, String)> {
    let activity_type = activity.activity_type();
    let is_car_rental = activity_type == Some(ActivityType::CarRental);
    let mut rows = Vec::new();

    if let Some(name) = activity.present(Field::PropertyName) {
        rows.push(("Property Name".to_string(), name));
    }
    if let Some(address) = activity.present(Field::PropertyAddress) {
        rows.push(("Address".to_string(), address));
    }

    if !is_car_rental {
        let dates_text: Vec<String> = [
            activity
                .present(Field::CheckIn)
                .map(|d| format!("Check-In: {}", dates::format_print_date(&d))),
            activity
                .present(Field::CheckOut)
                .map(|d| format!("Check-Out: {}", dates::format_print_date(&d))),
        ]
        .into_iter()
        .flatten()
        .collect();
        if !dates_text.is_empty() {
            rows.push(("Dates".to_string(), dates_text.join(" | ")));
        }
    }

    if is_car_rental {
        if let Some(pickup) = activity.present(Field::PickupLocation) {
            rows.push(("Pickup Location".to_string(), pickup));
        }
        if let Some(dropoff) = activity.present(Field::DropoffLocation) {
            rows.push(("Dropoff Location".to_string(), dropoff));
        }
    }

    if activity_type == Some(ActivityType::Transfer) {
        if let Some(transfer) = activity.present(Field::TransferType) {
            rows.push(("Transfer Type".to_string(), transfer));
        }
    }

    if let Some(comments) = activity.present(Field::Description) {
        rows.push(("Operator Comments".to_string(), comments));
    }

    rows.push(("Amount".to_string(), format_money(activity.amount())));
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    fn record_with(activities: Vec<Value>) -> ReceiptRecord {
        ReceiptRecord::new(json!({
            "id": "abc123",
            "receiptNumber": "M00003",
            "clientName": "Jane Doe",
            "clientEmail": "jane@x.com",
            "clientPhone": "+15551234567",
            "receiptDate": "2024-05-01",
            "activities": activities
        }))
    }

    fn options() -> LayoutOptions {
        LayoutOptions::new("https://receipts.example.com/", "Uzum Bank")
    }

    #[test]
    fn cursor_appends_return_new_position() {
        let mut builder = LayoutBuilder::new(PdfCursor::new(20.0, 50.0));
        assert_eq!(builder.append(Block::Total { amount: "$1.00".into() }), 35.0);
        assert_eq!(builder.append(Block::Total { amount: "$1.00".into() }), 50.0);
        // 50 não passa do limite; 65 passa.
        assert_eq!(builder.append(Block::Total { amount: "$1.00".into() }), 65.0);
        assert_eq!(builder.append(Block::QrUnavailable), 30.0);
        let blocks = builder.finish();
        assert_eq!(blocks[3], Block::PageBreak);
        assert_eq!(blocks.len(), 5);
    }

    #[test]
    fn sections_are_in_contract_order() {
        let layout = build_layout(
            &record_with(vec![json!({ "type": "hotel", "propertyName": "Hyatt", "amount": 10 })]),
            &options(),
        );

        assert_eq!(layout.file_name, "receipt_M00003.pdf");
        assert_eq!(layout.qr_url, "https://receipts.example.com/receipt/abc123?download=true");
        assert!(matches!(layout.blocks[0], Block::Header { .. }));
        assert!(matches!(layout.blocks[1], Block::BillTo { .. }));
        assert!(matches!(layout.blocks[2], Block::Activity { .. }));
        assert_eq!(layout.blocks[3], Block::Total { amount: "$10.00".into() });
        assert!(matches!(layout.blocks[4], Block::QrCode { .. }));

        if let Block::BillTo { payer_name, payment_method, date, .. } = &layout.blocks[1] {
            assert_eq!(payer_name, "JANE DOE");
            assert_eq!(payment_method, "Uzum Bank");
            assert_eq!(date, "MAY 01, 2024");
        }
    }

    #[test]
    fn rows_depend_on_activity_type() {
        let record = record_with(vec![
            json!({
                "type": "car_rental", "propertyName": "Avis", "checkIn": "2024-04-01",
                "pickupLocation": "Airport", "dropoffLocation": "Hotel",
                "description": "Driver", "amount": 25
            }),
            json!({
                "type": "transfer", "checkIn": "2024-04-01", "checkOut": "2024-04-02",
                "transferType": "airport_pickup", "pickupLocation": "Airport", "amount": "12.5"
            }),
        ]);
        let activities = record.activities();

        let labels = |rows: Vec<(String, String)>| rows.into_iter().map(|(l, _)| l).collect::<Vec<_>>();
        assert_eq!(
            labels(print_rows(&activities[0])),
            ["Property Name", "Pickup Location", "Dropoff Location", "Operator Comments", "Amount"]
        );

        let transfer = print_rows(&activities[1]);
        assert_eq!(
            transfer[0],
            ("Dates".to_string(), "Check-In: APRIL 01, 2024 | Check-Out: APRIL 02, 2024".to_string())
        );
        assert_eq!(transfer[1], ("Transfer Type".to_string(), "airport_pickup".to_string()));
        assert_eq!(transfer[2], ("Amount".to_string(), "$12.50".to_string()));
    }

    #[test]
    fn many_activities_break_pages_before_sections() {
        let activities = (0..12)
            .map(|i| json!({ "type": "other", "description": format!("Tour {i}"), "amount": 5 }))
            .collect();
        let layout = build_layout(&record_with(activities), &options());
        let breaks = layout.blocks.iter().filter(|b| **b == Block::PageBreak).count();
        assert!(breaks >= 1);
        // Nunca duas quebras seguidas nem quebra no fim.
        assert_ne!(layout.blocks.last(), Some(&Block::PageBreak));
    }

    #[test]
    fn unencodable_url_degrades_to_notice() {
        let mut options = options();
        options.public_origin = format!("https://{}", "x".repeat(5000));
        let layout = build_layout(&record_with(vec![json!({ "type": "other", "amount": 1 })]), &options);
        assert_eq!(layout.blocks.last(), Some(&Block::QrUnavailable));
        assert!(matches!(layout.blocks[3], Block::Total { .. }));
    }
}
