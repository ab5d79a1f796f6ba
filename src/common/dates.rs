// src/common/dates.rs

use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Texto produzido para datas que não conseguimos interpretar.
pub const INVALID_DATE: &str = "Invalid Date";

/// Interpreta uma data vinda do formulário ou do backend.
///
/// Aceita, nesta ordem: RFC 3339 (com fuso, mantendo o horário local do
/// texto), `YYYY-MM-DDTHH:MM:SS[.fff]` e `YYYY-MM-DD`.
pub fn parse(input: &str) -> Option<NaiveDateTime> {
    let s = input.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_local());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(dt);
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

pub fn parse_date(input: &str) -> Option<NaiveDate> {
    parse(input).map(|dt| dt.date())
}

/// `DD/MM/YYYY`. Vazio para entrada vazia, "Invalid Date" se não der para ler.
pub fn format_display_date(iso: &str) -> String {
    if iso.trim().is_empty() {
        return String::new();
    }
    match parse(iso) {
        Some(dt) => dt.format("%d/%m/%Y").to_string(),
        None => INVALID_DATE.to_string(),
    }
}

/// `MONTH DD, YYYY` em maiúsculas, usado no cabeçalho do PDF.
pub fn format_print_date(iso: &str) -> String {
    if iso.trim().is_empty() {
        return String::new();
    }
    match parse(iso) {
        Some(dt) => dt.format("%B %d, %Y").to_string().to_uppercase(),
        None => INVALID_DATE.to_uppercase(),
    }
}

/// Normaliza para `YYYY-MM-DD` (formato enviado ao backend).
pub fn to_iso_date(input: &str) -> Option<String> {
    parse_date(input).map(|d| d.format("%Y-%m-%d").to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_date_is_day_month_year() {
        assert_eq!(format_display_date("2024-05-01"), "01/05/2024");
        assert_eq!(format_display_date("2024-05-01T00:00:00Z"), "01/05/2024");
        assert_eq!(format_display_date("2024-12-31T18:30:00.123"), "31/12/2024");
    }

    #[test]
    fn print_date_is_long_and_uppercase() {
        assert_eq!(format_print_date("2024-05-01"), "MAY 01, 2024");
        assert_eq!(format_print_date("2023-11-15T10:00:00+05:00"), "NOVEMBER 15, 2023");
    }

    #[test]
    fn empty_input_yields_empty_string() {
        assert_eq!(format_display_date(""), "");
        assert_eq!(format_print_date("   "), "");
    }

    #[test]
    fn malformed_input_is_reported_not_recovered() {
        assert_eq!(format_display_date("not-a-date"), "Invalid Date");
        assert_eq!(format_display_date("2024-13-45"), "Invalid Date");
        assert_eq!(format_print_date("31/12/2024"), "INVALID DATE");
    }

    #[test]
    fn iso_normalization() {
        assert_eq!(to_iso_date("2024-06-10T09:15:00Z").as_deref(), Some("2024-06-10"));
        assert_eq!(to_iso_date(""), None);
        assert_eq!(to_iso_date("junk"), None);
    }
}
