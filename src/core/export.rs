//! File exports and external deep links.

use std::fmt::Write as _;
use std::string::FromUtf8Error;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::capital_loss::{IncomeCategory, LossAllocation};
use super::portfolio::{AssetCategory, PortfolioSummary, Position};

pub const POSITIONS_CSV_HEADER: &str =
    "id,ticker,nome,categoria,quantita,prezzo_medio,prezzo_attuale,valore,pl";
pub const LOSSES_CSV_HEADER: &str =
    "id,categoria,importo,scadenza,giorni,utilizzato,residuo,descrizione";

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("unexpected CSV header {0:?}")]
    UnexpectedHeader(String),
    #[error("export is not valid UTF-8: {0}")]
    Utf8(#[from] FromUtf8Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ExportFormat {
    Csv,
    Json,
    Text,
}

impl ExportFormat {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "csv" => Some(ExportFormat::Csv),
            "json" => Some(ExportFormat::Json),
            "txt" | "text" => Some(ExportFormat::Text),
            _ => None,
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
            ExportFormat::Text => "txt",
        }
    }

    pub fn content_type(self) -> &'static str {
        match self {
            ExportFormat::Csv => "text/csv; charset=utf-8",
            ExportFormat::Json => "application/json",
            ExportFormat::Text => "text/plain; charset=utf-8",
        }
    }
}

/// `<stem>-YYYY-MM-DD.<ext>`
pub fn export_filename(stem: &str, date: NaiveDate, format: ExportFormat) -> String {
    format!("{stem}-{}.{}", date.format("%Y-%m-%d"), format.extension())
}

/// One row of the positions CSV. Column names are the exported headers.
#[derive(Debug, Serialize, Deserialize)]
struct PositionRow {
    id: String,
    ticker: String,
    nome: String,
    categoria: AssetCategory,
    quantita: f64,
    prezzo_medio: f64,
    prezzo_attuale: f64,
    valore: f64,
    pl: f64,
}

#[derive(Debug, Serialize)]
struct LossRow<'a> {
    id: &'a str,
    categoria: &'static str,
    importo: f64,
    scadenza: NaiveDate,
    giorni: i64,
    utilizzato: f64,
    residuo: f64,
    descrizione: &'a str,
}

pub fn positions_to_csv(summary: &PortfolioSummary) -> Result<String, ExportError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    if summary.positions.is_empty() {
        writer.write_record(POSITIONS_CSV_HEADER.split(','))?;
    }
    for p in &summary.positions {
        writer.serialize(PositionRow {
            id: p.id.clone(),
            ticker: p.ticker.clone(),
            nome: p.name.clone(),
            categoria: p.category,
            quantita: p.quantity,
            prezzo_medio: p.avg_price,
            prezzo_attuale: p.current_price,
            valore: p.value,
            pl: p.profit_loss,
        })?;
    }
    finish(writer)
}

pub fn positions_to_json(positions: &[Position]) -> Result<String, ExportError> {
    Ok(serde_json::to_string_pretty(positions)?)
}

pub fn portfolio_report(summary: &PortfolioSummary, date: NaiveDate) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Portafoglio al {}", date.format("%d/%m/%Y"));
    let _ = writeln!(out);
    for p in &summary.positions {
        let _ = writeln!(
            out,
            "{:<10} {:<30} {:>14.2} {:>+12.2} ({:+.2}%)",
            p.ticker,
            p.name,
            p.value,
            p.profit_loss,
            p.profit_loss_pct * 100.0
        );
    }
    let _ = writeln!(out);
    for a in &summary.allocation {
        let _ = writeln!(out, "{:<10} {:>6.2}%", a.category.as_str(), a.weight * 100.0);
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "Totale: {:.2}", summary.total_value);
    let _ = writeln!(
        out,
        "P/L: {:+.2} ({:+.2}%)",
        summary.total_profit_loss,
        summary.total_profit_loss_pct * 100.0
    );
    out
}

/// Parses rows produced by [`positions_to_csv`] back into positions.
pub fn positions_from_csv(csv: &str) -> Result<Vec<Position>, ExportError> {
    let positions = read_position_rows(csv)?
        .into_iter()
        .map(|row| Position {
            id: row.id,
            ticker: row.ticker,
            name: row.nome,
            category: row.categoria,
            quantity: row.quantita,
            avg_price: row.prezzo_medio,
            current_price: row.prezzo_attuale,
        })
        .collect();
    Ok(positions)
}

/// Sums the `valore` column of an exported positions CSV.
pub fn csv_value_total(csv: &str) -> Result<f64, ExportError> {
    Ok(read_position_rows(csv)?.iter().map(|row| row.valore).sum())
}

fn read_position_rows(csv: &str) -> Result<Vec<PositionRow>, ExportError> {
    let mut reader = csv::Reader::from_reader(csv.as_bytes());
    let headers = reader.headers()?;
    if !headers.iter().eq(POSITIONS_CSV_HEADER.split(',')) {
        return Err(ExportError::UnexpectedHeader(headers.iter().collect::<Vec<_>>().join(",")));
    }
    reader
        .deserialize()
        .collect::<Result<Vec<PositionRow>, csv::Error>>()
        .map_err(ExportError::from)
}

pub fn losses_to_csv(allocations: &[LossAllocation]) -> Result<String, ExportError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    if allocations.is_empty() {
        writer.write_record(LOSSES_CSV_HEADER.split(','))?;
    }
    for a in allocations {
        writer.serialize(LossRow {
            id: &a.id,
            categoria: match a.category {
                IncomeCategory::CapitalIncome => "redditi-di-capitale",
                IncomeCategory::OtherIncome => "redditi-diversi",
            },
            importo: a.amount,
            scadenza: a.expires_on,
            giorni: a.days_to_expiry,
            utilizzato: a.used(),
            residuo: a.remaining,
            descrizione: a.description.as_deref().unwrap_or(""),
        })?;
    }
    finish(writer)
}

fn finish(writer: csv::Writer<Vec<u8>>) -> Result<String, ExportError> {
    let bytes = writer
        .into_inner()
        .map_err(|e| ExportError::Csv(e.into_error().into()))?;
    Ok(String::from_utf8(bytes)?)
}

/// Google Calendar "render" link for an all-day event on `date`.
pub fn calendar_event_url(title: &str, details: &str, date: NaiveDate) -> String {
    let start = date.format("%Y%m%d");
    let end = date
        .succ_opt()
        .unwrap_or(date)
        .format("%Y%m%d");
    format!(
        "https://calendar.google.com/calendar/render?action=TEMPLATE&text={}&details={}&dates={start}/{end}",
        percent_encode(title),
        percent_encode(details)
    )
}

fn percent_encode(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for b in raw.bytes() {
        match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(b as char)
            }
            _ => {
                let _ = write!(out, "%{b:02X}");
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::capital_loss::{GainPool, LossRecord, compensate};
    use crate::core::portfolio::{summarize, tests::sample_positions};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    #[test]
    fn filename_includes_iso_date() {
        assert_eq!(
            export_filename("portafoglio", date(2026, 10, 18), ExportFormat::Csv),
            "portafoglio-2026-10-18.csv"
        );
        assert_eq!(
            export_filename("minusvalenze", date(2025, 1, 2), ExportFormat::Text),
            "minusvalenze-2025-01-02.txt"
        );
    }

    #[test]
    fn format_parse_accepts_extensions() {
        assert_eq!(ExportFormat::parse("CSV"), Some(ExportFormat::Csv));
        assert_eq!(ExportFormat::parse("txt"), Some(ExportFormat::Text));
        assert_eq!(ExportFormat::parse("xlsx"), None);
    }

    #[test]
    fn csv_round_trip_preserves_displayed_total() {
        let summary = summarize(&sample_positions());
        let csv = positions_to_csv(&summary).expect("csv export");
        let total = csv_value_total(&csv).expect("csv parses");
        assert!((total - summary.total_value).abs() < 1e-9);

        let parsed = positions_from_csv(&csv).expect("csv parses");
        assert_eq!(parsed, sample_positions());
        let reparsed = summarize(&parsed);
        assert!((reparsed.total_value - summary.total_value).abs() < 1e-9);
    }

    #[test]
    fn csv_round_trip_keeps_commas_quotes_and_newlines() {
        let mut positions = sample_positions();
        positions[0].name = "Line one\nline two".to_string();
        positions[1].name = "Acme, \"Inc\"".to_string();
        let csv = positions_to_csv(&summarize(&positions)).expect("csv export");

        let parsed = positions_from_csv(&csv).expect("csv parses");
        assert_eq!(parsed, positions);
        let total = csv_value_total(&csv).expect("csv parses");
        assert!((total - summarize(&positions).total_value).abs() < 1e-9);
    }

    #[test]
    fn empty_portfolio_exports_header_only() {
        let csv = positions_to_csv(&summarize(&[])).expect("csv export");
        assert_eq!(csv.trim_end(), POSITIONS_CSV_HEADER);
        assert_eq!(positions_from_csv(&csv).expect("parses"), Vec::new());
    }

    #[test]
    fn csv_parse_rejects_bad_header_and_numbers() {
        assert!(matches!(
            positions_from_csv("nope\n"),
            Err(ExportError::UnexpectedHeader(_))
        ));
        let bad = format!("{POSITIONS_CSV_HEADER}\n1,A,A,equity,x,1,1,1,0\n");
        let err = positions_from_csv(&bad).expect_err("must reject");
        assert!(matches!(err, ExportError::Csv(_)));
        let unknown = format!("{POSITIONS_CSV_HEADER}\n1,A,A,stocks,1,1,1,1,0\n");
        assert!(positions_from_csv(&unknown).is_err());
    }

    #[test]
    fn loss_schedule_csv_includes_description() {
        let loss = LossRecord {
            id: "l1".to_string(),
            amount: 500.0,
            realized_on: date(2024, 6, 1),
            category: IncomeCategory::OtherIncome,
            description: Some("Vendita ETF, lotto 2".to_string()),
        };
        let result = compensate(&[loss], GainPool::default(), date(2025, 1, 1), 0.26);
        let csv = losses_to_csv(&result.allocations).expect("csv export");

        let mut reader = csv::Reader::from_reader(csv.as_bytes());
        assert!(reader.headers().expect("headers").iter().eq(LOSSES_CSV_HEADER.split(',')));
        let row = reader.records().next().expect("one row").expect("valid row");
        assert_eq!(&row[1], "redditi-diversi");
        assert_eq!(&row[3], "2028-12-31");
        assert_eq!(&row[7], "Vendita ETF, lotto 2");
    }

    #[test]
    fn json_export_is_parseable() {
        let json = positions_to_json(&sample_positions()).expect("serializes");
        let back: Vec<Position> = serde_json::from_str(&json).expect("parses");
        assert_eq!(back.len(), 3);
    }

    #[test]
    fn text_report_mentions_total() {
        let summary = summarize(&sample_positions());
        let report = portfolio_report(&summary, date(2026, 10, 18));
        assert!(report.starts_with("Portafoglio al 18/10/2026"));
        assert!(report.contains("Totale: 8750.00"));
    }

    #[test]
    fn calendar_link_encodes_text_and_spans_one_day() {
        let url = calendar_event_url("Scadenza minusvalenza", "Importo: 1.000 €", date(2026, 12, 31));
        assert!(url.starts_with("https://calendar.google.com/calendar/render?action=TEMPLATE"));
        assert!(url.contains("text=Scadenza%20minusvalenza"));
        assert!(url.contains("details=Importo%3A%201.000%20%E2%82%AC"));
        assert!(url.ends_with("dates=20261231/20270101"));
    }
}
