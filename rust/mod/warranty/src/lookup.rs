//! Public code lookup.
//!
//! Anyone holding 16 digits can call this, so the classification is strict:
//! malformed input never reaches the store, and a record with nothing to show
//! is reported exactly like an unknown code.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, error};

use crate::code::WarrantyCode;
use crate::model::WarrantyRecord;
use crate::registry::CodeRegistry;

pub const MSG_INCOMPLETE_CODE: &str = "Lütfen 16 haneli kodu eksiksiz girin.";
pub const MSG_NOT_FOUND: &str = "Kod bulunamadı. Lütfen kartınızdaki kodu kontrol edin.";
pub const MSG_SERVER_ERROR: &str = "Sunucu hatası. Daha sonra tekrar deneyin.";

pub const LABEL_CODE: &str = "Kod";
pub const LABEL_PLATE: &str = "Plaka";
pub const LABEL_WARRANTY: &str = "Garanti Süresi";
pub const LABEL_NOTES: &str = "Notlar";
pub const SERVICE_PERFORMED: &str = "Yapıldı";

const MONTHS_TR: [&str; 12] = [
    "Ocak", "Şubat", "Mart", "Nisan", "Mayıs", "Haziran",
    "Temmuz", "Ağustos", "Eylül", "Ekim", "Kasım", "Aralık",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetailLine {
    pub label: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LookupDetails {
    pub code: String,
    /// Display lines in presentation order.
    pub details: Vec<DetailLine>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub days_remaining: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum LookupOutcome {
    /// Input was not exactly 16 digits; the store was not queried.
    InvalidCode { message: String },
    /// Unknown code, or a record with nothing displayable.
    NotFound { message: String },
    Found(LookupDetails),
    /// The store failed; the caller may retry later.
    Unavailable { message: String },
}

impl LookupOutcome {
    fn invalid_code() -> Self {
        Self::InvalidCode { message: MSG_INCOMPLETE_CODE.to_string() }
    }

    fn not_found() -> Self {
        Self::NotFound { message: MSG_NOT_FOUND.to_string() }
    }

    fn unavailable() -> Self {
        Self::Unavailable { message: MSG_SERVER_ERROR.to_string() }
    }
}

/// Look up a bare 16-digit code.
pub fn lookup(registry: &CodeRegistry, candidate: &str, now: DateTime<Utc>) -> LookupOutcome {
    let Ok(code) = WarrantyCode::parse_exact(candidate) else {
        debug!("rejected malformed lookup input");
        return LookupOutcome::invalid_code();
    };

    match registry.get(&code) {
        Ok(doc) => classify(&code, doc.as_ref(), now),
        Err(e) => {
            error!(code = %code, error = %e, retryable = e.is_retryable(), "warranty lookup failed");
            LookupOutcome::unavailable()
        }
    }
}

/// Classify a fetched document and shape the display payload.
pub fn classify(code: &WarrantyCode, doc: Option<&Value>, now: DateTime<Utc>) -> LookupOutcome {
    let Some(record) = doc.and_then(|d| WarrantyRecord::from_document(code.as_str(), d)) else {
        return LookupOutcome::not_found();
    };
    if !record.has_displayable_fields() {
        return LookupOutcome::not_found();
    }

    let mut details = vec![line(LABEL_CODE, code.as_str())];
    if let Some(plate) = &record.plate_no {
        details.push(line(LABEL_PLATE, plate));
    }

    let mut days_remaining = None;
    let mut active = None;
    if let Some(period) = record.warranty {
        let days = period.days_remaining(now);
        details.push(line(
            LABEL_WARRANTY,
            &format!(
                "{} → {} ({} gün kaldı)",
                format_date_tr(period.start),
                format_date_tr(period.end),
                days
            ),
        ));
        days_remaining = Some(days);
        active = Some(period.is_active(now));
    }

    for service in &record.services_performed {
        details.push(line(service, SERVICE_PERFORMED));
    }
    if let Some(notes) = &record.notes {
        details.push(line(LABEL_NOTES, notes));
    }

    LookupOutcome::Found(LookupDetails {
        code: code.as_str().to_string(),
        details,
        days_remaining,
        active,
    })
}

/// `01 Ocak 2024`
pub fn format_date_tr(date: NaiveDate) -> String {
    format!(
        "{:02} {} {}",
        date.day(),
        MONTHS_TR[date.month0() as usize],
        date.year()
    )
}

fn line(label: &str, value: &str) -> DetailLine {
    DetailLine { label: label.to_string(), value: value.to_string() }
}
