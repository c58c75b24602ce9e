use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

const MILLIS_PER_DAY: i64 = 86_400_000;

/// Warranty coverage window, both bounds inclusive calendar dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WarrantyPeriod {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl WarrantyPeriod {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// Midnight UTC at the start of the end date.
    pub fn end_instant(&self) -> DateTime<Utc> {
        self.end.and_time(NaiveTime::MIN).and_utc()
    }

    /// Whole days left until the end date, rounded up.
    ///
    /// Negative once the warranty has expired; never clamped.
    pub fn days_remaining(&self, now: DateTime<Utc>) -> i64 {
        let millis = (self.end_instant() - now).num_milliseconds();
        if millis >= 0 {
            (millis + MILLIS_PER_DAY - 1) / MILLIS_PER_DAY
        } else {
            -(-millis / MILLIS_PER_DAY)
        }
    }

    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        self.end_instant() >= now
    }
}

/// Parse a calendar date given as `YYYY-MM-DD` or as an RFC 3339 timestamp.
pub fn parse_date(input: &str) -> Option<NaiveDate> {
    let input = input.trim();
    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(input).ok().map(|dt| dt.date_naive()))
}

/// Persisted document layout, one per code key.
///
/// The registry key is the code, so the code itself is not repeated here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredRecord {
    pub plate_no: String,
    pub warranty_start: NaiveDate,
    pub warranty_end: NaiveDate,
    #[serde(default)]
    pub notes: String,
    pub services_performed: Vec<String>,
    pub issued_at: String,
    #[serde(default)]
    pub is_custom_code: bool,
}

/// Canonical view of a stored record.
///
/// Built from raw documents by [`WarrantyRecord::from_document`], which
/// tolerates both the flat `warrantyStart`/`warrantyEnd` layout and the
/// nested `warranty: {start, end}` layout.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WarrantyRecord {
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plate_no: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warranty: Option<WarrantyPeriod>,
    pub services_performed: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issued_at: Option<String>,
    pub is_custom_code: bool,
}

impl WarrantyRecord {
    /// Normalize a raw document stored under `code`.
    ///
    /// Returns None if the document is not a JSON object. Blank strings are
    /// treated as absent, and a warranty period is only present when both
    /// bounds parse as dates.
    pub fn from_document(code: &str, doc: &Value) -> Option<Self> {
        let obj = doc.as_object()?;

        let nested = obj.get("warranty");
        let start = text(obj.get("warrantyStart"))
            .or_else(|| text(nested.and_then(|w| w.get("start"))));
        let end = text(obj.get("warrantyEnd"))
            .or_else(|| text(nested.and_then(|w| w.get("end"))));
        let warranty = match (start.as_deref().and_then(parse_date), end.as_deref().and_then(parse_date)) {
            (Some(start), Some(end)) => Some(WarrantyPeriod::new(start, end)),
            _ => None,
        };

        let mut services_performed: Vec<String> = Vec::new();
        if let Some(items) = obj.get("servicesPerformed").and_then(Value::as_array) {
            for label in items.iter().filter_map(|v| text(Some(v))) {
                if !services_performed.contains(&label) {
                    services_performed.push(label);
                }
            }
        }

        Some(Self {
            code: code.to_string(),
            plate_no: text(obj.get("plateNo")),
            warranty,
            services_performed,
            notes: text(obj.get("notes")),
            issued_at: text(obj.get("issuedAt")),
            is_custom_code: obj
                .get("isCustomCode")
                .and_then(Value::as_bool)
                .unwrap_or(false),
        })
    }

    /// Build the canonical view of a freshly written record.
    pub fn from_stored(code: &str, stored: &StoredRecord) -> Self {
        Self {
            code: code.to_string(),
            plate_no: Some(stored.plate_no.clone()),
            warranty: Some(WarrantyPeriod::new(stored.warranty_start, stored.warranty_end)),
            services_performed: stored.services_performed.clone(),
            notes: (!stored.notes.trim().is_empty()).then(|| stored.notes.clone()),
            issued_at: Some(stored.issued_at.clone()),
            is_custom_code: stored.is_custom_code,
        }
    }

    /// Whether anything besides the code itself would be shown to a customer.
    pub fn has_displayable_fields(&self) -> bool {
        self.plate_no.is_some()
            || self.warranty.is_some()
            || !self.services_performed.is_empty()
            || self.notes.is_some()
    }
}

fn text(value: Option<&Value>) -> Option<String> {
    value
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
