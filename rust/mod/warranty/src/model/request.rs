use chrono::{DateTime, Utc};
use serde::Deserialize;

use super::record::WarrantyRecord;

/// Body of an issuance request.
///
/// Fields are optional at the wire level so that missing values surface as a
/// validation error naming them rather than as a JSON decoding failure.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueRequest {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub plate_no: Option<String>,
    #[serde(default)]
    pub warranty_start: Option<String>,
    #[serde(default)]
    pub warranty_end: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub services_performed: Vec<String>,
    #[serde(default)]
    pub is_custom_code: bool,
}

/// Body of an update request. Every field is an optional partial replacement;
/// the code comes from the request path.
///
/// The warranty bounds travel as two independent values and are re-assembled
/// into one period by the service.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRequest {
    #[serde(default)]
    pub plate_no: Option<String>,
    #[serde(default)]
    pub warranty_start: Option<String>,
    #[serde(default)]
    pub warranty_end: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub services_performed: Option<Vec<String>>,
    #[serde(default)]
    pub is_custom_code: Option<bool>,
}

/// Warranty state filter for listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WarrantyStatus {
    #[default]
    All,
    Active,
    Expired,
}

/// Admin listing filters. All set filters must match.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListFilter {
    /// Case-insensitive substring of the plate.
    #[serde(default)]
    pub plate: Option<String>,
    /// Trailing digits of the code, e.g. the last four.
    #[serde(default)]
    pub code_suffix: Option<String>,
    /// Comma-separated service labels; any one of them matches.
    #[serde(default)]
    pub services: Option<String>,
    /// Case-insensitive substring of the notes.
    #[serde(default)]
    pub keyword: Option<String>,
    #[serde(default)]
    pub status: WarrantyStatus,
}

impl ListFilter {
    pub fn matches(&self, record: &WarrantyRecord, now: DateTime<Utc>) -> bool {
        if let Some(plate) = non_blank(&self.plate) {
            let needle = plate.to_lowercase();
            let hit = record
                .plate_no
                .as_deref()
                .is_some_and(|p| p.to_lowercase().contains(&needle));
            if !hit {
                return false;
            }
        }

        if let Some(suffix) = non_blank(&self.code_suffix) {
            let suffix: String = suffix.chars().filter(|c| !c.is_whitespace()).collect();
            if !record.code.ends_with(&suffix) {
                return false;
            }
        }

        if let Some(services) = non_blank(&self.services) {
            let wanted: Vec<&str> = services
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .collect();
            if !wanted.is_empty()
                && !wanted
                    .iter()
                    .any(|w| record.services_performed.iter().any(|s| s == w))
            {
                return false;
            }
        }

        if let Some(keyword) = non_blank(&self.keyword) {
            let needle = keyword.to_lowercase();
            let hit = record
                .notes
                .as_deref()
                .is_some_and(|n| n.to_lowercase().contains(&needle));
            if !hit {
                return false;
            }
        }

        // A record without a complete period counts as expired.
        let active = record.warranty.is_some_and(|w| w.is_active(now));
        match self.status {
            WarrantyStatus::All => true,
            WarrantyStatus::Active => active,
            WarrantyStatus::Expired => !active,
        }
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, TimeZone};

    use super::*;
    use crate::model::WarrantyPeriod;

    fn record() -> WarrantyRecord {
        WarrantyRecord {
            code: "2378561284420042".into(),
            plate_no: Some("34 ABC 38".into()),
            warranty: Some(WarrantyPeriod::new(
                NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            )),
            services_performed: vec!["PPF".into(), "Cam Filmi".into()],
            notes: Some("Kaput ve tavan kaplandı".into()),
            issued_at: None,
            is_custom_code: false,
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap()
    }

    #[test]
    fn empty_filter_matches_everything() {
        assert!(ListFilter::default().matches(&record(), now()));
    }

    #[test]
    fn plate_filter_is_case_insensitive() {
        let f = ListFilter { plate: Some("abc".into()), ..Default::default() };
        assert!(f.matches(&record(), now()));
        let f = ListFilter { plate: Some("xyz".into()), ..Default::default() };
        assert!(!f.matches(&record(), now()));
    }

    #[test]
    fn code_suffix_filter() {
        let f = ListFilter { code_suffix: Some("0042".into()), ..Default::default() };
        assert!(f.matches(&record(), now()));
        let f = ListFilter { code_suffix: Some("00 43".into()), ..Default::default() };
        assert!(!f.matches(&record(), now()));
    }

    #[test]
    fn services_filter_matches_any() {
        let f = ListFilter { services: Some("Renk Değişimi, Cam Filmi".into()), ..Default::default() };
        assert!(f.matches(&record(), now()));
        let f = ListFilter { services: Some("Renk Değişimi".into()), ..Default::default() };
        assert!(!f.matches(&record(), now()));
    }

    #[test]
    fn keyword_filter_searches_notes() {
        let f = ListFilter { keyword: Some("KAPUT".into()), ..Default::default() };
        assert!(f.matches(&record(), now()));
        let mut rec = record();
        rec.notes = None;
        assert!(!f.matches(&rec, now()));
    }

    #[test]
    fn status_filter() {
        let active = ListFilter { status: WarrantyStatus::Active, ..Default::default() };
        let expired = ListFilter { status: WarrantyStatus::Expired, ..Default::default() };
        assert!(active.matches(&record(), now()));
        assert!(!expired.matches(&record(), now()));

        let later = Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap();
        assert!(!active.matches(&record(), later));
        assert!(expired.matches(&record(), later));

        let mut rec = record();
        rec.warranty = None;
        assert!(expired.matches(&rec, now()));
    }

    #[test]
    fn status_deserializes_lowercase() {
        let f: ListFilter = serde_json::from_value(serde_json::json!({"status": "expired", "codeSuffix": "0042"})).unwrap();
        assert_eq!(f.status, WarrantyStatus::Expired);
        assert_eq!(f.code_suffix.as_deref(), Some("0042"));
    }
}
