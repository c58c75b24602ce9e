//! Input checks run before any store access.

use chrono::NaiveDate;

use garage_core::ServiceError;

use crate::catalog::ServiceCatalog;
use crate::code::WarrantyCode;
use crate::model::{parse_date, IssueRequest, StoredRecord, UpdateRequest, WarrantyPeriod};

/// Longest accepted plate, counted in characters after normalization.
pub const MAX_PLATE_LEN: usize = 16;

/// A fully validated issuance request.
#[derive(Debug, Clone, PartialEq)]
pub struct NewRecord {
    pub code: WarrantyCode,
    pub plate_no: String,
    pub warranty: WarrantyPeriod,
    pub notes: String,
    pub services_performed: Vec<String>,
    pub is_custom_code: bool,
}

impl NewRecord {
    pub fn into_stored(self, issued_at: String) -> (WarrantyCode, StoredRecord) {
        let stored = StoredRecord {
            plate_no: self.plate_no,
            warranty_start: self.warranty.start,
            warranty_end: self.warranty.end,
            notes: self.notes,
            services_performed: self.services_performed,
            issued_at,
            is_custom_code: self.is_custom_code,
        };
        (self.code, stored)
    }
}

/// A validated partial update. `None` leaves the stored field untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordPatch {
    pub plate_no: Option<String>,
    pub warranty_start: Option<NaiveDate>,
    pub warranty_end: Option<NaiveDate>,
    pub notes: Option<String>,
    pub services_performed: Option<Vec<String>>,
    pub is_custom_code: Option<bool>,
}

pub fn validate_code(input: &str) -> Result<WarrantyCode, ServiceError> {
    WarrantyCode::parse(input).map_err(|_| {
        ServiceError::Validation(format!("code must be 16 digits, got {:?}", input))
    })
}

/// Validate an issuance request against the catalog.
pub fn validate_issue(
    req: &IssueRequest,
    catalog: &ServiceCatalog,
) -> Result<NewRecord, ServiceError> {
    let code = present(&req.code);
    let plate = present(&req.plate_no);
    let start = present(&req.warranty_start);
    let end = present(&req.warranty_end);

    let missing: Vec<&str> = [
        ("code", code.is_none()),
        ("plateNo", plate.is_none()),
        ("warrantyStart", start.is_none()),
        ("warrantyEnd", end.is_none()),
    ]
    .into_iter()
    .filter_map(|(name, absent)| absent.then_some(name))
    .collect();

    let (Some(code), Some(plate), Some(start), Some(end)) = (code, plate, start, end) else {
        return Err(ServiceError::Validation(format!(
            "required fields missing: {}",
            missing.join(", ")
        )));
    };

    if req.services_performed.is_empty() {
        return Err(ServiceError::Validation(
            "at least one service must be selected".into(),
        ));
    }

    Ok(NewRecord {
        code: validate_code(code)?,
        plate_no: normalize_plate(plate)?,
        warranty: WarrantyPeriod::new(
            validate_date("warrantyStart", start)?,
            validate_date("warrantyEnd", end)?,
        ),
        notes: req.notes.as_deref().map(str::trim).unwrap_or_default().to_string(),
        services_performed: validate_services(&req.services_performed, catalog)?,
        is_custom_code: req.is_custom_code,
    })
}

/// Validate a partial update. Only the code is required.
///
/// An empty `servicesPerformed` list is accepted here even though issuance
/// rejects it.
pub fn validate_update(
    code: &str,
    req: &UpdateRequest,
    catalog: &ServiceCatalog,
) -> Result<(WarrantyCode, RecordPatch), ServiceError> {
    let code = validate_code(code)?;

    let plate_no = match &req.plate_no {
        Some(raw) => Some(normalize_plate(raw)?),
        None => None,
    };
    let warranty_start = match &req.warranty_start {
        Some(raw) => Some(validate_date("warrantyStart", raw)?),
        None => None,
    };
    let warranty_end = match &req.warranty_end {
        Some(raw) => Some(validate_date("warrantyEnd", raw)?),
        None => None,
    };
    let services_performed = match &req.services_performed {
        Some(labels) => Some(validate_services(labels, catalog)?),
        None => None,
    };

    Ok((
        code,
        RecordPatch {
            plate_no,
            warranty_start,
            warranty_end,
            notes: req.notes.as_deref().map(|n| n.trim().to_string()),
            services_performed,
            is_custom_code: req.is_custom_code,
        },
    ))
}

/// Trim, collapse inner whitespace and uppercase a plate.
pub fn normalize_plate(raw: &str) -> Result<String, ServiceError> {
    let plate = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    if plate.is_empty() {
        return Err(ServiceError::Validation("plateNo must not be empty".into()));
    }
    if plate.chars().count() > MAX_PLATE_LEN {
        return Err(ServiceError::Validation(format!(
            "plateNo must be at most {} characters",
            MAX_PLATE_LEN
        )));
    }
    if !plate.chars().all(|c| c.is_alphanumeric() || c == ' ' || c == '-') {
        return Err(ServiceError::Validation(format!(
            "plateNo contains invalid characters: {:?}",
            raw
        )));
    }
    Ok(plate.to_uppercase())
}

fn validate_date(field: &str, raw: &str) -> Result<NaiveDate, ServiceError> {
    parse_date(raw).ok_or_else(|| {
        ServiceError::Validation(format!("{} must be a YYYY-MM-DD date, got {:?}", field, raw))
    })
}

/// Every label must be non-blank and listed in the catalog. Order is kept,
/// repeats are dropped.
fn validate_services(
    labels: &[String],
    catalog: &ServiceCatalog,
) -> Result<Vec<String>, ServiceError> {
    let mut out: Vec<String> = Vec::with_capacity(labels.len());
    for raw in labels {
        let label = raw.trim();
        if label.is_empty() {
            return Err(ServiceError::Validation("service labels must not be blank".into()));
        }
        if !catalog.contains(label) {
            return Err(ServiceError::Validation(format!("unknown service: {:?}", label)));
        }
        if !out.iter().any(|l| l == label) {
            out.push(label.to_string());
        }
    }
    Ok(out)
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.trim().is_empty())
}
