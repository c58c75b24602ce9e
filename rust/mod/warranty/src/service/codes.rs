use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use tracing::info;

use garage_core::{now_rfc3339, ListResult, ServiceError};

use super::WarrantyService;
use crate::code::WarrantyCode;
use crate::generator::next_code;
use crate::model::{IssueRequest, ListFilter, UpdateRequest, WarrantyRecord};
use crate::registry::{already_registered, not_registered};
use crate::validate::{validate_code, validate_issue, validate_update};

impl WarrantyService {
    /// Validate and persist a new record.
    ///
    /// The final write is create-only, so a concurrent issuance of the same
    /// code that slips past the existence check still fails with a conflict.
    pub fn issue(&self, req: &IssueRequest) -> Result<WarrantyRecord, ServiceError> {
        let record = validate_issue(req, &*self.catalog()?)?;
        if self.registry.exists(&record.code)? {
            return Err(already_registered(&record.code));
        }
        let (code, stored) = record.into_stored(now_rfc3339());

        let doc = serde_json::to_value(&stored).map_err(|e| ServiceError::Internal(e.to_string()))?;
        self.registry.create(&code, &doc)?;

        info!(
            code = %code,
            plate = %stored.plate_no,
            custom = stored.is_custom_code,
            "warranty issued"
        );
        Ok(WarrantyRecord::from_stored(code.as_str(), &stored))
    }

    /// Apply a partial update to a registered code.
    ///
    /// `issuedAt` is never part of the patch. The stored period is always
    /// rewritten in the flat layout, so a record still carrying the nested
    /// `warranty` object is migrated on first edit.
    pub fn update(&self, code: &str, req: &UpdateRequest) -> Result<WarrantyRecord, ServiceError> {
        let (code, patch) = validate_update(code, req, &*self.catalog()?)?;

        let current = self.registry.get(&code)?.ok_or_else(|| not_registered(&code))?;
        let stored_period = WarrantyRecord::from_document(code.as_str(), &current)
            .and_then(|r| r.warranty);

        let mut doc = Map::new();
        if let Some(plate) = patch.plate_no {
            doc.insert("plateNo".into(), Value::String(plate));
        }

        let start = patch.warranty_start.or(stored_period.map(|p| p.start));
        let end = patch.warranty_end.or(stored_period.map(|p| p.end));
        match (start, end) {
            (Some(start), Some(end)) => {
                doc.insert("warrantyStart".into(), Value::String(start.to_string()));
                doc.insert("warrantyEnd".into(), Value::String(end.to_string()));
                doc.insert("warranty".into(), Value::Null);
            }
            (None, None) => {}
            _ => {
                return Err(ServiceError::Validation(
                    "warrantyStart and warrantyEnd must both be set".into(),
                ));
            }
        }

        if let Some(notes) = patch.notes {
            doc.insert("notes".into(), Value::String(notes));
        }
        if let Some(services) = patch.services_performed {
            doc.insert(
                "servicesPerformed".into(),
                Value::Array(services.into_iter().map(Value::String).collect()),
            );
        }
        if let Some(custom) = patch.is_custom_code {
            doc.insert("isCustomCode".into(), Value::Bool(custom));
        }

        let merged = self.registry.update(&code, &Value::Object(doc))?;
        info!(code = %code, "warranty updated");

        WarrantyRecord::from_document(code.as_str(), &merged)
            .ok_or_else(|| ServiceError::Internal(format!("code {} stored as non-object", code)))
    }

    /// Remove a code. Unknown codes are not an error.
    pub fn delete(&self, code: &str) -> Result<(), ServiceError> {
        let code = validate_code(code)?;
        self.registry.delete(&code)?;
        info!(code = %code, "warranty deleted");
        Ok(())
    }

    pub fn get(&self, code: &str) -> Result<WarrantyRecord, ServiceError> {
        let code = validate_code(code)?;
        self.registry
            .get(&code)?
            .and_then(|doc| WarrantyRecord::from_document(code.as_str(), &doc))
            .ok_or_else(|| not_registered(&code))
    }

    /// Records matching every set filter, sorted by code.
    pub fn list(
        &self,
        filter: &ListFilter,
        now: DateTime<Utc>,
    ) -> Result<ListResult<WarrantyRecord>, ServiceError> {
        let items: Vec<WarrantyRecord> = self
            .registry
            .get_all()?
            .into_iter()
            .filter_map(|(code, doc)| WarrantyRecord::from_document(&code, &doc))
            .filter(|record| filter.matches(record, now))
            .collect();
        Ok(ListResult::new(items))
    }

    /// Next unused sequential code for the current registry.
    pub fn next_code(&self) -> Result<WarrantyCode, ServiceError> {
        let entries: Vec<(String, bool)> = self
            .registry
            .get_all()?
            .into_iter()
            .map(|(code, doc)| {
                // Only an explicit `false` marks a record as auto-sequenced.
                let custom = doc.get("isCustomCode").and_then(Value::as_bool) != Some(false);
                (code, custom)
            })
            .collect();

        next_code(entries.iter().map(|(code, custom)| (code.as_str(), *custom)))
            .ok_or_else(|| ServiceError::Conflict("code space exhausted".into()))
    }
}
