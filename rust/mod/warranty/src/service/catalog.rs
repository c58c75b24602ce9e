use tracing::info;

use garage_core::{now_rfc3339, ServiceError};

use super::{ExtraService, WarrantyService, SERVICE_PREFIX};
use crate::catalog::CatalogEntry;
use crate::registry::storage_error;

impl WarrantyService {
    /// Base labels first, then ad hoc labels.
    pub fn list_services(&self) -> Result<Vec<CatalogEntry>, ServiceError> {
        Ok(self.catalog()?.entries())
    }

    /// Add and persist an ad hoc label.
    pub fn add_service(&self, label: &str) -> Result<CatalogEntry, ServiceError> {
        let label = label.trim();
        if label.is_empty() {
            return Err(ServiceError::Validation("service label must not be blank".into()));
        }

        let mut catalog = self.catalog_mut()?;
        if catalog.contains(label) {
            return Err(ServiceError::Conflict(format!("service {:?} already listed", label)));
        }

        let entry = ExtraService {
            label: label.to_string(),
            added_at: Some(now_rfc3339()),
        };
        let bytes = serde_json::to_vec(&entry).map_err(|e| ServiceError::Internal(e.to_string()))?;
        self.kv
            .set(&format!("{}{}", SERVICE_PREFIX, label), &bytes)
            .map_err(storage_error)?;
        catalog.add_extra(label);

        info!(label = %label, "service label added");
        Ok(CatalogEntry { label: label.to_string(), base: false })
    }

    /// Remove an ad hoc label. Base labels cannot be removed.
    pub fn remove_service(&self, label: &str) -> Result<(), ServiceError> {
        let label = label.trim();
        let mut catalog = self.catalog_mut()?;
        if catalog.is_base(label) {
            return Err(ServiceError::Validation(format!(
                "service {:?} is a base label and cannot be removed",
                label
            )));
        }
        if !catalog.contains(label) {
            return Err(ServiceError::NotFound(format!("service {:?} not found", label)));
        }

        self.kv
            .delete(&format!("{}{}", SERVICE_PREFIX, label))
            .map_err(storage_error)?;
        catalog.remove_extra(label);

        info!(label = %label, "service label removed");
        Ok(())
    }
}
