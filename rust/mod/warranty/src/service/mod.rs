pub mod catalog;
pub mod codes;

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use garage_core::ServiceError;
use garage_kv::KVStore;

use crate::catalog::ServiceCatalog;
use crate::registry::{storage_error, CodeRegistry};

/// Key prefix for ad hoc catalog labels.
pub const SERVICE_PREFIX: &str = "warranty/services/";

/// Persisted form of an ad hoc catalog label.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ExtraService {
    pub label: String,
    #[serde(default)]
    pub added_at: Option<String>,
}

/// Warranty service: owns the registry and the service catalog.
pub struct WarrantyService {
    pub(crate) registry: CodeRegistry,
    pub(crate) kv: Arc<dyn KVStore>,
    catalog: RwLock<ServiceCatalog>,
}

impl WarrantyService {
    /// Build the service and reload persisted catalog additions.
    ///
    /// An empty `base_services` falls back to the default base labels.
    pub fn new(kv: Arc<dyn KVStore>, base_services: &[String]) -> Result<Self, ServiceError> {
        let mut catalog = if base_services.is_empty() {
            ServiceCatalog::with_default_base()
        } else {
            ServiceCatalog::new(base_services.iter().cloned())
        };

        for (key, bytes) in kv.scan(SERVICE_PREFIX).map_err(storage_error)? {
            let label = match serde_json::from_slice::<ExtraService>(&bytes) {
                Ok(extra) => extra.label,
                Err(e) => {
                    warn!(key = %key, error = %e, "undecodable catalog entry, using key");
                    key.strip_prefix(SERVICE_PREFIX).unwrap_or(&key).to_string()
                }
            };
            if !catalog.add_extra(&label) {
                debug!(label = %label, "skipping catalog entry already listed");
            }
        }

        Ok(Self {
            registry: CodeRegistry::new(kv.clone()),
            kv,
            catalog: RwLock::new(catalog),
        })
    }

    pub fn registry(&self) -> &CodeRegistry {
        &self.registry
    }

    pub(crate) fn catalog(&self) -> Result<RwLockReadGuard<'_, ServiceCatalog>, ServiceError> {
        self.catalog
            .read()
            .map_err(|_| ServiceError::Internal("service catalog lock poisoned".into()))
    }

    pub(crate) fn catalog_mut(&self) -> Result<RwLockWriteGuard<'_, ServiceCatalog>, ServiceError> {
        self.catalog
            .write()
            .map_err(|_| ServiceError::Internal("service catalog lock poisoned".into()))
    }
}
