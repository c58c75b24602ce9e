//! Document-per-code registry on top of a byte-level KV store.

use std::sync::Arc;

use serde_json::Value;
use tracing::warn;

use garage_core::{merge_patch, ServiceError};
use garage_kv::{KVError, KVStore};

use crate::code::WarrantyCode;

/// Key prefix under which every code document lives.
pub const CODE_PREFIX: &str = "warranty/codes/";

/// Path-addressed JSON document store keyed by warranty code.
pub struct CodeRegistry {
    kv: Arc<dyn KVStore>,
}

impl CodeRegistry {
    pub fn new(kv: Arc<dyn KVStore>) -> Self {
        Self { kv }
    }

    fn key(code: &WarrantyCode) -> String {
        format!("{}{}", CODE_PREFIX, code.as_str())
    }

    pub fn exists(&self, code: &WarrantyCode) -> Result<bool, ServiceError> {
        self.kv.exists(&Self::key(code)).map_err(storage_error)
    }

    /// Read the raw document for a code.
    ///
    /// A value that is not valid JSON is returned as `Value::Null` so callers
    /// treat it as a degenerate record instead of failing the request.
    pub fn get(&self, code: &WarrantyCode) -> Result<Option<Value>, ServiceError> {
        let key = Self::key(code);
        let Some(bytes) = self.kv.get(&key).map_err(storage_error)? else {
            return Ok(None);
        };
        Ok(Some(decode(&key, &bytes)))
    }

    /// All `(code, document)` pairs, sorted by code.
    pub fn get_all(&self) -> Result<Vec<(String, Value)>, ServiceError> {
        let entries = self.kv.scan(CODE_PREFIX).map_err(storage_error)?;
        Ok(entries
            .into_iter()
            .map(|(key, bytes)| {
                let doc = decode(&key, &bytes);
                let code = key.strip_prefix(CODE_PREFIX).unwrap_or(&key).to_string();
                (code, doc)
            })
            .collect())
    }

    /// Write a document, replacing any previous one.
    pub fn set(&self, code: &WarrantyCode, doc: &Value) -> Result<(), ServiceError> {
        let bytes = encode(doc)?;
        self.kv.set(&Self::key(code), &bytes).map_err(storage_error)
    }

    /// Write a document only if the code is not yet registered.
    pub fn create(&self, code: &WarrantyCode, doc: &Value) -> Result<(), ServiceError> {
        let bytes = encode(doc)?;
        self.kv.create(&Self::key(code), &bytes).map_err(|e| match e {
            KVError::AlreadyExists(_) => already_registered(code),
            other => storage_error(other),
        })
    }

    /// Merge `patch` field by field into the stored document and return the
    /// merged result. Fails with NotFound if the code is not registered.
    pub fn update(&self, code: &WarrantyCode, patch: &Value) -> Result<Value, ServiceError> {
        let mut doc = self
            .get(code)?
            .ok_or_else(|| not_registered(code))?;
        if !doc.is_object() {
            doc = Value::Object(serde_json::Map::new());
        }
        merge_patch(&mut doc, patch);
        self.set(code, &doc)?;
        Ok(doc)
    }

    /// Remove a code. Removing an unknown code succeeds.
    pub fn delete(&self, code: &WarrantyCode) -> Result<(), ServiceError> {
        self.kv.delete(&Self::key(code)).map_err(storage_error)
    }
}

pub(crate) fn storage_error(e: KVError) -> ServiceError {
    ServiceError::Storage(e.to_string())
}

pub(crate) fn already_registered(code: &WarrantyCode) -> ServiceError {
    ServiceError::Conflict(format!("code {} already registered", code))
}

pub(crate) fn not_registered(code: &WarrantyCode) -> ServiceError {
    ServiceError::NotFound(format!("code {} not found", code))
}

fn encode(doc: &Value) -> Result<Vec<u8>, ServiceError> {
    serde_json::to_vec(doc).map_err(|e| ServiceError::Internal(e.to_string()))
}

fn decode(key: &str, bytes: &[u8]) -> Value {
    serde_json::from_slice(bytes).unwrap_or_else(|e| {
        warn!(key, error = %e, "undecodable registry document");
        Value::Null
    })
}

#[cfg(test)]
mod tests {
    use garage_kv::RedbStore;

    use super::*;

    fn registry() -> (CodeRegistry, Arc<dyn KVStore>, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let kv: Arc<dyn KVStore> = Arc::new(RedbStore::open(&dir.path().join("test.redb")).unwrap());
        (CodeRegistry::new(kv.clone()), kv, dir)
    }

    fn code(s: &str) -> WarrantyCode {
        WarrantyCode::parse(s).unwrap()
    }

    #[test]
    fn create_then_conflict() {
        let (reg, _kv, _dir) = registry();
        let c = code("2378561284420001");
        reg.create(&c, &serde_json::json!({"plateNo": "A"})).unwrap();

        let err = reg.create(&c, &serde_json::json!({"plateNo": "B"})).unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(_)));
        assert_eq!(reg.get(&c).unwrap().unwrap()["plateNo"], "A");
    }

    #[test]
    fn update_merges_fields() {
        let (reg, _kv, _dir) = registry();
        let c = code("2378561284420001");
        reg.set(&c, &serde_json::json!({"plateNo": "A", "notes": "x"})).unwrap();

        let merged = reg.update(&c, &serde_json::json!({"notes": "y"})).unwrap();
        assert_eq!(merged, serde_json::json!({"plateNo": "A", "notes": "y"}));
        assert_eq!(reg.get(&c).unwrap().unwrap(), merged);
    }

    #[test]
    fn update_missing_is_not_found() {
        let (reg, _kv, _dir) = registry();
        let err = reg
            .update(&code("2378561284420001"), &serde_json::json!({"notes": "y"}))
            .unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }

    #[test]
    fn get_all_strips_prefix_and_ignores_other_keys() {
        let (reg, kv, _dir) = registry();
        reg.set(&code("2378561284420002"), &serde_json::json!({})).unwrap();
        reg.set(&code("2378561284420001"), &serde_json::json!({})).unwrap();
        kv.set("warranty/services/PPF", b"{}").unwrap();

        let codes: Vec<String> = reg.get_all().unwrap().into_iter().map(|(c, _)| c).collect();
        assert_eq!(codes, vec!["2378561284420001".to_string(), "2378561284420002".to_string()]);
    }

    #[test]
    fn corrupt_document_reads_as_null() {
        let (reg, kv, _dir) = registry();
        kv.set("warranty/codes/2378561284420001", b"not json").unwrap();
        assert_eq!(reg.get(&code("2378561284420001")).unwrap(), Some(Value::Null));
    }

    #[test]
    fn delete_is_idempotent() {
        let (reg, _kv, _dir) = registry();
        let c = code("2378561284420001");
        reg.delete(&c).unwrap();
        reg.set(&c, &serde_json::json!({})).unwrap();
        reg.delete(&c).unwrap();
        assert!(!reg.exists(&c).unwrap());
    }
}
