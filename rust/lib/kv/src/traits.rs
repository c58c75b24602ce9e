use crate::error::KVError;

/// KVStore provides a path-addressed key-value storage interface.
///
/// Keys follow a slash-separated convention: `warranty/codes/2378561284420001`,
/// `warranty/services/Seramik Kaplama`. Values are opaque bytes; callers
/// decide the encoding (JSON documents in practice).
pub trait KVStore: Send + Sync {
    /// Get the value for a key. Returns None if the key does not exist.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, KVError>;

    /// Check whether a key is present.
    fn exists(&self, key: &str) -> Result<bool, KVError> {
        Ok(self.get(key)?.is_some())
    }

    /// Set a key-value pair, overwriting any previous value.
    fn set(&self, key: &str, value: &[u8]) -> Result<(), KVError>;

    /// Insert a key-value pair only if the key is absent.
    ///
    /// The check and the insert happen atomically. Returns
    /// `KVError::AlreadyExists` if the key was already present, in which case
    /// the stored value is left untouched.
    fn create(&self, key: &str, value: &[u8]) -> Result<(), KVError>;

    /// Delete a key. Deleting a missing key is not an error.
    fn delete(&self, key: &str) -> Result<(), KVError>;

    /// Scan all keys matching a prefix. Returns sorted (key, value) pairs.
    fn scan(&self, prefix: &str) -> Result<Vec<(String, Vec<u8>)>, KVError>;
}
