use chrono::SecondsFormat;
use serde::Serialize;
use serde_json::{Map, Value};

/// A listing page: the matching items and how many there are.
#[derive(Debug, Clone, Serialize)]
pub struct ListResult<T: Serialize> {
    pub items: Vec<T>,
    pub total: usize,
}

impl<T: Serialize> ListResult<T> {
    pub fn new(items: Vec<T>) -> Self {
        let total = items.len();
        Self { items, total }
    }
}

/// Random opaque identifier (UUIDv4 hex, no dashes). Used for session ids.
pub fn new_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

/// Current UTC time as RFC 3339 with second precision, e.g.
/// `2024-01-01T09:30:00Z`.
pub fn now_rfc3339() -> String {
    chrono::Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Apply an RFC 7386 JSON merge patch to `base` in place.
///
/// `null` members delete the key, object members merge recursively and any
/// other value replaces the target. A non-object patch replaces `base`.
pub fn merge_patch(base: &mut Value, patch: &Value) {
    let Value::Object(patch_obj) = patch else {
        *base = patch.clone();
        return;
    };
    if !base.is_object() {
        *base = Value::Object(Map::new());
    }
    let Value::Object(base_obj) = base else {
        return;
    };
    for (key, value) in patch_obj {
        match value {
            Value::Null => {
                base_obj.remove(key);
            }
            Value::Object(_) => {
                let entry = base_obj
                    .entry(key.clone())
                    .or_insert_with(|| Value::Object(Map::new()));
                merge_patch(entry, value);
            }
            _ => {
                base_obj.insert(key.clone(), value.clone());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_id() {
        let id = new_id();
        assert_eq!(id.len(), 32);
        assert!(!id.contains('-'));
    }

    #[test]
    fn test_now_rfc3339() {
        let ts = now_rfc3339();
        assert!(ts.ends_with('Z'));
        assert!(chrono::DateTime::parse_from_rfc3339(&ts).is_ok());
    }

    #[test]
    fn test_list_result_counts_items() {
        let page = ListResult::new(vec!["a", "b"]);
        assert_eq!(page.total, 2);
    }

    #[test]
    fn test_merge_patch() {
        let mut base = serde_json::json!({"plateNo": "34 ABC 38", "notes": "x", "warranty": {"start": "2024-01-01"}});
        let patch = serde_json::json!({"notes": null, "warranty": {"end": "2025-01-01"}, "isCustomCode": true});
        merge_patch(&mut base, &patch);
        assert_eq!(
            base,
            serde_json::json!({
                "plateNo": "34 ABC 38",
                "warranty": {"start": "2024-01-01", "end": "2025-01-01"},
                "isCustomCode": true,
            })
        );
    }

    #[test]
    fn test_merge_patch_replaces_arrays() {
        let mut base = serde_json::json!({"servicesPerformed": ["PPF", "Cam Filmi"]});
        let patch = serde_json::json!({"servicesPerformed": []});
        merge_patch(&mut base, &patch);
        assert_eq!(base, serde_json::json!({"servicesPerformed": []}));
    }
}
