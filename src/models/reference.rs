//! References that the backend may or may not populate
//!
//! A foreign key arrives either as a bare id string or as the embedded
//! record. `Ref` keeps the two cases apart so callers never inspect raw JSON.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Anything with a backend id
pub trait Entity {
    fn id(&self) -> &str;
}

/// A reference that is either a bare id or the resolved record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Ref<T> {
    Id(String),
    Resolved(Box<T>),
}

impl<T: Entity> Ref<T> {
    /// Id of the referenced record, whichever form it arrived in
    pub fn id(&self) -> &str {
        match self {
            Ref::Id(id) => id,
            Ref::Resolved(entity) => entity.id(),
        }
    }
}

impl<T> Ref<T> {
    pub fn resolved(&self) -> Option<&T> {
        match self {
            Ref::Id(_) => None,
            Ref::Resolved(entity) => Some(entity),
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, Ref::Resolved(_))
    }
}

impl<T> From<String> for Ref<T> {
    fn from(id: String) -> Self {
        Ref::Id(id)
    }
}

impl<T> From<&str> for Ref<T> {
    fn from(id: &str) -> Self {
        Ref::Id(id.to_string())
    }
}

/// Rewrite Mongo-style `_id` keys to `id` throughout a JSON document.
///
/// Objects that already carry `id` keep it; `_id` is dropped either way.
pub fn normalize_ids(value: &mut Value) {
    match value {
        Value::Object(map) => {
            if let Some(raw) = map.remove("_id") {
                if !map.contains_key("id") {
                    if let Value::String(_) = raw {
                        map.insert("id".to_string(), raw);
                    }
                }
            }
            for nested in map.values_mut() {
                normalize_ids(nested);
            }
        }
        Value::Array(items) => {
            for item in items.iter_mut() {
                normalize_ids(item);
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
    struct Thing {
        id: String,
        name: String,
    }

    impl Entity for Thing {
        fn id(&self) -> &str {
            &self.id
        }
    }

    #[test]
    fn test_bare_id_reference() {
        let r: Ref<Thing> = serde_json::from_value(json!("abc")).unwrap();
        assert_eq!(r.id(), "abc");
        assert!(r.resolved().is_none());
    }

    #[test]
    fn test_resolved_reference() {
        let r: Ref<Thing> = serde_json::from_value(json!({"id": "t1", "name": "Thing"})).unwrap();
        assert_eq!(r.id(), "t1");
        assert_eq!(r.resolved().map(|t| t.name.as_str()), Some("Thing"));
    }

    #[test]
    fn test_normalize_nested_ids() {
        let mut doc = json!({
            "_id": "g1",
            "assignedDriverId": {"_id": "d1", "name": "Ali"},
            "history": [{"_id": "h1"}, {"id": "keep", "_id": "drop"}]
        });
        normalize_ids(&mut doc);
        assert_eq!(doc["id"], "g1");
        assert!(doc.get("_id").is_none());
        assert_eq!(doc["assignedDriverId"]["id"], "d1");
        assert_eq!(doc["history"][0]["id"], "h1");
        assert_eq!(doc["history"][1]["id"], "keep");
        assert!(doc["history"][1].get("_id").is_none());
    }
}
