//! Specification extensions (`x-*` fields).

use crate::error::{OpenRpcError, OpenRpcResult};
use crate::validation::Validate;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A map of extension fields that can be added to any OpenRPC object.
///
/// Every field name MUST begin with `x-`. Unknown keys on an object land here
/// during deserialization and are rejected by [`Validate`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Extensions(IndexMap<String, Value>);

impl Extensions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an extension field. Keys without the `x-` prefix are rejected.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> OpenRpcResult<()> {
        let key = key.into();
        check_key(&key)?;
        self.0.insert(key, value.into());
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

fn check_key(key: &str) -> OpenRpcResult<()> {
    if !key.starts_with("x-") {
        return Err(OpenRpcError::validation(format!(
            "Unknown field '{key}' (extension keys must start with 'x-')"
        )));
    }
    if key.len() <= 2 {
        return Err(OpenRpcError::validation(format!(
            "Extension key must have content after 'x-': {key}"
        )));
    }
    Ok(())
}

impl Validate for Extensions {
    fn validate(&self) -> OpenRpcResult<()> {
        self.0.keys().try_for_each(|key| check_key(key))
    }
}

impl<'a> IntoIterator for &'a Extensions {
    type Item = (&'a String, &'a Value);
    type IntoIter = indexmap::map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_extensions_insert() {
        let mut ext = Extensions::new();
        ext.insert("x-generator", "ocg").unwrap();
        ext.insert("x-number", 42).unwrap();

        assert_eq!(ext.get("x-generator"), Some(&json!("ocg")));
        assert_eq!(ext.len(), 2);
        assert!(ext.insert("generator", "ocg").is_err());
        assert!(ext.insert("x-", 1).is_err());
    }

    #[test]
    fn test_unknown_fields_fail_validation() {
        let ext: Extensions = serde_json::from_value(json!({
            "x-ok": true,
            "$schema": "https://meta.open-rpc.org/"
        }))
        .unwrap();

        let err = ext.validate().unwrap_err();
        assert!(err.to_string().contains("$schema"));
    }

    #[test]
    fn test_extensions_keep_insertion_order() {
        let ext: Extensions = serde_json::from_value(json!({
            "x-zeta": 1,
            "x-alpha": 2,
            "x-mid": 3
        }))
        .unwrap();

        let keys: Vec<&str> = ext.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["x-zeta", "x-alpha", "x-mid"]);
    }
}
