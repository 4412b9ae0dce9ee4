//! Structured key-value fields attached to every event of a logger
//!
//! This module provides:
//! - `FieldValue`: a single structured value
//! - `Fields`: the immutable, cheaply shared field set a `Logger` stamps onto
//!   each event

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashMap;
use std::sync::Arc;

/// Value type for structured logging fields
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    String(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Null,
    /// Arbitrary nested JSON (arrays, objects, integers beyond `i64`)
    Json(serde_json::Value),
    /// A value that could not be converted to JSON. Any event carrying it
    /// fails to encode and is dropped.
    Unrepresentable(String),
}

impl FieldValue {
    /// Convert any `Serialize` value into a field value.
    ///
    /// Conversion failures are kept as [`FieldValue::Unrepresentable`] rather
    /// than reported, so that the failure surfaces at encode time.
    pub fn serialized<T: Serialize + ?Sized>(value: &T) -> Self {
        match serde_json::to_value(value) {
            Ok(json) => json.into(),
            Err(err) => FieldValue::Unrepresentable(err.to_string()),
        }
    }
}

impl Serialize for FieldValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            FieldValue::String(s) => serializer.serialize_str(s),
            FieldValue::Int(i) => serializer.serialize_i64(*i),
            FieldValue::Float(f) => serializer.serialize_f64(*f),
            FieldValue::Bool(b) => serializer.serialize_bool(*b),
            FieldValue::Null => serializer.serialize_unit(),
            FieldValue::Json(v) => v.serialize(serializer),
            FieldValue::Unrepresentable(reason) => Err(serde::ser::Error::custom(format!(
                "field value is not representable: {}",
                reason
            ))),
        }
    }
}

impl<'de> Deserialize<'de> for FieldValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        serde_json::Value::deserialize(deserializer).map(FieldValue::from)
    }
}

impl From<serde_json::Value> for FieldValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => FieldValue::Null,
            serde_json::Value::Bool(b) => FieldValue::Bool(b),
            serde_json::Value::String(s) => FieldValue::String(s),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    FieldValue::Int(i)
                } else if n.is_u64() {
                    FieldValue::Json(serde_json::Value::Number(n))
                } else {
                    match n.as_f64() {
                        Some(f) => FieldValue::Float(f),
                        None => FieldValue::Json(serde_json::Value::Number(n)),
                    }
                }
            }
            other => FieldValue::Json(other),
        }
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::String(s)
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::String(s.to_string())
    }
}

impl From<i64> for FieldValue {
    fn from(i: i64) -> Self {
        FieldValue::Int(i)
    }
}

impl From<i32> for FieldValue {
    fn from(i: i32) -> Self {
        FieldValue::Int(i as i64)
    }
}

impl From<u32> for FieldValue {
    fn from(i: u32) -> Self {
        FieldValue::Int(i as i64)
    }
}

impl From<u64> for FieldValue {
    fn from(i: u64) -> Self {
        match i64::try_from(i) {
            Ok(i) => FieldValue::Int(i),
            Err(_) => FieldValue::Json(serde_json::Value::Number(i.into())),
        }
    }
}

impl From<f64> for FieldValue {
    fn from(f: f64) -> Self {
        FieldValue::Float(f)
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        FieldValue::Bool(b)
    }
}

/// Immutable field set shared by every event a logger produces
///
/// Cloning is an `Arc` bump, so stamping the set onto each event does not
/// copy the map. There is no way to mutate a `Fields` once built.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fields(Arc<HashMap<String, FieldValue>>);

impl Fields {
    /// Create an empty field set
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.0.get(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &FieldValue)> {
        self.0.iter()
    }
}

impl From<HashMap<String, FieldValue>> for Fields {
    fn from(map: HashMap<String, FieldValue>) -> Self {
        Fields(Arc::new(map))
    }
}

impl<K, V> FromIterator<(K, V)> for Fields
where
    K: Into<String>,
    V: Into<FieldValue>,
{
    /// Later pairs overwrite earlier ones with the same key.
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let map: HashMap<String, FieldValue> = iter
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        map.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn test_fields_last_write_wins() {
        let fields: Fields = vec![("service", "a"), ("service", "b")].into_iter().collect();
        assert_eq!(fields.len(), 1);
        assert_eq!(fields.get("service"), Some(&FieldValue::from("b")));
    }

    #[test]
    fn test_fields_clone_shares_map() {
        let fields: Fields = vec![("k", 1)].into_iter().collect();
        let copy = fields.clone();
        assert!(Arc::ptr_eq(&fields.0, &copy.0));
    }

    #[test]
    fn test_field_value_serialization() {
        let fields: Fields = vec![
            ("name", FieldValue::from("api")),
            ("port", FieldValue::from(8080)),
            ("debug", FieldValue::from(false)),
            ("none", FieldValue::Null),
        ]
        .into_iter()
        .collect();

        let json = serde_json::to_value(&fields).unwrap();
        assert_eq!(json["name"], "api");
        assert_eq!(json["port"], 8080);
        assert_eq!(json["debug"], false);
        assert!(json["none"].is_null());
    }

    #[test]
    fn test_serialized_nested_value() {
        let mut nested = BTreeMap::new();
        nested.insert("region", vec!["eu", "us"]);
        let value = FieldValue::serialized(&nested);
        assert!(matches!(value, FieldValue::Json(_)));
        assert_eq!(
            value,
            FieldValue::Json(serde_json::json!({ "region": ["eu", "us"] }))
        );
    }

    #[test]
    fn test_unrepresentable_value_fails_serialization() {
        // Non-string map keys cannot be JSON object keys.
        let mut map = HashMap::new();
        map.insert((1, 2), "pair");
        let value = FieldValue::serialized(&map);
        assert!(matches!(value, FieldValue::Unrepresentable(_)));
        assert!(serde_json::to_vec(&value).is_err());
    }

    #[test]
    fn test_deserialize_maps_json_kinds() {
        let value: FieldValue = serde_json::from_str("42").unwrap();
        assert_eq!(value, FieldValue::Int(42));
        let value: FieldValue = serde_json::from_str("1.5").unwrap();
        assert_eq!(value, FieldValue::Float(1.5));
        let value: FieldValue = serde_json::from_str("[1,2]").unwrap();
        assert_eq!(value, FieldValue::Json(serde_json::json!([1, 2])));
    }

    #[test]
    fn test_large_unsigned_kept_exact() {
        let value = FieldValue::from(u64::MAX);
        assert_eq!(serde_json::to_string(&value).unwrap(), u64::MAX.to_string());
    }
}
