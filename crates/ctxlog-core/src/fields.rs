//! Key-value fields attached to records.

use serde::Serialize;
use serde_json::Value;

/// Placeholder stored for a key that has no value.
pub const MISSING_VALUE: &str = "(MISSING)";

/// An ordered list of key-value pairs.
///
/// Order is preserved all the way to the output; duplicate keys are kept
/// as written.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Fields(Vec<(String, Value)>);

impl Fields {
    /// Create an empty field list.
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Append one field.
    ///
    /// A value that cannot be represented as JSON is stored as the text of
    /// the serialization error instead of being dropped.
    pub fn push(&mut self, key: impl Into<String>, value: impl Serialize) {
        let value = serde_json::to_value(value)
            .unwrap_or_else(|e| Value::String(format!("!ERROR: {}", e)));
        self.0.push((key.into(), value));
    }

    /// Builder form of [`Fields::push`].
    pub fn with(mut self, key: impl Into<String>, value: impl Serialize) -> Self {
        self.push(key, value);
        self
    }

    /// Build fields from an alternating `key, value, key, value, ...` list.
    ///
    /// Malformed input is tolerated: a key that is not a string is
    /// stringified, and a trailing key without a value gets
    /// [`MISSING_VALUE`].
    pub fn from_kvs(kvs: impl IntoIterator<Item = Value>) -> Self {
        let mut fields = Self::new();
        let mut iter = kvs.into_iter();

        while let Some(key) = iter.next() {
            let key = match key {
                Value::String(s) => s,
                other => other.to_string(),
            };
            let value = iter
                .next()
                .unwrap_or_else(|| Value::String(MISSING_VALUE.to_string()));
            fields.0.push((key, value));
        }

        fields
    }

    /// Append every field of `other`, keeping its order.
    pub fn extend(&mut self, other: Fields) {
        self.0.extend(other.0);
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether there are no fields.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over `(key, value)` pairs in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Value of the first field named `key`.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.iter().find(|(k, _)| *k == key).map(|(_, v)| v)
    }
}

impl IntoIterator for Fields {
    type Item = (String, Value);
    type IntoIter = std::vec::IntoIter<(String, Value)>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// Conversion into [`Fields`], accepted by every emission method.
///
/// Implemented for `()` (no fields), [`Fields`], and arrays, slices and
/// vectors of `(key, value)` pairs whose values serialize.
pub trait IntoFields {
    /// Perform the conversion.
    fn into_fields(self) -> Fields;
}

impl IntoFields for () {
    fn into_fields(self) -> Fields {
        Fields::new()
    }
}

impl IntoFields for Fields {
    fn into_fields(self) -> Fields {
        self
    }
}

impl<K, V, const N: usize> IntoFields for [(K, V); N]
where
    K: Into<String>,
    V: Serialize,
{
    fn into_fields(self) -> Fields {
        self.into_iter()
            .fold(Fields::new(), |fields, (k, v)| fields.with(k, v))
    }
}

impl<K, V> IntoFields for Vec<(K, V)>
where
    K: Into<String>,
    V: Serialize,
{
    fn into_fields(self) -> Fields {
        self.into_iter()
            .fold(Fields::new(), |fields, (k, v)| fields.with(k, v))
    }
}

impl<K, V> IntoFields for &[(K, V)]
where
    K: AsRef<str>,
    V: Serialize,
{
    fn into_fields(self) -> Fields {
        self.iter()
            .fold(Fields::new(), |fields, (k, v)| fields.with(k.as_ref(), v))
    }
}

/// Build [`Fields`] from `key => value` pairs of mixed value types.
///
/// ```
/// use ctxlog_core::fields;
///
/// let fields = fields!("a" => 1, "b" => "1", "c" => vec![1, 2, 3]);
/// assert_eq!(fields.len(), 3);
/// ```
#[macro_export]
macro_rules! fields {
    () => {
        $crate::Fields::new()
    };
    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut fields = $crate::Fields::new();
        $( fields.push($key, $value); )+
        fields
    }};
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashMap;

    #[test]
    fn test_macro_keeps_order_and_types() {
        let fields = fields!("a" => 1, "b" => "1", "c" => vec![1, 2, 3]);
        let pairs: Vec<_> = fields.iter().collect();
        assert_eq!(pairs[0], ("a", &json!(1)));
        assert_eq!(pairs[1], ("b", &json!("1")));
        assert_eq!(pairs[2], ("c", &json!([1, 2, 3])));
    }

    #[test]
    fn test_from_kvs_tolerates_malformed_lists() {
        let fields = Fields::from_kvs(vec![json!("k"), json!("v"), json!(7), json!(true), json!("dangling")]);
        assert_eq!(fields.get("k"), Some(&json!("v")));
        assert_eq!(fields.get("7"), Some(&json!(true)));
        assert_eq!(fields.get("dangling"), Some(&json!(MISSING_VALUE)));
    }

    #[test]
    fn test_unserializable_value_is_kept_as_error_text() {
        let mut map = HashMap::new();
        map.insert((1, 2), "tuple keys are not valid JSON object keys");

        let mut fields = Fields::new();
        fields.push("map", map);
        let value = fields.get("map").unwrap().as_str().unwrap();
        assert!(value.starts_with("!ERROR:"));
    }

    #[test]
    fn test_into_fields_impls() {
        assert!(().into_fields().is_empty());
        assert_eq!([("k", "v")].into_fields().get("k"), Some(&json!("v")));
        assert_eq!(vec![("n", 3)].into_fields().get("n"), Some(&json!(3)));

        let pairs = [("x".to_string(), 1.5)];
        assert_eq!(pairs.as_slice().into_fields().get("x"), Some(&json!(1.5)));
    }
}
