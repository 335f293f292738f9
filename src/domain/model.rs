use serde::{Deserialize, Serialize};

/// One stored `(key, value)` pair. Keys are not unique within a map.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Entry {
    pub key: String,
    pub value: String,
}

impl Entry {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    pub fn as_pair(&self) -> (&str, &str) {
        (&self.key, &self.value)
    }
}

impl<K: Into<String>, V: Into<String>> From<(K, V)> for Entry {
    fn from((key, value): (K, V)) -> Self {
        Entry::new(key, value)
    }
}

impl From<Entry> for (String, String) {
    fn from(entry: Entry) -> Self {
        (entry.key, entry.value)
    }
}

/// Ordered snapshot of a map. Serializes as `[[key, value], ...]`.
pub type State = Vec<(String, String)>;

/// Argument to `set_values`.
///
/// A bare string converts into `Scalar`, which `set_values` rejects instead of
/// treating it as a sequence of characters. Deserialization is untagged, so a
/// rules file that writes `values = "x"` hits the same check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ValueList {
    Many(Vec<String>),
    Scalar(String),
}

impl ValueList {
    pub fn is_scalar(&self) -> bool {
        matches!(self, ValueList::Scalar(_))
    }
}

impl From<&str> for ValueList {
    fn from(value: &str) -> Self {
        ValueList::Scalar(value.to_string())
    }
}

impl From<String> for ValueList {
    fn from(value: String) -> Self {
        ValueList::Scalar(value)
    }
}

impl From<&String> for ValueList {
    fn from(value: &String) -> Self {
        ValueList::Scalar(value.clone())
    }
}

impl<T: Into<String>> From<Vec<T>> for ValueList {
    fn from(values: Vec<T>) -> Self {
        ValueList::Many(values.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<String>, const N: usize> From<[T; N]> for ValueList {
    fn from(values: [T; N]) -> Self {
        ValueList::Many(values.into_iter().map(Into::into).collect())
    }
}

impl<T: Clone + Into<String>> From<&[T]> for ValueList {
    fn from(values: &[T]) -> Self {
        ValueList::Many(values.iter().cloned().map(Into::into).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_list_conversions() {
        assert!(ValueList::from("example.com").is_scalar());
        assert!(ValueList::from(String::from("example.com")).is_scalar());
        assert_eq!(
            ValueList::from(["a", "b"]),
            ValueList::Many(vec!["a".to_string(), "b".to_string()])
        );
        assert!(!ValueList::from(Vec::<String>::new()).is_scalar());
    }

    #[test]
    fn test_value_list_untagged_deserialization() {
        let many: ValueList = serde_json::from_str(r#"["a", "b"]"#).unwrap();
        assert_eq!(many, ValueList::from(vec!["a", "b"]));

        let scalar: ValueList = serde_json::from_str(r#""a""#).unwrap();
        assert!(scalar.is_scalar());
    }

    #[test]
    fn test_state_json_shape() {
        let state: State = vec![("Host".to_string(), "example.com".to_string())];
        let json = serde_json::to_string(&state).unwrap();
        assert_eq!(json, r#"[["Host","example.com"]]"#);
    }
}
