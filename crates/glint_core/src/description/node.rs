//! Lenient typed access into a JSON document.
//!
//! A `Node` remembers its path in the document (`objects[2].material.ka`)
//! so every error and warning can point at the offending field.

use serde::de::DeserializeOwned;
use serde_json::Value;

use super::parser::{DescriptionError, DescriptionResult};

#[derive(Debug, Clone)]
pub(crate) struct Node<'a> {
    value: &'a Value,
    path: String,
}

impl<'a> Node<'a> {
    pub fn root(value: &'a Value) -> Self {
        Self {
            value,
            path: String::new(),
        }
    }

    pub fn path(&self) -> &str {
        if self.path.is_empty() {
            "<root>"
        } else {
            &self.path
        }
    }

    fn child_path(&self, key: &str) -> String {
        if self.path.is_empty() {
            key.to_string()
        } else {
            format!("{}.{}", self.path, key)
        }
    }

    pub fn is_object(&self) -> bool {
        self.value.is_object()
    }

    pub fn has(&self, key: &str) -> bool {
        self.value.get(key).is_some_and(|v| !v.is_null())
    }

    /// Child node, if the key exists and is not null.
    pub fn child(&self, key: &str) -> Option<Node<'a>> {
        self.value
            .get(key)
            .filter(|v| !v.is_null())
            .map(|value| Node {
                value,
                path: self.child_path(key),
            })
    }

    /// Read a field that must be present and well formed.
    pub fn required<T: DeserializeOwned>(&self, key: &str) -> DescriptionResult<T> {
        let child = self
            .child(key)
            .ok_or_else(|| DescriptionError::MissingField(self.child_path(key)))?;
        child.parse()
    }

    /// Read a field that falls back to `default` when absent or malformed.
    ///
    /// A present but malformed value is logged before falling back.
    pub fn optional<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        match self.child(key) {
            None => default,
            Some(child) => match child.parse() {
                Ok(value) => value,
                Err(err) => {
                    log::warn!("{}, using default", err);
                    default
                }
            },
        }
    }

    /// Deserialize this node as a whole.
    pub fn parse<T: DeserializeOwned>(&self) -> DescriptionResult<T> {
        T::deserialize(self.value).map_err(|e| DescriptionError::InvalidField {
            path: self.path().to_string(),
            reason: e.to_string(),
        })
    }

    /// Elements of an array field that must be present.
    pub fn sequence(&self, key: &str) -> DescriptionResult<Vec<Node<'a>>> {
        let child = self
            .child(key)
            .ok_or_else(|| DescriptionError::MissingField(self.child_path(key)))?;
        child.elements()
    }

    /// Elements of this node, which must be an array.
    pub fn elements(&self) -> DescriptionResult<Vec<Node<'a>>> {
        let items = self
            .value
            .as_array()
            .ok_or_else(|| DescriptionError::NotASequence(self.path().to_string()))?;
        Ok(items
            .iter()
            .enumerate()
            .map(|(i, value)| Node {
                value,
                path: format!("{}[{}]", self.path, i),
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_required_and_optional() {
        let doc = json!({ "radius": 2.5, "name": "ball", "bad": "x" });
        let node = Node::root(&doc);

        assert_eq!(node.required::<f64>("radius").unwrap(), 2.5);
        assert_eq!(node.optional("missing", 7.0), 7.0);
        assert_eq!(node.optional("bad", 1.0), 1.0);
        assert!(matches!(
            node.required::<f64>("missing"),
            Err(DescriptionError::MissingField(path)) if path == "missing"
        ));
        assert!(matches!(
            node.required::<f64>("name"),
            Err(DescriptionError::InvalidField { path, .. }) if path == "name"
        ));
    }

    #[test]
    fn test_null_counts_as_missing() {
        let doc = json!({ "size": null });
        let node = Node::root(&doc);
        assert!(!node.has("size"));
        assert_eq!(node.optional("size", 3u32), 3);
    }

    #[test]
    fn test_sequence_paths() {
        let doc = json!({ "objects": [ { "radius": 1.0 }, { "radius": "big" } ] });
        let node = Node::root(&doc);
        let objects = node.sequence("objects").unwrap();

        assert_eq!(objects.len(), 2);
        assert_eq!(objects[1].path(), "objects[1]");
        match objects[1].required::<f64>("radius") {
            Err(DescriptionError::InvalidField { path, .. }) => {
                assert_eq!(path, "objects[1].radius")
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_sequence_must_be_array() {
        let doc = json!({ "lights": { "position": [0, 0, 0] } });
        let node = Node::root(&doc);
        assert!(matches!(
            node.sequence("lights"),
            Err(DescriptionError::NotASequence(path)) if path == "lights"
        ));
    }
}
