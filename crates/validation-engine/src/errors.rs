use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::HashMap;

/// Validation messages keyed by path, in the order paths first failed
///
/// Serializes as a JSON object of string arrays, the payload an HTTP layer
/// turns into a problem response.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorMap {
    entries: Vec<(String, Vec<String>)>,
    index: HashMap<String, usize>,
}

impl ErrorMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one message under `path`
    pub fn add(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.messages_mut(path.into()).push(message.into());
    }

    /// Append several messages under `path`, keeping their order
    pub fn extend<I, S>(&mut self, path: impl Into<String>, messages: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let list = self.messages_mut(path.into());
        list.extend(messages.into_iter().map(Into::into));
    }

    fn messages_mut(&mut self, path: String) -> &mut Vec<String> {
        let slot = match self.index.get(&path) {
            Some(&slot) => slot,
            None => {
                self.entries.push((path.clone(), Vec::new()));
                self.index.insert(path, self.entries.len() - 1);
                self.entries.len() - 1
            }
        };
        &mut self.entries[slot].1
    }

    pub fn get(&self, path: &str) -> Option<&[String]> {
        self.index
            .get(path)
            .map(|&slot| self.entries[slot].1.as_slice())
    }

    pub fn contains_key(&self, path: &str) -> bool {
        self.index.contains_key(path)
    }

    /// Paths in the order they were first recorded
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(path, _)| path.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries
            .iter()
            .map(|(path, messages)| (path.as_str(), messages.as_slice()))
    }

    /// Number of distinct paths
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of messages across all paths
    pub fn message_count(&self) -> usize {
        self.entries.iter().map(|(_, messages)| messages.len()).sum()
    }
}

impl Serialize for ErrorMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (path, messages) in &self.entries {
            map.serialize_entry(path, messages)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_messages_accumulate_per_path() {
        let mut errors = ErrorMap::new();
        errors.add("Age", "Range error");
        errors.add("Name", "The Name field is required.");
        errors.add("Age", "Custom error");

        assert_eq!(errors.len(), 2);
        assert_eq!(errors.message_count(), 3);
        assert_eq!(errors.get("Age").unwrap(), ["Range error", "Custom error"]);
        assert_eq!(errors.keys().collect::<Vec<_>>(), vec!["Age", "Name"]);
    }

    #[test]
    fn test_extend_keeps_order() {
        let mut errors = ErrorMap::new();
        errors.extend("Items[0].Sku", ["first", "second"]);
        errors.extend("Items[0].Sku", vec![String::from("third")]);
        assert_eq!(errors.get("Items[0].Sku").unwrap(), ["first", "second", "third"]);
        assert!(errors.get("Items[1].Sku").is_none());
    }

    #[test]
    fn test_serializes_as_object() {
        let mut errors = ErrorMap::new();
        errors.add("Address.City", "The City field is required.");
        let json = serde_json::to_value(&errors).unwrap();
        assert_eq!(json, json!({ "Address.City": ["The City field is required."] }));
    }
}
