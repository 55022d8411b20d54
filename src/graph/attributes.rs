//! Attribute maps carried by graphs, nodes, edges and sprites

use super::value::AttributeValue;
use std::collections::HashMap;

/// Outcome of writing a value into an [`Attributes`] map
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeChange {
    /// The key was absent
    Added,
    /// The key held a different value, returned here
    Changed(AttributeValue),
    /// The key already held an equal value
    Unchanged,
}

/// A keyed attribute map
#[derive(Debug, Clone, Default)]
pub struct Attributes {
    values: HashMap<String, AttributeValue>,
}

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&AttributeValue> {
        self.values.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Store `value` under `key`, reporting what the write did
    pub fn put(&mut self, key: impl Into<String>, value: AttributeValue) -> AttributeChange {
        let key = key.into();
        if self.values.get(&key) == Some(&value) {
            return AttributeChange::Unchanged;
        }
        match self.values.insert(key, value) {
            None => AttributeChange::Added,
            Some(old) => AttributeChange::Changed(old),
        }
    }

    pub fn remove(&mut self, key: &str) -> Option<AttributeValue> {
        self.values.remove(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &AttributeValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn put_reports_added_changed_unchanged() {
        let mut attrs = Attributes::new();
        assert_eq!(attrs.put("color", "red".into()), AttributeChange::Added);
        assert_eq!(attrs.put("color", "red".into()), AttributeChange::Unchanged);
        assert_eq!(
            attrs.put("color", "blue".into()),
            AttributeChange::Changed("red".into())
        );
        assert_eq!(attrs.get("color"), Some(&AttributeValue::from("blue")));
        assert_eq!(attrs.len(), 1);
    }

    #[test]
    fn remove_returns_previous_value() {
        let mut attrs = Attributes::new();
        attrs.put("label", "a".into());
        assert_eq!(attrs.remove("label"), Some("a".into()));
        assert_eq!(attrs.remove("label"), None);
        assert!(attrs.is_empty());
    }
}
