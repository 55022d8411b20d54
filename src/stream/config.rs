//! Declarative filter configuration
//!
//! A YAML (or JSON) document naming which attributes each slot drops:
//!
//! ```yaml
//! global:
//!   prefixes: ["ui."]
//! node:
//!   names: ["label"]
//!   removals: true
//! ```

use super::filter::FilterSlot;
use super::predicate::AttributeMatcher;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Errors loading a filter configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid filter config: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// What a single slot drops
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PredicateSpec {
    /// Exact attribute names
    pub names: Vec<String>,
    /// Attribute name prefixes
    pub prefixes: Vec<String>,
    /// Drop every removal event
    pub removals: bool,
}

impl PredicateSpec {
    pub fn to_matcher(&self) -> AttributeMatcher {
        let mut matcher = AttributeMatcher::new();
        for name in &self.names {
            matcher = matcher.with_name(name.clone());
        }
        for prefix in &self.prefixes {
            matcher = matcher.with_prefix(prefix.clone());
        }
        if self.removals {
            matcher = matcher.with_removals();
        }
        matcher
    }
}

/// Predicates for the four filter slots. Absent entries leave the slot empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FilterConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub global: Option<PredicateSpec>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub graph: Option<PredicateSpec>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub node: Option<PredicateSpec>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub edge: Option<PredicateSpec>,
}

impl FilterConfig {
    pub fn from_yaml_str(source: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(source)?)
    }

    /// Read a config file. JSON files load too, being valid YAML.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let source = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&source)
    }

    /// The configured slots, global first
    pub fn slots(&self) -> impl Iterator<Item = (FilterSlot, &PredicateSpec)> {
        [
            (FilterSlot::Global, self.global.as_ref()),
            (FilterSlot::Graph, self.graph.as_ref()),
            (FilterSlot::Node, self.node.as_ref()),
            (FilterSlot::Edge, self.edge.as_ref()),
        ]
        .into_iter()
        .filter_map(|(slot, spec)| spec.map(|s| (slot, s)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::AttributeValue;
    use crate::stream::registry::shared;
    use crate::stream::{AttributeFilter, AttributeObserver, EventRecorder};
    use std::io::Write;

    const SAMPLE: &str = r#"
global:
  prefixes: ["ui."]
node:
  names: ["label"]
  removals: true
"#;

    #[test]
    fn parses_partial_config() {
        let config = FilterConfig::from_yaml_str(SAMPLE).unwrap();
        assert!(config.graph.is_none());
        assert!(config.edge.is_none());
        let node = config.node.as_ref().unwrap();
        assert_eq!(node.names, vec!["label".to_string()]);
        assert!(node.removals);

        let slots: Vec<FilterSlot> = config.slots().map(|(slot, _)| slot).collect();
        assert_eq!(slots, vec![FilterSlot::Global, FilterSlot::Node]);
    }

    #[test]
    fn unknown_fields_rejected() {
        let err = FilterConfig::from_yaml_str("nodes:\n  names: [label]\n").unwrap_err();
        assert!(matches!(err, ConfigError::Yaml(_)));
    }

    #[test]
    fn loads_json_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"edge": {{"names": ["weight"]}}}}"#).unwrap();

        let config = FilterConfig::load(file.path()).unwrap();
        assert_eq!(config.edge.unwrap().names, vec!["weight".to_string()]);
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = FilterConfig::load(dir.path().join("absent.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn filter_built_from_config() {
        let config = FilterConfig::from_yaml_str(SAMPLE).unwrap();
        let mut filter = AttributeFilter::from_config(&config);
        let recorder = shared(EventRecorder::new());
        filter.add_sink(recorder.clone());

        filter.graph_attribute_added("g", "ui.quality", &true.into()).unwrap();
        filter.node_attribute_added("g", "n", "label", &"A".into()).unwrap();
        filter.node_attribute_removed("g", "n", "size").unwrap();
        filter.edge_attribute_removed("g", "e", "size").unwrap();
        filter
            .node_attribute_added("g", "n", "size", &AttributeValue::Int(3))
            .unwrap();

        let attributes: Vec<String> = recorder
            .borrow()
            .events()
            .iter()
            .map(|e| format!("{:?}:{}", e.kind(), e.attribute()))
            .collect();
        assert_eq!(attributes, vec!["Edge:size", "Node:size"]);
    }
}
