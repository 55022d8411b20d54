//! The attribute observer capability set and its owned event form
//!
//! Nine entry points, one per `{graph, node, edge} x {added, changed, removed}`.
//! Every entry point returns a [`StreamResult`] so that a failing stage
//! aborts delivery of the event to the caller instead of being swallowed.

use crate::graph::AttributeValue;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::registry::ObserverId;

/// Errors raised while an attribute event travels through observers
#[derive(Debug, Error)]
pub enum StreamError {
    #[error("predicate failed on attribute '{attribute}': {reason}")]
    Predicate { attribute: String, reason: String },

    #[error("observer {0} is already handling an event")]
    ObserverBusy(ObserverId),

    #[error("observer error: {0}")]
    Observer(String),
}

/// Result type for event delivery
pub type StreamResult<T> = Result<T, StreamError>;

/// The kind of element an attribute belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    Graph,
    Node,
    Edge,
}

/// Receives attribute mutation notifications.
///
/// All methods default to accepting and ignoring the event, so observers
/// only override what they care about.
#[allow(unused_variables)]
pub trait AttributeObserver {
    fn graph_attribute_added(
        &mut self,
        graph_id: &str,
        attribute: &str,
        value: &AttributeValue,
    ) -> StreamResult<()> {
        Ok(())
    }

    fn graph_attribute_changed(
        &mut self,
        graph_id: &str,
        attribute: &str,
        old_value: &AttributeValue,
        new_value: &AttributeValue,
    ) -> StreamResult<()> {
        Ok(())
    }

    fn graph_attribute_removed(&mut self, graph_id: &str, attribute: &str) -> StreamResult<()> {
        Ok(())
    }

    fn node_attribute_added(
        &mut self,
        graph_id: &str,
        node_id: &str,
        attribute: &str,
        value: &AttributeValue,
    ) -> StreamResult<()> {
        Ok(())
    }

    fn node_attribute_changed(
        &mut self,
        graph_id: &str,
        node_id: &str,
        attribute: &str,
        old_value: &AttributeValue,
        new_value: &AttributeValue,
    ) -> StreamResult<()> {
        Ok(())
    }

    fn node_attribute_removed(
        &mut self,
        graph_id: &str,
        node_id: &str,
        attribute: &str,
    ) -> StreamResult<()> {
        Ok(())
    }

    fn edge_attribute_added(
        &mut self,
        graph_id: &str,
        edge_id: &str,
        attribute: &str,
        value: &AttributeValue,
    ) -> StreamResult<()> {
        Ok(())
    }

    fn edge_attribute_changed(
        &mut self,
        graph_id: &str,
        edge_id: &str,
        attribute: &str,
        old_value: &AttributeValue,
        new_value: &AttributeValue,
    ) -> StreamResult<()> {
        Ok(())
    }

    fn edge_attribute_removed(
        &mut self,
        graph_id: &str,
        edge_id: &str,
        attribute: &str,
    ) -> StreamResult<()> {
        Ok(())
    }
}

/// An owned attribute notification.
///
/// Serializes as a tagged JSON object, one per line in event logs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum AttributeEvent {
    GraphAttributeAdded {
        graph_id: String,
        attribute: String,
        value: AttributeValue,
    },
    GraphAttributeChanged {
        graph_id: String,
        attribute: String,
        old_value: AttributeValue,
        new_value: AttributeValue,
    },
    GraphAttributeRemoved {
        graph_id: String,
        attribute: String,
    },
    NodeAttributeAdded {
        graph_id: String,
        node_id: String,
        attribute: String,
        value: AttributeValue,
    },
    NodeAttributeChanged {
        graph_id: String,
        node_id: String,
        attribute: String,
        old_value: AttributeValue,
        new_value: AttributeValue,
    },
    NodeAttributeRemoved {
        graph_id: String,
        node_id: String,
        attribute: String,
    },
    EdgeAttributeAdded {
        graph_id: String,
        edge_id: String,
        attribute: String,
        value: AttributeValue,
    },
    EdgeAttributeChanged {
        graph_id: String,
        edge_id: String,
        attribute: String,
        old_value: AttributeValue,
        new_value: AttributeValue,
    },
    EdgeAttributeRemoved {
        graph_id: String,
        edge_id: String,
        attribute: String,
    },
}

impl AttributeEvent {
    /// The element kind the event is about
    pub fn kind(&self) -> ElementKind {
        match self {
            Self::GraphAttributeAdded { .. }
            | Self::GraphAttributeChanged { .. }
            | Self::GraphAttributeRemoved { .. } => ElementKind::Graph,
            Self::NodeAttributeAdded { .. }
            | Self::NodeAttributeChanged { .. }
            | Self::NodeAttributeRemoved { .. } => ElementKind::Node,
            Self::EdgeAttributeAdded { .. }
            | Self::EdgeAttributeChanged { .. }
            | Self::EdgeAttributeRemoved { .. } => ElementKind::Edge,
        }
    }

    pub fn attribute(&self) -> &str {
        match self {
            Self::GraphAttributeAdded { attribute, .. }
            | Self::GraphAttributeChanged { attribute, .. }
            | Self::GraphAttributeRemoved { attribute, .. }
            | Self::NodeAttributeAdded { attribute, .. }
            | Self::NodeAttributeChanged { attribute, .. }
            | Self::NodeAttributeRemoved { attribute, .. }
            | Self::EdgeAttributeAdded { attribute, .. }
            | Self::EdgeAttributeChanged { attribute, .. }
            | Self::EdgeAttributeRemoved { attribute, .. } => attribute,
        }
    }

    /// The new value carried by the event; `None` for removals
    pub fn value(&self) -> Option<&AttributeValue> {
        match self {
            Self::GraphAttributeAdded { value, .. }
            | Self::NodeAttributeAdded { value, .. }
            | Self::EdgeAttributeAdded { value, .. } => Some(value),
            Self::GraphAttributeChanged { new_value, .. }
            | Self::NodeAttributeChanged { new_value, .. }
            | Self::EdgeAttributeChanged { new_value, .. } => Some(new_value),
            _ => None,
        }
    }

    /// Invoke the matching observer entry point with this event's arguments
    pub fn deliver(&self, observer: &mut dyn AttributeObserver) -> StreamResult<()> {
        match self {
            Self::GraphAttributeAdded { graph_id, attribute, value } => {
                observer.graph_attribute_added(graph_id, attribute, value)
            }
            Self::GraphAttributeChanged { graph_id, attribute, old_value, new_value } => {
                observer.graph_attribute_changed(graph_id, attribute, old_value, new_value)
            }
            Self::GraphAttributeRemoved { graph_id, attribute } => {
                observer.graph_attribute_removed(graph_id, attribute)
            }
            Self::NodeAttributeAdded { graph_id, node_id, attribute, value } => {
                observer.node_attribute_added(graph_id, node_id, attribute, value)
            }
            Self::NodeAttributeChanged { graph_id, node_id, attribute, old_value, new_value } => {
                observer.node_attribute_changed(graph_id, node_id, attribute, old_value, new_value)
            }
            Self::NodeAttributeRemoved { graph_id, node_id, attribute } => {
                observer.node_attribute_removed(graph_id, node_id, attribute)
            }
            Self::EdgeAttributeAdded { graph_id, edge_id, attribute, value } => {
                observer.edge_attribute_added(graph_id, edge_id, attribute, value)
            }
            Self::EdgeAttributeChanged { graph_id, edge_id, attribute, old_value, new_value } => {
                observer.edge_attribute_changed(graph_id, edge_id, attribute, old_value, new_value)
            }
            Self::EdgeAttributeRemoved { graph_id, edge_id, attribute } => {
                observer.edge_attribute_removed(graph_id, edge_id, attribute)
            }
        }
    }
}

/// Observer that keeps every event it receives, in order
#[derive(Debug, Default)]
pub struct EventRecorder {
    events: Vec<AttributeEvent>,
}

impl EventRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[AttributeEvent] {
        &self.events
    }

    /// Drain the recorded events
    pub fn take(&mut self) -> Vec<AttributeEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    fn record(&mut self, event: AttributeEvent) -> StreamResult<()> {
        self.events.push(event);
        Ok(())
    }
}

impl AttributeObserver for EventRecorder {
    fn graph_attribute_added(
        &mut self,
        graph_id: &str,
        attribute: &str,
        value: &AttributeValue,
    ) -> StreamResult<()> {
        self.record(AttributeEvent::GraphAttributeAdded {
            graph_id: graph_id.to_string(),
            attribute: attribute.to_string(),
            value: value.clone(),
        })
    }

    fn graph_attribute_changed(
        &mut self,
        graph_id: &str,
        attribute: &str,
        old_value: &AttributeValue,
        new_value: &AttributeValue,
    ) -> StreamResult<()> {
        self.record(AttributeEvent::GraphAttributeChanged {
            graph_id: graph_id.to_string(),
            attribute: attribute.to_string(),
            old_value: old_value.clone(),
            new_value: new_value.clone(),
        })
    }

    fn graph_attribute_removed(&mut self, graph_id: &str, attribute: &str) -> StreamResult<()> {
        self.record(AttributeEvent::GraphAttributeRemoved {
            graph_id: graph_id.to_string(),
            attribute: attribute.to_string(),
        })
    }

    fn node_attribute_added(
        &mut self,
        graph_id: &str,
        node_id: &str,
        attribute: &str,
        value: &AttributeValue,
    ) -> StreamResult<()> {
        self.record(AttributeEvent::NodeAttributeAdded {
            graph_id: graph_id.to_string(),
            node_id: node_id.to_string(),
            attribute: attribute.to_string(),
            value: value.clone(),
        })
    }

    fn node_attribute_changed(
        &mut self,
        graph_id: &str,
        node_id: &str,
        attribute: &str,
        old_value: &AttributeValue,
        new_value: &AttributeValue,
    ) -> StreamResult<()> {
        self.record(AttributeEvent::NodeAttributeChanged {
            graph_id: graph_id.to_string(),
            node_id: node_id.to_string(),
            attribute: attribute.to_string(),
            old_value: old_value.clone(),
            new_value: new_value.clone(),
        })
    }

    fn node_attribute_removed(
        &mut self,
        graph_id: &str,
        node_id: &str,
        attribute: &str,
    ) -> StreamResult<()> {
        self.record(AttributeEvent::NodeAttributeRemoved {
            graph_id: graph_id.to_string(),
            node_id: node_id.to_string(),
            attribute: attribute.to_string(),
        })
    }

    fn edge_attribute_added(
        &mut self,
        graph_id: &str,
        edge_id: &str,
        attribute: &str,
        value: &AttributeValue,
    ) -> StreamResult<()> {
        self.record(AttributeEvent::EdgeAttributeAdded {
            graph_id: graph_id.to_string(),
            edge_id: edge_id.to_string(),
            attribute: attribute.to_string(),
            value: value.clone(),
        })
    }

    fn edge_attribute_changed(
        &mut self,
        graph_id: &str,
        edge_id: &str,
        attribute: &str,
        old_value: &AttributeValue,
        new_value: &AttributeValue,
    ) -> StreamResult<()> {
        self.record(AttributeEvent::EdgeAttributeChanged {
            graph_id: graph_id.to_string(),
            edge_id: edge_id.to_string(),
            attribute: attribute.to_string(),
            old_value: old_value.clone(),
            new_value: new_value.clone(),
        })
    }

    fn edge_attribute_removed(
        &mut self,
        graph_id: &str,
        edge_id: &str,
        attribute: &str,
    ) -> StreamResult<()> {
        self.record(AttributeEvent::EdgeAttributeRemoved {
            graph_id: graph_id.to_string(),
            edge_id: edge_id.to_string(),
            attribute: attribute.to_string(),
        })
    }
}
