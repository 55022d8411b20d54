//! AttributeFilter: a pass-through stage that vetoes attribute events
//!
//! Every event is first tested against the predicate for its element kind,
//! then against the global predicate. A match at either stage drops the
//! event; the global predicate is not consulted once the specific one has
//! matched. Surviving events are forwarded unchanged to every sink.

use super::config::FilterConfig;
use super::observer::{AttributeObserver, ElementKind, StreamResult};
use super::predicate::{AttributePredicate, PredicateSlot};
use super::registry::{ObserverHandle, ObserverId, ObserverList};
use crate::graph::AttributeValue;
use tracing::trace;

/// Which predicate slot of a filter to address
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterSlot {
    /// Applies to graph, node and edge attributes
    Global,
    Graph,
    Node,
    Edge,
}

impl From<ElementKind> for FilterSlot {
    fn from(kind: ElementKind) -> Self {
        match kind {
            ElementKind::Graph => Self::Graph,
            ElementKind::Node => Self::Node,
            ElementKind::Edge => Self::Edge,
        }
    }
}

/// Filters the attribute event stream with up to four predicates.
///
/// With no predicate set, the filter forwards everything.
#[derive(Debug, Default)]
pub struct AttributeFilter {
    global: PredicateSlot,
    graph: PredicateSlot,
    node: PredicateSlot,
    edge: PredicateSlot,
    sinks: ObserverList,
}

impl AttributeFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a filter whose slots come from a declarative config
    pub fn from_config(config: &FilterConfig) -> Self {
        let mut filter = Self::new();
        for (slot, spec) in config.slots() {
            filter.set_filter(slot, spec.to_matcher());
        }
        filter
    }

    /// Install `predicate` in `slot`, replacing any previous one
    pub fn set_filter(&mut self, slot: FilterSlot, predicate: impl AttributePredicate + 'static) {
        self.slot_mut(slot).set(Some(Box::new(predicate)));
    }

    /// Builder form of [`set_filter`](Self::set_filter)
    pub fn with_filter(mut self, slot: FilterSlot, predicate: impl AttributePredicate + 'static) -> Self {
        self.set_filter(slot, predicate);
        self
    }

    /// Empty `slot`; that stage then lets every event through
    pub fn clear_filter(&mut self, slot: FilterSlot) {
        self.slot_mut(slot).set(None);
    }

    /// The predicate currently in `slot`, if any
    pub fn filter(&self, slot: FilterSlot) -> Option<&dyn AttributePredicate> {
        self.slot(slot).get()
    }

    /// Register a downstream observer
    pub fn add_sink(&self, sink: ObserverHandle) -> ObserverId {
        self.sinks.add(sink)
    }

    pub fn remove_sink(&self, id: ObserverId) -> bool {
        self.sinks.remove(id)
    }

    /// The downstream observers, shared with this filter
    pub fn sinks(&self) -> ObserverList {
        self.sinks.clone()
    }

    fn slot(&self, slot: FilterSlot) -> &PredicateSlot {
        match slot {
            FilterSlot::Global => &self.global,
            FilterSlot::Graph => &self.graph,
            FilterSlot::Node => &self.node,
            FilterSlot::Edge => &self.edge,
        }
    }

    fn slot_mut(&mut self, slot: FilterSlot) -> &mut PredicateSlot {
        match slot {
            FilterSlot::Global => &mut self.global,
            FilterSlot::Graph => &mut self.graph,
            FilterSlot::Node => &mut self.node,
            FilterSlot::Edge => &mut self.edge,
        }
    }

    /// True when neither the kind-specific nor the global predicate vetoes
    fn admits(
        &self,
        kind: ElementKind,
        attribute: &str,
        value: Option<&AttributeValue>,
    ) -> StreamResult<bool> {
        if self.slot(kind.into()).matches(attribute, value)? {
            trace!(?kind, attribute, "attribute event dropped by kind filter");
            return Ok(false);
        }
        if self.global.matches(attribute, value)? {
            trace!(?kind, attribute, "attribute event dropped by global filter");
            return Ok(false);
        }
        Ok(true)
    }
}

impl AttributeObserver for AttributeFilter {
    fn graph_attribute_added(
        &mut self,
        graph_id: &str,
        attribute: &str,
        value: &AttributeValue,
    ) -> StreamResult<()> {
        if self.admits(ElementKind::Graph, attribute, Some(value))? {
            self.sinks
                .dispatch(|sink| sink.graph_attribute_added(graph_id, attribute, value))?;
        }
        Ok(())
    }

    fn graph_attribute_changed(
        &mut self,
        graph_id: &str,
        attribute: &str,
        old_value: &AttributeValue,
        new_value: &AttributeValue,
    ) -> StreamResult<()> {
        if self.admits(ElementKind::Graph, attribute, Some(new_value))? {
            self.sinks.dispatch(|sink| {
                sink.graph_attribute_changed(graph_id, attribute, old_value, new_value)
            })?;
        }
        Ok(())
    }

    fn graph_attribute_removed(&mut self, graph_id: &str, attribute: &str) -> StreamResult<()> {
        if self.admits(ElementKind::Graph, attribute, None)? {
            self.sinks
                .dispatch(|sink| sink.graph_attribute_removed(graph_id, attribute))?;
        }
        Ok(())
    }

    fn node_attribute_added(
        &mut self,
        graph_id: &str,
        node_id: &str,
        attribute: &str,
        value: &AttributeValue,
    ) -> StreamResult<()> {
        if self.admits(ElementKind::Node, attribute, Some(value))? {
            self.sinks
                .dispatch(|sink| sink.node_attribute_added(graph_id, node_id, attribute, value))?;
        }
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
        if self.admits(ElementKind::Node, attribute, Some(new_value))? {
            self.sinks.dispatch(|sink| {
                sink.node_attribute_changed(graph_id, node_id, attribute, old_value, new_value)
            })?;
        }
        Ok(())
    }

    fn node_attribute_removed(
        &mut self,
        graph_id: &str,
        node_id: &str,
        attribute: &str,
    ) -> StreamResult<()> {
        if self.admits(ElementKind::Node, attribute, None)? {
            self.sinks
                .dispatch(|sink| sink.node_attribute_removed(graph_id, node_id, attribute))?;
        }
        Ok(())
    }

    fn edge_attribute_added(
        &mut self,
        graph_id: &str,
        edge_id: &str,
        attribute: &str,
        value: &AttributeValue,
    ) -> StreamResult<()> {
        if self.admits(ElementKind::Edge, attribute, Some(value))? {
            self.sinks
                .dispatch(|sink| sink.edge_attribute_added(graph_id, edge_id, attribute, value))?;
        }
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
        if self.admits(ElementKind::Edge, attribute, Some(new_value))? {
            self.sinks.dispatch(|sink| {
                sink.edge_attribute_changed(graph_id, edge_id, attribute, old_value, new_value)
            })?;
        }
        Ok(())
    }

    fn edge_attribute_removed(
        &mut self,
        graph_id: &str,
        edge_id: &str,
        attribute: &str,
    ) -> StreamResult<()> {
        if self.admits(ElementKind::Edge, attribute, None)? {
            self.sinks
                .dispatch(|sink| sink.edge_attribute_removed(graph_id, edge_id, attribute))?;
        }
        Ok(())
    }
}
