//! Element storage and attribute change notification
//!
//! Every attribute write on the graph, a node or an edge goes through here
//! so that registered observers see it.

use super::attributes::{AttributeChange, Attributes};
use super::edge::{EdgeId, GraphicEdge};
use super::engine::{GraphError, GraphId, GraphResult};
use super::node::{GraphicNode, NodeId};
use super::value::AttributeValue;
use crate::stream::{AttributeEvent, ObserverList};

/// The element an attribute write targets
#[derive(Debug, Clone, Copy)]
enum Element<'a> {
    Graph,
    Node(&'a NodeId),
    Edge(&'a EdgeId),
}

/// Nodes, edges, attributes, observers and the redraw flag of one graph
#[derive(Debug)]
pub(crate) struct GraphStore {
    id: GraphId,
    attributes: Attributes,
    nodes: Vec<GraphicNode>,
    edges: Vec<GraphicEdge>,
    observers: ObserverList,
    dirty: bool,
}

impl GraphStore {
    pub(crate) fn new(id: GraphId) -> Self {
        Self {
            id,
            attributes: Attributes::new(),
            nodes: Vec::new(),
            edges: Vec::new(),
            observers: ObserverList::new(),
            dirty: false,
        }
    }

    pub(crate) fn id(&self) -> &GraphId {
        &self.id
    }

    pub(crate) fn observers(&self) -> &ObserverList {
        &self.observers
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub(crate) fn consume_dirty(&mut self) -> bool {
        std::mem::replace(&mut self.dirty, false)
    }

    /// Deliver an event to every registered observer
    pub(crate) fn emit(&self, event: &AttributeEvent) -> GraphResult<()> {
        self.observers.dispatch(|observer| event.deliver(observer))?;
        Ok(())
    }

    // Graph attributes

    pub(crate) fn attribute(&self, key: &str) -> Option<&AttributeValue> {
        self.attributes.get(key)
    }

    pub(crate) fn add_attribute(&mut self, key: &str, value: AttributeValue) -> GraphResult<()> {
        let change = self.attributes.put(key, value.clone());
        self.announce_put(Element::Graph, key, change, value, true)
            .map(|_| ())
    }

    pub(crate) fn set_attribute(&mut self, key: &str, value: AttributeValue) -> GraphResult<bool> {
        let change = self.attributes.put(key, value.clone());
        self.announce_put(Element::Graph, key, change, value, false)
    }

    pub(crate) fn remove_attribute(&mut self, key: &str) -> GraphResult<Option<AttributeValue>> {
        let old = self.attributes.remove(key);
        self.announce_remove(Element::Graph, key, old)
    }

    // Nodes

    pub(crate) fn nodes(&self) -> impl Iterator<Item = &GraphicNode> {
        self.nodes.iter()
    }

    pub(crate) fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub(crate) fn node(&self, id: &NodeId) -> Option<&GraphicNode> {
        self.nodes.iter().find(|n| &n.id == id)
    }

    pub(crate) fn node_mut(&mut self, id: &NodeId) -> Option<&mut GraphicNode> {
        self.nodes.iter_mut().find(|n| &n.id == id)
    }

    /// Insert a node. A node with the same id is moved instead; its
    /// attributes stay.
    pub(crate) fn insert_node(&mut self, node: GraphicNode) {
        match self.node_mut(&node.id) {
            Some(existing) => {
                existing.x = node.x;
                existing.y = node.y;
                existing.z = node.z;
            }
            None => self.nodes.push(node),
        }
    }

    pub(crate) fn take_node(&mut self, id: &NodeId) -> Option<GraphicNode> {
        let index = self.nodes.iter().position(|n| &n.id == id)?;
        Some(self.nodes.remove(index))
    }

    pub(crate) fn add_node_attribute(
        &mut self,
        id: &NodeId,
        key: &str,
        value: AttributeValue,
    ) -> GraphResult<()> {
        let node = self
            .node_mut(id)
            .ok_or_else(|| GraphError::NodeNotFound(id.clone()))?;
        let change = node.attributes.put(key, value.clone());
        self.announce_put(Element::Node(id), key, change, value, true)
            .map(|_| ())
    }

    pub(crate) fn set_node_attribute(
        &mut self,
        id: &NodeId,
        key: &str,
        value: AttributeValue,
    ) -> GraphResult<bool> {
        let node = self
            .node_mut(id)
            .ok_or_else(|| GraphError::NodeNotFound(id.clone()))?;
        let change = node.attributes.put(key, value.clone());
        self.announce_put(Element::Node(id), key, change, value, false)
    }

    pub(crate) fn remove_node_attribute(
        &mut self,
        id: &NodeId,
        key: &str,
    ) -> GraphResult<Option<AttributeValue>> {
        let node = self
            .node_mut(id)
            .ok_or_else(|| GraphError::NodeNotFound(id.clone()))?;
        let old = node.attributes.remove(key);
        self.announce_remove(Element::Node(id), key, old)
    }

    // Edges

    pub(crate) fn edges(&self) -> impl Iterator<Item = &GraphicEdge> {
        self.edges.iter()
    }

    pub(crate) fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub(crate) fn edge(&self, id: &EdgeId) -> Option<&GraphicEdge> {
        self.edges.iter().find(|e| &e.id == id)
    }

    fn edge_mut(&mut self, id: &EdgeId) -> Option<&mut GraphicEdge> {
        self.edges.iter_mut().find(|e| &e.id == id)
    }

    /// Insert an edge, replacing one with the same id in place.
    /// Both endpoints must already exist.
    pub(crate) fn insert_edge(&mut self, edge: GraphicEdge) -> GraphResult<()> {
        for endpoint in [&edge.source, &edge.target] {
            if self.node(endpoint).is_none() {
                return Err(GraphError::NodeNotFound(endpoint.clone()));
            }
        }
        // an existing edge is rewired and keeps its attributes
        match self.edge_mut(&edge.id) {
            Some(existing) => {
                existing.source = edge.source;
                existing.target = edge.target;
            }
            None => self.edges.push(edge),
        }
        Ok(())
    }

    pub(crate) fn take_edge(&mut self, id: &EdgeId) -> Option<GraphicEdge> {
        let index = self.edges.iter().position(|e| &e.id == id)?;
        Some(self.edges.remove(index))
    }

    pub(crate) fn add_edge_attribute(
        &mut self,
        id: &EdgeId,
        key: &str,
        value: AttributeValue,
    ) -> GraphResult<()> {
        let edge = self
            .edge_mut(id)
            .ok_or_else(|| GraphError::EdgeNotFound(id.clone()))?;
        let change = edge.attributes.put(key, value.clone());
        self.announce_put(Element::Edge(id), key, change, value, true)
            .map(|_| ())
    }

    pub(crate) fn set_edge_attribute(
        &mut self,
        id: &EdgeId,
        key: &str,
        value: AttributeValue,
    ) -> GraphResult<bool> {
        let edge = self
            .edge_mut(id)
            .ok_or_else(|| GraphError::EdgeNotFound(id.clone()))?;
        let change = edge.attributes.put(key, value.clone());
        self.announce_put(Element::Edge(id), key, change, value, false)
    }

    pub(crate) fn remove_edge_attribute(
        &mut self,
        id: &EdgeId,
        key: &str,
    ) -> GraphResult<Option<AttributeValue>> {
        let edge = self
            .edge_mut(id)
            .ok_or_else(|| GraphError::EdgeNotFound(id.clone()))?;
        let old = edge.attributes.remove(key);
        self.announce_remove(Element::Edge(id), key, old)
    }

    // Notification

    /// Notify observers of a write. An unchanged value is announced as a
    /// change only when `always` is set. Returns whether the stored value
    /// changed.
    fn announce_put(
        &self,
        element: Element<'_>,
        key: &str,
        change: AttributeChange,
        value: AttributeValue,
        always: bool,
    ) -> GraphResult<bool> {
        let graph_id = self.id.to_string();
        let attribute = key.to_string();
        let (event, changed) = match (change, element) {
            (AttributeChange::Added, Element::Graph) => (
                AttributeEvent::GraphAttributeAdded { graph_id, attribute, value },
                true,
            ),
            (AttributeChange::Added, Element::Node(node)) => (
                AttributeEvent::NodeAttributeAdded {
                    graph_id,
                    node_id: node.to_string(),
                    attribute,
                    value,
                },
                true,
            ),
            (AttributeChange::Added, Element::Edge(edge)) => (
                AttributeEvent::EdgeAttributeAdded {
                    graph_id,
                    edge_id: edge.to_string(),
                    attribute,
                    value,
                },
                true,
            ),
            (AttributeChange::Unchanged, _) if !always => return Ok(false),
            (change, element) => {
                let changed = !matches!(change, AttributeChange::Unchanged);
                let old_value = match change {
                    AttributeChange::Changed(old) => old,
                    _ => value.clone(),
                };
                let event = match element {
                    Element::Graph => AttributeEvent::GraphAttributeChanged {
                        graph_id,
                        attribute,
                        old_value,
                        new_value: value,
                    },
                    Element::Node(node) => AttributeEvent::NodeAttributeChanged {
                        graph_id,
                        node_id: node.to_string(),
                        attribute,
                        old_value,
                        new_value: value,
                    },
                    Element::Edge(edge) => AttributeEvent::EdgeAttributeChanged {
                        graph_id,
                        edge_id: edge.to_string(),
                        attribute,
                        old_value,
                        new_value: value,
                    },
                };
                (event, changed)
            }
        };
        self.emit(&event)?;
        Ok(changed)
    }

    fn announce_remove(
        &self,
        element: Element<'_>,
        key: &str,
        old: Option<AttributeValue>,
    ) -> GraphResult<Option<AttributeValue>> {
        if old.is_none() {
            return Ok(None);
        }
        let graph_id = self.id.to_string();
        let attribute = key.to_string();
        let event = match element {
            Element::Graph => AttributeEvent::GraphAttributeRemoved { graph_id, attribute },
            Element::Node(node) => AttributeEvent::NodeAttributeRemoved {
                graph_id,
                node_id: node.to_string(),
                attribute,
            },
            Element::Edge(edge) => AttributeEvent::EdgeAttributeRemoved {
                graph_id,
                edge_id: edge.to_string(),
                attribute,
            },
        };
        self.emit(&event)?;
        Ok(old)
    }
}
