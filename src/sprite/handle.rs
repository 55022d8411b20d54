//! SpriteMut: mutable access to a sprite and the graph it mirrors into

use super::attachment::Attachment;
use super::element::GraphicSprite;
use super::mirror::{self, POSITION_ATTRIBUTE};
use super::position;
use crate::graph::{
    AttributeChange, AttributeValue, EdgeId, GraphError, GraphResult, GraphStore, NodeId,
    PositionValue, Units,
};
use crate::stream::AttributeEvent;
use std::ops::Deref;
use tracing::{debug, trace, warn};

/// A sprite borrowed mutably together with its graph.
///
/// Obtained from [`GraphicGraph::add_sprite`](crate::GraphicGraph::add_sprite)
/// or [`GraphicGraph::sprite_mut`](crate::GraphicGraph::sprite_mut). Reads go
/// through `Deref` to [`GraphicSprite`].
#[derive(Debug)]
pub struct SpriteMut<'g> {
    sprite: &'g mut GraphicSprite,
    graph: &'g mut GraphStore,
}

impl<'g> SpriteMut<'g> {
    pub(crate) fn new(sprite: &'g mut GraphicSprite, graph: &'g mut GraphStore) -> Self {
        Self { sprite, graph }
    }

    // Attachment

    /// Attach to `node`, leaving any previous host
    pub fn attach_to_node(&mut self, node: &NodeId) -> GraphResult<()> {
        if self.graph.node(node).is_none() {
            return Err(GraphError::NodeNotFound(node.clone()));
        }
        self.attach(Attachment::Node(node.clone()))
    }

    /// Attach to `edge`, leaving any previous host
    pub fn attach_to_edge(&mut self, edge: &EdgeId) -> GraphResult<()> {
        if self.graph.edge(edge).is_none() {
            return Err(GraphError::EdgeNotFound(edge.clone()));
        }
        self.attach(Attachment::Edge(edge.clone()))
    }

    /// Leave the current host. Does nothing if the sprite is not attached.
    pub fn detach(&mut self) -> GraphResult<()> {
        if !self.sprite.attachment.is_attached() {
            return Ok(());
        }
        let previous = std::mem::take(&mut self.sprite.attachment);
        self.graph.mark_dirty();
        debug!(sprite = %self.sprite.id, host = %previous, "sprite detached");
        self.release(&previous)
    }

    fn attach(&mut self, host: Attachment) -> GraphResult<()> {
        let previous = std::mem::replace(&mut self.sprite.attachment, host);
        self.graph.mark_dirty();
        if previous != self.sprite.attachment {
            self.release(&previous)?;
        }

        let key = mirror::position_key(&self.sprite.id);
        match &self.sprite.attachment {
            Attachment::Node(node) => {
                if self.graph.node(node).is_some_and(|n| !n.has_attribute(&key)) {
                    self.graph
                        .add_node_attribute(node, &key, AttributeValue::presence())?;
                }
            }
            Attachment::Edge(edge) => {
                if self.graph.edge(edge).is_some_and(|e| !e.has_attribute(&key)) {
                    self.graph
                        .add_edge_attribute(edge, &key, AttributeValue::presence())?;
                }
            }
            Attachment::None => {}
        }
        debug!(sprite = %self.sprite.id, host = %self.sprite.attachment, "sprite attached");
        Ok(())
    }

    /// Remove the presence attribute from a former host, if it still exists
    fn release(&mut self, host: &Attachment) -> GraphResult<()> {
        let key = mirror::position_key(&self.sprite.id);
        match host {
            Attachment::Node(node) if self.graph.node(node).is_some() => {
                self.graph.remove_node_attribute(node, &key)?;
            }
            Attachment::Edge(edge) if self.graph.edge(edge).is_some() => {
                self.graph.remove_edge_attribute(edge, &key)?;
            }
            _ => {}
        }
        Ok(())
    }

    // Position

    /// Reposition the sprite.
    ///
    /// Node-attached sprites get `y` and `z` wrapped into `[0, 2pi)`;
    /// edge-attached sprites get `x` clamped into `[0, 1]`. When the result
    /// differs from the current position, the graph is marked dirty and the
    /// `ui.sprite.<id>` mirror is rewritten. Returns whether it changed.
    /// NaN and infinite components are rejected.
    pub fn set_position(&mut self, x: f64, y: f64, z: f64, units: Units) -> GraphResult<bool> {
        if !(x.is_finite() && y.is_finite() && z.is_finite()) {
            warn!(sprite = %self.sprite.id, x, y, z, "rejecting non-finite sprite position");
            return Err(GraphError::InvalidPosition(format!(
                "sprite {}: components must be finite, got ({}, {}, {})",
                self.sprite.id, x, y, z
            )));
        }
        let (x, y, z) = position::normalize(&self.sprite.attachment, x, y, z);
        let current = &self.sprite.position;
        let changed = current.x() != x
            || current.y() != y
            || current.z() != z
            || current.units() != units;
        if !changed {
            return Ok(false);
        }

        self.sprite.position = PositionValue::new(units, x, y, z);
        self.graph.mark_dirty();
        trace!(sprite = %self.sprite.id, position = %self.sprite.position, "sprite moved");
        self.graph.set_attribute(
            &mirror::position_key(&self.sprite.id),
            self.sprite.position.clone().into(),
        )?;
        Ok(true)
    }

    /// Reposition from a position tuple; missing components are zero.
    ///
    /// A tuple of exactly `(1, 1, 1)` is rejected before anything changes.
    /// Some producers emit it for a malformed position, so it is refused for
    /// compatibility with them rather than as a rule about sprites.
    pub fn set_position_values(&mut self, values: &PositionValue) -> GraphResult<bool> {
        let (x, y, z) = values.xyz();
        if x == 1.0 && y == 1.0 && z == 1.0 {
            warn!(sprite = %self.sprite.id, "rejecting all-ones sprite position");
            return Err(GraphError::InvalidPosition(format!(
                "sprite {}: refusing all-ones position {}",
                self.sprite.id, values
            )));
        }
        self.set_position(x, y, z, values.units())
    }

    /// Set only the first component, keeping the current units
    pub fn set_offset(&mut self, value: f64) -> GraphResult<bool> {
        let units = self.sprite.position.units();
        self.set_position(value, 0.0, 0.0, units)
    }

    /// Reposition in graph units
    pub fn move_to(&mut self, x: f64, y: f64, z: f64) -> GraphResult<bool> {
        self.set_position(x, y, z, Units::GraphUnits)
    }

    /// Store the renderer-computed box. Depth bounds are left untouched.
    pub fn set_bounds(&mut self, x: f64, y: f64, width: f64, height: f64) {
        let bounds = &mut self.sprite.bounds;
        bounds.x = x;
        bounds.y = y;
        bounds.width = width;
        bounds.height = height;
    }

    // Attributes

    /// Store an attribute on the sprite and announce it to graph observers,
    /// as added or, if the key exists, as changed.
    pub fn add_attribute(&mut self, key: &str, value: impl Into<AttributeValue>) -> GraphResult<()> {
        let value = value.into();
        if key == POSITION_ATTRIBUTE {
            return self.set_reserved_position(&value).map(|_| ());
        }
        match self.sprite.attributes.put(key, value.clone()) {
            AttributeChange::Added => self.echo_added(key, &value),
            AttributeChange::Changed(old) => self.echo_changed(key, &old, &value),
            AttributeChange::Unchanged => self.echo_changed(key, &value, &value),
        }
    }

    /// Store an attribute on the sprite, announcing it only if it changed.
    /// Returns whether it changed.
    pub fn set_attribute(&mut self, key: &str, value: impl Into<AttributeValue>) -> GraphResult<bool> {
        let value = value.into();
        if key == POSITION_ATTRIBUTE {
            return self.set_reserved_position(&value);
        }
        match self.sprite.attributes.put(key, value.clone()) {
            AttributeChange::Added => self.echo_added(key, &value)?,
            AttributeChange::Changed(old) => self.echo_changed(key, &old, &value)?,
            AttributeChange::Unchanged => return Ok(false),
        }
        Ok(true)
    }

    /// Remove an attribute from the sprite. The removal is always announced.
    pub fn remove_attribute(&mut self, key: &str) -> GraphResult<Option<AttributeValue>> {
        if key == POSITION_ATTRIBUTE {
            return Ok(None);
        }
        let old = self.sprite.attributes.remove(key);
        if old.is_some() {
            self.graph.emit(&AttributeEvent::GraphAttributeRemoved {
                graph_id: self.graph.id().to_string(),
                attribute: mirror::attribute_key(&self.sprite.id, key),
            })?;
        }
        Ok(old)
    }

    fn set_reserved_position(&mut self, value: &AttributeValue) -> GraphResult<bool> {
        match value.as_position() {
            Some(position) => self.set_position_values(position),
            None => Err(GraphError::InvalidPosition(format!(
                "sprite {}: '{}' expects a position value",
                self.sprite.id, POSITION_ATTRIBUTE
            ))),
        }
    }

    fn echo_added(&self, key: &str, value: &AttributeValue) -> GraphResult<()> {
        let attribute = mirror::attribute_key(&self.sprite.id, key);
        if !mirror::needs_echo(self.graph.attribute(&attribute), value) {
            trace!(%attribute, "sprite attribute already mirrored");
            return Ok(());
        }
        self.graph.emit(&AttributeEvent::GraphAttributeAdded {
            graph_id: self.graph.id().to_string(),
            attribute,
            value: value.clone(),
        })
    }

    fn echo_changed(
        &self,
        key: &str,
        old_value: &AttributeValue,
        new_value: &AttributeValue,
    ) -> GraphResult<()> {
        let attribute = mirror::attribute_key(&self.sprite.id, key);
        if !mirror::needs_echo(self.graph.attribute(&attribute), new_value) {
            trace!(%attribute, "sprite attribute already mirrored");
            return Ok(());
        }
        self.graph.emit(&AttributeEvent::GraphAttributeChanged {
            graph_id: self.graph.id().to_string(),
            attribute,
            old_value: old_value.clone(),
            new_value: new_value.clone(),
        })
    }
}

impl Deref for SpriteMut<'_> {
    type Target = GraphicSprite;

    fn deref(&self) -> &GraphicSprite {
        self.sprite
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{GraphicEdge, GraphicGraph, GraphicNode};
    use crate::sprite::SpriteId;
    use crate::stream::{shared, AttributeObserver, EventRecorder, StreamError, StreamResult};
    use std::cell::RefCell;
    use std::f64::consts::PI;
    use std::rc::Rc;

    fn graph_with_host() -> (GraphicGraph, Rc<RefCell<EventRecorder>>) {
        let mut graph = GraphicGraph::with_id("g");
        graph.add_node(GraphicNode::new("a").at(2.0, 3.0, 0.0));
        graph.add_node(GraphicNode::new("b").at(5.0, 3.0, 0.0));
        graph.add_edge(GraphicEdge::new("ab", "a", "b")).unwrap();
        let recorder = shared(EventRecorder::new());
        graph.add_observer(recorder.clone());
        (graph, recorder)
    }

    #[test]
    fn node_attachment_wraps_angles() {
        let (mut graph, _) = graph_with_host();
        let mut sprite = graph.add_sprite("s").unwrap();
        sprite.attach_to_node(&NodeId::from("a")).unwrap();

        sprite.set_position(1.0, 3.0 * PI, -PI / 2.0, Units::GraphUnits).unwrap();
        assert!((sprite.y() - PI).abs() < 1e-9);
        assert!((sprite.z() - 3.0 * PI / 2.0).abs() < 1e-9);
        assert_eq!(sprite.x(), 1.0);
    }

    #[test]
    fn non_finite_position_rejected() {
        let (mut graph, recorder) = graph_with_host();
        graph.add_sprite("s").unwrap();
        graph.consume_dirty();
        recorder.borrow_mut().take();

        let mut sprite = graph.sprite_mut(&SpriteId::from("s")).unwrap();
        for _ in 0..2 {
            let err = sprite.move_to(f64::NAN, 0.0, 0.0).unwrap_err();
            assert!(matches!(err, GraphError::InvalidPosition(_)));
        }
        let err = sprite
            .set_position(0.0, f64::INFINITY, 0.0, Units::Pixels)
            .unwrap_err();
        assert!(matches!(err, GraphError::InvalidPosition(_)));
        assert_eq!(sprite.position().xyz(), (2.0, 3.0, 0.0));

        assert!(!graph.is_dirty());
        assert!(recorder.borrow().is_empty());
    }

    #[test]
    fn edge_attachment_clamps_offset() {
        let (mut graph, _) = graph_with_host();
        let mut sprite = graph.add_sprite("s").unwrap();
        sprite.attach_to_edge(&EdgeId::from("ab")).unwrap();

        sprite.set_position(1.5, 0.0, 0.0, Units::GraphUnits).unwrap();
        assert_eq!(sprite.x(), 1.0);
        sprite.set_position(-0.3, 0.0, 0.0, Units::GraphUnits).unwrap();
        assert_eq!(sprite.x(), 0.0);
    }

    #[test]
    fn unchanged_position_is_quiet() {
        let (mut graph, recorder) = graph_with_host();
        graph.add_sprite("s").unwrap().move_to(4.0, 0.0, 0.0).unwrap();
        graph.consume_dirty();
        recorder.borrow_mut().take();

        let changed = graph
            .sprite_mut(&SpriteId::from("s"))
            .unwrap()
            .move_to(4.0, 0.0, 0.0)
            .unwrap();

        assert!(!changed);
        assert!(!graph.is_dirty());
        assert!(recorder.borrow().is_empty());
    }

    #[test]
    fn units_change_alone_counts() {
        let (mut graph, recorder) = graph_with_host();
        let mut sprite = graph.add_sprite("s").unwrap();
        recorder.borrow_mut().take();

        assert!(sprite.set_position(2.0, 3.0, 0.0, Units::Pixels).unwrap());
        assert_eq!(sprite.units(), Units::Pixels);
        assert_eq!(recorder.borrow().len(), 1);
    }

    #[test]
    fn all_ones_tuple_rejected_without_mutation() {
        // compatibility guard for a malformed producer pattern
        let (mut graph, recorder) = graph_with_host();
        let mut sprite = graph.add_sprite("s").unwrap();
        recorder.borrow_mut().take();
        let before = sprite.position().clone();

        let ones = PositionValue::new(Units::GraphUnits, 1.0, 1.0, 1.0);
        let err = sprite.set_position_values(&ones).unwrap_err();
        assert!(matches!(err, GraphError::InvalidPosition(_)));
        assert_eq!(sprite.position(), &before);
        assert!(recorder.borrow().is_empty());

        // a partial tuple reads as (1, 1, 0) and is accepted
        let partial = PositionValue::from_components(Units::GraphUnits, vec![1.0, 1.0]).unwrap();
        assert!(sprite.set_position_values(&partial).unwrap());
        assert_eq!(sprite.position().xyz(), (1.0, 1.0, 0.0));
    }

    #[test]
    fn set_offset_keeps_units() {
        let (mut graph, _) = graph_with_host();
        let mut sprite = graph.add_sprite("s").unwrap();
        sprite.set_position(0.0, 0.0, 0.0, Units::Percents).unwrap();
        sprite.set_offset(0.5).unwrap();
        assert_eq!(sprite.position(), &PositionValue::new(Units::Percents, 0.5, 0.0, 0.0));
    }

    #[test]
    fn bounds_keep_depth() {
        let (mut graph, _) = graph_with_host();
        let mut sprite = graph.add_sprite("s").unwrap();
        sprite.sprite.bounds.z = 7.0;
        sprite.sprite.bounds.depth = 3.0;

        sprite.set_bounds(1.0, 2.0, 10.0, 20.0);
        let bounds = *sprite.bounds();
        assert_eq!((bounds.x, bounds.y, bounds.width, bounds.height), (1.0, 2.0, 10.0, 20.0));
        assert_eq!((bounds.z, bounds.depth), (7.0, 3.0));
        assert!(sprite.contains(5.0, 5.0, 0.0));
    }

    #[test]
    fn reattaching_to_same_node_keeps_presence() {
        let (mut graph, recorder) = graph_with_host();
        let a = NodeId::from("a");
        let mut sprite = graph.add_sprite("s").unwrap();
        sprite.attach_to_node(&a).unwrap();
        recorder.borrow_mut().take();

        sprite.attach_to_node(&a).unwrap();
        assert!(recorder.borrow().is_empty());
        assert!(graph.node_attribute(&a, "ui.sprite.s").is_some());
    }

    #[test]
    fn attach_to_missing_host_fails() {
        let (mut graph, _) = graph_with_host();
        let mut sprite = graph.add_sprite("s").unwrap();
        let err = sprite.attach_to_node(&NodeId::from("zz")).unwrap_err();
        assert!(matches!(err, GraphError::NodeNotFound(_)));
        let err = sprite.attach_to_edge(&EdgeId::from("zz")).unwrap_err();
        assert!(matches!(err, GraphError::EdgeNotFound(_)));
        assert!(!sprite.attachment().is_attached());
    }

    #[test]
    fn detach_when_detached_is_noop() {
        let (mut graph, _) = graph_with_host();
        graph.add_sprite("s").unwrap();
        graph.consume_dirty();

        graph.sprite_mut(&SpriteId::from("s")).unwrap().detach().unwrap();
        assert!(!graph.is_dirty());
    }

    #[test]
    fn reserved_position_attribute_routes_to_set_position() {
        let (mut graph, recorder) = graph_with_host();
        let mut sprite = graph.add_sprite("s").unwrap();
        recorder.borrow_mut().take();

        let target = PositionValue::new(Units::Pixels, 10.0, 20.0, 0.0);
        assert!(sprite.set_attribute(POSITION_ATTRIBUTE, target.clone()).unwrap());
        assert_eq!(sprite.position(), &target);
        assert!(sprite.attribute(POSITION_ATTRIBUTE).is_none());

        let err = sprite.set_attribute(POSITION_ATTRIBUTE, "left").unwrap_err();
        assert!(matches!(err, GraphError::InvalidPosition(_)));

        // only the ui.sprite.s mirror change was announced
        let events = recorder.borrow();
        assert_eq!(events.len(), 1);
        assert_eq!(events.events()[0].attribute(), "ui.sprite.s");
    }

    struct RejectNodeAttributes;

    impl AttributeObserver for RejectNodeAttributes {
        fn node_attribute_added(
            &mut self,
            _graph_id: &str,
            _node_id: &str,
            _attribute: &str,
            _value: &AttributeValue,
        ) -> StreamResult<()> {
            Err(StreamError::Observer("node attributes are read-only".into()))
        }
    }

    #[test]
    fn failed_presence_announcement_still_marks_dirty() {
        let (mut graph, _) = graph_with_host();
        graph.add_observer(shared(RejectNodeAttributes));
        let a = NodeId::from("a");
        graph.add_sprite("s").unwrap();
        graph.consume_dirty();

        let mut sprite = graph.sprite_mut(&SpriteId::from("s")).unwrap();
        let err = sprite.attach_to_node(&a).unwrap_err();
        assert!(matches!(err, GraphError::Stream(_)));
        assert!(sprite.attachment().is_on_node(&a));

        assert!(graph.is_dirty());
        assert!(graph.node_attribute(&a, "ui.sprite.s").is_some());
    }
}
