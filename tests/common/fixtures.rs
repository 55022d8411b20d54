//! Graph fixtures and a recording observer handle

#![allow(dead_code)]

use spritegraph::stream::shared;
use spritegraph::{EventRecorder, GraphicEdge, GraphicGraph, GraphicNode};
use std::cell::RefCell;
use std::rc::Rc;

/// Graph `g` with nodes `a (2,3,0)` and `b (5,3,0)` joined by edge `ab`
pub fn two_node_graph() -> GraphicGraph {
    let mut graph = GraphicGraph::with_id("g");
    graph.add_node(GraphicNode::new("a").at(2.0, 3.0, 0.0));
    graph.add_node(GraphicNode::new("b").at(5.0, 3.0, 0.0));
    graph
        .add_edge(GraphicEdge::new("ab", "a", "b"))
        .expect("fixture edge endpoints exist");
    graph.consume_dirty();
    graph
}

/// Register a fresh recorder on `graph`
pub fn observe(graph: &GraphicGraph) -> Rc<RefCell<EventRecorder>> {
    let recorder = shared(EventRecorder::new());
    graph.add_observer(recorder.clone());
    recorder
}

/// Drain a recorder, keeping only attribute names
pub fn attributes_seen(recorder: &Rc<RefCell<EventRecorder>>) -> Vec<String> {
    recorder
        .borrow_mut()
        .take()
        .iter()
        .map(|e| e.attribute().to_string())
        .collect()
}
