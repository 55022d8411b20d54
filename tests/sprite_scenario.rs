//! Sprite behavior seen from outside the crate: mirrors, attachment
//! exclusivity and echo suppression on the graph's observers.

mod common;

use common::{attributes_seen, observe, two_node_graph};
use spritegraph::{
    AttributeEvent, AttributeValue, EdgeId, GraphicGraph, GraphicNode, NodeId, PositionValue,
    SpriteId, Units,
};

fn mirror_of(graph: &GraphicGraph, key: &str) -> Option<PositionValue> {
    graph.attribute(key).and_then(|v| v.as_position()).cloned()
}

#[test]
fn s1_follows_its_node_and_leaves_cleanly() {
    let mut graph = GraphicGraph::with_id("g");
    let node = graph.add_node(GraphicNode::new("n").at(2.0, 3.0, 0.0));
    let recorder = observe(&graph);
    let s1 = SpriteId::from("s1");

    let mut sprite = graph.add_sprite(s1.clone()).unwrap();
    assert_eq!(sprite.position().xyz(), (2.0, 3.0, 0.0));

    sprite.attach_to_node(&node).unwrap();
    assert!(sprite.move_to(4.0, 0.0, 0.0).unwrap());
    assert_eq!(sprite.position().xyz(), (4.0, 0.0, 0.0));

    assert_eq!(
        mirror_of(&graph, "ui.sprite.s1"),
        Some(PositionValue::new(Units::GraphUnits, 4.0, 0.0, 0.0))
    );
    assert_eq!(
        graph.node_attribute(&node, "ui.sprite.s1"),
        Some(&AttributeValue::presence())
    );

    graph.sprite_mut(&s1).unwrap().detach().unwrap();
    assert!(graph.node_attribute(&node, "ui.sprite.s1").is_none());
    assert!(!graph.sprite(&s1).unwrap().attachment().is_attached());

    assert_eq!(
        attributes_seen(&recorder),
        vec![
            "ui.sprite.s1", // mirror created
            "ui.sprite.s1", // presence on the node
            "ui.sprite.s1", // mirror moved
            "ui.sprite.s1", // presence removed
        ]
    );
}

#[test]
fn attaching_to_an_edge_releases_the_node() {
    let mut graph = two_node_graph();
    let recorder = observe(&graph);
    let a = NodeId::from("a");
    let ab = EdgeId::from("ab");

    let mut sprite = graph.add_sprite("s").unwrap();
    sprite.attach_to_node(&a).unwrap();
    recorder.borrow_mut().take();

    sprite.attach_to_edge(&ab).unwrap();
    assert_eq!(sprite.node_attachment(), None);
    assert_eq!(sprite.edge_attachment(), Some(&ab));

    let events = recorder.borrow_mut().take();
    assert_eq!(
        events,
        vec![
            AttributeEvent::NodeAttributeRemoved {
                graph_id: "g".into(),
                node_id: "a".into(),
                attribute: "ui.sprite.s".into(),
            },
            AttributeEvent::EdgeAttributeAdded {
                graph_id: "g".into(),
                edge_id: "ab".into(),
                attribute: "ui.sprite.s".into(),
                value: AttributeValue::presence(),
            },
        ]
    );
    assert!(graph.node_attribute(&a, "ui.sprite.s").is_none());
    assert!(graph.edge_attribute(&ab, "ui.sprite.s").is_some());
    assert!(graph.is_dirty());
}

#[test]
fn host_with_existing_presence_is_not_rewritten() {
    let mut graph = two_node_graph();
    let a = NodeId::from("a");
    graph
        .add_node_attribute(&a, "ui.sprite.s", AttributeValue::presence())
        .unwrap();
    let recorder = observe(&graph);

    let mut sprite = graph.add_sprite("s").unwrap();
    sprite.attach_to_node(&a).unwrap();

    assert_eq!(attributes_seen(&recorder), vec!["ui.sprite.s"]);
    assert!(graph.sprite(&SpriteId::from("s")).unwrap().attachment().is_on_node(&a));
}

#[test]
fn position_normalization_depends_on_host() {
    use std::f64::consts::PI;

    let mut graph = two_node_graph();
    let mut sprite = graph.add_sprite("s").unwrap();

    // detached: nothing is normalized
    sprite.set_position(-2.0, 9.0, -1.0, Units::Pixels).unwrap();
    assert_eq!(sprite.position().xyz(), (-2.0, 9.0, -1.0));

    sprite.attach_to_node(&NodeId::from("a")).unwrap();
    sprite.set_position(0.0, 3.0 * PI, -PI / 2.0, Units::GraphUnits).unwrap();
    let (_, y, z) = sprite.position().xyz();
    assert!((y - PI).abs() < 1e-9);
    assert!((z - 3.0 * PI / 2.0).abs() < 1e-9);

    sprite.attach_to_edge(&EdgeId::from("ab")).unwrap();
    sprite.set_position(1.5, 0.0, 0.0, Units::GraphUnits).unwrap();
    assert_eq!(sprite.x(), 1.0);
    sprite.set_position(-0.3, 0.0, 0.0, Units::GraphUnits).unwrap();
    assert_eq!(sprite.x(), 0.0);
}

#[test]
fn unchanged_position_leaves_graph_clean() {
    let mut graph = two_node_graph();
    let recorder = observe(&graph);
    graph.add_sprite("s").unwrap().move_to(1.0, 2.0, 3.0).unwrap();
    graph.consume_dirty();
    recorder.borrow_mut().take();

    let mut sprite = graph.sprite_mut(&SpriteId::from("s")).unwrap();
    assert!(!sprite.move_to(1.0, 2.0, 3.0).unwrap());
    assert!(!graph.is_dirty());
    assert!(recorder.borrow().is_empty());
}

#[test]
fn all_ones_position_is_refused() {
    // compatibility guard for a malformed producer pattern
    let mut graph = two_node_graph();
    let recorder = observe(&graph);
    let mut sprite = graph.add_sprite("s").unwrap();
    recorder.borrow_mut().take();

    let result = sprite.set_position_values(&PositionValue::new(Units::Pixels, 1.0, 1.0, 1.0));
    assert!(result.is_err());
    assert_eq!(sprite.position().xyz(), (2.0, 3.0, 0.0));
    assert_eq!(sprite.units(), Units::GraphUnits);
    assert!(recorder.borrow().is_empty());
}

#[test]
fn sprite_attributes_are_echoed_under_derived_keys() {
    let mut graph = two_node_graph();
    let recorder = observe(&graph);
    let mut sprite = graph.add_sprite("s1").unwrap();
    recorder.borrow_mut().take();

    sprite.add_attribute("color", "red").unwrap();
    sprite.add_attribute("color", "blue").unwrap();
    sprite.remove_attribute("color").unwrap();

    let events = recorder.borrow_mut().take();
    assert_eq!(
        events,
        vec![
            AttributeEvent::GraphAttributeAdded {
                graph_id: "g".into(),
                attribute: "ui.sprite.s1.color".into(),
                value: "red".into(),
            },
            AttributeEvent::GraphAttributeChanged {
                graph_id: "g".into(),
                attribute: "ui.sprite.s1.color".into(),
                old_value: "red".into(),
                new_value: "blue".into(),
            },
            AttributeEvent::GraphAttributeRemoved {
                graph_id: "g".into(),
                attribute: "ui.sprite.s1.color".into(),
            },
        ]
    );
}

#[test]
fn echo_is_suppressed_when_the_graph_already_holds_the_value() {
    let mut graph = two_node_graph();
    graph.add_attribute("ui.sprite.s1.color", "red").unwrap();
    let recorder = observe(&graph);

    let mut sprite = graph.add_sprite("s1").unwrap();
    recorder.borrow_mut().take();

    sprite.add_attribute("color", "red").unwrap();
    assert!(recorder.borrow().is_empty());

    // a different value is still announced
    sprite.add_attribute("color", "green").unwrap();
    assert_eq!(attributes_seen(&recorder), vec!["ui.sprite.s1.color"]);

    // removals skip the comparison
    sprite.remove_attribute("color").unwrap();
    assert_eq!(attributes_seen(&recorder), vec!["ui.sprite.s1.color"]);
    assert_eq!(sprite.attribute("color"), None);
}

#[test]
fn removing_a_node_detaches_its_sprites() {
    let mut graph = two_node_graph();
    let a = NodeId::from("a");
    graph.add_sprite("on-a").unwrap().attach_to_node(&a).unwrap();
    graph
        .add_sprite("on-ab")
        .unwrap()
        .attach_to_edge(&EdgeId::from("ab"))
        .unwrap();

    graph.remove_node(&a).unwrap();

    assert!(graph.sprites().all(|s| !s.attachment().is_attached()));
    assert_eq!(graph.sprite_count(), 2);
    assert_eq!(graph.node_count(), 1);
}
