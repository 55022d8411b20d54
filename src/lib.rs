//! spritegraph: attribute event filtering and graph-attached sprites
//!
//! Two pieces of a live graph viewer's data path:
//!
//! - **Attribute filtering**: [`AttributeFilter`] sits in a chain of
//!   [`AttributeObserver`]s and drops graph, node and edge attribute events
//!   that a kind-specific or global predicate matches.
//! - **Sprites**: markers owned by a [`GraphicGraph`], attached to at most one
//!   node or edge, whose position and attributes are mirrored into the
//!   graph's attribute namespace and announced to its observers.
//!
//! # Example
//!
//! ```
//! use spritegraph::{GraphicGraph, GraphicNode};
//!
//! let mut graph = GraphicGraph::with_id("g");
//! let node = graph.add_node(GraphicNode::new("a").at(2.0, 3.0, 0.0));
//!
//! let mut sprite = graph.add_sprite("s1").unwrap();
//! sprite.attach_to_node(&node).unwrap();
//! sprite.move_to(4.0, 0.0, 0.0).unwrap();
//!
//! assert!(graph.attribute("ui.sprite.s1").is_some());
//! ```

pub mod graph;
pub mod sprite;
pub mod stream;

pub use graph::{
    AttributeValue, EdgeId, GraphError, GraphId, GraphResult, GraphicEdge, GraphicGraph,
    GraphicNode, NodeId, PositionValue, Units,
};
pub use sprite::{Attachment, Bounds, GraphicSprite, SpriteId, SpriteMut};
pub use stream::{
    AttributeEvent, AttributeFilter, AttributeObserver, AttributePredicate, ConfigError,
    ElementKind, EventRecorder, FilterConfig, FilterSlot, ObserverHandle, ObserverId,
    ObserverList, StreamError, StreamResult,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
