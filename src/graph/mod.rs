//! The graphic graph: nodes, edges and attributes observed by the stream

mod attributes;
mod edge;
mod engine;
mod node;
mod store;
mod value;


pub use attributes::{AttributeChange, Attributes};
pub use edge::{EdgeId, GraphicEdge};
pub use engine::{GraphError, GraphId, GraphResult, GraphicGraph};
pub use node::{GraphicNode, NodeId};
pub(crate) use store::GraphStore;
pub use value::{AttributeValue, PositionValue, Units, POSITION_COMPONENTS};
