//! Sprites: positioned markers attached to nodes or edges
//!
//! A sprite's position is mirrored on its graph at `ui.sprite.<id>`; while
//! attached, its host carries a presence attribute under the same key.

mod attachment;
mod element;
mod handle;
pub mod mirror;
pub mod position;

pub use attachment::Attachment;
pub use element::{Bounds, GraphicSprite, SpriteId};
pub use handle::SpriteMut;
