//! Graph-side mirrors of sprite state
//!
//! A sprite's position lives at `ui.sprite.<id>` on the graph; each other
//! sprite attribute is announced to graph observers at
//! `ui.sprite.<id>.<attribute>`. The graph's stored value at a derived key
//! is the last value observers saw for it, and an add or change is only
//! re-announced when the new value differs from it.

use super::element::SpriteId;
use crate::graph::AttributeValue;

/// Sprite attribute holding its position; never re-announced
pub const POSITION_ATTRIBUTE: &str = "position";

/// Graph attribute mirroring the position of sprite `id`, also used as the
/// presence attribute on its host
pub fn position_key(id: &SpriteId) -> String {
    format!("ui.sprite.{}", id)
}

/// Graph attribute a sprite attribute is announced under
pub fn attribute_key(id: &SpriteId, attribute: &str) -> String {
    format!("ui.sprite.{}.{}", id, attribute)
}

/// Whether `new` must be announced given the last value observers saw
pub fn needs_echo(last_seen: Option<&AttributeValue>, new: &AttributeValue) -> bool {
    last_seen != Some(new)
}
