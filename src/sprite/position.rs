//! Coordinate normalization applied before a sprite position is compared
//!
//! A node-attached sprite is placed in polar terms around its node, so its
//! second and third components are angles. An edge-attached sprite's first
//! component is the fraction of the edge length it sits at.

use super::attachment::Attachment;
use std::f64::consts::TAU;

/// Wrap an angle into `[0, 2pi)`
pub fn normalize_angle(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(TAU);
    // rem_euclid may round up to exactly TAU for tiny negative inputs
    if wrapped >= TAU {
        0.0
    } else {
        wrapped
    }
}

/// Clamp an along-edge offset into `[0, 1]`
pub fn clamp_offset(offset: f64) -> f64 {
    offset.clamp(0.0, 1.0)
}

/// Normalize `(x, y, z)` for the given attachment
pub fn normalize(attachment: &Attachment, x: f64, y: f64, z: f64) -> (f64, f64, f64) {
    match attachment {
        Attachment::Node(_) => (x, normalize_angle(y), normalize_angle(z)),
        Attachment::Edge(_) => (clamp_offset(x), y, z),
        Attachment::None => (x, y, z),
    }
}
