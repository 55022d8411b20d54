//! Attribute values and the position tuple sprites are placed with

use super::engine::{GraphError, GraphResult};
use serde::{Deserialize, Serialize};

/// Maximum number of components a position carries
pub const POSITION_COMPONENTS: usize = 3;

/// Unit system a position is expressed in
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Units {
    /// Graph units, the native coordinate space of the graph
    #[default]
    #[serde(rename = "gu")]
    GraphUnits,
    /// Screen pixels
    #[serde(rename = "px")]
    Pixels,
    /// Percentage of the viewport
    #[serde(rename = "percents")]
    Percents,
}

impl std::fmt::Display for Units {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::GraphUnits => write!(f, "gu"),
            Self::Pixels => write!(f, "px"),
            Self::Percents => write!(f, "%"),
        }
    }
}

/// An ordered tuple of up to three numeric components plus a unit tag.
///
/// Missing trailing components read as `0.0`, so `(2, 3)` and `(2, 3, 0)`
/// compare equal when their units match.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "RawPosition")]
pub struct PositionValue {
    units: Units,
    #[serde(rename = "values")]
    components: Vec<f64>,
}

#[derive(Deserialize)]
struct RawPosition {
    #[serde(default)]
    units: Units,
    values: Vec<f64>,
}

impl TryFrom<RawPosition> for PositionValue {
    type Error = GraphError;

    fn try_from(raw: RawPosition) -> Result<Self, Self::Error> {
        Self::from_components(raw.units, raw.values)
    }
}

impl PositionValue {
    /// A full three-component position
    pub fn new(units: Units, x: f64, y: f64, z: f64) -> Self {
        Self {
            units,
            components: vec![x, y, z],
        }
    }

    /// The origin, in graph units
    pub fn zero() -> Self {
        Self::new(Units::GraphUnits, 0.0, 0.0, 0.0)
    }

    /// Build a position from a partial component list.
    ///
    /// Fails with [`GraphError::InvalidPosition`] when more than three
    /// components are given.
    pub fn from_components(units: Units, components: Vec<f64>) -> GraphResult<Self> {
        if components.len() > POSITION_COMPONENTS {
            return Err(GraphError::InvalidPosition(format!(
                "expected at most {} components, got {}",
                POSITION_COMPONENTS,
                components.len()
            )));
        }
        Ok(Self { units, components })
    }

    pub fn units(&self) -> Units {
        self.units
    }

    /// Components actually present in the tuple
    pub fn components(&self) -> &[f64] {
        &self.components
    }

    pub fn component_count(&self) -> usize {
        self.components.len()
    }

    /// Component `index`, or `0.0` when the tuple is shorter
    pub fn get(&self, index: usize) -> f64 {
        self.components.get(index).copied().unwrap_or(0.0)
    }

    pub fn x(&self) -> f64 {
        self.get(0)
    }

    pub fn y(&self) -> f64 {
        self.get(1)
    }

    pub fn z(&self) -> f64 {
        self.get(2)
    }

    /// The three components, defaulting missing ones to zero
    pub fn xyz(&self) -> (f64, f64, f64) {
        (self.get(0), self.get(1), self.get(2))
    }
}

impl Default for PositionValue {
    fn default() -> Self {
        Self::zero()
    }
}

impl PartialEq for PositionValue {
    fn eq(&self, other: &Self) -> bool {
        self.units == other.units
            && (0..POSITION_COMPONENTS).all(|i| self.get(i) == other.get(i))
    }
}

impl std::fmt::Display for PositionValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let parts: Vec<String> = self.components.iter().map(|c| c.to_string()).collect();
        write!(f, "({}){}", parts.join(", "), self.units)
    }
}

/// Attribute values as stored on graphs, nodes, edges and sprites.
///
/// Values are opaque to the event pipeline beyond equality.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    Position(PositionValue),
    Array(Vec<AttributeValue>),
}

impl AttributeValue {
    /// Value stored for presence-only attributes
    pub fn presence() -> Self {
        Self::Bool(true)
    }

    pub fn as_position(&self) -> Option<&PositionValue> {
        match self {
            Self::Position(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }
}

impl From<&str> for AttributeValue {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<i64> for AttributeValue {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<f64> for AttributeValue {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<bool> for AttributeValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<PositionValue> for AttributeValue {
    fn from(p: PositionValue) -> Self {
        Self::Position(p)
    }
}
