//! Core data types for planar localization

use serde::{Deserialize, Serialize};
use std::fmt;

/// Point in the plane. Coordinates share the caller's length unit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point2D {
    x: f64,
    y: f64,
}

impl Point2D {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub const fn origin() -> Self {
        Self { x: 0.0, y: 0.0 }
    }

    pub fn x(&self) -> f64 {
        self.x
    }

    pub fn y(&self) -> f64 {
        self.y
    }

    /// Both coordinates are neither NaN nor infinite
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    pub fn distance_to(&self, other: &Point2D) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    pub fn to_vector(&self) -> nalgebra::Vector2<f64> {
        nalgebra::Vector2::new(self.x, self.y)
    }
}

impl From<nalgebra::Point2<f64>> for Point2D {
    fn from(p: nalgebra::Point2<f64>) -> Self {
        Self::new(p.x, p.y)
    }
}

impl From<Point2D> for nalgebra::Point2<f64> {
    fn from(p: Point2D) -> Self {
        nalgebra::Point2::new(p.x, p.y)
    }
}

impl fmt::Display for Point2D {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.2}, {:.2})", self.x, self.y)
    }
}

/// Stable anchor identifier, shown as `A<n>`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnchorId(pub u32);

impl fmt::Display for AnchorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "A{}", self.0)
    }
}

/// Fixed reference point with known coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Anchor {
    pub id: AnchorId,
    pub position: Point2D,
}

impl Anchor {
    pub fn new(id: u32, x: f64, y: f64) -> Self {
        Self {
            id: AnchorId(id),
            position: Point2D::new(x, y),
        }
    }
}

/// Distance from an anchor to the target
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RangeMeasurement {
    pub anchor: Anchor,
    pub range: f64,
}

impl RangeMeasurement {
    pub fn new(anchor: Anchor, range: f64) -> Self {
        Self { anchor, range }
    }
}

/// Direction from an anchor outward to the target, in degrees
/// counter-clockwise from the +x axis
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BearingMeasurement {
    pub anchor: Anchor,
    pub bearing_deg: f64,
}

impl BearingMeasurement {
    pub fn new(anchor: Anchor, bearing_deg: f64) -> Self {
        Self {
            anchor,
            bearing_deg,
        }
    }
}
