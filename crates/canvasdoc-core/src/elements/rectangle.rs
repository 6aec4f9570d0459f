//! Rectangle element.

use super::{Element, GeometryError, normalize_frame};
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// An axis-aligned rectangle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rectangle {
    /// Top-left corner position.
    pub(crate) position: Point,
    pub(crate) width: f64,
    pub(crate) height: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) parent: Option<Arc<Element>>,
}

impl Rectangle {
    /// Create a new rectangle.
    ///
    /// Negative dimensions are folded into the position, so
    /// `(20, 30, -100, 40)` becomes `(-80, 30, 100, 40)`.
    pub fn new(position: Point, width: f64, height: f64) -> Result<Self, GeometryError> {
        let (position, width, height) = normalize_frame(position, width, height)?;
        Ok(Self::reconstruct(position, width, height, None))
    }

    /// Create a rectangle from two corner points.
    pub fn from_corners(p1: Point, p2: Point) -> Result<Self, GeometryError> {
        Self::new(p1, p2.x - p1.x, p2.y - p1.y)
    }

    /// Build a rectangle from raw parts, skipping normalization.
    pub(crate) fn reconstruct(
        position: Point,
        width: f64,
        height: f64,
        parent: Option<Arc<Element>>,
    ) -> Self {
        Self {
            position,
            width,
            height,
            parent,
        }
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn parent(&self) -> Option<&Element> {
        self.parent.as_deref()
    }

    /// Get the rectangle as a kurbo Rect.
    pub fn as_rect(&self) -> Rect {
        Rect::new(
            self.position.x,
            self.position.y,
            self.position.x + self.width,
            self.position.y + self.height,
        )
    }
}
