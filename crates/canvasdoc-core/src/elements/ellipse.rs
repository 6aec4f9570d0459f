//! Ellipse element.

use super::{Element, GeometryError, normalize_frame};
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// An ellipse inscribed in its bounding frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ellipse {
    /// Top-left corner of the bounding frame.
    pub(crate) position: Point,
    pub(crate) width: f64,
    pub(crate) height: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) parent: Option<Arc<Element>>,
}

impl Ellipse {
    /// Create a new ellipse from its bounding frame.
    pub fn new(position: Point, width: f64, height: f64) -> Result<Self, GeometryError> {
        let (position, width, height) = normalize_frame(position, width, height)?;
        Ok(Self::reconstruct(position, width, height, None))
    }

    /// Create a circle.
    pub fn circle(center: Point, radius: f64) -> Result<Self, GeometryError> {
        let diameter = radius.abs() * 2.0;
        Self::new(
            Point::new(center.x - radius.abs(), center.y - radius.abs()),
            diameter,
            diameter,
        )
    }

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

    pub fn center(&self) -> Point {
        self.as_rect().center()
    }

    /// Horizontal and vertical radii.
    pub fn radii(&self) -> (f64, f64) {
        (self.width / 2.0, self.height / 2.0)
    }

    pub fn as_rect(&self) -> Rect {
        Rect::new(
            self.position.x,
            self.position.y,
            self.position.x + self.width,
            self.position.y + self.height,
        )
    }
}
