//! Path element (open polyline).

use super::{
    Element, ElementError, GeometryError, MIN_PATH_VERTICES, dedup_vertices, has_adjacent_repeats,
};
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// An ordered sequence of vertices where no two neighbours coincide.
///
/// A vertex may come back later in the sequence, as the last vertex of a
/// closed outline does.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Path {
    pub(crate) vertices: Vec<Point>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) parent: Option<Arc<Element>>,
}

impl Path {
    /// Create a path. Runs of equal successive vertices collapse into one.
    pub fn new(vertices: impl IntoIterator<Item = Point>) -> Result<Self, GeometryError> {
        let vertices: Vec<Point> = vertices.into_iter().collect();
        if !vertices.iter().all(|v| v.is_finite()) {
            return Err(GeometryError::NonFinite);
        }
        let vertices = dedup_vertices(&vertices);
        if vertices.len() < MIN_PATH_VERTICES {
            return Err(GeometryError::TooFewVertices(vertices.len()));
        }
        Ok(Self::reconstruct(vertices, None))
    }

    pub(crate) fn reconstruct(vertices: Vec<Point>, parent: Option<Arc<Element>>) -> Self {
        Self { vertices, parent }
    }

    pub fn vertices(&self) -> &[Point] {
        &self.vertices
    }

    pub fn parent(&self) -> Option<&Element> {
        self.parent.as_deref()
    }

    /// Bounding box around all vertices.
    pub fn bounds(&self) -> Rect {
        let Some((first, rest)) = self.vertices.split_first() else {
            return Rect::ZERO;
        };
        rest.iter()
            .fold(Rect::from_points(*first, *first), |bounds, v| bounds.union_pt(*v))
    }

    pub(crate) fn check(&self) -> Result<(), ElementError> {
        if !self.vertices.iter().all(|v| v.is_finite()) {
            return Err(GeometryError::NonFinite.into());
        }
        if has_adjacent_repeats(&self.vertices) {
            return Err(ElementError::Unnormalized);
        }
        if self.vertices.len() < MIN_PATH_VERTICES {
            return Err(GeometryError::TooFewVertices(self.vertices.len()).into());
        }
        Ok(())
    }
}
