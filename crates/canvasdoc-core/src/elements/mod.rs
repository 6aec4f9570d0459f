//! Element definitions for the document.
//!
//! Elements are immutable values. Identity is structural: two elements are the
//! same element when they compare equal, parent and link endpoints included.
//! "Changing" an element always means building a new value and replacing the
//! old one through a changelist.

mod ellipse;
mod link;
mod path;
mod rectangle;

pub use ellipse::Ellipse;
pub use link::Link;
pub use path::Path;
pub use rectangle::Rectangle;

use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

/// Minimum number of distinct vertices in a path.
pub const MIN_PATH_VERTICES: usize = 2;

/// Invalid geometry passed to an element constructor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GeometryError {
    #[error("element has zero width and zero height")]
    ZeroSize,
    #[error("coordinates must be finite")]
    NonFinite,
    #[error("path needs at least two distinct vertices, got {0}")]
    TooFewVertices(usize),
}

/// Reasons an element value is not well-formed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ElementError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),
    /// Negative dimensions or repeated path vertices that were never folded.
    #[error("element is not normalized")]
    Unnormalized,
    #[error("link endpoints must not be links")]
    LinkEndpoint,
    #[error("links cannot carry a parent")]
    LinkParent,
    #[error("a link cannot be a parent")]
    ParentIsLink,
}

/// Any value that can live in a document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Element {
    Rectangle(Rectangle),
    Ellipse(Ellipse),
    Path(Path),
    Link(Link),
}

impl Element {
    /// Check if this element is a link.
    pub fn is_link(&self) -> bool {
        matches!(self, Element::Link(_))
    }

    /// Get the link if this element is a link.
    pub fn as_link(&self) -> Option<&Link> {
        match self {
            Element::Link(link) => Some(link),
            _ => None,
        }
    }

    /// The parent element, if any. Links never have one.
    pub fn parent(&self) -> Option<&Element> {
        self.parent_arc().map(|p| &**p)
    }

    pub(crate) fn parent_arc(&self) -> Option<&Arc<Element>> {
        match self {
            Element::Rectangle(r) => r.parent.as_ref(),
            Element::Ellipse(e) => e.parent.as_ref(),
            Element::Path(p) => p.parent.as_ref(),
            Element::Link(_) => None,
        }
    }

    /// Bounding box in document coordinates.
    ///
    /// A link spans the union of its endpoints' bounds.
    pub fn bounds(&self) -> Rect {
        match self {
            Element::Rectangle(r) => r.as_rect(),
            Element::Ellipse(e) => e.as_rect(),
            Element::Path(p) => p.bounds(),
            Element::Link(l) => l.a().bounds().union(l.b().bounds()),
        }
    }

    /// A copy moved by `offset`. The parent reference is kept as is and links
    /// are returned unchanged, since they have no coordinates of their own.
    pub fn translated(&self, offset: Vec2) -> Element {
        match self {
            Element::Rectangle(r) => Element::Rectangle(Rectangle::reconstruct(
                r.position + offset,
                r.width,
                r.height,
                r.parent.clone(),
            )),
            Element::Ellipse(e) => Element::Ellipse(Ellipse::reconstruct(
                e.position + offset,
                e.width,
                e.height,
                e.parent.clone(),
            )),
            Element::Path(p) => Element::Path(Path::reconstruct(
                p.vertices.iter().map(|v| *v + offset).collect(),
                p.parent.clone(),
            )),
            Element::Link(_) => self.clone(),
        }
    }

    /// A copy of this element attached to `parent` (or detached with `None`).
    pub fn with_parent(&self, parent: Option<&Element>) -> Result<Element, ElementError> {
        if self.is_link() {
            return Err(ElementError::LinkParent);
        }
        if parent.is_some_and(Element::is_link) {
            return Err(ElementError::ParentIsLink);
        }
        Ok(self.reparented(parent.map(|p| Arc::new(p.clone()))))
    }

    /// Replace the parent reference without any checks.
    pub(crate) fn reparented(&self, parent: Option<Arc<Element>>) -> Element {
        match self {
            Element::Rectangle(r) => Element::Rectangle(Rectangle::reconstruct(
                r.position, r.width, r.height, parent,
            )),
            Element::Ellipse(e) => Element::Ellipse(Ellipse::reconstruct(
                e.position, e.width, e.height, parent,
            )),
            Element::Path(p) => Element::Path(Path::reconstruct(p.vertices.clone(), parent)),
            Element::Link(_) => self.clone(),
        }
    }

    /// Fold negative dimensions into the origin and collapse repeated
    /// adjacent path vertices, recursively through parents and link endpoints.
    pub fn normalized(&self) -> Element {
        let parent = self.parent_arc().map(|p| Arc::new(p.normalized()));
        match self {
            Element::Rectangle(r) => {
                let (position, width, height) = fold_negative(r.position, r.width, r.height);
                Element::Rectangle(Rectangle::reconstruct(position, width, height, parent))
            }
            Element::Ellipse(e) => {
                let (position, width, height) = fold_negative(e.position, e.width, e.height);
                Element::Ellipse(Ellipse::reconstruct(position, width, height, parent))
            }
            Element::Path(p) => Element::Path(Path::reconstruct(dedup_vertices(&p.vertices), parent)),
            Element::Link(l) => Element::Link(Link::from_arcs(
                Arc::new(l.a().normalized()),
                Arc::new(l.b().normalized()),
            )),
        }
    }

    /// Check whether this is a well-formed element.
    pub fn check(&self) -> Result<(), ElementError> {
        self.check_structure()?;
        if self.is_zero_size() {
            return Err(GeometryError::ZeroSize.into());
        }
        Ok(())
    }

    /// Everything [`Element::check`] covers except zero size of the element
    /// itself.
    pub(crate) fn check_structure(&self) -> Result<(), ElementError> {
        match self {
            Element::Rectangle(r) => check_frame(r.position, r.width, r.height)?,
            Element::Ellipse(e) => check_frame(e.position, e.width, e.height)?,
            Element::Path(p) => p.check()?,
            Element::Link(l) => {
                for end in [l.a(), l.b()] {
                    if end.is_link() {
                        return Err(ElementError::LinkEndpoint);
                    }
                    end.check()?;
                }
            }
        }
        if let Some(parent) = self.parent() {
            if parent.is_link() {
                return Err(ElementError::ParentIsLink);
            }
            parent.check()?;
        }
        Ok(())
    }

    /// Both width and height are zero.
    pub fn is_zero_size(&self) -> bool {
        match self {
            Element::Rectangle(r) => r.width == 0.0 && r.height == 0.0,
            Element::Ellipse(e) => e.width == 0.0 && e.height == 0.0,
            Element::Path(p) => {
                let bounds = p.bounds();
                bounds.width() == 0.0 && bounds.height() == 0.0
            }
            Element::Link(_) => false,
        }
    }
}

impl From<Rectangle> for Element {
    fn from(rect: Rectangle) -> Self {
        Element::Rectangle(rect)
    }
}

impl From<Ellipse> for Element {
    fn from(ellipse: Ellipse) -> Self {
        Element::Ellipse(ellipse)
    }
}

impl From<Path> for Element {
    fn from(path: Path) -> Self {
        Element::Path(path)
    }
}

impl From<Link> for Element {
    fn from(link: Link) -> Self {
        Element::Link(link)
    }
}

/// Move negative width/height into the origin.
fn fold_negative(position: Point, width: f64, height: f64) -> (Point, f64, f64) {
    let mut position = position;
    if width < 0.0 {
        position.x += width;
    }
    if height < 0.0 {
        position.y += height;
    }
    (position, width.abs(), height.abs())
}

/// Validate and normalize the frame shared by rectangles and ellipses.
fn normalize_frame(position: Point, width: f64, height: f64) -> Result<(Point, f64, f64), GeometryError> {
    if !(position.is_finite() && width.is_finite() && height.is_finite()) {
        return Err(GeometryError::NonFinite);
    }
    if width == 0.0 && height == 0.0 {
        return Err(GeometryError::ZeroSize);
    }
    Ok(fold_negative(position, width, height))
}

fn check_frame(position: Point, width: f64, height: f64) -> Result<(), ElementError> {
    if !(position.is_finite() && width.is_finite() && height.is_finite()) {
        return Err(GeometryError::NonFinite.into());
    }
    if width < 0.0 || height < 0.0 {
        return Err(ElementError::Unnormalized);
    }
    Ok(())
}

/// Collapse runs of equal adjacent vertices into one.
fn dedup_vertices(vertices: &[Point]) -> Vec<Point> {
    let mut collapsed = vertices.to_vec();
    collapsed.dedup();
    collapsed
}

/// Whether two neighbouring vertices coincide.
fn has_adjacent_repeats(vertices: &[Point]) -> bool {
    vertices.windows(2).any(|pair| pair[0] == pair[1])
}
