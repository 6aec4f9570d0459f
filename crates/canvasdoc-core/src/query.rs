//! Spatial and relational lookups over an element collection.
//!
//! Bounds are inclusive on all edges. Links are matched by the union of their
//! endpoints' bounds.

use crate::elements::Element;
use kurbo::{Point, Rect};

/// Elements whose bounds contain `point`, in collection order.
pub fn under(elements: &[Element], point: Point) -> Vec<&Element> {
    elements
        .iter()
        .filter(|e| contains_point(e.bounds(), point))
        .collect()
}

/// Elements whose bounds lie entirely inside `rect`.
pub fn enclosed(elements: &[Element], rect: Rect) -> Vec<&Element> {
    let rect = rect.abs();
    elements
        .iter()
        .filter(|e| {
            let b = e.bounds();
            b.x0 >= rect.x0 && b.y0 >= rect.y0 && b.x1 <= rect.x1 && b.y1 <= rect.y1
        })
        .collect()
}

/// Elements whose bounds touch or intersect `rect`.
pub fn overlapped(elements: &[Element], rect: Rect) -> Vec<&Element> {
    let rect = rect.abs();
    elements
        .iter()
        .filter(|e| {
            let b = e.bounds();
            b.x0 <= rect.x1 && b.x1 >= rect.x0 && b.y0 <= rect.y1 && b.y1 >= rect.y0
        })
        .collect()
}

/// Links with `element` at either end.
pub fn links_for<'a>(elements: &'a [Element], element: &Element) -> Vec<&'a Element> {
    elements
        .iter()
        .filter(|e| e.as_link().is_some_and(|link| link.targets(element)))
        .collect()
}

// kurbo's Rect::contains excludes the far edges.
fn contains_point(rect: Rect, point: Point) -> bool {
    point.x >= rect.x0 && point.x <= rect.x1 && point.y >= rect.y0 && point.y <= rect.y1
}
