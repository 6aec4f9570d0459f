//! Link element: a directed reference between two other elements.

use super::{Element, ElementError};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// A link from `a` to `b`.
///
/// Links hold their endpoints by value, so when an endpoint is replaced the
/// link has to be replaced too. Self-loops are fine; links to links are not.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Link {
    pub(crate) a: Arc<Element>,
    pub(crate) b: Arc<Element>,
}

impl Link {
    /// Create a link between two non-link elements.
    pub fn new(a: Element, b: Element) -> Result<Self, ElementError> {
        if a.is_link() || b.is_link() {
            return Err(ElementError::LinkEndpoint);
        }
        a.check()?;
        b.check()?;
        Ok(Self::from_arcs(Arc::new(a), Arc::new(b)))
    }

    pub(crate) fn from_arcs(a: Arc<Element>, b: Arc<Element>) -> Self {
        Self { a, b }
    }

    /// Source endpoint.
    pub fn a(&self) -> &Element {
        &self.a
    }

    /// Target endpoint.
    pub fn b(&self) -> &Element {
        &self.b
    }

    /// Check if either endpoint is `element`.
    pub fn targets(&self, element: &Element) -> bool {
        *self.a == *element || *self.b == *element
    }

    /// A copy with the given endpoints swapped in; `None` keeps the current one.
    pub(crate) fn retargeted(&self, a: Option<&Arc<Element>>, b: Option<&Arc<Element>>) -> Self {
        Self::from_arcs(
            a.unwrap_or(&self.a).clone(),
            b.unwrap_or(&self.b).clone(),
        )
    }
}
