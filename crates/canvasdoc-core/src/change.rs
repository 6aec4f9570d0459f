//! Changes: the only way to alter a document.

use crate::elements::{Element, ElementError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// An ordered batch of changes applied as one unit.
pub type Changelist = Vec<Change>;

/// A change wrapped an element that is not well-formed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("invalid change: {0}")]
pub struct InvalidChange(#[from] pub ElementError);

/// One document operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Change {
    Insert(Element),
    Remove(Element),
    Modify { old: Element, new: Element },
}

/// Discriminant of a [`Change`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChangeKind {
    Insert,
    Remove,
    Modify,
}

impl Change {
    /// Insert a well-formed element.
    pub fn insert(element: Element) -> Result<Self, InvalidChange> {
        element.check()?;
        Ok(Change::Insert(element))
    }

    /// Remove a well-formed element.
    pub fn remove(element: Element) -> Result<Self, InvalidChange> {
        element.check()?;
        Ok(Change::Remove(element))
    }

    /// Replace `old` with `new`; both must be well-formed.
    pub fn modify(old: Element, new: Element) -> Result<Self, InvalidChange> {
        old.check()?;
        new.check()?;
        Ok(Change::Modify { old, new })
    }

    pub fn kind(&self) -> ChangeKind {
        match self {
            Change::Insert(_) => ChangeKind::Insert,
            Change::Remove(_) => ChangeKind::Remove,
            Change::Modify { .. } => ChangeKind::Modify,
        }
    }

    /// Elements this change refers to: the old one first for modifications.
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        let (first, second) = match self {
            Change::Insert(element) | Change::Remove(element) => (element, None),
            Change::Modify { old, new } => (old, Some(new)),
        };
        std::iter::once(first).chain(second)
    }

    /// The element this change brings into the document, if any.
    pub fn introduced(&self) -> Option<&Element> {
        match self {
            Change::Insert(element) => Some(element),
            Change::Modify { new, .. } => Some(new),
            Change::Remove(_) => None,
        }
    }

    /// The change that undoes this one.
    pub fn inverse(&self) -> Change {
        match self {
            Change::Insert(element) => Change::Remove(element.clone()),
            Change::Remove(element) => Change::Insert(element.clone()),
            Change::Modify { old, new } => Change::Modify {
                old: new.clone(),
                new: old.clone(),
            },
        }
    }

    /// The same change with every element normalized.
    pub fn normalized(&self) -> Change {
        match self {
            Change::Insert(element) => Change::Insert(element.normalized()),
            Change::Remove(element) => Change::Remove(element.normalized()),
            Change::Modify { old, new } => Change::Modify {
                old: old.normalized(),
                new: new.normalized(),
            },
        }
    }
}

/// Invert a changelist, keeping its order.
pub fn invert(changes: &[Change]) -> Changelist {
    changes.iter().map(Change::inverse).collect()
}
