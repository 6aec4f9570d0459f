//! Changelist validation.
//!
//! A changelist is accepted or rejected as a whole. The rules run in a fixed
//! order and each failure has its own [`ValidationError`] variant, so callers
//! can tell exactly which rule a changelist broke:
//!
//! 1. the changelist is not empty;
//! 2. every change has the same kind;
//! 3. every element is well-formed;
//! 4. modifications actually change something;
//! 5. removed and replaced elements are live, new ones are not;
//! 6. no element takes part twice;
//! 7. no new element has zero width and zero height;
//! 8. parent references resolve in the resulting document;
//! 9. link endpoints resolve in the resulting document, and links to changed
//!    elements are carried along.

use crate::change::{Change, ChangeKind};
use crate::elements::{Element, ElementError};
use crate::mutate::apply;
use thiserror::Error;

/// Why a changelist was rejected. `index` is the offending entry.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("changelist is empty")]
    Empty,
    #[error("entry {index} is a {found:?} change in a {expected:?} changelist; mixed changes are not allowed")]
    MixedKinds {
        index: usize,
        expected: ChangeKind,
        found: ChangeKind,
    },
    #[error("entry {index} holds a malformed element: {source}")]
    Malformed { index: usize, source: ElementError },
    #[error("entry {index} modifies without actual changes")]
    NoActualChange { index: usize },
    #[error("entry {index} refers to an element that isn't in the document")]
    NotInStore { index: usize },
    #[error("entry {index} introduces an element already present in the document")]
    AlreadyInStore { index: usize },
    #[error("entry {index} touches an element that already takes part in the changelist")]
    DuplicateParticipation { index: usize },
    #[error("entry {index} has zero width and zero height")]
    ZeroSize { index: usize },
    #[error("parent of {element:?} doesn't resolve to a live element")]
    UnresolvedParent { element: Element },
    #[error("entry {index} links to an element that isn't in the document")]
    UnresolvedLinkTarget { index: usize },
    #[error("incomplete changelist: link {link:?} points at a changed element")]
    IncompleteChangelist { link: Element },
}

/// Check `changes` against the live `elements`.
pub fn validate(changes: &[Change], elements: &[Element]) -> Result<(), ValidationError> {
    let expected = changes.first().ok_or(ValidationError::Empty)?.kind();
    for (index, change) in changes.iter().enumerate() {
        if change.kind() != expected {
            return Err(ValidationError::MixedKinds {
                index,
                expected,
                found: change.kind(),
            });
        }
    }

    for (index, change) in changes.iter().enumerate() {
        for element in change.elements() {
            element
                .check_structure()
                .map_err(|source| ValidationError::Malformed { index, source })?;
        }
    }

    for (index, change) in changes.iter().enumerate() {
        if let Change::Modify { old, new } = change {
            if old == new {
                return Err(ValidationError::NoActualChange { index });
            }
        }
    }

    check_presence(changes, elements)?;
    check_participation(changes)?;

    for (index, change) in changes.iter().enumerate() {
        if change.introduced().is_some_and(Element::is_zero_size) {
            return Err(ValidationError::ZeroSize { index });
        }
    }

    let mut after = elements.to_vec();
    apply(changes, &mut after);
    check_parents(&after)?;
    check_links(changes, &after)
}

fn check_presence(changes: &[Change], elements: &[Element]) -> Result<(), ValidationError> {
    for (index, change) in changes.iter().enumerate() {
        let (gone, introduced) = match change {
            Change::Insert(element) => (None, Some(element)),
            Change::Remove(element) => (Some(element), None),
            Change::Modify { old, new } => (Some(old), Some(new)),
        };
        if gone.is_some_and(|e| !elements.contains(e)) {
            return Err(ValidationError::NotInStore { index });
        }
        if introduced.is_some_and(|e| elements.contains(e)) {
            return Err(ValidationError::AlreadyInStore { index });
        }
    }
    Ok(())
}

fn check_participation(changes: &[Change]) -> Result<(), ValidationError> {
    let mut seen: Vec<&Element> = Vec::new();
    for (index, change) in changes.iter().enumerate() {
        for element in change.elements() {
            if seen.contains(&element) {
                return Err(ValidationError::DuplicateParticipation { index });
            }
            seen.push(element);
        }
    }
    Ok(())
}

fn check_parents(after: &[Element]) -> Result<(), ValidationError> {
    for element in after {
        if let Some(parent) = element.parent() {
            if parent.is_link() || !after.contains(parent) {
                return Err(ValidationError::UnresolvedParent {
                    element: element.clone(),
                });
            }
        }
    }
    Ok(())
}

fn check_links(changes: &[Change], after: &[Element]) -> Result<(), ValidationError> {
    let resolves = |link: &Element| {
        link.as_link()
            .is_none_or(|l| after.contains(l.a()) && after.contains(l.b()))
    };

    for (index, change) in changes.iter().enumerate() {
        if change.introduced().is_some_and(|e| !resolves(e)) {
            return Err(ValidationError::UnresolvedLinkTarget { index });
        }
    }
    // Whatever still dangles was left untouched by the changelist.
    if let Some(link) = after.iter().find(|&e| !resolves(e)) {
        return Err(ValidationError::IncompleteChangelist { link: link.clone() });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::{GeometryError, Link, Path, Rectangle};
    use kurbo::Point;

    fn rect(x: f64, y: f64, w: f64, h: f64) -> Element {
        Rectangle::new(Point::new(x, y), w, h).unwrap().into()
    }

    fn link(a: &Element, b: &Element) -> Element {
        Link::new(a.clone(), b.clone()).unwrap().into()
    }

    fn modify(old: &Element, new: Element) -> Change {
        Change::Modify {
            old: old.clone(),
            new,
        }
    }

    /// Three rectangles, a link between the first two and a self-loop on the
    /// second.
    fn existing() -> Vec<Element> {
        let r0 = rect(10.0, 10.0, 100.0, 100.0);
        let r1 = rect(20.0, 20.0, 200.0, 200.0);
        let r2 = rect(30.0, 30.0, 300.0, 300.0);
        let l0 = link(&r0, &r1);
        let l1 = link(&r1, &r1);
        vec![r0, r1, r2, l0, l1]
    }

    #[test]
    fn test_allows_new_elements() {
        let changes = vec![
            Change::Insert(rect(44.0, 44.0, 444.0, 444.0)),
            Change::Insert(rect(55.0, 55.0, 555.0, 555.0)),
        ];
        assert_eq!(validate(&changes, &existing()), Ok(()));
    }

    #[test]
    fn test_allows_modified_elements() {
        let changes = vec![
            modify(&rect(30.0, 30.0, 300.0, 300.0), rect(33.0, 33.0, 330.0, 330.0)),
        ];
        assert_eq!(validate(&changes, &existing()), Ok(()));
    }

    #[test]
    fn test_allows_removing_elements() {
        let changes = vec![Change::Remove(rect(30.0, 30.0, 300.0, 300.0))];
        assert_eq!(validate(&changes, &existing()), Ok(()));
    }

    #[test]
    fn test_rejects_empty() {
        assert_eq!(validate(&[], &existing()), Err(ValidationError::Empty));
    }

    #[test]
    fn test_rejects_mixed_kinds() {
        let elems = existing();
        let inserted = rect(5.0, 5.0, 5.0, 5.0);
        let modified = rect(100.0, 1100.0, 1000.0, 1000.0);
        let mixed = [
            vec![Change::Remove(elems[2].clone()), Change::Insert(inserted.clone())],
            vec![Change::Insert(inserted.clone()), Change::Remove(elems[2].clone())],
            vec![Change::Insert(inserted.clone()), modify(&elems[2], modified.clone())],
            vec![modify(&elems[2], modified.clone()), Change::Insert(inserted)],
            vec![Change::Remove(elems[0].clone()), modify(&elems[2], modified.clone())],
            vec![modify(&elems[2], modified), Change::Remove(elems[0].clone())],
        ];
        for changes in mixed {
            assert!(matches!(
                validate(&changes, &elems),
                Err(ValidationError::MixedKinds { index: 1, .. })
            ));
        }
    }

    #[test]
    fn test_rejects_malformed_elements() {
        let unfolded: Element = Rectangle::reconstruct(Point::new(1.0, 1.0), -5.0, 5.0, None).into();
        let bad_path: Element = Path::reconstruct(vec![Point::new(1.0, 1.0)], None).into();
        assert_eq!(
            validate(&[Change::Insert(unfolded)], &existing()),
            Err(ValidationError::Malformed {
                index: 0,
                source: ElementError::Unnormalized
            })
        );
        assert_eq!(
            validate(&[Change::Insert(bad_path)], &existing()),
            Err(ValidationError::Malformed {
                index: 0,
                source: ElementError::Geometry(GeometryError::TooFewVertices(1))
            })
        );
    }

    #[test]
    fn test_rejects_modify_without_changes() {
        let r2 = rect(30.0, 30.0, 300.0, 300.0);
        assert_eq!(
            validate(&[modify(&r2, r2.clone())], &existing()),
            Err(ValidationError::NoActualChange { index: 0 })
        );
    }

    #[test]
    fn test_rejects_inserting_existing() {
        assert_eq!(
            validate(&[Change::Insert(rect(30.0, 30.0, 300.0, 300.0))], &existing()),
            Err(ValidationError::AlreadyInStore { index: 0 })
        );
    }

    #[test]
    fn test_rejects_modifying_into_existing() {
        let elems = existing();
        assert_eq!(
            validate(&[modify(&elems[2], elems[0].clone())], &elems),
            Err(ValidationError::AlreadyInStore { index: 0 })
        );
    }

    #[test]
    fn test_rejects_missing_old_elements() {
        let missing = rect(9.0, 9.0, 9.0, 9.0);
        assert_eq!(
            validate(&[modify(&missing, rect(1.0, 1.0, 10.0, 10.0))], &existing()),
            Err(ValidationError::NotInStore { index: 0 })
        );
        assert_eq!(
            validate(&[Change::Remove(missing)], &existing()),
            Err(ValidationError::NotInStore { index: 0 })
        );
    }

    #[test]
    fn test_rejects_duplicate_insertions() {
        let changes = vec![
            Change::Insert(rect(55.0, 610.0, 555.0, 555.0)),
            Change::Insert(rect(55.0, 610.0, 555.0, 555.0)),
        ];
        assert_eq!(
            validate(&changes, &existing()),
            Err(ValidationError::DuplicateParticipation { index: 1 })
        );
    }

    #[test]
    fn test_rejects_duplicate_removals() {
        let r2 = rect(30.0, 30.0, 300.0, 300.0);
        let changes = vec![Change::Remove(r2.clone()), Change::Remove(r2)];
        assert_eq!(
            validate(&changes, &existing()),
            Err(ValidationError::DuplicateParticipation { index: 1 })
        );
    }

    #[test]
    fn test_rejects_two_modifies_of_same_element() {
        let r2 = rect(30.0, 30.0, 300.0, 300.0);
        let changes = vec![
            modify(&r2, rect(1.0, 1.0, 1.0, 1.0)),
            modify(&r2, rect(2.0, 2.0, 2.0, 2.0)),
        ];
        assert_eq!(
            validate(&changes, &existing()),
            Err(ValidationError::DuplicateParticipation { index: 1 })
        );
    }

    #[test]
    fn test_rejects_two_modifies_into_same_element() {
        let r0 = rect(10.0, 10.0, 100.0, 100.0);
        let r2 = rect(30.0, 30.0, 300.0, 300.0);
        let target = rect(5.0, 5.0, 5.0, 5.0);
        let changes = vec![modify(&r0, target.clone()), modify(&r2, target)];
        assert_eq!(
            validate(&changes, &existing()),
            Err(ValidationError::DuplicateParticipation { index: 1 })
        );
    }

    #[test]
    fn test_rejects_chained_modifies() {
        let r2 = rect(30.0, 30.0, 300.0, 300.0);
        let middle = rect(1.0, 1.0, 1.0, 1.0);
        let elems = existing();
        let changes = vec![modify(&r2, middle.clone()), modify(&middle, rect(2.0, 2.0, 2.0, 2.0))];
        // `middle` is not live yet, so presence fails before participation
        assert_eq!(
            validate(&changes, &elems),
            Err(ValidationError::NotInStore { index: 1 })
        );
    }

    #[test]
    fn test_zero_dimensions() {
        let elems = existing();
        let r2 = &elems[2];
        assert_eq!(validate(&[Change::Insert(rect(1.0, 1.0, 0.0, 1.0))], &elems), Ok(()));
        assert_eq!(validate(&[Change::Insert(rect(1.0, 1.0, 1.0, 0.0))], &elems), Ok(()));
        assert_eq!(validate(&[modify(r2, rect(10.0, 10.0, 0.0, 1.0))], &elems), Ok(()));

        let degenerate: Element = Rectangle::reconstruct(Point::new(1.0, 1.0), 0.0, 0.0, None).into();
        assert_eq!(
            validate(&[Change::Insert(degenerate.clone())], &elems),
            Err(ValidationError::ZeroSize { index: 0 })
        );
        assert_eq!(
            validate(&[modify(r2, degenerate)], &elems),
            Err(ValidationError::ZeroSize { index: 0 })
        );
    }

    #[test]
    fn test_parent_must_be_live_or_introduced() {
        let elems = existing();
        let container = rect(0.0, 0.0, 500.0, 500.0);
        let child = rect(1.0, 1.0, 1.0, 1.0).with_parent(Some(&container)).unwrap();
        assert_eq!(
            validate(&[Change::Insert(child.clone())], &elems),
            Err(ValidationError::UnresolvedParent {
                element: child.clone()
            })
        );
        let together = vec![Change::Insert(container), Change::Insert(child)];
        assert_eq!(validate(&together, &elems), Ok(()));
    }

    #[test]
    fn test_modifying_parent_requires_reparenting_children() {
        let container = rect(0.0, 0.0, 50.0, 50.0);
        let child = rect(1.0, 1.0, 1.0, 1.0).with_parent(Some(&container)).unwrap();
        let elems = vec![container.clone(), child.clone()];
        let moved = rect(10.0, 10.0, 50.0, 50.0);

        assert_eq!(
            validate(&[modify(&container, moved.clone())], &elems),
            Err(ValidationError::UnresolvedParent {
                element: child.clone()
            })
        );
        let reparented = child.with_parent(Some(&moved)).unwrap();
        let changes = vec![modify(&container, moved), modify(&child, reparented)];
        assert_eq!(validate(&changes, &elems), Ok(()));
    }

    #[test]
    fn test_removing_parent_leaves_orphan() {
        let container = rect(0.0, 0.0, 50.0, 50.0);
        let child = rect(1.0, 1.0, 1.0, 1.0).with_parent(Some(&container)).unwrap();
        let elems = vec![container.clone(), child.clone()];
        assert!(matches!(
            validate(&[Change::Remove(container.clone())], &elems),
            Err(ValidationError::UnresolvedParent { .. })
        ));
        let both = vec![Change::Remove(child), Change::Remove(container)];
        assert_eq!(validate(&both, &elems), Ok(()));
    }

    #[test]
    fn test_allows_link_with_targets_modified_together() {
        let elems = existing();
        let (el, link1, link2) = (&elems[1], &elems[3], &elems[4]);
        let new_el = rect(10.0, 11.0, 12.0, 13.0);
        let changes = vec![
            modify(el, new_el.clone()),
            modify(link1, link(&elems[0], &new_el)),
            modify(link2, link(&new_el, &new_el)),
        ];
        assert_eq!(validate(&changes, &elems), Ok(()));
    }

    #[test]
    fn test_rejects_changelist_without_updated_links() {
        let elems = existing();
        let (el, link1, link2) = (&elems[1], &elems[3], &elems[4]);
        let new_el = rect(10.0, 11.0, 12.0, 13.0);
        let new_link1 = link(&elems[0], &new_el);
        let new_link2 = link(&new_el, &new_el);

        let only_element = vec![modify(el, new_el.clone())];
        let missing_self_loop = vec![modify(el, new_el.clone()), modify(link1, new_link1)];
        let missing_link = vec![modify(el, new_el), modify(link2, new_link2)];
        for changes in [only_element, missing_self_loop, missing_link] {
            assert!(matches!(
                validate(&changes, &elems),
                Err(ValidationError::IncompleteChangelist { .. })
            ));
        }
    }

    #[test]
    fn test_removing_linked_element_needs_link_removal() {
        let elems = existing();
        assert_eq!(
            validate(&[Change::Remove(elems[0].clone())], &elems),
            Err(ValidationError::IncompleteChangelist {
                link: elems[3].clone()
            })
        );
        let both = vec![Change::Remove(elems[0].clone()), Change::Remove(elems[3].clone())];
        assert_eq!(validate(&both, &elems), Ok(()));
    }

    #[test]
    fn test_rejects_inserting_link_with_missing_targets() {
        let elems = existing();
        let outsider = rect(9.0, 9.0, 9.0, 9.0);
        let other = rect(9.0, 9.0, 10.0, 10.0);
        for new_link in [
            link(&outsider, &elems[0]),
            link(&elems[0], &outsider),
            link(&other, &outsider),
        ] {
            assert_eq!(
                validate(&[Change::Insert(new_link)], &elems),
                Err(ValidationError::UnresolvedLinkTarget { index: 0 })
            );
        }
    }

    #[test]
    fn test_rejects_modifying_link_target_into_missing_element() {
        let elems = existing();
        let outsider = rect(9.0, 9.0, 9.0, 9.0);
        assert_eq!(
            validate(&[modify(&elems[3], link(&elems[0], &outsider))], &elems),
            Err(ValidationError::UnresolvedLinkTarget { index: 0 })
        );
    }

    #[test]
    fn test_allows_inserting_link_with_inserted_targets() {
        let a = rect(1.0, 1.0, 1.0, 1.0);
        let b = rect(2.0, 2.0, 2.0, 2.0);
        let changes = vec![
            Change::Insert(a.clone()),
            Change::Insert(b.clone()),
            Change::Insert(link(&a, &b)),
        ];
        assert_eq!(validate(&changes, &existing()), Ok(()));
    }
}
