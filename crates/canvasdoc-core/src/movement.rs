//! Move planning: turning "translate these elements" into a changelist.
//!
//! Because identity is structural, translating an element gives it a new
//! identity. Everything that refers to the old one (children through their
//! parent reference, links through their endpoints) has to be replaced in the
//! same changelist, or the validator rejects it.

use crate::change::{Change, Changelist};
use crate::elements::Element;
use kurbo::Vec2;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

/// Plan translating `targets` by `offset` within `elements`.
///
/// Pure: nothing is applied. The result lists translated roots first, then
/// reparented descendants breadth-first, then updated links in document
/// order. Links and targets that aren't live are ignored. A target whose
/// ancestor is also a target moves with that ancestor and is only reparented.
///
/// A zero offset still yields a changelist (of no-op modifications); it's up
/// to the caller whether to commit it.
pub fn plan_move(targets: &[Element], offset: Vec2, elements: &[Element]) -> Changelist {
    let mut moving: Vec<usize> = Vec::new();
    for target in targets.iter().filter(|t| !t.is_link()) {
        match position(elements, target) {
            Some(index) if !moving.contains(&index) => moving.push(index),
            Some(_) => {}
            None => log::debug!("Ignoring move target that isn't live: {:?}", target),
        }
    }

    let hierarchy = Hierarchy::new(elements);
    let roots: Vec<usize> = moving
        .iter()
        .copied()
        .filter(|&index| !hierarchy.ancestors(index).any(|a| moving.contains(&a)))
        .collect();

    let mut replaced: HashMap<usize, Arc<Element>> = HashMap::new();
    let mut changes = Changelist::new();
    let mut queue: VecDeque<usize> = VecDeque::new();

    for &root in &roots {
        let new = elements[root].translated(offset);
        push_modify(&mut changes, &elements[root], &new);
        replaced.insert(root, Arc::new(new));
        queue.push_back(root);
    }

    while let Some(index) = queue.pop_front() {
        let Some(new_parent) = replaced.get(&index).cloned() else {
            continue;
        };
        for &child in hierarchy.children(index) {
            if replaced.contains_key(&child) {
                continue;
            }
            let new = elements[child].reparented(Some(new_parent.clone()));
            push_modify(&mut changes, &elements[child], &new);
            replaced.insert(child, Arc::new(new));
            queue.push_back(child);
        }
    }

    for element in elements {
        let Some(link) = element.as_link() else {
            continue;
        };
        let new_end = |end: &Element| position(elements, end).and_then(|i| replaced.get(&i));
        let (a, b) = (new_end(link.a()), new_end(link.b()));
        if a.is_none() && b.is_none() {
            continue;
        }
        let new = Element::Link(link.retargeted(a, b));
        push_modify(&mut changes, element, &new);
    }

    log::debug!(
        "Planned move by ({}, {}): {} roots, {} changes",
        offset.x,
        offset.y,
        roots.len(),
        changes.len()
    );
    changes
}

fn push_modify(changes: &mut Changelist, old: &Element, new: &Element) {
    changes.push(Change::Modify {
        old: old.clone(),
        new: new.clone(),
    });
}

fn position(elements: &[Element], element: &Element) -> Option<usize> {
    elements.iter().position(|e| e == element)
}

/// Parent/child relations of a document, by index.
struct Hierarchy {
    parents: Vec<Option<usize>>,
    children: Vec<Vec<usize>>,
}

impl Hierarchy {
    fn new(elements: &[Element]) -> Self {
        let parents: Vec<Option<usize>> = elements
            .iter()
            .map(|e| e.parent().and_then(|p| position(elements, p)))
            .collect();
        let mut children = vec![Vec::new(); elements.len()];
        for (child, parent) in parents.iter().enumerate() {
            if let Some(parent) = *parent {
                children[parent].push(child);
            }
        }
        Self { parents, children }
    }

    fn children(&self, index: usize) -> &[usize] {
        &self.children[index]
    }

    /// Ancestors of `index`, nearest first.
    fn ancestors(&self, index: usize) -> impl Iterator<Item = usize> + '_ {
        // bounded by the element count so a malformed chain can't loop forever
        std::iter::successors(self.parents[index], |&i| self.parents[i]).take(self.parents.len())
    }
}
