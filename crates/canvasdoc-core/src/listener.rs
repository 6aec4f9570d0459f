//! Change notifications for presentation layers.

use crate::change::Change;
use uuid::Uuid;

/// Receives every changelist applied to a document: committed changelists,
/// inverted ones on undo, and re-applied ones on redo.
///
/// Delivery is synchronous, in subscription order. A listener that needs the
/// document back should hold a [`crate::WeakDocument`]: it can read the
/// post-change state from there, but writes fail with
/// [`crate::ReentrancyError`] until delivery is over.
pub trait ChangeListener {
    fn on_change(&mut self, changes: &[Change]);
}

impl<F> ChangeListener for F
where
    F: FnMut(&[Change]),
{
    fn on_change(&mut self, changes: &[Change]) {
        self(changes)
    }
}

/// Handle returned by `subscribe`, used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(Uuid);

impl ListenerId {
    pub(crate) fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

/// Registered listeners of one document.
#[derive(Default)]
pub(crate) struct Listeners {
    entries: Vec<(ListenerId, Box<dyn ChangeListener>)>,
}

impl Listeners {
    pub(crate) fn add(&mut self, listener: Box<dyn ChangeListener>) -> ListenerId {
        let id = ListenerId::new();
        self.entries.push((id, listener));
        id
    }

    pub(crate) fn remove(&mut self, id: ListenerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry, _)| *entry != id);
        self.entries.len() != before
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn notify(&mut self, changes: &[Change]) {
        for (_, listener) in &mut self.entries {
            listener.on_change(changes);
        }
    }
}
