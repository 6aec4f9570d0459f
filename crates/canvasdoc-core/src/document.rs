//! The document: live elements plus their change history.

use crate::change::{Change, Changelist, invert};
use crate::config::DocumentConfig;
use crate::elements::Element;
use crate::listener::{ChangeListener, ListenerId, Listeners};
use crate::movement::plan_move;
use crate::mutate::apply;
use crate::query;
use crate::validate::{ValidationError, validate};
use kurbo::{Point, Rect, Vec2};

/// A transactional collection of elements.
///
/// All mutation goes through [`Document::commit`], [`Document::undo`] and
/// [`Document::redo`]. Accessors hand out copies or shared borrows only.
#[derive(Default)]
pub struct Document {
    /// Live elements, in insertion order.
    elements: Vec<Element>,
    /// Applied changelists, oldest first. Doubles as the undo stack.
    changelog: Vec<Changelist>,
    /// Undone changelists, most recently undone last.
    redo_log: Vec<Changelist>,
    listeners: Listeners,
    config: DocumentConfig,
}

impl std::fmt::Debug for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Document")
            .field("elements", &self.elements)
            .field("changelog", &self.changelog.len())
            .field("redo_log", &self.redo_log.len())
            .field("listeners", &self.listeners.len())
            .field("config", &self.config)
            .finish()
    }
}

impl Document {
    /// Create a new empty document.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: DocumentConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &DocumentConfig {
        &self.config
    }

    /// Snapshot of the live elements.
    pub fn elements(&self) -> Vec<Element> {
        self.elements.clone()
    }

    pub fn contains(&self, element: &Element) -> bool {
        self.elements.contains(element)
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Committed changelists, oldest first.
    pub fn changelog(&self) -> &[Changelist] {
        &self.changelog
    }

    /// Undone changelists, most recently undone last.
    pub fn redo_log(&self) -> &[Changelist] {
        &self.redo_log
    }

    pub fn can_undo(&self) -> bool {
        !self.changelog.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_log.is_empty()
    }

    /// Register a listener for applied changelists.
    pub fn subscribe<L>(&mut self, listener: L) -> ListenerId
    where
        L: ChangeListener + 'static,
    {
        self.listeners.add(Box::new(listener))
    }

    /// Remove a listener. Returns false if it wasn't registered.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.listeners.remove(id)
    }

    /// Validate and apply a changelist as one unit.
    ///
    /// Elements are normalized first, so listeners and the changelog see the
    /// stored values. An empty changelist is ignored. On error nothing
    /// changes and nobody is notified.
    pub fn commit(&mut self, changes: &[Change]) -> Result<(), ValidationError> {
        if let Some(applied) = self.apply_commit(changes)? {
            self.listeners.notify(&applied);
        }
        Ok(())
    }

    /// Revert the most recent changelist. Returns false if there was nothing
    /// to undo.
    pub fn undo(&mut self) -> bool {
        self.apply_undo()
            .map(|applied| self.listeners.notify(&applied))
            .is_some()
    }

    /// Re-apply the most recently undone changelist. Returns false if there
    /// was nothing to redo.
    pub fn redo(&mut self) -> bool {
        self.apply_redo()
            .map(|applied| self.listeners.notify(&applied))
            .is_some()
    }

    /// [`Document::commit`] without notification. Returns the changelist as
    /// applied, or `None` for an empty one.
    pub(crate) fn apply_commit(
        &mut self,
        changes: &[Change],
    ) -> Result<Option<Changelist>, ValidationError> {
        if changes.is_empty() {
            log::debug!("Ignoring empty changelist");
            return Ok(None);
        }
        let changes: Changelist = changes.iter().map(Change::normalized).collect();
        if let Err(err) = validate(&changes, &self.elements) {
            log::warn!("Rejected changelist of {} changes: {}", changes.len(), err);
            return Err(err);
        }

        apply(&changes, &mut self.elements);
        self.redo_log.clear();
        log::debug!("Committed {} changes", changes.len());
        self.push_history(changes.clone());
        Ok(Some(changes))
    }

    /// [`Document::undo`] without notification. Returns the inverse that was
    /// applied.
    pub(crate) fn apply_undo(&mut self) -> Option<Changelist> {
        let changes = self.changelog.pop()?;
        let inverse = invert(&changes);
        apply(&inverse, &mut self.elements);
        self.redo_log.push(changes);
        log::debug!("Undid {} changes", inverse.len());
        Some(inverse)
    }

    /// [`Document::redo`] without notification.
    pub(crate) fn apply_redo(&mut self) -> Option<Changelist> {
        let changes = self.redo_log.pop()?;
        apply(&changes, &mut self.elements);
        log::debug!("Redid {} changes", changes.len());
        self.push_history(changes.clone());
        Some(changes)
    }

    /// Hand the registered listeners over to another owner.
    pub(crate) fn take_listeners(&mut self) -> Listeners {
        std::mem::take(&mut self.listeners)
    }

    /// Plan moving `targets` by `offset`. Nothing is committed.
    pub fn move_elements(&self, targets: &[Element], offset: Vec2) -> Changelist {
        plan_move(targets, offset, &self.elements)
    }

    /// Plan and commit a move. A zero offset is skipped.
    pub fn commit_move(&mut self, targets: &[Element], offset: Vec2) -> Result<(), ValidationError> {
        if offset == Vec2::ZERO {
            return Ok(());
        }
        let changes = self.move_elements(targets, offset);
        self.commit(&changes)
    }

    /// Replace every element with `elements`.
    ///
    /// Recorded as two history entries (removal, then insertion), since a
    /// changelist can't mix kinds. The insertion is validated up front, so
    /// either both land or neither does.
    pub fn replace_all(&mut self, elements: &[Element]) -> Result<(), ValidationError> {
        let inserts: Changelist = elements
            .iter()
            .map(|e| Change::Insert(e.normalized()))
            .collect();
        if !inserts.is_empty() {
            validate(&inserts, &[])?;
        }
        let removals: Changelist = self.elements.iter().cloned().map(Change::Remove).collect();
        self.commit(&removals)?;
        self.commit(&inserts)
    }

    /// Elements whose bounds contain `point`.
    pub fn elements_under(&self, point: Point) -> Vec<Element> {
        query::under(&self.elements, point).into_iter().cloned().collect()
    }

    /// Elements lying entirely inside `rect`.
    pub fn elements_enclosed(&self, rect: Rect) -> Vec<Element> {
        query::enclosed(&self.elements, rect).into_iter().cloned().collect()
    }

    /// Elements whose bounds touch `rect`.
    pub fn elements_overlapped(&self, rect: Rect) -> Vec<Element> {
        query::overlapped(&self.elements, rect).into_iter().cloned().collect()
    }

    /// Links with `element` at either end.
    pub fn links_for(&self, element: &Element) -> Vec<Element> {
        query::links_for(&self.elements, element).into_iter().cloned().collect()
    }

    fn push_history(&mut self, changes: Changelist) {
        self.changelog.push(changes);
        if let Some(limit) = self.config.history_limit {
            if self.changelog.len() > limit {
                let excess = self.changelog.len() - limit;
                self.changelog.drain(..excess);
                log::debug!("Dropped {} changelists beyond history limit {}", excess, limit);
            }
        }
    }
}
