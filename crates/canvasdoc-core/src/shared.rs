//! Shared handle to a document for single-threaded hosts.
//!
//! Listeners that need to call back into the document hold a [`WeakDocument`].
//! Notifications are delivered after the document itself is released, so a
//! listener can read it. A nested commit, undo, redo, subscribe or unsubscribe
//! from a listener returns [`ReentrancyError`] instead of panicking.

use crate::change::{Change, Changelist};
use crate::document::Document;
use crate::elements::Element;
use crate::listener::{ChangeListener, ListenerId, Listeners};
use crate::validate::ValidationError;
use std::cell::{RefCell, RefMut};
use std::rc::{Rc, Weak};
use thiserror::Error;

/// The document is in the middle of applying or announcing a changelist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("document is busy applying a changelist")]
pub struct ReentrancyError;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SharedCommitError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Reentrancy(#[from] ReentrancyError),
}

#[derive(Default)]
struct Shared {
    document: RefCell<Document>,
    /// Borrowed for the whole of a write, notification included.
    listeners: RefCell<Listeners>,
}

/// Reference-counted document handle.
#[derive(Clone, Default)]
pub struct SharedDocument {
    inner: Rc<Shared>,
}

impl std::fmt::Debug for SharedDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedDocument")
            .field("document", &self.inner.document)
            .finish_non_exhaustive()
    }
}

/// Non-owning counterpart of [`SharedDocument`], for use inside listeners.
#[derive(Clone)]
pub struct WeakDocument(Weak<Shared>);

impl std::fmt::Debug for WeakDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("WeakDocument").field(&self.0.strong_count()).finish()
    }
}

impl WeakDocument {
    /// `None` once every strong handle is gone.
    pub fn upgrade(&self) -> Option<SharedDocument> {
        self.0.upgrade().map(|inner| SharedDocument { inner })
    }
}

impl From<Document> for SharedDocument {
    fn from(document: Document) -> Self {
        Self::new(document)
    }
}

impl SharedDocument {
    /// Wrap `document`. Listeners it already has keep receiving changes.
    pub fn new(mut document: Document) -> Self {
        let listeners = document.take_listeners();
        Self {
            inner: Rc::new(Shared {
                document: RefCell::new(document),
                listeners: RefCell::new(listeners),
            }),
        }
    }

    pub fn downgrade(&self) -> WeakDocument {
        WeakDocument(Rc::downgrade(&self.inner))
    }

    /// Run `f` with read access to the document.
    ///
    /// Works from inside a listener. Fails only while `f` would observe a
    /// changelist half applied.
    pub fn read<R>(&self, f: impl FnOnce(&Document) -> R) -> Result<R, ReentrancyError> {
        let document = self.inner.document.try_borrow().map_err(|_| ReentrancyError)?;
        Ok(f(&document))
    }

    pub fn elements(&self) -> Result<Vec<Element>, ReentrancyError> {
        self.read(Document::elements)
    }

    pub fn commit(&self, changes: &[Change]) -> Result<(), SharedCommitError> {
        self.transact(|document| match document.apply_commit(changes) {
            Ok(applied) => (Ok(()), applied),
            Err(err) => (Err(err), None),
        })??;
        Ok(())
    }

    pub fn undo(&self) -> Result<bool, ReentrancyError> {
        self.transact(|document| {
            let applied = document.apply_undo();
            (applied.is_some(), applied)
        })
    }

    pub fn redo(&self) -> Result<bool, ReentrancyError> {
        self.transact(|document| {
            let applied = document.apply_redo();
            (applied.is_some(), applied)
        })
    }

    pub fn subscribe<L>(&self, listener: L) -> Result<ListenerId, ReentrancyError>
    where
        L: ChangeListener + 'static,
    {
        Ok(self.listeners()?.add(Box::new(listener)))
    }

    pub fn unsubscribe(&self, id: ListenerId) -> Result<bool, ReentrancyError> {
        Ok(self.listeners()?.remove(id))
    }

    /// Run `op` against the document, then announce whatever it applied.
    fn transact<T>(
        &self,
        op: impl FnOnce(&mut Document) -> (T, Option<Changelist>),
    ) -> Result<T, ReentrancyError> {
        let mut listeners = self.listeners()?;
        let (result, applied) = {
            let mut document = self.inner.document.try_borrow_mut().map_err(|err| {
                log::warn!("Rejected write while the document is being read: {}", err);
                ReentrancyError
            })?;
            op(&mut document)
        };
        if let Some(changes) = applied {
            listeners.notify(&changes);
        }
        Ok(result)
    }

    fn listeners(&self) -> Result<RefMut<'_, Listeners>, ReentrancyError> {
        self.inner.listeners.try_borrow_mut().map_err(|err| {
            log::warn!("Rejected re-entrant document access: {}", err);
            ReentrancyError
        })
    }
}
