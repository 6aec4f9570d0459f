//! CanvasDoc Core Library
//!
//! Transactional document model for a diagram canvas: immutable elements,
//! validated all-or-nothing changelists, undo/redo and change notification.

pub mod change;
pub mod config;
pub mod document;
pub mod elements;
pub mod listener;
pub mod movement;
pub mod mutate;
pub mod query;
pub mod shared;
pub mod validate;

pub use change::{Change, ChangeKind, Changelist, InvalidChange, invert};
pub use config::DocumentConfig;
pub use document::Document;
pub use elements::{Element, ElementError, Ellipse, GeometryError, Link, Path, Rectangle};
pub use listener::{ChangeListener, ListenerId};
pub use movement::plan_move;
pub use shared::{ReentrancyError, SharedCommitError, SharedDocument, WeakDocument};
pub use validate::{ValidationError, validate};
