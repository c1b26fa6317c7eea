//! Error types for the Oly core.
//!
//! Uses `thiserror` for ergonomic error definition with rich context.
//!
//! Every error in this module is an invariant violation: a programming
//! error that corrupts (or would corrupt) the entity table or the
//! containment graph. Expected game outcomes, such as an overloaded ship or a
//! refused stack join, are returned as ordinary values and never pass
//! through here.

use std::fmt;

use thiserror::Error;

use crate::entity::BoxId;
use crate::types::{Kind, LocDepth, Subkind};

/// Result alias for core operations.
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for core operations.
#[derive(Debug, Error)]
#[error("{kind}")]
pub struct Error {
    /// The broken invariant.
    pub kind: ErrorKind,
    /// Optional context about where the violation was detected.
    pub context: Option<ErrorContext>,
}

impl Error {
    /// Creates a new error with the given kind.
    #[must_use]
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            context: None,
        }
    }

    /// Adds context to this error.
    #[must_use]
    pub fn with_context(mut self, context: ErrorContext) -> Self {
        self.context = Some(context);
        self
    }

    /// Appends a frame to this error's context, creating one if needed.
    #[must_use]
    pub fn in_frame(mut self, frame: impl Into<String>) -> Self {
        let context = self.context.take().unwrap_or_default();
        self.context = Some(context.with_frame(frame));
        self
    }

    /// Creates an invalid handle error (zero or outside the table).
    #[must_use]
    pub fn invalid_handle(id: BoxId) -> Self {
        Self::new(ErrorKind::InvalidHandle(id))
    }

    /// Creates a deleted handle error.
    #[must_use]
    pub fn deleted_handle(id: BoxId) -> Self {
        Self::new(ErrorKind::DeletedHandle(id))
    }

    /// Creates a wrong kind error.
    #[must_use]
    pub fn wrong_kind(entity: BoxId, expected: Kind, actual: Kind) -> Self {
        Self::new(ErrorKind::WrongKind {
            entity,
            expected,
            actual,
        })
    }

    /// Creates a wrong subkind error.
    #[must_use]
    pub fn wrong_subkind(entity: BoxId, expected: Subkind, actual: Subkind) -> Self {
        Self::new(ErrorKind::WrongSubkind {
            entity,
            expected,
            actual,
        })
    }

    /// Creates a wrong location depth error.
    #[must_use]
    pub fn wrong_depth(entity: BoxId, expected: LocDepth, actual: LocDepth) -> Self {
        Self::new(ErrorKind::WrongDepth {
            entity,
            expected,
            actual,
        })
    }

    /// Creates a traversal limit error.
    #[must_use]
    pub fn traversal_limit(start: BoxId, limit: usize) -> Self {
        Self::new(ErrorKind::TraversalLimit { start, limit })
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal(message.into()))
    }

    /// Returns the entity the violation is about, if there is one.
    #[must_use]
    pub fn entity(&self) -> Option<BoxId> {
        match &self.kind {
            ErrorKind::InvalidHandle(id)
            | ErrorKind::DeletedHandle(id)
            | ErrorKind::HandleInUse(id)
            | ErrorKind::SelfParent(id)
            | ErrorKind::NotDetached(id) => Some(*id),
            ErrorKind::WrongKind { entity, .. }
            | ErrorKind::WrongSubkind { entity, .. }
            | ErrorKind::WrongDepth { entity, .. }
            | ErrorKind::ContainmentCycle { entity, .. }
            | ErrorKind::PromoteForward { entity, .. } => Some(*entity),
            ErrorKind::NotInParentList { child, .. }
            | ErrorKind::DuplicateChild { child, .. }
            | ErrorKind::ParentMismatch { child, .. } => Some(*child),
            ErrorKind::TraversalLimit { start, .. } => Some(*start),
            ErrorKind::TableFull { .. } | ErrorKind::Internal(_) => None,
        }
    }
}

/// Categorized invariant violations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// Handle is zero or outside the table.
    #[error("invalid handle: {0:?}")]
    InvalidHandle(BoxId),

    /// Handle names an empty or deleted slot.
    #[error("deleted handle: {0:?}")]
    DeletedHandle(BoxId),

    /// Tried to allocate a handle that is already live.
    #[error("handle already in use: {0:?}")]
    HandleInUse(BoxId),

    /// No free slot left in the table.
    #[error("entity table full (capacity {capacity})")]
    TableFull {
        /// The table capacity.
        capacity: usize,
    },

    /// Operation requires a different kind.
    #[error("wrong kind for {entity:?}: expected {expected}, got {actual}")]
    WrongKind {
        /// The entity that was checked.
        entity: BoxId,
        /// The required kind.
        expected: Kind,
        /// The kind it has.
        actual: Kind,
    },

    /// Operation requires a different subkind.
    #[error("wrong subkind for {entity:?}: expected {expected:?}, got {actual:?}")]
    WrongSubkind {
        /// The entity that was checked.
        entity: BoxId,
        /// The required subkind.
        expected: Subkind,
        /// The subkind it has.
        actual: Subkind,
    },

    /// Operation requires a location at a different depth.
    #[error("wrong depth for {entity:?}: expected {expected:?}, got {actual:?}")]
    WrongDepth {
        /// The entity that was checked.
        entity: BoxId,
        /// The required depth.
        expected: LocDepth,
        /// The depth it has.
        actual: LocDepth,
    },

    /// Child's recorded parent does not list it.
    #[error("{child:?} is missing from the here list of its parent {parent:?}")]
    NotInParentList {
        /// The child being removed.
        child: BoxId,
        /// Its recorded parent.
        parent: BoxId,
    },

    /// Child would appear twice in a here list.
    #[error("{child:?} already appears in the here list of {parent:?}")]
    DuplicateChild {
        /// The child being added.
        child: BoxId,
        /// The parent whose list already holds it.
        parent: BoxId,
    },

    /// A here list entry whose `where` points elsewhere.
    #[error("{child:?} is listed under {listed_in:?} but records parent {recorded:?}")]
    ParentMismatch {
        /// The child entry.
        child: BoxId,
        /// The parent whose list holds the entry.
        listed_in: BoxId,
        /// The parent the child records.
        recorded: BoxId,
    },

    /// Entity asked to contain itself.
    #[error("{0:?} cannot be its own parent")]
    SelfParent(BoxId),

    /// Relocation would close a containment cycle.
    #[error("moving {entity:?} under {new_parent:?} would create a cycle")]
    ContainmentCycle {
        /// The entity being moved.
        entity: BoxId,
        /// The requested parent.
        new_parent: BoxId,
    },

    /// A bounded walk ran out of budget.
    #[error("traversal from {start:?} exceeded {limit} steps")]
    TraversalLimit {
        /// Where the walk started.
        start: BoxId,
        /// The step budget.
        limit: usize,
    },

    /// Promotion may only move an entity towards the front.
    #[error("cannot promote {entity:?} from position {from} to later position {to}")]
    PromoteForward {
        /// The entity being promoted.
        entity: BoxId,
        /// Its current index.
        from: usize,
        /// The requested index.
        to: usize,
    },

    /// Entity must be out of the graph before deletion.
    #[error("{0:?} is still attached to the containment graph")]
    NotDetached(BoxId),

    /// Internal error (should not happen).
    #[error("internal error: {0}")]
    Internal(String),
}

/// Context about where a violation was detected.
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// The core operation that detected the violation.
    pub operation: Option<String>,
    /// The entity the operation was acting on.
    pub entity: Option<BoxId>,
    /// Enclosing operations, innermost first.
    pub stack: Vec<String>,
}

impl ErrorContext {
    /// Creates a new empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the operation name.
    #[must_use]
    pub fn with_operation(mut self, operation: impl Into<String>) -> Self {
        self.operation = Some(operation.into());
        self
    }

    /// Sets the entity being acted on.
    #[must_use]
    pub fn with_entity(mut self, entity: BoxId) -> Self {
        self.entity = Some(entity);
        self
    }

    /// Adds a stack frame.
    #[must_use]
    pub fn with_frame(mut self, frame: impl Into<String>) -> Self {
        self.stack.push(frame.into());
        self
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(operation) = &self.operation {
            write!(f, "in {operation}")?;
            if let Some(entity) = self.entity {
                write!(f, " on {entity}")?;
            }
        }
        if !self.stack.is_empty() {
            writeln!(f)?;
            for frame in &self.stack {
                writeln!(f, "  from {frame}")?;
            }
        }
        Ok(())
    }
}
