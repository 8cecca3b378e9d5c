use std::{collections::TryReserveError, result::Result as StdResult};

use thiserror::Error;

use crate::{NodeId, geom};

/// Result type for sprig operations.
pub type Result<T> = StdResult<T, Error>;

/// Core error type.
#[derive(PartialEq, Eq, Error, Debug, Clone)]
pub enum Error {
    #[error("allocation: {0}")]
    /// Storage for a node, child link or command could not be obtained.
    Allocation(String),

    #[error("node not found: {0:?}")]
    /// The node id does not refer to a live node in this context.
    NodeNotFound(NodeId),

    #[error("{child:?} is not a child of {parent:?}")]
    /// Remove-child on a node that is not among the parent's children.
    NotAChild {
        /// Parent that was searched.
        parent: NodeId,
        /// Child that was not found.
        child: NodeId,
    },

    #[error("{0:?} has no children")]
    /// Remove-child on a parent with an empty child list.
    NoChildren(NodeId),

    #[error("{0:?} already has a parent")]
    /// The node is already linked into the tree.
    AlreadyAttached(NodeId),

    #[error("attaching {child:?} to {parent:?} would create a cycle")]
    /// Attaching would make a node its own ancestor.
    WouldCreateCycle {
        /// Requested parent.
        parent: NodeId,
        /// Requested child.
        child: NodeId,
    },

    #[error("root widget already set")]
    /// The context already has a root.
    RootAlreadySet,

    #[error("no root widget set")]
    /// The operation needs a root and none is bound.
    NoRoot,

    #[error("render backend already registered")]
    /// The context already has a backend.
    BackendAlreadyRegistered,

    #[error("no render backend registered")]
    /// The operation needs a backend and none is registered.
    NoBackend,

    #[error("command buffer is empty")]
    /// Pop from an empty command buffer.
    EmptyCommandBuffer,

    #[error("widget at {0:?} is not of the requested type")]
    /// A typed widget access found a different widget kind.
    WrongWidgetType(NodeId),

    #[error("widget at {0:?} is already in use")]
    /// A widget was accessed while one of its own hooks was running.
    ReentrantWidgetBorrow(NodeId),

    #[error("invalid: {0}")]
    /// Invalid argument, e.g. an out-of-range percentage.
    Invalid(String),

    #[error("backend: {0}")]
    /// Failure reported by the render backend.
    Backend(String),

    #[error("geometry: {0}")]
    /// Geometry failure.
    Geometry(String),

    #[error("config: {0}")]
    /// Configuration could not be parsed.
    Config(String),
}

impl From<TryReserveError> for Error {
    fn from(e: TryReserveError) -> Self {
        Self::Allocation(e.to_string())
    }
}

impl From<geom::Error> for Error {
    fn from(e: geom::Error) -> Self {
        Self::Geometry(e.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Self::Config(e.to_string())
    }
}

/// Collects the outcome of a best-effort walk: every failure is logged and
/// the walk goes on, the first failure is reported at the end.
#[derive(Default)]
pub(crate) struct FirstError {
    /// The first error seen.
    first: Option<Error>,
}

impl FirstError {
    /// Record the outcome of one step.
    pub(crate) fn note(&mut self, result: Result<()>) {
        if let Err(e) = result {
            tracing::warn!("continuing after error: {e}");
            if self.first.is_none() {
                self.first = Some(e);
            }
        }
    }

    /// Finish the walk.
    pub(crate) fn finish(self) -> Result<()> {
        match self.first {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}
