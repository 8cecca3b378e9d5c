//! Sprig: a retained-mode widget toolkit core.
//!
//! Sprig keeps a tree of widgets in an arena, lays it out with a two-pass
//! fit/assign scheme, routes pointer input through the tree, and turns the
//! visual state of the tree into a queue of backend-agnostic draw commands.
//! Concrete rasterizers plug in through [`backend::RenderBackend`].
//!
//! # Quick Start
//!
//! The main entry points are:
//! - [`Sprig`] - the public context that embedding code talks to
//! - [`Core`] - the arena, layout engine and routing state
//! - [`Widget`] - the trait implemented by all widgets
//!
//! # Module Organization
//!
//! - [`geom`] - geometry and color primitives
//! - [`command`] - the draw command vocabulary and the command buffer
//! - [`widgets`] - built-in widget implementations

#![warn(missing_docs)]

// Internal core module - re-export specific items below
mod core;

// Public modules
pub mod widget;
pub mod widgets;

pub use sprig_geom as geom;

#[cfg(any(test, feature = "testing"))]
pub use crate::core::testing;
pub use crate::core::{
    Config, Context, Core, CoreContext, CoreViewContext, NodeId, Sprig, TypedId, ViewContext,
};
pub use crate::core::{backend, command, config, dump, error, event, name, node};
pub use widget::{EventKind, Fit, Phase, Widget};
