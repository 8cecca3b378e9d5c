//! Core types for the sprig widget toolkit.

/// Render backend contract.
pub mod backend;
/// Draw commands and the command buffer.
pub mod command;
/// Toolkit configuration.
pub mod config;
/// Widget-facing contexts.
pub mod context;
/// Debug dump utilities.
pub mod dump;
/// Core error types.
pub mod error;
/// Neutral input events and translation.
pub mod event;
/// Node ID types.
pub mod id;
/// Widget node names.
pub mod name;
/// Node data stored in the arena.
pub mod node;
/// Rendering the tree into the command buffer.
pub mod render;
/// Pointer event routing.
pub mod routing;
/// The public context.
pub mod sprig;
/// Testing utilities.
#[cfg(any(test, feature = "testing"))]
pub mod testing;
/// The arena, tree operations and layout engine.
pub mod world;

pub use config::Config;
pub use context::{Context, CoreContext, CoreViewContext, ViewContext};
pub use id::{NodeId, TypedId};
pub use sprig::Sprig;
pub use world::Core;
