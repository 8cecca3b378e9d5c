//! Demo scenes for sprig, and a backend that reports draw commands through
//! `tracing` instead of rasterizing them.
//!
//! Each [`Scenario`] builds a small widget tree and a script of pointer
//! events that exercises it. The `sprig-demo` binary plays a script against
//! a [`LogBackend`] so the resulting command stream can be inspected with
//! `RUST_LOG=debug`.

pub mod backend;
pub mod scenes;

pub use backend::{LogBackend, LogStats};
pub use scenes::{Scenario, Scene};

#[cfg(test)]
mod tests;
