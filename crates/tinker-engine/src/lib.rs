//! Tinker Engine - content loading and crafting services for the Tinker
//! voxel engine.
//!
//! This crate wires the crafting domain in `tinker-gameplay` to files on
//! disk: configuration, content packs with hot-reload, and a service that
//! keeps the recipe store current.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod config;
pub mod content_loader;
pub mod service;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::config::*;
    pub use crate::content_loader::*;
    pub use crate::service::*;
}
