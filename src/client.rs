//! Dispatcher: the public entry point for generation and probing.
//!
//! Implementation details are split into submodules under `src/client/`.

pub mod builder;
pub mod core;
mod probe;

pub use builder::DispatcherBuilder;
pub use core::Dispatcher;
