//! Internal implementation modules for `uber-core`.
//!
//! Callers should go through the re-exports at the crate root rather than
//! importing these modules directly.

pub mod config;
pub mod orchestrator;
pub mod provision;
pub mod python;
pub mod runtime;
pub mod tooling;

#[cfg(test)]
pub(crate) mod testing;
