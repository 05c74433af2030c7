//! Diagnostics routing and outcome shaping.

pub mod diagnostics;
pub(crate) mod outcome;
pub mod sink;
