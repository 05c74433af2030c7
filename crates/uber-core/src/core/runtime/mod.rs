pub(crate) mod effects;
mod envelope;
pub(crate) mod errors;
pub(crate) mod process;
pub(crate) mod venv;

pub use envelope::*;
