use serde::{Deserialize, Serialize};

/// Options shared by every command, as parsed from the command line.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GlobalOptions {
    pub verbose: u8,
    pub trace: bool,
    pub json: bool,
    /// Explicit settings file; defaults to `<project-dir>/uber-config`.
    pub config: Option<String>,
}
