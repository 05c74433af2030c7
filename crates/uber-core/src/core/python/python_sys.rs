use std::path::PathBuf;

use anyhow::{bail, Result};
use which::which;

/// Environment variable that pins the interpreter used to create environments.
pub const RUNTIME_PYTHON_ENV: &str = "UBER_RUNTIME_PYTHON";

/// Detects the base Python interpreter used to create environments.
///
/// # Errors
///
/// Returns an error when no interpreter is configured or found on `PATH`.
pub fn detect_interpreter() -> Result<PathBuf> {
    if let Some(explicit) = std::env::var_os(RUNTIME_PYTHON_ENV) {
        if !explicit.is_empty() {
            return Ok(PathBuf::from(explicit));
        }
    }

    for candidate in ["python3", "python"] {
        if let Ok(path) = which(candidate) {
            return Ok(path);
        }
    }

    bail!("no python interpreter found; set {RUNTIME_PYTHON_ENV}")
}
