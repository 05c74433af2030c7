use std::fmt;

use serde::{Deserialize, Serialize};

/// File name of the optional settings file, next to the manifest by default.
pub const SETTINGS_FILE: &str = "uber-config";

/// Severity of a diagnostic message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Error,
    Warning,
    Info,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Info => "info",
        };
        f.write_str(label)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("settings file is not valid: {source}")]
    Malformed { source: serde_json::Error },
}

impl SettingsError {
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::Malformed { .. } => "UB110",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IgnoreSettings {
    #[serde(default)]
    pub errors: bool,
    #[serde(default)]
    pub warnings: bool,
    #[serde(default)]
    pub info: bool,
}

/// Parsed `uber-config` file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingsConfig {
    #[serde(default)]
    pub ignore: IgnoreSettings,
}

impl SettingsConfig {
    /// Parses the settings file; `None` (no file) yields the defaults, which
    /// ignore nothing.
    pub fn load(bytes: Option<&[u8]>) -> Result<Self, SettingsError> {
        match bytes {
            None => Ok(Self::default()),
            Some(bytes) => {
                serde_json::from_slice(bytes).map_err(|source| SettingsError::Malformed { source })
            }
        }
    }

    #[must_use]
    pub fn ignores(&self, severity: Severity) -> bool {
        match severity {
            Severity::Error => self.ignore.errors,
            Severity::Warning => self.ignore.warnings,
            Severity::Info => self.ignore.info,
        }
    }
}
