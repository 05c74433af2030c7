use std::path::PathBuf;

/// An isolated environment could not be created.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("failed to create environment '{environment}': {reason}")]
pub struct EnvCreationError {
    pub environment: String,
    pub reason: String,
}

impl EnvCreationError {
    pub fn new(environment: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            environment: environment.into(),
            reason: reason.into(),
        }
    }

    #[must_use]
    pub fn code(&self) -> &'static str {
        "UB301"
    }
}

/// A package could not be installed into an environment.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("failed to install {requirement} into '{environment}': {reason}")]
pub struct InstallError {
    pub environment: String,
    pub requirement: String,
    pub reason: String,
}

impl InstallError {
    pub fn new(
        environment: impl Into<String>,
        requirement: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            environment: environment.into(),
            requirement: requirement.into(),
            reason: reason.into(),
        }
    }

    #[must_use]
    pub fn code(&self) -> &'static str {
        "UB302"
    }
}

/// The entry script could not run, or ran and failed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScriptExecutionError {
    #[error("interpreter for environment '{environment}' not found at {}", .path.display())]
    MissingInterpreter { environment: String, path: PathBuf },
    #[error("failed to start {} in environment '{environment}': {reason}", .script.display())]
    Spawn {
        environment: String,
        script: PathBuf,
        reason: String,
    },
    #[error("{} exited with status {code}", .script.display())]
    Exited { script: PathBuf, code: i32 },
}

impl ScriptExecutionError {
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingInterpreter { .. } | Self::Spawn { .. } => "UB401",
            Self::Exited { .. } => "UB402",
        }
    }
}
