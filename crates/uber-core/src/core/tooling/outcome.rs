use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Result of one command invocation, rendered by the CLI.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionOutcome {
    pub status: CommandStatus,
    pub message: String,
    #[serde(default)]
    pub details: Value,
}

impl ExecutionOutcome {
    pub fn success(message: impl Into<String>, details: Value) -> Self {
        Self {
            status: CommandStatus::Ok,
            message: message.into(),
            details,
        }
    }

    pub fn failure(message: impl Into<String>, details: Value) -> Self {
        Self {
            status: CommandStatus::Failure,
            message: message.into(),
            details,
        }
    }

    pub fn user_error(message: impl Into<String>, details: Value) -> Self {
        Self {
            status: CommandStatus::UserError,
            message: message.into(),
            details,
        }
    }

    /// Exit code reported by the entry script, when one ran.
    #[must_use]
    pub fn script_exit_code(&self) -> Option<i32> {
        self.details
            .get("exit_code")
            .and_then(Value::as_i64)
            .and_then(|code| i32::try_from(code).ok())
    }

    /// Process exit code for this outcome: the script's own status when it
    /// ran, otherwise `0`, `1` for load/validation errors, `2` for
    /// provisioning or execution failures.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        if let Some(code) = self.script_exit_code() {
            return code;
        }
        match self.status {
            CommandStatus::Ok => 0,
            CommandStatus::UserError => 1,
            CommandStatus::Failure => 2,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum CommandStatus {
    Ok,
    UserError,
    Failure,
}
