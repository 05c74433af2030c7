#![deny(clippy::all)]

//! Provisioning and execution engine behind the `uber` command line.

mod core;

pub(crate) use crate::core::config;
pub(crate) use crate::core::config::context;
pub(crate) use crate::core::provision;
pub(crate) use crate::core::python::python_sys;
pub(crate) use crate::core::runtime::{effects, errors};
pub(crate) use crate::core::tooling::{diagnostics, outcome, sink};

#[cfg(test)]
pub(crate) use crate::core::testing;

pub use crate::core::config::context::{CommandContext, CommandInfo};
pub use crate::core::config::GlobalOptions;
pub use crate::core::orchestrator::{project_info, run_project, Orchestrator, OrchestratorState};
pub use crate::core::provision::{ProvisionReport, Provisioner};
pub use crate::core::python::python_sys::RUNTIME_PYTHON_ENV;
pub use crate::core::runtime::effects::{
    Effects, EnvironmentManager, FileSystem, SharedEffects, SystemEffects,
};
pub use crate::core::runtime::errors::{EnvCreationError, InstallError, ScriptExecutionError};
pub use crate::core::runtime::process::RunOutput;
pub use crate::core::runtime::{format_status_message, to_json_response, CommandGroup};
pub use crate::core::tooling::diagnostics as diag_codes;
pub use crate::core::tooling::outcome::{CommandStatus, ExecutionOutcome};
pub use crate::core::tooling::sink::{
    DiagnosticStreams, MessageSink, Painter, PlainPainter, SharedWriter,
};
pub use uber_domain::{SettingsConfig, Severity};
