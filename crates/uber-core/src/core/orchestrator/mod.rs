//! Sequencing of one `info` or `run` invocation.
//!
//! Every invocation walks `Start -> ManifestLoaded -> RegistryBuilt` and then
//! either finishes (`info`) or provisions and executes the entry script
//! (`run`). The first fatal failure moves to `Failed`, is reported through
//! the sink, and becomes the returned [`ExecutionOutcome`].

use std::fmt;
use std::path::Path;

use anyhow::Result;
use serde_json::{json, Value};
use tracing::debug;
use uber_domain::{EnvironmentRegistry, Manifest, ProjectInfo, SettingsConfig};

use crate::context::CommandContext;
use crate::diagnostics;
use crate::errors::ScriptExecutionError;
use crate::outcome::{CommandStatus, ExecutionOutcome};
use crate::provision::Provisioner;
use crate::sink::MessageSink;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OrchestratorState {
    Start,
    ManifestLoaded,
    RegistryBuilt,
    Provisioned,
    Executed,
    ExecutionSkipped,
    Done,
    Failed,
}

impl OrchestratorState {
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Done | Self::Failed)
    }
}

impl fmt::Display for OrchestratorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Start => "start",
            Self::ManifestLoaded => "manifest-loaded",
            Self::RegistryBuilt => "registry-built",
            Self::Provisioned => "provisioned",
            Self::Executed => "executed",
            Self::ExecutionSkipped => "execution-skipped",
            Self::Done => "done",
            Self::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Project state available once the manifest and registry are in hand.
struct Loaded {
    sink: MessageSink,
    manifest: Manifest,
    registry: EnvironmentRegistry,
}

pub struct Orchestrator<'c, 'a> {
    ctx: &'c CommandContext<'a>,
    state: OrchestratorState,
}

impl<'c, 'a> Orchestrator<'c, 'a> {
    pub fn new(ctx: &'c CommandContext<'a>) -> Self {
        Self {
            ctx,
            state: OrchestratorState::Start,
        }
    }

    pub fn state(&self) -> OrchestratorState {
        self.state
    }

    /// Reports the project's metadata and main environment.
    pub fn info(&mut self) -> Result<ExecutionOutcome> {
        let loaded = match self.load() {
            Ok(loaded) => loaded,
            Err(outcome) => return Ok(outcome),
        };
        let project = loaded.manifest.project();
        let main = loaded.registry.main_environment_name();
        loaded.sink.info(format!("Project Name: {}", project.name));
        loaded.sink.info(format!("Project Source: {}", project.source_path));
        loaded.sink.info(format!("Version: {}", project.version));
        loaded.sink.info(format!("Main Venv: {main}"));
        self.transition(OrchestratorState::Done);

        let environments: Vec<&str> = loaded
            .registry
            .environments()
            .map(|env| env.name())
            .collect();
        Ok(ExecutionOutcome::success(
            format!("{} {}", project.name, project.version),
            json!({
                "project": project_details(project),
                "main_environment": main,
                "environments": environments,
            }),
        ))
    }

    /// Provisions every environment, then runs the entry script in the main
    /// environment when that environment is usable.
    pub fn run(&mut self) -> Result<ExecutionOutcome> {
        let loaded = match self.load() {
            Ok(loaded) => loaded,
            Err(outcome) => return Ok(outcome),
        };
        let Loaded {
            sink,
            manifest,
            registry,
        } = loaded;
        let environments = self.ctx.environments();
        let report = Provisioner::new(environments, &sink).provision(&registry);
        self.transition(OrchestratorState::Provisioned);

        let main = registry.main_environment_name();
        let source = manifest.project().source_path.as_str();
        let mut details = report.details();
        details["main_environment"] = json!(main);
        details["script"] = json!(source);

        if !report.environment_usable(main) {
            self.transition(OrchestratorState::ExecutionSkipped);
            let message = format!("main environment '{main}' is not usable; not running {source}");
            return Ok(self.abort(
                &sink,
                diagnostics::MAIN_ENVIRONMENT_UNUSABLE,
                message,
                CommandStatus::Failure,
                details,
            ));
        }

        let script = Path::new(source);
        let script_path = self.ctx.project_dir().join(script);
        if !self.ctx.fs().is_file(&script_path) {
            let message = format!("entry script {} does not exist", script_path.display());
            return Ok(self.abort(
                &sink,
                diagnostics::ENTRY_SCRIPT_MISSING,
                message,
                CommandStatus::Failure,
                details,
            ));
        }

        sink.info(format!("Running {source} with {main}"));
        match environments.run(main, script) {
            Ok(0) => {
                self.transition(OrchestratorState::Executed);
                self.transition(OrchestratorState::Done);
                details["exit_code"] = json!(0);
                Ok(ExecutionOutcome::success(format!("ran {source}"), details))
            }
            Ok(code) => {
                self.transition(OrchestratorState::Executed);
                details["exit_code"] = json!(code);
                let err = ScriptExecutionError::Exited {
                    script: script.to_path_buf(),
                    code,
                };
                Ok(self.abort(
                    &sink,
                    err.code(),
                    err.to_string(),
                    CommandStatus::Failure,
                    details,
                ))
            }
            Err(err) => {
                Ok(self.abort(&sink, err.code(), err.to_string(), CommandStatus::Failure, details))
            }
        }
    }

    /// Settings, manifest, and registry, in that order. The first failure is
    /// reported and returned as the outcome.
    fn load(&mut self) -> Result<Loaded, ExecutionOutcome> {
        let sink = self.sink()?;

        let manifest_path = self.ctx.manifest_path();
        let bytes = match self.ctx.fs().read_bytes(&manifest_path) {
            Ok(Some(bytes)) => bytes,
            Ok(None) => {
                let message = format!("no manifest found at {}", manifest_path.display());
                return Err(self.abort(
                    &sink,
                    diagnostics::MANIFEST_NOT_FOUND,
                    message,
                    CommandStatus::UserError,
                    json!({ "manifest": manifest_path.display().to_string() }),
                ));
            }
            Err(err) => {
                return Err(self.abort(
                    &sink,
                    diagnostics::READ_FAILED,
                    format!("{err:#}"),
                    CommandStatus::UserError,
                    json!({ "manifest": manifest_path.display().to_string() }),
                ));
            }
        };

        let manifest = match Manifest::load(&bytes) {
            Ok(manifest) => manifest,
            Err(err) => {
                return Err(self.abort(
                    &sink,
                    err.code(),
                    err.to_string(),
                    CommandStatus::UserError,
                    json!({ "manifest": manifest_path.display().to_string() }),
                ));
            }
        };
        self.transition(OrchestratorState::ManifestLoaded);

        let registry = match EnvironmentRegistry::build(&manifest) {
            Ok(registry) => registry,
            Err(err) => {
                return Err(self.abort(
                    &sink,
                    err.code(),
                    err.to_string(),
                    CommandStatus::UserError,
                    json!({}),
                ));
            }
        };
        self.transition(OrchestratorState::RegistryBuilt);

        Ok(Loaded {
            sink,
            manifest,
            registry,
        })
    }

    /// Builds the sink from the settings file. Settings problems are
    /// reported through an unfiltered sink since no filter could be read.
    fn sink(&mut self) -> Result<MessageSink, ExecutionOutcome> {
        let path = self.ctx.settings_path();
        let explicit = self.ctx.global.config.is_some();
        let details = json!({ "settings": path.display().to_string() });
        let loaded = match self.ctx.fs().read_bytes(&path) {
            Ok(None) if explicit => Err((
                diagnostics::SETTINGS_NOT_FOUND,
                format!("no settings file found at {}", path.display()),
            )),
            Ok(bytes) => SettingsConfig::load(bytes.as_deref())
                .map_err(|err| (err.code(), err.to_string())),
            Err(err) => Err((diagnostics::READ_FAILED, format!("{err:#}"))),
        };
        match loaded {
            Ok(settings) => {
                debug!(path = %path.display(), ?settings, "settings loaded");
                Ok(self.make_sink(settings))
            }
            Err((code, message)) => {
                let sink = self.make_sink(SettingsConfig::default());
                Err(self.abort(&sink, code, message, CommandStatus::UserError, details))
            }
        }
    }

    fn make_sink(&self, settings: SettingsConfig) -> MessageSink {
        MessageSink::new(settings, self.ctx.painter(), self.ctx.streams())
    }

    fn abort(
        &mut self,
        sink: &MessageSink,
        code: &str,
        message: String,
        status: CommandStatus,
        mut details: Value,
    ) -> ExecutionOutcome {
        sink.error(format!("[{code}] {message}"));
        self.transition(OrchestratorState::Failed);
        if let Value::Object(map) = &mut details {
            map.insert("code".to_string(), json!(code));
        }
        ExecutionOutcome {
            status,
            message,
            details,
        }
    }

    fn transition(&mut self, next: OrchestratorState) {
        debug!(
            from = %self.state,
            to = %next,
            terminal = next.is_terminal(),
            "orchestrator transition"
        );
        self.state = next;
    }
}

fn project_details(project: &ProjectInfo) -> Value {
    json!({
        "name": project.name,
        "source": project.source_path,
        "version": project.version,
    })
}

/// `uber info`: load, validate, and describe the project.
pub fn project_info(ctx: &CommandContext) -> Result<ExecutionOutcome> {
    Orchestrator::new(ctx).info()
}

/// `uber run`: provision every environment and run the entry script.
pub fn run_project(ctx: &CommandContext) -> Result<ExecutionOutcome> {
    Orchestrator::new(ctx).run()
}

#[cfg(test)]
mod tests;
