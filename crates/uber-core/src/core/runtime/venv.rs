use std::path::{Path, PathBuf};

use tracing::debug;
use uber_domain::DependencySpec;

use super::effects::EnvironmentManager;
use super::errors::{EnvCreationError, InstallError, ScriptExecutionError};
use super::process::{run_command, run_command_passthrough};
use crate::python_sys::detect_interpreter;

/// Environments backed by `python -m venv`, one directory per environment
/// under the project root, populated with the environment's own pip.
pub struct VirtualenvManager {
    root: PathBuf,
}

impl VirtualenvManager {
    #[must_use]
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn env_dir(&self, env: &str) -> PathBuf {
        self.root.join(env)
    }

    pub fn interpreter(&self, env: &str) -> PathBuf {
        env_python(&self.env_dir(env))
    }

    fn pip_args(args: &[&str]) -> Vec<String> {
        ["-m", "pip"]
            .iter()
            .chain(args)
            .map(ToString::to_string)
            .collect()
    }
}

#[cfg(windows)]
fn env_python(env_dir: &Path) -> PathBuf {
    env_dir.join("Scripts").join("python.exe")
}

#[cfg(not(windows))]
fn env_python(env_dir: &Path) -> PathBuf {
    env_dir.join("bin").join("python")
}

/// Extracts the `Version:` field from `pip show` output.
fn shown_version(stdout: &str) -> Option<&str> {
    stdout
        .lines()
        .find_map(|line| line.strip_prefix("Version:"))
        .map(str::trim)
}

/// Whether `pip show` output describes an install that fulfils `dependency`.
fn shown_install_satisfies(stdout: &str, dependency: &DependencySpec) -> bool {
    match (dependency.version.exact(), shown_version(stdout)) {
        (None, _) => true,
        (Some(_), Some(shown)) => dependency.version.is_satisfied_by(shown),
        (Some(_), None) => false,
    }
}

impl EnvironmentManager for VirtualenvManager {
    fn exists(&self, env: &str) -> bool {
        self.interpreter(env).is_file()
    }

    fn create(&self, env: &str) -> Result<(), EnvCreationError> {
        let python =
            detect_interpreter().map_err(|err| EnvCreationError::new(env, err.to_string()))?;
        let target = self.env_dir(env);
        debug!(env, python = %python.display(), target = %target.display(), "creating venv");
        let args = vec![
            "-m".to_string(),
            "venv".to_string(),
            target.display().to_string(),
        ];
        let output = run_command(&python, &args, &self.root)
            .map_err(|err| EnvCreationError::new(env, format!("{err:#}")))?;
        if !output.success() {
            return Err(EnvCreationError::new(env, output.failure_reason()));
        }
        if !self.exists(env) {
            return Err(EnvCreationError::new(
                env,
                format!("no interpreter at {}", self.interpreter(env).display()),
            ));
        }
        Ok(())
    }

    fn is_installed(&self, env: &str, dependency: &DependencySpec) -> bool {
        let python = self.interpreter(env);
        let args = Self::pip_args(&["show", dependency.package.as_str()]);
        let Ok(output) = run_command(&python, &args, &self.root) else {
            return false;
        };
        if !output.success() {
            return false;
        }
        shown_install_satisfies(&output.stdout, dependency)
    }

    fn install(&self, env: &str, dependency: &DependencySpec) -> Result<(), InstallError> {
        let python = self.interpreter(env);
        let requirement = dependency.pip_requirement();
        let args = Self::pip_args(&["install", requirement.as_str()]);
        debug!(env, requirement = %requirement, "pip install");
        let output = run_command(&python, &args, &self.root)
            .map_err(|err| InstallError::new(env, requirement.as_str(), format!("{err:#}")))?;
        debug!(env, stdout = %output.stdout.trim(), "pip install finished");
        if output.success() {
            Ok(())
        } else {
            Err(InstallError::new(env, requirement, output.failure_reason()))
        }
    }

    fn run(&self, env: &str, script: &Path) -> Result<i32, ScriptExecutionError> {
        let python = self.interpreter(env);
        if !python.is_file() {
            return Err(ScriptExecutionError::MissingInterpreter {
                environment: env.to_string(),
                path: python,
            });
        }
        debug!(env, script = %script.display(), "running entry script");
        run_command_passthrough(&python, &[script.display().to_string()], &self.root).map_err(
            |err| ScriptExecutionError::Spawn {
                environment: env.to_string(),
                script: script.to_path_buf(),
                reason: format!("{err:#}"),
            },
        )
    }
}
