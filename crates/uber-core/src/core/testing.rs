//! In-memory effects for exercising the engine without Python.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use anyhow::{anyhow, Result};
use uber_domain::DependencySpec;

use crate::effects::{Effects, EnvironmentManager, FileSystem};
use crate::errors::{EnvCreationError, InstallError, ScriptExecutionError};

/// Environment manager that records every call it receives.
#[derive(Default)]
pub(crate) struct FakeEnvironments {
    pub(crate) existing: HashSet<String>,
    pub(crate) installed: HashSet<(String, String)>,
    pub(crate) broken_envs: HashSet<String>,
    pub(crate) broken_packages: HashSet<String>,
    pub(crate) exit_code: i32,
    pub(crate) spawn_failure: Option<String>,
    calls: Mutex<Vec<String>>,
}

impl FakeEnvironments {
    pub(crate) fn with_existing(mut self, env: &str) -> Self {
        self.existing.insert(env.to_string());
        self
    }

    pub(crate) fn with_installed(mut self, env: &str, package: &str) -> Self {
        self.installed.insert((env.to_string(), package.to_string()));
        self
    }

    pub(crate) fn with_broken_env(mut self, env: &str) -> Self {
        self.broken_envs.insert(env.to_string());
        self
    }

    pub(crate) fn with_broken_package(mut self, package: &str) -> Self {
        self.broken_packages.insert(package.to_string());
        self
    }

    pub(crate) fn with_exit_code(mut self, code: i32) -> Self {
        self.exit_code = code;
        self
    }

    pub(crate) fn with_spawn_failure(mut self, reason: &str) -> Self {
        self.spawn_failure = Some(reason.to_string());
        self
    }

    pub(crate) fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

impl EnvironmentManager for FakeEnvironments {
    fn exists(&self, env: &str) -> bool {
        self.existing.contains(env)
    }

    fn create(&self, env: &str) -> Result<(), EnvCreationError> {
        self.record(format!("create {env}"));
        if self.broken_envs.contains(env) {
            return Err(EnvCreationError::new(env, "venv module unavailable"));
        }
        Ok(())
    }

    fn is_installed(&self, env: &str, dependency: &DependencySpec) -> bool {
        self.installed
            .contains(&(env.to_string(), dependency.package.clone()))
    }

    fn install(&self, env: &str, dependency: &DependencySpec) -> Result<(), InstallError> {
        let requirement = dependency.pip_requirement();
        self.record(format!("install {env} {requirement}"));
        if self.broken_packages.contains(&dependency.package) {
            return Err(InstallError::new(env, requirement, "no matching distribution"));
        }
        Ok(())
    }

    fn run(&self, env: &str, script: &Path) -> Result<i32, ScriptExecutionError> {
        self.record(format!("run {env} {}", script.display()));
        if let Some(reason) = &self.spawn_failure {
            return Err(ScriptExecutionError::Spawn {
                environment: env.to_string(),
                script: script.to_path_buf(),
                reason: reason.clone(),
            });
        }
        Ok(self.exit_code)
    }
}

/// File system backed by a map of path to contents.
#[derive(Default)]
pub(crate) struct MemoryFileSystem {
    files: HashMap<PathBuf, Vec<u8>>,
    unreadable: HashSet<PathBuf>,
}

impl MemoryFileSystem {
    pub(crate) fn with_file(mut self, path: impl Into<PathBuf>, contents: &[u8]) -> Self {
        self.files.insert(path.into(), contents.to_vec());
        self
    }

    pub(crate) fn with_unreadable(mut self, path: impl Into<PathBuf>) -> Self {
        self.unreadable.insert(path.into());
        self
    }
}

impl FileSystem for MemoryFileSystem {
    fn read_bytes(&self, path: &Path) -> Result<Option<Vec<u8>>> {
        if self.unreadable.contains(path) {
            return Err(anyhow!("reading {}: permission denied", path.display()));
        }
        Ok(self.files.get(path).cloned())
    }

    fn is_file(&self, path: &Path) -> bool {
        self.files.contains_key(path)
    }
}

pub(crate) struct FakeEffects {
    pub(crate) environments: Arc<FakeEnvironments>,
    pub(crate) fs: MemoryFileSystem,
}

impl Effects for FakeEffects {
    fn environments(&self) -> &dyn EnvironmentManager {
        self.environments.as_ref()
    }

    fn fs(&self) -> &dyn FileSystem {
        &self.fs
    }
}
