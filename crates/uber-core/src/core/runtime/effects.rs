use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use uber_domain::DependencySpec;

use super::errors::{EnvCreationError, InstallError, ScriptExecutionError};
use super::venv::VirtualenvManager;

/// Creates, populates, and runs isolated environments by name.
///
/// Every call names its environment explicitly; implementations never rely
/// on an "activated" environment.
pub trait EnvironmentManager: Send + Sync {
    fn exists(&self, env: &str) -> bool;
    fn create(&self, env: &str) -> Result<(), EnvCreationError>;
    /// Whether `dependency` is already satisfied inside `env`.
    fn is_installed(&self, env: &str, dependency: &DependencySpec) -> bool;
    fn install(&self, env: &str, dependency: &DependencySpec) -> Result<(), InstallError>;
    /// Runs `script` with the environment's interpreter, inheriting the
    /// standard streams, and returns its exit code.
    fn run(&self, env: &str, script: &Path) -> Result<i32, ScriptExecutionError>;
}

pub trait FileSystem: Send + Sync {
    /// Reads a whole file; `Ok(None)` when it does not exist.
    fn read_bytes(&self, path: &Path) -> Result<Option<Vec<u8>>>;
    fn is_file(&self, path: &Path) -> bool;
}

pub trait Effects: Send + Sync {
    fn environments(&self) -> &dyn EnvironmentManager;
    fn fs(&self) -> &dyn FileSystem;
}

pub struct SystemEffects {
    environments: Arc<VirtualenvManager>,
    fs: Arc<SystemFileSystem>,
}

impl SystemEffects {
    /// Effects for a project whose environments live under `project_dir`.
    #[must_use]
    pub fn new(project_dir: PathBuf) -> Self {
        Self {
            environments: Arc::new(VirtualenvManager::new(project_dir)),
            fs: Arc::new(SystemFileSystem),
        }
    }
}

impl Effects for SystemEffects {
    fn environments(&self) -> &dyn EnvironmentManager {
        self.environments.as_ref()
    }

    fn fs(&self) -> &dyn FileSystem {
        self.fs.as_ref()
    }
}

struct SystemFileSystem;

impl FileSystem for SystemFileSystem {
    fn read_bytes(&self, path: &Path) -> Result<Option<Vec<u8>>> {
        match std::fs::read(path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err).with_context(|| format!("reading {}", path.display())),
        }
    }

    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }
}

pub type SharedEffects = Arc<dyn Effects>;
