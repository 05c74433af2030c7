use indexmap::IndexMap;
use serde::Serialize;
use tracing::debug;

use crate::manifest::{DependencySpec, EnvironmentSpec, Manifest};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("more than one environment is marked as main: {}", .names.join(", "))]
    MultipleMainEnvironments { names: Vec<String> },
    #[error("no environment in `venv-configs` is marked as main")]
    NoMainEnvironment,
    #[error("dependency '{package}' is assigned to unknown environment '{environment}'")]
    UnknownEnvironmentReference { package: String, environment: String },
}

impl RegistryError {
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::MultipleMainEnvironments { .. } => "UB201",
            Self::NoMainEnvironment => "UB202",
            Self::UnknownEnvironmentReference { .. } => "UB203",
        }
    }
}

/// An environment together with the dependencies assigned to it, in
/// manifest order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegisteredEnvironment {
    spec: EnvironmentSpec,
    dependencies: Vec<DependencySpec>,
}

impl RegisteredEnvironment {
    pub fn name(&self) -> &str {
        &self.spec.name
    }

    pub fn is_main(&self) -> bool {
        self.spec.is_main
    }

    pub fn spec(&self) -> &EnvironmentSpec {
        &self.spec
    }

    pub fn dependencies(&self) -> &[DependencySpec] {
        &self.dependencies
    }
}

/// Environments derived from a [`Manifest`], keyed by name.
///
/// Built once and never mutated; a changed manifest means building a new
/// registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnvironmentRegistry {
    environments: IndexMap<String, RegisteredEnvironment>,
    main: String,
}

impl EnvironmentRegistry {
    /// Derives the registry, checking the main-environment invariant before
    /// dependency references.
    pub fn build(manifest: &Manifest) -> Result<Self, RegistryError> {
        let mains: Vec<String> = manifest
            .environments()
            .filter(|env| env.is_main)
            .map(|env| env.name.clone())
            .collect();
        let main = match <[String; 1]>::try_from(mains) {
            Ok([main]) => main,
            Err(mains) if mains.is_empty() => return Err(RegistryError::NoMainEnvironment),
            Err(names) => return Err(RegistryError::MultipleMainEnvironments { names }),
        };

        let mut environments: IndexMap<String, RegisteredEnvironment> = manifest
            .environments()
            .map(|spec| {
                (
                    spec.name.clone(),
                    RegisteredEnvironment {
                        spec: spec.clone(),
                        dependencies: Vec::new(),
                    },
                )
            })
            .collect();

        for dep in manifest.dependencies() {
            let Some(env) = environments.get_mut(&dep.environment) else {
                return Err(RegistryError::UnknownEnvironmentReference {
                    package: dep.package.clone(),
                    environment: dep.environment.clone(),
                });
            };
            env.dependencies.push(dep.clone());
        }

        debug!(
            environments = environments.len(),
            main = %main,
            "built environment registry"
        );
        Ok(Self { environments, main })
    }

    pub fn main_environment_name(&self) -> &str {
        &self.main
    }

    pub fn main_environment(&self) -> &RegisteredEnvironment {
        &self.environments[self.main.as_str()]
    }

    /// Environments in manifest order.
    pub fn environments(&self) -> impl Iterator<Item = &RegisteredEnvironment> {
        self.environments.values()
    }

    pub fn get(&self, name: &str) -> Option<&RegisteredEnvironment> {
        self.environments.get(name)
    }

    pub fn len(&self) -> usize {
        self.environments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.environments.is_empty()
    }
}
