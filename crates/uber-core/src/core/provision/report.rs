use indexmap::{IndexMap, IndexSet};
use serde_json::{json, Value};

use crate::errors::{EnvCreationError, InstallError};

/// `(environment, package)` pair identifying one installation.
pub type DependencyKey = (String, String);

/// What a provisioning pass achieved, in the order units were attempted.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ProvisionReport {
    pub succeeded_environments: IndexSet<String>,
    pub failed_environments: IndexMap<String, EnvCreationError>,
    pub succeeded_dependencies: IndexSet<DependencyKey>,
    pub failed_dependencies: IndexMap<DependencyKey, InstallError>,
}

impl ProvisionReport {
    /// An environment is usable when it exists and none of its declared
    /// dependencies failed to install.
    #[must_use]
    pub fn environment_usable(&self, env: &str) -> bool {
        self.succeeded_environments.contains(env)
            && !self.failed_dependencies.keys().any(|(owner, _)| owner == env)
    }

    #[must_use]
    pub fn has_failures(&self) -> bool {
        !self.failed_environments.is_empty() || !self.failed_dependencies.is_empty()
    }

    /// Machine-readable summary for the `--json` envelope.
    #[must_use]
    pub fn details(&self) -> Value {
        let failed_environments: Vec<Value> = self
            .failed_environments
            .iter()
            .map(|(name, err)| {
                json!({
                    "environment": name,
                    "code": err.code(),
                    "reason": err.reason,
                })
            })
            .collect();
        let succeeded_dependencies: Vec<Value> = self
            .succeeded_dependencies
            .iter()
            .map(|(env, package)| json!({ "environment": env, "package": package }))
            .collect();
        let failed_dependencies: Vec<Value> = self
            .failed_dependencies
            .iter()
            .map(|((env, package), err)| {
                json!({
                    "environment": env,
                    "package": package,
                    "code": err.code(),
                    "requirement": err.requirement,
                    "reason": err.reason,
                })
            })
            .collect();
        json!({
            "environments": {
                "succeeded": self.succeeded_environments,
                "failed": failed_environments,
            },
            "dependencies": {
                "succeeded": succeeded_dependencies,
                "failed": failed_dependencies,
            },
        })
    }
}
