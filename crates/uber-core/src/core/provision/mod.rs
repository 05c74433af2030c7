//! Bringing every registered environment to its declared state.
//!
//! Environments are provisioned one after another in registry order, and
//! each environment's dependencies in manifest order. A unit that fails is
//! recorded in the [`ProvisionReport`] and reported as a warning; its
//! siblings still run.

mod report;

use tracing::debug;
use uber_domain::{DependencySpec, EnvironmentRegistry, RegisteredEnvironment};

pub use report::ProvisionReport;

use crate::effects::EnvironmentManager;
use crate::errors::EnvCreationError;
use crate::sink::MessageSink;

pub struct Provisioner<'a> {
    manager: &'a dyn EnvironmentManager,
    sink: &'a MessageSink,
}

impl<'a> Provisioner<'a> {
    pub fn new(manager: &'a dyn EnvironmentManager, sink: &'a MessageSink) -> Self {
        Self { manager, sink }
    }

    pub fn provision(&self, registry: &EnvironmentRegistry) -> ProvisionReport {
        let mut report = ProvisionReport::default();
        for env in registry.environments() {
            self.provision_environment(env, &mut report);
        }
        debug!(
            environments_ok = report.succeeded_environments.len(),
            environments_failed = report.failed_environments.len(),
            dependencies_ok = report.succeeded_dependencies.len(),
            dependencies_failed = report.failed_dependencies.len(),
            "provisioning finished"
        );
        report
    }

    fn provision_environment(&self, env: &RegisteredEnvironment, report: &mut ProvisionReport) {
        let name = env.name();
        if let Err(err) = self.ensure_environment(name) {
            debug!(env = name, error = %err, "environment creation failed");
            let skipped = env.dependencies().len();
            if skipped == 0 {
                self.sink.warning(format!("[{}] {err}", err.code()));
            } else {
                self.sink.warning(format!(
                    "[{}] {err}; skipping its {skipped} dependencies",
                    err.code()
                ));
            }
            report.failed_environments.insert(name.to_string(), err);
            return;
        }
        report.succeeded_environments.insert(name.to_string());

        for dependency in env.dependencies() {
            self.provision_dependency(name, dependency, report);
        }
    }

    fn ensure_environment(&self, name: &str) -> Result<(), EnvCreationError> {
        if self.manager.exists(name) {
            debug!(env = name, "environment already exists");
            self.sink.info(format!("Virtual environment '{name}' already exists."));
            return Ok(());
        }
        self.sink.info(format!("Creating virtual environment: {name}"));
        self.manager.create(name)?;
        self.sink.info(format!("Virtual environment '{name}' created successfully."));
        Ok(())
    }

    fn provision_dependency(
        &self,
        env: &str,
        dependency: &DependencySpec,
        report: &mut ProvisionReport,
    ) {
        let key = (env.to_string(), dependency.package.clone());
        if self.manager.is_installed(env, dependency) {
            debug!(env, package = %dependency.package, "dependency already satisfied");
            self.sink.info(format!(
                "Dependency '{}' already installed in '{env}'. Skipping.",
                dependency.package
            ));
            report.succeeded_dependencies.insert(key);
            return;
        }

        self.sink.info(format!("Installing {dependency} in {env}"));
        match self.manager.install(env, dependency) {
            Ok(()) => {
                self.sink.info(format!("Successfully installed {dependency} in {env}."));
                report.succeeded_dependencies.insert(key);
            }
            Err(err) => {
                debug!(env, package = %dependency.package, error = %err, "install failed");
                self.sink.warning(format!("[{}] {err}", err.code()));
                report.failed_dependencies.insert(key, err);
            }
        }
    }
}
