use std::fmt;
use std::path::{Component, Path};
use std::str::FromStr;

use indexmap::IndexMap;
use pep440_rs::Version;
use pep508_rs::PackageName;
use serde::{Deserialize, Serialize};
use serde_json::error::Category;

/// File name of the project manifest inside a project directory.
pub const MANIFEST_FILE: &str = "uber";

/// Failures raised while turning raw manifest bytes into a [`Manifest`].
#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    #[error("manifest is not valid JSON: {source}")]
    Malformed { source: serde_json::Error },
    #[error("manifest does not match the expected schema: {message}")]
    SchemaViolation { message: String },
    #[error("dependency '{package}' is assigned to unknown environment '{environment}'")]
    UnknownEnvironmentReference { package: String, environment: String },
}

impl ManifestError {
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::Malformed { .. } => "UB101",
            Self::SchemaViolation { .. } => "UB102",
            Self::UnknownEnvironmentReference { .. } => "UB103",
        }
    }

    fn schema(message: impl Into<String>) -> Self {
        Self::SchemaViolation {
            message: message.into(),
        }
    }
}

impl From<serde_json::Error> for ManifestError {
    fn from(source: serde_json::Error) -> Self {
        match source.classify() {
            Category::Data => Self::schema(source.to_string()),
            Category::Io | Category::Syntax | Category::Eof => Self::Malformed { source },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectInfo {
    pub name: String,
    pub source_path: String,
    pub version: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnvironmentSpec {
    pub name: String,
    pub is_main: bool,
}

impl EnvironmentSpec {
    pub fn new(name: impl Into<String>, is_main: bool) -> Self {
        Self {
            name: name.into(),
            is_main,
        }
    }
}

/// Requested version of a dependency. An omitted version installs the latest
/// release the package index offers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VersionRequest {
    Latest,
    Exact(String),
}

impl VersionRequest {
    fn from_manifest(package: &str, raw: Option<String>) -> Result<Self, ManifestError> {
        match raw.map(|value| value.trim().to_string()) {
            Some(value) if !value.is_empty() && !value.eq_ignore_ascii_case("latest") => {
                Version::from_str(&value).map_err(|err| {
                    ManifestError::schema(format!(
                        "dependency '{package}' has invalid version '{value}': {err}"
                    ))
                })?;
                Ok(Self::Exact(value))
            }
            _ => Ok(Self::Latest),
        }
    }

    /// Whether an installed version fulfils the request. Versions compare
    /// after PEP 440 normalization, so `2.26` matches `2.26.0`.
    #[must_use]
    pub fn is_satisfied_by(&self, installed: &str) -> bool {
        match self {
            Self::Latest => true,
            Self::Exact(wanted) => {
                match (Version::from_str(wanted), Version::from_str(installed)) {
                    (Ok(wanted), Ok(installed)) => wanted == installed,
                    _ => wanted.as_str() == installed,
                }
            }
        }
    }

    #[must_use]
    pub fn exact(&self) -> Option<&str> {
        match self {
            Self::Latest => None,
            Self::Exact(version) => Some(version),
        }
    }
}

impl fmt::Display for VersionRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Latest => f.write_str("latest"),
            Self::Exact(version) => f.write_str(version),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DependencySpec {
    pub package: String,
    pub environment: String,
    pub version: VersionRequest,
}

impl DependencySpec {
    pub fn new(
        package: impl Into<String>,
        environment: impl Into<String>,
        version: VersionRequest,
    ) -> Self {
        Self {
            package: package.into(),
            environment: environment.into(),
            version,
        }
    }

    /// Requirement string understood by pip (`name` or `name==version`).
    #[must_use]
    pub fn pip_requirement(&self) -> String {
        match &self.version {
            VersionRequest::Latest => self.package.clone(),
            VersionRequest::Exact(version) => format!("{}=={version}", self.package),
        }
    }
}

impl fmt::Display for DependencySpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.package, self.version)
    }
}

/// Parsed and validated `uber` manifest.
///
/// Environments and dependencies keep the order in which the manifest lists
/// them; that order drives creation and installation order later on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Manifest {
    project: ProjectInfo,
    environments: IndexMap<String, EnvironmentSpec>,
    dependencies: IndexMap<String, DependencySpec>,
}

impl Manifest {
    /// Assembles a manifest from already-typed parts.
    ///
    /// Later entries with a duplicate name replace earlier ones. Dependency
    /// references are not checked here; [`Manifest::load`] and
    /// [`crate::EnvironmentRegistry::build`] both enforce them.
    pub fn new(
        project: ProjectInfo,
        environments: impl IntoIterator<Item = EnvironmentSpec>,
        dependencies: impl IntoIterator<Item = DependencySpec>,
    ) -> Self {
        Self {
            project,
            environments: environments
                .into_iter()
                .map(|env| (env.name.clone(), env))
                .collect(),
            dependencies: dependencies
                .into_iter()
                .map(|dep| (dep.package.clone(), dep))
                .collect(),
        }
    }

    /// Parses the raw bytes of an `uber` file.
    ///
    /// Unknown keys are ignored at every level. `venv-configs` and
    /// `dependencies` may be omitted; `project-info` and its three fields may
    /// not.
    pub fn load(bytes: &[u8]) -> Result<Self, ManifestError> {
        let raw: RawManifest = serde_json::from_slice(bytes)?;
        let project = raw
            .project_info
            .ok_or_else(|| ManifestError::schema("missing `project-info` table"))?
            .validate()?;

        let mut environments = IndexMap::with_capacity(raw.venv_configs.len());
        for (name, config) in raw.venv_configs {
            if name.trim().is_empty() {
                return Err(ManifestError::schema(
                    "`venv-configs` contains an environment with an empty name",
                ));
            }
            if !is_single_component(&name) {
                return Err(ManifestError::schema(format!(
                    "environment name '{name}' must be a single directory name"
                )));
            }
            let spec = EnvironmentSpec::new(name.clone(), config.main.unwrap_or(false));
            environments.insert(name, spec);
        }

        let mut dependencies = IndexMap::with_capacity(raw.dependencies.len());
        for (package, entry) in raw.dependencies {
            if package.trim().is_empty() {
                return Err(ManifestError::schema(
                    "`dependencies` contains a package with an empty name",
                ));
            }
            PackageName::new(package.clone()).map_err(|err| {
                ManifestError::schema(format!("invalid package name '{package}': {err}"))
            })?;
            if !environments.contains_key(&entry.venv) {
                return Err(ManifestError::UnknownEnvironmentReference {
                    package,
                    environment: entry.venv,
                });
            }
            let version = VersionRequest::from_manifest(&package, entry.version)?;
            let spec = DependencySpec::new(package.clone(), entry.venv, version);
            dependencies.insert(package, spec);
        }

        Ok(Self {
            project,
            environments,
            dependencies,
        })
    }

    pub fn project(&self) -> &ProjectInfo {
        &self.project
    }

    pub fn environments(&self) -> impl Iterator<Item = &EnvironmentSpec> {
        self.environments.values()
    }

    pub fn dependencies(&self) -> impl Iterator<Item = &DependencySpec> {
        self.dependencies.values()
    }

    pub fn environment(&self, name: &str) -> Option<&EnvironmentSpec> {
        self.environments.get(name)
    }
}

#[derive(Deserialize)]
struct RawManifest {
    #[serde(rename = "project-info")]
    project_info: Option<RawProjectInfo>,
    #[serde(rename = "venv-configs", default)]
    venv_configs: IndexMap<String, RawVenvConfig>,
    #[serde(default)]
    dependencies: IndexMap<String, RawDependency>,
}

#[derive(Deserialize)]
struct RawProjectInfo {
    #[serde(rename = "project-name")]
    project_name: Option<String>,
    #[serde(rename = "project-source")]
    project_source: Option<String>,
    version: Option<String>,
}

impl RawProjectInfo {
    fn validate(self) -> Result<ProjectInfo, ManifestError> {
        Ok(ProjectInfo {
            name: required("project-name", self.project_name)?,
            source_path: required("project-source", self.project_source)?,
            version: required("version", self.version)?,
        })
    }
}

/// Environment names become directories under the project root, so each one
/// must be exactly one normal path component.
fn is_single_component(name: &str) -> bool {
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(part)), None) if part == name
    )
}

fn required(field: &str, value: Option<String>) -> Result<String, ManifestError> {
    match value {
        Some(value) if !value.trim().is_empty() => Ok(value),
        Some(_) => Err(ManifestError::schema(format!(
            "`project-info.{field}` must not be empty"
        ))),
        None => Err(ManifestError::schema(format!(
            "missing `project-info.{field}`"
        ))),
    }
}

#[derive(Deserialize)]
struct RawVenvConfig {
    main: Option<bool>,
}

#[derive(Deserialize)]
struct RawDependency {
    venv: String,
    version: Option<String>,
}
