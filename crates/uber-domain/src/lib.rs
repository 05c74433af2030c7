#![deny(clippy::all)]
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate
)]

//! Typed model of an `uber` project: the parsed manifest, the parsed
//! settings file, and the environment registry derived from them.
//!
//! Nothing in this crate touches the filesystem or spawns processes; callers
//! hand in raw bytes and get validated, immutable values back.

pub mod manifest;
pub mod registry;
pub mod settings;

pub use manifest::{
    DependencySpec, EnvironmentSpec, Manifest, ManifestError, ProjectInfo, VersionRequest,
    MANIFEST_FILE,
};
pub use registry::{EnvironmentRegistry, RegisteredEnvironment, RegistryError};
pub use settings::{IgnoreSettings, Severity, SettingsConfig, SettingsError, SETTINGS_FILE};
