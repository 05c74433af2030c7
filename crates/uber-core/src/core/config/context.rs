use std::path::{Path, PathBuf};
use std::sync::Arc;

use uber_domain::{MANIFEST_FILE, SETTINGS_FILE};

use crate::config::GlobalOptions;
use crate::effects::{self, Effects, SharedEffects};
use crate::sink::{DiagnosticStreams, Painter, PlainPainter};
use crate::CommandGroup;

#[derive(Clone, Copy, Debug)]
pub struct CommandInfo {
    pub group: CommandGroup,
    pub name: &'static str,
}

impl CommandInfo {
    #[must_use]
    pub const fn new(group: CommandGroup, name: &'static str) -> Self {
        Self { group, name }
    }
}

/// Everything a command needs for one invocation: global options, the
/// project directory, the external effects, and where diagnostics go.
pub struct CommandContext<'a> {
    pub global: &'a GlobalOptions,
    project_dir: PathBuf,
    effects: SharedEffects,
    painter: Arc<dyn Painter>,
    streams: DiagnosticStreams,
}

impl<'a> CommandContext<'a> {
    /// Creates a context rooted at `project_dir`.
    ///
    /// With `--json` the output stream carries the JSON envelope, so info
    /// messages are redirected to stderr alongside warnings and errors.
    pub fn new(global: &'a GlobalOptions, project_dir: PathBuf, effects: SharedEffects) -> Self {
        let streams = if global.json {
            DiagnosticStreams::stderr_only()
        } else {
            DiagnosticStreams::stdio()
        };
        Self {
            global,
            project_dir,
            effects,
            painter: Arc::new(PlainPainter),
            streams,
        }
    }

    #[must_use]
    pub fn with_painter(mut self, painter: Arc<dyn Painter>) -> Self {
        self.painter = painter;
        self
    }

    #[must_use]
    pub fn with_streams(mut self, streams: DiagnosticStreams) -> Self {
        self.streams = streams;
        self
    }

    pub fn effects(&self) -> &dyn Effects {
        self.effects.as_ref()
    }

    pub fn fs(&self) -> &dyn effects::FileSystem {
        self.effects.fs()
    }

    pub fn environments(&self) -> &dyn effects::EnvironmentManager {
        self.effects.environments()
    }

    pub fn painter(&self) -> Arc<dyn Painter> {
        self.painter.clone()
    }

    pub fn streams(&self) -> DiagnosticStreams {
        self.streams.clone()
    }

    pub fn project_dir(&self) -> &Path {
        &self.project_dir
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.project_dir.join(MANIFEST_FILE)
    }

    pub fn settings_path(&self) -> PathBuf {
        match &self.global.config {
            Some(path) => PathBuf::from(path),
            None => self.project_dir.join(SETTINGS_FILE),
        }
    }
}
