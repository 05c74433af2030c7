//! Single exit point for every diagnostic the engine produces.
//!
//! The sink consults the `ignore` flags of the settings file before doing
//! anything: an ignored severity is dropped without writing, buffering, or
//! logging. Errors and warnings go to the error stream, info to the output
//! stream.

use std::io::{self, Write};
use std::sync::{Arc, Mutex, PoisonError};

use tracing::trace;
use uber_domain::{settings::Severity, SettingsConfig};

/// Decorates a rendered diagnostic line, e.g. with terminal colours.
pub trait Painter: Send + Sync {
    fn paint(&self, severity: Severity, line: &str) -> String;
}

pub struct PlainPainter;

impl Painter for PlainPainter {
    fn paint(&self, _severity: Severity, line: &str) -> String {
        line.to_string()
    }
}

pub type SharedWriter = Arc<Mutex<dyn Write + Send>>;

/// Output and error streams the sink writes to.
#[derive(Clone)]
pub struct DiagnosticStreams {
    out: SharedWriter,
    err: SharedWriter,
}

impl DiagnosticStreams {
    pub fn new(out: SharedWriter, err: SharedWriter) -> Self {
        Self { out, err }
    }

    /// Info to stdout, warnings and errors to stderr.
    pub fn stdio() -> Self {
        Self::new(
            Arc::new(Mutex::new(io::stdout())),
            Arc::new(Mutex::new(io::stderr())),
        )
    }

    /// Everything to stderr, keeping stdout free for machine output.
    pub fn stderr_only() -> Self {
        let err: SharedWriter = Arc::new(Mutex::new(io::stderr()));
        Self::new(err.clone(), err)
    }

    fn for_severity(&self, severity: Severity) -> &SharedWriter {
        match severity {
            Severity::Info => &self.out,
            Severity::Error | Severity::Warning => &self.err,
        }
    }
}

pub struct MessageSink {
    settings: SettingsConfig,
    painter: Arc<dyn Painter>,
    streams: DiagnosticStreams,
}

impl MessageSink {
    pub fn new(
        settings: SettingsConfig,
        painter: Arc<dyn Painter>,
        streams: DiagnosticStreams,
    ) -> Self {
        Self {
            settings,
            painter,
            streams,
        }
    }

    pub fn settings(&self) -> &SettingsConfig {
        &self.settings
    }

    pub fn emit(&self, severity: Severity, text: &str) {
        if self.settings.ignores(severity) {
            return;
        }
        trace!(%severity, text, "diagnostic");
        let line = match severity {
            Severity::Info => text.to_string(),
            Severity::Warning | Severity::Error => format!("{severity}: {text}"),
        };
        let line = self.painter.paint(severity, &line);
        let mut stream = self
            .streams
            .for_severity(severity)
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let _ = writeln!(stream, "{line}");
        let _ = stream.flush();
    }

    pub fn error(&self, text: impl AsRef<str>) {
        self.emit(Severity::Error, text.as_ref());
    }

    pub fn warning(&self, text: impl AsRef<str>) {
        self.emit(Severity::Warning, text.as_ref());
    }

    pub fn info(&self, text: impl AsRef<str>) {
        self.emit(Severity::Info, text.as_ref());
    }
}
