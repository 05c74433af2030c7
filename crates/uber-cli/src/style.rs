use std::env;

use color_eyre::owo_colors::OwoColorize;
use uber_core::{Painter, Severity};

pub struct Style {
    enabled: bool,
}

impl Style {
    pub fn new(force_no_color: bool, is_tty: bool) -> Self {
        let env_no_color = env::var_os("NO_COLOR").is_some();
        Self {
            enabled: !(force_no_color || env_no_color) && is_tty,
        }
    }

    fn tint(&self, text: &str, tone: Tone, bold: bool) -> String {
        if !self.enabled {
            return text.to_string();
        }
        match (tone, bold) {
            (Tone::Yellow, true) => text.yellow().bold().to_string(),
            (Tone::Yellow, false) => text.yellow().to_string(),
            (Tone::Red, true) => text.red().bold().to_string(),
            (Tone::Red, false) => text.red().to_string(),
            (Tone::Cyan, true) => text.cyan().bold().to_string(),
            (Tone::Cyan, false) => text.cyan().to_string(),
        }
    }
}

impl Painter for Style {
    fn paint(&self, severity: Severity, line: &str) -> String {
        match severity {
            Severity::Error => self.tint(line, Tone::Red, true),
            Severity::Warning => self.tint(line, Tone::Yellow, false),
            Severity::Info => self.tint(line, Tone::Cyan, false),
        }
    }
}

#[derive(Clone, Copy)]
enum Tone {
    Yellow,
    Red,
    Cyan,
}
