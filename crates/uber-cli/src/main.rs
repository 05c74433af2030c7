use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use atty::Stream;
use clap::Parser;
use color_eyre::Result;
use uber_core::{CommandContext, GlobalOptions, SystemEffects};

mod cli;
mod dispatch;
mod output;
mod style;

use cli::UberCli;
use dispatch::dispatch_command;
use output::{emit_output, OutputOptions};
use style::Style;

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = UberCli::parse();
    init_tracing(cli.trace, cli.verbose);

    let global = GlobalOptions {
        verbose: cli.verbose,
        trace: cli.trace,
        json: cli.json,
        config: cli.config.as_ref().map(|p| p.to_string_lossy().to_string()),
    };

    let is_tty = atty::is(Stream::Stdout) && atty::is(Stream::Stderr);
    let style = Style::new(cli.no_color, is_tty);
    let project_dir = resolve_project_dir(&cli.dir);
    let effects = Arc::new(SystemEffects::new(project_dir.clone()));
    let ctx = CommandContext::new(&global, project_dir, effects).with_painter(Arc::new(style));

    let (info, outcome) = dispatch_command(&ctx, cli.command)?;
    let code = emit_output(&OutputOptions { json: cli.json }, info, &outcome)?;

    if code == 0 {
        Ok(())
    } else {
        std::process::exit(code);
    }
}

/// Absolute form of `--dir`; environments and the entry script are resolved
/// against it while child processes run inside it.
fn resolve_project_dir(dir: &Path) -> PathBuf {
    fs::canonicalize(dir).unwrap_or_else(|_| dir.to_path_buf())
}

fn init_tracing(trace: bool, verbose: u8) {
    let level = if trace {
        "trace"
    } else {
        match verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    let filter = format!("uber={level}");
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true)
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}
