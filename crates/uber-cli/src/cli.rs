use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};

pub const UBER_BEFORE_HELP: &str = concat!(
    "uber ",
    env!("CARGO_PKG_VERSION"),
    " – Python environment bootstrapper\n\n",
    "\x1b[1;36mCommands\x1b[0m\n",
    "  info             Show the project declared in the `uber` manifest.\n",
    "  run              Create environments, install dependencies, run the entry script.\n",
);

#[derive(Parser, Debug)]
#[command(
    name = "uber",
    author,
    version,
    disable_help_subcommand = true,
    before_help = UBER_BEFORE_HELP
)]
pub struct UberCli {
    #[arg(
        short,
        long,
        action = ArgAction::Count,
        help = "Increase logging (-vv reaches trace)",
        global = true
    )]
    pub verbose: u8,
    #[arg(long, help = "Force trace logging regardless of -v", global = true)]
    pub trace: bool,
    #[arg(
        long,
        help = "Emit {status,message,details} JSON envelopes; the entry script still writes its own output to stdout",
        global = true
    )]
    pub json: bool,
    #[arg(long, help = "Disable colored output", global = true)]
    pub no_color: bool,
    #[arg(
        long,
        value_name = "PATH",
        help = "Settings file to use instead of <dir>/uber-config",
        global = true
    )]
    pub config: Option<PathBuf>,
    #[arg(
        long,
        value_name = "PATH",
        help = "Directory containing the `uber` manifest"
    )]
    pub dir: PathBuf,
    #[command(subcommand)]
    pub command: CommandGroupCli,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandGroupCli {
    #[command(about = "Print the project name, entry script, version, and main environment.")]
    Info,
    #[command(about = "Provision every environment, then run the entry script in the main one.")]
    Run,
}
