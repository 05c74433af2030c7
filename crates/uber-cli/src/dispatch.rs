use color_eyre::{eyre::eyre, Result};
use uber_core::{CommandContext, CommandGroup, CommandInfo, ExecutionOutcome};

use crate::cli::CommandGroupCli;

pub fn dispatch_command(
    ctx: &CommandContext,
    group: CommandGroupCli,
) -> Result<(CommandInfo, ExecutionOutcome)> {
    match group {
        CommandGroupCli::Info => {
            let info = CommandInfo::new(CommandGroup::Info, "info");
            core_call(info, || uber_core::project_info(ctx))
        }
        CommandGroupCli::Run => {
            let info = CommandInfo::new(CommandGroup::Run, "run");
            core_call(info, || uber_core::run_project(ctx))
        }
    }
}

fn core_call<F>(info: CommandInfo, call: F) -> Result<(CommandInfo, ExecutionOutcome)>
where
    F: FnOnce() -> anyhow::Result<ExecutionOutcome>,
{
    let outcome = call().map_err(|err| eyre!("{err:?}"))?;
    Ok((info, outcome))
}
