use color_eyre::Result;
use tracing::debug;
use uber_core::{CommandInfo, ExecutionOutcome};

#[derive(Clone, Copy, Debug)]
pub struct OutputOptions {
    pub json: bool,
}

/// Prints the final outcome and returns the process exit code.
///
/// Human output is already written through the message sink while the
/// command runs, so only the JSON envelope is printed here.
pub fn emit_output(
    opts: &OutputOptions,
    info: CommandInfo,
    outcome: &ExecutionOutcome,
) -> Result<i32> {
    let code = outcome.exit_code();
    debug!(
        status = ?outcome.status,
        code,
        message = %uber_core::format_status_message(info, &outcome.message),
        "command finished"
    );
    if opts.json {
        let payload = uber_core::to_json_response(info, outcome, code);
        println!("{}", serde_json::to_string_pretty(&payload)?);
    }
    Ok(code)
}
