use crate::cli::Command;
use std::env;

/// Execution contexts that influence how logging is routed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExecutionContext {
    /// Files are written to disk; the console is free for logs.
    LocalDev,
    /// Payload bytes go to stdout, so logs must stay off it.
    Piped,
    /// Console logging disabled via `HEADER_STAMP_QUIET=1`.
    Quiet,
}

impl ExecutionContext {
    /// Returns `true` when console sinks should be disabled.
    pub fn disables_console(self) -> bool {
        matches!(self, ExecutionContext::Quiet)
    }
}

/// Derive the active execution context from a parsed CLI command plus overrides.
pub fn detect_context(command: &Command) -> ExecutionContext {
    if quiet_override_enabled() {
        return ExecutionContext::Quiet;
    }

    if command.writes_payload_to_stdout() {
        ExecutionContext::Piped
    } else {
        ExecutionContext::LocalDev
    }
}

fn quiet_override_enabled() -> bool {
    env::var("HEADER_STAMP_QUIET")
        .map(|value| value.trim() == "1")
        .unwrap_or(false)
}
