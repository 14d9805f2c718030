//! Exit code descriptions for command completion lines

/// Exit code reported when a process ended without one (killed by a signal)
pub const NO_EXIT_CODE: i32 = -1;

/// Describe how a command ended
///
/// A timed-out command is always reported as killed, whatever status the
/// operating system handed back after the kill.
pub fn describe_exit(exit_code: i32, timed_out: bool) -> &'static str {
    if timed_out {
        return "killed after timeout";
    }
    match exit_code {
        0 => "success",
        1 => "general error",
        126 => "command invoked cannot execute",
        127 => "command not found",
        128 => "invalid argument to exit",
        129..=255 => "terminated by signal",
        NO_EXIT_CODE => "terminated by signal",
        _ => "error",
    }
}
