use std::process::ExitCode;

/// Exit status for the CLI.
///
/// - `Success` (0): The run completed, possibly with warnings or pending entries
/// - `Error` (2): The run was aborted (invalid project, config error, missing API key, etc.)
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ExitStatus {
    /// The run completed.
    Success,
    /// The run was aborted by a top-level error.
    Error,
}

impl From<ExitStatus> for ExitCode {
    fn from(status: ExitStatus) -> Self {
        match status {
            ExitStatus::Success => ExitCode::from(0),
            ExitStatus::Error => ExitCode::from(2),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_code_values() {
        assert_eq!(ExitCode::from(ExitStatus::Success), ExitCode::from(0));
        assert_eq!(ExitCode::from(ExitStatus::Error), ExitCode::from(2));
    }
}
