use std::process::ExitCode;

/// Process exit status of a `resxdup` run.
///
/// - `Success` (0): every compilation was scanned and no value is shared
/// - `Failure` (1): at least one duplicate value was reported
/// - `Error` (2): loading failed (toolchain, config, solution) or compilations
///   could not be retrieved
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ExitStatus {
    Success,
    /// Duplicate resource values were reported.
    Failure,
    /// Fatal load error, or `Unable to get compilations`.
    Error,
}

impl ExitStatus {
    /// Status for a finished scan that reported `duplicate_groups` groups.
    pub fn from_duplicates(duplicate_groups: usize) -> Self {
        if duplicate_groups == 0 {
            ExitStatus::Success
        } else {
            ExitStatus::Failure
        }
    }
}

impl From<ExitStatus> for ExitCode {
    fn from(status: ExitStatus) -> Self {
        let code = match status {
            ExitStatus::Success => 0,
            ExitStatus::Failure => 1,
            ExitStatus::Error => 2,
        };
        ExitCode::from(code)
    }
}
