//! Error handling and exit codes.

use algorace_core::constants::exit_codes;
use algorace_core::RaceError;
use algorace_orchestration::report::RaceReport;

/// Exit code for a race error.
pub fn handle_error(err: &RaceError) -> i32 {
    match err {
        RaceError::Config(_)
        | RaceError::NoWorkers
        | RaceError::DuplicateWorker(_)
        | RaceError::UnknownWorker(_) => exit_codes::ERROR_CONFIG,
        RaceError::Cancelled => exit_codes::ERROR_CANCELED,
        RaceError::Mismatch(_) => exit_codes::ERROR_MISMATCH,
        RaceError::InvalidProgress { .. }
        | RaceError::AlreadyRecorded(_)
        | RaceError::Workload { .. }
        | RaceError::Render(_) => exit_codes::ERROR_GENERIC,
    }
}

/// Exit code for an application error; race errors keep their own code.
pub fn exit_code(err: &anyhow::Error) -> i32 {
    err.downcast_ref::<RaceError>()
        .map_or(exit_codes::ERROR_GENERIC, handle_error)
}

/// Exit code for a race that ran to the end.
///
/// An interrupt wins over everything else, then cross-validation
/// mismatches, then workers that did not finish.
pub fn report_exit_code(report: &RaceReport, interrupted: bool) -> i32 {
    if interrupted {
        exit_codes::ERROR_CANCELED
    } else if !report.mismatches.is_empty() {
        exit_codes::ERROR_MISMATCH
    } else if report.has_dnf() {
        exit_codes::ERROR_DNF
    } else {
        exit_codes::SUCCESS
    }
}
