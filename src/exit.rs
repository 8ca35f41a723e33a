// src/exit.rs
//! Process exit codes for `depfence`.
//!
//! Provides a stable contract for CI scripts.

use std::process::Termination;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum DepfenceExit {
    /// Evaluation completed and nothing crossed the failure threshold.
    Success = 0,
    /// Generic error (e.g. IO).
    Error = 1,
    /// Rule set, graph document or configuration is invalid.
    InvalidInput = 2,
    /// Violations at or above the configured severity were found.
    CheckFailed = 6,
}

impl DepfenceExit {
    #[must_use]
    pub fn code(self) -> i32 {
        self as i32
    }

    /// Maps an error chain to an exit code: invalid input anywhere in the
    /// chain wins over a generic failure.
    #[must_use]
    pub fn from_error(error: &anyhow::Error) -> Self {
        let invalid = error
            .chain()
            .filter_map(|cause| cause.downcast_ref::<crate::error::DepfenceError>())
            .any(crate::error::DepfenceError::is_invalid_input);
        if invalid {
            Self::InvalidInput
        } else {
            Self::Error
        }
    }
}

impl Termination for DepfenceExit {
    fn report(self) -> std::process::ExitCode {
        #[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
        std::process::ExitCode::from(self.code() as u8)
    }
}
