//! Common result and error types for the Aion toolchain.

/// The standard result type for fallible internal operations.
///
/// `Err` means a compiler invariant was broken (a bug upstream or in the pass
/// itself), never a problem in the user's design. User-facing problems go to
/// the [`DiagnosticSink`](aion_diagnostics) and the operation still returns `Ok`.
pub type AionResult<T> = Result<T, InternalError>;

/// An internal compiler error that aborts the current compilation run.
#[derive(Debug, thiserror::Error)]
#[error("internal compiler error: {message}")]
pub struct InternalError {
    /// Description of the violated invariant.
    pub message: String,
}

impl InternalError {
    /// Creates a new internal error with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Creates an error for a tree node kind a pass was never designed to see.
    pub fn unexpected(pass: &str, what: impl std::fmt::Display) -> Self {
        Self::new(format!("{pass}: unexpected {what}"))
    }
}

impl From<String> for InternalError {
    fn from(message: String) -> Self {
        Self { message }
    }
}
