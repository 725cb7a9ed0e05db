//! Diagnostic codes for the coverage pass.
//!
//! The pass has a single user-visible failure, `F300`, raised when toggle
//! expansion meets a data type it cannot decompose into bit lanes.

use aion_diagnostics::{Category, Diagnostic, DiagnosticCode};
use aion_source::Span;

/// Unsupported data type reached toggle coverage expansion.
pub const F300: DiagnosticCode = DiagnosticCode {
    category: Category::Fatal,
    number: 300,
};

/// Creates the fatal diagnostic for a variable whose type cannot be toggle-covered.
pub fn fatal_unsupported_toggle_type(var_name: &str, type_kind: &str, span: Span) -> Diagnostic {
    Diagnostic::fatal(
        F300,
        format!("unexpected data type in toggle coverage of `{var_name}`: {type_kind}"),
        span,
    )
    .with_note("toggle coverage decomposes vectors, arrays, structs and unions only")
}
