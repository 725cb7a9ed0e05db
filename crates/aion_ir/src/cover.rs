//! Coverage declaration records created by the coverage pass and consumed by
//! the code generator, which numbers them and emits the counter arrays.

use aion_source::Span;
use serde::{Deserialize, Serialize};

/// The kind of coverage a declaration counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CoverCategory {
    /// Block, case-arm, `elsif` and half-branch line coverage.
    Line,
    /// Paired `if`/`else` branch coverage.
    Branch,
    /// Per-bit value transitions of a signal.
    Toggle,
    /// Explicit `cover` statements.
    User,
}

impl CoverCategory {
    /// The report page prefix for this category.
    pub fn page_prefix(self) -> &'static str {
        match self {
            CoverCategory::Line => "v_line",
            CoverCategory::Branch => "v_branch",
            CoverCategory::Toggle => "v_toggle",
            CoverCategory::User => "v_user",
        }
    }
}

/// One coverage point, owned by the module it instruments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverDecl {
    /// The coverage kind.
    pub category: CoverCategory,
    /// Report page, `<prefix>/<module display name>`.
    pub page: String,
    /// Dotted named-scope path for user coverage; empty otherwise.
    pub hier: String,
    /// Human-readable tag (`"if"`, `"case"`, `"[3]"`, ...).
    pub comment: String,
    /// Rendered line ranges, e.g. `"3-5,9"`.
    pub line_ranges: String,
    /// Column offset distinguishing points that share a source location.
    pub column_offset: u32,
    /// Location of the instrumented construct.
    pub span: Span,
}

impl CoverDecl {
    /// Returns the source line the report attributes this point to.
    pub fn line(&self) -> u32 {
        self.span.first_line
    }
}
