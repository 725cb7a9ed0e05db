//! Conversion between mangled and display forms of hierarchical names.
//!
//! Inlining flattens submodule signals into their parent, joining the path
//! components with [`HIER_SEPARATOR`] so the result is still a legal
//! identifier. Reports and name-policy checks work on the dotted form.

use std::borrow::Cow;

/// Separator used in mangled names in place of `.`.
pub const HIER_SEPARATOR: &str = "__DOT__";

/// Returns the user-facing form of a mangled name (`u_core__DOT__q` → `u_core.q`).
pub fn pretty_name(raw: &str) -> Cow<'_, str> {
    if raw.contains(HIER_SEPARATOR) {
        Cow::Owned(raw.replace(HIER_SEPARATOR, "."))
    } else {
        Cow::Borrowed(raw)
    }
}
