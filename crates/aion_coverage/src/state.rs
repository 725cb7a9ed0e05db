//! The save/restore coverage enablement context.
//!
//! A [`CheckState`] is a plain value: the visitor copies it before entering a
//! coverage scope and writes the copy back on every exit path, so changes
//! made inside a scope (a `$stop`, a `coverage_block_off`) never leak to
//! siblings.

use aion_config::CoverageConfig;
use aion_source::Span;

/// Opaque identifier of one entry into a coverage scope.
///
/// An `if` statement owns two handles (one per branch) over the same node,
/// which is why line sets are keyed by handle rather than by node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct ScopeHandle(u32);

impl ScopeHandle {
    /// Returns the raw handle number.
    pub fn as_raw(self) -> u32 {
        self.0
    }
}

/// Hands out monotonically increasing, never reused scope handles.
#[derive(Debug, Default)]
pub struct HandleAllocator {
    last: u32,
}

impl HandleAllocator {
    /// Creates an allocator whose first handle is 1.
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocates a fresh handle.
    pub fn next_handle(&mut self) -> ScopeHandle {
        self.last += 1;
        ScopeHandle(self.last)
    }
}

/// Coverage enablement of the scope currently being visited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckState {
    /// Whether the current block still gets covered.
    pub on: bool,
    /// Set inside the compiler-created wrapper top module.
    pub in_mod_off: bool,
    /// Line-set bucket of the current scope.
    pub handle: ScopeHandle,
    /// Location of the node that established the scope.
    pub origin: Span,
}

impl Default for CheckState {
    fn default() -> Self {
        Self {
            on: false,
            in_mod_off: false,
            handle: ScopeHandle::default(),
            origin: Span::DUMMY,
        }
    }
}

impl CheckState {
    /// Starts a new scope established by the node at `origin`.
    pub fn establish(&mut self, handles: &mut HandleAllocator, origin: Span) {
        self.on = true;
        self.handle = handles.next_handle();
        self.origin = origin;
    }

    /// Returns `true` if a node at `span` gets line coverage in this scope.
    pub fn line_coverage_on(&self, span: &Span, config: &CoverageConfig) -> bool {
        self.on && !self.in_mod_off && span.coverage_on() && config.line
    }
}
