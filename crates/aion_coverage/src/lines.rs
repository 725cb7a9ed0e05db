//! Per-scope line sets and their compact range rendering.

use std::collections::{BTreeSet, HashMap};

use aion_config::CoverageConfig;
use aion_source::Span;
use tracing::trace;

use crate::state::{CheckState, ScopeHandle};

/// Accumulates the source lines visited under each scope handle.
#[derive(Debug, Default)]
pub struct LineTracker {
    lines: HashMap<ScopeHandle, BTreeSet<u32>>,
}

impl LineTracker {
    /// Creates an empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records every line of `span` under the current scope, provided line
    /// coverage is on for it and it lies in the file of the scope's origin.
    pub fn track(&mut self, state: &CheckState, span: &Span, config: &CoverageConfig) {
        if !state.line_coverage_on(span, config) || !state.origin.same_file(span) {
            return;
        }
        let set = self.lines.entry(state.handle).or_default();
        for line in span.lines() {
            trace!(line, handle = state.handle.as_raw(), "line track");
            set.insert(line);
        }
    }

    /// Renders the lines of `handle` as a range list such as `"3-5,9"`.
    pub fn render(&self, handle: ScopeHandle) -> String {
        let out = self
            .lines
            .get(&handle)
            .map(|set| render_ranges(set.iter().copied()))
            .unwrap_or_default();
        trace!(handle = handle.as_raw(), lines = %out, "lines out");
        out
    }

    /// Returns the lines recorded under `handle`, ascending.
    pub fn lines(&self, handle: ScopeHandle) -> Vec<u32> {
        self.lines
            .get(&handle)
            .map(|set| set.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Drops all line sets.
    pub fn clear(&mut self) {
        self.lines.clear();
    }
}

/// Joins ascending, distinct line numbers into comma-separated runs.
///
/// A run of one line renders as `"n"`, a longer run as `"first-last"`.
pub fn render_ranges(lines: impl IntoIterator<Item = u32>) -> String {
    let mut out = String::new();
    let mut run: Option<(u32, u32)> = None;
    for line in lines {
        run = match run {
            Some((first, last)) if line == last + 1 => Some((first, line)),
            Some(done) => {
                push_run(&mut out, done);
                Some((line, line))
            }
            None => Some((line, line)),
        };
    }
    if let Some(done) = run {
        push_run(&mut out, done);
    }
    out
}

fn push_run(out: &mut String, (first, last): (u32, u32)) {
    if !out.is_empty() {
        out.push(',');
    }
    if first == last {
        out.push_str(&first.to_string());
    } else {
        out.push_str(&format!("{first}-{last}"));
    }
}
