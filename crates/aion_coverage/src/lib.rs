//! Coverage instrumentation of the elaborated design.
//!
//! A single depth-first pass over each module inserts counters recording,
//! at simulation time, which lines, branches, case arms and user `cover`
//! points executed and which signal bits toggled. Coverage declarations are
//! allocated in the instrumented module; increments are spliced into the
//! statement lists at the point execution must pass. Numbering the
//! declarations and emitting the counter arrays is left to code generation.
//!
//! Enablement is scoped: procedures, `if` branches, case arms and `cover`
//! blocks each open a scope whose state is restored on exit, so a `$stop` or
//! a `coverage_block_off` pragma only silences the rest of its own block.
//!
//! # Usage
//!
//! ```ignore
//! let stats = instrument(&mut design, &interner, &source_db, &config.coverage, &sink)?;
//! ```

#![warn(missing_docs)]

mod context;
pub mod errors;
pub mod lines;
pub mod names;
pub mod state;
pub mod toggle;
mod visit;

use aion_common::{AionResult, Interner};
use aion_config::CoverageConfig;
use aion_diagnostics::DiagnosticSink;
use aion_ir::{CoverCategory, Design};
use aion_source::SourceDb;
use tracing::debug;

use context::CoverageContext;

pub use lines::render_ranges;
pub use names::NameTable;
pub use toggle::ToggleSkip;

/// Counts of what one run of [`instrument`] added to the design.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CoverageStats {
    /// Block, case, `elsif` and half-branch points.
    pub line_points: usize,
    /// Paired `if`/`else` points.
    pub branch_points: usize,
    /// Per-bit toggle points.
    pub toggle_points: usize,
    /// User `cover` points.
    pub user_points: usize,
    /// Shadow variables created for toggle coverage.
    pub shadow_vars: usize,
    /// Traced counter variables.
    pub trace_vars: usize,
    /// Variables left without toggle coverage.
    pub toggle_skipped: usize,
    /// `coverage_block_off` pragmas consumed.
    pub pragmas_removed: usize,
}

impl CoverageStats {
    fn record(&mut self, category: CoverCategory) {
        match category {
            CoverCategory::Line => self.line_points += 1,
            CoverCategory::Branch => self.branch_points += 1,
            CoverCategory::Toggle => self.toggle_points += 1,
            CoverCategory::User => self.user_points += 1,
        }
    }

    /// Total number of coverage declarations created.
    pub fn total_points(&self) -> usize {
        self.line_points + self.branch_points + self.toggle_points + self.user_points
    }
}

/// Instruments every module of `design` for the coverage kinds enabled in `config`.
///
/// Returns `Err` only when toggle expansion meets a data type it cannot
/// decompose; a fatal `F300` diagnostic naming the variable is emitted to
/// `sink` first and the design is left partially instrumented.
pub fn instrument(
    design: &mut Design,
    interner: &Interner,
    source_db: &SourceDb,
    config: &CoverageConfig,
    sink: &DiagnosticSink,
) -> AionResult<CoverageStats> {
    if !config.any_enabled() {
        debug!("coverage disabled");
        return Ok(CoverageStats::default());
    }
    let counter_type = config.trace.then(|| design.types.uint32());
    let Design { modules, types } = design;
    let mut cx = CoverageContext::new(config, types, interner, source_db, sink, counter_type);
    for module in modules.iter_mut() {
        cx.visit_module(module)?;
    }
    let stats = cx.finish();
    debug!(
        points = stats.total_points(),
        shadow_vars = stats.shadow_vars,
        trace_vars = stats.trace_vars,
        "coverage done"
    );
    Ok(stats)
}
