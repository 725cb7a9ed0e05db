//! Mutable pass state carried through the traversal.
//!
//! [`CoverageContext`] owns the scope state, the line and name tables, and
//! the arenas of the module being instrumented. Nodes created for module
//! scope (shadow variables, toggle points, trace counters) are queued in the
//! module context and appended to the module's items once its traversal ends.

use aion_common::name::pretty_name;
use aion_common::{AionResult, InternalError, Interner};
use aion_config::CoverageConfig;
use aion_diagnostics::DiagnosticSink;
use aion_ir::{
    Access, Arena, Assign, BinaryOp, CoverCategory, CoverDecl, CoverDeclId, CoverInc, DTypeId,
    Expr, Module, Node, TypeDb, Var, VarDecl, VarId,
};
use aion_source::{SourceDb, Span};
use tracing::{debug, trace};

use crate::lines::LineTracker;
use crate::names::NameTable;
use crate::state::{CheckState, HandleAllocator, ScopeHandle};
use crate::CoverageStats;

/// The arenas and pending items of the module under instrumentation.
pub(crate) struct ModuleCx {
    /// Display name used in report pages.
    pub display_name: String,
    /// Classes get no trace counters.
    pub is_class: bool,
    pub vars: Arena<VarId, Var>,
    pub cover_decls: Arena<CoverDeclId, CoverDecl>,
    /// Module-scope nodes to append after the traversal.
    pub pending: Vec<Node>,
}

impl ModuleCx {
    /// Moves the arenas out of `module` for the duration of its traversal.
    fn enter(module: &mut Module, interner: &Interner) -> Self {
        Self {
            display_name: pretty_name(interner.resolve(module.name)).into_owned(),
            is_class: module.is_class(),
            vars: std::mem::take(&mut module.vars),
            cover_decls: std::mem::take(&mut module.cover_decls),
            pending: Vec::new(),
        }
    }

    /// Hands the arenas back and appends the queued module items.
    fn leave(self, module: &mut Module) {
        module.vars = self.vars;
        module.cover_decls = self.cover_decls;
        module.items.extend(self.pending);
    }
}

/// Everything needed to create one coverage declaration.
pub(crate) struct PointSpec {
    pub category: CoverCategory,
    pub comment: String,
    pub hier: String,
    pub line_ranges: String,
    pub column_offset: u32,
    pub span: Span,
    /// Name of the traced counter variable, when trace coverage is on.
    pub trace_name: Option<String>,
}

/// State of one run of the coverage pass.
pub(crate) struct CoverageContext<'a> {
    pub config: &'a CoverageConfig,
    pub types: &'a TypeDb,
    pub interner: &'a Interner,
    pub sources: &'a SourceDb,
    pub sink: &'a DiagnosticSink,
    /// The 32-bit counter type, interned up front when trace coverage is on.
    counter_type: Option<DTypeId>,
    pub state: CheckState,
    handles: HandleAllocator,
    pub lines: LineTracker,
    pub names: NameTable,
    /// Dotted path of the enclosing named blocks.
    pub begin_hier: String,
    /// Set inside procedures and blocks, where variables are not toggle targets.
    pub in_toggle_off: bool,
    pub module: Option<ModuleCx>,
    pub stats: CoverageStats,
}

impl<'a> CoverageContext<'a> {
    /// Creates the context for one run.
    pub fn new(
        config: &'a CoverageConfig,
        types: &'a TypeDb,
        interner: &'a Interner,
        sources: &'a SourceDb,
        sink: &'a DiagnosticSink,
        counter_type: Option<DTypeId>,
    ) -> Self {
        Self {
            config,
            types,
            interner,
            sources,
            sink,
            counter_type,
            state: CheckState::default(),
            handles: HandleAllocator::new(),
            lines: LineTracker::new(),
            names: NameTable::new(),
            begin_hier: String::new(),
            in_toggle_off: false,
            module: None,
            stats: CoverageStats::default(),
        }
    }

    /// Consumes the context, returning the run statistics.
    pub fn finish(self) -> CoverageStats {
        self.stats
    }

    /// Runs `f`, then restores the scope state it started with.
    pub fn scoped<T>(&mut self, f: impl FnOnce(&mut Self) -> T) -> T {
        let saved = self.state;
        let out = f(self);
        self.state = saved;
        out
    }

    /// Runs `f` with toggle coverage suppressed, then restores the flag.
    pub fn toggle_off<T>(&mut self, f: impl FnOnce(&mut Self) -> T) -> T {
        let saved = self.in_toggle_off;
        self.in_toggle_off = true;
        let out = f(self);
        self.in_toggle_off = saved;
        out
    }

    /// Runs `f` with `name` appended to the named-block path, if present.
    pub fn in_named_scope<T>(&mut self, name: Option<&str>, f: impl FnOnce(&mut Self) -> T) -> T {
        let saved_len = self.begin_hier.len();
        if let Some(name) = name {
            if !self.begin_hier.is_empty() {
                self.begin_hier.push('.');
            }
            self.begin_hier.push_str(name);
        }
        let out = f(self);
        self.begin_hier.truncate(saved_len);
        out
    }

    /// Instruments `module`, giving it its own module context.
    ///
    /// Line sets and generated names are dropped on entering a module that is
    /// not nested in another: no coverage scope spans two such modules.
    pub fn with_module<T>(
        &mut self,
        module: &mut Module,
        f: impl FnOnce(&mut Self, &mut Vec<Node>) -> AionResult<T>,
    ) -> AionResult<T> {
        let nested = self.module.is_some();
        let cx = ModuleCx::enter(module, self.interner);
        debug!(module = %cx.display_name, nested, "instrumenting module");
        let outer = self.module.replace(cx);
        if !nested {
            self.lines.clear();
            self.names.clear();
        }
        let span = module.span;
        let is_top = module.is_top;
        let result = self.scoped(|v| {
            v.create_handle(span);
            // The wrapper top is a compiler-made shell.
            v.state.in_mod_off = is_top;
            f(v, &mut module.items)
        });
        if let Some(cx) = std::mem::replace(&mut self.module, outer) {
            cx.leave(module);
        }
        result
    }

    /// Opens a new line-tracking scope established by the node at `origin`.
    pub fn create_handle(&mut self, origin: Span) {
        self.state.establish(&mut self.handles, origin);
        trace!(handle = self.state.handle.as_raw(), line = origin.first_line, "line create");
    }

    /// Returns `true` if a node at `span` gets line coverage under `state`.
    pub fn line_on(&self, state: &CheckState, span: Span) -> bool {
        state.line_coverage_on(&span, self.config)
    }

    /// Records the lines of `span` in the current scope.
    pub fn line_track(&mut self, span: Span) {
        self.lines.track(&self.state, &span, self.config);
    }

    fn module_cx(&mut self) -> AionResult<&mut ModuleCx> {
        self.module
            .as_mut()
            .ok_or_else(|| InternalError::unexpected("coverage", "coverage point outside a module"))
    }

    /// Name of the traced counter for a line point, or `None` without trace coverage.
    pub fn line_trace_name(&mut self, span: Span, tag: &str) -> Option<String> {
        if !self.config.trace {
            return None;
        }
        let base = format!(
            "vlCoverageLineTrace_{}__{}_{}",
            self.sources.basename_no_ext(span.file),
            span.first_line,
            tag
        );
        Some(self.names.unique(base))
    }

    /// Creates a line-category point for the scope `handle`, returning the
    /// nodes to append to the instrumented statement list.
    pub fn line_point(
        &mut self,
        category: CoverCategory,
        tag: &str,
        handle: ScopeHandle,
        span: Span,
        column_offset: u32,
    ) -> AionResult<Vec<Node>> {
        let trace_name = self.line_trace_name(span, tag);
        let line_ranges = self.lines.render(handle);
        self.cover_point(PointSpec {
            category,
            comment: tag.to_string(),
            hier: String::new(),
            line_ranges,
            column_offset,
            span,
            trace_name,
        })
    }

    /// Creates a declaration and its increment, followed by the trace counter
    /// update when one applies.
    pub fn cover_point(&mut self, point: PointSpec) -> AionResult<Vec<Node>> {
        let (inc, trace_update) = self.new_cover_inc(point)?;
        let mut nodes = vec![Node::CoverInc(inc)];
        nodes.extend(trace_update.map(Node::Assign));
        Ok(nodes)
    }

    /// Allocates a coverage declaration in the current module and returns an
    /// increment of it, plus the counter assignment when trace coverage applies.
    pub fn new_cover_inc(&mut self, point: PointSpec) -> AionResult<(CoverInc, Option<Assign>)> {
        let counter_type = self.counter_type;
        let interner = self.interner;
        let cx = self.module_cx()?;
        let page = format!("{}/{}", point.category.page_prefix(), cx.display_name);
        debug!(
            category = ?point.category,
            comment = %point.comment,
            page = %page,
            lines = %point.line_ranges,
            "new coverage point"
        );
        let span = point.span;
        let decl = cx.cover_decls.alloc(CoverDecl {
            category: point.category,
            page,
            hier: point.hier,
            comment: point.comment,
            line_ranges: point.line_ranges,
            column_offset: point.column_offset,
            span,
        });
        let inc = CoverInc { decl, span };

        let mut trace_update = None;
        if let (Some(name), Some(dtype)) = (point.trace_name, counter_type) {
            if !cx.is_class {
                let mut var = Var::module_temp(interner.get_or_intern(&name), dtype, span);
                var.traced = true;
                let id = cx.vars.alloc(var);
                cx.pending.push(Node::Var(VarDecl { var: id, span }));
                debug!(name = %name, "new coverage trace");
                trace_update = Some(Assign {
                    target: Expr::write(id),
                    value: Expr::binary(BinaryOp::Add, Expr::read(id), Expr::constant(1, 32)),
                    span,
                });
                self.stats.trace_vars += 1;
            }
        }
        self.stats.record(point.category);
        Ok((inc, trace_update))
    }

    /// Allocates the "previous value" copy of `original` for toggle coverage.
    pub fn new_shadow_var(&mut self, original: &Var, raw_name: &str) -> AionResult<VarId> {
        let name = self.names.unique(format!("__Vtogcov__{raw_name}"));
        let ident = self.interner.get_or_intern(&name);
        let cx = self.module_cx()?;
        let id = cx
            .vars
            .alloc(Var::module_temp(ident, original.dtype, original.span));
        cx.pending.push(Node::Var(VarDecl {
            var: id,
            span: original.span,
        }));
        self.stats.shadow_vars += 1;
        Ok(id)
    }

    /// Queues a module-scope node.
    pub fn push_module_item(&mut self, node: Node) -> AionResult<()> {
        self.module_cx()?.pending.push(node);
        Ok(())
    }

    /// The write form of a read reference, for updating a shadow lane.
    pub fn shadow_update(current: Expr, previous: &Expr, span: Span) -> Assign {
        Assign {
            target: previous.with_access(Access::Write),
            value: current,
            span,
        }
    }
}
