//! Statement-level instrumentors.
//!
//! Dispatch is a single match over [`Node`]; kinds without their own rule
//! visit their children and then track their own lines.

use aion_common::AionResult;
use aion_ir::{Begin, CaseArm, Cover, CoverCategory, If, Module, Node, PragmaKind};
use aion_source::Span;
use tracing::{debug, trace};

use crate::context::{CoverageContext, PointSpec};
use crate::state::CheckState;

/// What to do with a node after visiting it.
enum Flow {
    Keep,
    Remove,
}

impl CoverageContext<'_> {
    /// Instruments a module and everything nested in it.
    pub(crate) fn visit_module(&mut self, module: &mut Module) -> AionResult<()> {
        self.with_module(module, |v, items| v.visit_list(items))
    }

    /// Visits a statement list in order, dropping consumed pragmas.
    pub(crate) fn visit_list(&mut self, nodes: &mut Vec<Node>) -> AionResult<()> {
        let mut i = 0;
        while i < nodes.len() {
            match self.visit_node(&mut nodes[i])? {
                Flow::Keep => i += 1,
                Flow::Remove => {
                    nodes.remove(i);
                    self.stats.pragmas_removed += 1;
                }
            }
        }
        Ok(())
    }

    fn visit_node(&mut self, node: &mut Node) -> AionResult<Flow> {
        let span = node.span();
        match node {
            Node::Module(module) => self.visit_module(module)?,
            Node::Procedure(proc) => {
                if proc.dpi_import {
                    trace!(line = span.first_line, "skipping imported subroutine");
                } else {
                    let subroutine = proc.kind.is_subroutine();
                    self.visit_procedure(span, &mut proc.body, subroutine)?;
                }
            }
            Node::Loop(lp) => self.visit_procedure(span, &mut lp.body, false)?,
            Node::If(stmt) => self.visit_if(stmt)?,
            Node::Case(case) => {
                for arm in &mut case.arms {
                    self.visit_case_arm(arm)?;
                }
                self.line_track(span);
            }
            Node::Cover(cover) => self.visit_cover(cover)?,
            Node::Stop(_) => {
                trace!(handle = self.state.handle.as_raw(), "stop");
                self.state.on = false;
            }
            Node::Pragma(pragma) => {
                if pragma.kind == PragmaKind::CoverageBlockOff {
                    trace!(handle = self.state.handle.as_raw(), "coverage off");
                    self.state.on = false;
                    return Ok(Flow::Remove);
                }
                self.line_track(span);
            }
            Node::Begin(begin) => self.visit_begin(begin)?,
            Node::Var(decl) => self.visit_var(decl)?,
            Node::Assign(_) | Node::Display(_) | Node::CoverInc(_) | Node::CoverToggle(_) => {
                self.line_track(span)
            }
        }
        Ok(Flow::Keep)
    }

    /// Procedures, subroutines and loops: one `"block"` point each.
    fn visit_procedure(
        &mut self,
        span: Span,
        body: &mut Vec<Node>,
        subroutine: bool,
    ) -> AionResult<()> {
        self.scoped(|v| {
            v.toggle_off(|v| -> AionResult<()> {
                v.create_handle(span);
                v.visit_list(body)?;
                if v.line_on(&v.state, span) {
                    v.line_track(span);
                    let handle = v.state.handle;
                    let nodes = v.line_point(CoverCategory::Line, "block", handle, span, 0)?;
                    trace!(subroutine, line = span.first_line, "cover block");
                    body.extend(nodes);
                }
                Ok(())
            })
        })
    }

    fn visit_if(&mut self, stmt: &mut If) -> AionResult<()> {
        if !self.state.on {
            // Disabled code is not instrumented, but block-off markers still go.
            self.stats.pragmas_removed += strip_block_off(&mut stmt.then_body);
            self.stats.pragmas_removed += strip_block_off(&mut stmt.else_body);
            return Ok(());
        }
        let elsif = stmt.has_elsif();
        if elsif {
            if let Some(Node::If(next)) = stmt.else_body.first_mut() {
                next.elsif_link = true;
            }
        }
        let first_elsif = !stmt.elsif_link && elsif;
        let cont_elsif = stmt.elsif_link && elsif;
        let final_elsif = stmt.elsif_link && !elsif && !stmt.else_body.is_empty();
        let span = stmt.span;

        let then_state = self.scoped(|v| -> AionResult<CheckState> {
            v.create_handle(span);
            v.visit_list(&mut stmt.then_body)?;
            v.line_track(span);
            Ok(v.state)
        })?;
        let else_state = self.scoped(|v| -> AionResult<CheckState> {
            v.create_handle(span);
            v.visit_list(&mut stmt.else_body)?;
            Ok(v.state)
        })?;
        let then_on = self.line_on(&then_state, span);
        let else_on = self.line_on(&else_state, span);

        if !(first_elsif || cont_elsif || final_elsif) && then_on && else_on {
            debug!(line = span.first_line, "cover branch");
            let nodes = self.line_point(CoverCategory::Branch, "if", then_state.handle, span, 0)?;
            stmt.then_body.extend(nodes);
            // "if" and "else" are both wider than one column, so offset 1 cannot
            // collide with another token.
            let nodes =
                self.line_point(CoverCategory::Branch, "else", else_state.handle, span, 1)?;
            stmt.else_body.extend(nodes);
        } else if first_elsif || cont_elsif {
            // The else side is the next link's then side.
            if then_on {
                debug!(line = span.first_line, "cover elsif");
                let nodes =
                    self.line_point(CoverCategory::Line, "elsif", then_state.handle, span, 0)?;
                stmt.then_body.extend(nodes);
            }
        } else {
            if then_on {
                debug!(line = span.first_line, "cover half if");
                let nodes = self.line_point(CoverCategory::Line, "if", then_state.handle, span, 0)?;
                stmt.then_body.extend(nodes);
            }
            if else_on {
                debug!(line = span.first_line, "cover half else");
                let nodes =
                    self.line_point(CoverCategory::Line, "else", else_state.handle, span, 1)?;
                stmt.else_body.extend(nodes);
            }
        }
        Ok(())
    }

    /// A missing `default` arm gets no point; it is linted elsewhere.
    fn visit_case_arm(&mut self, arm: &mut CaseArm) -> AionResult<()> {
        let span = arm.span;
        if !self.line_on(&self.state, span) {
            self.stats.pragmas_removed += strip_block_off(&mut arm.body);
            return Ok(());
        }
        self.scoped(|v| -> AionResult<()> {
            v.create_handle(span);
            v.visit_list(&mut arm.body)?;
            if v.line_on(&v.state, span) {
                v.line_track(span);
                debug!(line = span.first_line, "cover case arm");
                let handle = v.state.handle;
                let nodes = v.line_point(CoverCategory::Line, "case", handle, span, 0)?;
                arm.body.extend(nodes);
            }
            Ok(())
        })
    }

    fn visit_cover(&mut self, cover: &mut Cover) -> AionResult<()> {
        let span = cover.span;
        self.scoped(|v| -> AionResult<()> {
            // Counted even below a $stop.
            v.create_handle(span);
            v.visit_list(&mut cover.body)?;
            v.visit_list(&mut cover.incs)?;
            if cover.incs.is_empty() && v.config.user {
                v.line_track(span);
                let hier = v.begin_hier.clone();
                let trace_name = v
                    .config
                    .trace
                    .then(|| v.names.unique(format!("{hier}_vlCoverageUserTrace")));
                let line_ranges = v.lines.render(v.state.handle);
                let nodes = v.cover_point(PointSpec {
                    category: CoverCategory::User,
                    comment: "cover".to_string(),
                    hier,
                    line_ranges,
                    column_offset: 0,
                    span,
                    trace_name,
                })?;
                cover.incs.extend(nodes);
            }
            Ok(())
        })
    }

    /// Named blocks extend the hierarchy seen by `cover` statements. The
    /// scope state is shared with the enclosing block.
    fn visit_begin(&mut self, begin: &mut Begin) -> AionResult<()> {
        let interner = self.interner;
        let name = begin.name.map(|n| interner.resolve(n));
        let span = begin.span;
        self.in_named_scope(name, |v| {
            v.toggle_off(|v| -> AionResult<()> {
                v.visit_list(&mut begin.body)?;
                v.line_track(span);
                Ok(())
            })
        })
    }
}

/// Removes `coverage_block_off` pragmas from a subtree that is not visited,
/// returning how many were removed.
fn strip_block_off(nodes: &mut Vec<Node>) -> usize {
    let before = nodes.len();
    nodes.retain(|n| !matches!(n, Node::Pragma(p) if p.kind == PragmaKind::CoverageBlockOff));
    let mut removed = before - nodes.len();
    for node in nodes.iter_mut() {
        removed += match node {
            Node::Procedure(p) => strip_block_off(&mut p.body),
            Node::Loop(l) => strip_block_off(&mut l.body),
            Node::If(i) => strip_block_off(&mut i.then_body) + strip_block_off(&mut i.else_body),
            Node::Case(c) => c.arms.iter_mut().map(|a| strip_block_off(&mut a.body)).sum::<usize>(),
            Node::Cover(c) => strip_block_off(&mut c.body),
            Node::Begin(b) => strip_block_off(&mut b.body),
            _ => 0,
        };
    }
    removed
}
