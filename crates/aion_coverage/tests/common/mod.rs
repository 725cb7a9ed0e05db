//! Tree-building helpers shared by the coverage pass tests.

#![allow(dead_code)]

use aion_common::{AionResult, Interner};
use aion_config::CoverageConfig;
use aion_coverage::{instrument, CoverageStats};
use aion_diagnostics::DiagnosticSink;
use aion_ir::{
    walk, Assign, Begin, Case, CaseArm, Cover, CoverCategory, CoverDecl, Design, Expr, If,
    Module, ModuleKind, Node, Pragma, PragmaKind, Procedure, ProcedureKind, Stop, VarId,
};
use aion_source::{FileId, SourceDb, Span};

/// Sources, names and diagnostics for one test design.
pub struct Fixture {
    pub interner: Interner,
    pub sources: SourceDb,
    pub file: FileId,
    pub sink: DiagnosticSink,
    pub design: Design,
}

impl Fixture {
    /// A design whose statements live in `rtl/top.sv`.
    pub fn new() -> Self {
        let mut sources = SourceDb::new();
        let file = sources.add_file("rtl/top.sv");
        Self {
            interner: Interner::new(),
            sources,
            file,
            sink: DiagnosticSink::new(),
            design: Design::new(),
        }
    }

    pub fn at(&self, line: u32) -> Span {
        Span::line(self.file, line)
    }

    pub fn module(&self, name: &str, items: Vec<Node>) -> Module {
        let mut m = Module::new(
            self.interner.get_or_intern(name),
            ModuleKind::Module,
            self.at(1),
        );
        m.items = items;
        m
    }

    pub fn run(&mut self, config: &CoverageConfig) -> AionResult<CoverageStats> {
        instrument(
            &mut self.design,
            &self.interner,
            &self.sources,
            config,
            &self.sink,
        )
    }

    pub fn name(&self, module: &Module) -> &str {
        self.interner.resolve(module.name)
    }

    pub fn var_name(&self, module: &Module, var: VarId) -> &str {
        self.interner.resolve(module.vars[var].name)
    }

    /// Names of the traced variables of `module`.
    pub fn traced_vars(&self, module: &Module) -> Vec<String> {
        module
            .vars
            .values()
            .filter(|v| v.traced)
            .map(|v| self.interner.resolve(v.name).to_string())
            .collect()
    }
}

pub fn line_config() -> CoverageConfig {
    CoverageConfig {
        line: true,
        ..CoverageConfig::default()
    }
}

pub fn toggle_config() -> CoverageConfig {
    CoverageConfig {
        toggle: true,
        ..CoverageConfig::default()
    }
}

pub fn user_config() -> CoverageConfig {
    CoverageConfig {
        user: true,
        ..CoverageConfig::default()
    }
}

pub fn assign(span: Span) -> Node {
    Node::Assign(Assign {
        target: Expr::write(VarId::from_raw(0)),
        value: Expr::constant(0, 1),
        span,
    })
}

pub fn stop(span: Span) -> Node {
    Node::Stop(Stop { span })
}

pub fn pragma(kind: PragmaKind, span: Span) -> Node {
    Node::Pragma(Pragma { kind, span })
}

pub fn block_off(span: Span) -> Node {
    pragma(PragmaKind::CoverageBlockOff, span)
}

pub fn if_else(span: Span, then_body: Vec<Node>, else_body: Vec<Node>) -> Node {
    Node::If(If::new(Expr::constant(1, 1), then_body, else_body, span))
}

pub fn procedure(kind: ProcedureKind, span: Span, body: Vec<Node>) -> Node {
    Node::Procedure(Procedure {
        kind,
        name: None,
        dpi_import: false,
        body,
        span,
    })
}

pub fn always(span: Span, body: Vec<Node>) -> Node {
    procedure(ProcedureKind::Always, span, body)
}

pub fn case(span: Span, arms: Vec<CaseArm>) -> Node {
    Node::Case(Case {
        subject: Expr::read(VarId::from_raw(0)),
        arms,
        span,
    })
}

pub fn arm(span: Span, body: Vec<Node>) -> CaseArm {
    CaseArm {
        patterns: vec![Expr::constant(0, 2)],
        body,
        span,
    }
}

pub fn begin(name: Option<&str>, interner: &Interner, span: Span, body: Vec<Node>) -> Node {
    Node::Begin(Begin {
        name: name.map(|n| interner.get_or_intern(n)),
        generate: name.is_some(),
        body,
        span,
    })
}

pub fn cover(span: Span, body: Vec<Node>) -> Node {
    Node::Cover(Cover {
        cond: Expr::constant(1, 1),
        body,
        incs: Vec::new(),
        span,
    })
}

/// The declarations referenced by increments directly in `nodes`, in order.
pub fn incs<'m>(module: &'m Module, nodes: &[Node]) -> Vec<&'m CoverDecl> {
    nodes
        .iter()
        .filter_map(|n| match n {
            Node::CoverInc(inc) => Some(&module.cover_decls[inc.decl]),
            _ => None,
        })
        .collect()
}

/// `(category, comment, line ranges)` of every declaration of `module`.
pub fn summary(module: &Module) -> Vec<(CoverCategory, String, String)> {
    module
        .cover_decls
        .values()
        .map(|d| (d.category, d.comment.clone(), d.line_ranges.clone()))
        .collect()
}

/// Number of increments anywhere under `nodes`, toggles included.
pub fn count_incs(nodes: &[Node]) -> usize {
    let mut count = 0;
    walk(nodes, &mut |n| {
        if matches!(n, Node::CoverInc(_) | Node::CoverToggle(_)) {
            count += 1;
        }
    });
    count
}

/// Number of pragmas of `kind` anywhere under `nodes`.
pub fn count_pragmas(nodes: &[Node], kind: PragmaKind) -> usize {
    let mut count = 0;
    walk(nodes, &mut |n| {
        if matches!(n, Node::Pragma(p) if p.kind == kind) {
            count += 1;
        }
    });
    count
}
