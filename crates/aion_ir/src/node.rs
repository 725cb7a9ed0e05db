//! Statement and declaration nodes of the elaborated tree.
//!
//! [`Node`] is a closed set of kinds. Containers hold their children in
//! `Vec<Node>` lists, so a pass can append to a statement list or drop a
//! node from it without touching siblings.

use crate::expr::Expr;
use crate::ids::{CoverDeclId, VarId};
use crate::module::Module;
use aion_common::Ident;
use aion_source::Span;
use serde::{Deserialize, Serialize};

/// The kind of a procedural construct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProcedureKind {
    /// `initial`.
    Initial,
    /// `final`.
    Final,
    /// `always` with an explicit sensitivity.
    Always,
    /// `always_comb`.
    AlwaysComb,
    /// `always_ff`.
    AlwaysFf,
    /// `always_latch`.
    AlwaysLatch,
    /// A function body.
    Function,
    /// A task body.
    Task,
}

impl ProcedureKind {
    /// Returns `true` for functions and tasks.
    pub fn is_subroutine(self) -> bool {
        matches!(self, ProcedureKind::Function | ProcedureKind::Task)
    }
}

/// A procedural block, function or task.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Procedure {
    /// The construct kind.
    pub kind: ProcedureKind,
    /// Subroutine or block label.
    pub name: Option<Ident>,
    /// `import "DPI-C"` subroutine with a foreign body.
    pub dpi_import: bool,
    /// Body statements.
    pub body: Vec<Node>,
    /// Location of the introducing keyword.
    pub span: Span,
}

/// A `while`-style loop (`for`/`repeat`/`while` after elaboration).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Loop {
    /// Loop condition.
    pub cond: Expr,
    /// Loop body.
    pub body: Vec<Node>,
    /// Location of the loop keyword.
    pub span: Span,
}

/// An `if`/`else` statement; an `else if` chain nests an [`If`] as the sole
/// statement of `else_body`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct If {
    /// The condition.
    pub cond: Expr,
    /// Statements run when the condition holds.
    pub then_body: Vec<Node>,
    /// Statements run otherwise; empty when there is no `else`.
    pub else_body: Vec<Node>,
    /// Set on an `if` that continues an `else if` chain.
    #[serde(default)]
    pub elsif_link: bool,
    /// Location of the `if` keyword.
    pub span: Span,
}

impl If {
    /// Creates an `if` statement.
    pub fn new(cond: Expr, then_body: Vec<Node>, else_body: Vec<Node>, span: Span) -> Self {
        Self {
            cond,
            then_body,
            else_body,
            elsif_link: false,
            span,
        }
    }

    /// Returns `true` if the else branch is exactly one nested `if`, i.e.
    /// this statement is followed by an `else if` link.
    pub fn has_elsif(&self) -> bool {
        !self.then_body.is_empty()
            && self.else_body.len() == 1
            && matches!(self.else_body[0], Node::If(_))
    }
}

/// A `case` statement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Case {
    /// The selector expression.
    pub subject: Expr,
    /// Arms in source order, including an explicit `default` arm if present.
    pub arms: Vec<CaseArm>,
    /// Location of the `case` keyword.
    pub span: Span,
}

/// One arm of a [`Case`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseArm {
    /// Match values; empty for the `default` arm.
    pub patterns: Vec<Expr>,
    /// Arm body.
    pub body: Vec<Node>,
    /// Location of the arm's first pattern.
    pub span: Span,
}

impl CaseArm {
    /// Returns `true` for the `default` arm.
    pub fn is_default(&self) -> bool {
        self.patterns.is_empty()
    }
}

/// An explicit user `cover` statement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cover {
    /// The covered property.
    pub cond: Expr,
    /// Pass-action statements.
    pub body: Vec<Node>,
    /// Coverage increments counting hits of this cover point.
    pub incs: Vec<Node>,
    /// Location of the `cover` keyword.
    pub span: Span,
}

/// A `$stop` statement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Stop {
    /// Location.
    pub span: Span,
}

/// The kind of a [`Pragma`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PragmaKind {
    /// `coverage_block_off`: no coverage for the rest of the enclosing block.
    CoverageBlockOff,
    /// `full_case`.
    FullCase,
    /// `parallel_case`.
    ParallelCase,
    /// `public`.
    Public,
    /// `inline_module`.
    InlineModule,
    /// `no_inline_module`.
    NoInlineModule,
}

/// A tool directive placed among statements.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pragma {
    /// The directive.
    pub kind: PragmaKind,
    /// Location.
    pub span: Span,
}

/// A `begin`/`end` block or generate block, optionally named.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Begin {
    /// The block label; generate iterations carry the expanded label (`g[3]`).
    pub name: Option<Ident>,
    /// Whether the block came from a generate construct.
    pub generate: bool,
    /// Block contents.
    pub body: Vec<Node>,
    /// Location of the `begin` keyword.
    pub span: Span,
}

/// The point of declaration of a module variable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VarDecl {
    /// The declared variable.
    pub var: VarId,
    /// Declaration location.
    pub span: Span,
}

/// An assignment (procedural or continuous).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Assign {
    /// Assigned reference.
    pub target: Expr,
    /// Assigned value.
    pub value: Expr,
    /// Location.
    pub span: Span,
}

/// A `$display`-style statement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Display {
    /// Format string.
    pub format: String,
    /// Format arguments.
    pub args: Vec<Expr>,
    /// Location.
    pub span: Span,
}

/// Increments the counter of one coverage declaration when executed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoverInc {
    /// The declaration counted, local to the enclosing module.
    pub decl: CoverDeclId,
    /// Location of the instrumented construct.
    pub span: Span,
}

/// Counts value changes of one bit-lane by comparing it to its previous value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoverToggle {
    /// Increment for this lane's declaration.
    pub inc: CoverInc,
    /// Read reference to the lane's current value.
    pub current: Expr,
    /// Read reference to the lane's previous value.
    pub previous: Expr,
    /// Location of the covered variable.
    pub span: Span,
}

/// A node of the elaborated tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Node {
    /// A module nested in another (a class inside a package, for example).
    Module(Box<Module>),
    /// A procedural block, function or task.
    Procedure(Procedure),
    /// A loop.
    Loop(Loop),
    /// An `if`/`else`.
    If(If),
    /// A `case`.
    Case(Case),
    /// A user `cover` statement.
    Cover(Cover),
    /// A `$stop`.
    Stop(Stop),
    /// A tool directive.
    Pragma(Pragma),
    /// A `begin`/generate block.
    Begin(Begin),
    /// A variable declaration.
    Var(VarDecl),
    /// An assignment.
    Assign(Assign),
    /// A display statement.
    Display(Display),
    /// A coverage counter increment.
    CoverInc(CoverInc),
    /// A toggle coverage point.
    CoverToggle(CoverToggle),
}

impl Node {
    /// Returns the source location of this node.
    pub fn span(&self) -> Span {
        match self {
            Node::Module(m) => m.span,
            Node::Procedure(p) => p.span,
            Node::Loop(l) => l.span,
            Node::If(i) => i.span,
            Node::Case(c) => c.span,
            Node::Cover(c) => c.span,
            Node::Stop(s) => s.span,
            Node::Pragma(p) => p.span,
            Node::Begin(b) => b.span,
            Node::Var(v) => v.span,
            Node::Assign(a) => a.span,
            Node::Display(d) => d.span,
            Node::CoverInc(c) => c.span,
            Node::CoverToggle(t) => t.span,
        }
    }

    /// Short name of the node kind, for logs.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Node::Module(_) => "module",
            Node::Procedure(_) => "procedure",
            Node::Loop(_) => "loop",
            Node::If(_) => "if",
            Node::Case(_) => "case",
            Node::Cover(_) => "cover",
            Node::Stop(_) => "stop",
            Node::Pragma(_) => "pragma",
            Node::Begin(_) => "begin",
            Node::Var(_) => "var",
            Node::Assign(_) => "assign",
            Node::Display(_) => "display",
            Node::CoverInc(_) => "coverinc",
            Node::CoverToggle(_) => "covertoggle",
        }
    }

    /// Returns every direct child statement list of this node.
    ///
    /// Nested modules are not entered; their contents belong to another module.
    pub fn child_lists(&self) -> Vec<&[Node]> {
        match self {
            Node::Procedure(p) => vec![&p.body],
            Node::Loop(l) => vec![&l.body],
            Node::If(i) => vec![&i.then_body, &i.else_body],
            Node::Case(c) => c.arms.iter().map(|a| a.body.as_slice()).collect(),
            Node::Cover(c) => vec![&c.body, &c.incs],
            Node::Begin(b) => vec![&b.body],
            Node::Module(_)
            | Node::Stop(_)
            | Node::Pragma(_)
            | Node::Var(_)
            | Node::Assign(_)
            | Node::Display(_)
            | Node::CoverInc(_)
            | Node::CoverToggle(_) => Vec::new(),
        }
    }
}

/// Visits `nodes` and all their descendants in pre-order, without entering
/// nested modules.
pub fn walk<'a>(nodes: &'a [Node], f: &mut impl FnMut(&'a Node)) {
    for node in nodes {
        f(node);
        for list in node.child_lists() {
            walk(list, f);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aion_source::FileId;

    fn stop(line: u32) -> Node {
        Node::Stop(Stop {
            span: Span::line(FileId::from_raw(0), line),
        })
    }

    #[test]
    fn elsif_detection() {
        let inner = If::new(Expr::constant(1, 1), vec![stop(3)], vec![], Span::DUMMY);
        let chained = If::new(
            Expr::constant(1, 1),
            vec![stop(2)],
            vec![Node::If(inner.clone())],
            Span::DUMMY,
        );
        assert!(chained.has_elsif());

        let two_stmts = If::new(
            Expr::constant(1, 1),
            vec![stop(2)],
            vec![Node::If(inner), stop(4)],
            Span::DUMMY,
        );
        assert!(!two_stmts.has_elsif());

        let no_then = If::new(
            Expr::constant(1, 1),
            vec![],
            vec![Node::If(If::new(Expr::constant(0, 1), vec![], vec![], Span::DUMMY))],
            Span::DUMMY,
        );
        assert!(!no_then.has_elsif());
    }

    #[test]
    fn walk_visits_nested_statements() {
        let tree = vec![Node::Begin(Begin {
            name: None,
            generate: false,
            body: vec![
                stop(1),
                Node::If(If::new(
                    Expr::constant(1, 1),
                    vec![stop(2)],
                    vec![stop(3)],
                    Span::DUMMY,
                )),
            ],
            span: Span::DUMMY,
        })];
        let mut lines = Vec::new();
        walk(&tree, &mut |n| {
            if let Node::Stop(s) = n {
                lines.push(s.span.first_line);
            }
        });
        assert_eq!(lines, vec![1, 2, 3]);
    }

    #[test]
    fn default_arm() {
        let arm = CaseArm {
            patterns: vec![],
            body: vec![],
            span: Span::DUMMY,
        };
        assert!(arm.is_default());
    }

    #[test]
    fn span_and_kind() {
        let n = stop(7);
        assert_eq!(n.span().first_line, 7);
        assert_eq!(n.kind_name(), "stop");
    }
}
