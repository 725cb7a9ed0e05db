//! Modules: the owners of variables, coverage declarations and statements.

use crate::arena::Arena;
use crate::cover::CoverDecl;
use crate::ids::{CoverDeclId, VarId};
use crate::node::{Node, VarDecl};
use crate::var::Var;
use aion_common::Ident;
use aion_source::Span;
use serde::{Deserialize, Serialize};

/// The flavor of a module-like container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModuleKind {
    /// A design module.
    Module,
    /// An interface.
    Interface,
    /// A package.
    Package,
    /// A class; its variables are never traced.
    Class,
}

/// A module of the elaborated design.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Module {
    /// The (possibly mangled) module name.
    pub name: Ident,
    /// The container flavor.
    pub kind: ModuleKind,
    /// Set on the compiler-created wrapper around the user's top module.
    pub is_top: bool,
    /// Location of the module header.
    pub span: Span,
    /// Module items in source order.
    pub items: Vec<Node>,
    /// Variables declared in this module.
    pub vars: Arena<VarId, Var>,
    /// Coverage points instrumenting this module.
    pub cover_decls: Arena<CoverDeclId, CoverDecl>,
}

impl Module {
    /// Creates an empty module.
    pub fn new(name: Ident, kind: ModuleKind, span: Span) -> Self {
        Self {
            name,
            kind,
            is_top: false,
            span,
            items: Vec::new(),
            vars: Arena::new(),
            cover_decls: Arena::new(),
        }
    }

    /// Allocates `var` and appends its declaration to the module items.
    pub fn add_var(&mut self, var: Var) -> VarId {
        let span = var.span;
        let id = self.vars.alloc(var);
        self.items.push(Node::Var(VarDecl { var: id, span }));
        id
    }

    /// Returns `true` for classes.
    pub fn is_class(&self) -> bool {
        self.kind == ModuleKind::Class
    }
}
