//! The elaborated design tree consumed and rewritten by late compiler passes.
//!
//! A [`Design`] holds the [`Module`]s and the shared [`TypeDb`]. Each module
//! owns its variables, its coverage declarations, and a list of [`Node`]s,
//! a closed set of statement and declaration kinds. Passes mutate the tree
//! in place by splicing in freshly built, independently owned subtrees.
//!
//! Compound statements (`if`, `case` arms, procedures, loops, `begin`
//! blocks, `cover` blocks) carry the [`Span`](aion_source::Span) of their
//! header keyword; their bodies carry their own spans.

#![warn(missing_docs)]

pub mod arena;
pub mod cover;
pub mod design;
pub mod expr;
pub mod ids;
pub mod module;
pub mod node;
pub mod types;
pub mod var;

pub use arena::{Arena, ArenaId};
pub use cover::{CoverCategory, CoverDecl};
pub use design::Design;
pub use expr::{Access, BinaryOp, Expr};
pub use ids::{CoverDeclId, DTypeId, VarId};
pub use module::{Module, ModuleKind};
pub use node::{
    walk, Assign, Begin, Case, CaseArm, Cover, CoverInc, CoverToggle, Display, If, Loop, Node,
    Pragma, PragmaKind, Procedure, ProcedureKind, Stop, VarDecl,
};
pub use types::{BasicKind, DType, Member, Range, TypeDb};
pub use var::{Direction, Var, VarKind};
