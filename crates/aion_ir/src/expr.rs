//! Value references and the small expression forms instrumentation builds.
//!
//! Every [`Expr`] owns its operands. Passes that need the same reference at
//! several sites clone it, so no subtree is ever shared by two parents.

use crate::ids::VarId;
use aion_common::Ident;
use serde::{Deserialize, Serialize};

/// Whether a variable reference reads or writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Access {
    /// The reference is read.
    Read,
    /// The reference is assigned.
    Write,
}

/// A binary operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BinaryOp {
    /// Addition.
    Add,
    /// Bitwise AND.
    And,
    /// Bitwise XOR.
    Xor,
    /// Equality.
    Eq,
}

/// An expression in the elaborated tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expr {
    /// A reference to a whole variable.
    VarRef {
        /// The referenced variable.
        var: VarId,
        /// Read or write access.
        access: Access,
    },
    /// A constant bit-slice `from[lsb +: width]`.
    Sel {
        /// The value being sliced.
        from: Box<Expr>,
        /// Offset of the slice's least significant bit.
        lsb: u32,
        /// Slice width in bits.
        width: u32,
    },
    /// An unpacked array element `from[index]`, zero-based.
    ArraySel {
        /// The array value.
        from: Box<Expr>,
        /// Zero-based element index.
        index: u32,
    },
    /// An unpacked struct field `from.member`.
    MemberSel {
        /// The struct value.
        from: Box<Expr>,
        /// The selected member.
        member: Ident,
    },
    /// A sized constant.
    Const {
        /// The value.
        value: u64,
        /// Width in bits.
        width: u32,
    },
    /// A binary operation.
    Binary {
        /// The operator.
        op: BinaryOp,
        /// Left operand.
        lhs: Box<Expr>,
        /// Right operand.
        rhs: Box<Expr>,
    },
}

impl Expr {
    /// A read reference to `var`.
    pub fn read(var: VarId) -> Self {
        Expr::VarRef {
            var,
            access: Access::Read,
        }
    }

    /// A write reference to `var`.
    pub fn write(var: VarId) -> Self {
        Expr::VarRef {
            var,
            access: Access::Write,
        }
    }

    /// A sized constant.
    pub fn constant(value: u64, width: u32) -> Self {
        Expr::Const { value, width }
    }

    /// Slices `width` bits starting at `lsb` out of this value.
    pub fn sel(self, lsb: u32, width: u32) -> Self {
        Expr::Sel {
            from: Box::new(self),
            lsb,
            width,
        }
    }

    /// Selects element `index` of this unpacked array.
    pub fn array_sel(self, index: u32) -> Self {
        Expr::ArraySel {
            from: Box::new(self),
            index,
        }
    }

    /// Selects a field of this unpacked struct.
    pub fn member(self, member: Ident) -> Self {
        Expr::MemberSel {
            from: Box::new(self),
            member,
        }
    }

    /// `lhs op rhs`.
    pub fn binary(op: BinaryOp, lhs: Expr, rhs: Expr) -> Self {
        Expr::Binary {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }
    }

    /// The variable at the root of a select chain, if any.
    pub fn root_var(&self) -> Option<VarId> {
        match self {
            Expr::VarRef { var, .. } => Some(*var),
            Expr::Sel { from, .. } | Expr::ArraySel { from, .. } | Expr::MemberSel { from, .. } => {
                from.root_var()
            }
            Expr::Const { .. } | Expr::Binary { .. } => None,
        }
    }

    /// Returns a copy whose root variable reference has the given access.
    pub fn with_access(&self, access: Access) -> Self {
        match self {
            Expr::VarRef { var, .. } => Expr::VarRef { var: *var, access },
            Expr::Sel { from, lsb, width } => from.with_access(access).sel(*lsb, *width),
            Expr::ArraySel { from, index } => from.with_access(access).array_sel(*index),
            Expr::MemberSel { from, member } => from.with_access(access).member(*member),
            other => other.clone(),
        }
    }
}
