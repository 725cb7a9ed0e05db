//! Variable declarations: ports, nets, variables and compiler temporaries.

use crate::ids::DTypeId;
use crate::types::TypeDb;
use aion_common::Ident;
use aion_source::Span;
use serde::{Deserialize, Serialize};

/// Port direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// `input`.
    Input,
    /// `output`.
    Output,
    /// `inout`.
    InOut,
}

/// What a variable is, which decides how passes may treat it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VarKind {
    /// A module port.
    Port(Direction),
    /// A net (`wire`, `tri`).
    Wire,
    /// A variable (`reg`, `logic`, `bit`).
    Variable,
    /// An elaboration-time constant.
    Parameter,
    /// A compiler-created module-level temporary.
    ModuleTemp,
    /// A compiler-created temporary local to a block.
    BlockTemp,
}

/// A variable owned by a [`Module`](crate::module::Module).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Var {
    /// The (possibly mangled) variable name.
    pub name: Ident,
    /// The variable's data type.
    pub dtype: DTypeId,
    /// The variable kind.
    pub kind: VarKind,
    /// Whether the variable is dumped to waveform traces.
    pub traced: bool,
    /// Suppresses the unused-signal lint for compiler-created variables.
    pub lint_unused_off: bool,
    /// Declaration location.
    pub span: Span,
}

impl Var {
    /// Creates a user-declared variable.
    pub fn new(name: Ident, dtype: DTypeId, kind: VarKind, span: Span) -> Self {
        Self {
            name,
            dtype,
            kind,
            traced: false,
            lint_unused_off: false,
            span,
        }
    }

    /// Creates a compiler-generated module temporary that never warns as unused.
    pub fn module_temp(name: Ident, dtype: DTypeId, span: Span) -> Self {
        Self {
            lint_unused_off: true,
            ..Self::new(name, dtype, VarKind::ModuleTemp, span)
        }
    }

    /// Returns `true` for ports.
    pub fn is_io(&self) -> bool {
        matches!(self.kind, VarKind::Port(_))
    }

    /// Returns `true` for user-declared nets and variables.
    pub fn is_signal(&self) -> bool {
        matches!(self.kind, VarKind::Wire | VarKind::Variable)
    }

    /// Returns `true` if the variable's kind and type allow toggle coverage.
    ///
    /// Ports qualify regardless of type shape; other signals only when made
    /// of logic/bit scalars. `real` and `string` never qualify.
    pub fn is_toggle_coverable(&self, types: &TypeDb) -> bool {
        (self.is_io() || self.is_signal())
            && (self.is_io() || types.is_bit_logic(self.dtype))
            && !types.is_real_or_string(self.dtype)
    }
}
