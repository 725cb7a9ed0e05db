//! Data types of variables, interned in a central [`TypeDb`].
//!
//! Types describe the shape the toggle-coverage decomposition walks: scalar
//! bit-vectors, packed and unpacked arrays, packed and unpacked structs,
//! unions, and the alias kinds (typedefs, enums) that resolve to one of them.

use crate::arena::Arena;
use crate::ids::DTypeId;
use aion_common::Ident;
use serde::{Deserialize, Serialize};

/// A declared index range `[left:right]`.
///
/// Either direction is allowed; [`lo`](Range::lo) and [`hi`](Range::hi) give
/// the normalized bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Range {
    /// The left (first written) bound.
    pub left: i32,
    /// The right bound.
    pub right: i32,
}

impl Range {
    /// Creates a range `[left:right]`.
    pub fn new(left: i32, right: i32) -> Self {
        Self { left, right }
    }

    /// The conventional `[width-1:0]` range. A zero width gives `[0:0]`.
    pub fn downto_zero(width: u32) -> Self {
        let msb = i32::try_from(width.max(1) - 1).unwrap_or(i32::MAX);
        Self::new(msb, 0)
    }

    /// Lower index bound.
    pub fn lo(&self) -> i32 {
        self.left.min(self.right)
    }

    /// Upper index bound.
    pub fn hi(&self) -> i32 {
        self.left.max(self.right)
    }

    /// Number of indices in the range.
    pub fn len(&self) -> u64 {
        (i64::from(self.hi()) - i64::from(self.lo()) + 1) as u64
    }

    /// Zero-based position of `index` from the low bound.
    pub fn offset(&self, index: i32) -> u64 {
        (i64::from(index) - i64::from(self.lo())) as u64
    }

    /// Always `false`: a declared range holds at least one index.
    pub fn is_empty(&self) -> bool {
        false
    }
}

/// The scalar kind of a [`DType::Basic`] type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BasicKind {
    /// 4-state `logic` / `reg` / `wire`.
    Logic,
    /// 2-state `bit`.
    Bit,
    /// `real` / `shortreal`.
    Real,
    /// `string`.
    String,
}

/// A struct or union member.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Member {
    /// The member name.
    pub name: Ident,
    /// The member type.
    pub dtype: DTypeId,
    /// Bit offset of the member's LSB within a packed aggregate; 0 otherwise.
    pub lsb: u32,
}

/// A data type in the design.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DType {
    /// A scalar, either a single bit (`range == None`) or a ranged bit-vector.
    Basic {
        /// The scalar kind.
        kind: BasicKind,
        /// The packed range, for vectors.
        range: Option<Range>,
    },
    /// A packed array `elem [left:right]` laid out contiguously in bits.
    PackedArray {
        /// Element type.
        elem: DTypeId,
        /// Element index range.
        range: Range,
    },
    /// An unpacked array `name [left:right]`.
    UnpackedArray {
        /// Element type.
        elem: DTypeId,
        /// Element index range.
        range: Range,
    },
    /// A struct, packed or unpacked.
    Struct {
        /// The struct type name.
        name: Ident,
        /// Whether members share one packed bit-vector.
        packed: bool,
        /// Members in declaration order.
        members: Vec<Member>,
    },
    /// A packed union.
    Union {
        /// The union type name.
        name: Ident,
        /// Members in declaration order.
        members: Vec<Member>,
    },
    /// An enumeration over a base scalar type.
    Enum {
        /// The enum type name.
        name: Ident,
        /// The underlying value type.
        base: DTypeId,
    },
    /// A named alias of another type.
    Typedef {
        /// The alias name.
        name: Ident,
        /// The aliased type.
        target: DTypeId,
    },
    /// A dynamically sized queue.
    Queue {
        /// Element type.
        elem: DTypeId,
    },
    /// A class handle.
    Class {
        /// The class name.
        name: Ident,
    },
}

/// Central type database.
///
/// Each distinct [`DType`] is stored once, so type equality is an ID compare.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TypeDb {
    types: Arena<DTypeId, DType>,
}

impl TypeDb {
    /// Creates a new, empty type database.
    pub fn new() -> Self {
        Self::default()
    }

    /// Interns a type, returning the existing ID for an identical type.
    pub fn intern(&mut self, ty: DType) -> DTypeId {
        if let Some((id, _)) = self.types.iter().find(|(_, existing)| **existing == ty) {
            return id;
        }
        self.types.alloc(ty)
    }

    /// Interns a single-bit `logic`.
    pub fn logic_bit(&mut self) -> DTypeId {
        self.intern(DType::Basic {
            kind: BasicKind::Logic,
            range: None,
        })
    }

    /// Interns a `logic [width-1:0]` vector.
    pub fn logic_vec(&mut self, width: u32) -> DTypeId {
        self.intern(DType::Basic {
            kind: BasicKind::Logic,
            range: Some(Range::downto_zero(width)),
        })
    }

    /// Interns the unsigned 32-bit type used for counters.
    pub fn uint32(&mut self) -> DTypeId {
        self.intern(DType::Basic {
            kind: BasicKind::Bit,
            range: Some(Range::downto_zero(32)),
        })
    }

    /// Returns the type with the given ID.
    ///
    /// # Panics
    ///
    /// Panics if the ID is out of bounds.
    pub fn get(&self, id: DTypeId) -> &DType {
        &self.types[id]
    }

    /// Follows typedef and enum aliases to the underlying structural type.
    pub fn skip_refs(&self, mut id: DTypeId) -> DTypeId {
        loop {
            match self.get(id) {
                DType::Typedef { target, .. } => id = *target,
                DType::Enum { base, .. } => id = *base,
                _ => return id,
            }
        }
    }

    /// Packed bit width of a value of this type.
    ///
    /// For an unpacked array this is the width of one element; multiply by
    /// [`unpacked_elements`](Self::unpacked_elements) for the total bit count.
    /// Products saturate at `u64::MAX`.
    pub fn width(&self, id: DTypeId) -> u64 {
        match self.get(id) {
            DType::Basic { kind, range } => match (kind, range) {
                (BasicKind::Real, _) => 64,
                (BasicKind::String, _) => 0,
                (_, Some(range)) => range.len(),
                (_, None) => 1,
            },
            DType::PackedArray { elem, range } => self.width(*elem).saturating_mul(range.len()),
            DType::UnpackedArray { elem, .. } => self.width(*elem),
            DType::Struct {
                packed: true,
                members,
                ..
            } => members
                .iter()
                .fold(0, |acc, m| acc.saturating_add(self.width(m.dtype))),
            DType::Struct { members, .. } => members.iter().fold(0, |acc, m| {
                let bits = self.width(m.dtype).saturating_mul(self.unpacked_elements(m.dtype));
                acc.saturating_add(bits)
            }),
            DType::Union { members, .. } => members
                .iter()
                .map(|m| self.width(m.dtype))
                .max()
                .unwrap_or(0),
            DType::Enum { base, .. } => self.width(*base),
            DType::Typedef { target, .. } => self.width(*target),
            DType::Queue { .. } | DType::Class { .. } => 0,
        }
    }

    /// Product of all unpacked array dimensions (1 for non-arrays).
    pub fn unpacked_elements(&self, id: DTypeId) -> u64 {
        match self.get(id) {
            DType::UnpackedArray { elem, range } => {
                range.len().saturating_mul(self.unpacked_elements(*elem))
            }
            DType::Typedef { target, .. } => self.unpacked_elements(*target),
            _ => 1,
        }
    }

    /// Returns `true` if values of this type are made of logic/bit scalars.
    pub fn is_bit_logic(&self, id: DTypeId) -> bool {
        match self.get(self.skip_refs(id)) {
            DType::Basic { kind, .. } => matches!(kind, BasicKind::Logic | BasicKind::Bit),
            DType::PackedArray { elem, .. }
            | DType::UnpackedArray { elem, .. }
            | DType::Queue { elem } => self.is_bit_logic(*elem),
            DType::Struct { members, .. } | DType::Union { members, .. } => {
                members.iter().all(|m| self.is_bit_logic(m.dtype))
            }
            DType::Class { .. } | DType::Enum { .. } | DType::Typedef { .. } => false,
        }
    }

    /// Returns `true` for `real` and `string` scalars (through aliases).
    pub fn is_real_or_string(&self, id: DTypeId) -> bool {
        matches!(
            self.get(self.skip_refs(id)),
            DType::Basic {
                kind: BasicKind::Real | BasicKind::String,
                ..
            }
        )
    }

    /// Short human-readable name of the type's kind, for diagnostics.
    pub fn kind_name(&self, id: DTypeId) -> &'static str {
        match self.get(id) {
            DType::Basic { range: None, .. } => "scalar",
            DType::Basic { .. } => "bit-vector",
            DType::PackedArray { .. } => "packed array",
            DType::UnpackedArray { .. } => "unpacked array",
            DType::Struct { packed: true, .. } => "packed struct",
            DType::Struct { .. } => "unpacked struct",
            DType::Union { .. } => "union",
            DType::Enum { .. } => "enum",
            DType::Typedef { .. } => "typedef",
            DType::Queue { .. } => "queue",
            DType::Class { .. } => "class handle",
        }
    }

    /// Returns the number of interned types.
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Returns `true` if no types have been interned.
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}
