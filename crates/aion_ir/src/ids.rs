//! Opaque ID newtypes for arena-stored IR entities.

use crate::arena::ArenaId;
use serde::{Deserialize, Serialize};

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
        pub struct $name(u32);

        impl $name {
            /// Creates an ID from a raw `u32` index.
            pub fn from_raw(index: u32) -> Self {
                Self(index)
            }

            /// Returns the raw `u32` index.
            pub fn as_raw(self) -> u32 {
                self.0
            }
        }

        impl ArenaId for $name {
            fn from_raw(index: u32) -> Self {
                Self(index)
            }

            fn as_raw(self) -> u32 {
                self.0
            }
        }
    };
}

define_id!(
    /// ID of a variable within its module.
    VarId
);

define_id!(
    /// ID of a data type in the [`TypeDb`](crate::types::TypeDb).
    DTypeId
);

define_id!(
    /// ID of a coverage declaration within its module.
    ///
    /// Module-local and assigned in creation order; final report numbering
    /// is left to the emitter.
    CoverDeclId
);
