//! Top-level design container.

use crate::module::Module;
use crate::types::TypeDb;
use serde::{Deserialize, Serialize};

/// A complete design after elaboration: top-level modules in declaration
/// order plus the shared type database.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Design {
    /// Top-level modules. Nested containers live in their parent's items.
    pub modules: Vec<Module>,
    /// Type definitions shared across all modules.
    pub types: TypeDb,
}

impl Design {
    /// Creates an empty design.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of top-level modules.
    pub fn module_count(&self) -> usize {
        self.modules.len()
    }
}
