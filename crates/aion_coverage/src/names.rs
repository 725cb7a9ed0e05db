//! Collision avoidance for generated variable names.

use std::collections::HashMap;

/// Hands out unique names within one top-level module.
///
/// The first request for a base name returns it unchanged; later requests
/// get `_1`, `_2`, ... appended.
#[derive(Debug, Default)]
pub struct NameTable {
    uses: HashMap<String, u32>,
}

impl NameTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `base`, suffixed if it was handed out before.
    pub fn unique(&mut self, base: String) -> String {
        let count = self.uses.entry(base.clone()).or_insert(0);
        let suffix = *count;
        *count += 1;
        if suffix == 0 {
            base
        } else {
            format!("{base}_{suffix}")
        }
    }

    /// Forgets every name.
    pub fn clear(&mut self) {
        self.uses.clear();
    }
}
