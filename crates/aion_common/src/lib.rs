//! Shared foundational types used across the Aion coverage instrumentation crates.
//!
//! This crate provides interned identifiers, display-name helpers for mangled
//! hierarchical names, and the common internal-error result type.

#![warn(missing_docs)]

pub mod ident;
pub mod name;
pub mod result;

pub use ident::{Ident, Interner};
pub use name::{pretty_name, HIER_SEPARATOR};
pub use result::{AionResult, InternalError};
