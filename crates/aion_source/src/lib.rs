//! Source file registry and line-based source locations.
//!
//! Every elaborated tree node carries a [`Span`]: the file it came from, the
//! first and last source line it covers, and whether coverage was switched
//! off for that region of source text. [`SourceDb`] maps a [`FileId`] back
//! to the file path for reports and generated names.

#![warn(missing_docs)]

pub mod file_id;
pub mod source_db;
pub mod span;

pub use file_id::FileId;
pub use source_db::SourceDb;
pub use span::Span;
