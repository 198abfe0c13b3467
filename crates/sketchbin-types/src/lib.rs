//! Foundation types for Sketchbin.
//!
//! Every other Sketchbin crate depends on `sketchbin-types`.
//!
//! # Key Types
//!
//! - [`DocumentId`] -- Random 128-bit identifier rendered as 32 hex characters
//! - [`DocumentSummary`] -- One row of a document listing

pub mod error;
pub mod id;
pub mod summary;

pub use error::TypeError;
pub use id::DocumentId;
pub use summary::{sort_newest_first, DocumentSummary};
