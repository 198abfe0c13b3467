//! Ephemeral document-database emulator.
//!
//! Mirrors exactly two request shapes of a hosted document-database REST API
//! so a client's document-persistence layer can talk to Sketchbin:
//!
//! - `documents:commit` -- store one field set under a name
//! - `documents:batchGet` -- read one field set back by name
//!
//! State is a single mutex-guarded map owned by a [`DocDb`] value, created
//! empty and never persisted. There is no versioning, no partial update, no
//! delete, and no query support.

pub mod db;
pub mod error;
pub mod wire;

pub use db::DocDb;
pub use error::{DocDbError, DocDbResult};
pub use wire::{
    BatchGetRequest, BatchGetResult, CommitRequest, CommitResponse, DocumentUpdate,
    FoundDocument, Write, WriteResult,
};
