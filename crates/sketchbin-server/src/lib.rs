//! HTTP server for Sketchbin.
//!
//! Exposes the document blob API (create, fetch, delete, list, rename) over a
//! [`DocumentStore`](sketchbin_store::DocumentStore) and the two emulated
//! document-database endpoints backed by [`DocDb`](sketchbin_docdb::DocDb).

pub mod config;
pub mod error;
pub mod handler;
pub mod router;
pub mod server;
pub mod state;

pub use config::ServerConfig;
pub use error::{ServerError, ServerResult};
pub use server::SketchbinServer;
pub use state::AppState;
