use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use sketchbin_store::StorageKind;

#[derive(Parser)]
#[command(
    name = "sketchbin",
    about = "Sketchbin: self-hosted storage for shared drawings",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP server
    Serve(ServeArgs),
    /// List documents in a filesystem store
    List(ListArgs),
    /// Write a document's payload to stdout
    Show(ShowArgs),
    /// Delete a document
    Rm(RmArgs),
    /// Set or clear a document's name
    Rename(RenameArgs),
}

#[derive(Args)]
pub struct ServeArgs {
    /// Address to listen on, overrides HOST and PORT
    #[arg(long)]
    pub bind: Option<SocketAddr>,
    /// Storage backend: memory or filesystem
    #[arg(long)]
    pub storage: Option<StorageKind>,
    /// Filesystem store root
    #[arg(long)]
    pub root: Option<PathBuf>,
    /// Origin used in share links
    #[arg(long)]
    pub origin: Option<String>,
    /// TOML configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,
}

/// Location of a filesystem store.
#[derive(Args)]
pub struct StoreArgs {
    #[arg(long, default_value = "./data")]
    pub root: PathBuf,
}

#[derive(Args)]
pub struct ListArgs {
    #[command(flatten)]
    pub store: StoreArgs,
}

#[derive(Args)]
pub struct ShowArgs {
    pub id: String,
    #[command(flatten)]
    pub store: StoreArgs,
}

#[derive(Args)]
pub struct RmArgs {
    pub id: String,
    #[command(flatten)]
    pub store: StoreArgs,
}

#[derive(Args)]
pub struct RenameArgs {
    pub id: String,
    /// New name; omit to clear
    pub name: Option<String>,
    #[command(flatten)]
    pub store: StoreArgs,
}
