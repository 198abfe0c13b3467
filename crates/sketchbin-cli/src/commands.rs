use std::io::{self, Write};

use anyhow::{bail, Context};
use colored::Colorize;
use sketchbin_server::{ServerConfig, SketchbinServer};
use sketchbin_store::{DocumentStore, FilesystemDocumentStore};
use sketchbin_types::DocumentId;

use crate::cli::*;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let format = cli.format;
    let mut out = io::stdout();
    match cli.command {
        Command::Serve(args) => cmd_serve(args),
        Command::List(args) => cmd_list(&open_store(&args.store)?, format, &mut out),
        Command::Show(args) => cmd_show(&open_store(&args.store)?, &args.id, &mut out),
        Command::Rm(args) => cmd_rm(&open_store(&args.store)?, &args.id, &mut out),
        Command::Rename(args) => cmd_rename(
            &open_store(&args.store)?,
            &args.id,
            args.name.as_deref(),
            &mut out,
        ),
    }
}

fn open_store(args: &StoreArgs) -> anyhow::Result<FilesystemDocumentStore> {
    FilesystemDocumentStore::open(&args.root)
        .with_context(|| format!("cannot open store at {}", args.root.display()))
}

fn parse_id(raw: &str) -> anyhow::Result<DocumentId> {
    raw.parse()
        .with_context(|| format!("invalid document id: {raw}"))
}

/// Config file first, then environment, then command-line flags.
fn serve_config(
    args: &ServeArgs,
    lookup: impl Fn(&str) -> Option<String>,
) -> anyhow::Result<ServerConfig> {
    let mut config = match &args.config {
        Some(path) => ServerConfig::from_toml_file(path)?,
        None => ServerConfig::default(),
    };
    config.apply_env(lookup)?;
    if let Some(bind) = args.bind {
        config.bind_addr = bind;
    }
    if let Some(kind) = args.storage {
        config.storage.kind = kind;
    }
    if let Some(root) = &args.root {
        config.storage.root = root.clone();
    }
    if let Some(origin) = &args.origin {
        config.public_origin = Some(origin.clone());
    }
    Ok(config)
}

fn cmd_serve(args: ServeArgs) -> anyhow::Result<()> {
    let config = serve_config(&args, |name| std::env::var(name).ok())?;
    println!(
        "Sketchbin on {} (storage: {})",
        config.bind_addr.to_string().bold(),
        config.storage.kind.to_string().cyan()
    );
    let server = SketchbinServer::new(config)?;
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(server.serve())?;
    Ok(())
}

fn cmd_list(store: &dyn DocumentStore, format: OutputFormat, out: &mut impl Write) -> anyhow::Result<()> {
    let documents = store.list()?;
    if format == OutputFormat::Json {
        serde_json::to_writer_pretty(&mut *out, &documents)?;
        writeln!(out)?;
        return Ok(());
    }
    if documents.is_empty() {
        writeln!(out, "No documents.")?;
        return Ok(());
    }
    for doc in &documents {
        let created = doc
            .created_at
            .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_else(|| "-".into());
        writeln!(
            out,
            "{}  {:>10}  {}  {}",
            doc.id.to_string().yellow(),
            doc.size,
            created.dimmed(),
            doc.name.as_deref().unwrap_or("")
        )?;
    }
    writeln!(out, "{} document(s)", documents.len().to_string().bold())?;
    Ok(())
}

fn cmd_show(store: &dyn DocumentStore, raw: &str, out: &mut impl Write) -> anyhow::Result<()> {
    let id = parse_id(raw)?;
    let Some(payload) = store.find(&id)? else {
        bail!("document {id} not found");
    };
    out.write_all(&payload)?;
    out.flush()?;
    Ok(())
}

fn cmd_rm(store: &dyn DocumentStore, raw: &str, out: &mut impl Write) -> anyhow::Result<()> {
    let id = parse_id(raw)?;
    if !store.delete(&id)? {
        bail!("document {id} not found");
    }
    writeln!(out, "{} Deleted {}", "✓".green(), id.to_string().yellow())?;
    Ok(())
}

fn cmd_rename(
    store: &dyn DocumentStore,
    raw: &str,
    name: Option<&str>,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let id = parse_id(raw)?;
    if !store.set_name(&id, name)? {
        bail!("document {id} not found");
    }
    match store.get_name(&id)? {
        Some(name) => writeln!(out, "{} Named {} {}", "✓".green(), id.to_string().yellow(), name.bold())?,
        None => writeln!(out, "{} Cleared name of {}", "✓".green(), id.to_string().yellow())?,
    }
    Ok(())
}
