use std::net::{SocketAddr, ToSocketAddrs};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use sketchbin_store::{StorageConfig, StorageKind};
use sketchbin_types::DocumentId;

use crate::error::{ServerError, ServerResult};

/// Environment variables read by [`ServerConfig::apply_env`].
pub mod env {
    pub const HOST: &str = "HOST";
    pub const PORT: &str = "PORT";
    pub const STORAGE_TYPE: &str = "STORAGE_TYPE";
    pub const LOCAL_STORAGE_PATH: &str = "LOCAL_STORAGE_PATH";
    pub const PUBLIC_ORIGIN: &str = "PUBLIC_ORIGIN";
}

const DEFAULT_PORT: u16 = 8888;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind_addr")]
    pub bind_addr: SocketAddr,
    #[serde(default)]
    pub storage: StorageConfig,
    /// Origin prepended to share links, e.g. `https://draw.example.com`.
    #[serde(default)]
    pub public_origin: Option<String>,
    /// Largest accepted request body in bytes.
    #[serde(default = "default_max_payload_size")]
    pub max_payload_size: usize,
}

fn default_bind_addr() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], DEFAULT_PORT))
}

fn default_max_payload_size() -> usize {
    100 * 1024 * 1024
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            storage: StorageConfig::default(),
            public_origin: None,
            max_payload_size: default_max_payload_size(),
        }
    }
}

impl ServerConfig {
    /// Defaults overridden by the process environment.
    pub fn from_env() -> ServerResult<Self> {
        let mut config = Self::default();
        config.apply_env(|name| std::env::var(name).ok())?;
        Ok(config)
    }

    /// Parse a TOML file. Missing keys take their defaults.
    pub fn from_toml_file(path: &Path) -> ServerResult<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| ServerError::Config(format!("cannot read {}: {e}", path.display())))?;
        toml::from_str(&text)
            .map_err(|e| ServerError::Config(format!("invalid config {}: {e}", path.display())))
    }

    /// Override fields from variables that `lookup` reports as set.
    ///
    /// `HOST` and `PORT` replace only their half of the bind address.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) -> ServerResult<()> {
        let host = lookup(env::HOST);
        let port = lookup(env::PORT);
        if host.is_some() || port.is_some() {
            let port = match port {
                Some(p) => p
                    .trim()
                    .parse::<u16>()
                    .map_err(|e| ServerError::Config(format!("invalid {}: {p}: {e}", env::PORT)))?,
                None => self.bind_addr.port(),
            };
            let host = host.unwrap_or_else(|| self.bind_addr.ip().to_string());
            self.bind_addr = resolve_bind_addr(&host, port)?;
        }

        if let Some(kind) = lookup(env::STORAGE_TYPE) {
            self.storage.kind = kind.parse::<StorageKind>()?;
        }
        if let Some(root) = lookup(env::LOCAL_STORAGE_PATH) {
            self.storage.root = PathBuf::from(root);
        }
        if let Some(origin) = lookup(env::PUBLIC_ORIGIN) {
            self.public_origin = Some(origin).filter(|o| !o.trim().is_empty());
        }
        Ok(())
    }

    /// Share link for a document: `<origin>/#json=<id>,<encoded key>`.
    ///
    /// Without a configured origin the link is origin-relative.
    pub fn share_link(&self, id: &DocumentId, key: &str) -> String {
        let origin = self
            .public_origin
            .as_deref()
            .unwrap_or_default()
            .trim_end_matches('/');
        format!("{origin}/#json={id},{}", urlencoding::encode(key))
    }
}

fn resolve_bind_addr(host: &str, port: u16) -> ServerResult<SocketAddr> {
    (host, port)
        .to_socket_addrs()
        .map_err(|e| ServerError::Config(format!("invalid {}: {host}: {e}", env::HOST)))?
        .next()
        .ok_or_else(|| ServerError::Config(format!("{} resolved to nothing: {host}", env::HOST)))
}
