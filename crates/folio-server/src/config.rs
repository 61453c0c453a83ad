use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};

use folio_core::{ProjectStoreConfig, DEFAULT_PAGE};
use serde::{Deserialize, Serialize};

use crate::error::{ServerError, ServerResult};

/// Server settings, loadable from a TOML file. Missing keys take defaults.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    /// Projects are served from `<project>.<base_domain>`.
    pub base_domain: String,
    /// Root of the durable store; `None` keeps everything in memory.
    pub data_dir: Option<PathBuf>,
    pub update_attempts: u32,
    /// Page served for a project host's `/`.
    pub default_page: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 8787),
            base_domain: "localtest.me".to_string(),
            data_dir: None,
            update_attempts: ProjectStoreConfig::default().update_attempts,
            default_page: DEFAULT_PAGE.to_string(),
        }
    }
}

impl ServerConfig {
    /// Read a config file.
    pub fn load(path: impl AsRef<Path>) -> ServerResult<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml(&text)
    }

    pub fn from_toml(text: &str) -> ServerResult<Self> {
        toml::from_str(text).map_err(|e| ServerError::Config(e.to_string()))
    }

    pub fn store_config(&self) -> ProjectStoreConfig {
        ProjectStoreConfig {
            update_attempts: self.update_attempts,
        }
    }
}
