use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub catalogs: CatalogsConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct CatalogsConfig {
    /// Deadline for a single upstream catalog request, in seconds
    pub request_timeout_secs: u64,

    /// Results requested per page from each catalog
    pub page_size: usize,

    pub hydroshare: CatalogEndpoint,
    pub cinergi: CatalogEndpoint,
}

impl Default for CatalogsConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: 30,
            page_size: 20,
            hydroshare: CatalogEndpoint::default(),
            cinergi: CatalogEndpoint::default(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct CatalogEndpoint {
    pub enabled: bool,

    /// Override for the catalog's built-in endpoint URL
    pub base_url: Option<String>,
}

impl Default for CatalogEndpoint {
    fn default() -> Self {
        Self {
            enabled: true,
            base_url: None,
        }
    }
}

impl Config {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path).context("Failed to read config file")?;
        let config: Config = toml::from_str(&content).context("Failed to parse config file")?;
        Ok(config)
    }
}
