//! Upstream catalog clients and federated search.
//!
//! Each external data catalog implements the [`Catalog`] trait; the registry
//! owns the enabled set and can fan a query out to all of them concurrently.

mod cinergi;
mod error;
mod hydroshare;

pub use cinergi::CinergiCatalog;
pub use error::CatalogError;
pub use hydroshare::HydroShareCatalog;

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::NaiveDateTime;
use futures::future::join_all;
use tracing::info;
use url::Url;

use crate::config::CatalogsConfig;
use crate::models::{BBox, ResourceList};

const USER_AGENT: &str = "Tamarack/0.1 (catalog search)";

/// Typed search inputs shared by all catalogs
#[derive(Debug, Clone, Default)]
pub struct SearchParams {
    pub query: String,
    pub from_date: Option<NaiveDateTime>,
    pub to_date: Option<NaiveDateTime>,
    pub bbox: Option<BBox>,
    pub page: Option<u32>,
}

/// A searchable upstream data catalog
#[async_trait]
pub trait Catalog: Send + Sync {
    /// Stable name used to address this catalog in requests
    fn name(&self) -> &'static str;

    async fn search(&self, params: &SearchParams) -> Result<ResourceList, CatalogError>;
}

/// Registry of enabled catalogs
#[derive(Default)]
pub struct CatalogRegistry {
    catalogs: Vec<Box<dyn Catalog>>,
}

impl CatalogRegistry {
    pub fn new() -> Self {
        Self {
            catalogs: Vec::new(),
        }
    }

    /// Build the registry from configuration. Disabled catalogs are skipped.
    pub fn from_config(config: &CatalogsConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .context("Failed to create HTTP client")?;

        let mut registry = Self::new();

        if config.hydroshare.enabled {
            let base = config
                .hydroshare
                .base_url
                .as_deref()
                .unwrap_or(hydroshare::DEFAULT_BASE_URL);
            let base = Url::parse(base).context("Invalid HydroShare base URL")?;
            registry.register(Box::new(HydroShareCatalog::new(
                client.clone(),
                base,
                config.page_size,
            )));
        }

        if config.cinergi.enabled {
            let base = config
                .cinergi
                .base_url
                .as_deref()
                .unwrap_or(cinergi::DEFAULT_BASE_URL);
            let base = Url::parse(base).context("Invalid CINERGI base URL")?;
            registry.register(Box::new(CinergiCatalog::new(
                client.clone(),
                base,
                config.page_size,
            )));
        }

        info!("Built catalog registry with {} catalogs", registry.len());
        Ok(registry)
    }

    pub fn register(&mut self, catalog: Box<dyn Catalog>) {
        self.catalogs.push(catalog);
    }

    pub fn get(&self, name: &str) -> Option<&dyn Catalog> {
        self.catalogs
            .iter()
            .find(|c| c.name() == name)
            .map(|c| c.as_ref())
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.catalogs.iter().map(|c| c.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.catalogs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.catalogs.is_empty()
    }

    /// Query every registered catalog concurrently.
    ///
    /// One slow or failing catalog never sinks the others: each entry in the
    /// returned list carries that catalog's own outcome.
    pub async fn search_all(
        &self,
        params: &SearchParams,
    ) -> Vec<(String, Result<ResourceList, CatalogError>)> {
        let searches = self.catalogs.iter().map(|catalog| async move {
            (catalog.name().to_string(), catalog.search(params).await)
        });

        join_all(searches).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct StubCatalog {
        name: &'static str,
        fail: bool,
    }

    #[async_trait]
    impl Catalog for StubCatalog {
        fn name(&self) -> &'static str {
            self.name
        }

        async fn search(&self, _params: &SearchParams) -> Result<ResourceList, CatalogError> {
            if self.fail {
                return Err(CatalogError::RequestTimedOut);
            }
            Ok(ResourceList {
                catalog: self.name.to_string(),
                api_url: None,
                count: 0,
                results: vec![],
            })
        }
    }

    fn registry() -> CatalogRegistry {
        let mut registry = CatalogRegistry::new();
        registry.register(Box::new(StubCatalog {
            name: "alpha",
            fail: false,
        }));
        registry.register(Box::new(StubCatalog {
            name: "beta",
            fail: true,
        }));
        registry
    }

    #[test]
    fn test_get_and_names() {
        let registry = registry();
        assert_eq!(registry.names(), vec!["alpha", "beta"]);
        assert!(registry.get("alpha").is_some());
        assert!(registry.get("gamma").is_none());
    }

    #[tokio::test]
    async fn test_search_all_captures_per_catalog_outcomes() {
        let registry = registry();
        let outcomes = registry.search_all(&SearchParams::default()).await;

        assert_eq!(outcomes.len(), 2);
        assert_eq!(outcomes[0].0, "alpha");
        assert!(outcomes[0].1.is_ok());
        assert_eq!(outcomes[1].0, "beta");
        assert_eq!(outcomes[1].1.as_ref().unwrap_err().status_code(), 408);
    }
}
