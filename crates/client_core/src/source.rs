//! Order sources: the HTTP endpoint and a static JSON file.

use std::path::PathBuf;

use anyhow::{anyhow, bail, Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use shared::{domain::Order, error::OrdersLoadError};
use tracing::info;
use url::Url;

#[async_trait]
pub trait OrderSource: Send + Sync {
    async fn fetch_orders(&self) -> Result<Vec<Order>, OrdersLoadError>;
}

pub struct HttpOrderSource {
    http: Client,
    endpoint: Url,
}

impl HttpOrderSource {
    pub fn new(endpoint: Url) -> Self {
        Self::with_client(Client::new(), endpoint)
    }

    pub fn with_client(http: Client, endpoint: Url) -> Self {
        Self { http, endpoint }
    }

    async fn request(&self) -> Result<Vec<Order>> {
        let orders = self
            .http
            .get(self.endpoint.clone())
            .send()
            .await
            .with_context(|| format!("failed to reach {}", self.endpoint))?
            .error_for_status()?
            .json::<Vec<Order>>()
            .await
            .context("malformed order payload")?;
        Ok(orders)
    }
}

#[async_trait]
impl OrderSource for HttpOrderSource {
    async fn fetch_orders(&self) -> Result<Vec<Order>, OrdersLoadError> {
        let orders = self.request().await?;
        info!(endpoint = %self.endpoint, count = orders.len(), "fetched orders");
        Ok(orders)
    }
}

/// Reads the order array from a JSON file, as deployed next to static assets.
pub struct FileOrderSource {
    path: PathBuf,
}

impl FileOrderSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    async fn read(&self) -> Result<Vec<Order>> {
        let raw = tokio::fs::read_to_string(&self.path)
            .await
            .with_context(|| format!("failed to read '{}'", self.path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("malformed order file '{}'", self.path.display()))
    }
}

#[async_trait]
impl OrderSource for FileOrderSource {
    async fn fetch_orders(&self) -> Result<Vec<Order>, OrdersLoadError> {
        let orders = self.read().await?;
        info!(path = %self.path.display(), count = orders.len(), "read orders");
        Ok(orders)
    }
}

pub fn order_source_for(endpoint: &Url) -> Result<Box<dyn OrderSource>> {
    match endpoint.scheme() {
        "http" | "https" => Ok(Box::new(HttpOrderSource::new(endpoint.clone()))),
        "file" => {
            let path = endpoint
                .to_file_path()
                .map_err(|()| anyhow!("invalid file endpoint '{endpoint}'"))?;
            Ok(Box::new(FileOrderSource::new(path)))
        }
        other => bail!("unsupported orders endpoint scheme '{other}'"),
    }
}

#[cfg(test)]
#[path = "tests/source_tests.rs"]
mod tests;
