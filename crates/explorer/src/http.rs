use std::time::Duration;

use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::ExplorerError;

/// Shared HTTP client for every provider.
///
/// Cheap to clone; clones share one connection pool.
#[derive(Debug, Clone)]
pub struct HttpClient {
    inner: reqwest::Client,
}

impl HttpClient {
    /// Build a client. `timeout` of `None` waits indefinitely.
    pub fn new(timeout: Option<Duration>) -> Result<Self, ExplorerError> {
        let mut builder = reqwest::Client::builder()
            .user_agent(concat!("btcdash/", env!("CARGO_PKG_VERSION")));
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let inner = builder
            .build()
            .map_err(|e| ExplorerError::Config(e.to_string()))?;
        Ok(Self { inner })
    }

    async fn get(&self, url: &str) -> Result<reqwest::Response, ExplorerError> {
        debug!(%url, "GET");
        let response = self
            .inner
            .get(url)
            .send()
            .await
            .map_err(|e| ExplorerError::Request {
                url: url.to_string(),
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ExplorerError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        Ok(response)
    }

    /// GET `url` and return the body as trimmed text.
    pub async fn get_text(&self, url: &str) -> Result<String, ExplorerError> {
        let body = self
            .get(url)
            .await?
            .text()
            .await
            .map_err(|e| ExplorerError::Request {
                url: url.to_string(),
                message: e.to_string(),
            })?;
        Ok(body.trim().to_string())
    }

    /// GET `url` and deserialize the JSON body.
    pub async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, ExplorerError> {
        let body = self.get_text(url).await?;
        serde_json::from_str(&body).map_err(|e| ExplorerError::Decode {
            url: url.to_string(),
            message: e.to_string(),
        })
    }
}

/// Join a base URL and a path without doubling slashes.
pub(crate) fn join_url(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}
