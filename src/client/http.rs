use async_trait::async_trait;
use log::debug;
use std::time::{Duration, Instant};

use crate::error::{PollError, Result};

/// GET-only access to the device server. Paths are absolute,
/// e.g. `/devices/clk1/clock/datetime`.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, path: &str) -> Result<String>;
}

pub struct HttpTransport {
    root: String,
    client: reqwest::Client,
}

impl HttpTransport {
    /// `timeout` of `None` leaves requests unbounded.
    pub fn new(root: &str, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(|source| PollError::Transport {
            path: root.to_string(),
            source,
        })?;

        Ok(Self {
            root: root.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.root, path.trim_start_matches('/'))
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, path: &str) -> Result<String> {
        let start = Instant::now();
        let transport_err = |source| PollError::Transport {
            path: path.to_string(),
            source,
        };

        let response = self
            .client
            .get(self.url(path))
            .send()
            .await
            .map_err(transport_err)?;

        let status = response.status();
        if !status.is_success() {
            return Err(PollError::Status {
                path: path.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(transport_err)?;
        debug!("GET {} took: {} ms", path, start.elapsed().as_millis());
        Ok(body)
    }
}
