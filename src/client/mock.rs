use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::time::Duration;
use tokio::time::Instant;

use crate::client::Transport;
use crate::error::{PollError, Result};

#[derive(Debug, Clone)]
enum Scripted {
    Body(String, Duration),
    Status(u16),
    Hang,
}

/// Scripted transport for poller tests. Unscripted paths answer 404.
#[derive(Default)]
pub(crate) struct MockTransport {
    responses: Mutex<HashMap<String, Scripted>>,
    requests: Mutex<Vec<(String, Instant)>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(&self, path: &str, body: &str) {
        self.respond_after(path, body, Duration::ZERO);
    }

    pub fn respond_after(&self, path: &str, body: &str, delay: Duration) {
        self.responses
            .lock()
            .insert(path.to_string(), Scripted::Body(body.to_string(), delay));
    }

    pub fn fail(&self, path: &str, status: u16) {
        self.responses
            .lock()
            .insert(path.to_string(), Scripted::Status(status));
    }

    pub fn hang(&self, path: &str) {
        self.responses.lock().insert(path.to_string(), Scripted::Hang);
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().iter().map(|(p, _)| p.clone()).collect()
    }

    pub fn request_times(&self, path: &str) -> Vec<Instant> {
        self.requests
            .lock()
            .iter()
            .filter(|(p, _)| p == path)
            .map(|(_, at)| *at)
            .collect()
    }

    pub fn count(&self, path: &str) -> usize {
        self.request_times(path).len()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn get(&self, path: &str) -> Result<String> {
        self.requests.lock().push((path.to_string(), Instant::now()));
        let scripted = self.responses.lock().get(path).cloned();

        match scripted {
            Some(Scripted::Body(body, delay)) => {
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
                Ok(body)
            }
            Some(Scripted::Status(status)) => Err(PollError::Status {
                path: path.to_string(),
                status,
            }),
            Some(Scripted::Hang) => std::future::pending().await,
            None => Err(PollError::Status {
                path: path.to_string(),
                status: 404,
            }),
        }
    }
}
