use thiserror::Error;

#[derive(Debug, Error)]
pub enum PollError {
    #[error("HTTP error on {path}: {source}")]
    Transport {
        path: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("GET {path} returned status {status}")]
    Status { path: String, status: u16 },

    #[error("Malformed body from {path}: {reason}")]
    Body { path: String, reason: String },

    #[error("Device {0} already has a display surface")]
    AlreadyAttached(String),

    #[error("Unknown device type {tag:?} for {name}")]
    UnknownDeviceType { name: String, tag: String },
}

impl PollError {
    pub fn body<P: Into<String>, R: Into<String>>(path: P, reason: R) -> Self {
        Self::Body {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, PollError>;
