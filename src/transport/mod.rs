//! HTTP transport shared by all provider drivers.

mod http;

pub use http::{HttpReply, HttpTransport, TransportConfig};

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Endpoint could not be reached; `hint` tells the user what to check.
    #[error("Could not reach {url}: {hint}")]
    Unreachable { url: String, hint: String },

    #[error("Transport error: {0}")]
    Other(String),
}
