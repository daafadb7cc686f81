use std::path::PathBuf;

use thiserror::Error;

pub mod inject;
pub mod store;

pub use store::{KvClient, KvSecret};

#[derive(Debug, Error)]
pub enum Error {
    #[error("request to secret store failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("secret store returned {status} for secret '{name}'")]
    Status {
        name: String,
        status: reqwest::StatusCode,
    },

    // carries the secret name, never the payload
    #[error("couldn't parse payload of secret '{name}': {source}")]
    Payload {
        name: String,
        source: serde_json::Error,
    },

    #[error("secret '{name}' has no usable field '{field}'")]
    MissingField { name: String, field: String },

    #[error("couldn't read secret file {}: {source}", .path.display())]
    SecretFile {
        path: PathBuf,
        source: std::io::Error,
    },
}
