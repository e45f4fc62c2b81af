use std::path::PathBuf;

use thiserror::Error;

/// Fatal configuration problems, detected before any collection starts.
#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("Missing required ILO credentials: {}", .0.join(", "))]
    MissingCredentials(Vec<&'static str>),
}

/// Why a single endpoint could not be turned into a document.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Error accessing {url}: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("Error accessing {url}: HTTP status {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },
    #[error("Error decoding JSON from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Failure of one sink write. Never fatal to the run.
#[derive(Error, Debug)]
pub enum SinkError {
    #[error("Error saving file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Error serializing document for {endpoint}: {source}")]
    Serialize {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("MongoDB target is not configured: {0} is not set")]
    NotConfigured(&'static str),
    #[error("MongoDB connection error: {0}")]
    Connect(#[source] mongodb::error::Error),
    #[error("Error encoding record for MongoDB: {0}")]
    Encode(#[from] bson::ser::Error),
    #[error("Error saving to MongoDB: {0}")]
    Insert(#[source] mongodb::error::Error),
}
