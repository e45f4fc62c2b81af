use std::{fmt::Display, path::PathBuf};

use async_trait::async_trait;
use serde_json::Value;

use crate::{endpoint::Endpoint, error::SinkError};

pub mod file;
pub mod mongo;

pub use file::JsonFileSink;
pub use mongo::{MongoRecordSink, PersistenceRecord};

/// Where a sink put a document.
#[derive(Debug, Clone, PartialEq)]
pub enum SinkReceipt {
    File(PathBuf),
    Record(String),
}

impl Display for SinkReceipt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SinkReceipt::File(path) => write!(f, "saved response to {}", path.display()),
            SinkReceipt::Record(id) => write!(f, "saved to MongoDB (ID: {id})"),
        }
    }
}

/// A persistence target receiving its own copy of every collected document.
///
/// Implementations report failures through [`SinkError`] and never panic, so one
/// sink failing has no influence on the others.
#[async_trait]
pub trait DocumentSink: Send + Sync {
    fn name(&self) -> &'static str;

    async fn write(&self, endpoint: &Endpoint, document: &Value) -> Result<SinkReceipt, SinkError>;
}
