use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::Serialize;
use serde_json::{ser::PrettyFormatter, Serializer, Value};
use tracing::debug;

use super::{DocumentSink, SinkReceipt};
use crate::{endpoint::Endpoint, error::SinkError};

/// Keeps the latest snapshot of each endpoint as `<output_dir>/<slug>.json`.
#[derive(Debug, Clone)]
pub struct JsonFileSink {
    output_dir: PathBuf,
}

impl JsonFileSink {
    pub fn new(output_dir: &Path) -> Self {
        JsonFileSink {
            output_dir: output_dir.to_path_buf(),
        }
    }

    pub fn path_for(&self, endpoint: &Endpoint) -> PathBuf {
        self.output_dir.join(endpoint.file_name())
    }
}

/// JSON indented with four spaces.
pub fn to_indented_json(document: &Value) -> serde_json::Result<Vec<u8>> {
    let mut buf = Vec::new();
    let mut ser = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
    document.serialize(&mut ser)?;
    Ok(buf)
}

#[async_trait]
impl DocumentSink for JsonFileSink {
    fn name(&self) -> &'static str {
        "file"
    }

    async fn write(&self, endpoint: &Endpoint, document: &Value) -> Result<SinkReceipt, SinkError> {
        let path = self.path_for(endpoint);
        let content = to_indented_json(document).map_err(|source| SinkError::Serialize {
            endpoint: endpoint.to_string(),
            source,
        })?;

        debug!(path = %path.display(), bytes = content.len(), "writing snapshot");
        match tokio::fs::write(&path, content).await {
            Ok(()) => Ok(SinkReceipt::File(path)),
            Err(source) => Err(SinkError::Io { path, source }),
        }
    }
}
