//! Collects Redfish telemetry from a server management controller and keeps a
//! copy of every response as a JSON file and as a MongoDB document.

pub mod collect;
pub mod config;
pub mod endpoint;
pub mod error;
pub mod fetch;
pub mod sink;

pub use collect::{CollectionReport, Collector, EndpointOutcome};
pub use config::{CollectionMode, CollectorConfig, Credentials, DatabaseTarget};
pub use endpoint::{redfish_endpoints, Endpoint, REDFISH_ENDPOINTS};
pub use error::{ConfigError, FetchError, SinkError};
pub use fetch::{Fetcher, RedfishClient, SimulatedFetcher};
pub use sink::{DocumentSink, JsonFileSink, MongoRecordSink, SinkReceipt};
