use tracing::{error, info, warn};

use crate::{
    config::{CollectionMode, CollectorConfig},
    endpoint::{redfish_endpoints, Endpoint},
    error::{ConfigError, FetchError, SinkError},
    fetch::{Fetcher, RedfishClient, SimulatedFetcher},
    sink::{DocumentSink, JsonFileSink, MongoRecordSink, SinkReceipt},
};

/// What happened to one endpoint during a run.
#[derive(Debug)]
pub enum EndpointOutcome {
    /// Nothing was written for this endpoint.
    FetchFailed {
        endpoint: Endpoint,
        error: FetchError,
    },
    /// Both sinks were attempted, independently.
    Collected {
        endpoint: Endpoint,
        file: Result<SinkReceipt, SinkError>,
        record: Result<SinkReceipt, SinkError>,
    },
}

impl EndpointOutcome {
    pub fn endpoint(&self) -> &Endpoint {
        match self {
            EndpointOutcome::FetchFailed { endpoint, .. } => endpoint,
            EndpointOutcome::Collected { endpoint, .. } => endpoint,
        }
    }

    /// Fetched and persisted to both sinks.
    pub fn is_complete(&self) -> bool {
        matches!(
            self,
            EndpointOutcome::Collected {
                file: Ok(_),
                record: Ok(_),
                ..
            }
        )
    }
}

/// Per-endpoint results of one `collect_all` run, in collection order.
#[derive(Debug, Default)]
pub struct CollectionReport {
    pub outcomes: Vec<EndpointOutcome>,
}

impl CollectionReport {
    pub fn failed_endpoints(&self) -> Vec<&Endpoint> {
        self.outcomes
            .iter()
            .filter(|o| !o.is_complete())
            .map(EndpointOutcome::endpoint)
            .collect()
    }

    pub fn fetched(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, EndpointOutcome::Collected { .. }))
            .count()
    }

    pub fn files_written(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, EndpointOutcome::Collected { file: Ok(_), .. }))
            .count()
    }

    pub fn records_inserted(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, EndpointOutcome::Collected { record: Ok(_), .. }))
            .count()
    }
}

/// Walks the endpoints once, in order, and hands every fetched document to both sinks.
pub struct Collector {
    endpoints: Vec<Endpoint>,
    fetcher: Box<dyn Fetcher>,
    file_sink: Box<dyn DocumentSink>,
    record_sink: Box<dyn DocumentSink>,
}

impl Collector {
    pub fn new(
        endpoints: Vec<Endpoint>,
        fetcher: Box<dyn Fetcher>,
        file_sink: Box<dyn DocumentSink>,
        record_sink: Box<dyn DocumentSink>,
    ) -> Self {
        Collector {
            endpoints,
            fetcher,
            file_sink,
            record_sink,
        }
    }

    /// Wires the Redfish endpoints, the fetcher for the configured mode and the
    /// file and MongoDB sinks. Creates the output directory when it is missing.
    ///
    /// A live config without credentials is rejected; it never falls back to
    /// simulated documents.
    pub fn from_config(config: &CollectorConfig) -> anyhow::Result<Self> {
        let fetcher: Box<dyn Fetcher> = match (config.mode, &config.credentials) {
            (CollectionMode::Simulation, _) => Box::new(SimulatedFetcher),
            (CollectionMode::Live, Some(credentials)) => {
                Box::new(RedfishClient::new(&config.base_url, credentials.clone())?)
            }
            (CollectionMode::Live, None) => {
                return Err(
                    ConfigError::MissingCredentials(vec!["ILO_USER", "ILO_PASSWORD"]).into(),
                )
            }
        };

        if let Err(err) = std::fs::create_dir_all(&config.output_dir) {
            warn!(
                output_dir = %config.output_dir.display(),
                %err,
                "unable to create output directory"
            );
        }

        Ok(Collector::new(
            redfish_endpoints(),
            fetcher,
            Box::new(JsonFileSink::new(&config.output_dir)),
            Box::new(MongoRecordSink::new(
                config.database.clone(),
                &config.base_url,
                config.simulation_mode(),
            )),
        ))
    }

    pub fn endpoints(&self) -> &[Endpoint] {
        &self.endpoints
    }

    pub async fn collect_all(&self) -> CollectionReport {
        let mut report = CollectionReport::default();
        for endpoint in &self.endpoints {
            report.outcomes.push(self.collect(endpoint).await);
        }

        info!(
            endpoints = self.endpoints.len(),
            fetched = report.fetched(),
            files = report.files_written(),
            records = report.records_inserted(),
            "Collection complete!"
        );
        let failed = report.failed_endpoints();
        if !failed.is_empty() {
            let failed: Vec<&str> = failed.into_iter().map(Endpoint::path).collect();
            warn!(failed = %failed.join(", "), "some endpoints were not fully collected");
        }
        report
    }

    async fn collect(&self, endpoint: &Endpoint) -> EndpointOutcome {
        info!(%endpoint, "collecting");
        let document = match self.fetcher.fetch(endpoint).await {
            Ok(document) => document,
            Err(error) => {
                error!(%endpoint, %error, "fetch failed, skipping sinks");
                return EndpointOutcome::FetchFailed {
                    endpoint: endpoint.clone(),
                    error,
                };
            }
        };

        let file = self.file_sink.write(endpoint, &document).await;
        log_sink_result(self.file_sink.name(), endpoint, &file);
        let record = self.record_sink.write(endpoint, &document).await;
        log_sink_result(self.record_sink.name(), endpoint, &record);

        EndpointOutcome::Collected {
            endpoint: endpoint.clone(),
            file,
            record,
        }
    }
}

fn log_sink_result(sink: &str, endpoint: &Endpoint, result: &Result<SinkReceipt, SinkError>) {
    match result {
        Ok(receipt) => info!(sink, %endpoint, "{receipt}"),
        Err(error) => error!(sink, %endpoint, %error, "sink write failed"),
    }
}
