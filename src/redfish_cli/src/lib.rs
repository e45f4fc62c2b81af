use resource_redfish::{Collector, CollectorConfig};
use tracing::info;

pub use cli_args::Cli;

/// Runs one collection pass over every Redfish endpoint.
///
/// Only configuration problems are returned as errors; endpoint and sink
/// failures are logged and reported in the run summary.
pub async fn execute(cli: &Cli) -> anyhow::Result<()> {
    let config = CollectorConfig::try_from(&cli.collect)?;
    info!(
        mode = %config.mode,
        source = %config.base_url,
        output_dir = %config.output_dir.display(),
        mongodb = %config.database.describe(),
        "Starting collection"
    );

    let collector = Collector::from_config(&config)?;
    collector.collect_all().await;

    Ok(())
}
