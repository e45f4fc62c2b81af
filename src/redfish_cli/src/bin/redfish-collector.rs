use clap::Parser;
use redfish_cli::Cli;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // variables already present in the environment take precedence over .env
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    service_management::start(&cli)?;
    redfish_cli::execute(&cli).await
}
