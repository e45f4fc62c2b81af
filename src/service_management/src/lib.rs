use cli_args::{Cli, LogMode};

pub mod logger;

impl From<LogMode> for logger::LoggingMode {
    fn from(mode: LogMode) -> Self {
        match mode {
            LogMode::Full => logger::LoggingMode::Full,
            LogMode::Json => logger::LoggingMode::Json,
            LogMode::Compact => logger::LoggingMode::Compact,
        }
    }
}

/// Installs the global tracing subscriber described by the CLI logging options.
pub fn start(cli: &Cli) -> anyhow::Result<()> {
    logger::log(
        cli.debug.into(),
        cli.log_mode.unwrap_or_default().into(),
        cli.log_file.as_ref(),
    )
}
