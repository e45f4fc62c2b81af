use std::{fs::File, io, path::PathBuf, sync::Arc};

use tracing::{subscriber, trace, Level};
use tracing_subscriber::{
    fmt::{
        format::{Compact, DefaultFields, Format, Json, JsonFields, Pretty},
        writer::BoxMakeWriter,
        SubscriberBuilder,
    },
    EnvFilter, FmtSubscriber,
};

#[derive(Debug, PartialEq)]
pub enum Verbosity {
    Info,
    Debug,
    Trace,
}

impl From<u8> for Verbosity {
    fn from(v: u8) -> Self {
        match v {
            0 => Verbosity::Info,
            1 => Verbosity::Debug,
            _ => Verbosity::Trace,
        }
    }
}

impl From<Verbosity> for Level {
    fn from(v: Verbosity) -> Self {
        match v {
            Verbosity::Info => Level::INFO,
            Verbosity::Debug => Level::DEBUG,
            Verbosity::Trace => Level::TRACE,
        }
    }
}

pub enum LoggingMode {
    Full,
    Json,
    Compact,
}

fn compact_fmt(level: Level) -> SubscriberBuilder<DefaultFields, Format<Compact>> {
    FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .compact()
}

/// Multi-line events with the source location of every call site.
fn full_fmt(level: Level) -> SubscriberBuilder<Pretty, Format<Pretty>> {
    FmtSubscriber::builder()
        .with_max_level(level)
        .pretty()
        .with_target(false)
        .with_file(true)
        .with_line_number(true)
}

/// One JSON object per event, fields flattened next to `message`.
fn json_fmt(level: Level) -> SubscriberBuilder<JsonFields, Format<Json>> {
    FmtSubscriber::builder()
        .with_max_level(level)
        .json()
        .flatten_event(true)
        .with_current_span(false)
        .with_target(false)
        .with_file(true)
        .with_line_number(true)
}

/// Log to `log_file` when it can be created, otherwise to stdout.
fn writer(log_file: Option<&PathBuf>) -> BoxMakeWriter {
    match log_file.map(File::create) {
        Some(Ok(file)) => BoxMakeWriter::new(Arc::new(file)),
        Some(Err(err)) => {
            eprintln!("Failed to create log file {:#?}: {err}", log_file);
            BoxMakeWriter::new(io::stdout)
        }
        None => BoxMakeWriter::new(io::stdout),
    }
}

pub fn log(
    debug_level: Verbosity,
    mode: LoggingMode,
    log_file: Option<&PathBuf>,
) -> anyhow::Result<()> {
    let level: Level = debug_level.into();
    let env_filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env()?;
    let writer = writer(log_file);

    match mode {
        LoggingMode::Compact => subscriber::set_global_default(
            compact_fmt(level)
                .with_env_filter(env_filter)
                .with_writer(writer)
                .finish(),
        )?,
        LoggingMode::Json => subscriber::set_global_default(
            json_fmt(level)
                .with_env_filter(env_filter)
                .with_writer(writer)
                .finish(),
        )?,
        LoggingMode::Full => subscriber::set_global_default(
            full_fmt(level)
                .with_env_filter(env_filter)
                .with_writer(writer)
                .finish(),
        )?,
    };
    trace!(set_level = %level, "log level set");

    Ok(())
}
