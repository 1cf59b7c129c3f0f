use tracing_subscriber::{prelude::*, EnvFilter, Registry};

/// Shape of log lines written to stderr.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or(EnvFilter::try_new("info"))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Initialize tracing
///
/// Logs go to stderr so stdout stays a clean manifest stream.
pub fn init(format: LogFormat) -> anyhow::Result<()> {
    let logger = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    // Decide on layers
    match format {
        LogFormat::Compact => {
            let collector = Registry::default()
                .with(logger.compact())
                .with(env_filter());
            tracing::subscriber::set_global_default(collector)?;
        }
        LogFormat::Json => {
            let collector = Registry::default()
                .with(logger.json())
                .with(env_filter());
            tracing::subscriber::set_global_default(collector)?;
        }
    }
    Ok(())
}
