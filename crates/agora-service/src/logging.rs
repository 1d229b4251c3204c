use crate::config::LoggingConfig;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Initialize the logging system based on configuration.
///
/// `RUST_LOG` takes precedence over the configured level.
pub fn init_logging(config: &LoggingConfig) -> anyhow::Result<()> {
    let filter = EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| format!("agora={}", config.level)),
    );

    let registry = tracing_subscriber::registry().with(filter);

    match config.format.as_str() {
        "json" => {
            registry
                .with(fmt::layer().json().with_current_span(true))
                .try_init()?;
        }
        "compact" => {
            registry.with(fmt::layer().compact()).try_init()?;
        }
        _ => {
            registry.with(fmt::layer().pretty()).try_init()?;
        }
    }

    Ok(())
}
