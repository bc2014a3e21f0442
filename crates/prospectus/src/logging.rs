use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Default filter: `level` for the CLI, warnings only from the engine crate
fn default_filter(level: &str) -> String {
    format!("prospectus={level},prospectus_core=warn")
}

/// Initialize logging to stderr so stdout stays clean for tables, JSON and CSV.
///
/// The log level can be controlled via the `level` parameter or the `RUST_LOG`
/// environment variable, which takes precedence.
pub fn init_logging(level: &str) -> color_eyre::Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter(level)));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_thread_ids(false),
        )
        .try_init()?;

    tracing::debug!(level, "Prospectus logging initialized");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter_parses() {
        let filter = default_filter("debug");
        assert_eq!(filter, "prospectus=debug,prospectus_core=warn");
        assert!(EnvFilter::try_new(filter).is_ok());
    }
}
