use tracing_subscriber::{EnvFilter, fmt};

pub const LOG_ENV_VAR: &str = "TALLY_LOG";

/// Filter comes from `TALLY_LOG`, then `RUST_LOG`, then `default_level`.
/// Logs go to stderr so `--json` output on stdout stays parseable.
pub fn init_logging(default_level: &str) {
    let filter = EnvFilter::try_from_env(LOG_ENV_VAR)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .try_init();
}
