//! Logging setup for the binary

use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter
pub const LOG_ENV: &str = "LAUGHMETER_LOG";

/// Install a stderr subscriber. `LAUGHMETER_LOG` wins over `verbose`.
///
/// Safe to call twice; the second call is a no-op.
pub fn init_logging(verbose: bool) {
    let default = if verbose { "laughmeter=debug" } else { "laughmeter=info" };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
