//! Logging setup.
//!
//! Logs go to stderr so that result lines on stdout stay pipeable.

use tracing_subscriber::EnvFilter;

fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        "debug"
    } else {
        "warn"
    }
}

fn filter(verbose: bool) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)))
}

/// Installs the global subscriber.
///
/// `RUST_LOG` wins when set; otherwise `-v` selects `debug` and the default
/// is `warn`. A subscriber that is already installed is left in place.
pub fn init(verbose: bool) {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter(verbose))
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_names(verbose)
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}
