/*!
Logging setup for the command-line tool.

Logs go to stderr through a `tracing-subscriber` fmt layer filtered by `RUST_LOG`. When
`RUST_LOG` is unset a default is chosen from the verbosity flag, so library debug output
(waypoint relocation, segment counts) can be switched on without knowing target names.
*/

use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;

/// Filter used when `RUST_LOG` is not set
pub fn default_filter(verbose: bool) -> &'static str {
    if verbose {
        "debug"
    } else {
        "warn,lane_route_cli=info"
    }
}

/// Initialize the global subscriber
pub fn setup_logging(verbose: bool) {
    if std::env::var("RUST_LOG").is_err() {
        // Safety: single-threaded at startup
        unsafe {
            std::env::set_var("RUST_LOG", default_filter(verbose));
        }
    }

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_default_env());
    tracing_subscriber::registry().with(fmt_layer).init();

    tracing::debug!("Logging initialized");
}
