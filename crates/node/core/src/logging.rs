//! Logging configuration for the standings node.

use eyre::{Result, eyre};
use tracing_subscriber::EnvFilter;

use crate::args::LogArgs;

/// Initialize logging based on command line arguments.
///
/// The filter is built with the following precedence:
/// 1. If `--quiet` is set, only errors are shown
/// 2. Otherwise, start with `RUST_LOG` env var if set, or the verbosity level
/// 3. Apply any custom filter from `--log.filter`
///
/// Logs go to stderr so command output on stdout stays machine-readable.
pub fn init_logging(args: &LogArgs) -> Result<()> {
    let filter = build_filter(args);
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time();

    if args.json {
        builder.json().try_init()
    } else {
        builder.try_init()
    }
    .map_err(|err| eyre!("Failed to initialize logging: {err}"))
}

pub(crate) fn build_filter(args: &LogArgs) -> EnvFilter {
    if args.quiet {
        return EnvFilter::new("error");
    }

    let base_level = match args.verbosity {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    let mut filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(base_level));

    if let Some(custom_filter) = &args.filter {
        for directive in custom_filter.split(',') {
            if let Ok(d) = directive.parse() {
                filter = filter.add_directive(d);
            }
        }
    }

    filter
}
