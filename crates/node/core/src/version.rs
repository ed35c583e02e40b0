//! Version information for the standings node.

/// The version string from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// The git commit SHA, when provided at build time.
pub const GIT_SHA: &str = {
    match option_env!("STANDINGS_GIT_SHA") {
        Some(sha) => sha,
        None => "unknown",
    }
};

/// Long version text for `--version`.
pub const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    "\n",
    "Rust version: ",
    env!("CARGO_PKG_RUST_VERSION")
);
