//! Node infrastructure for the standings binary.
//!
//! - [`args`] - CLI argument structs for logging, store and service settings
//! - [`config`] - Figment configuration loading
//! - [`builder`] - Store and service construction from a loaded configuration
//! - [`logging`] - Logging initialization
//! - [`version`] - Version information

pub mod args;
pub mod builder;
pub mod config;
pub mod logging;
pub mod version;
