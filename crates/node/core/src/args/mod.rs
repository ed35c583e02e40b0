//! CLI argument structs for node configuration.
//!
//! Store and service arguments are optional overrides: a flag left unset
//! keeps whatever the defaults, environment or config file resolved.

mod log;
mod service;
mod store;

pub use log::LogArgs;
pub use service::ServiceArgs;
pub use store::StoreArgs;
