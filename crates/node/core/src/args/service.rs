//! Service CLI arguments.

use clap::Args;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Service limit overrides.
#[derive(Debug, Args, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[command(next_help_heading = "Service")]
#[serde(default)]
pub struct ServiceArgs {
    /// Smallest accepted score delta.
    #[arg(long = "service.min-delta", value_name = "DELTA", allow_hyphen_values = true)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_delta: Option<Decimal>,

    /// Largest accepted score delta.
    #[arg(long = "service.max-delta", value_name = "DELTA", allow_hyphen_values = true)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_delta: Option<Decimal>,

    /// Number of ranks in the top listing.
    #[arg(long = "service.top-limit", value_name = "COUNT")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_limit: Option<usize>,
}
