//! Store CLI arguments.

use clap::Args;
use serde::{Deserialize, Serialize};
use standings_store::RankBackend;

/// Store overrides.
#[derive(Debug, Args, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[command(next_help_heading = "Store")]
#[serde(default)]
pub struct StoreArgs {
    /// Rank index backend.
    #[arg(long = "store.backend", value_enum, value_name = "BACKEND")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backend: Option<RankBackend>,

    /// Seed for skip-list level selection (random when unset).
    #[arg(long = "store.seed", value_name = "SEED")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}
