//! Service limits.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use standings_rank_index::Score;

use crate::error::ServiceError;

/// Smallest accepted delta by default.
pub const DEFAULT_MIN_DELTA: i64 = -1000;
/// Largest accepted delta by default.
pub const DEFAULT_MAX_DELTA: i64 = 1000;
/// Default size of the top listing.
pub const DEFAULT_TOP_LIMIT: usize = 100;

/// Limits applied at the service boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Inclusive lower bound on a single score delta.
    pub min_delta: Decimal,
    /// Inclusive upper bound on a single score delta.
    pub max_delta: Decimal,
    /// Number of ranks returned by `get_top`.
    pub top_limit: usize,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            min_delta: Decimal::from(DEFAULT_MIN_DELTA),
            max_delta: Decimal::from(DEFAULT_MAX_DELTA),
            top_limit: DEFAULT_TOP_LIMIT,
        }
    }
}

impl ServiceConfig {
    /// Reject configurations no update could ever satisfy consistently.
    pub fn validate(&self) -> Result<(), ServiceError> {
        if self.min_delta > self.max_delta {
            return Err(ServiceError::out_of_range(
                "min_delta",
                format!("{} > max_delta {}", self.min_delta, self.max_delta),
            ));
        }
        if self.top_limit == 0 {
            return Err(ServiceError::out_of_range("top_limit", 0));
        }
        Ok(())
    }

    pub fn accepts_delta(&self, delta: Score) -> bool {
        (self.min_delta..=self.max_delta).contains(&delta)
    }
}
