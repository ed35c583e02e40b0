use standings_store::StoreError;
use thiserror::Error;

/// Errors returned by [`LeaderboardService`](crate::LeaderboardService).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    /// A caller-supplied argument failed validation. Nothing was recorded.
    #[error("{field} out of range: {value}")]
    OutOfRange { field: &'static str, value: String },

    /// The ranking structures disagree with each other.
    #[error("internal ranking error: {0}")]
    Internal(#[from] StoreError),
}

impl ServiceError {
    pub(crate) fn out_of_range(field: &'static str, value: impl ToString) -> Self {
        Self::OutOfRange {
            field,
            value: value.to_string(),
        }
    }

    /// Whether the error is the caller's fault.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::OutOfRange { .. })
    }
}
