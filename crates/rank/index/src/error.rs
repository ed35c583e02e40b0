use thiserror::Error;

use crate::key::{ParticipantId, Score};

/// Errors raised by a rank index.
///
/// Every variant signals that the index and its caller's bookkeeping have
/// diverged. None of them is recoverable by retrying.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RankIndexError {
    /// A handle's key was not present in the index.
    #[error("structural inconsistency: key (identity {identity}, score {score}) not found in rank index")]
    StructuralInconsistency {
        identity: ParticipantId,
        score: Score,
    },
}
