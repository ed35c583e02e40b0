use standings_rank_index::RankIndexError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The rank index and the active-membership map disagree.
    #[error(transparent)]
    Index(#[from] RankIndexError),
}
