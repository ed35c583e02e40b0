//! The rank index contract shared by every backend.

use auto_impl::auto_impl;

use crate::error::RankIndexError;
use crate::key::{LeaderboardEntry, ParticipantId, RankHandle, RankKey, RankWindow, Score};

/// Order-statistics index over active participants.
///
/// Implementations order entries by [`RankKey`] exclusively. Callers own the
/// membership bookkeeping: an identity must be removed before it is inserted
/// again, and only handles returned by [`insert`](Self::insert) on the same
/// index may be passed back.
#[auto_impl(&mut, Box)]
pub trait RankIndex: Send + Sync {
    /// Short backend name for logs.
    fn backend(&self) -> &'static str;

    /// Insert a participant at its key position.
    fn insert(&mut self, identity: ParticipantId, score: Score) -> RankHandle;

    /// Remove the entry a handle refers to.
    fn remove(&mut self, handle: &RankHandle) -> Result<(), RankIndexError>;

    /// 1-based rank of the entry a handle refers to.
    fn rank_of(&self, handle: &RankHandle) -> Result<usize, RankIndexError>;

    /// Entry at a 1-based rank, `None` outside `1..=len`.
    fn select_by_rank(&self, rank: usize) -> Option<RankKey>;

    /// Number of ranked entries.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Entries inside `window`, truncated at the last rank.
    fn range(&self, window: RankWindow) -> Vec<LeaderboardEntry> {
        let Some(window) = window.truncate(self.len()) else {
            return Vec::new();
        };
        let mut entries = Vec::with_capacity(window.size());
        for rank in window.start()..=window.end() {
            match self.select_by_rank(rank) {
                Some(key) => entries.push(LeaderboardEntry::new(key, rank)),
                None => break,
            }
        }
        entries
    }
}
