//! Active-set reconciliation between ledger scores and the rank index.

use std::collections::HashMap;

use standings_rank_index::{
    LeaderboardEntry, ParticipantId, RankHandle, RankIndex, RankIndexError, RankWindow, Score,
};
use tracing::{debug, trace};

/// Outcome of reconciling one participant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Membership {
    /// Score became positive; the participant is now ranked.
    Inserted,
    /// Score dropped to zero or below; the participant left the ranking.
    Removed,
    /// Ranked before and after, under a new score.
    Repositioned,
    /// Nothing to do.
    Unchanged,
}

/// Rank index plus the handles of every ranked participant.
///
/// The handle map is the sole authority for whether an identity is ranked:
/// it holds exactly one entry per node in the index.
#[derive(Debug)]
pub struct ActiveSet<I> {
    index: I,
    members: HashMap<ParticipantId, RankHandle>,
}

impl<I: RankIndex> ActiveSet<I> {
    pub fn new(index: I) -> Self {
        Self {
            index,
            members: HashMap::new(),
        }
    }

    /// Bring the index in line with a participant's current score.
    ///
    /// Index nodes are keyed by score, so an active participant whose score
    /// changed is removed and inserted again rather than edited in place.
    pub fn refresh(
        &mut self,
        identity: ParticipantId,
        score: Score,
    ) -> Result<Membership, RankIndexError> {
        let ranked = score > Score::ZERO;

        match (self.members.get(&identity).copied(), ranked) {
            (Some(handle), false) => {
                self.members.remove(&identity);
                self.index.remove(&handle)?;
                debug!(identity, %score, "participant left the ranking");
                Ok(Membership::Removed)
            }
            (None, true) => {
                let handle = self.index.insert(identity, score);
                self.members.insert(identity, handle);
                debug!(identity, %score, "participant entered the ranking");
                Ok(Membership::Inserted)
            }
            (Some(handle), true) if handle.score() == score => Ok(Membership::Unchanged),
            (Some(handle), true) => {
                self.members.remove(&identity);
                self.index.remove(&handle)?;
                let handle = self.index.insert(identity, score);
                self.members.insert(identity, handle);
                trace!(identity, %score, "participant repositioned");
                Ok(Membership::Repositioned)
            }
            (None, false) => Ok(Membership::Unchanged),
        }
    }

    pub fn is_active(&self, identity: ParticipantId) -> bool {
        self.members.contains_key(&identity)
    }

    /// Rank of an identity, `None` when it is not ranked.
    pub fn rank_of(&self, identity: ParticipantId) -> Result<Option<usize>, RankIndexError> {
        self.members
            .get(&identity)
            .map(|handle| self.index.rank_of(handle))
            .transpose()
    }

    pub fn entry_at(&self, rank: usize) -> Option<LeaderboardEntry> {
        self.index
            .select_by_rank(rank)
            .map(|key| LeaderboardEntry::new(key, rank))
    }

    pub fn range(&self, window: RankWindow) -> Vec<LeaderboardEntry> {
        self.index.range(window)
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn index(&self) -> &I {
        &self.index
    }

    /// Check that the handle map and the index describe the same set.
    pub fn verify(&self) -> Result<(), RankIndexError> {
        for handle in self.members.values() {
            self.index.rank_of(handle)?;
        }
        if self.members.len() != self.index.len() {
            // Some node has no handle; report the first one found.
            let window = RankWindow::new(1, self.index.len().max(1));
            let orphan = window
                .map(|w| self.index.range(w))
                .unwrap_or_default()
                .into_iter()
                .find(|entry| !self.members.contains_key(&entry.identity));
            if let Some(entry) = orphan {
                return Err(RankIndexError::StructuralInconsistency {
                    identity: entry.identity,
                    score: entry.score,
                });
            }
        }
        Ok(())
    }
}
