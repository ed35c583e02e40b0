//! Locked in-memory leaderboard store.

use auto_impl::auto_impl;
use parking_lot::RwLock;
use standings_rank_index::{
    LeaderboardEntry, ParticipantId, RankIndex, RankIndexError, RankWindow, Score,
};
use tracing::{error, trace};

use crate::active::{ActiveSet, Membership};
use crate::backend::RankBackend;
use crate::error::StoreError;
use crate::ledger::ScoreLedger;

/// Storage contract consumed by the leaderboard service.
///
/// Auto-implemented for `&`, `Box` and `Arc`, so one store can be shared
/// across request handlers.
#[auto_impl(&, Box, Arc)]
pub trait LeaderboardStore: Send + Sync {
    /// Add `delta` to a participant's ledger score and return the new total.
    fn apply_delta(&self, identity: ParticipantId, delta: Score) -> Score;

    /// Ledger score of any participant seen so far, ranked or not.
    fn score(&self, identity: ParticipantId) -> Option<Score>;

    /// Reconcile rank index membership after a ledger change.
    fn refresh_active(
        &self,
        identity: ParticipantId,
        new_score: Score,
    ) -> Result<Membership, StoreError>;

    /// Participants in the ledger.
    fn participant_count(&self) -> usize;

    /// Participants in the ranking.
    fn active_count(&self) -> usize;

    fn entry_at(&self, rank: usize) -> Option<LeaderboardEntry>;

    /// Current rank, `None` when the participant is not ranked.
    fn rank_of(&self, identity: ParticipantId) -> Result<Option<usize>, StoreError>;

    /// Ranked entries inside `window`, truncated at the last rank.
    fn range(&self, window: RankWindow) -> Vec<LeaderboardEntry>;

    /// Look up a participant's rank and list the window `window_for` derives
    /// from it, both under one read lock.
    ///
    /// `None` when the participant is not ranked.
    fn range_around(
        &self,
        identity: ParticipantId,
        window_for: &dyn Fn(usize) -> Option<RankWindow>,
    ) -> Result<Option<Vec<LeaderboardEntry>>, StoreError>;
}

/// Process-local store: a lock-free-per-key ledger plus a `RwLock`-guarded
/// active set.
///
/// Lock order is ledger shard first, released, then the active-set lock;
/// the two are never held together.
#[derive(Debug)]
pub struct InMemoryLeaderboardStore<I = Box<dyn RankIndex>> {
    ledger: ScoreLedger,
    active: RwLock<ActiveSet<I>>,
}

impl InMemoryLeaderboardStore {
    /// Create an empty store on the chosen backend.
    pub fn with_backend(backend: RankBackend, seed: Option<u64>) -> Self {
        Self::new(backend.build(seed))
    }
}

impl<I: RankIndex> InMemoryLeaderboardStore<I> {
    pub fn new(index: I) -> Self {
        Self {
            ledger: ScoreLedger::new(),
            active: RwLock::new(ActiveSet::new(index)),
        }
    }

    pub fn ledger(&self) -> &ScoreLedger {
        &self.ledger
    }

    /// Name of the underlying rank index.
    pub fn backend(&self) -> &'static str {
        self.active.read().index().backend()
    }

    /// Check that the handle map and rank index agree.
    pub fn verify(&self) -> Result<(), StoreError> {
        Ok(self.active.read().verify()?)
    }

    fn report(identity: ParticipantId, err: RankIndexError) -> StoreError {
        error!(identity, %err, "rank index out of sync with active set");
        StoreError::Index(err)
    }
}

impl<I: RankIndex> LeaderboardStore for InMemoryLeaderboardStore<I> {
    fn apply_delta(&self, identity: ParticipantId, delta: Score) -> Score {
        self.ledger.apply_delta(identity, delta)
    }

    fn score(&self, identity: ParticipantId) -> Option<Score> {
        self.ledger.score(identity)
    }

    /// The ledger is authoritative: the reconcile uses the score the ledger
    /// holds once the exclusive lock is taken. That is `new_score` unless a
    /// concurrent update for the same identity landed in between, in which
    /// case the later total wins and racing updates converge.
    fn refresh_active(
        &self,
        identity: ParticipantId,
        new_score: Score,
    ) -> Result<Membership, StoreError> {
        let mut active = self.active.write();
        let score = self.ledger.score(identity).unwrap_or(new_score);
        if score != new_score {
            trace!(identity, %new_score, %score, "reconciling against newer ledger score");
        }
        active
            .refresh(identity, score)
            .map_err(|err| Self::report(identity, err))
    }

    fn participant_count(&self) -> usize {
        self.ledger.len()
    }

    fn active_count(&self) -> usize {
        self.active.read().len()
    }

    fn entry_at(&self, rank: usize) -> Option<LeaderboardEntry> {
        self.active.read().entry_at(rank)
    }

    fn rank_of(&self, identity: ParticipantId) -> Result<Option<usize>, StoreError> {
        self.active
            .read()
            .rank_of(identity)
            .map_err(|err| Self::report(identity, err))
    }

    fn range(&self, window: RankWindow) -> Vec<LeaderboardEntry> {
        self.active.read().range(window)
    }

    fn range_around(
        &self,
        identity: ParticipantId,
        window_for: &dyn Fn(usize) -> Option<RankWindow>,
    ) -> Result<Option<Vec<LeaderboardEntry>>, StoreError> {
        let active = self.active.read();
        let Some(rank) = active
            .rank_of(identity)
            .map_err(|err| Self::report(identity, err))?
        else {
            return Ok(None);
        };
        Ok(Some(
            window_for(rank)
                .map(|window| active.range(window))
                .unwrap_or_default(),
        ))
    }
}
