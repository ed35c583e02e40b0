//! Cumulative score ledger.

use dashmap::DashMap;
use standings_rank_index::{ParticipantId, Score};

/// Participant → cumulative score.
///
/// Entries are created on the first delta and never removed. Scores are not
/// clamped: zero and negative totals are legal here, only ranking is gated
/// on positivity.
#[derive(Debug, Default)]
pub struct ScoreLedger {
    scores: DashMap<ParticipantId, Score>,
}

impl ScoreLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `delta` to a participant's score, starting from zero, and return
    /// the new total.
    ///
    /// The read-modify-write holds the key's shard lock, so concurrent
    /// deltas for the same identity are never lost. Totals saturate at the
    /// decimal range instead of overflowing.
    pub fn apply_delta(&self, identity: ParticipantId, delta: Score) -> Score {
        let mut entry = self.scores.entry(identity).or_insert(Score::ZERO);
        *entry = entry.saturating_add(delta);
        *entry
    }

    pub fn score(&self, identity: ParticipantId) -> Option<Score> {
        self.scores.get(&identity).map(|score| *score)
    }

    /// Number of participants ever seen.
    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }
}
