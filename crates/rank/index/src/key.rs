//! Ranking key, handles and result rows.

use std::cmp::Ordering;
use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Participant identity.
pub type ParticipantId = i64;

/// Fixed-precision cumulative score.
pub type Score = Decimal;

/// Position of a participant in the ranking order.
///
/// Ordering is score descending, then identity ascending. Two keys only
/// compare equal when both fields match, so distinct identities never tie.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RankKey {
    pub identity: ParticipantId,
    pub score: Score,
}

impl RankKey {
    pub fn new(identity: ParticipantId, score: Score) -> Self {
        Self { identity, score }
    }
}

impl Ord for RankKey {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .score
            .cmp(&self.score)
            .then_with(|| self.identity.cmp(&other.identity))
    }
}

impl PartialOrd for RankKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for RankKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.identity, self.score)
    }
}

/// Opaque reference to an entry of a rank index.
///
/// The handle carries the full key it was inserted with rather than a node
/// position, because backends move keys between nodes while rebalancing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RankHandle {
    key: RankKey,
}

impl RankHandle {
    pub(crate) fn new(key: RankKey) -> Self {
        Self { key }
    }

    pub fn identity(&self) -> ParticipantId {
        self.key.identity
    }

    /// Score the entry was inserted with.
    pub fn score(&self) -> Score {
        self.key.score
    }

    pub fn key(&self) -> RankKey {
        self.key
    }
}

/// One row of a ranked listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub identity: ParticipantId,
    pub score: Score,
    /// 1-based rank.
    pub rank: usize,
}

impl LeaderboardEntry {
    pub fn new(key: RankKey, rank: usize) -> Self {
        Self {
            identity: key.identity,
            score: key.score,
            rank,
        }
    }
}

/// Inclusive, 1-based window of ranks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankWindow {
    start: usize,
    end: usize,
}

impl RankWindow {
    /// Returns `None` for degenerate windows (`start < 1` or `end < start`).
    pub fn new(start: usize, end: usize) -> Option<Self> {
        (start >= 1 && end >= start).then_some(Self { start, end })
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn end(&self) -> usize {
        self.end
    }

    /// Truncate the window to a population of `len` ranked entries.
    ///
    /// Returns `None` once the window starts past the last rank.
    pub fn truncate(self, len: usize) -> Option<Self> {
        Self::new(self.start, self.end.min(len))
    }

    /// Number of ranks covered.
    pub fn size(&self) -> usize {
        self.end - self.start + 1
    }

    pub fn contains(&self, rank: usize) -> bool {
        (self.start..=self.end).contains(&rank)
    }
}
