//! The leaderboard façade.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use standings_rank_index::{LeaderboardEntry, ParticipantId, RankWindow, Score};
use standings_store::LeaderboardStore;
use tracing::{trace, warn};

use crate::config::ServiceConfig;
use crate::error::ServiceError;
use crate::metrics::ServiceMetrics;

/// Population counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardStats {
    /// Participants with a ledger entry.
    pub participants: usize,
    /// Participants currently ranked.
    pub active: usize,
}

/// Validated entry point over a [`LeaderboardStore`].
///
/// All methods take `&self`; share one service across threads with `Arc`.
#[derive(Debug)]
pub struct LeaderboardService<S = Arc<dyn LeaderboardStore>> {
    store: S,
    config: ServiceConfig,
    metrics: ServiceMetrics,
}

impl<S: LeaderboardStore> LeaderboardService<S> {
    /// Service with default limits.
    pub fn new(store: S) -> Self {
        Self::with_config(store, ServiceConfig::default())
    }

    pub fn with_config(store: S, config: ServiceConfig) -> Self {
        Self {
            store,
            config,
            metrics: ServiceMetrics::default(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// Add `delta` to a participant's score and return the new cumulative
    /// score, which may be zero or negative.
    ///
    /// The identity must be positive and the delta inside the configured
    /// bounds; rejected calls leave no trace in the ledger.
    pub fn update_score(
        &self,
        identity: ParticipantId,
        delta: Score,
    ) -> Result<Score, ServiceError> {
        if identity <= 0 {
            warn!(identity, %delta, "rejected update: identity must be positive");
            self.metrics.record_rejection();
            return Err(ServiceError::out_of_range("identity", identity));
        }
        if !self.config.accepts_delta(delta) {
            warn!(
                identity,
                %delta,
                min = %self.config.min_delta,
                max = %self.config.max_delta,
                "rejected update: delta out of bounds"
            );
            self.metrics.record_rejection();
            return Err(ServiceError::out_of_range("delta", delta));
        }

        let score = self.store.apply_delta(identity, delta);
        let membership = self.store.refresh_active(identity, score)?;
        trace!(identity, %delta, %score, ?membership, "score updated");
        self.metrics.record_update(self.store.active_count());
        Ok(score)
    }

    /// Ranked entries from `start_rank` to `end_rank` inclusive.
    ///
    /// Degenerate windows (`start_rank < 1` or `end_rank < start_rank`) give
    /// an empty list; windows past the last rank are truncated.
    pub fn get_range(&self, start_rank: i32, end_rank: i32) -> Vec<LeaderboardEntry> {
        self.metrics.record_query();
        let (Ok(start), Ok(end)) = (usize::try_from(start_rank), usize::try_from(end_rank)) else {
            return Vec::new();
        };
        RankWindow::new(start, end)
            .map(|window| self.store.range(window))
            .unwrap_or_default()
    }

    /// A participant's entry with up to `high` better-ranked and `low`
    /// worse-ranked entries around it.
    ///
    /// `None` when the participant is not ranked. Negative counts are
    /// treated as zero.
    pub fn get_with_neighbors(
        &self,
        identity: ParticipantId,
        high: i32,
        low: i32,
    ) -> Result<Option<Vec<LeaderboardEntry>>, ServiceError> {
        self.metrics.record_query();
        let rows = self
            .store
            .range_around(identity, &|rank| neighbor_window(rank, high, low))?;
        Ok(rows)
    }

    /// The first `top_limit` ranks.
    pub fn get_top(&self) -> Vec<LeaderboardEntry> {
        self.metrics.record_query();
        RankWindow::new(1, self.config.top_limit)
            .map(|window| self.store.range(window))
            .unwrap_or_default()
    }

    /// Ledger score of any participant seen so far, ranked or not.
    pub fn get_score(&self, identity: ParticipantId) -> Option<Score> {
        self.store.score(identity)
    }

    pub fn rank_of(&self, identity: ParticipantId) -> Result<Option<usize>, ServiceError> {
        Ok(self.store.rank_of(identity)?)
    }

    pub fn stats(&self) -> LeaderboardStats {
        LeaderboardStats {
            participants: self.store.participant_count(),
            active: self.store.active_count(),
        }
    }
}

/// Window of ranks `[max(1, rank - high), rank + low]`, negative counts
/// clamped to zero.
pub fn neighbor_window(rank: usize, high: i32, low: i32) -> Option<RankWindow> {
    let high = usize::try_from(high).unwrap_or(0);
    let low = usize::try_from(low).unwrap_or(0);
    RankWindow::new(rank.saturating_sub(high).max(1), rank.saturating_add(low))
}
