//! Leaderboard service metrics

use metrics::{Counter, Gauge};

/// Leaderboard service metrics
#[derive(Clone, Debug)]
pub(crate) struct ServiceMetrics {
    /// Number of accepted score updates
    pub(crate) updates_total: Counter,
    /// Number of score updates rejected by validation
    pub(crate) rejected_updates_total: Counter,
    /// Number of range and neighbor reads
    pub(crate) queries_total: Counter,
    /// Participants currently ranked
    pub(crate) active_participants: Gauge,
}

impl Default for ServiceMetrics {
    fn default() -> Self {
        Self {
            updates_total: metrics::counter!("leaderboard.updates_total"),
            rejected_updates_total: metrics::counter!("leaderboard.rejected_updates_total"),
            queries_total: metrics::counter!("leaderboard.queries_total"),
            active_participants: metrics::gauge!("leaderboard.active_participants"),
        }
    }
}

impl ServiceMetrics {
    pub(crate) fn record_update(&self, active: usize) {
        self.updates_total.increment(1);
        self.active_participants.set(active as f64);
    }

    pub(crate) fn record_rejection(&self) {
        self.rejected_updates_total.increment(1);
    }

    pub(crate) fn record_query(&self) {
        self.queries_total.increment(1);
    }
}
