//! Leaderboard construction from a loaded [`NodeConfig`].

use std::sync::Arc;

use eyre::{Result, WrapErr};
use standings_service::{LeaderboardService, LeaderboardStore};
use standings_store::InMemoryLeaderboardStore;
use tracing::info;

use crate::config::NodeConfig;

/// Build the process-wide store and the service over it.
///
/// The store is owned by the returned service; share the service itself
/// (it is `Send + Sync`) across worker threads.
pub fn build_service(config: &NodeConfig) -> Result<LeaderboardService> {
    config
        .service
        .validate()
        .wrap_err("Invalid service configuration")?;

    let store: Arc<dyn LeaderboardStore> = Arc::new(InMemoryLeaderboardStore::with_backend(
        config.store.backend,
        config.store.seed,
    ));
    info!(
        backend = %config.store.backend,
        seed = ?config.store.seed,
        min_delta = %config.service.min_delta,
        max_delta = %config.service.max_delta,
        "leaderboard ready"
    );

    Ok(LeaderboardService::with_config(store, config.service.clone()))
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use standings_store::RankBackend;

    use super::*;

    #[test]
    fn test_builds_configured_backend() {
        let mut config = NodeConfig::default();
        config.store.backend = RankBackend::SkipList;
        config.store.seed = Some(3);

        let service = build_service(&config).unwrap();
        service.update_score(1, Decimal::from(5)).unwrap();
        assert_eq!(service.get_range(1, 1).len(), 1);
        assert_eq!(service.config().top_limit, 100);
    }

    #[test]
    fn test_rejects_inverted_bounds() {
        let mut config = NodeConfig::default();
        config.service.min_delta = Decimal::from(10);
        config.service.max_delta = Decimal::from(1);
        assert!(build_service(&config).is_err());
    }
}
