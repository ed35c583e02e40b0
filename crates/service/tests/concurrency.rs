//! Shared-service behavior under concurrent callers.

use std::sync::Arc;

use rust_decimal::Decimal;
use standings_service::{LeaderboardService, LeaderboardStore};
use standings_store::{InMemoryLeaderboardStore, RankBackend};

#[test]
fn test_concurrent_updates_converge_on_ledger() {
    for backend in [RankBackend::Tree, RankBackend::SkipList] {
        let store: Arc<dyn LeaderboardStore> =
            Arc::new(InMemoryLeaderboardStore::with_backend(backend, Some(99)));
        let svc = Arc::new(LeaderboardService::new(store));

        std::thread::scope(|s| {
            for worker in 0..6i64 {
                let svc = Arc::clone(&svc);
                s.spawn(move || {
                    for round in 0..300i64 {
                        let identity = (round * 7 + worker) % 64 + 1;
                        let delta = Decimal::from((round + worker) % 41 - 15);
                        svc.update_score(identity, delta).unwrap();
                    }
                });
            }
            for _ in 0..3 {
                let svc = Arc::clone(&svc);
                s.spawn(move || {
                    for probe in 0..300i64 {
                        let listing = svc.get_range(1, 64);
                        for (pos, entry) in listing.iter().enumerate() {
                            assert_eq!(entry.rank, pos + 1);
                            assert!(entry.score > Decimal::ZERO);
                        }
                        for pair in listing.windows(2) {
                            assert!(
                                pair[0].score > pair[1].score
                                    || (pair[0].score == pair[1].score
                                        && pair[0].identity < pair[1].identity)
                            );
                        }
                        if let Some(around) =
                            svc.get_with_neighbors(probe % 64 + 1, 2, 2).unwrap()
                        {
                            assert!(!around.is_empty() && around.len() <= 5);
                        }
                    }
                });
            }
        });

        let listing = svc.get_range(1, i32::MAX);
        let mut expected: Vec<_> = (1..=64i64)
            .filter_map(|id| svc.get_score(id).map(|score| (id, score)))
            .filter(|(_, score)| *score > Decimal::ZERO)
            .collect();
        expected.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        assert_eq!(
            listing.iter().map(|e| (e.identity, e.score)).collect::<Vec<_>>(),
            expected,
            "{backend}"
        );
        assert_eq!(svc.stats().active, expected.len());
    }
}
