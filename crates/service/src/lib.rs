//! Leaderboard service.
//!
//! [`LeaderboardService`] is the only entry point callers use: it validates
//! score updates, applies them to the ledger, reconciles the ranking and
//! serves ranked listings. It is generic over any [`LeaderboardStore`] and
//! shares cleanly across threads.
//!
//! ```
//! use rust_decimal::Decimal;
//! use standings_service::LeaderboardService;
//! use standings_store::{InMemoryLeaderboardStore, RankBackend};
//!
//! let service = LeaderboardService::new(InMemoryLeaderboardStore::with_backend(
//!     RankBackend::SkipList,
//!     Some(7),
//! ));
//! service.update_score(1, Decimal::from(100)).unwrap();
//! service.update_score(2, Decimal::from(150)).unwrap();
//!
//! let top = service.get_range(1, 10);
//! assert_eq!(top[0].identity, 2);
//! assert_eq!(top[1].rank, 2);
//! ```

mod config;
mod error;
mod metrics;
mod service;

pub use config::{DEFAULT_MAX_DELTA, DEFAULT_MIN_DELTA, DEFAULT_TOP_LIMIT, ServiceConfig};
pub use error::ServiceError;
pub use service::{LeaderboardService, LeaderboardStats, neighbor_window};
pub use standings_rank_index::{LeaderboardEntry, ParticipantId, Score};
pub use standings_store::{LeaderboardStore, RankBackend};
