//! Leaderboard state: the score ledger and the ranked active set.
//!
//! This crate keeps two structures consistent:
//!
//! - **[`ScoreLedger`]**: every participant's cumulative score, in a
//!   concurrent map with per-key atomic updates.
//! - **[`ActiveSet`]**: the rank index plus the identity → handle map of
//!   participants whose score is strictly positive.
//!
//! [`InMemoryLeaderboardStore`] composes them behind the
//! [`LeaderboardStore`] trait:
//!
//! - Ledger writes take no index lock
//! - Reconciliation takes the index lock exclusively for the whole
//!   remove-then-insert step
//! - Reads take it shared, so readers never block each other
//!
//! # Usage
//!
//! ```
//! use rust_decimal::Decimal;
//! use standings_store::{InMemoryLeaderboardStore, LeaderboardStore, RankBackend};
//!
//! let store = InMemoryLeaderboardStore::with_backend(RankBackend::Tree, None);
//!
//! let score = store.apply_delta(7, Decimal::from(25));
//! store.refresh_active(7, score).unwrap();
//!
//! assert_eq!(store.rank_of(7).unwrap(), Some(1));
//! ```

mod active;
mod backend;
mod error;
mod ledger;
mod store;

pub use active::{ActiveSet, Membership};
pub use backend::RankBackend;
pub use error::StoreError;
pub use ledger::ScoreLedger;
pub use store::{InMemoryLeaderboardStore, LeaderboardStore};

pub use standings_rank_index::{LeaderboardEntry, ParticipantId, RankWindow, Score};
