//! Order-statistics rank index for leaderboard standings.
//!
//! The index keeps every *active* participant in a strict total order,
//! score descending with identity ascending as the tie-break, and answers
//! rank queries in logarithmic time:
//!
//! - [`RankIndex::insert`] / [`RankIndex::remove`]: maintain membership
//! - [`RankIndex::rank_of`]: 1-based rank of a handle
//! - [`RankIndex::select_by_rank`]: the entry at a given rank
//! - [`RankIndex::range`]: an inclusive window of ranks
//!
//! Two backends implement the same contract:
//!
//! - [`OrderStatisticTree`]: height-balanced binary search tree with subtree
//!   sizes, rebalanced top-down with no parent links.
//! - [`SkipListIndex`]: arena-backed probabilistic skip list where every
//!   forward link carries the number of level-0 positions it skips.
//!
//! Both must agree on every observable result for any operation sequence.
//!
//! # Usage
//!
//! ```
//! use rust_decimal::Decimal;
//! use standings_rank_index::{OrderStatisticTree, RankIndex};
//!
//! let mut index = OrderStatisticTree::new();
//! let alice = index.insert(1, Decimal::from(100));
//! let bob = index.insert(2, Decimal::from(150));
//!
//! assert_eq!(index.rank_of(&bob).unwrap(), 1);
//! assert_eq!(index.rank_of(&alice).unwrap(), 2);
//! assert_eq!(index.select_by_rank(1).map(|k| k.identity), Some(2));
//! ```

mod error;
mod key;
mod skiplist;
mod traits;
mod tree;

pub use error::RankIndexError;
pub use key::{LeaderboardEntry, ParticipantId, RankHandle, RankKey, RankWindow, Score};
pub use skiplist::{MAX_LEVEL, PROMOTION_PROBABILITY, SkipListIndex};
pub use traits::RankIndex;
pub use tree::OrderStatisticTree;
