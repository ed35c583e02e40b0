//! Both backends must be indistinguishable through the `RankIndex` contract.

use std::collections::BTreeMap;

use proptest::prelude::*;
use rust_decimal::Decimal;
use standings_rank_index::{
    OrderStatisticTree, ParticipantId, RankHandle, RankIndex, RankKey, RankWindow, SkipListIndex,
};

#[derive(Debug, Clone)]
enum Op {
    /// Set a participant's score; non-positive scores unrank it.
    Set(ParticipantId, i64),
    Range(usize, usize),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => (1i64..40, -20i64..60).prop_map(|(id, score)| Op::Set(id, score)),
        1 => (0usize..45, 0usize..45).prop_map(|(start, end)| Op::Range(start, end)),
    ]
}

/// Drives one backend the way the active-set manager does: remove, then
/// reinsert on change.
struct Harness<I> {
    index: I,
    handles: BTreeMap<ParticipantId, RankHandle>,
}

impl<I: RankIndex> Harness<I> {
    fn new(index: I) -> Self {
        Self {
            index,
            handles: BTreeMap::new(),
        }
    }

    fn set(&mut self, identity: ParticipantId, score: i64) {
        if let Some(handle) = self.handles.remove(&identity) {
            self.index.remove(&handle).unwrap();
        }
        if score > 0 {
            let handle = self.index.insert(identity, Decimal::from(score));
            self.handles.insert(identity, handle);
        }
    }

    fn ranks(&self) -> Vec<(ParticipantId, usize)> {
        self.handles
            .iter()
            .map(|(id, handle)| (*id, self.index.rank_of(handle).unwrap()))
            .collect()
    }

    fn listing(&self, start: usize, end: usize) -> Vec<(ParticipantId, Decimal, usize)> {
        RankWindow::new(start, end)
            .map(|w| self.index.range(w))
            .unwrap_or_default()
            .into_iter()
            .map(|e| (e.identity, e.score, e.rank))
            .collect()
    }
}

proptest! {
    #[test]
    fn test_backends_agree_at_every_step(
        ops in proptest::collection::vec(op_strategy(), 1..200),
        seed in any::<u64>(),
    ) {
        let mut tree = Harness::new(OrderStatisticTree::new());
        let mut list = Harness::new(SkipListIndex::with_seed(seed));

        for op in ops {
            match op {
                Op::Set(id, score) => {
                    tree.set(id, score);
                    list.set(id, score);
                }
                Op::Range(start, end) => {
                    prop_assert_eq!(tree.listing(start, end), list.listing(start, end));
                }
            }
            prop_assert_eq!(tree.index.len(), list.index.len());
            prop_assert_eq!(tree.ranks(), list.ranks());
        }

        tree.index.check_invariants();
        list.index.check_invariants();
        let n = tree.index.len().max(1);
        prop_assert_eq!(tree.listing(1, n), list.listing(1, n));
    }

    #[test]
    fn test_full_listing_is_sorted_without_gaps(
        scores in proptest::collection::btree_map(1i64..500, 1i64..1000, 0..120),
        seed in any::<u64>(),
    ) {
        let mut list = SkipListIndex::with_seed(seed);
        let mut tree = OrderStatisticTree::new();
        for (id, score) in &scores {
            list.insert(*id, Decimal::from(*score));
            tree.insert(*id, Decimal::from(*score));
        }

        let mut expected: Vec<RankKey> = scores
            .iter()
            .map(|(id, score)| RankKey::new(*id, Decimal::from(*score)))
            .collect();
        expected.sort();

        for index in [&tree as &dyn RankIndex, &list as &dyn RankIndex] {
            let n = index.len().max(1);
            let listing = index.range(RankWindow::new(1, n).unwrap());
            prop_assert_eq!(listing.len(), expected.len());
            for (pos, (entry, key)) in listing.iter().zip(&expected).enumerate() {
                prop_assert_eq!(entry.rank, pos + 1);
                prop_assert_eq!((entry.identity, entry.score), (key.identity, key.score));
                prop_assert_eq!(index.select_by_rank(entry.rank), Some(*key));
            }
        }
    }
}

#[test]
fn test_boxed_backends_share_the_contract() {
    let mut backends: Vec<Box<dyn RankIndex>> = vec![
        Box::new(OrderStatisticTree::new()),
        Box::new(SkipListIndex::with_seed(0)),
    ];
    for index in &mut backends {
        let a = index.insert(1, Decimal::from(100));
        let b = index.insert(2, Decimal::from(150));
        let c = index.insert(3, Decimal::from(100));
        assert_eq!(index.rank_of(&b).unwrap(), 1, "{}", index.backend());
        assert_eq!(index.rank_of(&a).unwrap(), 2, "{}", index.backend());
        assert_eq!(index.rank_of(&c).unwrap(), 3, "{}", index.backend());

        index.remove(&a).unwrap();
        assert_eq!(index.rank_of(&c).unwrap(), 2, "{}", index.backend());
        assert_eq!(index.len(), 2);
    }
}
