//! Height-balanced order-statistics tree.
//!
//! Every node owns its children directly and caches its subtree height and
//! size. Mutations recurse top-down and return the new subtree root, so no
//! node ever refers back to its parent.

use std::cmp::Ordering;

use crate::error::RankIndexError;
use crate::key::{LeaderboardEntry, ParticipantId, RankHandle, RankKey, RankWindow, Score};
use crate::traits::RankIndex;

type Link = Option<Box<Node>>;

#[derive(Debug)]
struct Node {
    key: RankKey,
    left: Link,
    right: Link,
    height: u32,
    /// `1 + left.size + right.size`.
    size: usize,
}

impl Node {
    fn leaf(key: RankKey) -> Box<Self> {
        Box::new(Self {
            key,
            left: None,
            right: None,
            height: 1,
            size: 1,
        })
    }

    /// Recompute cached height and size from the children.
    fn update(&mut self) {
        self.height = 1 + height(&self.left).max(height(&self.right));
        self.size = 1 + size(&self.left) + size(&self.right);
    }

    fn balance_factor(&self) -> i64 {
        i64::from(height(&self.left)) - i64::from(height(&self.right))
    }
}

fn height(link: &Link) -> u32 {
    link.as_ref().map_or(0, |n| n.height)
}

fn size(link: &Link) -> usize {
    link.as_ref().map_or(0, |n| n.size)
}

fn rotate_right(mut y: Box<Node>) -> Box<Node> {
    let Some(mut x) = y.left.take() else {
        return y;
    };
    y.left = x.right.take();
    y.update();
    x.right = Some(y);
    x.update();
    x
}

fn rotate_left(mut x: Box<Node>) -> Box<Node> {
    let Some(mut y) = x.right.take() else {
        return x;
    };
    x.right = y.left.take();
    x.update();
    y.left = Some(x);
    y.update();
    y
}

fn rebalance(mut node: Box<Node>) -> Box<Node> {
    node.update();
    let balance = node.balance_factor();

    if balance > 1 {
        if node.left.as_ref().is_some_and(|l| l.balance_factor() < 0) {
            node.left = node.left.take().map(rotate_left);
        }
        return rotate_right(node);
    }

    if balance < -1 {
        if node.right.as_ref().is_some_and(|r| r.balance_factor() > 0) {
            node.right = node.right.take().map(rotate_right);
        }
        return rotate_left(node);
    }

    node
}

fn insert_at(link: Link, key: RankKey) -> Box<Node> {
    let Some(mut node) = link else {
        return Node::leaf(key);
    };
    if key < node.key {
        node.left = Some(insert_at(node.left.take(), key));
    } else {
        node.right = Some(insert_at(node.right.take(), key));
    }
    rebalance(node)
}

fn min_key(node: &Node) -> RankKey {
    let mut current = node;
    while let Some(left) = current.left.as_deref() {
        current = left;
    }
    current.key
}

/// Remove `key` from the subtree; the flag reports whether it was present.
fn remove_at(link: Link, key: &RankKey) -> (Link, bool) {
    let Some(mut node) = link else {
        return (None, false);
    };

    let removed = match key.cmp(&node.key) {
        Ordering::Less => {
            let (left, removed) = remove_at(node.left.take(), key);
            node.left = left;
            removed
        }
        Ordering::Greater => {
            let (right, removed) = remove_at(node.right.take(), key);
            node.right = right;
            removed
        }
        Ordering::Equal => match (node.left.take(), node.right.take()) {
            (None, right) => return (right, true),
            (left, None) => return (left, true),
            (left, Some(right)) => {
                // Two children: take over the in-order successor's key.
                let successor = min_key(&right);
                node.key = successor;
                node.left = left;
                node.right = remove_at(Some(right), &successor).0;
                true
            }
        },
    };

    (Some(rebalance(node)), removed)
}

/// AVL tree augmented with subtree sizes.
#[derive(Debug, Default)]
pub struct OrderStatisticTree {
    root: Link,
}

impl OrderStatisticTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Height of the tree, `0` when empty.
    pub fn height(&self) -> u32 {
        height(&self.root)
    }

    fn rank_of_key(&self, key: &RankKey) -> Option<usize> {
        let mut rank = 0;
        let mut current = self.root.as_deref();
        while let Some(node) = current {
            match key.cmp(&node.key) {
                Ordering::Equal => return Some(rank + size(&node.left) + 1),
                Ordering::Less => current = node.left.as_deref(),
                Ordering::Greater => {
                    rank += size(&node.left) + 1;
                    current = node.right.as_deref();
                }
            }
        }
        None
    }

    /// Assert the ordering, size and balance invariants of every node.
    ///
    /// # Panics
    ///
    /// Panics on the first violated invariant.
    pub fn check_invariants(&self) {
        fn walk(link: &Link, lower: Option<RankKey>, upper: Option<RankKey>) -> (u32, usize) {
            let Some(node) = link else {
                return (0, 0);
            };
            if let Some(lower) = lower {
                assert!(node.key > lower, "order violated at {}", node.key);
            }
            if let Some(upper) = upper {
                assert!(node.key < upper, "order violated at {}", node.key);
            }
            let (lh, ls) = walk(&node.left, lower, Some(node.key));
            let (rh, rs) = walk(&node.right, Some(node.key), upper);
            assert_eq!(node.size, 1 + ls + rs, "stale size at {}", node.key);
            assert_eq!(node.height, 1 + lh.max(rh), "stale height at {}", node.key);
            assert!(lh.abs_diff(rh) <= 1, "unbalanced at {}", node.key);
            (node.height, node.size)
        }
        walk(&self.root, None, None);
    }
}

impl RankIndex for OrderStatisticTree {
    fn backend(&self) -> &'static str {
        "tree"
    }

    fn insert(&mut self, identity: ParticipantId, score: Score) -> RankHandle {
        let key = RankKey::new(identity, score);
        self.root = Some(insert_at(self.root.take(), key));
        RankHandle::new(key)
    }

    fn remove(&mut self, handle: &RankHandle) -> Result<(), RankIndexError> {
        let key = handle.key();
        let (root, removed) = remove_at(self.root.take(), &key);
        self.root = root;
        if removed {
            Ok(())
        } else {
            Err(RankIndexError::StructuralInconsistency {
                identity: key.identity,
                score: key.score,
            })
        }
    }

    fn rank_of(&self, handle: &RankHandle) -> Result<usize, RankIndexError> {
        let key = handle.key();
        self.rank_of_key(&key)
            .ok_or(RankIndexError::StructuralInconsistency {
                identity: key.identity,
                score: key.score,
            })
    }

    fn select_by_rank(&self, rank: usize) -> Option<RankKey> {
        if rank == 0 || rank > self.len() {
            return None;
        }
        let mut rank = rank;
        let mut current = self.root.as_deref();
        while let Some(node) = current {
            let left = size(&node.left);
            match rank.cmp(&(left + 1)) {
                Ordering::Equal => return Some(node.key),
                Ordering::Less => current = node.left.as_deref(),
                Ordering::Greater => {
                    rank -= left + 1;
                    current = node.right.as_deref();
                }
            }
        }
        None
    }

    fn len(&self) -> usize {
        size(&self.root)
    }

    /// In-order walk starting at the window's first rank: `O(log n + k)`.
    fn range(&self, window: RankWindow) -> Vec<LeaderboardEntry> {
        let Some(window) = window.truncate(self.len()) else {
            return Vec::new();
        };

        // Ancestors still owed an in-order visit, deepest on top.
        let mut pending: Vec<&Node> = Vec::new();
        let mut skip = window.start() - 1;
        let mut current = self.root.as_deref();
        while let Some(node) = current {
            let left = size(&node.left);
            match skip.cmp(&left) {
                Ordering::Less => {
                    pending.push(node);
                    current = node.left.as_deref();
                }
                Ordering::Equal => {
                    pending.push(node);
                    break;
                }
                Ordering::Greater => {
                    skip -= left + 1;
                    current = node.right.as_deref();
                }
            }
        }

        let mut entries = Vec::with_capacity(window.size());
        for rank in window.start()..=window.end() {
            let Some(node) = pending.pop() else {
                break;
            };
            entries.push(LeaderboardEntry::new(node.key, rank));
            let mut next = node.right.as_deref();
            while let Some(n) = next {
                pending.push(n);
                next = n.left.as_deref();
            }
        }
        entries
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;

    fn score(n: i64) -> Score {
        Decimal::from(n)
    }

    fn identities(tree: &OrderStatisticTree) -> Vec<ParticipantId> {
        let window = RankWindow::new(1, tree.len().max(1)).unwrap();
        tree.range(window).iter().map(|e| e.identity).collect()
    }

    #[test]
    fn test_empty_tree() {
        let tree = OrderStatisticTree::new();
        assert_eq!(tree.len(), 0);
        assert!(tree.is_empty());
        assert_eq!(tree.select_by_rank(1), None);
        assert_eq!(tree.select_by_rank(0), None);
        assert!(tree.range(RankWindow::new(1, 10).unwrap()).is_empty());
    }

    #[test]
    fn test_insert_orders_by_score_then_identity() {
        let mut tree = OrderStatisticTree::new();
        let one = tree.insert(1, score(100));
        let two = tree.insert(2, score(150));
        let three = tree.insert(3, score(100));
        tree.check_invariants();

        assert_eq!(tree.rank_of(&two).unwrap(), 1);
        assert_eq!(tree.rank_of(&one).unwrap(), 2);
        assert_eq!(tree.rank_of(&three).unwrap(), 3);
        assert_eq!(identities(&tree), vec![2, 1, 3]);
    }

    #[test]
    fn test_select_out_of_range() {
        let mut tree = OrderStatisticTree::new();
        tree.insert(1, score(5));
        assert_eq!(tree.select_by_rank(0), None);
        assert_eq!(tree.select_by_rank(2), None);
        assert_eq!(tree.select_by_rank(1), Some(RankKey::new(1, score(5))));
    }

    #[test]
    fn test_ascending_inserts_stay_balanced() {
        let mut tree = OrderStatisticTree::new();
        for i in 1..=1024 {
            tree.insert(i, score(i));
        }
        tree.check_invariants();
        assert_eq!(tree.len(), 1024);
        // AVL height bound: 1.44 * log2(n + 2)
        assert!(tree.height() <= 15, "height {}", tree.height());
        assert_eq!(tree.select_by_rank(1).map(|k| k.identity), Some(1024));
        assert_eq!(tree.select_by_rank(1024).map(|k| k.identity), Some(1));
    }

    #[test]
    fn test_remove_node_with_two_children() {
        let mut tree = OrderStatisticTree::new();
        let handles: Vec<_> = (1..=7).map(|i| tree.insert(i, score(10 * i))).collect();
        // The root of a 7-node AVL built this way has two children.
        tree.remove(&handles[3]).unwrap();
        tree.check_invariants();
        assert_eq!(tree.len(), 6);
        assert_eq!(identities(&tree), vec![7, 6, 5, 3, 2, 1]);

        // Surviving handles still resolve even if their key moved nodes.
        assert_eq!(tree.rank_of(&handles[4]).unwrap(), 3);
        assert_eq!(tree.rank_of(&handles[2]).unwrap(), 4);
    }

    #[test]
    fn test_remove_missing_is_structural_inconsistency() {
        let mut tree = OrderStatisticTree::new();
        let handle = tree.insert(1, score(10));
        tree.remove(&handle).unwrap();

        let err = tree.remove(&handle).unwrap_err();
        assert_eq!(
            err,
            RankIndexError::StructuralInconsistency {
                identity: 1,
                score: score(10)
            }
        );
        assert!(tree.rank_of(&handle).is_err());
    }

    #[test]
    fn test_stale_handle_does_not_match_new_score() {
        let mut tree = OrderStatisticTree::new();
        let stale = tree.insert(1, score(10));
        tree.remove(&stale).unwrap();
        let fresh = tree.insert(1, score(20));

        assert!(tree.rank_of(&stale).is_err());
        assert_eq!(tree.rank_of(&fresh).unwrap(), 1);
    }

    #[test]
    fn test_range_walk_matches_select() {
        let mut tree = OrderStatisticTree::new();
        for i in 0..200 {
            tree.insert(i, score((i * 37) % 50));
        }
        tree.check_invariants();

        let window = RankWindow::new(17, 93).unwrap();
        let walked = tree.range(window);
        assert_eq!(walked.len(), window.size());
        for entry in walked {
            let key = tree.select_by_rank(entry.rank).unwrap();
            assert_eq!((key.identity, key.score), (entry.identity, entry.score));
        }
    }

    #[test]
    fn test_range_truncates_at_population() {
        let mut tree = OrderStatisticTree::new();
        for i in 1..=3 {
            tree.insert(i, score(i));
        }
        let entries = tree.range(RankWindow::new(2, 1000).unwrap());
        assert_eq!(entries.iter().map(|e| e.rank).collect::<Vec<_>>(), vec![2, 3]);
        assert!(tree.range(RankWindow::new(4, 9).unwrap()).is_empty());
    }

    #[test]
    fn test_interleaved_removals_keep_sizes() {
        let mut tree = OrderStatisticTree::new();
        let handles: Vec<_> = (0..300).map(|i| tree.insert(i, score(i % 17))).collect();
        for handle in handles.iter().step_by(3) {
            tree.remove(handle).unwrap();
        }
        tree.check_invariants();
        assert_eq!(tree.len(), 200);

        for rank in 1..=tree.len() {
            let key = tree.select_by_rank(rank).unwrap();
            let handle = handles.iter().find(|h| h.key() == key).unwrap();
            assert_eq!(tree.rank_of(handle).unwrap(), rank);
        }
    }
}
