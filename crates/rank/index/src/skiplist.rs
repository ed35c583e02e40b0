//! Span-indexed probabilistic skip list.
//!
//! Nodes live in an arena and refer to each other by index. Slot `0` is the
//! header; it never carries a ranked key. Every forward link records its
//! *span*, the number of level-0 steps it covers, so rank queries accumulate
//! spans while descending instead of walking the bottom level.
//!
//! ```text
//! level 2: HEAD ----------------(3)----------------> C -------(∅)
//! level 1: HEAD -----(1)-----> A -------(2)-------> C --(1)--> D
//! level 0: HEAD --(1)--> A --(1)--> B --(1)--> C --(1)--> D
//! ```
//!
//! A link whose target is the end of the list spans the number of entries
//! after its source, which keeps splicing arithmetic uniform at the tail.

use std::collections::HashMap;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rust_decimal::Decimal;
use tracing::trace;

use crate::error::RankIndexError;
use crate::key::{LeaderboardEntry, ParticipantId, RankHandle, RankKey, RankWindow, Score};
use crate::traits::RankIndex;

/// Maximum number of levels a node may occupy.
pub const MAX_LEVEL: usize = 32;

/// Probability of promoting a node one level further up.
pub const PROMOTION_PROBABILITY: f64 = 0.25;

const HEAD: usize = 0;
const NIL: usize = usize::MAX;

#[derive(Debug, Clone, Copy)]
struct Link {
    next: usize,
    span: usize,
}

impl Link {
    const EMPTY: Link = Link { next: NIL, span: 0 };
}

#[derive(Debug)]
struct SkipNode {
    key: RankKey,
    /// One link per level this node participates in.
    links: Vec<Link>,
    /// Level-0 predecessor, `NIL` for the first entry.
    backward: usize,
}

/// Skip list rank index with spans on every link.
#[derive(Debug)]
pub struct SkipListIndex {
    nodes: Vec<SkipNode>,
    free: Vec<usize>,
    /// Highest level currently in use, at least 1.
    level: usize,
    len: usize,
    tail: usize,
    rng: StdRng,
}

impl Default for SkipListIndex {
    fn default() -> Self {
        Self::new()
    }
}

// Arena indices handed out by `alloc` stay valid until `release`.
#[allow(clippy::indexing_slicing)]
impl SkipListIndex {
    /// Create an empty skip list seeded from the operating system.
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_os_rng())
    }

    /// Create an empty skip list with reproducible level selection.
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        let header = SkipNode {
            key: RankKey::new(0, Decimal::ZERO),
            links: vec![Link::EMPTY; MAX_LEVEL],
            backward: NIL,
        };
        Self {
            nodes: vec![header],
            free: Vec::new(),
            level: 1,
            len: 0,
            tail: NIL,
            rng,
        }
    }

    /// Highest level currently in use.
    pub fn level(&self) -> usize {
        self.level
    }

    /// Lowest-ranked entry.
    pub fn last(&self) -> Option<RankKey> {
        (self.tail != NIL).then(|| self.nodes[self.tail].key)
    }

    fn random_level(&mut self) -> usize {
        let mut level = 1;
        while level < MAX_LEVEL && self.rng.random_bool(PROMOTION_PROBABILITY) {
            level += 1;
        }
        level
    }

    fn link(&self, node: usize, level: usize) -> Link {
        self.nodes[node].links[level]
    }

    fn link_mut(&mut self, node: usize, level: usize) -> &mut Link {
        &mut self.nodes[node].links[level]
    }

    fn key(&self, node: usize) -> &RankKey {
        &self.nodes[node].key
    }

    fn alloc(&mut self, key: RankKey, level: usize) -> usize {
        let node = SkipNode {
            key,
            links: vec![Link::EMPTY; level],
            backward: NIL,
        };
        match self.free.pop() {
            Some(slot) => {
                self.nodes[slot] = node;
                slot
            }
            None => {
                self.nodes.push(node);
                self.nodes.len() - 1
            }
        }
    }

    fn release(&mut self, slot: usize) {
        let node = &mut self.nodes[slot];
        node.links.clear();
        node.backward = NIL;
        self.free.push(slot);
    }

    /// Rightmost node per level whose key sorts before `key`.
    ///
    /// The second array holds the rank of each of those nodes.
    fn predecessors(&self, key: &RankKey) -> ([usize; MAX_LEVEL], [usize; MAX_LEVEL]) {
        let mut update = [HEAD; MAX_LEVEL];
        let mut rank = [0; MAX_LEVEL];
        let mut x = HEAD;
        for i in (0..self.level).rev() {
            rank[i] = if i + 1 == self.level { 0 } else { rank[i + 1] };
            loop {
                let link = self.link(x, i);
                if link.next != NIL && self.key(link.next) < key {
                    rank[i] += link.span;
                    x = link.next;
                } else {
                    break;
                }
            }
            update[i] = x;
        }
        (update, rank)
    }

    /// Node at a 1-based rank; caller guarantees `1 <= rank <= len`.
    fn node_at(&self, rank: usize) -> Option<usize> {
        let mut traversed = 0;
        let mut x = HEAD;
        for i in (0..self.level).rev() {
            loop {
                let link = self.link(x, i);
                if link.next != NIL && traversed + link.span <= rank {
                    traversed += link.span;
                    x = link.next;
                } else {
                    break;
                }
            }
            if traversed == rank {
                return (x != HEAD).then_some(x);
            }
        }
        None
    }

    fn inconsistency(key: RankKey) -> RankIndexError {
        RankIndexError::StructuralInconsistency {
            identity: key.identity,
            score: key.score,
        }
    }

    /// Assert span, ordering, backward-link and level invariants.
    ///
    /// # Panics
    ///
    /// Panics on the first violated invariant.
    pub fn check_invariants(&self) {
        let mut ranks = HashMap::new();
        let mut prev = HEAD;
        let mut x = self.link(HEAD, 0).next;
        while x != NIL {
            let rank = ranks.len() + 1;
            ranks.insert(x, rank);
            if prev != HEAD {
                assert!(self.key(prev) < self.key(x), "order violated at rank {rank}");
            }
            let expected_back = if prev == HEAD { NIL } else { prev };
            assert_eq!(self.nodes[x].backward, expected_back, "backward link at rank {rank}");
            prev = x;
            x = self.link(x, 0).next;
        }
        assert_eq!(ranks.len(), self.len, "level-0 walk disagrees with len");
        assert_eq!(self.tail, if prev == HEAD { NIL } else { prev }, "stale tail");

        for i in 0..self.level {
            let mut x = HEAD;
            let mut x_rank = 0;
            loop {
                let link = self.link(x, i);
                if link.next == NIL {
                    assert_eq!(link.span, self.len - x_rank, "tail span at level {i}");
                    break;
                }
                let next_rank = ranks[&link.next];
                assert_eq!(link.span, next_rank - x_rank, "span at level {i}");
                x = link.next;
                x_rank = next_rank;
            }
        }

        for i in self.level..MAX_LEVEL {
            assert_eq!(self.link(HEAD, i).next, NIL, "level {i} above max level in use");
        }
        if self.level > 1 {
            assert_ne!(self.link(HEAD, self.level - 1).next, NIL, "empty top level");
        }
    }
}

#[allow(clippy::indexing_slicing)]
impl RankIndex for SkipListIndex {
    fn backend(&self) -> &'static str {
        "skiplist"
    }

    fn insert(&mut self, identity: ParticipantId, score: Score) -> RankHandle {
        let key = RankKey::new(identity, score);
        let (mut update, mut rank) = self.predecessors(&key);

        let level = self.random_level();
        if level > self.level {
            for i in self.level..level {
                rank[i] = 0;
                update[i] = HEAD;
                self.link_mut(HEAD, i).span = self.len;
            }
            trace!(from = self.level, to = level, "skip list level raised");
            self.level = level;
        }

        let node = self.alloc(key, level);
        for i in 0..level {
            let prev = self.link(update[i], i);
            let offset = rank[0] - rank[i];
            self.nodes[node].links[i] = Link {
                next: prev.next,
                span: prev.span - offset,
            };
            *self.link_mut(update[i], i) = Link {
                next: node,
                span: offset + 1,
            };
        }

        // Levels above the new node now jump over one more entry.
        for i in level..self.level {
            self.link_mut(update[i], i).span += 1;
        }

        self.nodes[node].backward = if update[0] == HEAD { NIL } else { update[0] };
        let next = self.link(node, 0).next;
        if next == NIL {
            self.tail = node;
        } else {
            self.nodes[next].backward = node;
        }

        self.len += 1;
        RankHandle::new(key)
    }

    fn remove(&mut self, handle: &RankHandle) -> Result<(), RankIndexError> {
        let key = handle.key();
        let (update, _) = self.predecessors(&key);

        let node = self.link(update[0], 0).next;
        if node == NIL || *self.key(node) != key {
            return Err(Self::inconsistency(key));
        }

        for i in 0..self.level {
            let prev = self.link(update[i], i);
            if prev.next == node {
                let removed = self.link(node, i);
                *self.link_mut(update[i], i) = Link {
                    next: removed.next,
                    span: prev.span + removed.span - 1,
                };
            } else {
                self.link_mut(update[i], i).span -= 1;
            }
        }

        let next = self.link(node, 0).next;
        let backward = self.nodes[node].backward;
        if next == NIL {
            self.tail = backward;
        } else {
            self.nodes[next].backward = backward;
        }

        while self.level > 1 && self.link(HEAD, self.level - 1).next == NIL {
            self.level -= 1;
        }

        self.release(node);
        self.len -= 1;
        Ok(())
    }

    fn rank_of(&self, handle: &RankHandle) -> Result<usize, RankIndexError> {
        let key = handle.key();
        let (update, rank) = self.predecessors(&key);
        let next = self.link(update[0], 0).next;
        if next != NIL && *self.key(next) == key {
            Ok(rank[0] + 1)
        } else {
            Err(Self::inconsistency(key))
        }
    }

    fn select_by_rank(&self, rank: usize) -> Option<RankKey> {
        if rank == 0 || rank > self.len {
            return None;
        }
        self.node_at(rank).map(|node| *self.key(node))
    }

    fn len(&self) -> usize {
        self.len
    }

    /// Locate the first rank through spans, then walk level 0.
    fn range(&self, window: RankWindow) -> Vec<LeaderboardEntry> {
        let Some(window) = window.truncate(self.len) else {
            return Vec::new();
        };
        let mut entries = Vec::with_capacity(window.size());
        let mut x = self.node_at(window.start()).unwrap_or(NIL);
        let mut rank = window.start();
        while x != NIL && rank <= window.end() {
            entries.push(LeaderboardEntry::new(*self.key(x), rank));
            x = self.link(x, 0).next;
            rank += 1;
        }
        entries
    }
}
