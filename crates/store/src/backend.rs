use std::fmt;

use serde::{Deserialize, Serialize};
use standings_rank_index::{OrderStatisticTree, RankIndex, SkipListIndex};

/// Rank index implementation to build a store on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum RankBackend {
    /// Height-balanced order-statistics tree.
    #[default]
    Tree,
    /// Span-indexed skip list.
    #[cfg_attr(feature = "cli", value(name = "skiplist"))]
    SkipList,
}

impl RankBackend {
    /// Build an empty index. `seed` fixes skip-list level selection and is
    /// ignored by the tree.
    pub fn build(self, seed: Option<u64>) -> Box<dyn RankIndex> {
        match self {
            RankBackend::Tree => Box::new(OrderStatisticTree::new()),
            RankBackend::SkipList => Box::new(match seed {
                Some(seed) => SkipListIndex::with_seed(seed),
                None => SkipListIndex::new(),
            }),
        }
    }
}

impl fmt::Display for RankBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RankBackend::Tree => f.write_str("tree"),
            RankBackend::SkipList => f.write_str("skiplist"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_matches_variant() {
        assert_eq!(RankBackend::Tree.build(None).backend(), "tree");
        assert_eq!(RankBackend::SkipList.build(Some(1)).backend(), "skiplist");
    }

    #[test]
    fn test_serde_names() {
        let parsed: RankBackend = serde_json::from_str("\"skiplist\"").unwrap();
        assert_eq!(parsed, RankBackend::SkipList);
        assert_eq!(serde_json::to_string(&RankBackend::Tree).unwrap(), "\"tree\"");
        assert_eq!(RankBackend::SkipList.to_string(), "skiplist");
    }
}
