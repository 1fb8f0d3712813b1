use proptest::prelude::*;
use std::collections::BTreeSet;

/// A non-empty, strictly increasing set of 1-based executable lines.
pub fn line_set() -> impl Strategy<Value = Vec<u32>> {
    prop::collection::btree_set(1u32..500, 1..40)
        .prop_map(|set: BTreeSet<u32>| set.into_iter().collect())
}
