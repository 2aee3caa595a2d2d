//! Dedup-then-batch-then-remap helpers shared by every aggregator.

use std::collections::HashMap;

use indexmap::IndexSet;

use crate::contracts::Identified;
use crate::types::DbId;

/// Distinct ids in first-seen order.
///
/// Bounds a batch call to one entry per referenced entity no matter how many
/// times it is referenced.
pub fn unique_ids<I>(ids: I) -> Vec<DbId>
where
    I: IntoIterator<Item = DbId>,
{
    ids.into_iter().collect::<IndexSet<_>>().into_iter().collect()
}

/// Re-index an unordered batch response by id.
pub fn index_by_id<T: Identified>(records: Vec<T>) -> HashMap<DbId, T> {
    records.into_iter().map(|r| (r.id(), r)).collect()
}

/// Walk `refs` in order and keep only those resolvable through `lookup`.
///
/// Unresolvable references are dropped, never rendered as nulls.
pub fn resolve_in_order<'a, R, T, U>(
    refs: impl IntoIterator<Item = R>,
    lookup: &'a HashMap<DbId, T>,
    key: impl Fn(&R) -> DbId,
    render: impl Fn(R, &'a T) -> U,
) -> Vec<U> {
    refs.into_iter()
        .filter_map(|r| {
            let found = lookup.get(&key(&r))?;
            Some(render(r, found))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Thing(DbId);

    impl Identified for Thing {
        fn id(&self) -> DbId {
            self.0
        }
    }

    #[test]
    fn unique_ids_keeps_first_seen_order() {
        assert_eq!(unique_ids([3, 1, 3, 2, 1]), vec![3, 1, 2]);
    }

    #[test]
    fn unique_ids_of_nothing_is_empty() {
        assert!(unique_ids(Vec::<DbId>::new()).is_empty());
    }

    #[test]
    fn resolve_drops_missing_and_keeps_order() {
        let map = index_by_id(vec![Thing(2), Thing(1)]);
        let out = resolve_in_order([1, 5, 2, 1], &map, |id| *id, |_, t| t.clone());
        assert_eq!(out, vec![Thing(1), Thing(2), Thing(1)]);
    }
}
