use std::collections::{HashMap, HashSet};
use std::hash::Hash;

/// Deduplicated natural keys of one dimension, each mapped to a surrogate id.
/// Keys are held in first-occurrence order whatever the id policy; ids are
/// dense and zero-based.
#[derive(Debug, Clone)]
pub struct KeyedIndex<K> {
    keys: Vec<K>,
    surrogates: Vec<i64>,
    ids: HashMap<K, i64>,
}

impl<K: Hash + Eq + Clone> KeyedIndex<K> {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            keys: Vec::with_capacity(capacity),
            surrogates: Vec::with_capacity(capacity),
            ids: HashMap::with_capacity(capacity),
        }
    }

    /// Ids follow the order in which keys are first seen.
    pub fn first_occurrence<I>(keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
    {
        let mut index = Self::with_capacity(0);
        for key in keys {
            if !index.ids.contains_key(&key) {
                let id = index.keys.len() as i64;
                index.push(key, id);
            }
        }
        index
    }

    /// Ids are the rank of each key among the sorted distinct keys, so they do
    /// not depend on input order (categorical encoding). Among keys that
    /// compare equal the first one seen is kept.
    pub fn sorted_distinct<I>(keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Ord,
    {
        let mut seen = HashSet::new();
        let distinct: Vec<K> = keys
            .into_iter()
            .filter(|key| seen.insert(key.clone()))
            .collect();

        let mut by_value: Vec<usize> = (0..distinct.len()).collect();
        by_value.sort_by(|a, b| distinct[*a].cmp(&distinct[*b]));
        let mut ranks = vec![0; distinct.len()];
        for (rank, position) in by_value.into_iter().enumerate() {
            ranks[position] = rank as i64;
        }

        let mut index = Self::with_capacity(distinct.len());
        for (key, id) in distinct.into_iter().zip(ranks) {
            index.push(key, id);
        }
        index
    }

    fn push(&mut self, key: K, id: i64) {
        self.ids.insert(key.clone(), id);
        self.keys.push(key);
        self.surrogates.push(id);
    }

    pub fn surrogate(&self, key: &K) -> Option<i64> {
        self.ids.get(key).copied()
    }

    /// Distinct keys in first-occurrence order.
    pub fn keys(&self) -> &[K] {
        &self.keys
    }

    /// `(surrogate id, natural key)` pairs in first-occurrence order.
    pub fn iter(&self) -> impl Iterator<Item = (i64, &K)> {
        self.surrogates.iter().copied().zip(self.keys.iter())
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_occurrence_order() {
        let index = KeyedIndex::first_occurrence(vec![5, 3, 5, 9, 3, 1]);
        assert_eq!(index.keys(), &[5, 3, 9, 1]);
        assert_eq!(index.surrogate(&5), Some(0));
        assert_eq!(index.surrogate(&3), Some(1));
        assert_eq!(index.surrogate(&9), Some(2));
        assert_eq!(index.surrogate(&1), Some(3));
        assert_eq!(index.surrogate(&7), None);
    }

    #[test]
    fn test_sorted_distinct_ids_ignore_input_order() {
        let forward = KeyedIndex::sorted_distinct(vec![5, 3, 5, 9, 3, 1]);
        let backward = KeyedIndex::sorted_distinct(vec![1, 3, 9, 5, 3, 5]);

        for key in [1, 3, 5, 9] {
            assert_eq!(forward.surrogate(&key), backward.surrogate(&key));
        }
        assert_eq!(forward.surrogate(&1), Some(0));
        assert_eq!(forward.surrogate(&9), Some(3));

        // keys themselves stay in first-occurrence order
        assert_eq!(forward.keys(), &[5, 3, 9, 1]);
        assert_eq!(backward.keys(), &[1, 3, 9, 5]);
    }

    #[test]
    fn test_sorted_distinct_iter_yields_rank_ids() {
        let index = KeyedIndex::sorted_distinct(vec![3, 1, 3, 2]);
        let pairs: Vec<(i64, i64)> = index.iter().map(|(id, key)| (id, *key)).collect();
        assert_eq!(pairs, vec![(2, 3), (0, 1), (1, 2)]);
    }

    #[test]
    fn test_composite_keys() {
        let index = KeyedIndex::first_occurrence(vec![("a", 1), ("a", 2), ("a", 1)]);
        assert_eq!(index.len(), 2);
        assert_eq!(index.surrogate(&("a", 2)), Some(1));
    }

    #[test]
    fn test_iter_is_dense() {
        let index = KeyedIndex::first_occurrence(vec!['x', 'y', 'x', 'z']);
        let ids: Vec<i64> = index.iter().map(|(id, _)| id).collect();
        assert_eq!(ids, vec![0, 1, 2]);
    }

    #[test]
    fn test_empty_index() {
        let index: KeyedIndex<i64> = KeyedIndex::first_occurrence(Vec::new());
        assert!(index.is_empty());
        assert_eq!(index.iter().count(), 0);
    }
}
