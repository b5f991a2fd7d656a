//! Raw identifier lists fetched for the primitives of one expression.

use std::collections::HashMap;

use crate::UserId;

/// Mapping from cache key to the raw identifier list fetched for it.
///
/// Built once per evaluation run and read-only afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchResults {
    entries: HashMap<String, Vec<UserId>>,
}

impl FetchResults {
    /// Creates an empty result map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the identifiers fetched for `cache_key`.
    ///
    /// Returns the previous list if the key was already present.
    pub fn insert(&mut self, cache_key: impl Into<String>, ids: Vec<UserId>) -> Option<Vec<UserId>> {
        self.entries.insert(cache_key.into(), ids)
    }

    /// Looks up the identifiers fetched for `cache_key`.
    pub fn get(&self, cache_key: &str) -> Option<&[UserId]> {
        self.entries.get(cache_key).map(Vec::as_slice)
    }

    /// Returns true if `cache_key` has been fetched.
    pub fn contains_key(&self, cache_key: &str) -> bool {
        self.entries.contains_key(cache_key)
    }

    /// Number of fetched keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing has been fetched.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over the fetched keys in arbitrary order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

impl<K: Into<String>> FromIterator<(K, Vec<UserId>)> for FetchResults {
    fn from_iter<I: IntoIterator<Item = (K, Vec<UserId>)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_get() {
        let mut fetched = FetchResults::new();
        assert!(fetched.is_empty());

        assert!(fetched.insert("alice.followers", vec![1, 2]).is_none());
        assert_eq!(fetched.get("alice.followers"), Some(&[1, 2][..]));
        assert!(fetched.get("bob.followers").is_none());
        assert_eq!(fetched.len(), 1);
    }

    #[test]
    fn test_from_iter() {
        let fetched: FetchResults = [("a.following", vec![1]), ("{b}", vec![2])]
            .into_iter()
            .collect();
        assert!(fetched.contains_key("{b}"));
        let mut keys: Vec<&str> = fetched.keys().collect();
        keys.sort_unstable();
        assert_eq!(keys, vec!["a.following", "{b}"]);
    }
}
