use std::collections::HashMap;

/// Read-only view over a map whose keys are already lowercase.
///
/// Lookups lowercase the key first, so `"Read"` and `"READ"` both find the
/// `"read"` bucket. The view borrows the map and never mutates it.
#[derive(Debug)]
pub struct CaseInsensitive<'a, V> {
    inner: &'a HashMap<String, V>,
}

impl<V> Clone for CaseInsensitive<'_, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<V> Copy for CaseInsensitive<'_, V> {}

impl<'a, V> CaseInsensitive<'a, V> {
    pub fn new(inner: &'a HashMap<String, V>) -> Self {
        Self { inner }
    }

    pub fn get(&self, key: &str) -> Option<&'a V> {
        self.inner.get(&key.to_lowercase())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.inner.contains_key(&key.to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'a str, &'a V)> + 'a {
        self.inner.iter().map(|(k, v)| (k.as_str(), v))
    }
}
