use std::borrow::Borrow;
use std::fmt;

use branchstore_common::VersionId;

/// Hash used to place a key into a bucket.
///
/// Integral keys hash to their own value; text keys use a polynomial rolling
/// hash with multiplier 31. The bucket index is `bucket_hash() % bucket_count`.
pub trait BucketHash {
    fn bucket_hash(&self) -> u64;
}

impl BucketHash for u32 {
    fn bucket_hash(&self) -> u64 {
        u64::from(*self)
    }
}

impl BucketHash for u64 {
    fn bucket_hash(&self) -> u64 {
        *self
    }
}

impl BucketHash for usize {
    fn bucket_hash(&self) -> u64 {
        *self as u64
    }
}

impl BucketHash for VersionId {
    fn bucket_hash(&self) -> u64 {
        u64::from(self.0)
    }
}

impl BucketHash for str {
    fn bucket_hash(&self) -> u64 {
        self.bytes()
            .fold(0u64, |h, b| h.wrapping_mul(31).wrapping_add(u64::from(b)))
    }
}

impl BucketHash for String {
    fn bucket_hash(&self) -> u64 {
        self.as_str().bucket_hash()
    }
}

/// Associative container with separate chaining.
///
/// Capacity policy: the store starts with a fixed bucket count and doubles it
/// whenever an insertion of a new key would push `len / bucket_count` above
/// `max_load_factor`. Every entry is redistributed on growth; the bucket count
/// never shrinks.
#[derive(Clone)]
pub struct KeyedStore<K, V> {
    buckets: Vec<Vec<(K, V)>>,
    len: usize,
    max_load_factor: f64,
}

impl<K, V> KeyedStore<K, V>
where
    K: BucketHash + Eq,
{
    pub const DEFAULT_BUCKETS: usize = 16;
    pub const DEFAULT_LOAD_FACTOR: f64 = 0.75;

    /// Create an empty store with the default bucket count and load factor.
    pub fn new() -> Self {
        Self::with_buckets(Self::DEFAULT_BUCKETS, Self::DEFAULT_LOAD_FACTOR)
    }

    /// Create an empty store with an explicit initial bucket count and load factor.
    pub fn with_buckets(bucket_count: usize, max_load_factor: f64) -> Self {
        assert!(bucket_count > 0, "bucket_count must be positive");
        assert!(
            max_load_factor.is_finite() && max_load_factor > 0.0,
            "max_load_factor must be positive"
        );
        Self {
            buckets: (0..bucket_count).map(|_| Vec::new()).collect(),
            len: 0,
            max_load_factor,
        }
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Current number of buckets.
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// Insert or overwrite the value for `key`. Returns the displaced value.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        let idx = self.bucket_of(&key);
        if let Some(slot) = self.buckets[idx].iter_mut().find(|(k, _)| *k == key) {
            return Some(std::mem::replace(&mut slot.1, value));
        }

        if (self.len + 1) as f64 / self.buckets.len() as f64 > self.max_load_factor {
            self.grow();
        }
        let idx = self.bucket_of(&key);
        self.buckets[idx].push((key, value));
        self.len += 1;
        None
    }

    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: BucketHash + Eq + ?Sized,
    {
        let idx = self.bucket_of(key);
        self.buckets[idx]
            .iter()
            .find(|(k, _)| k.borrow() == key)
            .map(|(_, v)| v)
    }

    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: BucketHash + Eq + ?Sized,
    {
        let idx = self.bucket_of(key);
        self.buckets[idx]
            .iter_mut()
            .find(|(k, _)| k.borrow() == key)
            .map(|(_, v)| v)
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: BucketHash + Eq + ?Sized,
    {
        self.get(key).is_some()
    }

    /// Remove the entry for `key` if present.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: BucketHash + Eq + ?Sized,
    {
        let idx = self.bucket_of(key);
        let chain = &mut self.buckets[idx];
        let pos = chain.iter().position(|(k, _)| k.borrow() == key)?;
        self.len -= 1;
        Some(chain.swap_remove(pos).1)
    }

    /// All entries, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.buckets
            .iter()
            .flat_map(|chain| chain.iter().map(|(k, v)| (k, v)))
    }

    /// All keys, in no particular order.
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.iter().map(|(k, _)| k)
    }

    /// All values, in no particular order.
    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.iter().map(|(_, v)| v)
    }

    fn bucket_of<Q: BucketHash + ?Sized>(&self, key: &Q) -> usize {
        (key.bucket_hash() % self.buckets.len() as u64) as usize
    }

    fn grow(&mut self) {
        let new_count = self.buckets.len() * 2;
        tracing::trace!(
            from = self.buckets.len(),
            to = new_count,
            len = self.len,
            "rehashing keyed store"
        );
        let old = std::mem::replace(
            &mut self.buckets,
            (0..new_count).map(|_| Vec::new()).collect(),
        );
        for (key, value) in old.into_iter().flatten() {
            let idx = self.bucket_of(&key);
            self.buckets[idx].push((key, value));
        }
    }
}

impl<K, V> Default for KeyedStore<K, V>
where
    K: BucketHash + Eq,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for KeyedStore<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(
                self.buckets
                    .iter()
                    .flat_map(|chain| chain.iter().map(|(k, v)| (k, v))),
            )
            .finish()
    }
}
