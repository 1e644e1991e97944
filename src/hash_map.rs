use core::borrow::Borrow;
use core::fmt::Debug;
use core::hash::BuildHasher;
use core::hash::Hash;
use core::iter::FusedIterator;

use crate::DefaultHashBuilder;
use crate::error::Error;
use crate::hash_table;
use crate::hash_table::HashTable;

/// A hash map with a fixed number of buckets, implemented on top of the
/// chained [`HashTable`].
///
/// `HashMap<K, V, S>` stores key-value pairs where keys implement
/// `Hash + Eq` and uses a configurable hasher builder `S` to hash keys. A key
/// lives in bucket `hash(key) mod capacity`, and keys sharing a bucket are
/// chained newest first.
///
/// # Shadowing inserts
///
/// [`put`](HashMap::put) does not look for an existing entry with the same
/// key. Putting a key twice keeps both entries: [`get`](HashMap::get) sees the
/// newer one, and [`remove`](HashMap::remove) takes the newer one out and
/// exposes the older one again. [`len`](HashMap::len) counts both.
///
/// # Examples
///
/// ```rust
/// use chained_hash::HashMap;
///
/// let mut ages: HashMap<&str, &str> = HashMap::new();
/// ages.put("adam", "19").unwrap();
/// ages.put("eve", "22").unwrap();
/// ages.put("john", "4").unwrap();
/// ages.put("doe", "87").unwrap();
///
/// assert_eq!(ages.get("adam"), Some(&"19"));
/// assert_eq!(ages.remove("adam"), Some("19"));
/// assert_eq!(ages.get("adam"), None);
/// assert_eq!(ages.clear(), 3);
/// ```
#[derive(Clone)]
pub struct HashMap<K, V, S = DefaultHashBuilder> {
    table: HashTable<(K, V)>,
    hash_builder: S,
}

impl<K, V, S> Debug for HashMap<K, V, S>
where
    K: Debug,
    V: Debug,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let mut map = f.debug_map();
        for (k, v) in self.iter() {
            map.entry(k, v);
        }
        map.finish()
    }
}

impl<K, V, S> HashMap<K, V, S> {
    /// Returns the number of entries in the map, shadowed entries included.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Returns `true` if the map contains no entries.
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Returns the number of buckets. This is fixed at construction.
    pub fn capacity(&self) -> usize {
        self.table.capacity()
    }

    /// Returns the ratio of entries to buckets.
    pub fn load_factor(&self) -> f64 {
        self.table.load_factor()
    }

    /// Returns a reference to the map's hasher builder.
    pub fn hasher(&self) -> &S {
        &self.hash_builder
    }

    /// Removes every entry, returning how many were removed.
    ///
    /// The bucket count is kept and the map can be used again right away.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use chained_hash::HashMap;
    ///
    /// let mut map: HashMap<i32, &str> = HashMap::new();
    /// assert_eq!(map.clear(), 0);
    ///
    /// map.put(1, "a").unwrap();
    /// map.put(2, "b").unwrap();
    /// assert_eq!(map.clear(), 2);
    /// assert!(map.is_empty());
    ///
    /// map.put(3, "c").unwrap();
    /// assert_eq!(map.len(), 1);
    /// ```
    pub fn clear(&mut self) -> usize {
        self.table.clear()
    }

    /// Returns an iterator over every bucket in index order.
    ///
    /// This is the map's enumeration: bucket `0` through `capacity - 1`, each
    /// with its key-value pairs from the most recent insert to the oldest.
    /// Empty buckets are included so callers can render the whole table.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use chained_hash::HashMap;
    /// use chained_hash::hasher::BuildModuloHasher;
    ///
    /// let mut map = HashMap::with_capacity_and_hasher(3, BuildModuloHasher::default()).unwrap();
    /// map.put(1u32, "one").unwrap();
    /// map.put(4u32, "four").unwrap();
    ///
    /// for bucket in map.buckets() {
    ///     let pairs: Vec<_> = bucket.iter().collect();
    ///     match bucket.index() {
    ///         1 => assert_eq!(pairs, [(&4, &"four"), (&1, &"one")]),
    ///         _ => assert!(pairs.is_empty()),
    ///     }
    /// }
    /// ```
    pub fn buckets(&self) -> Buckets<'_, K, V> {
        Buckets {
            inner: self.table.buckets(),
        }
    }

    /// Returns an iterator over the key-value pairs of the map in bucket
    /// order.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            inner: self.table.iter(),
        }
    }

    /// Returns an iterator over the keys of the map in bucket order.
    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys { inner: self.iter() }
    }

    /// Returns an iterator over the values of the map in bucket order.
    pub fn values(&self) -> Values<'_, K, V> {
        Values { inner: self.iter() }
    }

    /// Returns an iterator that removes and yields all key-value pairs from the
    /// map.
    ///
    /// After calling `drain()`, the map will be empty.
    pub fn drain(&mut self) -> Drain<'_, K, V> {
        Drain {
            inner: self.table.drain(),
        }
    }

    /// Summarizes how entries are spread over the buckets.
    #[cfg(feature = "stats")]
    pub fn debug_stats(&self) -> hash_table::DebugStats {
        self.table.debug_stats()
    }

    /// Returns a histogram of chain lengths across the buckets.
    #[cfg(feature = "stats")]
    pub fn chain_histogram(&self) -> hash_table::ChainHistogram {
        self.table.chain_histogram()
    }
}

impl<K, V, S> HashMap<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher,
{
    /// Creates a new map with [`DEFAULT_CAPACITY`](crate::DEFAULT_CAPACITY)
    /// buckets and the given hasher builder.
    pub fn with_hasher(hash_builder: S) -> Self {
        Self {
            table: HashTable::new(),
            hash_builder,
        }
    }

    /// Creates a new map with exactly `capacity` buckets and the given hasher
    /// builder.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ZeroCapacity`] if `capacity` is zero and
    /// [`Error::Alloc`] if the buckets cannot be allocated.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use std::collections::hash_map::RandomState;
    ///
    /// use chained_hash::Error;
    /// use chained_hash::HashMap;
    ///
    /// let map: HashMap<i32, String, _> =
    ///     HashMap::with_capacity_and_hasher(100, RandomState::new()).unwrap();
    /// assert_eq!(map.capacity(), 100);
    ///
    /// let err = HashMap::<i32, String, _>::with_capacity_and_hasher(0, RandomState::new());
    /// assert_eq!(err.unwrap_err(), Error::ZeroCapacity);
    /// ```
    pub fn with_capacity_and_hasher(capacity: usize, hash_builder: S) -> Result<Self, Error> {
        Ok(Self {
            table: HashTable::with_capacity(capacity)?,
            hash_builder,
        })
    }

    /// Returns the bucket `key` maps to: `hash(key) mod capacity`.
    pub fn bucket_index<Q>(&self, key: &Q) -> usize
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.table.bucket_index(self.hash_builder.hash_one(key))
    }

    /// Adds a key-value pair at the head of its bucket's chain.
    ///
    /// An existing entry with an equal key is left in place and shadowed by
    /// the new one; it is not overwritten. This is the only operation that
    /// allocates.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Alloc`] if memory for the entry cannot be allocated.
    /// The map is unchanged in that case.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use chained_hash::HashMap;
    ///
    /// let mut map: HashMap<&str, i32> = HashMap::new();
    /// map.put("k", 1).unwrap();
    /// map.put("k", 2).unwrap();
    ///
    /// assert_eq!(map.len(), 2);
    /// assert_eq!(map.get("k"), Some(&2));
    /// ```
    pub fn put(&mut self, key: K, value: V) -> Result<(), Error> {
        let hash = self.hash_builder.hash_one(&key);
        self.table.insert(hash, (key, value))?;
        Ok(())
    }

    /// Like [`put`](HashMap::put), but returns the key and value alongside
    /// the error when the entry cannot be allocated.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use chained_hash::HashMap;
    ///
    /// let mut map: HashMap<String, Vec<u8>> = HashMap::new();
    /// if let Err((err, key, value)) = map.try_put("blob".to_string(), vec![0; 16]) {
    ///     eprintln!("{err}; keeping {key} ({} bytes) for later", value.len());
    /// }
    /// assert_eq!(map.get("blob").map(Vec::len), Some(16));
    /// ```
    pub fn try_put(&mut self, key: K, value: V) -> Result<(), (Error, K, V)> {
        let hash = self.hash_builder.hash_one(&key);
        match self.table.try_insert(hash, (key, value)) {
            Ok(_) => Ok(()),
            Err((err, (key, value))) => Err((err, key, value)),
        }
    }

    /// Returns a reference to the value of the most recent entry for `key`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use chained_hash::HashMap;
    ///
    /// let mut map: HashMap<String, i32> = HashMap::new();
    /// map.put("one".to_string(), 1).unwrap();
    /// assert_eq!(map.get("one"), Some(&1));
    /// assert_eq!(map.get("two"), None);
    /// ```
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let hash = self.hash_builder.hash_one(key);
        self.table
            .find(hash, |(k, _)| k.borrow() == key)
            .map(|(_, v)| v)
    }

    /// Returns a mutable reference to the value of the most recent entry for
    /// `key`.
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let hash = self.hash_builder.hash_one(key);
        self.table
            .find_mut(hash, |(k, _)| k.borrow() == key)
            .map(|(_, v)| v)
    }

    /// Returns `true` if the map holds at least one entry for `key`.
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.get(key).is_some()
    }

    /// Removes the most recent entry for `key` and returns its value.
    ///
    /// `None` means no entry for `key` was found and nothing changed. Only
    /// one entry is removed per call, so a shadowed older entry for the same
    /// key becomes visible afterwards.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use chained_hash::HashMap;
    ///
    /// let mut map: HashMap<i32, &str> = HashMap::new();
    /// map.put(1, "old").unwrap();
    /// map.put(1, "new").unwrap();
    ///
    /// assert_eq!(map.remove(&1), Some("new"));
    /// assert_eq!(map.get(&1), Some(&"old"));
    /// assert_eq!(map.remove(&1), Some("old"));
    /// assert_eq!(map.remove(&1), None);
    /// ```
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.remove_entry(key).map(|(_, v)| v)
    }

    /// Removes the most recent entry for `key`, returning the stored key and
    /// value.
    pub fn remove_entry<Q>(&mut self, key: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let hash = self.hash_builder.hash_one(key);
        self.table.remove(hash, |(k, _)| k.borrow() == key)
    }
}

impl<K, V, S> HashMap<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher + Default,
{
    /// Creates a new map with [`DEFAULT_CAPACITY`](crate::DEFAULT_CAPACITY)
    /// buckets using the default hasher builder.
    pub fn new() -> Self {
        Self::with_hasher(S::default())
    }

    /// Creates a new map with exactly `capacity` buckets using the default
    /// hasher builder.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ZeroCapacity`] if `capacity` is zero and
    /// [`Error::Alloc`] if the buckets cannot be allocated.
    pub fn with_capacity(capacity: usize) -> Result<Self, Error> {
        Self::with_capacity_and_hasher(capacity, S::default())
    }
}

impl<K, V, S> Default for HashMap<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher + Default,
{
    fn default() -> Self {
        Self::new()
    }
}

/// One bucket of a [`HashMap`], produced by [`HashMap::buckets`].
pub struct Bucket<'a, K, V> {
    index: usize,
    chain: hash_table::Chain<'a, (K, V)>,
}

impl<'a, K, V> Bucket<'a, K, V> {
    /// The bucket's position in `0..capacity`.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Iterates the bucket's key-value pairs, newest first.
    pub fn iter(&self) -> BucketIter<'a, K, V> {
        BucketIter {
            inner: self.chain.clone(),
        }
    }

    /// Returns the number of entries chained in this bucket.
    pub fn len(&self) -> usize {
        self.chain.clone().count()
    }

    /// Returns `true` if nothing is chained in this bucket.
    pub fn is_empty(&self) -> bool {
        self.chain.clone().next().is_none()
    }
}

impl<'a, K, V> IntoIterator for Bucket<'a, K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = BucketIter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        BucketIter { inner: self.chain }
    }
}

impl<K, V> Debug for Bucket<'_, K, V>
where
    K: Debug,
    V: Debug,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Bucket")
            .field("index", &self.index)
            .field("entries", &DebugPairs(self.iter()))
            .finish()
    }
}

struct DebugPairs<'a, K, V>(BucketIter<'a, K, V>);

impl<K: Debug, V: Debug> Debug for DebugPairs<'_, K, V> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_list()
            .entries(BucketIter {
                inner: self.0.inner.clone(),
            })
            .finish()
    }
}

/// An iterator over the buckets of a `HashMap`.
pub struct Buckets<'a, K, V> {
    inner: hash_table::Buckets<'a, (K, V)>,
}

impl<'a, K, V> Iterator for Buckets<'a, K, V> {
    type Item = Bucket<'a, K, V>;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner
            .next()
            .map(|(index, chain)| Bucket { index, chain })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Buckets<'_, K, V> {}

impl<K, V> FusedIterator for Buckets<'_, K, V> {}

/// An iterator over the key-value pairs of a single bucket.
pub struct BucketIter<'a, K, V> {
    inner: hash_table::Chain<'a, (K, V)>,
}

impl<'a, K, V> Iterator for BucketIter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, v)| (k, v))
    }
}

impl<K, V> FusedIterator for BucketIter<'_, K, V> {}

/// An iterator over the key-value pairs of a `HashMap`.
pub struct Iter<'a, K, V> {
    inner: hash_table::Iter<'a, (K, V)>,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, v)| (k, v))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

impl<K, V> FusedIterator for Iter<'_, K, V> {}

/// An iterator over the keys of a `HashMap`.
pub struct Keys<'a, K, V> {
    inner: Iter<'a, K, V>,
}

impl<'a, K, V> Iterator for Keys<'a, K, V> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, _)| k)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Keys<'_, K, V> {}

impl<K, V> FusedIterator for Keys<'_, K, V> {}

/// An iterator over the values of a `HashMap`.
pub struct Values<'a, K, V> {
    inner: Iter<'a, K, V>,
}

impl<'a, K, V> Iterator for Values<'a, K, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, v)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Values<'_, K, V> {}

impl<K, V> FusedIterator for Values<'_, K, V> {}

/// A draining iterator over the key-value pairs of a `HashMap`.
pub struct Drain<'a, K, V> {
    inner: hash_table::Drain<'a, (K, V)>,
}

impl<K, V> Iterator for Drain<'_, K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Drain<'_, K, V> {}
