//! Mode-gated mapping façade over [`SwissTable`].
//!
//! `ZDict` owns one table and a [`Mode`] tag. Reads go straight to the
//! table; mutations consult the mode first and are rejected before any
//! state changes. The immutable mode additionally makes the dictionary
//! itself hashable, with the hash computed lazily and cached — safe to
//! cache because every content mutation is rejected in that mode.

use core::borrow::Borrow;
use core::cell::Cell;
use core::fmt;
use core::hash::BuildHasher;
use std::collections::hash_map::{DefaultHasher, RandomState};
use std::collections::HashMap;

use crate::error::{Error, Result};
use crate::fallible::{TryEq, TryHash};
use crate::mode::Mode;
use crate::swiss_table::{IntoIter, Iter, SwissTable};

/// A dictionary whose permitted mutations are fixed at construction.
///
/// ```
/// use zdict::{Mode, ZDict};
///
/// let mut d = ZDict::from_pairs([("a", 1), ("b", 2)], Mode::Mutable)?;
/// d.insert("c", 3)?;
/// assert_eq!(d.get("c")?, Some(&3));
/// assert_eq!(d.len(), 3);
///
/// let mut frozen = ZDict::from_pairs([("a", 1)], Mode::Readonly)?;
/// assert!(frozen.insert("b", 2).is_err());
/// assert_eq!(frozen.get("a")?, Some(&1));
/// # Ok::<(), zdict::Error>(())
/// ```
pub struct ZDict<K, V, S = RandomState> {
    table: SwissTable<K, V, S>,
    mode: Mode,
    cached_hash: Cell<Option<u64>>,
}

impl<K, V> ZDict<K, V, RandomState>
where
    K: TryHash + TryEq,
{
    /// An empty dictionary in [`Mode::Mutable`].
    pub fn new() -> Result<Self> {
        Self::with_mode(Mode::Mutable)
    }

    pub fn with_mode(mode: Mode) -> Result<Self> {
        Self::with_hasher(RandomState::new(), mode)
    }

    /// `capacity` is a requested slot count, rounded up to a power of
    /// two and to at least 16.
    pub fn with_capacity(capacity: usize, mode: Mode) -> Result<Self> {
        Self::with_capacity_and_hasher(capacity, RandomState::new(), mode)
    }

    /// Build from any pair source: another mapping, an `items()`-style
    /// sequence, or a plain iterator of pairs. Duplicate keys resolve
    /// last-wins. The source populates the table *before* the mode
    /// starts gating, which is how immutable and readonly dictionaries
    /// receive their contents.
    pub fn from_pairs<I>(pairs: I, mode: Mode) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
    {
        Self::from_pairs_with_hasher(pairs, RandomState::new(), mode)
    }
}

impl<K, V, S> ZDict<K, V, S>
where
    K: TryHash + TryEq,
    S: BuildHasher,
{
    pub fn with_hasher(hasher: S, mode: Mode) -> Result<Self> {
        Ok(ZDict {
            table: SwissTable::with_hasher(hasher)?,
            mode,
            cached_hash: Cell::new(None),
        })
    }

    pub fn with_capacity_and_hasher(capacity: usize, hasher: S, mode: Mode) -> Result<Self> {
        Ok(ZDict {
            table: SwissTable::with_capacity_and_hasher(capacity, hasher)?,
            mode,
            cached_hash: Cell::new(None),
        })
    }

    pub fn from_pairs_with_hasher<I>(pairs: I, hasher: S, mode: Mode) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
    {
        let mut table = SwissTable::with_hasher(hasher)?;
        for (key, value) in pairs {
            table.set(key, value)?;
        }
        Ok(ZDict {
            table,
            mode,
            cached_hash: Cell::new(None),
        })
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn capacity(&self) -> usize {
        self.table.capacity()
    }

    pub fn hasher(&self) -> &S {
        self.table.hasher()
    }

    fn deny(&self, op: &'static str) -> Error {
        Error::ModeViolation {
            op,
            mode: self.mode,
        }
    }

    /// Reads never consult the mode.
    pub fn get<Q>(&self, key: &Q) -> Result<Option<&V>>
    where
        K: Borrow<Q>,
        Q: ?Sized + TryHash + TryEq,
    {
        self.table.get(key)
    }

    pub fn contains_key<Q>(&self, key: &Q) -> Result<bool>
    where
        K: Borrow<Q>,
        Q: ?Sized + TryHash + TryEq,
    {
        self.table.contains_key(key)
    }

    /// Insert or update, returning the previous value when an update
    /// happens. Insert mode admits new keys only; readonly and
    /// immutable reject everything, before the table is touched.
    pub fn insert(&mut self, key: K, value: V) -> Result<Option<V>> {
        match self.mode {
            Mode::Mutable | Mode::Arena => self.table.set(key, value),
            Mode::Readonly => Err(self.deny("insert")),
            Mode::Immutable => Err(self.deny("modify")),
            Mode::Insert => {
                if self.table.contains_key(&key)? {
                    Err(self.deny("update"))
                } else {
                    self.table.set(key, value)
                }
            }
        }
    }

    /// Remove a key, returning its value when it was present.
    pub fn remove<Q>(&mut self, key: &Q) -> Result<Option<V>>
    where
        K: Borrow<Q>,
        Q: ?Sized + TryHash + TryEq,
    {
        if !self.mode.allows_delete() {
            return Err(self.deny("modify"));
        }
        Ok(self.table.remove(key)?.map(|(_key, value)| value))
    }

    /// Remove a key, erring with [`Error::KeyNotFound`] when absent.
    /// The mode is checked first, so a forbidden pop reports the mode
    /// even for keys that are not there.
    pub fn pop<Q>(&mut self, key: &Q) -> Result<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + TryHash + TryEq,
    {
        if !self.mode.allows_delete() {
            return Err(self.deny("modify"));
        }
        match self.table.remove(key)? {
            Some((_key, value)) => Ok(value),
            None => Err(Error::KeyNotFound),
        }
    }

    /// Remove and return the entry in the first occupied slot in index
    /// order; [`Error::KeyNotFound`] when empty.
    pub fn popitem(&mut self) -> Result<(K, V)> {
        if !self.mode.allows_delete() {
            return Err(self.deny("modify"));
        }
        self.table.pop_first().ok_or(Error::KeyNotFound)
    }

    /// Return the stored value for `key`, inserting `default` first
    /// when the key is missing. The present-key path is a pure read and
    /// works in every mode.
    pub fn setdefault(&mut self, key: K, default: V) -> Result<&V> {
        if let Some(slot) = self.table.probe_slot(&key)? {
            return Ok(self.table.value_at(slot));
        }
        if !self.mode.allows_insert() {
            let op = if self.mode == Mode::Readonly {
                "insert"
            } else {
                "modify"
            };
            return Err(self.deny(op));
        }
        let (slot, _prev) = self.table.set_returning_slot(key, default)?;
        Ok(self.table.value_at(slot))
    }

    /// Merge a pair source into the dictionary.
    ///
    /// Mutable and arena modes apply pairs incrementally. Insert mode
    /// is all-or-nothing: the whole batch is staged first (last-wins
    /// within the batch) and one key collision with an existing entry
    /// rejects the entire call with the dictionary unchanged.
    pub fn update<I>(&mut self, pairs: I) -> Result<()>
    where
        I: IntoIterator<Item = (K, V)>,
        S: Clone,
    {
        match self.mode {
            Mode::Readonly => Err(self.deny("update")),
            Mode::Immutable => Err(self.deny("modify")),
            Mode::Mutable | Mode::Arena => {
                for (key, value) in pairs {
                    self.table.set(key, value)?;
                }
                Ok(())
            }
            Mode::Insert => {
                let mut staged = SwissTable::with_hasher(self.table.hasher().clone())?;
                for (key, value) in pairs {
                    staged.set(key, value)?;
                }
                for (key, _) in staged.iter() {
                    if self.table.contains_key(key)? {
                        return Err(self.deny("update"));
                    }
                }
                for (key, value) in staged {
                    self.table.set(key, value)?;
                }
                Ok(())
            }
        }
    }

    /// Drop every entry; capacity is kept.
    pub fn clear(&mut self) -> Result<()> {
        if !self.mode.allows_delete() {
            return Err(self.deny("modify"));
        }
        self.table.clear();
        Ok(())
    }

    /// Shallow copy in the same mode. A valid cached hash travels with
    /// the copy.
    pub fn copy(&self) -> Result<Self>
    where
        K: Clone,
        V: Clone,
        S: Clone,
    {
        let mut table = SwissTable::with_capacity_and_hasher(
            self.table.capacity(),
            self.table.hasher().clone(),
        )?;
        for (key, value) in self.table.iter() {
            table.set(key.clone(), value.clone())?;
        }
        Ok(ZDict {
            table,
            mode: self.mode,
            cached_hash: Cell::new(self.cached_hash.get()),
        })
    }

    /// Hash of the key-sorted `(key, value)` sequence; immutable mode
    /// only. Computed lazily, cached forever (nothing can mutate an
    /// immutable dictionary afterwards), and independent of this
    /// instance's random hasher seed so that equal dictionaries agree.
    pub fn dict_hash(&self) -> Result<u64>
    where
        K: Ord,
        V: TryHash,
    {
        if !self.mode.hashable() {
            return Err(Error::Unhashable { mode: self.mode });
        }
        if let Some(cached) = self.cached_hash.get() {
            return Ok(cached);
        }
        let mut pairs: Vec<(&K, &V)> = self.table.iter().collect();
        pairs.sort_by(|a, b| a.0.cmp(b.0));
        let mut state = DefaultHasher::new();
        for (key, value) in pairs {
            key.try_hash(&mut state).map_err(Error::HashFailed)?;
            value.try_hash(&mut state).map_err(Error::HashFailed)?;
        }
        let hash = core::hash::Hasher::finish(&state);
        self.cached_hash.set(Some(hash));
        Ok(hash)
    }

    /// Equality as pair multisets; mode and iteration order are
    /// irrelevant.
    pub fn dict_eq<S2>(&self, other: &ZDict<K, V, S2>) -> Result<bool>
    where
        V: TryEq,
        S2: BuildHasher,
    {
        if self.len() != other.len() {
            return Ok(false);
        }
        for (key, value) in self.iter() {
            match other.table.get(key)? {
                Some(theirs) => {
                    if !<V as TryEq>::try_eq(value, theirs).map_err(Error::EqFailed)? {
                        return Ok(false);
                    }
                }
                None => return Ok(false),
            }
        }
        Ok(true)
    }

    /// Equality against a plain map, same contract as [`dict_eq`].
    ///
    /// [`dict_eq`]: ZDict::dict_eq
    pub fn map_eq<S2>(&self, other: &HashMap<K, V, S2>) -> Result<bool>
    where
        V: TryEq,
        S2: BuildHasher,
    {
        if self.len() != other.len() {
            return Ok(false);
        }
        for (key, value) in other {
            match self.table.get(key)? {
                Some(ours) => {
                    if !<V as TryEq>::try_eq(ours, value).map_err(Error::EqFailed)? {
                        return Ok(false);
                    }
                }
                None => return Ok(false),
            }
        }
        Ok(true)
    }

    /// Pairs in slot order; stable until the next mutation.
    pub fn iter(&self) -> Iter<'_, K, V> {
        self.table.iter()
    }

    /// Mapping-API alias of [`iter`](ZDict::iter).
    pub fn items(&self) -> Iter<'_, K, V> {
        self.iter()
    }

    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys(self.iter())
    }

    pub fn values(&self) -> Values<'_, K, V> {
        Values(self.iter())
    }
}

/// Iterator over a dictionary's keys in slot order.
pub struct Keys<'a, K, V>(Iter<'a, K, V>);

impl<'a, K, V> Iterator for Keys<'a, K, V> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next().map(|(key, _)| key)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Keys<'_, K, V> {}

/// Iterator over a dictionary's values in slot order.
pub struct Values<'a, K, V>(Iter<'a, K, V>);

impl<'a, K, V> Iterator for Values<'a, K, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next().map(|(_, value)| value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Values<'_, K, V> {}

impl<'a, K, V, S> IntoIterator for &'a ZDict<K, V, S>
where
    K: TryHash + TryEq,
    S: BuildHasher,
{
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Iter<'a, K, V> {
        self.iter()
    }
}

impl<K, V, S> IntoIterator for ZDict<K, V, S> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;

    fn into_iter(self) -> IntoIter<K, V> {
        self.table.into_iter()
    }
}

/// `collect()` builds a mutable dictionary.
///
/// # Panics
///
/// Panics if a key callback fails or allocation fails; use
/// [`ZDict::from_pairs`] to keep those as errors.
impl<K, V, S> FromIterator<(K, V)> for ZDict<K, V, S>
where
    K: TryHash + TryEq,
    S: BuildHasher + Default,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::from_pairs_with_hasher(iter, S::default(), Mode::Mutable)
            .expect("collecting into a zdict requires infallible key callbacks")
    }
}

impl<K, V, S, S2> PartialEq<ZDict<K, V, S2>> for ZDict<K, V, S>
where
    K: TryHash + TryEq,
    V: TryEq,
    S: BuildHasher,
    S2: BuildHasher,
{
    /// Operators cannot propagate; a hash or equality failure renders
    /// as "not equal". Use [`ZDict::dict_eq`] for the strict form.
    fn eq(&self, other: &ZDict<K, V, S2>) -> bool {
        self.dict_eq(other).unwrap_or(false)
    }
}

impl<K, V, S, S2> PartialEq<HashMap<K, V, S2>> for ZDict<K, V, S>
where
    K: TryHash + TryEq,
    V: TryEq,
    S: BuildHasher,
    S2: BuildHasher,
{
    fn eq(&self, other: &HashMap<K, V, S2>) -> bool {
        self.map_eq(other).unwrap_or(false)
    }
}

impl<K, V, S> fmt::Debug for ZDict<K, V, S>
where
    K: fmt::Debug,
    V: fmt::Debug,
    S: BuildHasher,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "zdict(")?;
        f.debug_map().entries(self.table.iter()).finish()?;
        write!(f, ", mode='{}')", self.mode)
    }
}

impl<K, V, S> fmt::Display for ZDict<K, V, S>
where
    K: fmt::Debug,
    V: fmt::Debug,
    S: BuildHasher,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.table.iter()).finish()
    }
}
