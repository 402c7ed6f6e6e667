use core::cmp;

/// A fixed 8-byte projection of a key, cached in every node so that most
/// comparisons during a search never have to fetch the key from [`Storage`].
///
/// A prefix must be order compatible with its key: `prefix(a) < prefix(b)`
/// implies `a < b`. Equal prefixes say nothing, and the keys themselves have
/// to be compared.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct KeyPrefix(u64);

impl KeyPrefix {
  /// The size of a prefix in bytes.
  pub const SIZE: usize = core::mem::size_of::<u64>();

  /// Creates a prefix from a raw value.
  #[inline]
  pub const fn new(val: u64) -> Self {
    Self(val)
  }

  /// Returns the raw value of the prefix.
  #[inline]
  pub const fn get(&self) -> u64 {
    self.0
  }

  /// Builds the prefix of a key under bytewise ordering: the first
  /// [`KeyPrefix::SIZE`] bytes read as a big-endian integer, zero-padded when
  /// the key is shorter.
  ///
  /// ## Example
  ///
  /// ```rust
  /// use batchskl::KeyPrefix;
  ///
  /// assert!(KeyPrefix::from_key(b"apple") < KeyPrefix::from_key(b"banana"));
  /// assert_eq!(KeyPrefix::from_key(b"abc"), KeyPrefix::from_key(b"abc\0"));
  /// ```
  #[inline]
  pub fn from_key(key: &[u8]) -> Self {
    let mut buf = [0; Self::SIZE];
    let n = key.len().min(Self::SIZE);
    buf[..n].copy_from_slice(&key[..n]);
    Self(u64::from_be_bytes(buf))
  }
}

impl From<u64> for KeyPrefix {
  #[inline]
  fn from(val: u64) -> Self {
    Self(val)
  }
}

impl From<KeyPrefix> for u64 {
  #[inline]
  fn from(prefix: KeyPrefix) -> Self {
    prefix.0
  }
}

/// The external, append-only store the keys of a batch are written to.
///
/// The skiplist only keeps offsets into this store. These methods are the only
/// places where key bytes are touched, and [`Storage::get`] is assumed to be
/// the expensive one.
///
/// Offsets passed to a `Storage` are offsets the caller handed to
/// [`Skiplist::insert`](crate::Skiplist::insert); they are unrelated to the
/// offsets of the skiplist's own arena.
pub trait Storage {
  /// The borrowed form of a stored key. Stores that append through interior
  /// mutability can hand out a guard here, e.g. `core::cell::Ref<'a, [u8]>`.
  type Key<'a>: core::ops::Deref<Target = [u8]>
  where
    Self: 'a;

  /// Returns the key stored at `offset`.
  fn get(&self, offset: u32) -> Self::Key<'_>;

  /// Returns the prefix of `key`.
  ///
  /// The default takes the leading bytes of the key, which is order compatible
  /// with bytewise ordering.
  #[inline]
  fn prefix(&self, key: &[u8]) -> KeyPrefix {
    KeyPrefix::from_key(key)
  }

  /// Compares `key` against the key stored at `offset`.
  ///
  /// The default compares bytewise.
  #[inline]
  fn compare(&self, key: &[u8], offset: u32) -> cmp::Ordering {
    key.cmp(&*self.get(offset))
  }
}
