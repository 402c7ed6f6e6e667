use super::*;

/// A cursor over the skiplist. The current state of the iterator can be
/// cloned by simply value copying the struct.
///
/// The cursor is either on a record or on one of the two sentinels, in which
/// case it is not [`valid`](ListIterator::valid). A new cursor starts on the
/// head sentinel. Stepping past either end lands on the matching sentinel, and
/// stepping further in the same direction does nothing.
///
/// Records are never removed or moved, so inserting, through any cursor or the
/// skiplist itself, never disturbs the position of other cursors.
pub struct ListIterator<'a, 's, S: ?Sized> {
  list: &'a Skiplist<'s, S>,
  nd: NodePtr,
}

impl<S: ?Sized> Clone for ListIterator<'_, '_, S> {
  fn clone(&self) -> Self {
    *self
  }
}

impl<S: ?Sized> Copy for ListIterator<'_, '_, S> {}

impl<S: ?Sized> core::fmt::Debug for ListIterator<'_, '_, S> {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    f.debug_struct("ListIterator")
      .field("offset", &self.nd.offset)
      .finish()
  }
}

impl<'a, 's, S: Storage + ?Sized> ListIterator<'a, 's, S> {
  #[inline]
  pub(super) const fn new(list: &'a Skiplist<'s, S>) -> Self {
    Self {
      list,
      nd: list.head,
    }
  }

  /// Returns the skiplist the iterator walks.
  #[inline]
  pub const fn list(&self) -> &'a Skiplist<'s, S> {
    self.list
  }

  /// Returns true if the iterator is positioned at a record.
  #[inline]
  pub fn valid(&self) -> bool {
    self.nd.offset != self.list.head.offset && self.nd.offset != self.list.tail.offset
  }

  /// Returns the storage offset of the key at the current position, or
  /// `None` if the iterator is on a sentinel.
  #[inline]
  pub fn key_offset(&self) -> Option<u32> {
    self.valid().then(|| self.list.key_offset(self.nd))
  }

  /// Returns the cached prefix of the key at the current position.
  #[inline]
  pub fn prefix(&self) -> Option<KeyPrefix> {
    self.valid().then(|| self.list.prefix(self.nd))
  }

  /// Fetches the key at the current position from the storage.
  #[inline]
  pub fn key(&self) -> Option<S::Key<'s>> {
    let storage: &'s S = self.list.storage;
    self.key_offset().map(|offset| storage.get(offset))
  }

  /// Seeks position at the first record. Returns the storage offset of its
  /// key, or `None` if the skiplist is empty.
  pub fn first(&mut self) -> Option<u32> {
    self.nd = self.list.get_next(self.list.head, 0);
    self.key_offset()
  }

  /// Seeks position at the last record. Returns the storage offset of its
  /// key, or `None` if the skiplist is empty.
  pub fn last(&mut self) -> Option<u32> {
    self.nd = self.list.get_prev(self.list.tail, 0);
    self.key_offset()
  }

  /// Advances to the next position. Returns the storage offset of the key
  /// if the iterator is pointing at a record, and `None` otherwise.
  #[allow(clippy::should_implement_trait)]
  pub fn next(&mut self) -> Option<u32> {
    if self.nd.offset != self.list.tail.offset {
      self.nd = self.list.get_next(self.nd, 0);
    }
    self.key_offset()
  }

  /// Moves to the previous position. Returns the storage offset of the key
  /// if the iterator is pointing at a record, and `None` otherwise.
  pub fn prev(&mut self) -> Option<u32> {
    if self.nd.offset != self.list.head.offset {
      self.nd = self.list.get_prev(self.nd, 0);
    }
    self.key_offset()
  }

  /// Moves the iterator to the first record whose key is greater than or
  /// equal to `key`. Lands on the tail sentinel, returning `None`, if there
  /// is none.
  pub fn seek_ge(&mut self, key: &[u8]) -> Option<u32> {
    let prefix = self.list.storage.prefix(key);
    self.nd = self.list.find_splice(key, prefix).splice.next;
    self.key_offset()
  }

  /// Moves the iterator to the last record whose key is less than `key`.
  /// Lands on the head sentinel, returning `None`, if there is none.
  pub fn seek_lt(&mut self, key: &[u8]) -> Option<u32> {
    let prefix = self.list.storage.prefix(key);
    self.nd = self.list.find_splice(key, prefix).splice.prev;
    self.key_offset()
  }

  /// Adds the record whose key is stored at `key_offset` and positions the
  /// iterator at it. The key must already be written to the storage.
  ///
  /// # Errors
  ///
  /// - Returns `Error::Duplicated`, if a record with an equal key exists.
  ///   Neither the skiplist nor the position of the iterator change.
  pub fn insert(&mut self, key_offset: u32) -> Result<(), Error> {
    self.nd = self.list.insert_in(key_offset)?;
    Ok(())
  }
}
