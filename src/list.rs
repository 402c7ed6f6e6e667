use core::{
  cell::{Cell, RefCell},
  cmp,
};

use rand::{rngs::StdRng, SeedableRng};

use super::{
  arena::Arena,
  node::{Link, NodePtr},
  random_height,
  storage::{KeyPrefix, Storage},
  Error, Options, MAX_HEIGHT,
};

mod iterator;
pub use iterator::ListIterator;

/// The predecessor and successor between which a key belongs at one level.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Splice {
  pub(crate) prev: NodePtr,
  pub(crate) next: NodePtr,
}

pub(crate) struct FindResult {
  pub(crate) splice: Splice,
  /// `splice.next` holds a key equal to the searched one.
  pub(crate) found: bool,
}

/// An append-only skiplist that keeps the records of a write batch sorted and
/// free of duplicates.
///
/// The keys are not copied into the skiplist: every node stores the offset of
/// its key in the caller's [`Storage`] together with a cached [`KeyPrefix`],
/// and the key itself is only fetched when two prefixes tie.
///
/// Nodes cannot be removed. The whole skiplist is dropped, or [`reset`], once
/// the batch has been committed or abandoned.
///
/// The skiplist is meant for a single thread: it is neither `Sync` nor does it
/// lock. Insertion only needs a shared reference, so any number of
/// [`ListIterator`]s can stay alive, and keep stepping, while records are
/// added.
///
/// [`reset`]: Skiplist::reset
pub struct Skiplist<'s, S: ?Sized> {
  storage: &'s S,
  arena: RefCell<Arena>,
  rng: RefCell<StdRng>,
  head: NodePtr,
  tail: NodePtr,

  /// Current height. 1 <= height <= MAX_HEIGHT.
  height: Cell<u32>,
  len: Cell<u32>,
}

impl<S: ?Sized> core::fmt::Debug for Skiplist<'_, S> {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    f.debug_struct("Skiplist")
      .field("arena", &*self.arena.borrow())
      .field("height", &self.height.get())
      .field("len", &self.len.get())
      .finish()
  }
}

// --------------------------------Public Methods--------------------------------
impl<'s, S: Storage + ?Sized> Skiplist<'s, S> {
  /// Creates an empty skiplist over `storage` whose arena initially reserves
  /// `cap` bytes.
  ///
  /// **Note:** The capacity stands for how many memory allocated,
  /// it does not mean the skiplist can store `cap` entries. The arena grows
  /// when it runs out of room.
  ///
  /// ## Example
  ///
  /// ```rust
  /// use batchskl::{Skiplist, Storage};
  ///
  /// struct Keys(Vec<&'static [u8]>);
  ///
  /// impl Storage for Keys {
  ///   type Key<'a> = &'a [u8];
  ///
  ///   fn get(&self, offset: u32) -> Self::Key<'_> {
  ///     self.0[offset as usize]
  ///   }
  /// }
  ///
  /// let keys = Keys(vec![&b"b"[..], &b"a"[..], &b"c"[..]]);
  /// let list = Skiplist::new(&keys, 1024);
  /// for offset in 0..3 {
  ///   list.insert(offset).unwrap();
  /// }
  /// assert!(list.insert(0).is_err());
  ///
  /// let mut it = list.iter();
  /// assert_eq!(it.first(), Some(1));
  /// assert_eq!(it.next(), Some(0));
  /// assert_eq!(it.next(), Some(2));
  /// assert_eq!(it.next(), None);
  /// ```
  #[inline]
  pub fn new(storage: &'s S, cap: u32) -> Self {
    Self::with_options(storage, Options::new().with_capacity(cap))
  }

  /// Creates an empty skiplist over `storage` configured by `opts`.
  pub fn with_options(storage: &'s S, opts: Options) -> Self {
    let mut arena = Arena::new((opts.capacity() as usize).max(NodePtr::MAX_NODE_SIZE * 2));
    let (head, tail) = Self::link_sentinels(&mut arena);
    let rng = match opts.seed() {
      Some(seed) => StdRng::seed_from_u64(seed),
      None => StdRng::from_rng(&mut rand::rng()),
    };

    Self {
      storage,
      arena: RefCell::new(arena),
      rng: RefCell::new(rng),
      head,
      tail,
      height: Cell::new(1),
      len: Cell::new(0),
    }
  }

  /// Returns the storage the keys are read from.
  #[inline]
  pub const fn storage(&self) -> &'s S {
    self.storage
  }

  /// Returns the height of the highest tower within any of the nodes that
  /// have ever been allocated as part of this skiplist.
  #[inline]
  pub fn height(&self) -> u32 {
    self.height.get()
  }

  /// Returns the number of records in the skiplist.
  #[inline]
  pub fn len(&self) -> usize {
    self.len.get() as usize
  }

  /// Returns true if the skiplist is empty.
  #[inline]
  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }

  /// Returns the number of bytes that have allocated from the arena.
  #[inline]
  pub fn size(&self) -> usize {
    self.arena.borrow().size()
  }

  /// Returns the number of bytes the arena can hold before it has to grow.
  #[inline]
  pub fn capacity(&self) -> usize {
    self.arena.borrow().capacity()
  }

  /// Returns, for every level currently in use, how many records are linked
  /// at that level. Index 0 is the base level and always equals [`len`].
  ///
  /// [`len`]: Skiplist::len
  pub fn level_counts(&self) -> Vec<usize> {
    let arena = self.arena.borrow();
    (0..self.height.get() as usize)
      .map(|level| {
        let mut count = 0;
        let mut nd = self.head.next_offset(&arena, level);
        while nd != self.tail.offset {
          count += 1;
          nd = NodePtr { offset: nd }.next_offset(&arena, level);
        }
        count
      })
      .collect()
  }

  /// Returns a new iterator positioned before the first record. Note that it
  /// is safe for an iterator to be copied by value.
  #[doc(alias = "new_iterator")]
  #[inline]
  pub const fn iter(&self) -> ListIterator<'_, 's, S> {
    ListIterator::new(self)
  }

  /// Adds the record whose key is stored at `key_offset`. The key must
  /// already be written to the storage.
  ///
  /// As a low-level crate, users are expected to handle the error cases
  /// themselves.
  ///
  /// # Errors
  ///
  /// - Returns `Error::Duplicated`, if a record with an equal key exists. The
  ///   skiplist is left untouched.
  #[inline]
  pub fn insert(&self, key_offset: u32) -> Result<(), Error> {
    self.insert_in(key_offset).map(|_| ())
  }

  /// Removes every record, keeping the memory of the arena for the next
  /// batch. Taking `&mut self` guarantees no iterator outlives the records
  /// it points at.
  pub fn reset(&mut self) {
    let arena = self.arena.get_mut();
    arena.clear();
    let (head, tail) = Self::link_sentinels(arena);
    self.head = head;
    self.tail = tail;
    self.height.set(1);
    self.len.set(0);
  }
}

impl<S: Storage + ?Sized> Skiplist<'_, S> {
  /// Allocates head and tail at full height and links them at every level.
  fn link_sentinels(arena: &mut Arena) -> (NodePtr, NodePtr) {
    let head = NodePtr::allocate(arena, MAX_HEIGHT as u32, 0, KeyPrefix::default());
    let tail = NodePtr::allocate(arena, MAX_HEIGHT as u32, 0, KeyPrefix::default());

    for i in 0..MAX_HEIGHT {
      head.write_tower(
        arena,
        i,
        Link {
          next_offset: tail.offset,
          prev_offset: 0,
        },
      );
      tail.write_tower(
        arena,
        i,
        Link {
          next_offset: 0,
          prev_offset: head.offset,
        },
      );
    }
    (head, tail)
  }

  #[inline]
  fn random_height(&self) -> u32 {
    random_height(&mut *self.rng.borrow_mut())
  }

  #[inline]
  pub(crate) fn get_next(&self, nd: NodePtr, level: usize) -> NodePtr {
    NodePtr {
      offset: nd.next_offset(&self.arena.borrow(), level),
    }
  }

  #[inline]
  pub(crate) fn get_prev(&self, nd: NodePtr, level: usize) -> NodePtr {
    NodePtr {
      offset: nd.prev_offset(&self.arena.borrow(), level),
    }
  }

  #[inline]
  pub(crate) fn key_offset(&self, nd: NodePtr) -> u32 {
    nd.key_offset(&self.arena.borrow())
  }

  #[inline]
  pub(crate) fn prefix(&self, nd: NodePtr) -> KeyPrefix {
    nd.prefix(&self.arena.borrow())
  }

  /// Inserts the record and returns its node.
  pub(crate) fn insert_in(&self, key_offset: u32) -> Result<NodePtr, Error> {
    let stored = self.storage.get(key_offset);
    let key: &[u8] = &stored;
    let prefix = self.storage.prefix(key);

    let height = self.random_height();
    let list_height = self.height.get();
    // Levels above the current height only hold head and tail, so searching
    // them yields (head, tail) at once.
    let top = height.max(list_height) as usize;

    let mut spl = [Splice {
      prev: self.head,
      next: self.tail,
    }; MAX_HEIGHT];

    {
      let arena = self.arena.borrow();
      let mut prev = self.head;
      for level in (0..top).rev() {
        let fr = self.find_splice_for_level(&arena, key, prefix, level, prev);
        if fr.found {
          // All levels share one order, an equal key at any level means the
          // record exists.
          #[cfg(feature = "tracing")]
          tracing::debug!(key_offset, level, "rejecting duplicate key");
          return Err(Error::Duplicated);
        }
        spl[level] = fr.splice;
        prev = fr.splice.prev;
      }
    }

    if height > list_height {
      #[cfg(feature = "tracing")]
      tracing::debug!(from = list_height, to = height, "raising skiplist height");
      self.height.set(height);
    }

    let mut arena = self.arena.borrow_mut();
    let nd = NodePtr::allocate(&mut arena, height, key_offset, prefix);
    for (level, s) in spl[..height as usize].iter().enumerate() {
      nd.write_tower(
        &mut arena,
        level,
        Link {
          next_offset: s.next.offset,
          prev_offset: s.prev.offset,
        },
      );
      s.prev.set_next_offset(&mut arena, level, nd.offset);
      s.next.set_prev_offset(&mut arena, level, nd.offset);
    }

    self.len.set(self.len.get() + 1);
    Ok(nd)
  }

  /// Finds the splice of `key` at the base level, descending from the top
  /// level and carrying the predecessor down.
  pub(crate) fn find_splice(&self, key: &[u8], prefix: KeyPrefix) -> FindResult {
    let arena = self.arena.borrow();
    let mut prev = self.head;
    let mut level = self.height.get() as usize;
    loop {
      level -= 1;
      let fr = self.find_splice_for_level(&arena, key, prefix, level, prev);
      if level == 0 {
        return fr;
      }
      prev = fr.splice.prev;
    }
  }

  /// Find the splice for the given level, walking right from `start`, which
  /// must hold a key smaller than `key` (or be the head).
  ///
  /// Prefixes are compared first; the storage is only asked to compare the
  /// keys when they tie.
  fn find_splice_for_level(
    &self,
    arena: &Arena,
    key: &[u8],
    prefix: KeyPrefix,
    level: usize,
    start: NodePtr,
  ) -> FindResult {
    let mut prev = start;

    loop {
      // Assume prev.key < key.
      let next = NodePtr {
        offset: prev.next_offset(arena, level),
      };
      if next.offset == self.tail.offset {
        // Tail node, so done.
        return FindResult {
          splice: Splice { prev, next },
          found: false,
        };
      }

      let next_prefix = next.prefix(arena);
      let cmp = match prefix.cmp(&next_prefix) {
        cmp::Ordering::Equal => self.storage.compare(key, next.key_offset(arena)),
        cmp => cmp,
      };

      match cmp {
        // We are done for this level, since prev.key < key < next.key.
        cmp::Ordering::Less => {
          return FindResult {
            splice: Splice { prev, next },
            found: false,
          };
        }
        // Keep moving right on this level.
        cmp::Ordering::Greater => prev = next,
        cmp::Ordering::Equal => {
          return FindResult {
            splice: Splice { prev, next },
            found: true,
          };
        }
      }
    }
  }

  #[cfg(test)]
  pub(crate) fn head(&self) -> NodePtr {
    self.head
  }

  #[cfg(test)]
  pub(crate) fn tail(&self) -> NodePtr {
    self.tail
  }

  #[cfg(test)]
  pub(crate) fn with_arena<R>(&self, f: impl FnOnce(&Arena) -> R) -> R {
    f(&self.arena.borrow())
  }
}
