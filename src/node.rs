use super::{arena::Arena, storage::KeyPrefix, MAX_HEIGHT};

/// The links of a node at one level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Link {
  pub(crate) next_offset: u32,
  pub(crate) prev_offset: u32,
}

impl Link {
  pub(crate) const SIZE: usize = 2 * core::mem::size_of::<u32>();
}

/// A handle to a node stored in the [`Arena`].
///
/// A node is laid out as:
///
/// ```text
/// +-----------------+---------------+---------------+----------------------------+
/// | 32-bit key off  | 32-bit height | 64-bit prefix | height x (next, prev) link |
/// +-----------------+---------------+---------------+----------------------------+
/// ```
///
/// Most nodes do not need the full height of the tower, since the probability
/// of each successive level decreases exponentially. Only `height` links are
/// allocated, and the accessors refuse to touch a level the node does not
/// have.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct NodePtr {
  pub(crate) offset: u32,
}

impl NodePtr {
  const KEY_OFFSET: u32 = 0;
  const HEIGHT_OFFSET: u32 = 4;
  const PREFIX_OFFSET: u32 = 8;

  pub(crate) const HEADER_SIZE: usize = 16;

  pub(crate) const MAX_NODE_SIZE: usize = Self::HEADER_SIZE + MAX_HEIGHT * Link::SIZE;

  /// Returns the number of bytes a node of `height` occupies.
  #[inline]
  pub(crate) const fn size(height: u32) -> u32 {
    (Self::HEADER_SIZE + height as usize * Link::SIZE) as u32
  }

  /// Allocates a node with unlinked (zeroed) levels.
  ///
  /// ## Panics
  /// - If `height` is not in `1..=MAX_HEIGHT`.
  pub(crate) fn allocate(
    arena: &mut Arena,
    height: u32,
    key_offset: u32,
    prefix: KeyPrefix,
  ) -> Self {
    assert!(
      (1..=MAX_HEIGHT as u32).contains(&height),
      "height cannot be less than one or greater than the max height"
    );

    let offset = arena.alloc(Self::size(height));
    arena.put_u32(offset + Self::KEY_OFFSET, key_offset);
    arena.put_u32(offset + Self::HEIGHT_OFFSET, height);
    arena.put_u64(offset + Self::PREFIX_OFFSET, prefix.get());
    Self { offset }
  }

  #[inline]
  pub(crate) fn key_offset(&self, arena: &Arena) -> u32 {
    arena.get_u32(self.offset + Self::KEY_OFFSET)
  }

  #[inline]
  pub(crate) fn height(&self, arena: &Arena) -> u32 {
    arena.get_u32(self.offset + Self::HEIGHT_OFFSET)
  }

  #[inline]
  pub(crate) fn prefix(&self, arena: &Arena) -> KeyPrefix {
    KeyPrefix::new(arena.get_u64(self.offset + Self::PREFIX_OFFSET))
  }

  /// Returns the arena offset of the link at `level`.
  ///
  /// ## Panics
  /// - If the node is not at least `level + 1` high.
  #[inline]
  fn link_offset(&self, arena: &Arena, level: usize) -> u32 {
    let height = self.height(arena) as usize;
    assert!(
      level < height,
      "level {level} is out of bounds for a node of height {height}"
    );
    self.offset + (Self::HEADER_SIZE + level * Link::SIZE) as u32
  }

  #[inline]
  pub(crate) fn write_tower(&self, arena: &mut Arena, level: usize, link: Link) {
    let offset = self.link_offset(arena, level);
    arena.put_u32(offset, link.next_offset);
    arena.put_u32(offset + 4, link.prev_offset);
  }

  #[inline]
  pub(crate) fn next_offset(&self, arena: &Arena, level: usize) -> u32 {
    arena.get_u32(self.link_offset(arena, level))
  }

  #[inline]
  pub(crate) fn prev_offset(&self, arena: &Arena, level: usize) -> u32 {
    arena.get_u32(self.link_offset(arena, level) + 4)
  }

  #[inline]
  pub(crate) fn set_next_offset(&self, arena: &mut Arena, level: usize, next: u32) {
    let offset = self.link_offset(arena, level);
    arena.put_u32(offset, next);
  }

  #[inline]
  pub(crate) fn set_prev_offset(&self, arena: &mut Arena, level: usize, prev: u32) {
    let offset = self.link_offset(arena, level);
    arena.put_u32(offset + 4, prev);
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_node_size_tracks_height() {
    let mut arena = Arena::new(0);
    let a = NodePtr::allocate(&mut arena, 1, 7, KeyPrefix::new(42));
    let b = NodePtr::allocate(&mut arena, 3, 9, KeyPrefix::new(43));
    assert_eq!(b.offset - a.offset, NodePtr::size(1));
    assert_eq!(arena.size() as u32, NodePtr::size(1) + NodePtr::size(3));
    assert!((NodePtr::size(1) as usize) < NodePtr::MAX_NODE_SIZE);
    assert_eq!(NodePtr::size(MAX_HEIGHT as u32) as usize, NodePtr::MAX_NODE_SIZE);

    assert_eq!(a.key_offset(&arena), 7);
    assert_eq!(a.height(&arena), 1);
    assert_eq!(a.prefix(&arena), KeyPrefix::new(42));
    assert_eq!(b.key_offset(&arena), 9);
    assert_eq!(b.height(&arena), 3);
    assert_eq!(b.prefix(&arena), KeyPrefix::new(43));
  }

  #[test]
  fn test_links() {
    let mut arena = Arena::new(0);
    let nd = NodePtr::allocate(&mut arena, 2, 0, KeyPrefix::default());
    assert_eq!(nd.next_offset(&arena, 1), 0);
    assert_eq!(nd.prev_offset(&arena, 1), 0);

    nd.write_tower(
      &mut arena,
      1,
      Link {
        next_offset: 20,
        prev_offset: 10,
      },
    );
    assert_eq!(nd.next_offset(&arena, 1), 20);
    assert_eq!(nd.prev_offset(&arena, 1), 10);

    nd.set_next_offset(&mut arena, 0, 30);
    nd.set_prev_offset(&mut arena, 0, 40);
    assert_eq!(nd.next_offset(&arena, 0), 30);
    assert_eq!(nd.prev_offset(&arena, 0), 40);
    // Level 1 is untouched.
    assert_eq!(nd.next_offset(&arena, 1), 20);
  }

  #[test]
  #[should_panic(expected = "height cannot be less than one")]
  fn test_zero_height() {
    let mut arena = Arena::new(0);
    NodePtr::allocate(&mut arena, 0, 0, KeyPrefix::default());
  }

  #[test]
  #[should_panic(expected = "height cannot be less than one")]
  fn test_height_too_large() {
    let mut arena = Arena::new(0);
    NodePtr::allocate(&mut arena, MAX_HEIGHT as u32 + 1, 0, KeyPrefix::default());
  }

  #[test]
  #[should_panic(expected = "out of bounds")]
  fn test_level_beyond_height() {
    let mut arena = Arena::new(0);
    let nd = NodePtr::allocate(&mut arena, 2, 0, KeyPrefix::default());
    NodePtr::allocate(&mut arena, 5, 0, KeyPrefix::default());
    // The bytes exist (they belong to the next node) but the level does not.
    nd.next_offset(&arena, 2);
  }
}
