/// The smallest number of bytes an [`Arena`] reserves up front.
pub(crate) const MIN_CAPACITY: usize = 256;

/// An append-only byte region that hands out `u32` offsets.
///
/// Offsets are logical positions, not addresses: growing the region moves the
/// bytes but every offset issued before the move still names the same record.
/// Nothing is ever freed individually, the whole region is dropped or cleared
/// at once.
pub(crate) struct Arena {
  buf: Vec<u8>,
}

impl core::fmt::Debug for Arena {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    f.debug_struct("Arena")
      .field("cap", &self.capacity())
      .field("allocated", &self.size())
      .finish()
  }
}

impl Arena {
  #[inline]
  pub(crate) fn new(cap: usize) -> Self {
    Self {
      buf: Vec::with_capacity(cap.max(MIN_CAPACITY)),
    }
  }

  /// Returns the number of bytes allocated by the arena.
  #[inline]
  pub(crate) fn size(&self) -> usize {
    self.buf.len()
  }

  /// Returns the capacity of the arena.
  #[inline]
  pub(crate) fn capacity(&self) -> usize {
    self.buf.capacity()
  }

  /// Forgets every allocation but keeps the reserved memory.
  #[inline]
  pub(crate) fn clear(&mut self) {
    self.buf.clear();
  }

  /// Allocates `size` zeroed bytes and returns their offset.
  ///
  /// When the reserved memory is exhausted the region doubles, or grows to
  /// exactly what is needed if doubling is not enough.
  pub(crate) fn alloc(&mut self, size: u32) -> u32 {
    let offset = self.buf.len();
    let new_size = offset + size as usize;
    assert!(
      new_size <= u32::MAX as usize,
      "arena cannot grow beyond {} bytes",
      u32::MAX
    );

    let cap = self.buf.capacity();
    if cap < new_size {
      let want = cap.saturating_mul(2).max(new_size);
      #[cfg(feature = "tracing")]
      tracing::trace!(from = cap, to = want, "growing arena");
      self.buf.reserve_exact(want - offset);
    }

    self.buf.resize(new_size, 0);
    offset as u32
  }

  #[inline]
  pub(crate) fn get_u32(&self, offset: u32) -> u32 {
    let offset = offset as usize;
    let mut bytes = [0; 4];
    bytes.copy_from_slice(&self.buf[offset..offset + 4]);
    u32::from_le_bytes(bytes)
  }

  #[inline]
  pub(crate) fn put_u32(&mut self, offset: u32, val: u32) {
    let offset = offset as usize;
    self.buf[offset..offset + 4].copy_from_slice(&val.to_le_bytes());
  }

  #[inline]
  pub(crate) fn get_u64(&self, offset: u32) -> u64 {
    let offset = offset as usize;
    let mut bytes = [0; 8];
    bytes.copy_from_slice(&self.buf[offset..offset + 8]);
    u64::from_le_bytes(bytes)
  }

  #[inline]
  pub(crate) fn put_u64(&mut self, offset: u32, val: u64) {
    let offset = offset as usize;
    self.buf[offset..offset + 8].copy_from_slice(&val.to_le_bytes());
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_debug() {
    let mut arena = Arena::new(1024);
    arena.alloc(25);
    assert_eq!(
      std::format!("{:?}", arena),
      std::format!("Arena {{ cap: {}, allocated: 25 }}", arena.capacity())
    );
  }

  #[test]
  fn test_min_capacity() {
    let arena = Arena::new(0);
    assert!(arena.capacity() >= MIN_CAPACITY);
    assert_eq!(arena.size(), 0);
  }

  #[test]
  fn test_offsets_are_monotonic() {
    let mut arena = Arena::new(0);
    let a = arena.alloc(16);
    let b = arena.alloc(8);
    let c = arena.alloc(24);
    assert_eq!(a, 0);
    assert_eq!(b, 16);
    assert_eq!(c, 24);
    assert_eq!(arena.size(), 48);
  }

  #[test]
  fn test_growth_doubles() {
    let mut arena = Arena::new(MIN_CAPACITY);
    let cap = arena.capacity();
    arena.alloc(cap as u32);
    arena.alloc(1);
    assert!(arena.capacity() >= cap * 2);

    // Doubling is not enough, grow to exactly what is needed.
    let cap = arena.capacity();
    let size = arena.size();
    arena.alloc((cap * 4) as u32);
    assert!(arena.capacity() >= size + cap * 4);
  }

  #[test]
  fn test_growth_keeps_contents() {
    let mut arena = Arena::new(0);
    let mut written = std::vec::Vec::new();
    for i in 0..1000u32 {
      let offset = arena.alloc(12);
      arena.put_u32(offset, i);
      arena.put_u64(offset + 4, (u64::from(i) << 32) | 0xdead);
      written.push(offset);
    }

    assert!(arena.capacity() > MIN_CAPACITY);
    for (i, offset) in written.into_iter().enumerate() {
      assert_eq!(arena.get_u32(offset), i as u32);
      assert_eq!(arena.get_u64(offset + 4), ((i as u64) << 32) | 0xdead);
    }
  }

  #[test]
  fn test_clear_keeps_capacity() {
    let mut arena = Arena::new(0);
    arena.alloc(4096);
    let cap = arena.capacity();
    arena.clear();
    assert_eq!(arena.size(), 0);
    assert_eq!(arena.capacity(), cap);
    assert_eq!(arena.alloc(8), 0);
  }

  #[test]
  fn test_alloc_is_zeroed() {
    let mut arena = Arena::new(0);
    let offset = arena.alloc(8);
    arena.put_u64(offset, u64::MAX);
    arena.clear();
    let offset = arena.alloc(8);
    assert_eq!(arena.get_u64(offset), 0);
  }

  #[test]
  #[should_panic]
  fn test_read_out_of_bounds() {
    let mut arena = Arena::new(0);
    let offset = arena.alloc(4);
    arena.get_u64(offset);
  }
}
