use super::arena::MIN_CAPACITY;

/// Options for a [`Skiplist`](crate::Skiplist).
#[viewit::viewit(vis_all = "pub(crate)", getters(skip), setters(skip))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Options {
  capacity: u32,
  seed: Option<u64>,
}

impl Default for Options {
  #[inline]
  fn default() -> Options {
    Options::new()
  }
}

impl Options {
  /// Creates a new set of options with the default values.
  #[inline]
  pub const fn new() -> Self {
    Self {
      capacity: MIN_CAPACITY as u32,
      seed: None,
    }
  }

  /// Set the number of bytes the arena reserves up front. The arena grows on
  /// demand, so this is only a hint; values below 256 are raised to 256.
  ///
  /// **Note:** The capacity stands for how many memory allocated,
  /// it does not mean the skiplist can store `cap` entries.
  ///
  /// ## Example
  ///
  /// ```rust
  /// use batchskl::Options;
  ///
  /// let opts = Options::new().with_capacity(1 << 20);
  /// assert_eq!(opts.capacity(), 1 << 20);
  /// ```
  #[inline]
  pub const fn with_capacity(mut self, capacity: u32) -> Self {
    self.capacity = capacity;
    self
  }

  /// Seed the generator used to draw tower heights, which makes the shape of
  /// the skiplist reproducible. By default every skiplist is seeded from the
  /// thread-local generator.
  ///
  /// ## Example
  ///
  /// ```rust
  /// use batchskl::Options;
  ///
  /// let opts = Options::new().with_seed(7);
  /// assert_eq!(opts.seed(), Some(7));
  /// ```
  #[inline]
  pub const fn with_seed(mut self, seed: u64) -> Self {
    self.seed = Some(seed);
    self
  }

  /// Returns the number of bytes the arena reserves up front.
  #[inline]
  pub const fn capacity(&self) -> u32 {
    self.capacity
  }

  /// Returns the seed of the height generator, if any.
  #[inline]
  pub const fn seed(&self) -> Option<u64> {
    self.seed
  }
}
