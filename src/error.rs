/// Error type for the [`Skiplist`](crate::Skiplist).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
  /// Indicates that a record with an equal key already exists in the
  /// skiplist. The skiplist never overwrites, so what to do with the
  /// second record is up to the caller.
  Duplicated,
}

impl core::fmt::Display for Error {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    match self {
      Self::Duplicated => write!(f, "record with this key already exists"),
    }
  }
}

impl std::error::Error for Error {}

#[test]
fn test_display() {
  assert_eq!(
    std::format!("{}", Error::Duplicated),
    "record with this key already exists"
  );
}
