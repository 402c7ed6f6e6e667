use std::cmp;

use batchskl::*;

/// Keys held in a plain vector, ordered descending.
struct Descend(Vec<&'static [u8]>);

impl Storage for Descend {
  type Key<'a> = &'a [u8];

  fn get(&self, offset: u32) -> Self::Key<'_> {
    self.0[offset as usize]
  }

  fn prefix(&self, key: &[u8]) -> KeyPrefix {
    KeyPrefix::new(!KeyPrefix::from_key(key).get())
  }

  fn compare(&self, key: &[u8], offset: u32) -> cmp::Ordering {
    self.get(offset).cmp(key)
  }
}

#[test]
fn test_storage_defines_order() {
  let storage = Descend(vec![
    &b"banana"[..],
    &b"apple"[..],
    &b"cherry"[..],
    &b"apple pie"[..],
    &b"apple"[..],
    &b"applesauce!"[..],
  ]);
  let list = Skiplist::with_options(&storage, Options::new().with_seed(1));

  for offset in 0..4 {
    list.insert(offset).unwrap();
  }
  assert_eq!(list.insert(4), Err(Error::Duplicated));
  list.insert(5).unwrap();
  assert_eq!(list.len(), 5);

  let mut it = list.iter();
  let mut keys = Vec::new();
  while it.next().is_some() {
    keys.push(it.key().unwrap());
  }
  assert_eq!(
    keys,
    [
      &b"cherry"[..],
      &b"banana"[..],
      &b"applesauce!"[..],
      &b"apple pie"[..],
      &b"apple"[..],
    ]
  );

  // "b" sorts between "banana" and "applesauce!".
  assert_eq!(it.seek_ge(b"b"), Some(5));
  assert_eq!(it.key(), Some(&b"applesauce!"[..]));
  assert_eq!(it.seek_lt(b"b"), Some(0));
  assert_eq!(it.key(), Some(&b"banana"[..]));
  assert_eq!(it.seek_ge(b"a"), None);
  assert!(!it.valid());
}
