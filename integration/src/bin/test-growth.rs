use batchskl::*;
use integration::{big_key, Batch};

fn main() {
  const N: usize = 10_000;

  let batch = Batch::default();
  let list = Skiplist::with_options(&batch, Options::new().with_capacity(0));
  let initial = list.capacity();

  // Keys sharing a 1 KiB prefix, so every comparison reaches the storage.
  for i in (0..N).rev() {
    list.insert(batch.write(&big_key(i))).unwrap();
  }
  assert!(list.capacity() > initial);

  let mut it = list.iter();
  for i in 0..N {
    assert!(it.next().is_some());
    assert_eq!(&*it.key().unwrap(), big_key(i).as_slice(), "broken: {i}");
  }
  assert!(it.next().is_none());
}
