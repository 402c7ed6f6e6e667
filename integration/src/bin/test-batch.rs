use batchskl::*;
use integration::{key, Batch};
use rand::seq::SliceRandom;

fn main() {
  const N: usize = 100_000;

  let batch = Batch::with_capacity(N * 9);
  let mut list = Skiplist::new(&batch, 1 << 20);

  let mut order: Vec<usize> = (0..N).collect();
  order.shuffle(&mut rand::rng());
  for &i in &order {
    list.insert(batch.write(&key(i))).unwrap();
  }
  assert_eq!(list.len(), N);

  for &i in order.iter().take(1000) {
    assert_eq!(list.insert(batch.write(&key(i))), Err(Error::Duplicated));
  }
  assert_eq!(list.len(), N);

  let mut it = list.iter();
  let mut i = 0;
  while it.next().is_some() {
    assert_eq!(&*it.key().unwrap(), key(i).as_slice(), "broken: {i}");
    i += 1;
  }
  assert_eq!(i, N);

  while it.prev().is_some() {
    i -= 1;
    assert_eq!(&*it.key().unwrap(), key(i).as_slice(), "broken: {i}");
  }
  assert_eq!(i, 0);

  for i in (0..N).step_by(97) {
    assert!(it.seek_ge(&key(i)).is_some());
    assert_eq!(&*it.key().unwrap(), key(i).as_slice(), "broken: {i}");
  }

  let counts = list.level_counts();
  assert_eq!(counts[0], N);
  println!("height {}, levels {:?}", list.height(), counts);

  list.reset();
  assert!(list.is_empty());
  for i in 0..1000 {
    list.insert(batch.write(&key(i))).unwrap();
  }
  assert_eq!(list.len(), 1000);
}
