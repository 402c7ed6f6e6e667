#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![cfg_attr(docsrs, allow(unused_attributes))]
#![deny(missing_docs)]
#![forbid(unsafe_code)]

use rand::Rng;

mod arena;
mod error;
mod node;
mod options;
mod storage;

/// The batch skiplist and its cursor.
pub mod list;

pub use error::Error;
pub use list::{ListIterator, Skiplist};
pub use options::Options;
pub use storage::{KeyPrefix, Storage};

/// The maximum height of any tower in the skiplist, head and tail included.
pub const MAX_HEIGHT: usize = 20;

/// Precompute the skiplist probabilities so that only a single random number
/// needs to be generated and so that the optimal pvalue can be used (inverse
/// of Euler's number).
const PROBABILITIES: [u32; MAX_HEIGHT] = {
  const P: f64 = 1.0 / core::f64::consts::E;

  let mut probabilities = [0; MAX_HEIGHT];
  let mut p = 1f64;

  let mut i = 0;
  while i < MAX_HEIGHT {
    probabilities[i] = ((u32::MAX as f64) * p) as u32;
    p *= P;
    i += 1;
  }

  probabilities
};

#[inline]
fn random_height<R: Rng + ?Sized>(rng: &mut R) -> u32 {
  let rnd: u32 = rng.random();
  let mut h = 1;

  while h < MAX_HEIGHT && rnd <= PROBABILITIES[h] {
    h += 1;
  }
  h as u32
}
