use std::cell::{Ref, RefCell};

use batchskl::Storage;

/// Only used for testing
pub fn key(i: usize) -> Vec<u8> {
  format!("{:05}", i).into_bytes()
}

/// Only used for testing
pub fn big_key(i: usize) -> Vec<u8> {
  format!("{:01024}", i).into_bytes()
}

/// A batch buffer: every record is a 32-bit little-endian key length followed
/// by the key bytes, appended one after another.
#[derive(Debug, Default)]
pub struct Batch {
  buf: RefCell<Vec<u8>>,
}

impl Batch {
  pub fn with_capacity(cap: usize) -> Self {
    Self {
      buf: RefCell::new(Vec::with_capacity(cap)),
    }
  }

  /// Appends `key` and returns the offset of its record.
  pub fn write(&self, key: &[u8]) -> u32 {
    let mut buf = self.buf.borrow_mut();
    let offset = buf.len() as u32;
    buf.extend_from_slice(&(key.len() as u32).to_le_bytes());
    buf.extend_from_slice(key);
    offset
  }

  pub fn len(&self) -> usize {
    self.buf.borrow().len()
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }
}

impl Storage for Batch {
  type Key<'a> = Ref<'a, [u8]>;

  fn get(&self, offset: u32) -> Self::Key<'_> {
    Ref::map(self.buf.borrow(), |buf| {
      let offset = offset as usize;
      let mut len = [0; 4];
      len.copy_from_slice(&buf[offset..offset + 4]);
      let len = u32::from_le_bytes(len) as usize;
      &buf[offset + 4..offset + 4 + len]
    })
  }
}
