//! Reusable scratch arrays for staging child offsets.
//!
//! Cloning a vector of offset-bearing elements has to clone every child before the vector
//! itself is opened, so the child offsets are parked in a scratch array in between. Each
//! clone level checks out its own array; nested levels check out further arrays and return
//! them in reverse order. Returned arrays keep their capacity for the next checkout.
//!
//! The pool belongs to one [`Builder`](crate::Builder) and is only reachable through
//! [`Builder::with_scratch`](crate::Builder::with_scratch), which returns the array on every
//! exit path.

/// A stack of free `u32` arrays.
#[derive(Debug, Default)]
pub struct ScratchPool {
    free: Vec<Vec<u32>>,
    outstanding: usize,
}

impl ScratchPool {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Takes an array of exactly `len` zeroed slots out of the pool.
    pub fn checkout(&mut self, len: usize) -> Vec<u32> {
        let mut array = self.free.pop().unwrap_or_default();
        array.clear();
        array.resize(len, 0);
        self.outstanding += 1;
        array
    }

    /// Returns an array to the pool.
    pub fn release(&mut self, array: Vec<u32>) {
        debug_assert!(self.outstanding > 0, "released more arrays than checked out");
        self.outstanding = self.outstanding.saturating_sub(1);
        self.free.push(array);
    }

    /// Number of arrays currently checked out.
    #[must_use]
    pub fn outstanding(&self) -> usize {
        self.outstanding
    }

    /// Number of arrays waiting for reuse.
    #[must_use]
    pub fn pooled(&self) -> usize {
        self.free.len()
    }
}
