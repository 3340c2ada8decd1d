//! Typed offsets into a [`Builder`](crate::Builder)'s buffer.
//!
//! Builder offsets count bytes from the *end* of the buffer, because the buffer grows toward
//! lower addresses. They stay valid as the buffer grows, but only within the builder that
//! produced them.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

/// Marker for offsets to strings.
#[derive(Debug)]
pub enum StringKind {}

/// Marker for offsets to vectors.
#[derive(Debug)]
pub enum VectorKind {}

/// Marker for offsets to tables.
#[derive(Debug)]
pub enum TableKind {}

/// An offset to a finished object, tagged with the kind of object it refers to.
pub struct Offset<K> {
    value: u32,
    _kind: PhantomData<fn() -> K>,
}

pub type StringOffset = Offset<StringKind>;
pub type VectorOffset = Offset<VectorKind>;
pub type TableOffset = Offset<TableKind>;

impl<K> Offset<K> {
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Offset {
            value,
            _kind: PhantomData,
        }
    }

    #[must_use]
    pub const fn value(self) -> u32 {
        self.value
    }

    /// Returns `true` for the zero offset, which marks an absent field.
    #[must_use]
    pub const fn is_null(self) -> bool {
        self.value == 0
    }
}

impl<K> Clone for Offset<K> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K> Copy for Offset<K> {}

impl<K> PartialEq for Offset<K> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl<K> Eq for Offset<K> {}

impl<K> Hash for Offset<K> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.value.hash(state);
    }
}

impl<K> fmt::Debug for Offset<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Offset({})", self.value)
    }
}

impl<K> From<Offset<K>> for u32 {
    fn from(offset: Offset<K>) -> Self {
        offset.value
    }
}
