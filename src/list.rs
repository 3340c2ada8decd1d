//! Read-only list adapter over any view.
//!
//! This module provides [`ReadOnlyList`], a wrapper that gives any [`Collection`] the
//! familiar list operations: searching, copying out, iteration and serialization. It has no
//! mutating methods at all; the wrapped view aliases an immutable buffer.
//!
//! ## Examples
//!
//! ```rust
//! use flatview::{Builder, ReadOnlyList, ScalarVector};
//!
//! let mut builder = Builder::new();
//! builder.start_vector(2, 3, 2).unwrap();
//! for v in [9u16, 4, 1] {
//!     builder.push(v).unwrap();
//! }
//! let squares = builder.end_vector().unwrap();
//! let bytes = builder.finish(squares).unwrap();
//!
//! let list = ReadOnlyList::new(flatview::root_vector::<ScalarVector<u16>>(bytes));
//! assert_eq!(list.index_of(&4), Some(1));
//! assert!(!list.contains(&2));
//! assert_eq!(list.to_vec(), vec![1, 4, 9]);
//! ```

use crate::collection::{Collection, Iter};
use crate::{Error, Result};
use serde::ser::{Serialize, SerializeSeq, Serializer};

/// A read-only list over a [`Collection`].
///
/// # Examples
///
/// ```rust
/// use flatview::{Builder, ReadOnlyList, StringVector};
///
/// let mut builder = Builder::new();
/// let b = builder.create_string("b").unwrap();
/// let a = builder.create_string("a").unwrap();
/// builder.start_vector(4, 2, 4).unwrap();
/// builder.add_offset(b).unwrap();
/// builder.add_offset(a).unwrap();
/// let letters = builder.end_vector().unwrap();
/// let bytes = builder.finish(letters).unwrap();
///
/// let list: ReadOnlyList<StringVector> = flatview::root_vector::<StringVector>(bytes).into();
/// let joined: String = list.iter().collect();
/// assert_eq!(joined, "ab");
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ReadOnlyList<C>(C);

impl<C: Collection> ReadOnlyList<C> {
    #[must_use]
    pub fn new(collection: C) -> Self {
        ReadOnlyList(collection)
    }

    /// Returns the wrapped view.
    pub fn into_inner(self) -> C {
        self.0
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the element at `index`, or `None` when out of range.
    pub fn get(&self, index: usize) -> Option<C::Item> {
        self.0.try_get(index)
    }

    /// Returns an iterator over the elements, in index order.
    pub fn iter(&self) -> Iter<'_, C> {
        self.0.iter()
    }

    /// Returns the index of the first element equal to `value`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use flatview::{Builder, ReadOnlyList, StringVector};
    ///
    /// let mut builder = Builder::new();
    /// let x = builder.create_string("x").unwrap();
    /// builder.start_vector(4, 1, 4).unwrap();
    /// builder.add_offset(x).unwrap();
    /// let v = builder.end_vector().unwrap();
    /// let bytes = builder.finish(v).unwrap();
    ///
    /// let list = ReadOnlyList::new(flatview::root_vector::<StringVector>(bytes));
    /// assert_eq!(list.index_of("x"), Some(0));
    /// assert_eq!(list.index_of("y"), None);
    /// ```
    pub fn index_of<Q>(&self, value: &Q) -> Option<usize>
    where
        Q: ?Sized,
        C::Item: PartialEq<Q>,
    {
        self.iter().position(|item| item == *value)
    }

    pub fn contains<Q>(&self, value: &Q) -> bool
    where
        Q: ?Sized,
        C::Item: PartialEq<Q>,
    {
        self.index_of(value).is_some()
    }

    /// Copies every element into `destination`, starting at `start`.
    ///
    /// Nothing is written when the elements do not fit.
    pub fn copy_to(&self, destination: &mut [C::Item], start: usize) -> Result<()> {
        let needed = self.len();
        let available = destination.len().saturating_sub(start);
        if start > destination.len() || needed > available {
            return Err(Error::DestinationTooSmall { needed, available });
        }
        for (slot, item) in destination[start..].iter_mut().zip(self.iter()) {
            *slot = item;
        }
        Ok(())
    }

    /// Collects the elements into an owned vector.
    pub fn to_vec(&self) -> Vec<C::Item> {
        self.iter().collect()
    }
}

impl<C: Collection> From<C> for ReadOnlyList<C> {
    fn from(collection: C) -> Self {
        ReadOnlyList(collection)
    }
}

impl<'l, C: Collection> IntoIterator for &'l ReadOnlyList<C> {
    type Item = C::Item;
    type IntoIter = Iter<'l, C>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<C> Serialize for ReadOnlyList<C>
where
    C: Collection,
    C::Item: Serialize,
{
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.len()))?;
        for item in self {
            seq.serialize_element(&item)?;
        }
        seq.end()
    }
}
