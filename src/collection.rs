//! The indexed, read-only capability shared by every view.
//!
//! Every vector view and the union vector implement [`Collection`]. The clone engine and the
//! [`ReadOnlyList`](crate::ReadOnlyList) adapter are written once against this trait rather
//! than against each concrete view.

use std::iter::FusedIterator;

/// An indexed sequence whose elements are computed on demand.
///
/// `get` is unchecked in the sense of the format: the length comes from the buffer and is
/// trusted. An index at or past [`len`](Self::len) may panic or produce a value decoded from
/// unrelated bytes. Use [`try_get`](Self::try_get) when the index is not known to be valid.
pub trait Collection {
    type Item;

    /// Number of elements.
    fn len(&self) -> usize;

    /// Element at `index`.
    fn get(&self, index: usize) -> Self::Item;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Element at `index`, or `None` when the index is out of range.
    fn try_get(&self, index: usize) -> Option<Self::Item> {
        if index < self.len() {
            Some(self.get(index))
        } else {
            None
        }
    }

    /// Iterates the elements in index order.
    fn iter(&self) -> Iter<'_, Self>
    where
        Self: Sized,
    {
        Iter::new(self)
    }
}

/// Iterator over a [`Collection`].
#[derive(Debug)]
pub struct Iter<'c, C> {
    collection: &'c C,
    front: usize,
    back: usize,
}

impl<'c, C: Collection> Iter<'c, C> {
    pub fn new(collection: &'c C) -> Self {
        Iter {
            collection,
            front: 0,
            back: collection.len(),
        }
    }
}

impl<C> Clone for Iter<'_, C> {
    fn clone(&self) -> Self {
        Iter {
            collection: self.collection,
            front: self.front,
            back: self.back,
        }
    }
}

impl<C: Collection> Iterator for Iter<'_, C> {
    type Item = C::Item;

    fn next(&mut self) -> Option<Self::Item> {
        if self.front < self.back {
            let item = self.collection.get(self.front);
            self.front += 1;
            Some(item)
        } else {
            None
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.back - self.front;
        (remaining, Some(remaining))
    }

    fn nth(&mut self, n: usize) -> Option<Self::Item> {
        self.front = self.front.saturating_add(n).min(self.back);
        self.next()
    }
}

impl<C: Collection> DoubleEndedIterator for Iter<'_, C> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.front < self.back {
            self.back -= 1;
            Some(self.collection.get(self.back))
        } else {
            None
        }
    }
}

impl<C: Collection> ExactSizeIterator for Iter<'_, C> {}

impl<C: Collection> FusedIterator for Iter<'_, C> {}
