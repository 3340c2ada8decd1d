//! Deep cloning of vectors into a [`Builder`].
//!
//! Two paths exist, chosen by element kind:
//!
//! - **Inline elements** (scalars, enums, inline structs) carry no offsets and are identical
//!   at any address, so the whole payload is copied with one
//!   [`Builder::clone_vector_data`] call.
//! - **Offset-bearing elements** (strings, tables, unions, nested vectors) must be cloned
//!   one by one, and every child has to be finished before the new vector is opened. The
//!   children are cloned from the highest index down and their new offsets parked in a
//!   scratch array; the vector is then opened and the offsets added, again highest index
//!   first, so that the finished vector reads in index order.
//!
//! Tables and nested vectors clone their own children through this module again, so the
//! recursion is mutual. Each offset-bearing level counts against the builder's depth limit.
//!
//! ## Examples
//!
//! ```rust
//! use flatview::{clone_offsets, Builder, Collection, StringVector};
//!
//! let words = ["one", "two", "three"];
//! let mut builder = Builder::new();
//! let vector = clone_offsets(&mut builder, words.len(), "string", |builder, i| {
//!     Ok(builder.create_string(words[i])?.value())
//! })
//! .unwrap();
//! let bytes = builder.finish(vector).unwrap();
//!
//! let view: StringVector = flatview::root_vector(bytes);
//! assert_eq!(view.iter().collect::<Vec<_>>(), words);
//! ```

use crate::buffer::Scalar;
use crate::builder::Builder;
use crate::collection::Collection;
use crate::format::SIZE_UOFFSET;
use crate::offset::VectorOffset;
use crate::vector::{RawVector, ScalarVector};
use crate::Result;
use tracing::trace;

/// Builds a vector of `count` offsets, producing each child with `clone_element`.
///
/// `clone_element` is called with indices `count - 1` down to `0` and must return the
/// builder offset of the child it wrote. It must not leave a vector or table open. The
/// scratch array holding the child offsets is returned to the pool even when a child fails.
pub fn clone_offsets<F>(
    builder: &mut Builder,
    count: usize,
    kind: &'static str,
    mut clone_element: F,
) -> Result<VectorOffset>
where
    F: FnMut(&mut Builder, usize) -> Result<u32>,
{
    builder.descend(|builder| {
        trace!(kind, count, depth = builder.depth(), "cloning offset vector");
        builder.with_scratch(count, |builder, offsets| {
            for index in (0..count).rev() {
                offsets[index] = clone_element(builder, index)?;
            }

            builder.start_vector(SIZE_UOFFSET, count, SIZE_UOFFSET)?;
            for &offset in offsets.iter().rev() {
                builder.add_offset(offset)?;
            }
            builder.end_vector()
        })
    })
}

/// Builds a vector of offsets from the elements of `source`.
///
/// Same contract as [`clone_offsets`], with the element resolved from the collection.
pub fn clone_collection<C, F>(
    builder: &mut Builder,
    source: &C,
    kind: &'static str,
    mut clone_element: F,
) -> Result<VectorOffset>
where
    C: Collection,
    F: FnMut(&mut Builder, C::Item) -> Result<u32>,
{
    clone_offsets(builder, source.len(), kind, |builder, index| {
        clone_element(builder, source.get(index))
    })
}

/// Copies a vector of inline elements in one piece.
pub(crate) fn clone_inline(
    builder: &mut Builder,
    source: RawVector<'_>,
    element_size: usize,
    alignment: usize,
) -> Result<VectorOffset> {
    trace!(
        count = source.len,
        element_size,
        "copying inline vector payload"
    );
    builder.clone_vector_data(
        source.buf,
        source.start,
        element_size,
        source.len,
        alignment,
    )
}

/// Copies a scalar vector one element at a time, highest index first.
pub(crate) fn clone_scalars_elementwise<T: Scalar>(
    builder: &mut Builder,
    source: &ScalarVector<'_, T>,
) -> Result<VectorOffset> {
    let count = source.len();
    builder.start_vector(T::SIZE, count, T::SIZE)?;
    for index in (0..count).rev() {
        builder.push(source.get(index))?;
    }
    builder.end_vector()
}
