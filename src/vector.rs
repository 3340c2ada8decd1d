//! Typed zero-copy vector views.
//!
//! A view is `(buffer, start, len)` and nothing else. Construction reads the 4-byte length
//! prefix once; every element access is a fresh computation from the buffer.
//!
//! | View | Element | Stride | Clone path |
//! |------|---------|--------|------------|
//! | [`ScalarVector<T>`] | `T: Scalar` | `T::SIZE` | bulk byte copy |
//! | [`EnumVector<E>`] | `E: FlatEnum` | `E::Repr::SIZE` | bulk byte copy |
//! | [`StructVector<S>`] | `S: InlineStruct` | `S::SIZE` | bulk byte copy |
//! | [`StringVector`] | `Cow<str>` | 4 | per-element string copy |
//! | [`TableVector<T>`] | `T: TableView` | 4 | per-element table clone |
//! | [`VectorVector<V>`] | `V: VectorView` | 4 | per-element vector clone |
//!
//! Vectors of unions pair two vectors and live in [`union`](crate::union).
//!
//! ## Examples
//!
//! ```rust
//! use flatview::{Builder, Collection, StringVector, VectorView};
//!
//! let mut builder = Builder::new();
//! let a = builder.create_string("alpha").unwrap();
//! let b = builder.create_string("beta").unwrap();
//! builder.start_vector(4, 2, 4).unwrap();
//! builder.add_offset(b).unwrap();
//! builder.add_offset(a).unwrap();
//! let names = builder.end_vector().unwrap();
//! let bytes = builder.finish(names).unwrap();
//!
//! let view: StringVector = flatview::root_vector(bytes);
//! assert_eq!(view.len(), 2);
//! assert_eq!(view.get(1), "beta");
//! ```

use crate::buffer::{ByteBuffer, Scalar};
use crate::builder::Builder;
use crate::clone;
use crate::collection::Collection;
use crate::format::SIZE_UOFFSET;
use crate::offset::VectorOffset;
use crate::table::{InlineStruct, TableView};
use crate::union::FlatEnum;
use crate::Result;
use std::borrow::Cow;
use std::fmt;
use std::marker::PhantomData;

/// A vector that can be constructed at a position and cloned into a [`Builder`].
///
/// This is the contract nested vectors and table field accessors rely on.
pub trait VectorView<'a>: Collection + Sized {
    /// Creates a view over the vector whose length prefix is at `pos`.
    fn init(buf: ByteBuffer<'a>, pos: usize) -> Self;

    /// Deep-copies the vector into `builder`.
    fn clone_to(&self, builder: &mut Builder) -> Result<VectorOffset>;
}

/// Location of a vector's payload.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct RawVector<'a> {
    pub(crate) buf: ByteBuffer<'a>,
    pub(crate) start: usize,
    pub(crate) len: usize,
}

impl<'a> RawVector<'a> {
    /// Reads the length prefix at `pos`. A length that is not a multiple of `stride`
    /// truncates.
    #[inline]
    pub(crate) fn new(buf: ByteBuffer<'a>, pos: usize, stride: usize) -> Self {
        let byte_len = buf.read::<u32>(pos) as usize;
        RawVector {
            buf,
            start: pos + SIZE_UOFFSET,
            len: byte_len / stride,
        }
    }

    /// Absolute position of the element an offset slot points to.
    #[inline]
    pub(crate) fn target(&self, index: usize) -> usize {
        self.buf.indirect(self.start + index * SIZE_UOFFSET)
    }
}

macro_rules! impl_view_traits {
    ($($name:ident),* $(,)?) => {
        $(
            impl<T> Clone for $name<'_, T> {
                fn clone(&self) -> Self {
                    *self
                }
            }

            impl<T> Copy for $name<'_, T> {}

            impl<T> fmt::Debug for $name<'_, T> {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.debug_struct(stringify!($name))
                        .field("start", &self.raw.start)
                        .field("len", &self.raw.len)
                        .finish()
                }
            }

            impl<'a, T> $name<'a, T> {
                pub fn buffer(&self) -> ByteBuffer<'a> {
                    self.raw.buf
                }

                /// Absolute position of the first element.
                pub fn start(&self) -> usize {
                    self.raw.start
                }
            }
        )*
    };
}

impl_view_traits!(ScalarVector, EnumVector, StructVector, TableVector, VectorVector);

/// A vector of fixed-width scalars.
pub struct ScalarVector<'a, T> {
    raw: RawVector<'a>,
    _element: PhantomData<fn() -> T>,
}

pub type BoolVector<'a> = ScalarVector<'a, bool>;

impl<'a, T: Scalar> ScalarVector<'a, T> {
    /// The raw little-endian payload.
    pub fn as_bytes(&self) -> &'a [u8] {
        self.raw.buf.slice(self.raw.start, self.raw.len * T::SIZE)
    }

    /// Clones one scalar at a time instead of copying the payload in bulk.
    ///
    /// The output is byte-identical to [`clone_to`](VectorView::clone_to), which should be
    /// preferred. This path exists as a reference for it.
    pub fn clone_elementwise(&self, builder: &mut Builder) -> Result<VectorOffset> {
        clone::clone_scalars_elementwise(builder, self)
    }
}

impl<T: Scalar> Collection for ScalarVector<'_, T> {
    type Item = T;

    #[inline]
    fn len(&self) -> usize {
        self.raw.len
    }

    #[inline]
    fn get(&self, index: usize) -> T {
        self.raw.buf.read::<T>(self.raw.start + index * T::SIZE)
    }
}

impl<'a, T: Scalar> VectorView<'a> for ScalarVector<'a, T> {
    fn init(buf: ByteBuffer<'a>, pos: usize) -> Self {
        ScalarVector {
            raw: RawVector::new(buf, pos, T::SIZE),
            _element: PhantomData,
        }
    }

    fn clone_to(&self, builder: &mut Builder) -> Result<VectorOffset> {
        clone::clone_inline(builder, self.raw, T::SIZE, T::SIZE)
    }
}

/// A vector of enum discriminants, stored as their scalar representation.
pub struct EnumVector<'a, E> {
    raw: RawVector<'a>,
    _element: PhantomData<fn() -> E>,
}

impl<'a, E: FlatEnum> EnumVector<'a, E> {
    pub(crate) fn from_raw(raw: RawVector<'a>) -> Self {
        EnumVector {
            raw,
            _element: PhantomData,
        }
    }

    /// The same payload viewed as raw discriminant values.
    pub fn as_scalars(&self) -> ScalarVector<'a, E::Repr> {
        ScalarVector {
            raw: self.raw,
            _element: PhantomData,
        }
    }
}

impl<E: FlatEnum> Collection for EnumVector<'_, E> {
    type Item = E;

    #[inline]
    fn len(&self) -> usize {
        self.raw.len
    }

    #[inline]
    fn get(&self, index: usize) -> E {
        let stride = <E::Repr as Scalar>::SIZE;
        E::from_repr(self.raw.buf.read(self.raw.start + index * stride))
    }
}

impl<'a, E: FlatEnum> VectorView<'a> for EnumVector<'a, E> {
    fn init(buf: ByteBuffer<'a>, pos: usize) -> Self {
        Self::from_raw(RawVector::new(buf, pos, <E::Repr as Scalar>::SIZE))
    }

    fn clone_to(&self, builder: &mut Builder) -> Result<VectorOffset> {
        let size = <E::Repr as Scalar>::SIZE;
        clone::clone_inline(builder, self.raw, size, size)
    }
}

/// A vector of fixed-size structs stored inline.
pub struct StructVector<'a, S> {
    raw: RawVector<'a>,
    _element: PhantomData<fn() -> S>,
}

impl<'a, S: InlineStruct<'a>> Collection for StructVector<'a, S> {
    type Item = S;

    #[inline]
    fn len(&self) -> usize {
        self.raw.len
    }

    #[inline]
    fn get(&self, index: usize) -> S {
        S::init(self.raw.buf, self.raw.start + index * S::SIZE)
    }
}

impl<'a, S: InlineStruct<'a>> VectorView<'a> for StructVector<'a, S> {
    fn init(buf: ByteBuffer<'a>, pos: usize) -> Self {
        StructVector {
            raw: RawVector::new(buf, pos, S::SIZE),
            _element: PhantomData,
        }
    }

    fn clone_to(&self, builder: &mut Builder) -> Result<VectorOffset> {
        clone::clone_inline(builder, self.raw, S::SIZE, S::ALIGN)
    }
}

/// A vector of strings.
#[derive(Clone, Copy, Debug)]
pub struct StringVector<'a> {
    raw: RawVector<'a>,
}

impl<'a> StringVector<'a> {
    pub fn buffer(&self) -> ByteBuffer<'a> {
        self.raw.buf
    }

    /// Absolute position of the length prefix of string `index`.
    pub fn position(&self, index: usize) -> usize {
        self.raw.target(index)
    }

    /// The undecoded bytes of string `index`.
    pub fn get_bytes(&self, index: usize) -> &'a [u8] {
        self.raw.buf.string_bytes(self.position(index))
    }
}

impl<'a> Collection for StringVector<'a> {
    type Item = Cow<'a, str>;

    #[inline]
    fn len(&self) -> usize {
        self.raw.len
    }

    #[inline]
    fn get(&self, index: usize) -> Cow<'a, str> {
        self.raw.buf.string(self.position(index))
    }
}

impl<'a> VectorView<'a> for StringVector<'a> {
    fn init(buf: ByteBuffer<'a>, pos: usize) -> Self {
        StringVector {
            raw: RawVector::new(buf, pos, SIZE_UOFFSET),
        }
    }

    fn clone_to(&self, builder: &mut Builder) -> Result<VectorOffset> {
        let buf = self.raw.buf;
        clone::clone_offsets(builder, self.raw.len, "string", |builder, index| {
            let offset = builder.clone_string(buf, self.position(index))?;
            Ok(offset.value())
        })
    }
}

/// A vector of tables.
pub struct TableVector<'a, T> {
    raw: RawVector<'a>,
    _element: PhantomData<fn() -> T>,
}

impl<'a, T: TableView<'a>> Collection for TableVector<'a, T> {
    type Item = T;

    #[inline]
    fn len(&self) -> usize {
        self.raw.len
    }

    #[inline]
    fn get(&self, index: usize) -> T {
        T::init(self.raw.buf, self.raw.target(index))
    }
}

impl<'a, T: TableView<'a>> VectorView<'a> for TableVector<'a, T> {
    fn init(buf: ByteBuffer<'a>, pos: usize) -> Self {
        TableVector {
            raw: RawVector::new(buf, pos, SIZE_UOFFSET),
            _element: PhantomData,
        }
    }

    fn clone_to(&self, builder: &mut Builder) -> Result<VectorOffset> {
        clone::clone_collection(builder, self, "table", |builder, table| {
            Ok(table.clone_to(builder)?.value())
        })
    }
}

/// A vector of vectors.
pub struct VectorVector<'a, V> {
    raw: RawVector<'a>,
    _element: PhantomData<fn() -> V>,
}

impl<'a, V: VectorView<'a>> Collection for VectorVector<'a, V> {
    type Item = V;

    #[inline]
    fn len(&self) -> usize {
        self.raw.len
    }

    #[inline]
    fn get(&self, index: usize) -> V {
        V::init(self.raw.buf, self.raw.target(index))
    }
}

impl<'a, V: VectorView<'a>> VectorView<'a> for VectorVector<'a, V> {
    fn init(buf: ByteBuffer<'a>, pos: usize) -> Self {
        VectorVector {
            raw: RawVector::new(buf, pos, SIZE_UOFFSET),
            _element: PhantomData,
        }
    }

    fn clone_to(&self, builder: &mut Builder) -> Result<VectorOffset> {
        clone::clone_collection(builder, self, "vector", |builder, inner| {
            Ok(inner.clone_to(builder)?.value())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bytes_with_prefix(byte_len: u32, payload: &[u8]) -> Vec<u8> {
        let mut bytes = byte_len.to_le_bytes().to_vec();
        bytes.extend_from_slice(payload);
        bytes
    }

    #[test]
    fn test_scalar_vector_reads_in_place() {
        let mut payload = Vec::new();
        for v in [10i32, 20, 30] {
            payload.extend_from_slice(&v.to_le_bytes());
        }
        let bytes = bytes_with_prefix(12, &payload);
        let view = ScalarVector::<i32>::init(ByteBuffer::new(&bytes), 0);

        assert_eq!(view.len(), 3);
        assert_eq!(view.get(0), 10);
        assert_eq!(view.get(2), 30);
        assert_eq!(view.start(), 4);
        assert_eq!(view.as_bytes(), &payload[..]);
    }

    #[test]
    fn test_malformed_length_truncates() {
        let bytes = bytes_with_prefix(7, &[1, 0, 0, 0, 2, 0, 0]);
        let view = ScalarVector::<u32>::init(ByteBuffer::new(&bytes), 0);
        assert_eq!(view.len(), 1);
        assert_eq!(view.try_get(1), None);
    }

    #[test]
    fn test_bool_vector_stride_one() {
        let bytes = bytes_with_prefix(3, &[1, 0, 1]);
        let view = BoolVector::init(ByteBuffer::new(&bytes), 0);
        assert_eq!(view.iter().collect::<Vec<_>>(), vec![true, false, true]);
    }

    #[test]
    fn test_string_vector_follows_relative_offsets() {
        // [len=8][slot0 -> "hi"][slot1 -> ""]["hi"][""]
        let mut bytes = bytes_with_prefix(8, &[]);
        bytes.extend_from_slice(&8u32.to_le_bytes()); // slot at 4 -> 12
        bytes.extend_from_slice(&10u32.to_le_bytes()); // slot at 8 -> 18
        bytes.extend_from_slice(&2u32.to_le_bytes());
        bytes.extend_from_slice(b"hi");
        bytes.extend_from_slice(&0u32.to_le_bytes());

        let view = StringVector::init(ByteBuffer::new(&bytes), 0);
        assert_eq!(view.len(), 2);
        assert_eq!(view.get(0), "hi");
        assert_eq!(view.get(1), "");
        assert_eq!(view.get_bytes(0), b"hi");
    }

    #[test]
    fn test_empty_vector() {
        let bytes = bytes_with_prefix(0, &[]);
        let view = StringVector::init(ByteBuffer::new(&bytes), 0);
        assert!(view.is_empty());
        assert_eq!(view.iter().count(), 0);
    }
}
