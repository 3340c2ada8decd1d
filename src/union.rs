//! Tagged unions and vectors of unions.
//!
//! A union is a discriminant plus a table offset. Resolving it to a table type is unchecked:
//! [`Union::resolve`] builds whatever view it is asked for at the stored position. Callers
//! that cannot trust the discriminant use [`Union::try_resolve`].
//!
//! Schemas wrap unions in a [`UnionValue`] type, which knows how to clone each variant. A
//! vector of unions is two index-aligned vectors: one of discriminants and one of offsets.
//!
//! ## Examples
//!
//! ```rust
//! use flatview::{Builder, ByteBuffer, Error, Result, Table, TableOffset, TableView, Union};
//!
//! flatview::flat_enum! {
//!     pub struct Any: u8 {
//!         NONE = 0,
//!         Empty = 1,
//!     }
//! }
//!
//! struct Empty<'a>(Table<'a>);
//!
//! impl<'a> TableView<'a> for Empty<'a> {
//!     fn init(buf: ByteBuffer<'a>, pos: usize) -> Self {
//!         Empty(Table::new(buf, pos))
//!     }
//!
//!     fn clone_to(&self, builder: &mut Builder) -> Result<TableOffset> {
//!         builder.start_table()?;
//!         builder.end_table()
//!     }
//! }
//!
//! let mut builder = Builder::new();
//! builder.start_table().unwrap();
//! let table = builder.end_table().unwrap();
//! let bytes = builder.finish(table).unwrap();
//!
//! let buf = ByteBuffer::new(bytes);
//! let union = Union::new(Any::Empty, buf.indirect(0), buf);
//! assert!(union.try_resolve::<Empty>(Any::Empty).is_ok());
//! assert!(matches!(
//!     union.try_resolve::<Empty>(Any::NONE),
//!     Err(Error::UnionTypeMismatch { .. })
//! ));
//! ```

use crate::buffer::{ByteBuffer, Scalar};
use crate::builder::Builder;
use crate::clone;
use crate::collection::Collection;
use crate::format::SIZE_UOFFSET;
use crate::offset::VectorOffset;
use crate::table::TableView;
use crate::vector::{EnumVector, RawVector, VectorView};
use crate::{Error, Result};
use std::fmt;
use std::marker::PhantomData;

/// A discriminant stored as a fixed-width scalar.
///
/// Usually generated with [`flat_enum!`](crate::flat_enum). Plain integers implement it too.
pub trait FlatEnum: Copy + PartialEq + fmt::Debug {
    type Repr: Scalar;

    fn from_repr(repr: Self::Repr) -> Self;

    fn to_repr(self) -> Self::Repr;

    /// Whether this is the `NONE` discriminant, stored as zero.
    fn is_none(self) -> bool {
        self.to_repr() == Self::Repr::default()
    }
}

macro_rules! impl_flat_enum_for_int {
    ($($ty:ty),*) => {
        $(
            impl FlatEnum for $ty {
                type Repr = $ty;

                #[inline]
                fn from_repr(repr: $ty) -> Self {
                    repr
                }

                #[inline]
                fn to_repr(self) -> $ty {
                    self
                }
            }
        )*
    };
}

impl_flat_enum_for_int!(i8, u8, i16, u16, i32, u32, i64, u64);

/// A discriminant and the position of the table it selects.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Union<'a, E> {
    kind: E,
    pos: usize,
    buf: ByteBuffer<'a>,
}

impl<'a, E: FlatEnum> Union<'a, E> {
    pub fn new(kind: E, pos: usize, buf: ByteBuffer<'a>) -> Self {
        Union { kind, pos, buf }
    }

    pub fn kind(&self) -> E {
        self.kind
    }

    /// Absolute position of the selected table.
    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn buffer(&self) -> ByteBuffer<'a> {
        self.buf
    }

    /// Views the value as `T` without looking at the discriminant.
    #[inline]
    pub fn resolve<T: TableView<'a>>(&self) -> T {
        T::init(self.buf, self.pos)
    }

    /// Views the value as `T` after checking the discriminant is `expected`.
    pub fn try_resolve<T: TableView<'a>>(&self, expected: E) -> Result<T> {
        if self.kind != expected {
            return Err(Error::union_mismatch(expected, self.kind));
        }
        Ok(self.resolve())
    }
}

/// A schema's union type: one variant per table the discriminant can select.
pub trait UnionValue<'a>: Sized {
    type Kind: FlatEnum;

    /// Creates the value for discriminant `kind` with its table at `pos`.
    fn init(kind: Self::Kind, pos: usize, buf: ByteBuffer<'a>) -> Self;

    fn kind(&self) -> Self::Kind;

    /// Deep-copies the selected table and returns its offset, or 0 for `NONE`.
    fn clone_to(&self, builder: &mut Builder) -> Result<u32>;
}

/// A vector of unions: a discriminant vector and an offset vector of the same length.
pub struct UnionVector<'a, U> {
    kinds: RawVector<'a>,
    values: RawVector<'a>,
    _value: PhantomData<fn() -> U>,
}

impl<U> Clone for UnionVector<'_, U> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<U> Copy for UnionVector<'_, U> {}

impl<U> fmt::Debug for UnionVector<'_, U> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UnionVector")
            .field("kinds", &self.kinds.start)
            .field("values", &self.values.start)
            .field("len", &self.kinds.len)
            .finish()
    }
}

impl<'a, U: UnionValue<'a>> UnionVector<'a, U> {
    /// Creates a view from the positions of the discriminant vector and the offset vector.
    pub fn init(buf: ByteBuffer<'a>, kinds_pos: usize, values_pos: usize) -> Self {
        let stride = <<U::Kind as FlatEnum>::Repr as Scalar>::SIZE;
        UnionVector {
            kinds: RawVector::new(buf, kinds_pos, stride),
            values: RawVector::new(buf, values_pos, SIZE_UOFFSET),
            _value: PhantomData,
        }
    }

    /// The discriminant vector.
    pub fn kinds(&self) -> EnumVector<'a, U::Kind> {
        EnumVector::from_raw(self.kinds)
    }

    /// Element `index` as an untyped union.
    pub fn union(&self, index: usize) -> Union<'a, U::Kind> {
        Union::new(
            self.kinds().get(index),
            self.values.target(index),
            self.values.buf,
        )
    }

    /// Deep-copies every selected table and returns the new offset vector.
    ///
    /// A `NONE` element still gets an offset slot, which must not be followed when read back.
    pub fn clone_to(&self, builder: &mut Builder) -> Result<VectorOffset> {
        clone::clone_collection(builder, self, "union", |builder, value| value.clone_to(builder))
    }

    /// Copies the discriminant vector.
    pub fn clone_kinds_to(&self, builder: &mut Builder) -> Result<VectorOffset> {
        self.kinds().clone_to(builder)
    }
}

impl<'a, U: UnionValue<'a>> Collection for UnionVector<'a, U> {
    type Item = U;

    #[inline]
    fn len(&self) -> usize {
        self.kinds.len
    }

    fn get(&self, index: usize) -> U {
        let union = self.union(index);
        U::init(union.kind(), union.position(), union.buffer())
    }
}
