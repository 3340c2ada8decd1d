//! Table access and the contracts schema types implement.
//!
//! A table starts with a signed offset back to its vtable. The vtable lists, per field, the
//! field's distance from the table start, or 0 when the field is absent:
//!
//! ```text
//! vtable:  [vtable len: u16][object size: u16][field 0: u16][field 1: u16]...
//! table:   [soffset to vtable: i32][field data...]
//! ```
//!
//! [`Table`] is the untyped accessor. Schema types wrap it and implement [`TableView`]; their
//! `clone_to` bodies use the `clone_*_field` helpers to copy children before opening the new
//! table.
//!
//! ## Examples
//!
//! ```rust
//! use flatview::format::field_voffset;
//! use flatview::{Builder, ByteBuffer, Result, Table, TableOffset, TableView};
//!
//! struct Monster<'a>(Table<'a>);
//!
//! impl<'a> Monster<'a> {
//!     const NAME: u16 = field_voffset(0);
//!     const HP: u16 = field_voffset(1);
//!
//!     fn name(&self) -> Option<std::borrow::Cow<'a, str>> {
//!         self.0.string(Self::NAME)
//!     }
//!
//!     fn hp(&self) -> i16 {
//!         self.0.get(Self::HP, 100)
//!     }
//! }
//!
//! impl<'a> TableView<'a> for Monster<'a> {
//!     fn init(buf: ByteBuffer<'a>, pos: usize) -> Self {
//!         Monster(Table::new(buf, pos))
//!     }
//!
//!     fn clone_to(&self, builder: &mut Builder) -> Result<TableOffset> {
//!         let name = self.0.clone_string_field(builder, Self::NAME)?;
//!         builder.start_table()?;
//!         if let Some(name) = name {
//!             builder.add_offset_field(Self::NAME, name)?;
//!         }
//!         builder.add_scalar(Self::HP, self.hp(), 100)?;
//!         builder.end_table()
//!     }
//! }
//!
//! let mut builder = Builder::new();
//! let name = builder.create_string("orc").unwrap();
//! builder.start_table().unwrap();
//! builder.add_offset_field(Monster::NAME, name).unwrap();
//! builder.add_scalar(Monster::HP, 80i16, 100).unwrap();
//! let monster = builder.end_table().unwrap();
//! let bytes = builder.finish(monster).unwrap();
//!
//! let orc: Monster = flatview::root_table(bytes);
//! assert_eq!(orc.name().as_deref(), Some("orc"));
//! assert_eq!(orc.hp(), 80);
//! ```

use crate::buffer::{ByteBuffer, Scalar};
use crate::builder::Builder;
use crate::format::{SOffset, VOffset, SIZE_VOFFSET};
use crate::offset::{StringOffset, TableOffset, VectorOffset};
use crate::union::{FlatEnum, Union, UnionValue, UnionVector};
use crate::vector::VectorView;
use crate::{Error, Result};
use std::borrow::Cow;

/// A table type that can be constructed at a position and cloned into a [`Builder`].
pub trait TableView<'a>: Sized {
    /// Creates a view over the table starting at `pos`.
    fn init(buf: ByteBuffer<'a>, pos: usize) -> Self;

    /// Deep-copies the table and everything it owns into `builder`.
    fn clone_to(&self, builder: &mut Builder) -> Result<TableOffset>;
}

/// A fixed-size struct stored inline, inside a table or a vector.
///
/// Inline structs hold no offsets, so the default `clone_to` copies their bytes as they are.
pub trait InlineStruct<'a>: Sized {
    /// Size in bytes, including trailing padding.
    const SIZE: usize;

    /// Alignment of the largest member.
    const ALIGN: usize;

    fn init(buf: ByteBuffer<'a>, pos: usize) -> Self;

    /// Buffer and position the struct was created at.
    fn location(&self) -> (ByteBuffer<'a>, usize);

    /// Copies the struct into `builder`. Add it to the open table right after this call.
    fn clone_to(&self, builder: &mut Builder) -> Result<u32> {
        let (buf, pos) = self.location();
        builder.clone_struct(buf, pos, Self::SIZE, Self::ALIGN)
    }
}

/// Untyped view over one table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Table<'a> {
    buf: ByteBuffer<'a>,
    pos: usize,
}

impl<'a> Table<'a> {
    #[inline]
    pub fn new(buf: ByteBuffer<'a>, pos: usize) -> Self {
        Table { buf, pos }
    }

    pub fn buffer(&self) -> ByteBuffer<'a> {
        self.buf
    }

    /// Absolute position of the table start.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Distance of a field from the table start, or 0 when the field is absent.
    ///
    /// Fields past the end of the vtable are absent; this is how tables written with an
    /// older, shorter schema are read.
    pub fn field_offset(&self, voffset: VOffset) -> usize {
        let relative = self.buf.read::<SOffset>(self.pos);
        let vtable = self.pos.wrapping_add_signed(-(relative as isize));
        let vtable_len = self.buf.read::<u16>(vtable) as usize;
        let voffset = voffset as usize;
        if voffset + SIZE_VOFFSET <= vtable_len {
            self.buf.read::<u16>(vtable + voffset) as usize
        } else {
            0
        }
    }

    #[inline]
    fn field_position(&self, voffset: VOffset) -> Option<usize> {
        match self.field_offset(voffset) {
            0 => None,
            offset => Some(self.pos + offset),
        }
    }

    /// Absolute position of the object an offset field points to.
    #[inline]
    fn indirect_field(&self, voffset: VOffset) -> Option<usize> {
        self.field_position(voffset)
            .map(|slot| self.buf.indirect(slot))
    }

    /// Scalar field, or `default` when absent.
    pub fn get<T: Scalar>(&self, voffset: VOffset, default: T) -> T {
        self.field_position(voffset)
            .map_or(default, |pos| self.buf.read(pos))
    }

    pub fn string(&self, voffset: VOffset) -> Option<Cow<'a, str>> {
        self.indirect_field(voffset).map(|pos| self.buf.string(pos))
    }

    /// Raw bytes of a string field.
    pub fn string_bytes(&self, voffset: VOffset) -> Option<&'a [u8]> {
        self.indirect_field(voffset)
            .map(|pos| self.buf.string_bytes(pos))
    }

    pub fn vector<V: VectorView<'a>>(&self, voffset: VOffset) -> Option<V> {
        self.indirect_field(voffset).map(|pos| V::init(self.buf, pos))
    }

    pub fn table<T: TableView<'a>>(&self, voffset: VOffset) -> Option<T> {
        self.indirect_field(voffset).map(|pos| T::init(self.buf, pos))
    }

    /// Inline struct field. Structs are stored in the table itself, not behind an offset.
    pub fn inline_struct<S: InlineStruct<'a>>(&self, voffset: VOffset) -> Option<S> {
        self.field_position(voffset)
            .map(|pos| S::init(self.buf, pos))
    }

    /// Union field, stored as a discriminant field and a table offset field.
    ///
    /// Returns `None` when the value is absent, which is how a `NONE` union is written.
    pub fn union<E: FlatEnum>(
        &self,
        type_voffset: VOffset,
        value_voffset: VOffset,
    ) -> Option<Union<'a, E>> {
        let kind = E::from_repr(self.get(type_voffset, E::Repr::default()));
        self.indirect_field(value_voffset)
            .map(|pos| Union::new(kind, pos, self.buf))
    }

    /// Union field wrapped in its schema type.
    pub fn union_value<U: UnionValue<'a>>(
        &self,
        type_voffset: VOffset,
        value_voffset: VOffset,
    ) -> Option<U> {
        self.union::<U::Kind>(type_voffset, value_voffset)
            .map(|u| U::init(u.kind(), u.position(), self.buf))
    }

    /// Vector-of-unions field. Both the discriminant vector and the value vector must be present.
    pub fn union_vector<U: UnionValue<'a>>(
        &self,
        type_voffset: VOffset,
        value_voffset: VOffset,
    ) -> Option<UnionVector<'a, U>> {
        let kinds = self.indirect_field(type_voffset)?;
        let values = self.indirect_field(value_voffset)?;
        Some(UnionVector::init(self.buf, kinds, values))
    }

    pub fn clone_string_field(
        &self,
        builder: &mut Builder,
        voffset: VOffset,
    ) -> Result<Option<StringOffset>> {
        self.indirect_field(voffset)
            .map(|pos| builder.clone_string(self.buf, pos))
            .transpose()
    }

    pub fn clone_vector_field<V: VectorView<'a>>(
        &self,
        builder: &mut Builder,
        voffset: VOffset,
    ) -> Result<Option<VectorOffset>> {
        self.vector::<V>(voffset)
            .map(|vector| vector.clone_to(builder))
            .transpose()
    }

    /// Clones a child table one level deeper.
    pub fn clone_table_field<T: TableView<'a>>(
        &self,
        builder: &mut Builder,
        voffset: VOffset,
    ) -> Result<Option<TableOffset>> {
        self.table::<T>(voffset)
            .map(|child| builder.descend(|builder| child.clone_to(builder)))
            .transpose()
    }

    /// Clones the value of a union field one level deeper. An absent union gives offset 0,
    /// which [`Builder::add_offset_field`] skips.
    pub fn clone_union_field<U: UnionValue<'a>>(
        &self,
        builder: &mut Builder,
        type_voffset: VOffset,
        value_voffset: VOffset,
    ) -> Result<u32> {
        match self.union_value::<U>(type_voffset, value_voffset) {
            Some(value) => builder.descend(|builder| value.clone_to(builder)),
            None => Ok(0),
        }
    }

    /// Clones a vector-of-unions field, returning the new discriminant and value vectors.
    pub fn clone_union_vector_field<U: UnionValue<'a>>(
        &self,
        builder: &mut Builder,
        type_voffset: VOffset,
        value_voffset: VOffset,
    ) -> Result<Option<(VectorOffset, VectorOffset)>> {
        let Some(vector) = self.union_vector::<U>(type_voffset, value_voffset) else {
            return Ok(None);
        };
        let kinds = vector.clone_kinds_to(builder)?;
        let values = vector.clone_to(builder)?;
        Ok(Some((kinds, values)))
    }
}

impl<'a> TableView<'a> for Table<'a> {
    fn init(buf: ByteBuffer<'a>, pos: usize) -> Self {
        Table::new(buf, pos)
    }

    /// Always fails: without a schema, offset fields cannot be told apart from scalars.
    fn clone_to(&self, _builder: &mut Builder) -> Result<TableOffset> {
        Err(Error::custom(
            "an untyped table cannot be cloned; implement TableView for the schema type",
        ))
    }
}
