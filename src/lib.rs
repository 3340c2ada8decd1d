//! # flatview
//!
//! Zero-copy views over offset-based binary buffers, and a clone engine that deep-copies
//! them into a fresh buffer.
//!
//! ## What is an offset-based buffer?
//!
//! The buffers this crate reads are laid out the way FlatBuffers lays them out: tables,
//! vectors and strings live in one contiguous byte array and refer to each other through
//! 4-byte relative offsets. Nothing is parsed up front. A view is a buffer reference plus a
//! position, and every element access decodes its bytes on demand.
//!
//! ## Key Features
//!
//! - **Zero-Copy Reads**: Views borrow the buffer and never allocate, except to repair invalid
//!   UTF-8 in strings
//! - **Typed Vectors**: Scalars, enums, inline structs, strings, tables, unions and nested
//!   vectors, each with its own view type
//! - **Deep Cloning**: Any view can be copied into a [`Builder`]; flat vectors are copied in
//!   one piece, offset-bearing ones element by element
//! - **Bounded Recursion**: Nested clones count against a configurable depth limit
//! - **No Unsafe Code**: Written entirely in safe Rust
//!
//! ## Quick Start
//!
//! ### Reading and cloning a vector
//!
//! ```rust
//! use flatview::{Builder, Collection, ScalarVector, VectorView};
//!
//! let mut builder = Builder::new();
//! builder.start_vector(4, 3, 4).unwrap();
//! for value in [30i32, 20, 10] {
//!     builder.push(value).unwrap();
//! }
//! let numbers = builder.end_vector().unwrap();
//! let bytes = builder.finish(numbers).unwrap();
//!
//! let view: ScalarVector<i32> = flatview::root_vector(bytes);
//! assert_eq!(view.len(), 3);
//! assert_eq!(view.get(0), 10);
//!
//! // Copy it into a buffer of its own
//! let copy = flatview::clone_vector(&view).unwrap();
//! let cloned: ScalarVector<i32> = flatview::root_vector(&copy);
//! assert_eq!(cloned.iter().collect::<Vec<_>>(), vec![10, 20, 30]);
//! ```
//!
//! ### Schema types
//!
//! Tables are read through [`Table`] and wrapped in schema types that implement
//! [`TableView`]. Union discriminants are declared with [`flat_enum!`] and union wrappers
//! implement [`UnionValue`]. See the [`table`] and [`union`] modules.
//!
//! ## Safety Guarantees
//!
//! - No `unsafe` code blocks
//! - Reads trust the lengths and offsets stored in the buffer; a malformed buffer can make an
//!   access panic, never read out of bounds
//! - Builder misuse is reported through [`Error`] rather than by corrupting the output
//!
//! ## Format
//!
//! The byte layout is described in [`format`].

pub mod buffer;
pub mod builder;
pub mod clone;
pub mod collection;
pub mod error;
pub mod format;
pub mod list;
pub mod macros;
pub mod offset;
pub mod options;
pub mod scratch;
pub mod table;
pub mod union;
pub mod vector;

pub use buffer::{ByteBuffer, Scalar};
pub use builder::Builder;
pub use clone::{clone_collection, clone_offsets};
pub use collection::{Collection, Iter};
pub use error::{Error, Result};
pub use list::ReadOnlyList;
pub use offset::{Offset, StringOffset, TableOffset, VectorOffset};
pub use options::BuilderOptions;
pub use scratch::ScratchPool;
pub use table::{InlineStruct, Table, TableView};
pub use union::{FlatEnum, Union, UnionValue, UnionVector};
pub use vector::{
    BoolVector, EnumVector, ScalarVector, StringVector, StructVector, TableVector, VectorVector,
    VectorView,
};

/// Returns the root table of a finished buffer.
///
/// The first four bytes of a finished buffer hold the offset of its root.
///
/// # Examples
///
/// ```rust
/// use flatview::format::field_voffset;
/// use flatview::{Builder, Table};
///
/// let mut builder = Builder::new();
/// builder.start_table().unwrap();
/// builder.add_scalar(field_voffset(0), 7u8, 0).unwrap();
/// let table = builder.end_table().unwrap();
/// let bytes = builder.finish(table).unwrap();
///
/// let root: Table = flatview::root_table(bytes);
/// assert_eq!(root.get::<u8>(field_voffset(0), 0), 7);
/// ```
#[must_use]
pub fn root_table<'a, T: TableView<'a>>(bytes: &'a [u8]) -> T {
    let buf = ByteBuffer::new(bytes);
    T::init(buf, buf.indirect(0))
}

/// Returns the root vector of a finished buffer.
#[must_use]
pub fn root_vector<'a, V: VectorView<'a>>(bytes: &'a [u8]) -> V {
    let buf = ByteBuffer::new(bytes);
    V::init(buf, buf.indirect(0))
}

/// Deep-copies a vector into a new finished buffer whose root is the copy.
///
/// # Errors
///
/// Returns an error if the clone exceeds the default depth limit or the buffer size limit.
pub fn clone_vector<'a, V: VectorView<'a>>(vector: &V) -> Result<Vec<u8>> {
    clone_vector_with_options(vector, BuilderOptions::default())
}

/// Deep-copies a vector into a new finished buffer built with custom options.
///
/// # Errors
///
/// Returns an error if the clone exceeds the configured depth limit or the buffer size limit.
pub fn clone_vector_with_options<'a, V: VectorView<'a>>(
    vector: &V,
    options: BuilderOptions,
) -> Result<Vec<u8>> {
    let mut builder = Builder::with_options(options);
    let root = vector.clone_to(&mut builder)?;
    builder.finish(root)?;
    builder.into_bytes()
}

/// Deep-copies a table into a new finished buffer whose root is the copy.
///
/// # Errors
///
/// Returns an error if the clone exceeds the default depth limit or the buffer size limit.
pub fn clone_table<'a, T: TableView<'a>>(table: &T) -> Result<Vec<u8>> {
    clone_table_with_options(table, BuilderOptions::default())
}

/// Deep-copies a table into a new finished buffer built with custom options.
///
/// # Errors
///
/// Returns an error if the clone exceeds the configured depth limit or the buffer size limit.
pub fn clone_table_with_options<'a, T: TableView<'a>>(
    table: &T,
    options: BuilderOptions,
) -> Result<Vec<u8>> {
    let mut builder = Builder::with_options(options);
    let root = builder.descend(|builder| table.clone_to(builder))?;
    builder.finish(root)?;
    builder.into_bytes()
}
