//! Binary layout of flatview buffers.
//!
//! This module documents the byte layout the views read and the [`Builder`](crate::Builder)
//! writes, and holds the layout constants shared by both sides.
//!
//! # Overview
//!
//! A buffer is a contiguous little-endian byte sequence. Nothing in it is parsed up front:
//! readers hold `(buffer, position)` pairs and compute every value on demand.
//!
//! # Relative Offsets
//!
//! Any value that is not stored inline is reached through a 4-byte signed offset. The offset
//! is relative to the address of the slot that stores it:
//!
//! ```text
//! target = slot + read_i32(slot)
//! ```
//!
//! The buffer root is a relative offset stored at position 0.
//!
//! # Vectors
//!
//! ```text
//! +----------------+---------------------------------------+
//! | length (u32)   | elements                              |
//! +----------------+---------------------------------------+
//!                  ^ start = header + 4
//! ```
//!
//! The length prefix holds the payload size in bytes. Views derive their element count as
//! `length / stride`:
//!
//! | Element kind | Stride | Element address |
//! |--------------|--------|-----------------|
//! | `u8`, `i8`, `bool` | 1 | `start + i` |
//! | `u16`, `i16` | 2 | `start + 2 * i` |
//! | `u32`, `i32`, `f32` | 4 | `start + 4 * i` |
//! | `u64`, `i64`, `f64` | 8 | `start + 8 * i` |
//! | string, table, union, nested vector | 4 | `slot + read_i32(slot)` with `slot = start + 4 * i` |
//! | inline struct | `size_of(struct)` | `start + size * i` |
//!
//! A length that is not a multiple of the stride truncates the count by integer division.
//! This is tolerated, not reported.
//!
//! # Strings
//!
//! ```text
//! +----------------+---------------------+
//! | length (u32)   | UTF-8 bytes         |
//! +----------------+---------------------+
//! ```
//!
//! There is no terminator. Invalid UTF-8 decodes lossily.
//!
//! # Tables
//!
//! A table starts with a signed 4-byte offset to its vtable, stored as
//! `table_position - vtable_position`. The vtable is a run of `u16` values:
//!
//! ```text
//! [vtable_size][object_size][field_0][field_1]...
//! ```
//!
//! Field `n` lives at vtable offset `4 + 2 * n` (see [`field_voffset`]). A zero entry, or an
//! entry past `vtable_size`, means the field is absent and readers use its default.
//!
//! # Unions
//!
//! A union field is a pair of table fields: a discriminant scalar and a relative offset to a
//! table whose type the discriminant selects. A vector of unions is likewise a pair of
//! index-aligned vectors: one of discriminants, one of table offsets. Discriminant `0` is
//! reserved for "none".
//!
//! # Construction Order
//!
//! Buffers are written back to front. A child (string, table, vector) must be finished
//! before the parent that references it is opened, so relative offsets always point forward
//! to higher addresses.

/// Size of a relative offset (`uoffset`), also the stride of offset-bearing vectors.
pub const SIZE_UOFFSET: usize = 4;

/// Size of a vtable entry (`voffset`).
pub const SIZE_VOFFSET: usize = 2;

/// Size of the signed offset from a table to its vtable.
pub const SIZE_SOFFSET: usize = 4;

/// Length of an optional file identifier. Identifiers are not written by this crate.
pub const FILE_IDENTIFIER_LENGTH: usize = 4;

/// Largest buffer a [`Builder`](crate::Builder) will grow to.
pub const MAX_BUFFER_SIZE: usize = (1 << 31) - 1;

/// Vtable offset of a field.
pub type VOffset = u16;

/// Signed distance from a table to its vtable, stored at the table start.
pub type SOffset = i32;

/// Number of leading vtable entries that are not fields (vtable size and object size).
const VTABLE_METADATA_FIELDS: usize = 2;

/// Returns the vtable offset of the field with the given index.
///
/// # Examples
///
/// ```rust
/// use flatview::format::field_voffset;
///
/// assert_eq!(field_voffset(0), 4);
/// assert_eq!(field_voffset(3), 10);
/// ```
#[must_use]
pub const fn field_voffset(field: usize) -> VOffset {
    ((VTABLE_METADATA_FIELDS + field) * SIZE_VOFFSET) as VOffset
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_voffsets_skip_metadata() {
        assert_eq!(field_voffset(0), 4);
        assert_eq!(field_voffset(1), 6);
        assert_eq!(field_voffset(7), 18);
    }
}
