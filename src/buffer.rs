//! Borrowed little-endian reader over a finished buffer.
//!
//! [`ByteBuffer`] is the only thing every view holds on to. It is `Copy`, borrows the bytes
//! for `'a`, and never allocates. Reads are bounds-checked by slice indexing: a position past
//! the end panics rather than returning garbage.

use crate::format::SIZE_UOFFSET;
use std::borrow::Cow;
use std::fmt;
use std::mem::size_of;

/// A fixed-width value that can be stored inline in a buffer.
///
/// Implemented for all primitive integers up to 64 bits, `f32`, `f64` and `bool`. The
/// stride of a scalar vector is `SIZE`, and scalars are aligned to their own size.
pub trait Scalar: Copy + PartialEq + Default + fmt::Debug {
    /// Encoded width in bytes.
    const SIZE: usize;

    /// Decodes a value from the first `SIZE` bytes of `bytes`.
    fn read_le(bytes: &[u8]) -> Self;

    /// Encodes the value into the first `SIZE` bytes of `out`.
    fn write_le(self, out: &mut [u8]);
}

macro_rules! impl_scalar {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Scalar for $ty {
                const SIZE: usize = size_of::<$ty>();

                #[inline]
                fn read_le(bytes: &[u8]) -> Self {
                    let mut raw = [0u8; size_of::<$ty>()];
                    raw.copy_from_slice(&bytes[..Self::SIZE]);
                    <$ty>::from_le_bytes(raw)
                }

                #[inline]
                fn write_le(self, out: &mut [u8]) {
                    out[..Self::SIZE].copy_from_slice(&self.to_le_bytes());
                }
            }
        )*
    };
}

impl_scalar!(i8, u8, i16, u16, i32, u32, i64, u64, f32, f64);

impl Scalar for bool {
    const SIZE: usize = 1;

    #[inline]
    fn read_le(bytes: &[u8]) -> Self {
        bytes[0] != 0
    }

    #[inline]
    fn write_le(self, out: &mut [u8]) {
        out[0] = u8::from(self);
    }
}

/// A borrowed view of a finished buffer.
///
/// # Examples
///
/// ```rust
/// use flatview::ByteBuffer;
///
/// let bytes = [0x2a, 0x00, 0x00, 0x00, 0xff];
/// let buf = ByteBuffer::new(&bytes);
/// assert_eq!(buf.read::<i32>(0), 42);
/// assert_eq!(buf.read::<i8>(4), -1);
/// ```
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct ByteBuffer<'a> {
    bytes: &'a [u8],
}

impl<'a> ByteBuffer<'a> {
    #[must_use]
    pub const fn new(bytes: &'a [u8]) -> Self {
        ByteBuffer { bytes }
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.bytes.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    #[must_use]
    pub const fn as_slice(&self) -> &'a [u8] {
        self.bytes
    }

    /// Reads a scalar at an absolute position.
    #[inline]
    #[must_use]
    pub fn read<T: Scalar>(&self, pos: usize) -> T {
        T::read_le(&self.bytes[pos..pos + T::SIZE])
    }

    /// Follows the relative offset stored at `slot` and returns the absolute target position.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use flatview::ByteBuffer;
    ///
    /// // The offset at position 4 points 8 bytes forward, to position 12.
    /// let mut bytes = [0u8; 16];
    /// bytes[4..8].copy_from_slice(&8i32.to_le_bytes());
    /// assert_eq!(ByteBuffer::new(&bytes).indirect(4), 12);
    /// ```
    #[inline]
    #[must_use]
    pub fn indirect(&self, slot: usize) -> usize {
        let relative = self.read::<i32>(slot);
        slot.wrapping_add_signed(relative as isize)
    }

    /// Returns `len` bytes starting at `pos`.
    #[inline]
    #[must_use]
    pub fn slice(&self, pos: usize, len: usize) -> &'a [u8] {
        &self.bytes[pos..pos + len]
    }

    /// Returns the payload of the length-prefixed byte run whose prefix is at `pos`.
    #[inline]
    #[must_use]
    pub fn string_bytes(&self, pos: usize) -> &'a [u8] {
        let len = self.read::<u32>(pos) as usize;
        self.slice(pos + SIZE_UOFFSET, len)
    }

    /// Decodes the length-prefixed string at `pos`.
    ///
    /// Valid UTF-8 is borrowed straight from the buffer; invalid sequences are replaced with
    /// `U+FFFD` in an owned copy.
    #[inline]
    #[must_use]
    pub fn string(&self, pos: usize) -> Cow<'a, str> {
        String::from_utf8_lossy(self.string_bytes(pos))
    }
}

impl fmt::Debug for ByteBuffer<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ByteBuffer")
            .field("len", &self.bytes.len())
            .finish()
    }
}

impl<'a> From<&'a [u8]> for ByteBuffer<'a> {
    fn from(bytes: &'a [u8]) -> Self {
        ByteBuffer::new(bytes)
    }
}
