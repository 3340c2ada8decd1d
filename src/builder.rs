//! Back-to-front buffer construction.
//!
//! The [`Builder`] writes a buffer from its highest address toward its lowest. Every object
//! is finished before anything that refers to it is started, so the relative offsets it
//! writes always point forward. When the buffer runs out of room it doubles, copying the
//! written region to the back of the new allocation; offsets returned earlier stay valid
//! because they count from the end.
//!
//! The builder covers what reading and cloning need: strings, vectors of scalars and of
//! offsets, tables with scalar, offset and inline struct fields, and the finishing root
//! offset. It does not deduplicate vtables.
//!
//! ## Usage
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
//! assert_eq!(view.iter().collect::<Vec<_>>(), vec![10, 20, 30]);
//! ```

use crate::buffer::{ByteBuffer, Scalar};
use crate::format::{
    SOffset, VOffset, MAX_BUFFER_SIZE, SIZE_SOFFSET, SIZE_UOFFSET, SIZE_VOFFSET,
};
use crate::offset::{StringOffset, TableOffset, VectorOffset};
use crate::options::BuilderOptions;
use crate::scratch::ScratchPool;
use crate::{Error, Result};
use tracing::debug;

/// What the builder currently has open. Only one vector or table can be open at a time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Frame {
    Idle,
    Vector { element_size: usize, count: usize },
    Table { start: usize },
}

/// Writes a buffer back to front.
///
/// A builder is a single-writer resource: one clone (with its whole recursive descent) must
/// complete before another one starts on the same builder.
#[derive(Debug)]
pub struct Builder {
    bytes: Vec<u8>,
    head: usize,
    min_align: usize,
    frame: Frame,
    fields: Vec<(VOffset, usize)>,
    finished: bool,
    depth: usize,
    scratch: ScratchPool,
    options: BuilderOptions,
    limit: usize,
}

impl Default for Builder {
    fn default() -> Self {
        Self::new()
    }
}

impl Builder {
    #[must_use]
    pub fn new() -> Self {
        Self::with_options(BuilderOptions::default())
    }

    #[must_use]
    pub fn with_options(options: BuilderOptions) -> Self {
        let capacity = options.initial_capacity.clamp(1, MAX_BUFFER_SIZE);
        Builder {
            bytes: vec![0; capacity],
            head: capacity,
            min_align: 1,
            frame: Frame::Idle,
            fields: Vec::new(),
            finished: false,
            depth: 0,
            scratch: ScratchPool::new(),
            options,
            limit: MAX_BUFFER_SIZE,
        }
    }

    pub fn options(&self) -> &BuilderOptions {
        &self.options
    }

    /// Discards everything written so far, keeping the allocation and the scratch pool.
    pub fn reset(&mut self) {
        self.head = self.bytes.len();
        self.min_align = 1;
        self.frame = Frame::Idle;
        self.fields.clear();
        self.finished = false;
        self.depth = 0;
    }

    /// Current offset: the number of bytes written so far.
    #[must_use]
    pub fn offset(&self) -> u32 {
        self.used() as u32
    }

    /// Current clone nesting depth.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Number of scratch arrays currently checked out.
    #[must_use]
    pub fn scratch_outstanding(&self) -> usize {
        self.scratch.outstanding()
    }

    #[inline]
    fn used(&self) -> usize {
        self.bytes.len() - self.head
    }

    fn grow(&mut self) -> Result<()> {
        let old_len = self.bytes.len();
        let new_len = old_len.saturating_mul(2).min(self.limit);
        if new_len <= old_len {
            return Err(Error::BufferTooLarge {
                requested: old_len.saturating_mul(2),
            });
        }

        let mut grown = vec![0u8; new_len];
        grown[new_len - old_len..].copy_from_slice(&self.bytes);
        self.head += new_len - old_len;
        self.bytes = grown;
        debug!(old = old_len, new = new_len, "grew builder buffer");
        Ok(())
    }

    #[inline]
    fn pad(&mut self, n: usize) {
        self.bytes[self.head - n..self.head].fill(0);
        self.head -= n;
    }

    /// Makes room for `additional` bytes followed by a value of `size` bytes, padding so
    /// that the value ends up aligned to `size`. `size` must be a power of two.
    pub fn prep(&mut self, size: usize, additional: usize) -> Result<()> {
        if self.finished {
            return Err(Error::AlreadyFinished);
        }
        let size = size.max(1);
        if size > self.min_align {
            self.min_align = size;
        }

        let align = (!(self.used().wrapping_add(additional))).wrapping_add(1) & (size - 1);
        let needed = align
            .checked_add(size)
            .and_then(|n| n.checked_add(additional))
            .ok_or(Error::BufferTooLarge {
                requested: usize::MAX,
            })?;
        while self.head < needed {
            self.grow()?;
        }
        self.pad(align);
        Ok(())
    }

    #[inline]
    fn place<T: Scalar>(&mut self, value: T) {
        self.head -= T::SIZE;
        value.write_le(&mut self.bytes[self.head..]);
    }

    #[inline]
    fn place_bytes(&mut self, src: &[u8]) {
        self.head -= src.len();
        self.bytes[self.head..self.head + src.len()].copy_from_slice(src);
    }

    fn ensure_idle(&self, operation: &'static str) -> Result<()> {
        if self.finished {
            return Err(Error::AlreadyFinished);
        }
        match self.frame {
            Frame::Idle => Ok(()),
            _ => Err(Error::nested(operation)),
        }
    }

    fn ensure_table(&self, operation: &'static str) -> Result<()> {
        if self.finished {
            return Err(Error::AlreadyFinished);
        }
        match self.frame {
            Frame::Table { .. } => Ok(()),
            _ => Err(Error::not_nested(operation)),
        }
    }

    /// Writes an aligned scalar.
    pub fn push<T: Scalar>(&mut self, value: T) -> Result<()> {
        self.prep(T::SIZE, 0)?;
        self.place(value);
        Ok(())
    }

    /// Writes a relative offset pointing at an object finished earlier.
    pub fn add_offset(&mut self, offset: impl Into<u32>) -> Result<()> {
        let offset = offset.into();
        self.prep(SIZE_UOFFSET, 0)?;
        let here = self.offset();
        if offset > here {
            return Err(Error::custom(format!(
                "offset {} refers past the {} bytes written",
                offset, here
            )));
        }
        self.place(here - offset + SIZE_UOFFSET as u32);
        Ok(())
    }

    /// Opens a vector of `count` elements of `element_size` bytes each.
    ///
    /// Elements are then written highest index first, with [`push`](Self::push) or
    /// [`add_offset`](Self::add_offset), so that the finished vector reads in index order.
    pub fn start_vector(
        &mut self,
        element_size: usize,
        count: usize,
        alignment: usize,
    ) -> Result<()> {
        self.ensure_idle("start a vector")?;
        let payload = element_size
            .checked_mul(count)
            .ok_or(Error::BufferTooLarge {
                requested: usize::MAX,
            })?;
        self.prep(SIZE_UOFFSET, payload)?;
        self.prep(alignment, payload)?;
        self.frame = Frame::Vector {
            element_size,
            count,
        };
        Ok(())
    }

    /// Closes the open vector by writing its byte-length prefix.
    pub fn end_vector(&mut self) -> Result<VectorOffset> {
        if self.finished {
            return Err(Error::AlreadyFinished);
        }
        let (element_size, count) = match self.frame {
            Frame::Vector {
                element_size,
                count,
            } => (element_size, count),
            _ => return Err(Error::not_nested("end a vector")),
        };
        self.push((element_size * count) as u32)?;
        self.frame = Frame::Idle;
        Ok(VectorOffset::new(self.offset()))
    }

    /// Writes a length-prefixed string.
    pub fn create_string(&mut self, s: &str) -> Result<StringOffset> {
        self.create_byte_string(s.as_bytes())
    }

    /// Writes a length-prefixed byte run.
    pub fn create_byte_string(&mut self, bytes: &[u8]) -> Result<StringOffset> {
        self.ensure_idle("create a string")?;
        self.prep(SIZE_UOFFSET, bytes.len())?;
        self.place_bytes(bytes);
        self.place(bytes.len() as u32);
        Ok(StringOffset::new(self.offset()))
    }

    /// Copies the length-prefixed string at `pos` in `source` into this buffer.
    pub fn clone_string(&mut self, source: ByteBuffer<'_>, pos: usize) -> Result<StringOffset> {
        self.create_byte_string(source.string_bytes(pos))
    }

    /// Copies `count` inline elements starting at `start` in `source` as one new vector.
    ///
    /// Only valid for elements that carry no offsets: scalars and inline structs.
    pub fn clone_vector_data(
        &mut self,
        source: ByteBuffer<'_>,
        start: usize,
        element_size: usize,
        count: usize,
        alignment: usize,
    ) -> Result<VectorOffset> {
        self.start_vector(element_size, count, alignment)?;
        self.place_bytes(source.slice(start, element_size * count));
        self.end_vector()
    }

    /// Copies an inline struct of `size` bytes at `pos` in `source`. Call it right before
    /// [`add_struct_field`](Self::add_struct_field).
    pub fn clone_struct(
        &mut self,
        source: ByteBuffer<'_>,
        pos: usize,
        size: usize,
        alignment: usize,
    ) -> Result<u32> {
        self.prep(alignment, size)?;
        self.place_bytes(source.slice(pos, size));
        Ok(self.offset())
    }

    /// Opens a table. Strings, vectors and child tables it refers to must be written first.
    pub fn start_table(&mut self) -> Result<()> {
        self.ensure_idle("start a table")?;
        self.fields.clear();
        self.frame = Frame::Table { start: self.used() };
        Ok(())
    }

    #[inline]
    fn track_field(&mut self, voffset: VOffset) {
        let loc = self.used();
        self.fields.push((voffset, loc));
    }

    /// Adds a scalar field, skipped when it equals `default` unless
    /// [`force_defaults`](BuilderOptions::force_defaults) is set.
    pub fn add_scalar<T: Scalar>(&mut self, voffset: VOffset, value: T, default: T) -> Result<()> {
        self.ensure_table("add a table field")?;
        if value == default && !self.options.force_defaults {
            return Ok(());
        }
        self.push(value)?;
        self.track_field(voffset);
        Ok(())
    }

    /// Adds an offset field. A null offset leaves the field absent.
    pub fn add_offset_field(&mut self, voffset: VOffset, offset: impl Into<u32>) -> Result<()> {
        self.ensure_table("add a table field")?;
        let offset = offset.into();
        if offset == 0 {
            return Ok(());
        }
        self.add_offset(offset)?;
        self.track_field(voffset);
        Ok(())
    }

    /// Records an inline struct written immediately before this call.
    pub fn add_struct_field(&mut self, voffset: VOffset, offset: u32) -> Result<()> {
        self.ensure_table("add a table field")?;
        if offset == 0 {
            return Ok(());
        }
        if offset != self.offset() {
            return Err(Error::custom(
                "inline structs must be written immediately before their field is added",
            ));
        }
        self.track_field(voffset);
        Ok(())
    }

    /// Closes the open table and writes its vtable.
    pub fn end_table(&mut self) -> Result<TableOffset> {
        self.ensure_table("end a table")?;
        let start = match self.frame {
            Frame::Table { start } => start,
            _ => return Err(Error::not_nested("end a table")),
        };

        // Placeholder for the vtable offset, patched once the vtable is written.
        self.push::<SOffset>(0)?;
        let object = self.used();

        let max_voffset = self.fields.iter().map(|&(v, _)| v as usize).max().unwrap_or(0);
        let vtable_len = (max_voffset + SIZE_VOFFSET).max(2 * SIZE_VOFFSET);
        let mut vtable = vec![0u8; vtable_len];
        (vtable_len as u16).write_le(&mut vtable[0..]);
        ((object - start) as u16).write_le(&mut vtable[SIZE_VOFFSET..]);
        for &(voffset, loc) in &self.fields {
            ((object - loc) as u16).write_le(&mut vtable[voffset as usize..]);
        }

        self.prep(SIZE_VOFFSET, vtable_len)?;
        self.place_bytes(&vtable);
        let vtable_pos = self.used();

        let table_index = self.bytes.len() - object;
        ((vtable_pos - object) as SOffset)
            .write_le(&mut self.bytes[table_index..table_index + SIZE_SOFFSET]);

        self.fields.clear();
        self.frame = Frame::Idle;
        Ok(TableOffset::new(object as u32))
    }

    /// Writes the root offset and returns the finished buffer.
    pub fn finish(&mut self, root: impl Into<u32>) -> Result<&[u8]> {
        self.ensure_idle("finish the buffer")?;
        let min_align = self.min_align;
        self.prep(min_align, SIZE_UOFFSET)?;
        self.add_offset(root)?;
        self.finished = true;
        debug!(size = self.used(), "finished buffer");
        Ok(&self.bytes[self.head..])
    }

    /// Returns the finished buffer.
    pub fn finished_data(&self) -> Result<&[u8]> {
        if !self.finished {
            return Err(Error::NotFinished);
        }
        Ok(&self.bytes[self.head..])
    }

    /// Consumes the builder and returns the finished buffer as an owned vector.
    pub fn into_bytes(self) -> Result<Vec<u8>> {
        if !self.finished {
            return Err(Error::NotFinished);
        }
        let mut bytes = self.bytes;
        bytes.drain(..self.head);
        Ok(bytes)
    }

    /// Runs `f` with a scratch array of `len` zeroed slots from the builder's pool.
    ///
    /// The array goes back to the pool whether `f` succeeds or fails.
    pub fn with_scratch<R>(
        &mut self,
        len: usize,
        f: impl FnOnce(&mut Self, &mut [u32]) -> Result<R>,
    ) -> Result<R> {
        let mut array = self.scratch.checkout(len);
        let result = f(self, &mut array);
        self.scratch.release(array);
        result
    }

    /// Runs `f` one clone level deeper, failing once [`max_depth`](BuilderOptions::max_depth)
    /// levels are active.
    pub fn descend<R>(&mut self, f: impl FnOnce(&mut Self) -> Result<R>) -> Result<R> {
        let limit = self.options.max_depth;
        if self.depth >= limit {
            debug!(limit, "clone depth limit reached");
            return Err(Error::RecursionLimit { limit });
        }
        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        result
    }
}
