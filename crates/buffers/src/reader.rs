//! Binary buffer reader with cursor tracking.

use crate::BufferError;

/// A binary buffer reader that reads big-endian data from a byte slice.
///
/// The reader maintains a cursor position and an exclusive end. Every read
/// checks the remaining length first and fails with
/// [`BufferError::EndOfBuffer`] instead of panicking, so a truncated file can
/// never be half-parsed silently.
///
/// # Example
///
/// ```
/// use imod_buffers::Reader;
///
/// let data = [0x01, 0x02, 0x03, 0x04];
/// let mut reader = Reader::new(&data);
///
/// assert_eq!(reader.u8().unwrap(), 0x01);
/// assert_eq!(reader.u16().unwrap(), 0x0203);
/// assert!(reader.u16().is_err());
/// ```
#[derive(Debug, Clone)]
pub struct Reader<'a> {
    /// The underlying byte slice.
    pub uint8: &'a [u8],
    /// Current cursor position.
    pub x: usize,
    /// End position (exclusive).
    pub end: usize,
}

impl<'a> Reader<'a> {
    /// Creates a new reader for the given byte slice.
    pub fn new(uint8: &'a [u8]) -> Self {
        let end = uint8.len();
        Self { uint8, x: 0, end }
    }

    /// Creates a reader from a slice with custom start and end positions.
    pub fn from_slice(uint8: &'a [u8], x: usize, end: usize) -> Self {
        let end = end.min(uint8.len());
        Self {
            uint8,
            x: x.min(end),
            end,
        }
    }

    /// Resets the reader with a new byte slice.
    pub fn reset(&mut self, uint8: &'a [u8]) {
        self.x = 0;
        self.end = uint8.len();
        self.uint8 = uint8;
    }

    /// Returns the number of remaining bytes.
    pub fn size(&self) -> usize {
        self.end - self.x
    }

    /// Returns `true` when the cursor sits at the end.
    pub fn is_empty(&self) -> bool {
        self.x >= self.end
    }

    fn assert_size(&self, needed: usize) -> Result<(), BufferError> {
        if needed > self.size() {
            return Err(BufferError::EndOfBuffer {
                offset: self.x,
                needed,
                available: self.size(),
            });
        }
        Ok(())
    }

    /// Advances the cursor by the given number of bytes.
    pub fn skip(&mut self, length: usize) -> Result<(), BufferError> {
        self.assert_size(length)?;
        self.x += length;
        Ok(())
    }

    /// Returns the next `size` bytes without advancing the cursor.
    pub fn peek(&self, size: usize) -> Result<&'a [u8], BufferError> {
        self.assert_size(size)?;
        Ok(&self.uint8[self.x..self.x + size])
    }

    /// Returns a subarray of the given size and advances the cursor.
    pub fn buf(&mut self, size: usize) -> Result<&'a [u8], BufferError> {
        let bin = self.peek(size)?;
        self.x += size;
        Ok(bin)
    }

    /// Returns every remaining byte and moves the cursor to the end.
    pub fn rest(&mut self) -> &'a [u8] {
        let bin = &self.uint8[self.x..self.end];
        self.x = self.end;
        bin
    }

    /// Reads a fixed-size byte array.
    pub fn array<const N: usize>(&mut self) -> Result<[u8; N], BufferError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.buf(N)?);
        Ok(out)
    }

    /// Creates a new Reader over the next `size` bytes and advances the cursor.
    ///
    /// The sub-reader shares the underlying slice, so offsets reported by its
    /// errors are absolute positions in the original buffer.
    pub fn cut(&mut self, size: usize) -> Result<Reader<'a>, BufferError> {
        self.assert_size(size)?;
        let sub = Reader::from_slice(self.uint8, self.x, self.x + size);
        self.x += size;
        Ok(sub)
    }

    /// Reads an unsigned 8-bit integer.
    #[inline]
    pub fn u8(&mut self) -> Result<u8, BufferError> {
        Ok(self.array::<1>()?[0])
    }

    /// Reads a signed 8-bit integer.
    #[inline]
    pub fn i8(&mut self) -> Result<i8, BufferError> {
        Ok(self.array::<1>()?[0] as i8)
    }

    /// Reads an unsigned 16-bit integer (big-endian).
    #[inline]
    pub fn u16(&mut self) -> Result<u16, BufferError> {
        Ok(u16::from_be_bytes(self.array()?))
    }

    /// Reads a signed 16-bit integer (big-endian).
    #[inline]
    pub fn i16(&mut self) -> Result<i16, BufferError> {
        Ok(i16::from_be_bytes(self.array()?))
    }

    /// Reads an unsigned 32-bit integer (big-endian).
    #[inline]
    pub fn u32(&mut self) -> Result<u32, BufferError> {
        Ok(u32::from_be_bytes(self.array()?))
    }

    /// Reads a signed 32-bit integer (big-endian).
    #[inline]
    pub fn i32(&mut self) -> Result<i32, BufferError> {
        Ok(i32::from_be_bytes(self.array()?))
    }

    /// Reads a 32-bit floating point number (big-endian).
    ///
    /// The bit pattern is kept exactly, NaN payloads included.
    #[inline]
    pub fn f32(&mut self) -> Result<f32, BufferError> {
        Ok(f32::from_bits(self.u32()?))
    }

    /// Reads three consecutive `f32` values.
    pub fn f32x3(&mut self) -> Result<[f32; 3], BufferError> {
        Ok([self.f32()?, self.f32()?, self.f32()?])
    }

    /// Reads `count` triples of `f32`.
    ///
    /// The whole run is bounds-checked up front, so a bogus count from a
    /// corrupt header fails before anything is allocated.
    pub fn f32x3_seq(&mut self, count: usize) -> Result<Vec<[f32; 3]>, BufferError> {
        self.assert_size(count.saturating_mul(12))?;
        (0..count).map(|_| self.f32x3()).collect()
    }

    /// Reads `count` consecutive `f32` values.
    pub fn f32_seq(&mut self, count: usize) -> Result<Vec<f32>, BufferError> {
        self.assert_size(count.saturating_mul(4))?;
        (0..count).map(|_| self.f32()).collect()
    }

    /// Reads `count` consecutive `i32` values.
    pub fn i32_seq(&mut self, count: usize) -> Result<Vec<i32>, BufferError> {
        self.assert_size(count.saturating_mul(4))?;
        (0..count).map(|_| self.i32()).collect()
    }
}
