//! Auto-growing big-endian binary writer.

use crate::BufferError;

/// A binary buffer writer that appends big-endian data to a growable buffer.
///
/// # Example
///
/// ```
/// use imod_buffers::Writer;
///
/// let mut writer = Writer::new();
/// let at = writer.len();
/// writer.u32(0);
/// writer.buf(b"body");
/// writer.patch_u32(at, 4);
/// assert_eq!(writer.flush(), vec![0, 0, 0, 4, b'b', b'o', b'd', b'y']);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Writer {
    uint8: Vec<u8>,
}

impl Writer {
    /// Creates an empty writer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty writer with room for `capacity` bytes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            uint8: Vec::with_capacity(capacity),
        }
    }

    /// Clears the buffer, keeping its allocation.
    pub fn reset(&mut self) {
        self.uint8.clear();
    }

    /// Number of bytes written so far.
    pub fn len(&self) -> usize {
        self.uint8.len()
    }

    /// Returns `true` if nothing has been written.
    pub fn is_empty(&self) -> bool {
        self.uint8.is_empty()
    }

    /// Borrows the bytes written so far.
    pub fn as_slice(&self) -> &[u8] {
        &self.uint8
    }

    /// Takes the written bytes, leaving the writer empty.
    pub fn flush(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.uint8)
    }

    #[inline]
    pub fn u8(&mut self, val: u8) {
        self.uint8.push(val);
    }

    #[inline]
    pub fn i8(&mut self, val: i8) {
        self.uint8.push(val as u8);
    }

    #[inline]
    pub fn u16(&mut self, val: u16) {
        self.uint8.extend_from_slice(&val.to_be_bytes());
    }

    #[inline]
    pub fn i16(&mut self, val: i16) {
        self.uint8.extend_from_slice(&val.to_be_bytes());
    }

    #[inline]
    pub fn u32(&mut self, val: u32) {
        self.uint8.extend_from_slice(&val.to_be_bytes());
    }

    #[inline]
    pub fn i32(&mut self, val: i32) {
        self.uint8.extend_from_slice(&val.to_be_bytes());
    }

    /// Writes the exact bit pattern of `val`.
    #[inline]
    pub fn f32(&mut self, val: f32) {
        self.u32(val.to_bits());
    }

    pub fn f32x3(&mut self, val: [f32; 3]) {
        for v in val {
            self.f32(v);
        }
    }

    /// Appends raw bytes.
    pub fn buf(&mut self, data: &[u8]) {
        self.uint8.extend_from_slice(data);
    }

    /// Writes `text` into a NUL-padded slot of `capacity` bytes.
    ///
    /// Text that fills the slot exactly is written without a terminator.
    pub fn fixed_str(&mut self, text: &str, capacity: usize) -> Result<(), BufferError> {
        let bytes = text.as_bytes();
        if bytes.len() > capacity {
            return Err(BufferError::Oversized {
                len: bytes.len(),
                capacity,
            });
        }
        self.buf(bytes);
        self.uint8.resize(self.uint8.len() + capacity - bytes.len(), 0);
        Ok(())
    }

    /// Overwrites four bytes at `at` with `val`, used to back-fill sizes.
    ///
    /// # Panics
    ///
    /// Panics if `at + 4` is past the bytes written so far.
    pub fn patch_u32(&mut self, at: usize, val: u32) {
        self.uint8[at..at + 4].copy_from_slice(&val.to_be_bytes());
    }
}
