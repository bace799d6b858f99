//! Fixed-width text slots.

use std::fmt;

use imod_buffers::{Reader, Writer};

use crate::error::Result;

/// A string stored in a fixed `N`-byte slot.
///
/// The raw bytes are kept as read, so whatever follows the terminating NUL
/// survives a round trip untouched. [`FixedStr::as_str`] yields the text up
/// to the first NUL with trailing spaces removed.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct FixedStr<const N: usize> {
    bytes: [u8; N],
}

impl<const N: usize> FixedStr<N> {
    /// Capacity of the slot in bytes.
    pub const CAPACITY: usize = N;

    /// Builds a NUL-padded slot holding `text`.
    ///
    /// Fails with [`ImodError::OversizedField`](crate::ImodError::OversizedField)
    /// when `text` is longer than `N` bytes.
    pub fn new(text: &str) -> Result<Self> {
        let mut w = Writer::with_capacity(N);
        w.fixed_str(text, N)?;
        let mut bytes = [0u8; N];
        bytes.copy_from_slice(w.as_slice());
        Ok(Self { bytes })
    }

    /// Wraps raw slot bytes.
    pub fn from_bytes(bytes: [u8; N]) -> Self {
        Self { bytes }
    }

    pub fn as_bytes(&self) -> &[u8; N] {
        &self.bytes
    }

    /// The text content, lossily decoded as UTF-8.
    pub fn as_str(&self) -> String {
        let end = self.bytes.iter().position(|&b| b == 0).unwrap_or(N);
        String::from_utf8_lossy(&self.bytes[..end])
            .trim_end_matches(' ')
            .to_string()
    }

    /// Replaces the content with `text`, NUL-padding the remainder.
    pub fn set(&mut self, text: &str) -> Result<()> {
        *self = Self::new(text)?;
        Ok(())
    }

    pub(crate) fn read(r: &mut Reader<'_>) -> Result<Self> {
        Ok(Self { bytes: r.array()? })
    }

    pub(crate) fn write(&self, w: &mut Writer) {
        w.buf(&self.bytes);
    }
}

impl<const N: usize> Default for FixedStr<N> {
    fn default() -> Self {
        Self { bytes: [0u8; N] }
    }
}

impl<const N: usize> fmt::Debug for FixedStr<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.as_str())
    }
}

impl<const N: usize> fmt::Display for FixedStr<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_str())
    }
}
