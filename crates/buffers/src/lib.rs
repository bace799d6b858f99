//! Binary buffer utilities for IMOD model files.
//!
//! Every multi-byte quantity in an IMOD file is big-endian regardless of the
//! machine that wrote it, so both halves of this crate are fixed to that
//! byte order.
//!
//! # Overview
//!
//! - [`Reader`] - Reads binary data from a byte slice with cursor tracking
//! - [`Writer`] - Writes binary data to an auto-growing buffer
//!
//! # Example
//!
//! ```
//! use imod_buffers::{Reader, Writer};
//!
//! let mut writer = Writer::new();
//! writer.u8(0x01);
//! writer.i32(-2);
//! writer.fixed_str("hello", 8).unwrap();
//! let data = writer.flush();
//!
//! let mut reader = Reader::new(&data);
//! assert_eq!(reader.u8().unwrap(), 0x01);
//! assert_eq!(reader.i32().unwrap(), -2);
//! assert_eq!(&reader.array::<8>().unwrap()[..5], b"hello");
//! assert!(reader.u8().is_err());
//! ```

mod reader;
mod writer;

pub use reader::Reader;
pub use writer::Writer;

use thiserror::Error;

/// Error type for buffer operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BufferError {
    /// Attempted to read past the end of the buffer.
    #[error("end of buffer at offset {offset}: needed {needed} bytes, {available} available")]
    EndOfBuffer {
        offset: usize,
        needed: usize,
        available: usize,
    },
    /// A string does not fit in its fixed-width slot.
    #[error("{len} bytes do not fit in a {capacity}-byte field")]
    Oversized { len: usize, capacity: usize },
}
