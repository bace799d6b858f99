//! IMOD codec error type.

use imod_buffers::BufferError;
use thiserror::Error;

use crate::chunk::ChunkTag;
use crate::mesh::MeshFault;

/// Error type for decoding and encoding IMOD model files.
///
/// Every variant is terminal for the call that produced it. Offsets are
/// absolute byte positions in the input (decode) or output (encode) buffer.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ImodError {
    #[error(
        "truncated input at offset {offset}{}: needed {needed} bytes, {available} available",
        chunk_suffix(.chunk)
    )]
    TruncatedInput {
        offset: usize,
        needed: usize,
        available: usize,
        chunk: Option<ChunkTag>,
    },
    #[error("bad magic {found:?}, expected \"IMOD\"")]
    BadMagic { found: [u8; 4] },
    #[error("malformed mesh index stream at offset {offset}: {fault}")]
    MalformedMesh { offset: usize, fault: MeshFault },
    #[error("mesh at offset {offset} has {values} face values for {triangles} triangles")]
    MeshValueCountMismatch {
        offset: usize,
        values: usize,
        triangles: usize,
    },
    #[error("mesh at offset {offset} has storage records that read back as face values")]
    AmbiguousMeshStorage { offset: usize },
    #[error("duplicate {tag} chunk at offset {offset}")]
    UnexpectedDuplicateChunk { tag: ChunkTag, offset: usize },
    #[error("{len} bytes do not fit in a {capacity}-byte field")]
    OversizedField { len: usize, capacity: usize },
    #[error("{tag} chunk at offset {offset} declares {size} bytes")]
    InvalidChunkSize {
        tag: ChunkTag,
        offset: usize,
        size: usize,
    },
    #[error("contour at offset {offset} has {sizes} point sizes for {points} points")]
    PointSizeCountMismatch {
        offset: usize,
        sizes: usize,
        points: usize,
    },
    #[error("invalid {what} count {count} at offset {offset}")]
    InvalidCount {
        what: &'static str,
        offset: usize,
        count: i64,
    },
    #[error("{tag} chunk at offset {offset} is not allowed here")]
    MisplacedChunk { tag: ChunkTag, offset: usize },
    #[error("header declares {declared} objects, file contains {found}")]
    ObjectCountMismatch { declared: usize, found: usize },
}

fn chunk_suffix(chunk: &Option<ChunkTag>) -> String {
    match chunk {
        Some(tag) => format!(" in {tag} chunk"),
        None => String::new(),
    }
}

impl ImodError {
    /// Attaches the enclosing chunk tag to a truncation error that has none.
    pub(crate) fn within(self, tag: ChunkTag) -> Self {
        match self {
            ImodError::TruncatedInput {
                offset,
                needed,
                available,
                chunk: None,
            } => ImodError::TruncatedInput {
                offset,
                needed,
                available,
                chunk: Some(tag),
            },
            other => other,
        }
    }
}

impl From<BufferError> for ImodError {
    fn from(err: BufferError) -> Self {
        match err {
            BufferError::EndOfBuffer {
                offset,
                needed,
                available,
            } => ImodError::TruncatedInput {
                offset,
                needed,
                available,
                chunk: None,
            },
            BufferError::Oversized { len, capacity } => ImodError::OversizedField { len, capacity },
        }
    }
}

pub type Result<T> = std::result::Result<T, ImodError>;

/// Converts a collection length to the `i32` the format stores.
pub(crate) fn count_to_i32(what: &'static str, offset: usize, len: usize) -> Result<i32> {
    i32::try_from(len).map_err(|_| ImodError::InvalidCount {
        what,
        offset,
        count: len as i64,
    })
}

/// Converts a stored `i32` count to a length, rejecting negatives.
pub(crate) fn count_from_i32(what: &'static str, offset: usize, count: i32) -> Result<usize> {
    usize::try_from(count).map_err(|_| ImodError::InvalidCount {
        what,
        offset,
        count: count as i64,
    })
}
