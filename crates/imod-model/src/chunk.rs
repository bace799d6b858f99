//! Chunk framing: four-byte tags, size-prefixed bodies and opaque chunks.

use std::fmt;

use imod_buffers::{Reader, Writer};

use crate::error::{ImodError, Result};

/// A four-byte ASCII chunk identifier.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChunkTag(pub [u8; 4]);

impl ChunkTag {
    /// Object header; fixed 176-byte body, no size field.
    pub const OBJT: ChunkTag = ChunkTag(*b"OBJT");
    /// Contour; fixed header plus point list, no size field.
    pub const CONT: ChunkTag = ChunkTag(*b"CONT");
    /// Mesh; fixed header plus vertex and index lists, no size field.
    pub const MESH: ChunkTag = ChunkTag(*b"MESH");
    pub const IMAT: ChunkTag = ChunkTag(*b"IMAT");
    pub const SIZE: ChunkTag = ChunkTag(*b"SIZE");
    pub const SLAN: ChunkTag = ChunkTag(*b"SLAN");
    pub const MINX: ChunkTag = ChunkTag(*b"MINX");
    pub const VIEW: ChunkTag = ChunkTag(*b"VIEW");
    pub const MOST: ChunkTag = ChunkTag(*b"MOST");
    pub const OBST: ChunkTag = ChunkTag(*b"OBST");
    pub const COST: ChunkTag = ChunkTag(*b"COST");
    pub const MEST: ChunkTag = ChunkTag(*b"MEST");
    /// End of model marker; no body.
    pub const IEOF: ChunkTag = ChunkTag(*b"IEOF");

    /// Whether a u32 byte length follows the tag.
    ///
    /// Only the three geometry-bearing chunks and the end marker have a
    /// body layout fixed by the format; everything else, including every
    /// tag this crate does not know, is size-prefixed.
    pub fn is_size_prefixed(self) -> bool {
        !matches!(
            self,
            ChunkTag::OBJT | ChunkTag::CONT | ChunkTag::MESH | ChunkTag::IEOF
        )
    }

    /// Tags that end an object's chunk loop and belong to the model.
    pub fn is_model_level(self) -> bool {
        matches!(
            self,
            ChunkTag::OBJT
                | ChunkTag::IEOF
                | ChunkTag::SLAN
                | ChunkTag::MINX
                | ChunkTag::MOST
                | ChunkTag::VIEW
        )
    }
}

impl fmt::Display for ChunkTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &b in &self.0 {
            if b.is_ascii_graphic() || b == b' ' {
                write!(f, "{}", b as char)?;
            } else {
                write!(f, "\\x{b:02x}")?;
            }
        }
        Ok(())
    }
}

impl fmt::Debug for ChunkTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ChunkTag({self})")
    }
}

/// A chunk the codec does not interpret, kept byte-for-byte.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpaqueChunk {
    pub tag: ChunkTag,
    pub body: Vec<u8>,
}

impl OpaqueChunk {
    pub fn new(tag: ChunkTag, body: impl Into<Vec<u8>>) -> Self {
        Self {
            tag,
            body: body.into(),
        }
    }

    /// Reads the size field and body that follow an already consumed tag.
    pub(crate) fn read(r: &mut Reader<'_>, tag: ChunkTag) -> Result<Self> {
        let mut body = read_sized_body(r, tag)?;
        tracing::trace!(%tag, len = body.size(), "opaque chunk");
        Ok(Self {
            tag,
            body: body.rest().to_vec(),
        })
    }

    pub(crate) fn write(&self, w: &mut Writer) -> Result<()> {
        write_sized(w, self.tag, |w| {
            w.buf(&self.body);
            Ok(())
        })
    }
}

/// Reads the next tag, advancing past it.
pub(crate) fn read_tag(r: &mut Reader<'_>) -> Result<ChunkTag> {
    Ok(ChunkTag(r.array()?))
}

/// Returns the next tag without consuming it.
pub(crate) fn peek_tag(r: &Reader<'_>) -> Result<ChunkTag> {
    let bytes = r.peek(4)?;
    Ok(ChunkTag([bytes[0], bytes[1], bytes[2], bytes[3]]))
}

/// Reads a u32 length and returns a sub-reader over that many body bytes.
pub(crate) fn read_sized_body<'a>(r: &mut Reader<'a>, tag: ChunkTag) -> Result<Reader<'a>> {
    let size = r.u32().map_err(|e| ImodError::from(e).within(tag))? as usize;
    r.cut(size).map_err(|e| ImodError::from(e).within(tag))
}

/// Reads a size-prefixed body that must be exactly `expected` bytes long.
pub(crate) fn read_fixed_body<'a>(
    r: &mut Reader<'a>,
    tag: ChunkTag,
    expected: usize,
) -> Result<Reader<'a>> {
    let offset = r.x;
    let size = r.u32().map_err(|e| ImodError::from(e).within(tag))? as usize;
    if size != expected {
        return Err(ImodError::InvalidChunkSize { tag, offset, size });
    }
    r.cut(size).map_err(|e| ImodError::from(e).within(tag))
}

/// Writes `tag`, a placeholder size, the body produced by `body`, then
/// back-fills the size.
pub(crate) fn write_sized<F>(w: &mut Writer, tag: ChunkTag, body: F) -> Result<()>
where
    F: FnOnce(&mut Writer) -> Result<()>,
{
    w.buf(&tag.0);
    let at = w.len();
    w.u32(0);
    body(w)?;
    let size = w.len() - at - 4;
    let size = u32::try_from(size).map_err(|_| ImodError::InvalidChunkSize {
        tag,
        offset: at,
        size,
    })?;
    w.patch_u32(at, size);
    Ok(())
}
