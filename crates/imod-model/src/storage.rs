//! General storage records carried by `MOST`, `OBST`, `COST` and `MEST`.
//!
//! Each record is 12 bytes: a type, a flags word, and two 4-byte slots
//! whose representation is selected by the flags. The low two bits pick the
//! index representation, the next two the value representation.

use imod_buffers::{Reader, Writer};

use crate::chunk::{self, ChunkTag};
use crate::error::{ImodError, Result};

/// Record type holding one value per item (curvature, density, ...).
pub const GEN_STORE_VALUE1: i16 = 10;

const RECORD_SIZE: usize = 12;
const REPR_MASK: i16 = 0b11;

/// One 4-byte slot of a storage record.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StoreValue {
    Int(i32),
    Float(f32),
    Shorts([i16; 2]),
    Bytes([u8; 4]),
}

impl StoreValue {
    fn repr(self) -> i16 {
        match self {
            StoreValue::Int(_) => 0,
            StoreValue::Float(_) => 1,
            StoreValue::Shorts(_) => 2,
            StoreValue::Bytes(_) => 3,
        }
    }

    fn read(r: &mut Reader<'_>, repr: i16) -> Result<Self> {
        Ok(match repr & REPR_MASK {
            0 => StoreValue::Int(r.i32()?),
            1 => StoreValue::Float(r.f32()?),
            2 => StoreValue::Shorts([r.i16()?, r.i16()?]),
            _ => StoreValue::Bytes(r.array()?),
        })
    }

    fn write(self, w: &mut Writer) {
        match self {
            StoreValue::Int(v) => w.i32(v),
            StoreValue::Float(v) => w.f32(v),
            StoreValue::Shorts([a, b]) => {
                w.i16(a);
                w.i16(b);
            }
            StoreValue::Bytes(b) => w.buf(&b),
        }
    }

    pub fn as_int(self) -> Option<i32> {
        match self {
            StoreValue::Int(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_float(self) -> Option<f32> {
        match self {
            StoreValue::Float(v) => Some(v),
            _ => None,
        }
    }
}

/// A single general storage record.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeneralStorage {
    pub kind: i16,
    /// Raw flags word. Bits above the two representation fields are kept
    /// as read.
    pub flags: i16,
    pub index: StoreValue,
    pub value: StoreValue,
}

impl GeneralStorage {
    /// Builds a record whose flags describe `index` and `value`.
    pub fn new(kind: i16, index: StoreValue, value: StoreValue) -> Self {
        Self {
            kind,
            flags: index.repr() | (value.repr() << 2),
            index,
            value,
        }
    }

    fn read(r: &mut Reader<'_>) -> Result<Self> {
        let kind = r.i16()?;
        let flags = r.i16()?;
        let index = StoreValue::read(r, flags)?;
        let value = StoreValue::read(r, flags >> 2)?;
        Ok(Self {
            kind,
            flags,
            index,
            value,
        })
    }

    fn write(&self, w: &mut Writer) {
        w.i16(self.kind);
        w.i16(self.flags);
        self.index.write(w);
        self.value.write(w);
    }
}

/// Reads a storage chunk body after its tag.
pub(crate) fn read_storage(r: &mut Reader<'_>, tag: ChunkTag) -> Result<Vec<GeneralStorage>> {
    let offset = r.x;
    let mut body = chunk::read_sized_body(r, tag)?;
    let size = body.size();
    if size % RECORD_SIZE != 0 {
        return Err(ImodError::InvalidChunkSize { tag, offset, size });
    }
    (0..size / RECORD_SIZE)
        .map(|_| GeneralStorage::read(&mut body))
        .collect()
}

/// Records of a raw storage body, or `None` when the body is not a whole
/// number of records.
pub(crate) fn parse_records(body: &[u8]) -> Option<Vec<GeneralStorage>> {
    if body.len() % RECORD_SIZE != 0 {
        return None;
    }
    let mut r = Reader::new(body);
    (0..body.len() / RECORD_SIZE)
        .map(|_| GeneralStorage::read(&mut r).ok())
        .collect()
}

/// Writes a complete storage chunk, tag included.
pub(crate) fn write_storage(
    w: &mut Writer,
    tag: ChunkTag,
    records: &[GeneralStorage],
) -> Result<()> {
    chunk::write_sized(w, tag, |w| {
        for record in records {
            record.write(w);
        }
        Ok(())
    })
}
