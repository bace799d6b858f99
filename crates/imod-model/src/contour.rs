//! Contours: ordered 3D point lists with optional per-point sizes.

use imod_buffers::{Reader, Writer};

use crate::chunk::{self, ChunkTag};
use crate::error::{count_from_i32, count_to_i32, ImodError, Result};
use crate::storage::{self, GeneralStorage};

/// An open or closed polyline of single-precision points.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Contour {
    pub flags: u32,
    pub time: i32,
    pub surf: i32,
    pub points: Vec<[f32; 3]>,
    /// Per-point sizes from a `SIZE` chunk; same length as `points`.
    pub sizes: Option<Vec<f32>>,
    /// Records from a `COST` chunk.
    pub storage: Option<Vec<GeneralStorage>>,
}

impl Contour {
    pub fn new(points: Vec<[f32; 3]>) -> Self {
        Self {
            points,
            ..Self::default()
        }
    }

    /// Reads the contour body after its `CONT` tag.
    pub(crate) fn read(r: &mut Reader<'_>) -> Result<Self> {
        let psize_at = r.x;
        let psize = count_from_i32("point", psize_at, r.i32()?)?;
        let flags = r.u32()?;
        let time = r.i32()?;
        let surf = r.i32()?;
        let points = r.f32x3_seq(psize)?;
        Ok(Self {
            flags,
            time,
            surf,
            points,
            sizes: None,
            storage: None,
        })
    }

    /// Reads a `SIZE` chunk after its tag and attaches it.
    pub(crate) fn read_sizes(&mut self, r: &mut Reader<'_>) -> Result<()> {
        let offset = r.x;
        let mut body = chunk::read_sized_body(r, ChunkTag::SIZE)?;
        if body.size() != self.points.len() * 4 {
            return Err(ImodError::PointSizeCountMismatch {
                offset,
                sizes: body.size() / 4,
                points: self.points.len(),
            });
        }
        self.sizes = Some(body.f32_seq(self.points.len())?);
        Ok(())
    }

    /// Reads a `COST` chunk after its tag and attaches it.
    pub(crate) fn read_storage(&mut self, r: &mut Reader<'_>) -> Result<()> {
        self.storage = Some(storage::read_storage(r, ChunkTag::COST)?);
        Ok(())
    }

    /// Whether a `SIZE` chunk read next may still attach to this contour.
    pub(crate) fn accepts_sizes(&self) -> bool {
        self.sizes.is_none() && self.storage.is_none()
    }

    pub(crate) fn accepts_storage(&self) -> bool {
        self.storage.is_none()
    }

    /// Writes the `CONT` chunk followed by its attached chunks.
    pub(crate) fn write(&self, w: &mut Writer) -> Result<()> {
        let offset = w.len();
        if let Some(sizes) = &self.sizes {
            if sizes.len() != self.points.len() {
                return Err(ImodError::PointSizeCountMismatch {
                    offset,
                    sizes: sizes.len(),
                    points: self.points.len(),
                });
            }
        }
        w.buf(&ChunkTag::CONT.0);
        w.i32(count_to_i32("point", w.len(), self.points.len())?);
        w.u32(self.flags);
        w.i32(self.time);
        w.i32(self.surf);
        for p in &self.points {
            w.f32x3(*p);
        }
        if let Some(sizes) = &self.sizes {
            chunk::write_sized(w, ChunkTag::SIZE, |w| {
                for s in sizes {
                    w.f32(*s);
                }
                Ok(())
            })?;
        }
        if let Some(records) = &self.storage {
            storage::write_storage(w, ChunkTag::COST, records)?;
        }
        Ok(())
    }
}
