//! `MINX`: transform between model and image coordinates.

use imod_buffers::{Reader, Writer};

use crate::chunk::{self, ChunkTag};
use crate::error::Result;

/// Size of a `MINX` body.
pub const MINX_SIZE: usize = 72;

/// Old (`o*`) and current (`c*`) scale, translation and rotation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Minx {
    pub oscale: [f32; 3],
    pub otrans: [f32; 3],
    pub orot: [f32; 3],
    pub cscale: [f32; 3],
    pub ctrans: [f32; 3],
    pub crot: [f32; 3],
}

impl Default for Minx {
    fn default() -> Self {
        Self {
            oscale: [1.0; 3],
            otrans: [0.0; 3],
            orot: [0.0; 3],
            cscale: [1.0; 3],
            ctrans: [0.0; 3],
            crot: [0.0; 3],
        }
    }
}

impl Minx {
    pub(crate) fn read(r: &mut Reader<'_>) -> Result<Self> {
        let mut body = chunk::read_fixed_body(r, ChunkTag::MINX, MINX_SIZE)?;
        Ok(Self {
            oscale: body.f32x3()?,
            otrans: body.f32x3()?,
            orot: body.f32x3()?,
            cscale: body.f32x3()?,
            ctrans: body.f32x3()?,
            crot: body.f32x3()?,
        })
    }

    pub(crate) fn write(&self, w: &mut Writer) -> Result<()> {
        chunk::write_sized(w, ChunkTag::MINX, |w| {
            for v in [
                self.oscale,
                self.otrans,
                self.orot,
                self.cscale,
                self.ctrans,
                self.crot,
            ] {
                w.f32x3(v);
            }
            Ok(())
        })
    }
}
