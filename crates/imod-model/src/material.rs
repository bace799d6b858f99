//! `IMAT`: per-object material and rendering properties.

use imod_buffers::{Reader, Writer};

use crate::chunk::{self, ChunkTag};
use crate::error::Result;

/// Size of an `IMAT` body.
pub const MATERIAL_SIZE: usize = 16;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Material {
    pub ambient: u8,
    pub diffuse: u8,
    pub specular: u8,
    pub shininess: u8,
    pub fillred: u8,
    pub fillgreen: u8,
    pub fillblue: u8,
    pub quality: u8,
    pub mat2: u32,
    pub valblack: u8,
    pub valwhite: u8,
    pub matflags2: u8,
    pub mat3b3: u8,
}

impl Material {
    /// Reads the size field and body after the `IMAT` tag.
    pub(crate) fn read(r: &mut Reader<'_>) -> Result<Self> {
        let mut body = chunk::read_fixed_body(r, ChunkTag::IMAT, MATERIAL_SIZE)?;
        let [ambient, diffuse, specular, shininess] = body.array::<4>()?;
        let [fillred, fillgreen, fillblue, quality] = body.array::<4>()?;
        let mat2 = body.u32()?;
        let [valblack, valwhite, matflags2, mat3b3] = body.array::<4>()?;
        Ok(Self {
            ambient,
            diffuse,
            specular,
            shininess,
            fillred,
            fillgreen,
            fillblue,
            quality,
            mat2,
            valblack,
            valwhite,
            matflags2,
            mat3b3,
        })
    }

    pub(crate) fn write(&self, w: &mut Writer) -> Result<()> {
        chunk::write_sized(w, ChunkTag::IMAT, |w| {
            w.buf(&[self.ambient, self.diffuse, self.specular, self.shininess]);
            w.buf(&[self.fillred, self.fillgreen, self.fillblue, self.quality]);
            w.u32(self.mat2);
            w.buf(&[self.valblack, self.valwhite, self.matflags2, self.mat3b3]);
            Ok(())
        })
    }
}
