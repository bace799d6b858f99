//! File identifier and the fixed-layout model header.

use imod_buffers::{Reader, Writer};

use crate::error::{count_from_i32, count_to_i32, ImodError, Result};
use crate::fixed_str::FixedStr;

/// Magic token at offset 0 of every model file.
pub const IMOD_MAGIC: [u8; 4] = *b"IMOD";

/// Version token written for newly constructed models.
pub const DEFAULT_VERSION: [u8; 4] = *b"V1.2";

/// Size of the model header that follows the identifier.
pub const MODEL_HEADER_SIZE: usize = 232;

/// File identifier: the constant magic plus a version token.
///
/// The version is recorded but never checked against a known list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileId {
    pub version: FixedStr<4>,
}

impl Default for FileId {
    fn default() -> Self {
        Self {
            version: FixedStr::from_bytes(DEFAULT_VERSION),
        }
    }
}

impl FileId {
    pub(crate) fn read(r: &mut Reader<'_>) -> Result<Self> {
        let found: [u8; 4] = r.array()?;
        if found != IMOD_MAGIC {
            return Err(ImodError::BadMagic { found });
        }
        Ok(Self {
            version: FixedStr::read(r)?,
        })
    }

    pub(crate) fn write(&self, w: &mut Writer) {
        w.buf(&IMOD_MAGIC);
        self.version.write(w);
    }
}

/// Global model header.
///
/// The object count stored in the file is not a field here: it is taken
/// from [`Model::objects`](crate::Model::objects) when encoding.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelHeader {
    pub name: FixedStr<128>,
    pub xmax: i32,
    pub ymax: i32,
    pub zmax: i32,
    pub flags: u32,
    pub drawmode: i32,
    pub mousemode: i32,
    pub blacklevel: i32,
    pub whitelevel: i32,
    pub offset: [f32; 3],
    pub scale: [f32; 3],
    /// Currently selected object, contour and point.
    pub object: i32,
    pub contour: i32,
    pub point: i32,
    pub res: i32,
    pub thresh: i32,
    pub pixelsize: f32,
    pub units: i32,
    pub csum: i32,
    pub alpha: f32,
    pub beta: f32,
    pub gamma: f32,
}

impl Default for ModelHeader {
    fn default() -> Self {
        Self {
            name: FixedStr::from_bytes(name_slot(b"IMOD-NewModel")),
            xmax: 0,
            ymax: 0,
            zmax: 0,
            flags: 0,
            drawmode: 1,
            mousemode: 1,
            blacklevel: 0,
            whitelevel: 255,
            offset: [0.0; 3],
            scale: [1.0; 3],
            object: -1,
            contour: -1,
            point: -1,
            res: 3,
            thresh: 128,
            pixelsize: 1.0,
            units: 0,
            csum: 0,
            alpha: 0.0,
            beta: 0.0,
            gamma: 0.0,
        }
    }
}

fn name_slot(text: &[u8]) -> [u8; 128] {
    let mut slot = [0u8; 128];
    slot[..text.len()].copy_from_slice(text);
    slot
}

impl ModelHeader {
    /// Reads the header and returns it with the declared object count.
    pub(crate) fn read(r: &mut Reader<'_>) -> Result<(Self, usize)> {
        let name = FixedStr::read(r)?;
        let xmax = r.i32()?;
        let ymax = r.i32()?;
        let zmax = r.i32()?;
        let objsize_at = r.x;
        let objsize = count_from_i32("object", objsize_at, r.i32()?)?;
        let header = Self {
            name,
            xmax,
            ymax,
            zmax,
            flags: r.u32()?,
            drawmode: r.i32()?,
            mousemode: r.i32()?,
            blacklevel: r.i32()?,
            whitelevel: r.i32()?,
            offset: r.f32x3()?,
            scale: r.f32x3()?,
            object: r.i32()?,
            contour: r.i32()?,
            point: r.i32()?,
            res: r.i32()?,
            thresh: r.i32()?,
            pixelsize: r.f32()?,
            units: r.i32()?,
            csum: r.i32()?,
            alpha: r.f32()?,
            beta: r.f32()?,
            gamma: r.f32()?,
        };
        Ok((header, objsize))
    }

    pub(crate) fn write(&self, w: &mut Writer, objects: usize) -> Result<()> {
        self.name.write(w);
        w.i32(self.xmax);
        w.i32(self.ymax);
        w.i32(self.zmax);
        w.i32(count_to_i32("object", w.len(), objects)?);
        w.u32(self.flags);
        w.i32(self.drawmode);
        w.i32(self.mousemode);
        w.i32(self.blacklevel);
        w.i32(self.whitelevel);
        w.f32x3(self.offset);
        w.f32x3(self.scale);
        w.i32(self.object);
        w.i32(self.contour);
        w.i32(self.point);
        w.i32(self.res);
        w.i32(self.thresh);
        w.f32(self.pixelsize);
        w.i32(self.units);
        w.i32(self.csum);
        w.f32(self.alpha);
        w.f32(self.beta);
        w.f32(self.gamma);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_is_fixed_size() {
        let mut w = Writer::new();
        ModelHeader::default().write(&mut w, 3).unwrap();
        assert_eq!(w.len(), MODEL_HEADER_SIZE);

        let data = w.flush();
        let mut r = Reader::new(&data);
        let (header, objects) = ModelHeader::read(&mut r).unwrap();
        assert_eq!(objects, 3);
        assert_eq!(header, ModelHeader::default());
        assert_eq!(header.name.as_str(), "IMOD-NewModel");
    }

    #[test]
    fn bad_magic_rejected() {
        let mut r = Reader::new(b"MODIV1.2");
        assert_eq!(
            FileId::read(&mut r),
            Err(ImodError::BadMagic { found: *b"MODI" })
        );
    }

    #[test]
    fn unknown_version_accepted() {
        let mut r = Reader::new(b"IMODV9.9");
        assert_eq!(FileId::read(&mut r).unwrap().version.as_str(), "V9.9");
    }

    #[test]
    fn negative_object_count_rejected() {
        let mut w = Writer::new();
        ModelHeader::default().write(&mut w, 0).unwrap();
        let mut data = w.flush();
        data[140..144].copy_from_slice(&(-1i32).to_be_bytes());
        let mut r = Reader::new(&data);
        assert!(matches!(
            ModelHeader::read(&mut r),
            Err(ImodError::InvalidCount {
                what: "object",
                offset: 140,
                ..
            })
        ));
    }
}
