//! `SLAN`: saved slicer window orientations.

use imod_buffers::{Reader, Writer};

use crate::chunk::{self, ChunkTag};
use crate::error::Result;
use crate::fixed_str::FixedStr;

/// Size of a `SLAN` body.
pub const SLICER_ANGLE_SIZE: usize = 60;

/// One saved slicer angle.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SlicerAngle {
    pub time: i32,
    /// Rotation about X, Y and Z in degrees.
    pub angles: [f32; 3],
    pub center: [f32; 3],
    pub label: FixedStr<32>,
}

impl SlicerAngle {
    pub(crate) fn read(r: &mut Reader<'_>) -> Result<Self> {
        let mut body = chunk::read_fixed_body(r, ChunkTag::SLAN, SLICER_ANGLE_SIZE)?;
        Ok(Self {
            time: body.i32()?,
            angles: body.f32x3()?,
            center: body.f32x3()?,
            label: FixedStr::read(&mut body)?,
        })
    }

    pub(crate) fn write(&self, w: &mut Writer) -> Result<()> {
        chunk::write_sized(w, ChunkTag::SLAN, |w| {
            w.i32(self.time);
            w.f32x3(self.angles);
            w.f32x3(self.center);
            self.label.write(w);
            Ok(())
        })
    }
}
