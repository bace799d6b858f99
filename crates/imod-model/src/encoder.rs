//! Model encoder.

use imod_buffers::Writer;

use crate::chunk::{ChunkTag, OpaqueChunk};
use crate::error::{ImodError, Result};
use crate::model::{Model, ModelSlot};
use crate::storage;

/// Serializes models to the on-disk layout.
///
/// The writer is reused between calls.
#[derive(Debug, Default)]
pub struct ModelEncoder {
    pub writer: Writer,
}

impl ModelEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Encodes `model` and returns the file bytes.
    ///
    /// On error the writer is left holding a partial file; the next call
    /// resets it.
    pub fn encode(&mut self, model: &Model) -> Result<Vec<u8>> {
        self.writer.reset();
        self.write_model(model)?;
        Ok(self.writer.flush())
    }

    pub fn write_model(&mut self, model: &Model) -> Result<()> {
        let w = &mut self.writer;
        model.id.write(w);
        model.header.write(w, model.objects.len())?;
        let mut cursor = ModelCursor::default();
        for &slot in &model.layout {
            write_slot(w, model, slot, &mut cursor)?;
        }
        for slot in model.canonical_layout() {
            write_slot(w, model, slot, &mut cursor)?;
        }
        w.buf(&ChunkTag::IEOF.0);
        w.buf(&model.trailing);
        tracing::debug!(bytes = w.len(), objects = model.objects.len(), "model encoded");
        Ok(())
    }
}

/// How much of each top-level collection has been written.
#[derive(Default)]
struct ModelCursor {
    objects: usize,
    /// The last chunk written belongs to an object.
    in_object: bool,
    extra: usize,
    slicer_angles: usize,
    minx: bool,
    storage: bool,
}

fn write_slot(
    w: &mut Writer,
    model: &Model,
    slot: ModelSlot,
    cursor: &mut ModelCursor,
) -> Result<()> {
    match slot {
        ModelSlot::Object => {
            if let Some(object) = model.objects.get(cursor.objects) {
                object.write(w)?;
                cursor.objects += 1;
                cursor.in_object = true;
            }
        }
        ModelSlot::Opaque => {
            if let Some(chunk) = model.extra.get(cursor.extra) {
                if claims(chunk, cursor) {
                    return Err(ImodError::MisplacedChunk {
                        tag: chunk.tag,
                        offset: w.len(),
                    });
                }
                chunk.write(w)?;
                cursor.extra += 1;
                cursor.in_object = false;
            }
        }
        ModelSlot::SlicerAngle => {
            if let Some(angle) = model.slicer_angles.get(cursor.slicer_angles) {
                angle.write(w)?;
                cursor.slicer_angles += 1;
                cursor.in_object = false;
            }
        }
        ModelSlot::Minx => {
            if let (Some(minx), false) = (&model.minx, cursor.minx) {
                minx.write(w)?;
                cursor.minx = true;
                cursor.in_object = false;
            }
        }
        ModelSlot::Storage => {
            if let (Some(records), false) = (&model.storage, cursor.storage) {
                storage::write_storage(w, ChunkTag::MOST, records)?;
                cursor.storage = true;
                cursor.in_object = false;
            }
        }
    }
    Ok(())
}

/// Whether reading `chunk` back at the cursor position would interpret it
/// or fail instead of keeping it as a top-level opaque chunk.
fn claims(chunk: &OpaqueChunk, cursor: &ModelCursor) -> bool {
    match chunk.tag {
        tag if !tag.is_size_prefixed() => true,
        ChunkTag::SLAN => true,
        ChunkTag::MINX => !cursor.minx,
        ChunkTag::MOST => !cursor.storage,
        // An object reads everything up to the next model-level tag.
        tag => cursor.in_object && !tag.is_model_level(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::header::MODEL_HEADER_SIZE;
    use crate::{Contour, Material, Minx, Object, SlicerAngle};

    #[test]
    fn empty_model_layout() {
        let data = ModelEncoder::new().encode(&Model::default()).unwrap();
        assert_eq!(&data[..8], b"IMODV1.2");
        assert_eq!(data.len(), 8 + MODEL_HEADER_SIZE + 4);
        assert_eq!(&data[data.len() - 4..], b"IEOF");
    }

    #[test]
    fn chunk_offsets() {
        let mut object = Object::new("").unwrap();
        object.contours.push(Contour::new(vec![[1.0, 2.0, 3.0]]));
        object.material = Some(Material::default());
        let mut model = Model::default();
        model.objects.push(object);
        let data = ModelEncoder::new().encode(&model).unwrap();

        assert_eq!(&data[240..244], b"OBJT");
        assert_eq!(&data[420..424], b"CONT");
        let imat_at = 424 + 16 + 12;
        assert_eq!(&data[imat_at..imat_at + 4], b"IMAT");
        assert_eq!(&data[148..152], &1i32.to_be_bytes());
    }

    #[test]
    fn canonical_top_level_order() {
        let mut model = Model::default();
        model.slicer_angles.push(SlicerAngle::default());
        model.extra.push(OpaqueChunk::new(ChunkTag::VIEW, vec![0; 4]));
        model.objects.push(Object::default());
        let data = ModelEncoder::new().encode(&model).unwrap();
        let view_at = 240 + 4 + 176;
        assert_eq!(&data[240..244], b"OBJT");
        assert_eq!(&data[view_at..view_at + 4], b"VIEW");
        assert_eq!(&data[view_at + 12..view_at + 16], b"SLAN");
    }

    #[test]
    fn encoder_is_reusable() {
        let mut encoder = ModelEncoder::new();
        let first = encoder.encode(&Model::default()).unwrap();
        let second = encoder.encode(&Model::default()).unwrap();
        assert_eq!(first, second);
    }

    fn with_extra(tag: &[u8; 4], minx: Option<Minx>) -> Model {
        let mut model = Model::default();
        model.minx = minx;
        model.extra.push(OpaqueChunk::new(ChunkTag(*tag), vec![1, 2, 3, 4]));
        model
    }

    #[test]
    fn interpreted_tags_are_not_written_opaque() {
        for tag in [b"SLAN", b"MINX", b"MOST", b"OBJT", b"IEOF", b"CONT"] {
            assert_eq!(
                ModelEncoder::new().encode(&with_extra(tag, None)),
                Err(ImodError::MisplacedChunk {
                    tag: ChunkTag(*tag),
                    offset: 240
                }),
                "{}",
                ChunkTag(*tag)
            );
        }
    }

    #[test]
    fn second_minx_stays_opaque() {
        let mut model = with_extra(b"MINX", Some(Minx::default()));
        assert!(ModelEncoder::new().encode(&model).is_err());

        model.layout = vec![ModelSlot::Minx, ModelSlot::Opaque];
        let data = ModelEncoder::new().encode(&model).unwrap();
        assert_eq!(crate::decode(&data).unwrap(), model);
    }

    #[test]
    fn object_level_tag_after_object_rejected() {
        let mut model = with_extra(b"ZQXW", None);
        assert!(ModelEncoder::new().encode(&model).is_ok());

        model.objects.push(Object::default());
        let err = ModelEncoder::new().encode(&model).unwrap_err();
        assert!(matches!(err, ImodError::MisplacedChunk { offset: 420, .. }));

        model.layout = vec![ModelSlot::Opaque, ModelSlot::Object];
        let data = ModelEncoder::new().encode(&model).unwrap();
        assert_eq!(crate::decode(&data).unwrap(), model);

        model.extra.insert(0, OpaqueChunk::new(ChunkTag::VIEW, vec![0; 4]));
        model.layout.clear();
        let data = ModelEncoder::new().encode(&model).unwrap();
        assert_eq!(crate::decode(&data).unwrap(), model);
    }
}
