//! Model decoder.

use imod_buffers::Reader;

use crate::chunk::{self, ChunkTag, OpaqueChunk};
use crate::config::DecodeOptions;
use crate::error::{ImodError, Result};
use crate::header::{FileId, ModelHeader};
use crate::minx::Minx;
use crate::model::{Model, ModelSlot};
use crate::object::Object;
use crate::slicer::SlicerAngle;
use crate::storage;

/// Decodes whole model files.
///
/// Holds only options; every call to [`ModelDecoder::decode`] works on its
/// own cursor, so one decoder can be shared across threads.
#[derive(Debug, Clone, Default)]
pub struct ModelDecoder {
    pub options: DecodeOptions,
}

impl ModelDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: DecodeOptions) -> Self {
        Self { options }
    }

    /// Decodes a complete file buffer.
    pub fn decode(&self, data: &[u8]) -> Result<Model> {
        let mut r = Reader::new(data);
        let id = FileId::read(&mut r)?;
        let (header, declared) = ModelHeader::read(&mut r)?;
        tracing::debug!(
            version = %id.version,
            name = %header.name,
            objects = declared,
            "model header"
        );
        let mut model = Model {
            id,
            header,
            ..Model::default()
        };
        self.read_chunks(&mut r, &mut model)?;

        if declared != model.objects.len() {
            if self.options.strict_object_count {
                return Err(ImodError::ObjectCountMismatch {
                    declared,
                    found: model.objects.len(),
                });
            }
            tracing::warn!(
                declared,
                found = model.objects.len(),
                "header object count disagrees with file contents"
            );
        }
        if model.layout == model.canonical_layout() {
            model.layout.clear();
        }
        Ok(model)
    }

    fn read_chunks(&self, r: &mut Reader<'_>, model: &mut Model) -> Result<()> {
        loop {
            if r.is_empty() && !self.options.require_eof_marker {
                tracing::debug!(offset = r.x, "end of input without IEOF");
                return Ok(());
            }
            let at = r.x;
            let tag = chunk::read_tag(r)?;
            tracing::debug!(%tag, offset = at, "chunk");
            let slot = match tag {
                ChunkTag::IEOF => {
                    model.trailing = r.rest().to_vec();
                    return Ok(());
                }
                ChunkTag::OBJT => {
                    model.objects.push(Object::read(r, &self.options)?);
                    ModelSlot::Object
                }
                ChunkTag::SLAN => {
                    model.slicer_angles.push(SlicerAngle::read(r)?);
                    ModelSlot::SlicerAngle
                }
                ChunkTag::MINX if model.minx.is_none() => {
                    model.minx = Some(Minx::read(r)?);
                    ModelSlot::Minx
                }
                ChunkTag::MOST if model.storage.is_none() => {
                    model.storage = Some(storage::read_storage(r, tag)?);
                    ModelSlot::Storage
                }
                _ if !tag.is_size_prefixed() => {
                    return Err(ImodError::MisplacedChunk { tag, offset: at });
                }
                _ => {
                    model.extra.push(OpaqueChunk::read(r, tag)?);
                    ModelSlot::Opaque
                }
            };
            model.layout.push(slot);
        }
    }
}
