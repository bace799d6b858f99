//! Objects: a fixed header followed by the object's own chunk sequence.

use imod_buffers::{Reader, Writer};

use crate::chunk::{self, ChunkTag, OpaqueChunk};
use crate::config::DecodeOptions;
use crate::contour::Contour;
use crate::error::{count_from_i32, count_to_i32, ImodError, Result};
use crate::fixed_str::FixedStr;
use crate::material::Material;
use crate::mesh::Mesh;
use crate::storage::{self, GeneralStorage};

/// Size of the object header after the `OBJT` tag.
pub const OBJECT_HEADER_SIZE: usize = 176;

/// Object header.
///
/// Contour and mesh counts are not fields: they are taken from the
/// object's collections when encoding.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectHeader {
    pub name: FixedStr<64>,
    /// Reserved words, kept as read.
    pub extra: [u32; 16],
    pub flags: u32,
    pub axis: i32,
    pub drawmode: i32,
    /// Red, green and blue in `[0, 1]`.
    pub color: [f32; 3],
    pub pdrawsize: i32,
    pub symbol: u8,
    pub symsize: u8,
    pub linewidth2: u8,
    pub linewidth: u8,
    pub linesty: u8,
    pub symflags: u8,
    pub sympad: u8,
    pub trans: u8,
    pub surfsize: i32,
}

impl Default for ObjectHeader {
    fn default() -> Self {
        Self {
            name: FixedStr::default(),
            extra: [0; 16],
            flags: 0,
            axis: 0,
            drawmode: 1,
            color: [0.0, 1.0, 0.0],
            pdrawsize: 0,
            symbol: 1,
            symsize: 3,
            linewidth2: 1,
            linewidth: 1,
            linesty: 0,
            symflags: 0,
            sympad: 0,
            trans: 0,
            surfsize: 0,
        }
    }
}

/// Header counts that are recomputed on write.
struct DeclaredCounts {
    contours: usize,
    meshes: usize,
}

impl ObjectHeader {
    fn read(r: &mut Reader<'_>) -> Result<(Self, DeclaredCounts)> {
        let name = FixedStr::read(r)?;
        let mut extra = [0u32; 16];
        for word in &mut extra {
            *word = r.u32()?;
        }
        let contours = count_from_i32("contour", r.x, r.i32()?)?;
        let flags = r.u32()?;
        let axis = r.i32()?;
        let drawmode = r.i32()?;
        let color = r.f32x3()?;
        let pdrawsize = r.i32()?;
        let [symbol, symsize, linewidth2, linewidth] = r.array::<4>()?;
        let [linesty, symflags, sympad, trans] = r.array::<4>()?;
        let meshes = count_from_i32("mesh", r.x, r.i32()?)?;
        let surfsize = r.i32()?;
        let header = Self {
            name,
            extra,
            flags,
            axis,
            drawmode,
            color,
            pdrawsize,
            symbol,
            symsize,
            linewidth2,
            linewidth,
            linesty,
            symflags,
            sympad,
            trans,
            surfsize,
        };
        Ok((header, DeclaredCounts { contours, meshes }))
    }

    fn write(&self, w: &mut Writer, contours: usize, meshes: usize) -> Result<()> {
        self.name.write(w);
        for word in self.extra {
            w.u32(word);
        }
        w.i32(count_to_i32("contour", w.len(), contours)?);
        w.u32(self.flags);
        w.i32(self.axis);
        w.i32(self.drawmode);
        w.f32x3(self.color);
        w.i32(self.pdrawsize);
        w.buf(&[self.symbol, self.symsize, self.linewidth2, self.linewidth]);
        w.buf(&[self.linesty, self.symflags, self.sympad, self.trans]);
        w.i32(count_to_i32("mesh", w.len(), meshes)?);
        w.i32(self.surfsize);
        Ok(())
    }
}

/// Kind of item at one position of an object's chunk sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ObjectSlot {
    Contour,
    Mesh,
    Material,
    Storage,
    Opaque,
}

/// Which item chunks such as `SIZE` or `MEST` may attach to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
enum Anchor {
    #[default]
    None,
    Contour,
    Mesh,
}

/// A named group of contours and meshes sharing display properties.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Object {
    pub header: ObjectHeader,
    pub contours: Vec<Contour>,
    pub meshes: Vec<Mesh>,
    pub material: Option<Material>,
    /// Records from the object's `OBST` chunk.
    pub storage: Option<Vec<GeneralStorage>>,
    /// Chunks kept verbatim, in file order.
    pub extra: Vec<OpaqueChunk>,
    /// File order of the items above; empty when it is the canonical one.
    pub(crate) layout: Vec<ObjectSlot>,
}

impl Object {
    pub fn new(name: &str) -> Result<Self> {
        Ok(Self {
            header: ObjectHeader {
                name: FixedStr::new(name)?,
                ..ObjectHeader::default()
            },
            ..Self::default()
        })
    }

    /// Reads the object header after the `OBJT` tag and every chunk that
    /// belongs to the object.
    ///
    /// Stops in front of the next model-level tag without consuming it.
    pub(crate) fn read(r: &mut Reader<'_>, options: &DecodeOptions) -> Result<Self> {
        let start = r.x;
        let (header, declared) = ObjectHeader::read(r).map_err(|e| e.within(ChunkTag::OBJT))?;
        let mut object = Object {
            header,
            ..Object::default()
        };
        let mut anchor = Anchor::None;
        loop {
            if r.is_empty() && !options.require_eof_marker {
                break;
            }
            let at = r.x;
            let tag = chunk::peek_tag(r)?;
            if tag.is_model_level() {
                break;
            }
            r.skip(4)?;
            tracing::debug!(%tag, offset = at, "object chunk");
            anchor = object.read_chunk(r, tag, at, anchor)?;
        }
        if declared.contours != object.contours.len() || declared.meshes != object.meshes.len() {
            tracing::debug!(
                offset = start,
                declared_contours = declared.contours,
                contours = object.contours.len(),
                declared_meshes = declared.meshes,
                meshes = object.meshes.len(),
                "object header counts disagree with contents"
            );
        }
        if object.layout == object.canonical_layout() {
            object.layout.clear();
        }
        Ok(object)
    }

    /// Reads one chunk after its tag and returns the new attachment anchor.
    fn read_chunk(
        &mut self,
        r: &mut Reader<'_>,
        tag: ChunkTag,
        at: usize,
        anchor: Anchor,
    ) -> Result<Anchor> {
        match tag {
            ChunkTag::CONT => {
                let contour = Contour::read(r).map_err(|e| e.within(tag))?;
                self.contours.push(contour);
                self.layout.push(ObjectSlot::Contour);
                return Ok(Anchor::Contour);
            }
            ChunkTag::MESH => {
                let mesh = Mesh::read(r).map_err(|e| e.within(tag))?;
                self.meshes.push(mesh);
                self.layout.push(ObjectSlot::Mesh);
                return Ok(Anchor::Mesh);
            }
            ChunkTag::IMAT => {
                if self.material.is_some() {
                    return Err(ImodError::UnexpectedDuplicateChunk { tag, offset: at });
                }
                self.material = Some(Material::read(r)?);
                self.layout.push(ObjectSlot::Material);
                return Ok(Anchor::None);
            }
            ChunkTag::OBST if self.storage.is_none() => {
                self.storage = Some(storage::read_storage(r, tag)?);
                self.layout.push(ObjectSlot::Storage);
                return Ok(Anchor::None);
            }
            _ => {}
        }
        let attached = match (tag, anchor, self.contours.last_mut(), self.meshes.last_mut()) {
            (ChunkTag::SIZE, Anchor::Contour, Some(contour), _) if contour.accepts_sizes() => {
                contour.read_sizes(r)?;
                true
            }
            (ChunkTag::COST, Anchor::Contour, Some(contour), _) if contour.accepts_storage() => {
                contour.read_storage(r)?;
                true
            }
            (ChunkTag::MEST, Anchor::Mesh, _, Some(mesh)) => {
                let body_at = r.x;
                let records = storage::read_storage(r, tag)?;
                if mesh.attach_storage(records, at)? {
                    true
                } else {
                    r.x = body_at;
                    false
                }
            }
            _ => false,
        };
        if attached {
            return Ok(anchor);
        }
        self.extra.push(OpaqueChunk::read(r, tag)?);
        self.layout.push(ObjectSlot::Opaque);
        Ok(Anchor::None)
    }

    /// Slot order used when no file order is recorded.
    fn canonical_layout(&self) -> Vec<ObjectSlot> {
        let mut layout = Vec::new();
        layout.extend(self.contours.iter().map(|_| ObjectSlot::Contour));
        layout.extend(self.meshes.iter().map(|_| ObjectSlot::Mesh));
        if self.material.is_some() {
            layout.push(ObjectSlot::Material);
        }
        if self.storage.is_some() {
            layout.push(ObjectSlot::Storage);
        }
        layout.extend(self.extra.iter().map(|_| ObjectSlot::Opaque));
        layout
    }

    /// Writes the `OBJT` chunk and every chunk of the object.
    ///
    /// Items follow the recorded file order; items the order does not
    /// account for are appended in canonical order.
    pub(crate) fn write(&self, w: &mut Writer) -> Result<()> {
        w.buf(&ChunkTag::OBJT.0);
        self.header.write(w, self.contours.len(), self.meshes.len())?;
        let mut cursor = ObjectCursor::default();
        for &slot in &self.layout {
            self.write_slot(w, slot, &mut cursor)?;
        }
        for slot in self.canonical_layout() {
            self.write_slot(w, slot, &mut cursor)?;
        }
        Ok(())
    }

    fn write_slot(
        &self,
        w: &mut Writer,
        slot: ObjectSlot,
        cursor: &mut ObjectCursor,
    ) -> Result<()> {
        match slot {
            ObjectSlot::Contour => {
                if let Some(contour) = self.contours.get(cursor.contours) {
                    contour.write(w)?;
                    cursor.contours += 1;
                    cursor.anchor = Anchor::Contour;
                }
            }
            ObjectSlot::Mesh => {
                if let Some(mesh) = self.meshes.get(cursor.meshes) {
                    mesh.write(w)?;
                    cursor.meshes += 1;
                    cursor.anchor = Anchor::Mesh;
                }
            }
            ObjectSlot::Material => {
                if let (Some(material), false) = (&self.material, cursor.material) {
                    material.write(w)?;
                    cursor.material = true;
                    cursor.anchor = Anchor::None;
                }
            }
            ObjectSlot::Storage => {
                if let (Some(records), false) = (&self.storage, cursor.storage) {
                    storage::write_storage(w, ChunkTag::OBST, records)?;
                    cursor.storage = true;
                    cursor.anchor = Anchor::None;
                }
            }
            ObjectSlot::Opaque => {
                if let Some(chunk) = self.extra.get(cursor.extra) {
                    if self.claims(chunk, cursor) {
                        return Err(ImodError::MisplacedChunk {
                            tag: chunk.tag,
                            offset: w.len(),
                        });
                    }
                    chunk.write(w)?;
                    cursor.extra += 1;
                    cursor.anchor = Anchor::None;
                }
            }
        }
        Ok(())
    }

    /// Whether reading `chunk` back at the cursor position would interpret
    /// it, end the object, or fail, instead of keeping it opaque.
    fn claims(&self, chunk: &OpaqueChunk, cursor: &ObjectCursor) -> bool {
        let tag = chunk.tag;
        if !tag.is_size_prefixed() || tag.is_model_level() {
            return true;
        }
        let contour = cursor.contours.checked_sub(1).and_then(|i| self.contours.get(i));
        let mesh = cursor.meshes.checked_sub(1).and_then(|i| self.meshes.get(i));
        match (tag, cursor.anchor) {
            (ChunkTag::IMAT, _) => true,
            (ChunkTag::OBST, _) => !cursor.storage,
            (ChunkTag::SIZE, Anchor::Contour) => contour.is_some_and(Contour::accepts_sizes),
            (ChunkTag::COST, Anchor::Contour) => contour.is_some_and(Contour::accepts_storage),
            (ChunkTag::MEST, Anchor::Mesh) => match (storage::parse_records(&chunk.body), mesh) {
                (Some(records), Some(mesh)) => mesh.accepts_storage(&records),
                (None, Some(_)) => true,
                (_, None) => false,
            },
            _ => false,
        }
    }
}

/// How much of each collection has been written.
#[derive(Default)]
struct ObjectCursor {
    anchor: Anchor,
    contours: usize,
    meshes: usize,
    material: bool,
    storage: bool,
    extra: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunk::read_tag;

    fn object_bytes(object: &Object) -> Vec<u8> {
        let mut w = Writer::new();
        object.write(&mut w).unwrap();
        let mut data = w.flush();
        data.extend_from_slice(b"IEOF");
        data
    }

    fn read_back(data: &[u8]) -> Object {
        let mut r = Reader::new(data);
        assert_eq!(read_tag(&mut r).unwrap(), ChunkTag::OBJT);
        let object = Object::read(&mut r, &DecodeOptions::default()).unwrap();
        assert_eq!(chunk::peek_tag(&r).unwrap(), ChunkTag::IEOF);
        object
    }

    #[test]
    fn header_is_fixed_size() {
        let mut w = Writer::new();
        ObjectHeader::default().write(&mut w, 2, 1).unwrap();
        assert_eq!(w.len(), OBJECT_HEADER_SIZE);
        let data = w.flush();
        assert_eq!(&data[128..132], &2i32.to_be_bytes());
        assert_eq!(&data[168..172], &1i32.to_be_bytes());
    }

    #[test]
    fn canonical_object_has_no_layout() {
        let mut object = Object::new("Mitochondria").unwrap();
        object.contours.push(Contour::new(vec![[1.0, 2.0, 3.0]]));
        object.material = Some(Material::default());
        let back = read_back(&object_bytes(&object));
        assert!(back.layout.is_empty());
        assert_eq!(back, object);
    }

    #[test]
    fn interleaved_chunks_keep_their_order() {
        let mut w = Writer::new();
        w.buf(b"OBJT");
        ObjectHeader::default().write(&mut w, 2, 0).unwrap();
        Contour::new(vec![[0.0; 3]]).write(&mut w).unwrap();
        OpaqueChunk::new(ChunkTag(*b"CLIP"), vec![9; 8]).write(&mut w).unwrap();
        Contour::new(vec![[1.0; 3]]).write(&mut w).unwrap();
        w.buf(b"IEOF");
        let data = w.flush();

        let object = read_back(&data);
        assert_eq!(
            object.layout,
            vec![ObjectSlot::Contour, ObjectSlot::Opaque, ObjectSlot::Contour]
        );
        assert_eq!(object_bytes(&object), data);
    }

    #[test]
    fn second_material_is_duplicate() {
        let mut w = Writer::new();
        w.buf(b"OBJT");
        ObjectHeader::default().write(&mut w, 0, 0).unwrap();
        Material::default().write(&mut w).unwrap();
        let second = w.len();
        Material::default().write(&mut w).unwrap();
        w.buf(b"IEOF");
        let data = w.flush();

        let mut r = Reader::new(&data);
        read_tag(&mut r).unwrap();
        assert_eq!(
            Object::read(&mut r, &DecodeOptions::default()),
            Err(ImodError::UnexpectedDuplicateChunk {
                tag: ChunkTag::IMAT,
                offset: second
            })
        );
    }

    #[test]
    fn size_after_mesh_stays_opaque() {
        let mut w = Writer::new();
        w.buf(b"OBJT");
        ObjectHeader::default().write(&mut w, 1, 1).unwrap();
        Contour::new(vec![[0.0; 3]]).write(&mut w).unwrap();
        Mesh::new(vec![[0.0; 3]], vec![]).write(&mut w).unwrap();
        chunk::write_sized(&mut w, ChunkTag::SIZE, |w| {
            w.f32(1.0);
            Ok(())
        })
        .unwrap();
        w.buf(b"IEOF");
        let data = w.flush();

        let object = read_back(&data);
        assert_eq!(object.contours[0].sizes, None);
        assert_eq!(object.extra.len(), 1);
        assert_eq!(object.extra[0].tag, ChunkTag::SIZE);
        assert!(object.layout.is_empty());
        assert_eq!(object_bytes(&object), data);
    }

    #[test]
    fn repeated_storage_is_opaque() {
        let mut object = Object::new("").unwrap();
        object.storage = Some(vec![]);
        object.extra.push(OpaqueChunk::new(ChunkTag::OBST, vec![0; 12]));
        let data = object_bytes(&object);
        let back = read_back(&data);
        assert_eq!(back, object);
    }

    #[test]
    fn items_added_after_decode_are_appended() {
        let mut w = Writer::new();
        w.buf(b"OBJT");
        ObjectHeader::default().write(&mut w, 0, 0).unwrap();
        OpaqueChunk::new(ChunkTag(*b"OGRP"), vec![1, 2, 3, 4]).write(&mut w).unwrap();
        Contour::new(vec![[0.0; 3]]).write(&mut w).unwrap();
        w.buf(b"IEOF");
        let data = w.flush();

        let mut object = read_back(&data);
        assert_eq!(object.layout, vec![ObjectSlot::Opaque, ObjectSlot::Contour]);
        object.contours.push(Contour::new(vec![[5.0; 3]]));

        let back = read_back(&object_bytes(&object));
        assert_eq!(back.contours.len(), 2);
        assert_eq!(back.contours[1].points, vec![[5.0; 3]]);
        assert_eq!(back.extra, object.extra);
    }

    fn misplaced_at(object: &Object) -> Option<(ChunkTag, usize)> {
        let mut w = Writer::new();
        match object.write(&mut w) {
            Err(ImodError::MisplacedChunk { tag, offset }) => Some((tag, offset)),
            _ => None,
        }
    }

    #[test]
    fn chunks_the_reader_would_claim_are_rejected() {
        for tag in [b"VIEW", b"SLAN", b"IEOF", b"IMAT", b"OBST"] {
            let tag = ChunkTag(*tag);
            let mut object = Object::default();
            object.extra.push(OpaqueChunk::new(tag, vec![0; 12]));
            assert_eq!(misplaced_at(&object), Some((tag, 180)), "{tag}");
        }
        let mut object = Object::default();
        object.extra.push(OpaqueChunk::new(ChunkTag::CONT, vec![]));
        assert_eq!(misplaced_at(&object), Some((ChunkTag::CONT, 180)));
    }

    #[test]
    fn size_after_bare_contour_rejected() {
        let mut object = Object::default();
        object.contours.push(Contour::new(vec![[0.0; 3]]));
        object.extra.push(OpaqueChunk::new(ChunkTag::SIZE, 1.0f32.to_be_bytes()));
        assert_eq!(
            misplaced_at(&object),
            Some((ChunkTag::SIZE, 180 + 4 + 16 + 12))
        );

        object.contours[0].sizes = Some(vec![2.0]);
        let back = read_back(&object_bytes(&object));
        assert_eq!(back, object);
    }

    #[test]
    fn mest_after_mesh_checked_against_attachment() {
        let mut object = Object::default();
        object.meshes.push(Mesh::new(vec![[0.0; 3]; 3], vec![[0, 1, 2]]));
        let mut w = Writer::new();
        w.i16(2);
        w.i16(0);
        w.i32(5);
        w.i32(6);
        let body = w.flush();
        object.extra.push(OpaqueChunk::new(ChunkTag::MEST, body[..5].to_vec()));
        assert!(misplaced_at(&object).is_some());

        object.extra[0].body = body;
        assert!(misplaced_at(&object).is_some());

        object.meshes[0].storage = Some(vec![]);
        let back = read_back(&object_bytes(&object));
        assert_eq!(back, object);
    }
}
