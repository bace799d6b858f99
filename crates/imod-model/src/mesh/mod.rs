//! Meshes: a vertex list plus a control-token index stream.

pub mod stream;

pub use stream::{assemble, IndexAssembler, MeshFault};

use imod_buffers::{Reader, Writer};

use crate::chunk::ChunkTag;
use crate::error::{count_from_i32, count_to_i32, ImodError, Result};
use crate::storage::{self, GeneralStorage, StoreValue, GEN_STORE_VALUE1};

/// Flags word of a face value record: i32 index, f32 value.
const FACE_VALUE_FLAGS: i16 = 0b0100;

/// A triangulated surface.
///
/// `triangles` index into this mesh's own `vertices`. When the file
/// stored the triangles with anything other than the canonical single
/// `BGNPOLY` primitive, the original token stream is kept and written back
/// as long as it still describes the same triangles.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    pub flag: u32,
    pub time: i16,
    pub surf: i16,
    pub vertices: Vec<[f32; 3]>,
    pub triangles: Vec<[u32; 3]>,
    /// One value per triangle, in triangle order. An empty list is not
    /// written.
    pub face_values: Option<Vec<f32>>,
    /// Records from a `MEST` chunk that is not a face value stream.
    pub storage: Option<Vec<GeneralStorage>>,
    stream: Option<Vec<i32>>,
}

impl Mesh {
    pub fn new(vertices: Vec<[f32; 3]>, triangles: Vec<[u32; 3]>) -> Self {
        Self {
            vertices,
            triangles,
            ..Self::default()
        }
    }

    /// Whether a non-canonical token stream from the file is retained.
    pub fn has_retained_stream(&self) -> bool {
        self.stream.is_some()
    }

    /// Drops the retained token stream so the canonical one gets written.
    pub fn clear_retained_stream(&mut self) {
        self.stream = None;
    }

    /// The token stream this mesh encodes to.
    pub fn index_stream(&self) -> std::result::Result<Vec<i32>, MeshFault> {
        if let Some(tokens) = &self.stream {
            if assemble(tokens, self.vertices.len()).as_ref() == Ok(&self.triangles) {
                return Ok(tokens.clone());
            }
        }
        stream::canonical(&self.triangles, self.vertices.len())
    }

    /// Per-vertex values from value records in [`Mesh::storage`].
    ///
    /// Record indices address the token stream, not the vertex list; a
    /// record pointing at a control token or outside the stream is
    /// ignored. Vertices without a value get `0.0`.
    pub fn vertex_values(&self) -> Vec<f32> {
        let mut values = vec![0.0; self.vertices.len()];
        let Some(records) = &self.storage else {
            return values;
        };
        let tokens = self.index_stream().unwrap_or_default();
        for record in records.iter().filter(|r| r.kind == GEN_STORE_VALUE1) {
            let (Some(at), Some(value)) = (record.index.as_int(), record.value.as_float()) else {
                continue;
            };
            let vertex = usize::try_from(at)
                .ok()
                .and_then(|at| tokens.get(at))
                .and_then(|&t| usize::try_from(t).ok());
            if let Some(slot) = vertex.and_then(|v| values.get_mut(v)) {
                *slot = value;
            }
        }
        values
    }

    /// Copy of this mesh keeping only vertices a triangle references.
    ///
    /// Surviving vertices keep their relative order and triangles are
    /// renumbered. Face values carry over; storage and any retained stream
    /// address the old token stream and are dropped.
    pub fn compacted(&self) -> Mesh {
        let mut remap = vec![u32::MAX; self.vertices.len()];
        for &index in self.triangles.iter().flatten() {
            if let Some(slot) = remap.get_mut(index as usize) {
                *slot = 0;
            }
        }
        let mut vertices = Vec::new();
        for (old, slot) in remap.iter_mut().enumerate() {
            if *slot == 0 {
                *slot = vertices.len() as u32;
                vertices.push(self.vertices[old]);
            }
        }
        let triangles = self
            .triangles
            .iter()
            .map(|t| t.map(|i| remap.get(i as usize).copied().unwrap_or(i)))
            .collect();
        Mesh {
            flag: self.flag,
            time: self.time,
            surf: self.surf,
            vertices,
            triangles,
            face_values: self.face_values.clone(),
            storage: None,
            stream: None,
        }
    }

    /// Reads the mesh body after its `MESH` tag and assembles triangles.
    pub(crate) fn read(r: &mut Reader<'_>) -> Result<Self> {
        let vsize = count_from_i32("vertex", r.x, r.i32()?)?;
        let lsize = count_from_i32("index", r.x, r.i32()?)?;
        let flag = r.u32()?;
        let time = r.i16()?;
        let surf = r.i16()?;
        let vertices = r.f32x3_seq(vsize)?;
        let tokens_at = r.x;
        let tokens = r.i32_seq(lsize)?;
        let malformed = |fault: MeshFault| ImodError::MalformedMesh {
            offset: tokens_at + 4 * fault.token(),
            fault,
        };
        let triangles = assemble(&tokens, vertices.len()).map_err(malformed)?;
        let canonical = stream::canonical(&triangles, vertices.len()).map_err(malformed)?;
        tracing::debug!(
            vertices = vertices.len(),
            triangles = triangles.len(),
            retained = tokens != canonical,
            "mesh"
        );
        Ok(Self {
            flag,
            time,
            surf,
            vertices,
            triangles,
            face_values: None,
            storage: None,
            stream: (tokens != canonical).then_some(tokens),
        })
    }

    /// Tries to attach a `MEST` chunk read directly after this mesh.
    ///
    /// Returns `false` when the mesh already holds a chunk of that shape;
    /// the caller keeps the chunk opaque.
    pub(crate) fn attach_storage(
        &mut self,
        records: Vec<GeneralStorage>,
        offset: usize,
    ) -> Result<bool> {
        if !self.accepts_storage(&records) {
            return Ok(false);
        }
        match face_values(&records) {
            Some(values) if values.len() != self.triangles.len() => {
                Err(ImodError::MeshValueCountMismatch {
                    offset,
                    values: values.len(),
                    triangles: self.triangles.len(),
                })
            }
            Some(values) => {
                self.face_values = Some(values);
                Ok(true)
            }
            None => {
                self.storage = Some(records);
                Ok(true)
            }
        }
    }

    /// Whether a `MEST` chunk holding `records`, read right after this mesh
    /// as written, would attach to it.
    pub(crate) fn accepts_storage(&self, records: &[GeneralStorage]) -> bool {
        if self.storage.is_some() {
            return false;
        }
        face_values(records).is_none() || self.face_values.as_ref().map_or(true, Vec::is_empty)
    }

    /// Writes the `MESH` chunk followed by its face values and storage.
    pub(crate) fn write(&self, w: &mut Writer) -> Result<()> {
        let offset = w.len();
        if self.storage.as_deref().and_then(face_values).is_some() {
            return Err(ImodError::AmbiguousMeshStorage { offset });
        }
        if let Some(values) = &self.face_values {
            if values.len() != self.triangles.len() {
                return Err(ImodError::MeshValueCountMismatch {
                    offset,
                    values: values.len(),
                    triangles: self.triangles.len(),
                });
            }
        }
        let tokens = self
            .index_stream()
            .map_err(|fault| ImodError::MalformedMesh { offset, fault })?;
        w.buf(&ChunkTag::MESH.0);
        w.i32(count_to_i32("vertex", w.len(), self.vertices.len())?);
        w.i32(count_to_i32("index", w.len(), tokens.len())?);
        w.u32(self.flag);
        w.i16(self.time);
        w.i16(self.surf);
        for v in &self.vertices {
            w.f32x3(*v);
        }
        for t in &tokens {
            w.i32(*t);
        }
        if let Some(values) = self.face_values.as_ref().filter(|v| !v.is_empty()) {
            let records = values
                .iter()
                .enumerate()
                .map(|(i, &v)| {
                    let index = count_to_i32("face value", w.len(), i)?;
                    Ok(GeneralStorage::new(
                        GEN_STORE_VALUE1,
                        StoreValue::Int(index),
                        StoreValue::Float(v),
                    ))
                })
                .collect::<Result<Vec<_>>>()?;
            storage::write_storage(w, ChunkTag::MEST, &records)?;
        }
        if let Some(records) = &self.storage {
            storage::write_storage(w, ChunkTag::MEST, records)?;
        }
        Ok(())
    }
}

/// Values of a face value stream: type-10 records with an i32 index and an
/// f32 value whose indices run `0..n`.
fn face_values(records: &[GeneralStorage]) -> Option<Vec<f32>> {
    if records.is_empty() {
        return None;
    }
    records
        .iter()
        .enumerate()
        .map(|(i, record)| match (record.kind, record.flags, record.index, record.value) {
            (GEN_STORE_VALUE1, FACE_VALUE_FLAGS, StoreValue::Int(at), StoreValue::Float(v))
                if usize::try_from(at) == Ok(i) =>
            {
                Some(v)
            }
            _ => None,
        })
        .collect()
}
