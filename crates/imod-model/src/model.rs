//! The decoded object graph.

use crate::chunk::OpaqueChunk;
use crate::header::{FileId, ModelHeader};
use crate::minx::Minx;
use crate::object::Object;
use crate::slicer::SlicerAngle;
use crate::storage::GeneralStorage;

/// Kind of item at one position of the top-level chunk sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ModelSlot {
    Object,
    Opaque,
    SlicerAngle,
    Minx,
    Storage,
}

/// A whole IMOD model file.
///
/// Counts stored in the file (objects, contours, points, vertices, chunk
/// sizes) are not kept; they are derived from the collections on encode.
/// Top-level chunks are written back in the order they were read.
///
/// Equality compares floats by value, so a model holding a NaN anywhere is
/// never equal to itself. Float bit patterns, NaN payloads included, do
/// survive a round trip; compare encoded bytes for such models.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Model {
    pub id: FileId,
    pub header: ModelHeader,
    pub objects: Vec<Object>,
    pub slicer_angles: Vec<SlicerAngle>,
    pub minx: Option<Minx>,
    /// Records from the model's `MOST` chunk.
    pub storage: Option<Vec<GeneralStorage>>,
    /// Top-level chunks kept verbatim, `VIEW` included.
    pub extra: Vec<OpaqueChunk>,
    /// Bytes after the `IEOF` marker.
    pub trailing: Vec<u8>,
    pub(crate) layout: Vec<ModelSlot>,
}

impl Model {
    pub fn new() -> Self {
        Self::default()
    }

    /// Iterates over every contour with its object and contour index.
    pub fn contours(&self) -> impl Iterator<Item = (usize, usize, &crate::Contour)> + '_ {
        self.objects.iter().enumerate().flat_map(|(o, object)| {
            object
                .contours
                .iter()
                .enumerate()
                .map(move |(c, contour)| (o, c, contour))
        })
    }

    /// Total number of triangles over all meshes.
    pub fn triangle_count(&self) -> usize {
        self.objects
            .iter()
            .flat_map(|o| &o.meshes)
            .map(|m| m.triangles.len())
            .sum()
    }

    /// Slot order used when no file order is recorded.
    pub(crate) fn canonical_layout(&self) -> Vec<ModelSlot> {
        let mut layout = Vec::new();
        layout.extend(self.objects.iter().map(|_| ModelSlot::Object));
        layout.extend(self.extra.iter().map(|_| ModelSlot::Opaque));
        layout.extend(self.slicer_angles.iter().map(|_| ModelSlot::SlicerAngle));
        if self.minx.is_some() {
            layout.push(ModelSlot::Minx);
        }
        if self.storage.is_some() {
            layout.push(ModelSlot::Storage);
        }
        layout
    }
}
