//! Reader and writer for IMOD binary model files (`.mod`).
//!
//! A model file is a fixed header followed by a sequence of tagged chunks:
//! objects with their contours and meshes, slicer angles, transforms,
//! general storage and any number of chunks this crate does not interpret.
//! [`decode`] turns a whole file buffer into a [`Model`]; [`encode`] writes
//! it back. Unknown chunks are kept verbatim at their original position,
//! so a decoded file re-encodes to the same bytes.
//!
//! ```
//! use imod_model::{decode, encode, Contour, Model, Object};
//!
//! let mut object = Object::new("membrane").unwrap();
//! object.contours.push(Contour::new(vec![[10.0, 20.0, 3.0], [11.0, 21.0, 3.0]]));
//! let mut model = Model::new();
//! model.objects.push(object);
//!
//! let bytes = encode(&model).unwrap();
//! assert_eq!(&bytes[..4], b"IMOD");
//! assert_eq!(decode(&bytes).unwrap(), model);
//! ```

pub mod chunk;
pub mod config;
pub mod contour;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod fixed_str;
pub mod header;
pub mod material;
pub mod mesh;
pub mod minx;
pub mod model;
pub mod object;
pub mod slicer;
pub mod storage;
pub mod table;

pub use chunk::{ChunkTag, OpaqueChunk};
pub use config::DecodeOptions;
pub use contour::Contour;
pub use decoder::ModelDecoder;
pub use encoder::ModelEncoder;
pub use error::{ImodError, Result};
pub use fixed_str::FixedStr;
pub use header::{FileId, ModelHeader};
pub use material::Material;
pub use mesh::{Mesh, MeshFault};
pub use minx::Minx;
pub use model::Model;
pub use object::{Object, ObjectHeader};
pub use slicer::SlicerAngle;
pub use storage::{GeneralStorage, StoreValue, GEN_STORE_VALUE1};
pub use table::{project, Annotation, Rows};

/// Decodes a model file with default options.
pub fn decode(data: &[u8]) -> Result<Model> {
    ModelDecoder::new().decode(data)
}

/// Decodes a model file with the given options.
pub fn decode_with(data: &[u8], options: DecodeOptions) -> Result<Model> {
    ModelDecoder::with_options(options).decode(data)
}

/// Encodes a model to file bytes.
pub fn encode(model: &Model) -> Result<Vec<u8>> {
    ModelEncoder::new().encode(model)
}
