//! Chunk to OBJ meshing: boundary scan, vertical run merging and the two
//! reference-counted coordinate pools that keep output compact.
#![forbid(unsafe_code)]

pub mod builder;
pub mod config;
pub mod constants;
pub mod face;
pub mod fixed;
pub mod pool;
pub mod run;
pub mod texcoord_pool;
pub mod vertex_pool;
pub mod writer;

pub use builder::{ChunkMesher, MeshFace};
pub use config::MeshConfig;
pub use texcoord_pool::{AtlasLayout, TexCoordPool};
pub use vertex_pool::{Vertex, VertexPool};
pub use writer::{ChunkObj, FaceGroup, MeshStats, NumberedFace, ObjWriter};
