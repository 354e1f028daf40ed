//! Block codes, the block/material table, culling and material naming.
#![forbid(unsafe_code)]

pub mod boundary;
pub mod config;
pub mod material;
pub mod mtl;
pub mod naming;
pub mod registry;
pub mod types;

pub use boundary::{BoundaryLocator, SolidAir};
pub use material::MaterialResolver;
pub use naming::{MaterialNamer, NamingPolicy};
pub use registry::BlockRegistry;
pub use types::{Block, Face, Opacity, PatternPos, TexRect};
