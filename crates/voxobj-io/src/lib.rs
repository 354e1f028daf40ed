//! Reading chunk files: gzip/NBT decoding and world directory indexing.
#![forbid(unsafe_code)]

pub mod chunk_file;
pub mod world;

pub use chunk_file::{decode_chunk, encode_chunk, read_chunk_file};
pub use world::{WorldIndex, chunk_file_name, parse_chunk_file_name};

/// Errors crossing worker threads.
pub type IoError = Box<dyn std::error::Error + Send + Sync>;
