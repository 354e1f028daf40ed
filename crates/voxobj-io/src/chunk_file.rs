use std::fs;
use std::io::{Read, Write};
use std::path::Path;

use fastnbt::ByteArray;
use flate2::Compression;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use serde::{Deserialize, Serialize};
use voxobj_blocks::Block;
use voxobj_chunk::{CHUNK_CELLS, ChunkBuf, ChunkCoord};

use crate::IoError;

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Root compound of a chunk file. Only the fields meshing needs are read.
#[derive(Serialize, Deserialize, Debug)]
pub struct ChunkNbt {
    #[serde(rename = "Level")]
    pub level: LevelNbt,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct LevelNbt {
    #[serde(rename = "xPos")]
    pub x_pos: i32,
    #[serde(rename = "zPos")]
    pub z_pos: i32,
    /// One id byte per cell, in column order.
    #[serde(rename = "Blocks")]
    pub blocks: ByteArray,
    /// One metadata nibble per cell, low nibble first.
    #[serde(rename = "Data")]
    pub data: ByteArray,
}

/// Decodes a chunk file's contents, gunzipping first when the bytes carry
/// the gzip magic.
pub fn decode_chunk(bytes: &[u8]) -> Result<ChunkBuf, IoError> {
    let raw;
    let nbt = if bytes.starts_with(&GZIP_MAGIC) {
        let mut out = Vec::with_capacity(bytes.len() * 4);
        GzDecoder::new(bytes).read_to_end(&mut out)?;
        raw = out;
        raw.as_slice()
    } else {
        bytes
    };
    let file: ChunkNbt = fastnbt::from_bytes(nbt)?;
    chunk_from_level(file.level)
}

fn chunk_from_level(level: LevelNbt) -> Result<ChunkBuf, IoError> {
    let coord = ChunkCoord::new(level.x_pos, level.z_pos);
    let ids = level.blocks.into_inner();
    let meta = level.data.into_inner();
    if ids.len() != CHUNK_CELLS {
        return Err(format!(
            "chunk {}: Blocks holds {} bytes, expected {}",
            coord,
            ids.len(),
            CHUNK_CELLS
        )
        .into());
    }
    if meta.len() != CHUNK_CELLS / 2 {
        return Err(format!(
            "chunk {}: Data holds {} bytes, expected {}",
            coord,
            meta.len(),
            CHUNK_CELLS / 2
        )
        .into());
    }
    let blocks = ids
        .iter()
        .enumerate()
        .map(|(i, &id)| {
            let packed = meta[i / 2] as u8;
            let nibble = if i % 2 == 0 { packed & 0x0f } else { packed >> 4 };
            Block::new(id as u8, nibble)
        })
        .collect();
    Ok(ChunkBuf::from_blocks(coord, blocks))
}

pub fn read_chunk_file(path: impl AsRef<Path>) -> Result<ChunkBuf, IoError> {
    let path = path.as_ref();
    let bytes = fs::read(path).map_err(|e| format!("{}: {}", path.display(), e))?;
    decode_chunk(&bytes).map_err(|e| format!("{}: {}", path.display(), e).into())
}

/// Gzipped NBT for a chunk, in the layout [`decode_chunk`] reads.
pub fn encode_chunk(chunk: &ChunkBuf) -> Result<Vec<u8>, IoError> {
    let ids = chunk.blocks.iter().map(|b| b.id as i8).collect();
    let meta = chunk
        .blocks
        .chunks(2)
        .map(|pair| {
            let lo = pair[0].data & 0x0f;
            let hi = pair.get(1).map_or(0, |b| b.data & 0x0f);
            (lo | hi << 4) as i8
        })
        .collect();
    let file = ChunkNbt {
        level: LevelNbt {
            x_pos: chunk.coord.cx,
            z_pos: chunk.coord.cz,
            blocks: ByteArray::new(ids),
            data: ByteArray::new(meta),
        },
    };
    let nbt = fastnbt::to_bytes(&file)?;
    let mut gz = GzEncoder::new(Vec::new(), Compression::default());
    gz.write_all(&nbt)?;
    Ok(gz.finish()?)
}
