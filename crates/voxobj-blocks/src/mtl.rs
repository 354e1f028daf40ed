use std::collections::HashSet;
use std::io::{self, Write};

use super::naming::{DEFAULT_MATERIAL, MaterialNamer};
use super::registry::{BlockRegistry, Variant};
use super::types::Block;

/// Texture bindings for the material library.
#[derive(Clone, Debug)]
pub struct MtlOptions<'a> {
    /// Atlas image bound to every non-repeating material.
    pub atlas: &'a str,
    /// When false, materials carry colors only.
    pub textures: bool,
}

/// Writes a `.mtl` library covering every table entry in both its single
/// tile and repeating form. Materials whose names collide under the namer
/// are written once. Returns the number of materials written.
pub fn write_mtl<W: Write>(
    w: &mut W,
    reg: &BlockRegistry,
    namer: &dyn MaterialNamer,
    opts: &MtlOptions<'_>,
) -> io::Result<usize> {
    let mut written = HashSet::new();
    for ty in reg.iter() {
        for v in ty.appearances() {
            let block = Block::new(v.id, v.data.unwrap_or(0));
            for repeating in [false, true] {
                let name = namer.name(block, repeating);
                if !written.insert(name.clone()) {
                    continue;
                }
                let map = if repeating { v.repeating_texture.as_str() } else { opts.atlas };
                write_material(w, &name, v, opts.textures.then_some(map))?;
            }
        }
    }
    if written.insert(DEFAULT_MATERIAL.to_string()) {
        writeln!(w, "newmtl {}", DEFAULT_MATERIAL)?;
        if opts.textures {
            writeln!(w, "map_Kd {}", opts.atlas)?;
        }
        writeln!(w)?;
    }
    Ok(written.len())
}

fn write_material<W: Write>(w: &mut W, name: &str, v: &Variant, map: Option<&str>) -> io::Result<()> {
    let [r, g, b, a] = v.color.map(|c| f64::from(c) / 255.0);
    writeln!(w, "# {}", v.name)?;
    writeln!(w, "newmtl {}", name)?;
    writeln!(w, "Kd {:.4} {:.4} {:.4}", r, g, b)?;
    writeln!(w, "d {:.4}", a)?;
    writeln!(w, "illum 1")?;
    if let Some(map) = map {
        writeln!(w, "map_Kd {}", map)?;
    }
    writeln!(w)
}
