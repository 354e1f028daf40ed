mod cli;
mod config;
mod export;

use std::error::Error;

use clap::Parser;
use voxobj_blocks::BlockRegistry;
use voxobj_io::WorldIndex;

use cli::CliArgs;
use config::ExportConfig;

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = CliArgs::parse();

    let mut cfg = match &args.config {
        Some(path) => ExportConfig::load(path)?,
        None => ExportConfig::default(),
    };
    cfg.apply_cli_overrides(&args);
    log::debug!("export config: {:?}", cfg);

    let registry = match &cfg.blocks {
        Some(path) => {
            log::info!("loading block table {}", path.display());
            BlockRegistry::load_from_path(path).map_err(|e| format!("{}: {}", path.display(), e))?
        }
        None => BlockRegistry::builtin(),
    };

    let mut index = WorldIndex::scan(&args.world).map_err(|e| e as Box<dyn Error>)?;
    log::info!("found {} chunk files under {}", index.len(), args.world.display());
    if let Some((center, radius)) = args.selection() {
        index = index.select(center, radius);
        log::info!("{} chunks within {} of {}", index.len(), radius, center);
    }
    if index.is_empty() {
        return Err(format!("no chunks to export under {}", args.world.display()).into());
    }

    let summary = export::export(&index, &registry, &cfg, &args.output).map_err(|e| e as Box<dyn Error>)?;
    log::info!(
        "wrote {} and {}: {} chunks ({} empty, {} skipped), {} vertices, {} texcoords, {} faces",
        args.output.display(),
        export::mtl_path(&args.output).display(),
        summary.chunks,
        summary.empty,
        summary.skipped,
        summary.stats.vertices,
        summary.stats.texcoords,
        summary.stats.faces
    );
    Ok(())
}
