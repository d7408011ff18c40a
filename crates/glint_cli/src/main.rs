//! `glint <scene.json> <output.png>`

mod cli;

use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use glint_renderer::{compute_light_maps, load_scene, render};

use cli::Args;

fn main() -> Result<()> {
    let args = Args::parse();

    env_logger::Builder::from_default_env()
        .filter_level(args.log_level.into())
        .init();

    if let Some(threads) = args.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .context("Failed to configure the worker pool")?;
    }

    let scene = load_scene(&args.scene)
        .with_context(|| format!("Failed to load scene {}", args.scene.display()))?;
    log::info!(
        "Loaded {}: {} objects, {} lights, {}x{} {:?}",
        args.scene.display(),
        scene.object_count(),
        scene.light_count(),
        scene.camera.image_width,
        scene.camera.image_height,
        scene.config.mode
    );

    let start = Instant::now();
    let light_maps = compute_light_maps(&scene);
    if !light_maps.is_empty() {
        log::info!("Refracted shadows computed in {:.2?}", start.elapsed());
    }

    let image = render(&scene, &light_maps);
    log::info!("Rendered in {:.2?}", start.elapsed());

    image
        .save_png(&args.output)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;
    log::info!("Saved {}", args.output.display());
    Ok(())
}
