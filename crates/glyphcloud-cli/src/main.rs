//! Entry point for the `glyphcloud` command-line tool.

mod camera;
mod config;
mod input;

use crate::config::{Command, Config, PickArgs};
use crate::input::{collect_inputs, load_point_set};
use anyhow::{bail, Context, Result};
use clap::Parser;
use glyphcloud::{GeometryBuilder, GlyphTable, ModelDefaults};
use glyphcloud_wgpu::HeadlessRenderer;
use std::path::PathBuf;

fn main() -> Result<()> {
    // Initialize logging; default to "info" if RUST_LOG is unset.
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("info")
    ).init();

    let config = Config::parse();
    log::debug!("configuration: {:?}", config);

    match config.command {
        Command::Inspect { inputs } => inspect(&inputs),
        Command::Pick(args) => pick(&args),
    }
}

fn inspect(inputs: &[PathBuf]) -> Result<()> {
    let catalog = GlyphTable::builtin();
    let defaults = ModelDefaults::default();
    let builder = GeometryBuilder::new(&catalog, &defaults);

    let paths = collect_inputs(inputs);
    let mut expanded = 0usize;

    for path in &paths {
        let result = load_point_set(path).and_then(|opts| {
            let layer = opts.pick_id.unwrap_or(0);
            Ok((opts.orthographic.unwrap_or(false), layer, builder.build(&opts, layer)?))
        });

        match result {
            Ok((orthographic, layer, geometry)) => {
                expanded += 1;
                let b = geometry.bounds;
                println!(
                    "{}: points={} vertices={} layer={} orthographic={} bounds=({:.3},{:.3},{:.3})..({:.3},{:.3},{:.3})",
                    path.display(),
                    geometry.point_count,
                    geometry.vertex_count(),
                    layer,
                    orthographic,
                    b.lower[0], b.lower[1], b.lower[2],
                    b.upper[0], b.upper[1], b.upper[2],
                );
            }
            Err(err) => log::error!("{}: {:#}", path.display(), err),
        }
    }

    if expanded == 0 {
        bail!("no point set could be expanded");
    }
    log::info!("Expanded {}/{} point sets", expanded, paths.len());
    Ok(())
}

fn pick(args: &PickArgs) -> Result<()> {
    let options = load_point_set(&args.input)?;
    let renderer = HeadlessRenderer::new_blocking([args.width, args.height])?;

    let mut model = renderer
        .create_model(ModelDefaults::default(), &GlyphTable::builtin(), &options)
        .with_context(|| format!("failed to build {}", args.input.display()))?;

    let camera = camera::fit_bounds(&model.bounds(), renderer.size());
    if let Some(positions) = &options.position {
        for (i, p) in positions.iter().enumerate().take(8) {
            log::debug!("point {} at pixel {:?}", i, camera::project_to_pixel(&camera, *p));
        }
    }

    model.set_highlight(args.highlight, Some(args.highlight_color));
    renderer.clear();
    model.draw(&camera);
    model.draw_for_picking(&camera);

    let sampled = renderer.read_pick_id(args.x, args.y)?;
    let color = renderer.read_color(args.x, args.y)?;
    log::info!(
        "pixel ({}, {}): id={:#010x} color={:?}",
        args.x,
        args.y,
        sampled,
        color
    );

    match model.resolve_pick(sampled) {
        Some(index) => println!("{}", index),
        None => println!("miss"),
    }

    model.dispose();
    Ok(())
}
