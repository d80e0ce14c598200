//! Command-line front end for the path tracer

use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use log::info;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use helios::prelude::*;
use helios::render::{RenderSettings, Renderer};
use helios::scenes;

#[derive(Parser)]
#[command(name = "helios", about = "A sphere-scene CPU path tracer")]
struct Args {
    /// Image width in pixels
    #[arg(long, default_value_t = 1200)]
    width: u32,

    /// Image height in pixels
    #[arg(long, default_value_t = 675)]
    height: u32,

    /// Samples per pixel
    #[arg(short, long, default_value_t = 100)]
    samples_per_pixel: u32,

    /// Maximum ray bounce depth
    #[arg(long, default_value_t = 10)]
    max_depth: u32,

    /// Seed for scene generation and sampling (random when omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// Camera position, overriding the scene's viewpoint
    #[arg(long, num_args = 3, value_names = ["X", "Y", "Z"], allow_negative_numbers = true)]
    look_from: Option<Vec<f64>>,

    /// Load the scene from a YAML file instead of generating one
    #[arg(long)]
    scene: Option<PathBuf>,

    /// Write the scene description to a YAML file before rendering
    #[arg(long)]
    save_scene: Option<PathBuf>,

    /// Output image path (.ppm for plain text, anything else goes through image)
    #[arg(short, long, default_value = "render.png")]
    output: PathBuf,
}

fn main() -> Result<()> {
    let args = Args::parse();
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let seed = args.seed.unwrap_or_else(|| rand::thread_rng().gen());
    info!("Seed {seed}");

    let mut scene = match &args.scene {
        Some(path) => scenes::load_scene(path)?,
        None => scenes::random_scene(&mut StdRng::seed_from_u64(seed)),
    };
    if let Some(look_from) = &args.look_from {
        scene.camera.look_from = Vec3::new(look_from[0], look_from[1], look_from[2]).into();
    }
    if let Some(path) = &args.save_scene {
        scenes::save_scene(path, &scene)?;
        info!("Scene written to {}", path.display());
    }

    let aspect_ratio = args.width as f64 / args.height as f64;
    let camera = Camera::from_config(&scene.camera, aspect_ratio);
    let world = HittableList::from_config(scene.world);
    info!("Scene holds {} objects", world.len());

    let renderer = Renderer::new(
        camera,
        world,
        RenderSettings {
            image_width: args.width,
            image_height: args.height,
            samples_per_pixel: args.samples_per_pixel,
            max_depth: args.max_depth,
            seed,
        },
    );
    let frame = renderer.render();

    match args.output.extension().and_then(|e| e.to_str()) {
        Some("ppm") => {
            let file = File::create(&args.output)
                .with_context(|| format!("creating {}", args.output.display()))?;
            let mut out = BufWriter::new(file);
            frame.write_ppm(&mut out)?;
        }
        _ => {
            let image = image::RgbaImage::from_raw(args.width, args.height, frame.into_bytes())
                .ok_or_else(|| anyhow!("frame buffer does not match the image dimensions"))?;
            image
                .save(&args.output)
                .with_context(|| format!("writing {}", args.output.display()))?;
        }
    }
    info!("Image written to {}", args.output.display());
    Ok(())
}
