//! Frame buffer and render drivers
//!
//! Two drivers share the same per-row kernel: a rayon-parallel renderer for
//! full frames, and a progressive renderer that produces a bounded batch of
//! rows per step so a host can interleave redraws and cancel mid-frame.

use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use image::Rgb;
use indicatif::ProgressBar;
use log::info;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;

use crate::cameras::Camera;
use crate::objects::HittableList;
use crate::{utils, Color};

/// Knobs for a render pass
#[derive(Debug, Clone)]
pub struct RenderSettings {
    pub image_width: u32,
    pub image_height: u32,
    pub samples_per_pixel: u32,
    pub max_depth: u32,
    /// Base seed; every row derives its own generator from it
    pub seed: u64,
}

/// RGBA pixel storage, top-left origin, row-major, alpha always 255
pub struct FrameBuffer {
    width: u32,
    height: u32,
    data: Vec<u8>,
}
impl FrameBuffer {
    pub fn new(width: u32, height: u32) -> Self {
        assert!(width >= 1 && height >= 1, "frame dimensions must be positive");
        Self {
            width,
            height,
            data: vec![0; (width * height * 4) as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixel(&self, i: u32, j: u32) -> [u8; 4] {
        let start = ((j * self.width + i) * 4) as usize;
        [
            self.data[start],
            self.data[start + 1],
            self.data[start + 2],
            self.data[start + 3],
        ]
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    fn set_row(&mut self, j: u32, row: &[u8]) {
        let start = (j * self.width * 4) as usize;
        self.data[start..start + row.len()].copy_from_slice(row);
    }

    /// Write the frame as a plain-text PPM (P3) image
    ///
    /// PPM puts its origin at the bottom-left, so rows go out bottom-to-top.
    pub fn write_ppm<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "P3")?;
        writeln!(out, "{} {}", self.width, self.height)?;
        writeln!(out, "255")?;
        for j in (0..self.height).rev() {
            for i in 0..self.width {
                let [r, g, b, _] = self.pixel(i, j);
                writeln!(out, "{r} {g} {b}")?;
            }
        }
        Ok(())
    }
}

/// Drives the integrator across every pixel and sample
pub struct Renderer {
    camera: Camera,
    world: HittableList,
    settings: RenderSettings,
}
impl Renderer {
    pub fn new(camera: Camera, world: HittableList, settings: RenderSettings) -> Self {
        assert!(
            settings.image_width >= 1 && settings.image_height >= 1,
            "image dimensions must be positive"
        );
        assert!(
            settings.samples_per_pixel >= 1,
            "samples per pixel must be positive"
        );
        Self {
            camera,
            world,
            settings,
        }
    }

    pub fn settings(&self) -> &RenderSettings {
        &self.settings
    }

    /// Render the full frame across all cores
    ///
    /// Rows are independent work units with disjoint output regions, so no
    /// synchronization is needed beyond assembling the finished rows.
    pub fn render(&self) -> FrameBuffer {
        let s = &self.settings;
        info!(
            "Rendering {}x{} at {} samples/pixel on {} threads",
            s.image_width,
            s.image_height,
            s.samples_per_pixel,
            rayon::current_num_threads()
        );
        let start = Instant::now();
        let bar = ProgressBar::new(s.image_height as u64);

        let rows: Vec<Vec<u8>> = (0..s.image_height)
            .into_par_iter()
            .map(|j| {
                let mut rng = self.row_rng(j);
                let row = self.render_row(j, &mut rng);
                bar.inc(1);
                row
            })
            .collect();
        bar.finish();

        let mut frame = FrameBuffer::new(s.image_width, s.image_height);
        for (j, row) in rows.iter().enumerate() {
            frame.set_row(j as u32, row);
        }
        info!("Frame finished in {:.2?}", start.elapsed());
        frame
    }

    /// Each row gets its own generator so results do not depend on thread
    /// scheduling; the stride decorrelates neighboring rows
    fn row_rng(&self, j: u32) -> StdRng {
        let stream = (j as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15);
        StdRng::seed_from_u64(self.settings.seed.wrapping_add(stream))
    }

    fn render_row(&self, j: u32, rng: &mut StdRng) -> Vec<u8> {
        let s = &self.settings;
        let mut row = Vec::with_capacity((s.image_width * 4) as usize);
        let width_span = (s.image_width - 1).max(1) as f64;
        let height_span = (s.image_height - 1).max(1) as f64;

        for i in 0..s.image_width {
            let mut color = Color::zeros();
            for _ in 0..s.samples_per_pixel {
                let u = (i as f64 + rng.gen::<f64>()) / width_span;
                // Row 0 sits at the top of the frame; the camera's t runs upward
                let v = ((s.image_height - 1 - j) as f64 + rng.gen::<f64>()) / height_span;
                let ray = self.camera.get_ray(u, v);
                color += ray.get_color(&self.world, s.max_depth, rng);
            }
            let Rgb([r, g, b]) = utils::get_pixel(&color, s.samples_per_pixel);
            row.extend_from_slice(&[r, g, b, 255]);
        }
        row
    }
}

/// Outcome of one progressive step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderStatus {
    InProgress,
    Complete,
    Cancelled,
}

/// Cooperative row-batched renderer
///
/// Renders a bounded batch of rows per `step` call and checks the cancel
/// flag at the batch boundary. Rows are seeded the same way as the parallel
/// renderer, so a completed progressive frame is byte-identical to
/// `Renderer::render` output for the same seed.
pub struct ProgressiveRenderer<'a> {
    renderer: &'a Renderer,
    frame: FrameBuffer,
    next_row: u32,
    rows_per_step: u32,
    cancel: Arc<AtomicBool>,
}
impl<'a> ProgressiveRenderer<'a> {
    pub fn new(renderer: &'a Renderer, rows_per_step: u32) -> Self {
        assert!(rows_per_step >= 1, "batch size must be positive");
        let s = renderer.settings();
        Self {
            frame: FrameBuffer::new(s.image_width, s.image_height),
            next_row: 0,
            rows_per_step,
            cancel: Arc::new(AtomicBool::new(false)),
            renderer,
        }
    }

    /// Shared flag a host can set to abort the render at the next step
    pub fn cancel_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancel)
    }

    /// The partially rendered frame; untouched rows are zeroed
    pub fn frame(&self) -> &FrameBuffer {
        &self.frame
    }

    pub fn is_complete(&self) -> bool {
        self.next_row >= self.renderer.settings().image_height
    }

    /// Render the next batch of rows
    pub fn step(&mut self) -> RenderStatus {
        if self.cancel.load(Ordering::Relaxed) {
            return RenderStatus::Cancelled;
        }
        let height = self.renderer.settings().image_height;
        let end = (self.next_row + self.rows_per_step).min(height);
        for j in self.next_row..end {
            let mut rng = self.renderer.row_rng(j);
            let row = self.renderer.render_row(j, &mut rng);
            self.frame.set_row(j, &row);
        }
        self.next_row = end;
        if self.next_row >= height {
            RenderStatus::Complete
        } else {
            RenderStatus::InProgress
        }
    }

    pub fn into_frame(self) -> FrameBuffer {
        self.frame
    }
}
