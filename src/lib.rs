//! Path Tracing Library
//!
//! A CPU Monte-Carlo path tracer over spherical primitives with diffuse,
//! metallic and refractive materials.

use nalgebra::Vector3;
use rand::RngCore;

pub mod objects;
use objects::Hittable;

pub mod materials;
use materials::Scatterable;

pub mod cameras;
pub mod render;
pub mod scenes;
pub mod utils;

pub type Vec3 = Vector3<f64>;
pub type Point = Vec3;
pub type Color = Vec3;
pub type Material = Box<dyn Scatterable + Send + Sync>;

/// Prelude
pub mod prelude {
    pub use crate::cameras::Camera;
    pub use crate::materials::{Dielectric, Lambertian, Metal};
    pub use crate::objects::{HittableList, Sphere};
    pub use crate::{Color, Material, Point, Ray, Vec3};
}

/// The ray in ray tracing
#[derive(Debug)]
pub struct Ray {
    pub orig: Point,
    pub dir: Vec3,
}
impl Ray {
    pub fn new(orig: Point, dir: Vec3) -> Self {
        Self { orig, dir }
    }

    pub fn get(&self, t: f64) -> Point {
        self.orig + t * self.dir
    }

    /// Estimate the radiance arriving along this ray
    ///
    /// Intersect, scatter, recurse. Misses blend white and sky blue
    /// depending on height of y.
    pub fn get_color(&self, obj: &impl Hittable, depth: u32, rng: &mut dyn RngCore) -> Color {
        // If we have exceeded the ray bounce limit, no more light is gathered
        if depth == 0 {
            return Color::zeros();
        }

        // Put a minimum of 0.001 to reduce shadow acne
        if let Some(hr) = obj.try_hit(self, 0.001, f64::MAX) {
            if let Some(sr) = hr.material.try_scatter(self, &hr, rng) {
                return sr
                    .attenuation
                    .component_mul(&sr.scattered.get_color(obj, depth - 1, rng));
            }
            return Color::zeros();
        }
        let unit_direction = self.dir.normalize();
        let t = 0.5 * (unit_direction[1] + 1.0);
        (1.0 - t) * Color::new(1.0, 1.0, 1.0) + t * Color::new(0.7, 0.8, 1.0)
    }
}
