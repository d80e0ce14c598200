//! Utils
//!
//! Random sampling, shading math, and color conversion.

use image::Rgb;
use nalgebra::Vector3;
use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};
type Vec3 = Vector3<f64>;
use super::Color;

/// A vector that serializes as a plain `x,y,z` mapping
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SerdeVector {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}
impl From<SerdeVector> for Vec3 {
    fn from(v: SerdeVector) -> Self {
        Vec3::new(v.x, v.y, v.z)
    }
}
impl From<Vec3> for SerdeVector {
    fn from(v: Vec3) -> Self {
        Self {
            x: v[0],
            y: v[1],
            z: v[2],
        }
    }
}

/// Generate a vector with each component uniform in [min, max)
pub fn random_in_range(rng: &mut dyn RngCore, min: f64, max: f64) -> Vec3 {
    Vec3::new(
        rng.gen_range(min..max),
        rng.gen_range(min..max),
        rng.gen_range(min..max),
    )
}

/// Generate a color with each channel uniform in [0, 1)
pub fn random_color(rng: &mut dyn RngCore) -> Color {
    Color::new(rng.gen(), rng.gen(), rng.gen())
}

/// Compute a random vector inside the unit ball
///
/// Rejection sample the enclosing cube until the point lands inside.
/// Acceptance probability is pi/6, so the loop terminates after ~2 draws
/// in expectation; capping it would skew the distribution.
pub fn random_in_unit_sphere(rng: &mut dyn RngCore) -> Vec3 {
    loop {
        let p = random_in_range(rng, -1.0, 1.0);
        if p.norm_squared() < 1.0 {
            return p;
        }
    }
}

/// Compute a random unit vector, uniform over the sphere surface
pub fn random_unit_vector(rng: &mut dyn RngCore) -> Vec3 {
    random_in_unit_sphere(rng).normalize()
}

/// Mirror-reflect `v` about the unit normal `n`
pub fn reflect(v: &Vec3, n: &Vec3) -> Vec3 {
    v - 2.0 * v.dot(n) * n
}

/// Refract the unit direction `uv` through a surface with unit normal `n`
///
/// `etai_over_etat` is the ratio of refraction indices across the
/// interface. `n` must oppose `uv`; the caller orients both.
pub fn refract(uv: &Vec3, n: &Vec3, etai_over_etat: f64) -> Vec3 {
    let cos_theta = (-uv).dot(n).min(1.0);
    let r_out_perp = etai_over_etat * (uv + cos_theta * n);
    let r_out_parallel = -(1.0 - r_out_perp.norm_squared()).abs().sqrt() * n;
    r_out_perp + r_out_parallel
}

/// Resolve an accumulated sample sum into a displayable pixel
pub fn get_pixel(color: &Color, samples_per_pixel: u32) -> Rgb<u8> {
    let scale = 1.0 / samples_per_pixel as f64;

    // Divide the color by the number of samples and gamma-correct for gamma = 2.0
    let r = scale_color((scale * color[0]).sqrt());
    let g = scale_color((scale * color[1]).sqrt());
    let b = scale_color((scale * color[2]).sqrt());

    Rgb([r, g, b])
}

/// scale the color to between 0 and 255
fn scale_color(val: f64) -> u8 {
    (256.0 * val.clamp(0.0, 0.999)) as u8
}
