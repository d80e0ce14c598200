//! Cameras and configs for cameras
use crate::utils::SerdeVector;
use crate::{Point, Ray, Vec3};
use serde::{Deserialize, Serialize};

/// Camera Config
///
/// The aspect ratio is supplied at build time, derived from the output
/// image dimensions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CameraConfig {
    pub look_from: SerdeVector,
    pub look_at: SerdeVector,
    pub v_up: SerdeVector,
    pub vertical_fov_deg: f64,
}

/// Pinhole camera
///
/// Maps normalized image-plane coordinates to world-space rays.
#[derive(Debug)]
pub struct Camera {
    origin: Point,
    lower_left_corner: Point,
    horizontal: Vec3,
    vertical: Vec3,
}
impl Camera {
    pub fn new(
        look_from: Point,
        look_at: Point,
        v_up: Vec3,
        vertical_fov_deg: f64,
        aspect_ratio: f64,
    ) -> Self {
        // Establish the viewport
        let theta = vertical_fov_deg.to_radians();
        let h = (theta / 2.0).tan();
        let viewport_height = 2.0 * h;
        let viewport_width = aspect_ratio * viewport_height;

        // Calculate the viewing vectors
        let w = (look_from - look_at).normalize();
        let u = (v_up.cross(&w)).normalize();
        let v = w.cross(&u);

        let origin = look_from;
        let horizontal = viewport_width * u;
        let vertical = viewport_height * v;
        let lower_left_corner = origin - horizontal / 2.0 - vertical / 2.0 - w;

        Self {
            origin,
            lower_left_corner,
            horizontal,
            vertical,
        }
    }

    pub fn from_config(config: &CameraConfig, aspect_ratio: f64) -> Self {
        Self::new(
            config.look_from.into(),
            config.look_at.into(),
            config.v_up.into(),
            config.vertical_fov_deg,
            aspect_ratio,
        )
    }

    /// Build the ray through normalized viewport coordinates (s, t)
    ///
    /// s runs left to right, t bottom to top, both in [0, 1].
    pub fn get_ray(&self, s: f64, t: f64) -> Ray {
        Ray::new(
            self.origin,
            self.lower_left_corner + s * self.horizontal + t * self.vertical - self.origin,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn center_ray_points_at_the_target() {
        let look_from = Point::new(13.0, 2.0, 3.0);
        let look_at = Point::zeros();
        let camera = Camera::new(look_from, look_at, Vec3::new(0.0, 1.0, 0.0), 20.0, 16.0 / 9.0);

        let ray = camera.get_ray(0.5, 0.5);
        assert_eq!(ray.orig, look_from);
        let toward_target = (look_at - look_from).normalize();
        assert!(ray.dir.normalize().dot(&toward_target) > 1.0 - 1e-9);
    }

    #[test]
    fn viewport_spans_the_vertical_fov() {
        let camera = Camera::new(
            Point::zeros(),
            Point::new(0.0, 0.0, -1.0),
            Vec3::new(0.0, 1.0, 0.0),
            90.0,
            1.0,
        );

        // At 90 degrees the half-height equals the focal distance
        let top = camera.get_ray(0.5, 1.0).dir.normalize();
        let bottom = camera.get_ray(0.5, 0.0).dir.normalize();
        let spread = top.dot(&bottom).acos().to_degrees();
        assert!((spread - 90.0).abs() < 1e-6);
    }

    #[test]
    fn corner_rays_differ() {
        let camera = Camera::new(
            Point::zeros(),
            Point::new(0.0, 0.0, -1.0),
            Vec3::new(0.0, 1.0, 0.0),
            45.0,
            16.0 / 9.0,
        );
        let a = camera.get_ray(0.0, 0.0);
        let b = camera.get_ray(1.0, 1.0);
        assert!((a.dir.normalize() - b.dir.normalize()).norm() > 1e-3);
    }
}
