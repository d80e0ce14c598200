//! Implementation of materials

use crate::{objects::HitRecord, utils, utils::SerdeVector, Color, Material, Ray};
use dyn_clone::DynClone;
use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};

/// Material
///
/// The generator is threaded through so that scattering stays reproducible
/// under per-seed random streams.
pub trait Scatterable: DynClone {
    fn try_scatter(
        &self,
        ray_in: &Ray,
        hit_record: &HitRecord,
        rng: &mut dyn RngCore,
    ) -> Option<ScatterResult>;
}

/// Scatter Result
#[derive(Debug)]
pub struct ScatterResult {
    /// Attenuation Color
    pub attenuation: Color,
    /// Resulting Scattered Ray
    pub scattered: Ray,
}

/// Config for materials
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum MaterialConfig {
    Lambertian(LambertianConfig),
    Metal(MetalConfig),
    Dielectric(DielectricConfig),
}

/// Generator from config
pub struct Generator;
impl Generator {
    pub fn from_config(config: MaterialConfig) -> Material {
        match config {
            MaterialConfig::Lambertian(c) => Box::new(Lambertian::from_config(c)),
            MaterialConfig::Metal(c) => Box::new(Metal::from_config(c)),
            MaterialConfig::Dielectric(c) => Box::new(Dielectric::from_config(c)),
        }
    }
}

/// Lambertian Scatterer
#[derive(Debug, Clone)]
pub struct Lambertian {
    albedo: Color,
}
impl Lambertian {
    pub fn new(albedo: Color) -> Self {
        Self { albedo }
    }

    pub fn from_config(config: LambertianConfig) -> Self {
        Self::new(config.albedo.into())
    }
}
impl Scatterable for Lambertian {
    fn try_scatter(
        &self,
        _ray_in: &Ray,
        hit_record: &HitRecord,
        rng: &mut dyn RngCore,
    ) -> Option<ScatterResult> {
        let mut scatter_direction = hit_record.normal + utils::random_unit_vector(rng);

        // Protect against the normal and the random unit vector being exact opposites
        if scatter_direction.norm_squared() < 1e-8 {
            scatter_direction = hit_record.normal;
        }
        let scattered = Ray::new(hit_record.p, scatter_direction);
        Some(ScatterResult {
            attenuation: self.albedo,
            scattered,
        })
    }
}

/// Lambertian Config
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LambertianConfig {
    pub albedo: SerdeVector,
}

/// Metal Scatterer
#[derive(Debug, Clone)]
pub struct Metal {
    albedo: Color,
    fuzz: f64,
}
impl Metal {
    pub fn new(albedo: Color, fuzz: f64) -> Self {
        Self {
            albedo,
            fuzz: fuzz.min(1.0),
        }
    }

    pub fn from_config(config: MetalConfig) -> Self {
        Self::new(config.albedo.into(), config.fuzz)
    }
}
impl Scatterable for Metal {
    fn try_scatter(
        &self,
        ray_in: &Ray,
        hit_record: &HitRecord,
        rng: &mut dyn RngCore,
    ) -> Option<ScatterResult> {
        let reflected = utils::reflect(&ray_in.dir.normalize(), &hit_record.normal);
        let scattered = Ray::new(
            hit_record.p,
            reflected + self.fuzz * utils::random_in_unit_sphere(rng),
        );
        // Fuzzing can push the reflection below the surface; those rays are absorbed
        if scattered.dir.dot(&hit_record.normal) > 0.0 {
            Some(ScatterResult {
                attenuation: self.albedo,
                scattered,
            })
        } else {
            None
        }
    }
}

/// Metal Config
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetalConfig {
    pub albedo: SerdeVector,
    pub fuzz: f64,
}

/// A Dielectric is a refractive material, such as glass
#[derive(Debug, Clone)]
pub struct Dielectric {
    ir: f64,
}
impl Dielectric {
    pub fn new(ir: f64) -> Self {
        Self { ir }
    }

    pub fn from_config(config: DielectricConfig) -> Self {
        Self { ir: config.ir }
    }

    fn reflectance(cosine: f64, ref_idx: f64) -> f64 {
        // Use Schlick's approximation for reflectance
        let r0 = ((1.0 - ref_idx) / (1.0 + ref_idx)).powi(2);
        r0 + (1.0 - r0) * (1.0 - cosine).powi(5)
    }
}
impl Scatterable for Dielectric {
    fn try_scatter(
        &self,
        ray_in: &Ray,
        hit_record: &HitRecord,
        rng: &mut dyn RngCore,
    ) -> Option<ScatterResult> {
        let attenuation = Color::new(1.0, 1.0, 1.0);
        let refraction_ratio = if hit_record.front_face {
            1.0 / self.ir
        } else {
            self.ir
        };

        let unit_direction = ray_in.dir.normalize();
        let cos_theta = (-unit_direction).dot(&hit_record.normal).min(1.0);
        let sin_theta = (1.0 - cos_theta.powi(2)).sqrt();

        let cannot_refract = refraction_ratio * sin_theta > 1.0;

        let direction = if cannot_refract
            || Self::reflectance(cos_theta, refraction_ratio) > rng.gen::<f64>()
        {
            utils::reflect(&unit_direction, &hit_record.normal)
        } else {
            utils::refract(&unit_direction, &hit_record.normal, refraction_ratio)
        };

        let scattered = Ray::new(hit_record.p, direction);
        Some(ScatterResult {
            attenuation,
            scattered,
        })
    }
}

/// Dielectric Config
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DielectricConfig {
    pub ir: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Point, Vec3};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn record(normal: Vec3, front_face: bool) -> HitRecord {
        HitRecord {
            p: Point::new(0.0, 1.0, 0.0),
            normal,
            t: 1.0,
            front_face,
            material: Box::new(Lambertian::new(Color::zeros())),
        }
    }

    #[test]
    fn lambertian_always_scatters_with_albedo_attenuation() {
        let albedo = Color::new(0.8, 0.3, 0.1);
        let material = Lambertian::new(albedo);
        let ray = Ray::new(Point::zeros(), Vec3::new(0.0, -1.0, 0.0));
        let hr = record(Vec3::new(0.0, 1.0, 0.0), true);
        let mut rng = StdRng::seed_from_u64(3);

        for _ in 0..100 {
            let sr = material.try_scatter(&ray, &hr, &mut rng).unwrap();
            assert_eq!(sr.attenuation, albedo);
            assert_eq!(sr.scattered.orig, hr.p);
            assert!(sr.scattered.dir.norm_squared() > 0.0);
        }
    }

    #[test]
    fn fuzzy_metal_rejects_subsurface_scatter() {
        // A reflection antiparallel to the normal plus a fuzz offset of
        // magnitude < 1 can never climb back above the surface
        let material = Metal::new(Color::new(0.8, 0.8, 0.8), 1.0);
        let ray = Ray::new(Point::zeros(), Vec3::new(0.0, 1.0, 0.0));
        let hr = record(Vec3::new(0.0, 1.0, 0.0), true);
        let mut rng = StdRng::seed_from_u64(4);

        for _ in 0..100 {
            assert!(material.try_scatter(&ray, &hr, &mut rng).is_none());
        }
    }

    #[test]
    fn polished_metal_mirrors_the_ray() {
        let material = Metal::new(Color::new(0.7, 0.6, 0.5), 0.0);
        let ray = Ray::new(Point::new(0.0, 2.0, -1.0), Vec3::new(0.0, -1.0, 1.0));
        let hr = record(Vec3::new(0.0, 1.0, 0.0), true);
        let mut rng = StdRng::seed_from_u64(5);

        let sr = material.try_scatter(&ray, &hr, &mut rng).unwrap();
        let expected = Vec3::new(0.0, 1.0, 1.0).normalize();
        assert!((sr.scattered.dir.normalize() - expected).norm() < 1e-9);
    }

    #[test]
    fn metal_fuzz_is_clamped_at_construction() {
        let material = Metal::new(Color::new(0.5, 0.5, 0.5), 7.0);
        assert!(material.fuzz <= 1.0);
    }

    #[test]
    fn perpendicular_dielectric_never_absorbs() {
        // At normal incidence sin(theta) is 0, so total internal reflection
        // cannot occur; the outcome is straight-through or mirrored
        let material = Dielectric::new(1.5);
        let ray = Ray::new(Point::new(0.0, 1.0, 1.0), Vec3::new(0.0, 0.0, -1.0));
        let hr = record(Vec3::new(0.0, 0.0, 1.0), true);
        let mut rng = StdRng::seed_from_u64(6);

        for _ in 0..100 {
            let sr = material.try_scatter(&ray, &hr, &mut rng).unwrap();
            assert_eq!(sr.attenuation, Color::new(1.0, 1.0, 1.0));
            let dir = sr.scattered.dir.normalize();
            assert!(dir[0].abs() < 1e-9);
            assert!(dir[1].abs() < 1e-9);
            assert!((dir[2].abs() - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn steep_exit_ray_totally_internally_reflects() {
        // Leaving glass at 45 degrees exceeds the critical angle, so the
        // Schlick draw never gets a say
        let material = Dielectric::new(1.5);
        let s = std::f64::consts::FRAC_1_SQRT_2;
        let ray = Ray::new(Point::new(-1.0, 2.0, 0.0), Vec3::new(s, -s, 0.0));
        let hr = record(Vec3::new(0.0, 1.0, 0.0), false);
        let mut rng = StdRng::seed_from_u64(8);

        for _ in 0..100 {
            let sr = material.try_scatter(&ray, &hr, &mut rng).unwrap();
            let expected = Vec3::new(s, s, 0.0);
            assert!((sr.scattered.dir - expected).norm() < 1e-9);
        }
    }

    #[test]
    fn material_config_round_trips_through_yaml() {
        let config = MaterialConfig::Metal(MetalConfig {
            albedo: Vec3::new(0.7, 0.6, 0.5).into(),
            fuzz: 0.25,
        });
        let text = serde_yaml::to_string(&config).unwrap();
        let back: MaterialConfig = serde_yaml::from_str(&text).unwrap();
        match back {
            MaterialConfig::Metal(c) => {
                assert_eq!(Vec3::from(c.albedo), Vec3::new(0.7, 0.6, 0.5));
                assert_eq!(c.fuzz, 0.25);
            }
            _ => panic!("expected a metal config"),
        }
    }
}
