//! Scene construction and scene files

use std::fs;
use std::path::Path;

use anyhow::Context;
use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};

use crate::cameras::CameraConfig;
use crate::materials::{DielectricConfig, LambertianConfig, MaterialConfig, MetalConfig};
use crate::objects::{HittableListConfig, SphereConfig};
use crate::{utils, Point, Vec3};

/// A full scene description: camera plus object list
///
/// Everything here is plain config data, so scenes round-trip through YAML.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneConfig {
    pub camera: CameraConfig,
    pub world: HittableListConfig,
}

/// Build the randomized demo scene
///
/// One huge gray ground sphere, a jittered 22x22 lattice of small spheres
/// with randomly drawn materials, and three fixed feature spheres.
pub fn random_scene(rng: &mut dyn RngCore) -> SceneConfig {
    let mut objects = Vec::new();

    objects.push(SphereConfig {
        center: Point::new(0.0, -1000.0, 0.0).into(),
        radius: 1000.0,
        material: MaterialConfig::Lambertian(LambertianConfig {
            albedo: Vec3::new(0.5, 0.5, 0.5).into(),
        }),
    });

    for a in -11..11 {
        for b in -11..11 {
            let choose_mat: f64 = rng.gen();
            let center = Point::new(
                a as f64 + 0.9 * rng.gen::<f64>(),
                0.2,
                b as f64 + 0.9 * rng.gen::<f64>(),
            );

            // Keep the lattice clear of the large metal sphere
            if (center - Point::new(4.0, 0.2, 0.0)).norm() <= 0.9 {
                continue;
            }

            let material = if choose_mat < 0.8 {
                // Multiplying two draws biases toward darker, saturated colors
                let albedo = utils::random_color(rng).component_mul(&utils::random_color(rng));
                MaterialConfig::Lambertian(LambertianConfig {
                    albedo: albedo.into(),
                })
            } else if choose_mat < 0.95 {
                MaterialConfig::Metal(MetalConfig {
                    albedo: utils::random_in_range(rng, 0.5, 1.0).into(),
                    fuzz: rng.gen_range(0.0..0.5),
                })
            } else {
                MaterialConfig::Dielectric(DielectricConfig { ir: 1.5 })
            };

            objects.push(SphereConfig {
                center: center.into(),
                radius: 0.2,
                material,
            });
        }
    }

    objects.push(SphereConfig {
        center: Point::new(0.0, 1.0, 0.0).into(),
        radius: 1.0,
        material: MaterialConfig::Dielectric(DielectricConfig { ir: 1.5 }),
    });
    objects.push(SphereConfig {
        center: Point::new(-4.0, 1.0, 0.0).into(),
        radius: 1.0,
        material: MaterialConfig::Lambertian(LambertianConfig {
            albedo: Vec3::new(0.4, 0.2, 0.1).into(),
        }),
    });
    objects.push(SphereConfig {
        center: Point::new(4.0, 1.0, 0.0).into(),
        radius: 1.0,
        material: MaterialConfig::Metal(MetalConfig {
            albedo: Vec3::new(0.7, 0.6, 0.5).into(),
            fuzz: 0.0,
        }),
    });

    SceneConfig {
        camera: default_camera(),
        world: HittableListConfig { objects },
    }
}

/// The demo viewpoint: looking down at the origin from (13, 2, 3)
pub fn default_camera() -> CameraConfig {
    CameraConfig {
        look_from: Point::new(13.0, 2.0, 3.0).into(),
        look_at: Point::zeros().into(),
        v_up: Vec3::new(0.0, 1.0, 0.0).into(),
        vertical_fov_deg: 20.0,
    }
}

/// Load a scene description from a YAML file
pub fn load_scene(path: &Path) -> anyhow::Result<SceneConfig> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading scene file {}", path.display()))?;
    let scene = serde_yaml::from_str(&text)
        .with_context(|| format!("parsing scene file {}", path.display()))?;
    Ok(scene)
}

/// Write a scene description to a YAML file
pub fn save_scene(path: &Path, scene: &SceneConfig) -> anyhow::Result<()> {
    let text = serde_yaml::to_string(scene)?;
    fs::write(path, text).with_context(|| format!("writing scene file {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn demo_scene_has_ground_lattice_and_features() {
        let mut rng = StdRng::seed_from_u64(42);
        let scene = random_scene(&mut rng);
        let objects = &scene.world.objects;

        // Ground plus three features, and a lattice that loses at most a few
        // spheres to the exclusion zone
        assert!(objects.len() >= 484 && objects.len() <= 488);
        assert_eq!(objects[0].radius, 1000.0);
        let large: Vec<_> = objects.iter().filter(|o| o.radius == 1.0).collect();
        assert_eq!(large.len(), 3);
    }

    #[test]
    fn lattice_respects_the_exclusion_zone() {
        let mut rng = StdRng::seed_from_u64(43);
        let scene = random_scene(&mut rng);
        for sphere in &scene.world.objects {
            if sphere.radius == 0.2 {
                let center = Point::from(sphere.center);
                assert!((center - Point::new(4.0, 0.2, 0.0)).norm() > 0.9);
            }
        }
    }

    #[test]
    fn generation_is_deterministic_per_seed() {
        let scene_a = random_scene(&mut StdRng::seed_from_u64(7));
        let scene_b = random_scene(&mut StdRng::seed_from_u64(7));
        assert_eq!(
            serde_yaml::to_string(&scene_a).unwrap(),
            serde_yaml::to_string(&scene_b).unwrap()
        );
    }

    #[test]
    fn scene_files_round_trip() {
        let scene = random_scene(&mut StdRng::seed_from_u64(9));
        let text = serde_yaml::to_string(&scene).unwrap();
        let back: SceneConfig = serde_yaml::from_str(&text).unwrap();
        assert_eq!(back.world.objects.len(), scene.world.objects.len());
        assert_eq!(
            Point::from(back.camera.look_from),
            Point::from(scene.camera.look_from)
        );
    }
}
