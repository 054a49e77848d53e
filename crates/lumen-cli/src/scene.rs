//! Random benchmark scenes. Every generator takes its RNG explicitly.

use lumen_accel::{MaterialId, Ray, Sphere};
use lumen_math::Point3;
use rand::Rng;

/// Spheres of `radius` with centers uniform in `[-half_extent, half_extent]³`.
pub fn random_spheres<R: Rng>(
    rng: &mut R,
    count: usize,
    half_extent: f64,
    radius: f64,
) -> Vec<Sphere> {
    (0..count)
        .map(|i| {
            let center = random_point(rng, half_extent);
            Sphere::new(center, radius, MaterialId(i as u32))
        })
        .collect()
}

/// Rays from a camera on the +z axis toward random points inside the scene.
pub fn camera_rays<R: Rng>(rng: &mut R, count: usize, half_extent: f64) -> Vec<Ray> {
    let eye = Point3::new(0.0, 0.0, 3.0 * half_extent);
    (0..count)
        .map(|_| {
            let target = random_point(rng, half_extent);
            Ray::new(eye, target - eye)
        })
        .collect()
}

fn random_point<R: Rng>(rng: &mut R, half_extent: f64) -> Point3 {
    let x = rng.random_range(-half_extent..=half_extent);
    let y = rng.random_range(-half_extent..=half_extent);
    let z = rng.random_range(-half_extent..=half_extent);
    Point3::new(x, y, z)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_same_seed_same_scene() {
        let a = random_spheres(&mut ChaCha8Rng::seed_from_u64(5), 50, 10.0, 1.0);
        let b = random_spheres(&mut ChaCha8Rng::seed_from_u64(5), 50, 10.0, 1.0);
        assert_eq!(a, b);
        for s in &a {
            assert!(s.center.x.abs() <= 10.0);
            assert_eq!(s.radius, 1.0);
        }
    }

    #[test]
    fn test_camera_rays_enter_scene() {
        let mut rng = ChaCha8Rng::seed_from_u64(6);
        let scene = lumen_accel::Aabb::from_points(
            Point3::new(-5.0, -5.0, -5.0),
            Point3::new(5.0, 5.0, 5.0),
        );
        for ray in camera_rays(&mut rng, 20, 5.0) {
            assert!(ray.direction.z < 0.0);
            assert!(scene.hit(&ray, 0.0, f64::INFINITY));
            // The target point lies at t = 1.
            assert!(scene.contains(&ray.at(1.0)));
        }
    }
}
