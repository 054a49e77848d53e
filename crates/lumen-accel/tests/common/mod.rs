//! Seeded scene and ray generators shared by the integration tests.

#![allow(dead_code)]

use std::f64::consts::PI;
use std::sync::Arc;

use lumen_accel::{
    make_box, Bvh, Hittable, Instance, MaterialId, Primitive, Quad, Ray, Sphere, Triangle,
};
use lumen_math::{Point3, Transform, Vec3};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

pub fn rng(seed: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(seed)
}

pub fn random_point(rng: &mut impl Rng, half_extent: f64) -> Point3 {
    Point3::new(
        rng.random_range(-half_extent..half_extent),
        rng.random_range(-half_extent..half_extent),
        rng.random_range(-half_extent..half_extent),
    )
}

/// Uniform direction on the unit sphere, scaled by a random length so rays
/// are not normalized.
pub fn random_direction(rng: &mut impl Rng) -> Vec3 {
    let z: f64 = rng.random_range(-1.0..1.0);
    let phi: f64 = rng.random_range(0.0..2.0 * PI);
    let r = (1.0 - z * z).sqrt();
    let scale: f64 = rng.random_range(0.5..2.0);
    Vec3::new(r * phi.cos(), r * phi.sin(), z) * scale
}

pub fn random_rays(rng: &mut impl Rng, count: usize, half_extent: f64) -> Vec<Ray> {
    (0..count)
        .map(|_| Ray::new(random_point(rng, half_extent), random_direction(rng)))
        .collect()
}

pub fn random_spheres(rng: &mut impl Rng, count: usize, half_extent: f64, radius: f64) -> Vec<Sphere> {
    (0..count)
        .map(|i| Sphere::new(random_point(rng, half_extent), radius, MaterialId(i as u32)))
        .collect()
}

fn random_triangle(rng: &mut impl Rng, half_extent: f64, material: MaterialId) -> Triangle {
    let center = random_point(rng, half_extent);
    let a = center + random_point(rng, 1.5).coords;
    let b = center + random_point(rng, 1.5).coords;
    let c = center + random_point(rng, 1.5).coords;
    Triangle::new(a, b, c, material)
}

fn random_quad(rng: &mut impl Rng, half_extent: f64, material: MaterialId) -> Quad {
    let q = random_point(rng, half_extent);
    let u = random_point(rng, 1.5).coords;
    let v = random_point(rng, 1.5).coords;
    Quad::new(q, u, v, material)
}

/// A small triangle mesh wrapped in its own BVH, ready to be instanced.
pub fn mesh(rng: &mut impl Rng) -> Arc<dyn Hittable> {
    let triangles: Vec<Triangle> = (0..24)
        .map(|i| random_triangle(rng, 1.0, MaterialId(1000 + i)))
        .collect();
    match Bvh::build(triangles) {
        Ok(bvh) => Arc::new(bvh),
        Err(e) => panic!("mesh build failed: {e}"),
    }
}

/// Mixed scene: spheres, triangles, quads, axis-aligned boxes and instanced meshes.
pub fn mixed_scene(seed: u64, count: usize) -> Vec<Primitive> {
    let mut rng = rng(seed);
    let half = 10.0;
    let shared = mesh(&mut rng);

    let mut prims = Vec::with_capacity(count);
    for i in 0..count {
        let material = MaterialId(i as u32);
        let prim: Primitive = match i % 5 {
            0 => {
                let r = rng.random_range(0.1..1.0);
                Sphere::new(random_point(&mut rng, half), r, material).into()
            }
            1 => random_triangle(&mut rng, half, material).into(),
            2 => random_quad(&mut rng, half, material).into(),
            3 if i % 10 == 3 => {
                let a = random_point(&mut rng, half);
                let b = a + Vec3::new(0.5, 1.0, 0.25);
                make_box(a, b, material).into()
            }
            _ => {
                let offset = random_point(&mut rng, half);
                let angle = rng.random_range(0.0..PI);
                let transform = Transform::translation(offset.x, offset.y, offset.z)
                    .then(&Transform::rotation(&Vec3::y(), angle))
                    .then(&Transform::scale(1.0, 0.5, 2.0));
                match Instance::new(Arc::clone(&shared), transform) {
                    Ok(inst) => inst.into(),
                    Err(e) => panic!("instance failed: {e}"),
                }
            }
        };
        prims.push(prim);
    }
    prims
}
