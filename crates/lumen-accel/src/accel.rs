//! Backend selection from configuration.

use crate::aabb::Aabb;
use crate::bvh::{Bvh, BvhStats, FlatBvh, TraversalStats};
use crate::config::{Backend, BvhConfig};
use crate::error::Result;
use crate::hittable::{HitRecord, Hittable};
use crate::Ray;

/// An acceleration structure of the kind chosen by a [`BvhConfig`].
#[derive(Debug, Clone)]
pub enum Accel<P> {
    /// Pointer tree.
    Tree(Bvh<P>),
    /// Flat node array.
    Flat(FlatBvh<P>),
}

impl<P: Hittable> Accel<P> {
    /// Build the backend and leaf layout named by `config`.
    ///
    /// # Example
    ///
    /// ```
    /// use lumen_accel::{Accel, BvhConfig, Hittable, MaterialId, Ray, Sphere};
    /// use lumen_math::{Point3, Vec3};
    ///
    /// let spheres = vec![Sphere::new(Point3::new(0.0, 0.0, -1.0), 0.5, MaterialId(0))];
    /// let accel = Accel::build(spheres, &BvhConfig::default()).unwrap();
    /// let ray = Ray::new(Point3::origin(), Vec3::new(0.0, 0.0, -1.0));
    /// assert!(accel.hit(&ray, 0.001, f64::INFINITY).is_some());
    /// ```
    pub fn build(primitives: Vec<P>, config: &BvhConfig) -> Result<Self> {
        match config.backend {
            Backend::Tree => Bvh::build_with(primitives, config).map(Accel::Tree),
            Backend::Flat => FlatBvh::build(primitives, config).map(Accel::Flat),
        }
    }

    /// Nearest hit, also counting the work done.
    pub fn hit_with_stats(
        &self,
        ray: &Ray,
        t_min: f64,
        t_max: f64,
        stats: &mut TraversalStats,
    ) -> Option<HitRecord> {
        match self {
            Accel::Tree(bvh) => bvh.hit_with_stats(ray, t_min, t_max, stats),
            Accel::Flat(bvh) => bvh.hit_with_stats(ray, t_min, t_max, stats),
        }
    }
}

impl<P> Accel<P> {
    /// Node and leaf counts and depth.
    pub fn stats(&self) -> BvhStats {
        match self {
            Accel::Tree(bvh) => bvh.stats(),
            Accel::Flat(bvh) => bvh.stats(),
        }
    }

    /// Primitive table in build order.
    pub fn primitives(&self) -> &[P] {
        match self {
            Accel::Tree(bvh) => bvh.primitives(),
            Accel::Flat(bvh) => bvh.primitives(),
        }
    }
}

impl<P: Hittable> Hittable for Accel<P> {
    fn bounding_box(&self) -> Aabb {
        match self {
            Accel::Tree(bvh) => bvh.bounding_box(),
            Accel::Flat(bvh) => bvh.bounding_box(),
        }
    }

    fn hit(&self, ray: &Ray, t_min: f64, t_max: f64) -> Option<HitRecord> {
        match self {
            Accel::Tree(bvh) => bvh.hit(ray, t_min, t_max),
            Accel::Flat(bvh) => bvh.hit(ray, t_min, t_max),
        }
    }
}
