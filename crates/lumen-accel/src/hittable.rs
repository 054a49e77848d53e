//! The capability every intersectable object provides.
//!
//! Primitives, lists, instances and every BVH backend implement [`Hittable`].
//! Implementations must be `Send + Sync` so a finished scene can be queried
//! from many rendering threads at once.

use std::sync::Arc;

use lumen_math::{Point3, Vec3};

use crate::aabb::Aabb;
use crate::Ray;

/// Opaque handle into an external material table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct MaterialId(pub u32);

/// Ray-object intersection information.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitRecord {
    /// Point where the ray intersects the object.
    pub point: Point3,
    /// Unit surface normal, always opposing the incident ray.
    pub normal: Vec3,
    /// Ray parameter of the intersection.
    pub t: f64,
    /// True if the geometric normal already opposed the ray.
    pub front_face: bool,
    /// Material of the surface that was hit.
    pub material: MaterialId,
}

impl HitRecord {
    /// Build a record at `t` along `ray`, orienting `outward_normal` against the ray.
    ///
    /// `outward_normal` must be a unit vector.
    pub fn new(ray: &Ray, t: f64, outward_normal: Vec3, material: MaterialId) -> Self {
        let mut rec = Self {
            point: ray.at(t),
            normal: outward_normal,
            t,
            front_face: true,
            material,
        };
        rec.set_face_normal(ray, outward_normal);
        rec
    }

    /// Set the normal so it points against the incident ray and record
    /// which side was hit.
    pub fn set_face_normal(&mut self, ray: &Ray, outward_normal: Vec3) {
        self.front_face = ray.direction.dot(&outward_normal) < 0.0;
        self.normal = if self.front_face {
            outward_normal
        } else {
            -outward_normal
        };
    }
}

/// Objects that can be intersected by rays.
pub trait Hittable: Send + Sync {
    /// Bounding box enclosing the whole object.
    fn bounding_box(&self) -> Aabb;

    /// Nearest intersection with `t` strictly inside `(t_min, t_max)`.
    ///
    /// Returns `None` when nothing is hit, including when `t_min >= t_max`.
    fn hit(&self, ray: &Ray, t_min: f64, t_max: f64) -> Option<HitRecord>;
}

impl<T: Hittable + ?Sized> Hittable for Arc<T> {
    fn bounding_box(&self) -> Aabb {
        (**self).bounding_box()
    }

    #[inline]
    fn hit(&self, ray: &Ray, t_min: f64, t_max: f64) -> Option<HitRecord> {
        (**self).hit(ray, t_min, t_max)
    }
}

impl<T: Hittable + ?Sized> Hittable for Box<T> {
    fn bounding_box(&self) -> Aabb {
        (**self).bounding_box()
    }

    #[inline]
    fn hit(&self, ray: &Ray, t_min: f64, t_max: f64) -> Option<HitRecord> {
        (**self).hit(ray, t_min, t_max)
    }
}
