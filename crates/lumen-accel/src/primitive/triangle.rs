//! Ray-triangle intersection (Möller–Trumbore).

use lumen_math::{Point3, Vec3};

use crate::aabb::{Aabb, PARALLEL_EPSILON};
use crate::hittable::{HitRecord, Hittable, MaterialId};
use crate::Ray;

/// Triangle primitive with a geometric normal fixed at construction.
#[derive(Debug, Clone, PartialEq)]
pub struct Triangle {
    /// First vertex.
    pub v0: Point3,
    /// Second vertex.
    pub v1: Point3,
    /// Third vertex.
    pub v2: Point3,
    /// Unit normal of `(v1 - v0) × (v2 - v0)`. Zero for degenerate triangles.
    pub normal: Vec3,
    /// Material of the surface.
    pub material: MaterialId,
    bbox: Aabb,
}

impl Triangle {
    /// Create a triangle. Winding `v0 → v1 → v2` decides the outward normal.
    pub fn new(v0: Point3, v1: Point3, v2: Point3, material: MaterialId) -> Self {
        let normal = (v1 - v0)
            .cross(&(v2 - v0))
            .try_normalize(0.0)
            .unwrap_or_else(Vec3::zeros);
        let min = v0.inf(&v1).inf(&v2);
        let max = v0.sup(&v1).sup(&v2);
        Self {
            v0,
            v1,
            v2,
            normal,
            material,
            bbox: Aabb::from_points(min, max),
        }
    }

    /// Ray parameter of the intersection with the triangle's surface, if any.
    ///
    /// Does not apply any range restriction on `t`.
    pub fn intersect(&self, ray: &Ray) -> Option<f64> {
        let edge1 = self.v1 - self.v0;
        let edge2 = self.v2 - self.v0;

        let h = ray.direction.cross(&edge2);
        let a = edge1.dot(&h);

        // Ray parallel to the triangle's plane.
        if a.abs() < PARALLEL_EPSILON {
            return None;
        }

        let f = 1.0 / a;
        let s = ray.origin - self.v0;
        let u = f * s.dot(&h);
        if !(0.0..=1.0).contains(&u) {
            return None;
        }

        let q = s.cross(&edge1);
        let v = f * ray.direction.dot(&q);
        if v < 0.0 || u + v > 1.0 {
            return None;
        }

        Some(f * edge2.dot(&q))
    }
}

impl Hittable for Triangle {
    fn bounding_box(&self) -> Aabb {
        self.bbox
    }

    fn hit(&self, ray: &Ray, t_min: f64, t_max: f64) -> Option<HitRecord> {
        let t = self.intersect(ray)?;
        if t <= t_min || t >= t_max {
            return None;
        }
        Some(HitRecord::new(ray, t, self.normal, self.material))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn tri() -> Triangle {
        Triangle::new(
            Point3::new(-1.0, -1.0, 0.0),
            Point3::new(1.0, -1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            MaterialId(2),
        )
    }

    #[test]
    fn test_hit_from_front() {
        let ray = Ray::new(Point3::new(0.0, 0.0, 5.0), Vec3::new(0.0, 0.0, -1.0));
        let hit = tri().hit(&ray, 0.0, f64::INFINITY).unwrap();
        assert_relative_eq!(hit.t, 5.0, epsilon = 1e-12);
        assert_relative_eq!(hit.point.z, 0.0, epsilon = 1e-12);
        // Counter-clockwise seen from +z, so the geometric normal is +z.
        assert_eq!(tri().normal, Vec3::z());
        assert!(hit.front_face);
        assert_eq!(hit.normal, Vec3::z());
        assert_eq!(hit.front_face, ray.direction.dot(&tri().normal) < 0.0);
    }

    #[test]
    fn test_hit_from_back() {
        let ray = Ray::new(Point3::new(0.0, 0.0, -5.0), Vec3::new(0.0, 0.0, 1.0));
        let hit = tri().hit(&ray, 0.0, f64::INFINITY).unwrap();
        assert!(!hit.front_face);
        assert_eq!(hit.normal, -Vec3::z());
    }

    #[test]
    fn test_miss_outside_barycentric() {
        let ray = Ray::new(Point3::new(0.9, 0.9, 5.0), Vec3::new(0.0, 0.0, -1.0));
        assert!(tri().hit(&ray, 0.0, f64::INFINITY).is_none());
    }

    #[test]
    fn test_parallel_ray_rejected() {
        let ray = Ray::new(Point3::new(-5.0, 0.0, 0.0), Vec3::new(1.0, 0.0, 0.0));
        assert!(tri().intersect(&ray).is_none());
    }

    #[test]
    fn test_range_is_open() {
        let ray = Ray::new(Point3::new(0.0, 0.0, 5.0), Vec3::new(0.0, 0.0, -1.0));
        assert!(tri().hit(&ray, 0.0, 5.0).is_none());
        assert!(tri().hit(&ray, 5.0, 10.0).is_none());
        assert!(tri().hit(&ray, 4.9, 5.1).is_some());
    }

    #[test]
    fn test_flat_triangle_box_is_padded() {
        let b = tri().bounding_box();
        assert!(b.z.length() > 0.0);
        assert_eq!(b.x, crate::interval::Interval::new(-1.0, 1.0));
    }

    #[test]
    fn test_degenerate_triangle_never_hits() {
        let t = Triangle::new(
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(2.0, 0.0, 0.0),
            MaterialId(0),
        );
        assert_eq!(t.normal, Vec3::zeros());
        let ray = Ray::new(Point3::new(1.0, 0.0, 5.0), Vec3::new(0.0, 0.0, -1.0));
        assert!(t.hit(&ray, 0.0, f64::INFINITY).is_none());
    }
}
