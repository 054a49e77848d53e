//! Ray-parallelogram intersection (closed-form plane test).

use lumen_math::{Point3, Vec3};

use crate::aabb::{Aabb, PARALLEL_EPSILON};
use crate::hittable::{HitRecord, Hittable, MaterialId};
use crate::Ray;

/// Planar parallelogram spanned by edges `u` and `v` from corner `q`.
#[derive(Debug, Clone, PartialEq)]
pub struct Quad {
    /// Corner the edges start from.
    pub q: Point3,
    /// First edge.
    pub u: Vec3,
    /// Second edge.
    pub v: Vec3,
    /// Material of the surface.
    pub material: MaterialId,
    /// `n / (n · n)` for the unnormalized normal `n = u × v`.
    w: Vec3,
    normal: Vec3,
    /// Plane offset: `normal · p = d` for every point on the plane.
    d: f64,
    bbox: Aabb,
}

impl Quad {
    /// Create a quad from a corner and two edge vectors.
    pub fn new(q: Point3, u: Vec3, v: Vec3, material: MaterialId) -> Self {
        let n = u.cross(&v);
        let normal = n.try_normalize(0.0).unwrap_or_else(Vec3::zeros);
        let d = normal.dot(&q.coords);
        let w = n / n.dot(&n);

        let diagonal1 = Aabb::from_points(q, q + u + v);
        let diagonal2 = Aabb::from_points(q + u, q + v);

        Self {
            q,
            u,
            v,
            material,
            w,
            normal,
            d,
            bbox: Aabb::union(&diagonal1, &diagonal2),
        }
    }

    /// Unit normal of `u × v`.
    pub fn normal(&self) -> Vec3 {
        self.normal
    }
}

impl Hittable for Quad {
    fn bounding_box(&self) -> Aabb {
        self.bbox
    }

    fn hit(&self, ray: &Ray, t_min: f64, t_max: f64) -> Option<HitRecord> {
        let denom = self.normal.dot(&ray.direction);
        if denom.abs() < PARALLEL_EPSILON {
            return None;
        }

        let t = (self.d - self.normal.dot(&ray.origin.coords)) / denom;
        if t <= t_min || t >= t_max {
            return None;
        }

        // Planar coordinates of the hit point along u and v.
        let planar = ray.at(t) - self.q;
        let alpha = self.w.dot(&planar.cross(&self.v));
        let beta = self.w.dot(&self.u.cross(&planar));
        if !(0.0..=1.0).contains(&alpha) || !(0.0..=1.0).contains(&beta) {
            return None;
        }

        Some(HitRecord::new(ray, t, self.normal, self.material))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn unit_quad() -> Quad {
        Quad::new(
            Point3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
            MaterialId(4),
        )
    }

    #[test]
    fn test_hit_center() {
        let ray = Ray::new(Point3::new(0.5, 0.5, 3.0), Vec3::new(0.0, 0.0, -1.0));
        let hit = unit_quad().hit(&ray, 0.0, f64::INFINITY).unwrap();
        assert_relative_eq!(hit.t, 3.0, epsilon = 1e-12);
        assert!(hit.front_face);
        assert_eq!(hit.normal, Vec3::z());
        assert_eq!(hit.material, MaterialId(4));
    }

    #[test]
    fn test_hit_edge_inclusive() {
        let ray = Ray::new(Point3::new(1.0, 1.0, 3.0), Vec3::new(0.0, 0.0, -1.0));
        assert!(unit_quad().hit(&ray, 0.0, f64::INFINITY).is_some());
    }

    #[test]
    fn test_miss_outside() {
        let ray = Ray::new(Point3::new(1.5, 0.5, 3.0), Vec3::new(0.0, 0.0, -1.0));
        assert!(unit_quad().hit(&ray, 0.0, f64::INFINITY).is_none());
        let ray = Ray::new(Point3::new(0.5, -0.1, 3.0), Vec3::new(0.0, 0.0, -1.0));
        assert!(unit_quad().hit(&ray, 0.0, f64::INFINITY).is_none());
    }

    #[test]
    fn test_parallel_ray_rejected() {
        let ray = Ray::new(Point3::new(-1.0, 0.5, 0.0), Vec3::new(1.0, 0.0, 0.0));
        assert!(unit_quad().hit(&ray, 0.0, f64::INFINITY).is_none());
    }

    #[test]
    fn test_back_side() {
        let ray = Ray::new(Point3::new(0.25, 0.75, -2.0), Vec3::new(0.0, 0.0, 1.0));
        let hit = unit_quad().hit(&ray, 0.0, f64::INFINITY).unwrap();
        assert!(!hit.front_face);
        assert_eq!(hit.normal, -Vec3::z());
    }

    #[test]
    fn test_skewed_parallelogram() {
        let quad = Quad::new(
            Point3::new(0.0, 0.0, 2.0),
            Vec3::new(2.0, 0.0, 0.0),
            Vec3::new(1.0, 1.0, 0.0),
            MaterialId(0),
        );
        // Inside the slanted edge.
        let inside = Ray::new(Point3::new(2.5, 0.9, 5.0), Vec3::new(0.0, 0.0, -1.0));
        assert!(quad.hit(&inside, 0.0, f64::INFINITY).is_some());
        // Left of the slanted edge.
        let outside = Ray::new(Point3::new(0.2, 0.9, 5.0), Vec3::new(0.0, 0.0, -1.0));
        assert!(quad.hit(&outside, 0.0, f64::INFINITY).is_none());
    }

    #[test]
    fn test_flat_bounding_box() {
        let b = unit_quad().bounding_box();
        assert!(b.z.length() >= crate::aabb::PADDING * (1.0 - 1e-9));
        assert!(b.contains(&Point3::new(1.0, 1.0, 0.0)));
    }
}
