//! Ray-sphere intersection (quadratic equation).

use lumen_math::{Point3, Vec3};

use crate::aabb::Aabb;
use crate::hittable::{HitRecord, Hittable, MaterialId};
use crate::interval::Interval;
use crate::Ray;

/// Sphere primitive defined by center and radius.
#[derive(Debug, Clone, PartialEq)]
pub struct Sphere {
    /// Center point in world coordinates.
    pub center: Point3,
    /// Radius, never negative.
    pub radius: f64,
    /// Material of the surface.
    pub material: MaterialId,
    bbox: Aabb,
}

impl Sphere {
    /// Create a new sphere. Negative radii are clamped to zero, and a
    /// zero-radius sphere is never hit.
    pub fn new(center: Point3, radius: f64, material: MaterialId) -> Self {
        let radius = radius.max(0.0);
        let rvec = Vec3::new(radius, radius, radius);
        Self {
            center,
            radius,
            material,
            bbox: Aabb::from_points(center - rvec, center + rvec),
        }
    }
}

impl Hittable for Sphere {
    fn bounding_box(&self) -> Aabb {
        self.bbox
    }

    fn hit(&self, ray: &Ray, t_min: f64, t_max: f64) -> Option<HitRecord> {
        if self.radius <= 0.0 {
            return None;
        }
        let oc = self.center - ray.origin;

        // |o + t d - c|^2 = r^2 with b = -2h
        let a = ray.direction.norm_squared();
        let h = ray.direction.dot(&oc);
        let c = oc.norm_squared() - self.radius * self.radius;

        let discriminant = h * h - a * c;
        if discriminant < 0.0 {
            return None;
        }
        let sqrtd = discriminant.sqrt();

        let range = Interval::new(t_min, t_max);
        let mut root = (h - sqrtd) / a;
        if !range.surrounds(root) {
            root = (h + sqrtd) / a;
            if !range.surrounds(root) {
                return None;
            }
        }

        let outward_normal = (ray.at(root) - self.center) / self.radius;
        Some(HitRecord::new(ray, root, outward_normal, self.material))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn sphere(radius: f64) -> Sphere {
        Sphere::new(Point3::origin(), radius, MaterialId(1))
    }

    #[test]
    fn test_ray_sphere_through_center() {
        let ray = Ray::new(Point3::new(-10.0, 0.0, 0.0), Vec3::new(1.0, 0.0, 0.0));
        let hit = sphere(5.0).hit(&ray, 0.0, f64::INFINITY).unwrap();
        assert_relative_eq!(hit.t, 5.0, epsilon = 1e-10);
        assert_relative_eq!(hit.point.x, -5.0, epsilon = 1e-10);
        assert!(hit.front_face);
        assert_relative_eq!(hit.normal.x, -1.0, epsilon = 1e-12);
        assert_eq!(hit.material, MaterialId(1));
    }

    #[test]
    fn test_ray_sphere_far_root_when_near_excluded() {
        let ray = Ray::new(Point3::new(-10.0, 0.0, 0.0), Vec3::new(1.0, 0.0, 0.0));
        let hit = sphere(5.0).hit(&ray, 6.0, f64::INFINITY).unwrap();
        assert_relative_eq!(hit.t, 15.0, epsilon = 1e-10);
        assert!(!hit.front_face);
        // Normal flipped to face back along the ray.
        assert_relative_eq!(hit.normal.x, -1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_ray_sphere_miss() {
        let ray = Ray::new(Point3::new(-10.0, 10.0, 0.0), Vec3::new(1.0, 0.0, 0.0));
        assert!(sphere(5.0).hit(&ray, 0.0, f64::INFINITY).is_none());
    }

    #[test]
    fn test_ray_sphere_from_inside() {
        let ray = Ray::new(Point3::origin(), Vec3::new(1.0, 0.0, 0.0));
        let hit = sphere(5.0).hit(&ray, 1e-3, f64::INFINITY).unwrap();
        assert_relative_eq!(hit.t, 5.0, epsilon = 1e-10);
        assert!(!hit.front_face);
    }

    #[test]
    fn test_ray_sphere_out_of_range() {
        let ray = Ray::new(Point3::new(-10.0, 0.0, 0.0), Vec3::new(1.0, 0.0, 0.0));
        assert!(sphere(5.0).hit(&ray, 0.0, 4.0).is_none());
        assert!(sphere(5.0).hit(&ray, 20.0, 1.0).is_none());
    }

    #[test]
    fn test_unnormalized_direction_scales_t() {
        let ray = Ray::new(Point3::new(-10.0, 0.0, 0.0), Vec3::new(2.0, 0.0, 0.0));
        let hit = sphere(5.0).hit(&ray, 0.0, f64::INFINITY).unwrap();
        assert_relative_eq!(hit.t, 2.5, epsilon = 1e-10);
        assert_relative_eq!(hit.normal.norm(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_negative_radius_clamped() {
        assert_eq!(sphere(-2.0).radius, 0.0);
    }

    #[test]
    fn test_degenerate_sphere_is_never_hit() {
        let s = Sphere::new(Point3::new(0.0, 0.0, -1.0), -0.5, MaterialId(2));
        let ray = Ray::new(Point3::origin(), Vec3::new(0.0, 0.0, -1.0));
        assert!(s.hit(&ray, 0.0, f64::INFINITY).is_none());
        assert!(sphere(0.0).hit(&ray, f64::NEG_INFINITY, f64::INFINITY).is_none());
    }

    #[test]
    fn test_bounding_box() {
        let s = Sphere::new(Point3::new(1.0, 2.0, 3.0), 0.5, MaterialId(0));
        let b = s.bounding_box();
        assert_eq!(b.min(), Point3::new(0.5, 1.5, 2.5));
        assert_eq!(b.max(), Point3::new(1.5, 2.5, 3.5));
    }
}
