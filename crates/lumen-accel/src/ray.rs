//! Ray representation.

use lumen_math::{Point3, Vec3};

/// A ray in 3D space: `origin + t * direction`.
///
/// The direction is stored as given, not normalized, so `t` keeps the same
/// meaning after an affine change of space.
#[derive(Debug, Clone, Copy)]
pub struct Ray {
    /// Origin point of the ray.
    pub origin: Point3,
    /// Direction of the ray.
    pub direction: Vec3,
    /// Time at which the ray was cast.
    pub time: f64,
    /// Precomputed reciprocal of direction components for slab tests.
    inv_direction: Vec3,
}

impl Ray {
    /// Create a ray at time zero.
    pub fn new(origin: Point3, direction: Vec3) -> Self {
        Self::with_time(origin, direction, 0.0)
    }

    /// Create a ray cast at `time`.
    pub fn with_time(origin: Point3, direction: Vec3, time: f64) -> Self {
        let inv = Vec3::new(1.0 / direction.x, 1.0 / direction.y, 1.0 / direction.z);
        Self {
            origin,
            direction,
            time,
            inv_direction: inv,
        }
    }

    /// Evaluate the ray at parameter `t`: `origin + t * direction`.
    #[inline]
    pub fn at(&self, t: f64) -> Point3 {
        self.origin + t * self.direction
    }

    /// Componentwise reciprocal of the direction. Zero components map to ±∞.
    #[inline]
    pub fn inv_direction(&self) -> &Vec3 {
        &self.inv_direction
    }
}
