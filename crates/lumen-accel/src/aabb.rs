//! Axis-aligned bounding boxes and the ray-slab test.
//!
//! Boxes built from points or intervals are padded so that no axis is
//! thinner than [`PADDING`]. Flat quads and axis-aligned triangles therefore
//! still produce boxes a ray can enter.

use std::ops::Add;

use lumen_math::{Point3, Transform, Vec3};

use crate::interval::Interval;
use crate::Ray;

/// Minimum width of every axis of a constructed box.
pub const PADDING: f64 = 1e-4;

/// Direction components smaller than this, relative to the length of the
/// direction, are treated as axis-parallel by [`slab_hit`].
pub const PARALLEL_EPSILON: f64 = 1e-8;

/// Axis-aligned bounding box in 3D.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Extent along x.
    pub x: Interval,
    /// Extent along y.
    pub y: Interval,
    /// Extent along z.
    pub z: Interval,
}

impl Aabb {
    /// The empty box. Union with it is the identity.
    pub const EMPTY: Aabb = Aabb {
        x: Interval::EMPTY,
        y: Interval::EMPTY,
        z: Interval::EMPTY,
    };

    /// The unbounded box.
    pub const UNIVERSE: Aabb = Aabb {
        x: Interval::UNIVERSE,
        y: Interval::UNIVERSE,
        z: Interval::UNIVERSE,
    };

    /// Create a box from per-axis intervals, padding thin axes.
    pub fn from_intervals(x: Interval, y: Interval, z: Interval) -> Self {
        let mut aabb = Self { x, y, z };
        aabb.pad_to_minimums();
        aabb
    }

    /// Create a box with `a` and `b` as opposite corners, in any order.
    pub fn from_points(a: Point3, b: Point3) -> Self {
        let span = |p: f64, q: f64| {
            if p <= q {
                Interval::new(p, q)
            } else {
                Interval::new(q, p)
            }
        };
        Self::from_intervals(span(a.x, b.x), span(a.y, b.y), span(a.z, b.z))
    }

    /// Smallest box enclosing both `a` and `b`.
    pub fn union(a: &Aabb, b: &Aabb) -> Self {
        Self {
            x: Interval::union(&a.x, &b.x),
            y: Interval::union(&a.y, &b.y),
            z: Interval::union(&a.z, &b.z),
        }
    }

    /// Tight box around `aabb` after applying `transform` to its 8 corners.
    ///
    /// Rotating or shearing a box does not give an axis-aligned box, so the
    /// enclosure is recomputed from every corner.
    pub fn transformed(aabb: &Aabb, transform: &Transform) -> Self {
        let mut x = Interval::EMPTY;
        let mut y = Interval::EMPTY;
        let mut z = Interval::EMPTY;

        for corner in aabb.corners() {
            let p = transform.apply_point(&corner);
            x = Interval::union(&x, &Interval::new(p.x, p.x));
            y = Interval::union(&y, &Interval::new(p.y, p.y));
            z = Interval::union(&z, &Interval::new(p.z, p.z));
        }

        Self::from_intervals(x, y, z)
    }

    /// Interval along axis `n`. Anything other than 1 or 2 selects x.
    #[inline]
    pub fn axis_interval(&self, n: usize) -> &Interval {
        match n {
            1 => &self.y,
            2 => &self.z,
            _ => &self.x,
        }
    }

    /// Minimum corner.
    pub fn min(&self) -> Point3 {
        Point3::new(self.x.min, self.y.min, self.z.min)
    }

    /// Maximum corner.
    pub fn max(&self) -> Point3 {
        Point3::new(self.x.max, self.y.max, self.z.max)
    }

    /// Center of the box.
    pub fn centroid(&self) -> Point3 {
        Point3::new(
            (self.x.min + self.x.max) / 2.0,
            (self.y.min + self.y.max) / 2.0,
            (self.z.min + self.z.max) / 2.0,
        )
    }

    /// The 8 corners of the box.
    pub fn corners(&self) -> [Point3; 8] {
        let (x, y, z) = (&self.x, &self.y, &self.z);
        [
            Point3::new(x.min, y.min, z.min),
            Point3::new(x.min, y.min, z.max),
            Point3::new(x.min, y.max, z.min),
            Point3::new(x.min, y.max, z.max),
            Point3::new(x.max, y.min, z.min),
            Point3::new(x.max, y.min, z.max),
            Point3::new(x.max, y.max, z.min),
            Point3::new(x.max, y.max, z.max),
        ]
    }

    /// Closed containment test on every axis.
    pub fn contains(&self, p: &Point3) -> bool {
        self.x.contains(p.x) && self.y.contains(p.y) && self.z.contains(p.z)
    }

    /// Surface area of the box.
    pub fn surface_area(&self) -> f64 {
        let (dx, dy, dz) = (self.x.length(), self.y.length(), self.z.length());
        2.0 * (dx * dy + dy * dz + dz * dx)
    }

    /// Index of the longest axis.
    ///
    /// Ties resolve as `x > y ? (x > z ? 0 : 2) : (y > z ? 1 : 2)`, which
    /// favors z over x when `x == z` and `x <= y`.
    pub fn longest_axis(&self) -> usize {
        let (lx, ly, lz) = (self.x.length(), self.y.length(), self.z.length());
        if lx > ly {
            if lx > lz {
                0
            } else {
                2
            }
        } else if ly > lz {
            1
        } else {
            2
        }
    }

    /// Slab test against the open parameter range `(t_min, t_max)`.
    ///
    /// Uses the ray's reciprocal direction. A zero direction component has an
    /// infinite reciprocal; that axis only checks that the origin lies inside
    /// its slab (boundary included), since `0 * ∞` would poison the range
    /// with NaN for origins on a slab plane.
    pub fn hit(&self, ray: &Ray, mut t_min: f64, mut t_max: f64) -> bool {
        let inv = ray.inv_direction();

        for axis in 0..3 {
            let ax = self.axis_interval(axis);
            let origin = ray.origin[axis];
            let adinv = inv[axis];

            if adinv.is_infinite() {
                if !ax.contains(origin) {
                    return false;
                }
                continue;
            }

            let t0 = (ax.min - origin) * adinv;
            let t1 = (ax.max - origin) * adinv;

            if t0 < t1 {
                if t0 > t_min {
                    t_min = t0;
                }
                if t1 < t_max {
                    t_max = t1;
                }
            } else {
                if t1 > t_min {
                    t_min = t1;
                }
                if t0 < t_max {
                    t_max = t0;
                }
            }

            if t_max <= t_min {
                return false;
            }
        }
        true
    }

    /// Slab test that special-cases axis-parallel rays.
    ///
    /// See [`slab_hit`].
    #[inline]
    pub fn hit_axis_safe(&self, ray: &Ray, t_min: f64, t_max: f64) -> bool {
        slab_hit(
            &[self.x.min, self.y.min, self.z.min],
            &[self.x.max, self.y.max, self.z.max],
            ray,
            t_min,
            t_max,
        )
    }

    fn pad_to_minimums(&mut self) {
        if self.x.length() < PADDING {
            self.x = self.x.expand(PADDING);
        }
        if self.y.length() < PADDING {
            self.y = self.y.expand(PADDING);
        }
        if self.z.length() < PADDING {
            self.z = self.z.expand(PADDING);
        }
    }
}

impl Default for Aabb {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl Add<Vec3> for Aabb {
    type Output = Aabb;

    fn add(self, offset: Vec3) -> Aabb {
        Aabb::from_intervals(self.x + offset.x, self.y + offset.y, self.z + offset.z)
    }
}

/// Slab test over raw corner arrays, as stored in flattened nodes.
///
/// A direction component below [`PARALLEL_EPSILON`] times the direction's
/// length is not divided by; instead the ray origin must lie inside that
/// axis' slab, boundary included. The cutoff scales with the direction so
/// short rays, such as those carried into a scaled-up instance, still test
/// every axis they move along.
#[inline]
pub fn slab_hit(min: &[f64; 3], max: &[f64; 3], ray: &Ray, mut t_min: f64, mut t_max: f64) -> bool {
    let parallel = PARALLEL_EPSILON * ray.direction.norm();
    for axis in 0..3 {
        let origin = ray.origin[axis];
        let dir = ray.direction[axis];

        if dir.abs() < parallel {
            if origin < min[axis] || origin > max[axis] {
                return false;
            }
            continue;
        }

        let adinv = 1.0 / dir;
        let t0 = (min[axis] - origin) * adinv;
        let t1 = (max[axis] - origin) * adinv;

        if t0 < t1 {
            if t0 > t_min {
                t_min = t0;
            }
            if t1 < t_max {
                t_max = t1;
            }
        } else {
            if t1 > t_min {
                t_min = t1;
            }
            if t0 < t_max {
                t_max = t0;
            }
        }

        if t_max <= t_min {
            return false;
        }
    }
    true
}
