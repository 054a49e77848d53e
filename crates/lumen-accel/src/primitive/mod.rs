//! Ray-intersectable primitives.
//!
//! Each shape has a dedicated intersector. [`Primitive`] closes the set so a
//! BVH over mixed shapes dispatches with a single `match` instead of a
//! virtual call per leaf test.

mod instance;
mod list;
mod quad;
mod sphere;
mod triangle;

pub use instance::Instance;
pub use list::PrimitiveList;
pub use quad::Quad;
pub use sphere::Sphere;
pub use triangle::Triangle;

use lumen_math::{Point3, Vec3};

use crate::aabb::Aabb;
use crate::hittable::{HitRecord, Hittable, MaterialId};
use crate::Ray;

/// Any primitive shape the acceleration structures can hold.
#[derive(Debug, Clone)]
pub enum Primitive {
    /// A sphere.
    Sphere(Sphere),
    /// A single triangle.
    Triangle(Triangle),
    /// A planar parallelogram.
    Quad(Quad),
    /// A transformed, possibly shared, object.
    Instance(Instance),
    /// A group tested linearly.
    List(PrimitiveList),
}

impl Hittable for Primitive {
    fn bounding_box(&self) -> Aabb {
        match self {
            Primitive::Sphere(s) => s.bounding_box(),
            Primitive::Triangle(t) => t.bounding_box(),
            Primitive::Quad(q) => q.bounding_box(),
            Primitive::Instance(i) => i.bounding_box(),
            Primitive::List(l) => l.bounding_box(),
        }
    }

    #[inline]
    fn hit(&self, ray: &Ray, t_min: f64, t_max: f64) -> Option<HitRecord> {
        match self {
            Primitive::Sphere(s) => s.hit(ray, t_min, t_max),
            Primitive::Triangle(t) => t.hit(ray, t_min, t_max),
            Primitive::Quad(q) => q.hit(ray, t_min, t_max),
            Primitive::Instance(i) => i.hit(ray, t_min, t_max),
            Primitive::List(l) => l.hit(ray, t_min, t_max),
        }
    }
}

impl From<Sphere> for Primitive {
    fn from(s: Sphere) -> Self {
        Primitive::Sphere(s)
    }
}

impl From<Triangle> for Primitive {
    fn from(t: Triangle) -> Self {
        Primitive::Triangle(t)
    }
}

impl From<Quad> for Primitive {
    fn from(q: Quad) -> Self {
        Primitive::Quad(q)
    }
}

impl From<Instance> for Primitive {
    fn from(i: Instance) -> Self {
        Primitive::Instance(i)
    }
}

impl From<PrimitiveList> for Primitive {
    fn from(l: PrimitiveList) -> Self {
        Primitive::List(l)
    }
}

/// The six quads of the box with opposite corners `a` and `b`.
pub fn make_box(a: Point3, b: Point3, material: MaterialId) -> PrimitiveList {
    let min = a.inf(&b);
    let max = a.sup(&b);

    let dx = Vec3::new(max.x - min.x, 0.0, 0.0);
    let dy = Vec3::new(0.0, max.y - min.y, 0.0);
    let dz = Vec3::new(0.0, 0.0, max.z - min.z);

    let mut sides = PrimitiveList::new();
    sides.push(Quad::new(Point3::new(min.x, min.y, max.z), dx, dy, material)); // front
    sides.push(Quad::new(Point3::new(max.x, min.y, max.z), -dz, dy, material)); // right
    sides.push(Quad::new(Point3::new(max.x, min.y, min.z), -dx, dy, material)); // back
    sides.push(Quad::new(Point3::new(min.x, min.y, min.z), dz, dy, material)); // left
    sides.push(Quad::new(Point3::new(min.x, max.y, max.z), dx, -dz, material)); // top
    sides.push(Quad::new(Point3::new(min.x, min.y, min.z), dx, dz, material)); // bottom
    sides
}
