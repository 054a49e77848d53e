//! Linear collections of primitives.

use crate::aabb::Aabb;
use crate::hittable::{HitRecord, Hittable};
use crate::primitive::Primitive;
use crate::Ray;

/// Primitives tested one after another.
///
/// Every query visits every member, which makes the list the reference a
/// BVH must agree with.
#[derive(Debug, Clone, Default)]
pub struct PrimitiveList {
    objects: Vec<Primitive>,
    bbox: Aabb,
}

impl PrimitiveList {
    /// Create an empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a primitive, growing the bounding box.
    pub fn push(&mut self, object: impl Into<Primitive>) {
        let object = object.into();
        self.bbox = Aabb::union(&self.bbox, &object.bounding_box());
        self.objects.push(object);
    }

    /// Remove every primitive.
    pub fn clear(&mut self) {
        self.objects.clear();
        self.bbox = Aabb::EMPTY;
    }

    /// Members of the list.
    pub fn objects(&self) -> &[Primitive] {
        &self.objects
    }

    /// Number of members.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// True when the list has no members.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Take the members out of the list, e.g. to build a BVH over them.
    pub fn into_objects(self) -> Vec<Primitive> {
        self.objects
    }
}

impl<P: Into<Primitive>> FromIterator<P> for PrimitiveList {
    fn from_iter<I: IntoIterator<Item = P>>(iter: I) -> Self {
        let mut list = Self::new();
        for object in iter {
            list.push(object);
        }
        list
    }
}

impl Hittable for PrimitiveList {
    fn bounding_box(&self) -> Aabb {
        self.bbox
    }

    fn hit(&self, ray: &Ray, t_min: f64, t_max: f64) -> Option<HitRecord> {
        let mut closest: Option<HitRecord> = None;
        let mut closest_so_far = t_max;

        for object in &self.objects {
            if let Some(hit) = object.hit(ray, t_min, closest_so_far) {
                closest_so_far = hit.t;
                closest = Some(hit);
            }
        }

        closest
    }
}
