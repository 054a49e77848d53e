//! Affine instancing of any hittable object.

use std::fmt;
use std::sync::Arc;

use log::trace;
use lumen_math::{Mat3, Transform};

use crate::aabb::Aabb;
use crate::error::{AccelError, Result};
use crate::hittable::{HitRecord, Hittable};
use crate::Ray;

/// A hittable placed in the world through an affine transform.
///
/// The wrapped object is shared, so one mesh BVH can back many instances.
/// Rays are carried into object space with the inverse transform; since the
/// direction is not renormalized the hit parameter `t` is the same in both
/// spaces.
#[derive(Clone)]
pub struct Instance {
    object: Arc<dyn Hittable>,
    transform: Transform,
    inverse: Transform,
    normal_matrix: Mat3,
    bbox: Aabb,
}

impl Instance {
    /// Wrap `object` with `transform` (object space to world space).
    ///
    /// Fails with [`AccelError::SingularTransform`] when the transform cannot
    /// be inverted.
    pub fn new(object: Arc<dyn Hittable>, transform: Transform) -> Result<Self> {
        let inverse = transform.inverse().ok_or(AccelError::SingularTransform)?;
        let normal_matrix = transform
            .normal_matrix()
            .ok_or(AccelError::SingularTransform)?;
        let bbox = Aabb::transformed(&object.bounding_box(), &transform);
        trace!("instance bounds {:?}", bbox);

        Ok(Self {
            object,
            transform,
            inverse,
            normal_matrix,
            bbox,
        })
    }

    /// Object-to-world transform.
    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    /// World-to-object transform.
    pub fn inverse(&self) -> &Transform {
        &self.inverse
    }

    /// The wrapped object.
    pub fn object(&self) -> &Arc<dyn Hittable> {
        &self.object
    }
}

impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Instance")
            .field("transform", &self.transform)
            .field("bbox", &self.bbox)
            .finish_non_exhaustive()
    }
}

impl Hittable for Instance {
    fn bounding_box(&self) -> Aabb {
        self.bbox
    }

    fn hit(&self, ray: &Ray, t_min: f64, t_max: f64) -> Option<HitRecord> {
        let local = Ray::with_time(
            self.inverse.apply_point(&ray.origin),
            self.inverse.apply_vec(&ray.direction),
            ray.time,
        );

        let mut hit = self.object.hit(&local, t_min, t_max)?;

        // The local normal already opposes the local ray and the inverse
        // transpose preserves that sign, so front_face carries over as is.
        hit.point = self.transform.apply_point(&hit.point);
        hit.normal = (self.normal_matrix * hit.normal).normalize();
        Some(hit)
    }
}
