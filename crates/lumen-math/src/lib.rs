#![warn(missing_docs)]

//! Shared math for lumen.
//!
//! Point and vector aliases over nalgebra, and the affine [`Transform`]
//! that instances use to move objects into the world.

use nalgebra::{Matrix3, Matrix4, Rotation3, Translation3, Vector3};

/// A position in world or object space.
pub type Point3 = nalgebra::Point3<f64>;

/// A displacement or direction. Not necessarily unit length.
pub type Vec3 = Vector3<f64>;

/// A 3x3 matrix, used for the normal matrix of a transform.
pub type Mat3 = Matrix3<f64>;

/// Affine map stored as a homogeneous 4x4 matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct Transform {
    /// Homogeneous matrix; the bottom row is `[0, 0, 0, 1]`.
    pub matrix: Matrix4<f64>,
}

impl Transform {
    /// Moves every point by `(dx, dy, dz)`.
    pub fn translation(dx: f64, dy: f64, dz: f64) -> Self {
        Self {
            matrix: Translation3::new(dx, dy, dz).to_homogeneous(),
        }
    }

    /// Scales each axis independently.
    pub fn scale(sx: f64, sy: f64, sz: f64) -> Self {
        Self {
            matrix: Matrix4::new_nonuniform_scaling(&Vec3::new(sx, sy, sz)),
        }
    }

    /// Right-handed rotation by `angle` radians about `axis` through the
    /// origin. `axis` need not be normalized; a zero axis gives the identity.
    pub fn rotation(axis: &Vec3, angle: f64) -> Self {
        let matrix = match axis.try_normalize(f64::EPSILON) {
            Some(unit) => Rotation3::new(unit * angle).to_homogeneous(),
            None => Matrix4::identity(),
        };
        Self { matrix }
    }

    /// `self ∘ other`: `other` is applied first.
    pub fn then(&self, other: &Transform) -> Self {
        Self {
            matrix: self.matrix * other.matrix,
        }
    }

    /// Maps a point, translation included.
    pub fn apply_point(&self, p: &Point3) -> Point3 {
        self.matrix.transform_point(p)
    }

    /// Maps a vector, translation ignored. The length is not preserved.
    pub fn apply_vec(&self, v: &Vec3) -> Vec3 {
        self.matrix.transform_vector(v)
    }

    fn linear(&self) -> Mat3 {
        self.matrix.fixed_view::<3, 3>(0, 0).into_owned()
    }

    fn is_singular(&self) -> bool {
        self.linear().determinant().abs() < f64::EPSILON
    }

    /// Inverse transpose of the 3x3 part. Normals mapped through it stay
    /// perpendicular to mapped surfaces.
    pub fn normal_matrix(&self) -> Option<Mat3> {
        if self.is_singular() {
            return None;
        }
        self.linear().try_inverse().map(|inv| inv.transpose())
    }

    /// The inverse map, or `None` when `|det|` of the 3x3 part is below
    /// `f64::EPSILON`.
    pub fn inverse(&self) -> Option<Self> {
        if self.is_singular() {
            return None;
        }
        self.matrix.try_inverse().map(|matrix| Self { matrix })
    }
}
