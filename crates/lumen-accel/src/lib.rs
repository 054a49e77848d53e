#![warn(missing_docs)]

//! Ray-scene acceleration for the lumen ray tracer.
//!
//! This crate answers one question as fast as possible: which surface does a
//! ray hit first? Primitives expose a bounding box and an exact intersector;
//! bounding volume hierarchies prune the primitives a ray must test.
//!
//! # Architecture
//!
//! - [`Interval`] and [`Aabb`] - ranges, boxes and the ray-slab test
//! - [`Hittable`] - the capability every intersectable object provides
//! - [`primitive`] - spheres, triangles, quads, instances and lists
//! - [`bvh`] - pointer-tree and flat-array hierarchies
//! - [`Accel`] - backend chosen by a [`BvhConfig`]
//!
//! # Example
//!
//! ```
//! use lumen_accel::{Bvh, Hittable, MaterialId, Ray, Sphere};
//! use lumen_math::{Point3, Vec3};
//!
//! let spheres = vec![
//!     Sphere::new(Point3::new(-1.0, 0.0, -1.0), 0.3, MaterialId(0)),
//!     Sphere::new(Point3::new(0.0, 0.0, -1.0), 0.3, MaterialId(1)),
//!     Sphere::new(Point3::new(1.0, 0.0, -1.0), 0.3, MaterialId(2)),
//! ];
//! let bvh = Bvh::build(spheres).unwrap();
//!
//! let ray = Ray::new(Point3::origin(), Vec3::new(0.0, 0.0, -1.0));
//! let hit = bvh.hit(&ray, 0.001, f64::INFINITY).unwrap();
//! assert_eq!(hit.material, MaterialId(1));
//! ```

mod ray;
pub mod aabb;
pub mod accel;
pub mod bvh;
pub mod config;
pub mod error;
pub mod hittable;
pub mod interval;
pub mod primitive;

pub use aabb::Aabb;
pub use accel::Accel;
pub use bvh::{Bvh, BvhNode, BvhStats, FlatBvh, FlatNode, TraversalStats, MAX_PRIMITIVES};
pub use config::{Backend, BvhConfig, LeafLayout};
pub use error::{AccelError, Result};
pub use hittable::{HitRecord, Hittable, MaterialId};
pub use interval::Interval;
pub use primitive::{make_box, Instance, Primitive, PrimitiveList, Quad, Sphere, Triangle};
pub use ray::Ray;
