/*!
slabtree3d
==========

**slabtree3d** answers geometric queries (nearest ray hit, shape-versus-geometry
overlap) against the static triangle geometry of a 3D game world.

Each mesh chunk carries a [`CollisionTree`](partitioning::CollisionTree): a binary
tree of axis-aligned *slab* splits whose leaves index the chunk's triangles. A
[`World`](world::World) composes many chunks under a hierarchy of plane sections,
[`MergedWorld`](world::MergedWorld) flattens that hierarchy offline into a single
tree, and [`WideTree4`](partitioning::WideTree4)/[`WideTree8`](partitioning::WideTree8)
regroup tree levels into SIMD nodes for batched sphere queries.
*/

#![deny(non_camel_case_types)]
#![deny(unused_parens)]
#![deny(non_upper_case_globals)]
#![deny(unused_results)]
#![warn(missing_docs)]
#![warn(unused_imports)]
#![allow(missing_copy_implementations)]
#![allow(clippy::too_many_arguments)]
#![allow(clippy::module_inception)]
#![allow(clippy::manual_range_contains)] // This usually makes it way more verbose that it could be.

#[cfg(feature = "serde-serialize")]
#[macro_use]
extern crate serde;
#[macro_use]
extern crate approx;
extern crate num_traits as num;

pub extern crate nalgebra as na;
pub extern crate simba;

pub mod bounding_volume;
pub mod collider;
pub mod partitioning;
pub mod query;
pub mod shape;
pub mod world;

/// Compilation flags dependent aliases for mathematical types.
pub mod math {
    pub use na::{Isometry3, Point3, UnitQuaternion, UnitVector3, Vector3};

    /// The scalar type used throughout this crate.
    pub type Real = f32;

    /// The default tolerance used for geometric operations.
    pub const DEFAULT_EPSILON: Real = Real::EPSILON;

    /// The dimension of the space.
    pub const DIM: usize = 3;

    /// The point type.
    pub use Point3 as Point;

    /// The vector type.
    pub use Vector3 as Vector;

    /// The unit vector type.
    pub use UnitVector3 as UnitVector;

    /// The transformation matrix type.
    pub use Isometry3 as Isometry;

    /// The rotation type.
    pub type Rotation<N> = UnitQuaternion<N>;

    /// A SIMD float with 4 lanes (128 bits).
    pub use simba::simd::WideF32x4 as SimdReal4;
    /// A SIMD bool with 4 lanes.
    pub use simba::simd::WideBoolF32x4 as SimdBool4;
    /// A SIMD float with 8 lanes (256 bits).
    pub use simba::simd::WideF32x8 as SimdReal8;
    /// A SIMD bool with 8 lanes.
    pub use simba::simd::WideBoolF32x8 as SimdBool8;
}
