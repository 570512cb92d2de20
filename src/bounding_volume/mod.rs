//! Bounding volumes used to reject queries before any tree descent.

pub use self::aabb::Aabb;
pub use self::bounding_sphere::BoundingSphere;
pub use self::coarse_volume::CoarseVolume;

mod aabb;
mod bounding_sphere;
mod coarse_volume;
