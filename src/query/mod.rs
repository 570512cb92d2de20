//! Ray casts and intersection tests against triangles.

pub use self::intersection::{Intersection, TriangleContact, TriangleId};
pub use self::point::closest_point_on_triangle;
pub use self::ray::{ray_triangle_intersection, Ray, RayHit};

mod intersection;
pub mod intersection_test;
mod point;
mod ray;
