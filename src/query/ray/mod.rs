pub use self::ray::{Ray, RayHit};
pub use self::ray_triangle::ray_triangle_intersection;

mod ray;
mod ray_triangle;
