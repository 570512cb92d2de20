use crate::math::{Point, Real};
use crate::query::closest_point_on_triangle;
use crate::shape::{Sphere, Triangle};

/// The point of the triangle closest to the sphere center, if it lies inside the sphere.
///
/// Points exactly on the sphere surface count as inside.
pub fn sphere_triangle_closest_point(sphere: &Sphere, triangle: &Triangle) -> Option<Point<Real>> {
    let closest = closest_point_on_triangle(triangle, &sphere.center);
    let dist_sq = na::distance_squared(&closest, &sphere.center);
    (dist_sq <= sphere.radius * sphere.radius).then_some(closest)
}
