use crate::math::{Point, Real};
use crate::query::{ray_triangle_intersection, Ray};
use crate::shape::{Segment, Triangle};

/// The point where a segment crosses a triangle, if any.
///
/// Segments lying in the triangle plane are reported as not intersecting.
pub fn segment_triangle_intersection(segment: &Segment, triangle: &Triangle) -> Option<Point<Real>> {
    let ray = Ray::new(segment.a, segment.scaled_direction());
    ray_triangle_intersection(triangle, &ray, 1.0).map(|(toi, _)| ray.point_at(toi))
}
