//! Boolean and point-producing tests between the query shapes and a single triangle.

pub use self::intersection_test_aabb_triangle::{
    intersection_test_aabb_triangle, intersection_test_obb_triangle,
};
pub use self::intersection_test_segment_triangle::segment_triangle_intersection;
pub use self::intersection_test_sphere_triangle::sphere_triangle_closest_point;
pub use self::intersection_test_triangle_triangle::intersection_test_triangle_triangle;

mod intersection_test_aabb_triangle;
mod intersection_test_segment_triangle;
mod intersection_test_sphere_triangle;
mod intersection_test_triangle_triangle;
