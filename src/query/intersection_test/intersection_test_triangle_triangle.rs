use crate::math::{Real, Vector, DEFAULT_EPSILON};
use crate::shape::Triangle;
use arrayvec::ArrayVec;

/// Tests if two triangles intersect, using the separating axis theorem.
///
/// The candidate axes are both normals, the nine edge-edge cross products and,
/// for coplanar configurations, the in-plane edge normals of both triangles.
pub fn intersection_test_triangle_triangle(tri1: &Triangle, tri2: &Triangle) -> bool {
    if !tri1.aabb().intersects(&tri2.aabb()) {
        return false;
    }

    let edges1 = tri1.edges_scaled_directions();
    let edges2 = tri2.edges_scaled_directions();
    let n1 = tri1.scaled_normal();
    let n2 = tri2.scaled_normal();

    let mut axes: ArrayVec<Vector<Real>, 17> = ArrayVec::new();
    let mut push_axis = |axis: Vector<Real>, scale: Real| {
        // Skip axes produced by (near-)parallel directions.
        if !abs_diff_eq!(axis.norm_squared(), 0.0, epsilon = scale * DEFAULT_EPSILON) {
            axes.push(axis);
        }
    };

    push_axis(n1, n1.norm_squared().max(DEFAULT_EPSILON));
    push_axis(n2, n2.norm_squared().max(DEFAULT_EPSILON));

    for e1 in &edges1 {
        for e2 in &edges2 {
            push_axis(e1.cross(e2), e1.norm_squared() * e2.norm_squared());
        }
    }

    for e1 in &edges1 {
        push_axis(n1.cross(e1), n1.norm_squared() * e1.norm_squared());
    }

    for e2 in &edges2 {
        push_axis(n2.cross(e2), n2.norm_squared() * e2.norm_squared());
    }

    !axes.iter().any(|axis| {
        let (min1, max1) = tri1.extents_on_dir(axis);
        let (min2, max2) = tri2.extents_on_dir(axis);
        max1 < min2 || max2 < min1
    })
}
