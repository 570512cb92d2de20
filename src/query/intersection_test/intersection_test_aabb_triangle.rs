use crate::bounding_volume::Aabb;
use crate::math::{Point, Real, Vector};
use crate::shape::{OrientedBox, Triangle};

/// Separating-axis test of a triangle against a box centered at the origin.
///
/// Touching counts as overlapping.
fn centered_box_triangle_overlap(half_extents: &Vector<Real>, pts: &[Point<Real>; 3]) -> bool {
    let h = half_extents;
    let [a, b, c] = pts.map(|pt| pt.coords);

    // The three face normals of the box.
    for i in 0..3 {
        let min = a[i].min(b[i]).min(c[i]);
        let max = a[i].max(b[i]).max(c[i]);
        if min > h[i] || max < -h[i] {
            return false;
        }
    }

    let edges = [b - a, c - b, a - c];

    // The triangle normal.
    let normal = edges[0].cross(&edges[1]);
    if separated_on(&normal, h, &a, &b, &c) {
        return false;
    }

    // The 3 * 3 cross products between the box axes and the triangle edges.
    for e in &edges {
        let axes = [
            // Vector::{x, y ,z}().cross(e)
            Vector::new(0.0, -e.z, e.y),
            Vector::new(e.z, 0.0, -e.x),
            Vector::new(-e.y, e.x, 0.0),
        ];

        if axes.iter().any(|axis| separated_on(axis, h, &a, &b, &c)) {
            return false;
        }
    }

    true
}

#[inline]
fn separated_on(
    axis: &Vector<Real>,
    h: &Vector<Real>,
    a: &Vector<Real>,
    b: &Vector<Real>,
    c: &Vector<Real>,
) -> bool {
    let pa = a.dot(axis);
    let pb = b.dot(axis);
    let pc = c.dot(axis);
    let radius = h.x * axis.x.abs() + h.y * axis.y.abs() + h.z * axis.z.abs();

    pa.min(pb).min(pc) > radius || pa.max(pb).max(pc) < -radius
}

/// Tests if an axis-aligned box and a triangle intersect.
pub fn intersection_test_aabb_triangle(aabb: &Aabb, triangle: &Triangle) -> bool {
    let center = aabb.center().coords;
    let pts = triangle.vertices().map(|pt| pt - center);
    centered_box_triangle_overlap(&aabb.half_extents(), &pts)
}

/// Tests if an oriented box and a triangle intersect.
///
/// The triangle is moved into the box-local frame, where the test reduces to the
/// axis-aligned case.
pub fn intersection_test_obb_triangle(obb: &OrientedBox, triangle: &Triangle) -> bool {
    let pts = triangle.vertices().map(|pt| obb.to_local_point(&pt));
    centered_box_triangle_overlap(&obb.half_extents, &pts)
}
