use crate::math::{Real, UnitVector, DEFAULT_EPSILON};
use crate::query::Ray;
use crate::shape::Triangle;
use na::Unit;

/// Computes the intersection between a two-sided triangle and a ray.
///
/// If an intersection with a ray parameter smaller or equal to `max_t` is found,
/// returns that parameter and the triangle normal oriented toward the ray origin.
/// Rays parallel to the triangle plane never hit it.
pub fn ray_triangle_intersection(
    triangle: &Triangle,
    ray: &Ray,
    max_t: Real,
) -> Option<(Real, Option<UnitVector<Real>>)> {
    let a = triangle.a;
    let ab = triangle.b - a;
    let ac = triangle.c - a;

    // normal
    let n = ab.cross(&ac);
    let d = n.dot(&ray.dir);

    // the normal and the ray direction are parallel
    if d == 0.0 {
        return None;
    }

    let ap = ray.origin - a;
    let t = ap.dot(&n);

    // the ray does not intersect the halfspace defined by the triangle
    if (t < 0.0 && d < 0.0) || (t > 0.0 && d > 0.0) {
        return None;
    }

    let d = d.abs();

    //
    // intersection: compute barycentric coordinates
    //
    let e = -ray.dir.cross(&ap);

    let toi;
    let normal;

    if t < 0.0 {
        let v = -ac.dot(&e);

        if v < 0.0 || v > d {
            return None;
        }

        let w = ab.dot(&e);

        if w < 0.0 || v + w > d {
            return None;
        }

        toi = -t / d;
        normal = -n;
    } else {
        let v = ac.dot(&e);

        if v < 0.0 || v > d {
            return None;
        }

        let w = -ab.dot(&e);

        if w < 0.0 || v + w > d {
            return None;
        }

        toi = t / d;
        normal = n;
    }

    (toi <= max_t).then(|| (toi, Unit::try_new(normal, DEFAULT_EPSILON)))
}
