use crate::math::{Point, Real, Vector};
use crate::shape::Triangle;

/// Projects a point on a segment, clamping to its endpoints.
#[inline]
fn closest_point_on_edge(a: &Point<Real>, b: &Point<Real>, pt: &Point<Real>) -> Point<Real> {
    let ab = b - a;
    let sqnab = ab.norm_squared();

    if sqnab == 0.0 {
        return *a;
    }

    let t = (ab.dot(&(pt - a)) / sqnab).clamp(0.0, 1.0);
    a + ab * t
}

/// The point of the (solid) triangle closest to `pt`.
///
/// Follows the Voronoi regions of the triangle features. Degenerate triangles
/// fall back to the closest point of their three edges.
pub fn closest_point_on_triangle(triangle: &Triangle, pt: &Point<Real>) -> Point<Real> {
    let a = triangle.a;
    let b = triangle.b;
    let c = triangle.c;

    let ab = b - a;
    let ac = c - a;
    let ap = pt - a;

    let ab_ap = ab.dot(&ap);
    let ac_ap = ac.dot(&ap);

    if ab_ap <= 0.0 && ac_ap <= 0.0 {
        // Voronoï region of `a`.
        return a;
    }

    let bp = pt - b;
    let ab_bp = ab.dot(&bp);
    let ac_bp = ac.dot(&bp);

    if ab_bp >= 0.0 && ac_bp <= ab_bp {
        // Voronoï region of `b`.
        return b;
    }

    let cp = pt - c;
    let ab_cp = ab.dot(&cp);
    let ac_cp = ac.dot(&cp);

    if ac_cp >= 0.0 && ab_cp <= ac_cp {
        // Voronoï region of `c`.
        return c;
    }

    let bc = c - b;
    let n: Vector<Real> = ab.cross(&ac);

    let vc = n.dot(&ab.cross(&ap));
    if vc < 0.0 && ab_ap >= 0.0 && ab_bp <= 0.0 {
        // Voronoï region of `ab`.
        return a + ab * (ab_ap / ab.norm_squared());
    }

    let vb = -n.dot(&ac.cross(&cp));
    if vb < 0.0 && ac_ap >= 0.0 && ac_cp <= 0.0 {
        // Voronoï region of `ac`.
        return a + ac * (ac_ap / ac.norm_squared());
    }

    let va = n.dot(&bc.cross(&bp));
    if va < 0.0 && ac_bp - ab_bp >= 0.0 && ab_cp - ac_cp >= 0.0 {
        // Voronoï region of `bc`.
        return b + bc * (bc.dot(&bp) / bc.norm_squared());
    }

    // NOTE: the denominator vanishes for degenerate triangles.
    let sum = va + vb + vc;
    if sum != 0.0 {
        let v = vb / sum;
        let w = vc / sum;
        return a + ab * v + ac * w;
    }

    [
        closest_point_on_edge(&a, &b, pt),
        closest_point_on_edge(&b, &c, pt),
        closest_point_on_edge(&c, &a, pt),
    ]
    .into_iter()
    .min_by(|p1, p2| {
        na::distance_squared(p1, pt)
            .partial_cmp(&na::distance_squared(p2, pt))
            .unwrap_or(core::cmp::Ordering::Equal)
    })
    .unwrap_or(a)
}
