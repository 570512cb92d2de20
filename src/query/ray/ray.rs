//! Traits and structure needed to cast rays.

use crate::math::{Isometry, Point, Real, UnitVector, Vector};
use crate::query::TriangleId;

/// A ray for ray-casting queries.
///
/// The direction does not need to be normalized: distances reported by the
/// casts are expressed in multiples of `dir.norm()`, so they are actual
/// distances only when `dir` is a unit vector.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
#[repr(C)]
pub struct Ray {
    /// Starting point of the ray.
    pub origin: Point<Real>,
    /// Direction of the ray.
    pub dir: Vector<Real>,
}

impl Ray {
    /// Creates a new ray starting from `origin` and with the direction `dir`.
    pub fn new(origin: Point<Real>, dir: Vector<Real>) -> Ray {
        Ray { origin, dir }
    }

    /// Transforms this ray by the given isometry.
    #[inline]
    pub fn transform_by(&self, m: &Isometry<Real>) -> Self {
        Self::new(m * self.origin, m * self.dir)
    }

    /// Transforms this ray by the inverse of the given isometry.
    #[inline]
    pub fn inverse_transform_by(&self, m: &Isometry<Real>) -> Self {
        Self::new(
            m.inverse_transform_point(&self.origin),
            m.inverse_transform_vector(&self.dir),
        )
    }

    /// Computes the point at the given parameter on this half-line.
    #[inline]
    pub fn point_at(&self, t: Real) -> Point<Real> {
        self.origin + self.dir * t
    }
}

/// The nearest triangle hit by a ray.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RayHit {
    /// The ray parameter of the hit point.
    pub distance: Real,
    /// The hit point.
    pub point: Point<Real>,
    /// The normal of the hit triangle, facing the ray origin.
    pub normal: Option<UnitVector<Real>>,
    /// The hit triangle.
    pub triangle: TriangleId,
}

impl RayHit {
    /// Transforms the point and normal of this hit by `m`.
    #[inline]
    pub fn transform_by(&self, m: &Isometry<Real>) -> Self {
        Self {
            distance: self.distance,
            point: m * self.point,
            normal: self.normal.map(|n| m * n),
            triangle: self.triangle,
        }
    }
}
